pub(crate) mod command_adapter;
pub mod command_runner;
pub mod config;
pub mod doctor;
pub mod event_log;
pub mod platform;
pub mod pyinstaller;
pub mod requirements;
pub mod session;
#[cfg(test)]
pub(crate) mod test_support;
pub mod time;
