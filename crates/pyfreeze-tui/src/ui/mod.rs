pub(crate) mod binary_choice;
pub(crate) mod modal;
pub(crate) mod text;
