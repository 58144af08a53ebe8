use crossterm::event::{KeyCode, KeyEvent};

/// Esc leaves a dialog or the launcher input. On the form itself it exits.
pub(crate) fn is_back(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
}

pub(crate) fn is_confirm(key: KeyEvent) -> bool {
    key.code == KeyCode::Enter
}

pub(crate) fn is_up(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Up | KeyCode::Char('k'))
}

pub(crate) fn is_down(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Down | KeyCode::Char('j'))
}

/// Space flips the console and one-file options.
pub(crate) fn is_toggle(key: KeyEvent) -> bool {
    key.code == KeyCode::Char(' ')
}

pub(crate) fn is_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('q')
}

/// Opens `dist` from the `Compiled!` notification.
pub(crate) fn is_open_output(key: KeyEvent) -> bool {
    key.code == KeyCode::Char('o')
}
