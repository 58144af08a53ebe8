use crossterm::event::{KeyCode, KeyEvent};

use crate::keymap;

/// Yes/no prompt state. Space toggles, `y`/`n` answer directly, Enter confirms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BinaryChoice {
    pub(crate) yes_selected: bool,
    yes_label: &'static str,
    no_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryChoiceEvent {
    Continue,
    ConfirmYes,
    ConfirmNo,
    Back,
}

impl BinaryChoice {
    pub(crate) fn new(default_yes: bool) -> Self {
        Self::with_labels(default_yes, "Yes", "No")
    }

    pub(crate) fn with_labels(
        default_yes: bool,
        yes_label: &'static str,
        no_label: &'static str,
    ) -> Self {
        Self {
            yes_selected: default_yes,
            yes_label,
            no_label,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> BinaryChoiceEvent {
        if keymap::is_back(key) {
            return BinaryChoiceEvent::Back;
        }

        match key.code {
            KeyCode::Char('y') => return BinaryChoiceEvent::ConfirmYes,
            KeyCode::Char('n') => return BinaryChoiceEvent::ConfirmNo,
            _ => {}
        }

        if keymap::is_toggle(key) || matches!(key.code, KeyCode::Left | KeyCode::Right) {
            self.yes_selected = !self.yes_selected;
            return BinaryChoiceEvent::Continue;
        }

        if !keymap::is_confirm(key) {
            return BinaryChoiceEvent::Continue;
        }

        if self.yes_selected {
            BinaryChoiceEvent::ConfirmYes
        } else {
            BinaryChoiceEvent::ConfirmNo
        }
    }

    pub(crate) fn selected_label(&self) -> &'static str {
        if self.yes_selected {
            self.yes_label
        } else {
            self.no_label
        }
    }
}
