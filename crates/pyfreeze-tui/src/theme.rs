use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

pub(crate) fn chrome<'a>(title: impl Into<Line<'a>>) -> Block<'a> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn key_block() -> Block<'static> {
    chrome("Keys")
}

fn emphasis(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Selected option row in the compile form.
pub(crate) fn row_highlight(color: Color) -> Style {
    emphasis(Color::Black).bg(color)
}

pub(crate) fn focus_prompt() -> Style {
    emphasis(Color::Blue)
}

/// `Compiled!` notification title.
pub(crate) fn success_prompt() -> Style {
    emphasis(Color::Green)
}

/// Requirements prompt title.
pub(crate) fn warning_prompt() -> Style {
    emphasis(Color::Yellow)
}

/// Titled workflow error dialogs.
pub(crate) fn error_prompt() -> Style {
    emphasis(Color::Red)
}

pub(crate) fn secondary_text() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
}
