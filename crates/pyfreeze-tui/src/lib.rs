mod compile_form;
mod keymap;
mod theme;
mod ui;

use std::io::{Stdout, stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use compile_form::{CompileForm, FlowSignal};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use pyfreeze_app::App;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::ui::modal::render_error_modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    Completed,
    Canceled,
}

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_with_ops(
            || enable_raw_mode().context("failed to enable raw mode"),
            || {
                let mut out = stdout();
                execute!(out, EnterAlternateScreen, Hide)
                    .context("failed to enter alternate screen")
            },
            || {
                let backend = CrosstermBackend::new(stdout());
                Terminal::new(backend).context("failed to create terminal backend")
            },
            || {
                let mut out = stdout();
                execute!(out, Show, LeaveAlternateScreen)
                    .context("failed to restore terminal screen during rollback")
            },
            || disable_raw_mode().context("failed to disable raw mode during rollback"),
        )?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn enter_with_ops<
    T,
    EnableRawMode,
    EnterAltScreen,
    CreateTerminal,
    LeaveAltScreen,
    DisableRawMode,
>(
    mut enable_raw_mode_op: EnableRawMode,
    mut enter_alt_screen_op: EnterAltScreen,
    mut create_terminal_op: CreateTerminal,
    mut leave_alt_screen_op: LeaveAltScreen,
    mut disable_raw_mode_op: DisableRawMode,
) -> Result<T>
where
    EnableRawMode: FnMut() -> Result<()>,
    EnterAltScreen: FnMut() -> Result<()>,
    CreateTerminal: FnMut() -> Result<T>,
    LeaveAltScreen: FnMut() -> Result<()>,
    DisableRawMode: FnMut() -> Result<()>,
{
    enable_raw_mode_op()?;

    if let Err(error) = enter_alt_screen_op() {
        return Err(with_rollback(
            error,
            false,
            &mut leave_alt_screen_op,
            &mut disable_raw_mode_op,
        ));
    }

    create_terminal_op().map_err(|error| {
        with_rollback(
            error,
            true,
            &mut leave_alt_screen_op,
            &mut disable_raw_mode_op,
        )
    })
}

/// Undoes a partial terminal setup. Cleanup failures are appended to `setup_error`.
fn with_rollback<LeaveAltScreen, DisableRawMode>(
    setup_error: anyhow::Error,
    alt_screen_entered: bool,
    leave_alt_screen_op: &mut LeaveAltScreen,
    disable_raw_mode_op: &mut DisableRawMode,
) -> anyhow::Error
where
    LeaveAltScreen: FnMut() -> Result<()>,
    DisableRawMode: FnMut() -> Result<()>,
{
    let mut cleanup_failures = Vec::<String>::new();

    if alt_screen_entered && let Err(error) = leave_alt_screen_op() {
        cleanup_failures.push(format!("{error:#}"));
    }

    if let Err(error) = disable_raw_mode_op() {
        cleanup_failures.push(format!("{error:#}"));
    }

    if cleanup_failures.is_empty() {
        setup_error
    } else {
        anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            cleanup_failures.join("\n")
        )
    }
}

pub(crate) fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Runs the compile form until the user quits. Editor and packaging runs temporarily
/// hand the terminal back to the child process.
pub fn run_form(app: &App<'_>, cwd: &Path) -> Result<UiExit> {
    const TICK_RATE: Duration = Duration::from_millis(120);

    let mut session = TerminalSession::enter()?;
    let mut form = CompileForm::new(cwd);
    let mut global_error: Option<String> = None;

    loop {
        session.draw(|frame| {
            form.render(frame);
            if let Some(message) = global_error.as_deref() {
                render_global_error(frame, message);
            }
        })?;

        if !event::poll(TICK_RATE).context("failed to poll terminal event")? {
            continue;
        }

        let key = match event::read().context("failed to read terminal event")? {
            Event::Resize(_, _) => {
                session.autoresize()?;
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        if is_ctrl_c(key) {
            return Ok(UiExit::Canceled);
        }

        if global_error.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                global_error = None;
            }
            continue;
        }

        match form.on_key(key, app) {
            Ok(FlowSignal::Continue) => {}
            Ok(FlowSignal::Exit(exit)) => return Ok(exit),
            Ok(FlowSignal::Handoff(handoff)) => {
                drop(session);
                form.complete_handoff(handoff, app);
                session = TerminalSession::enter()?;
            }
            Err(error) => global_error = Some(format!("{error:#}")),
        }
    }
}

fn render_global_error(frame: &mut ratatui::Frame<'_>, message: &str) {
    let text = format!("Operation failed.\n\n{message}");
    render_error_modal(frame, "Error", &text, "Enter/Esc: continue");
}

pub(crate) fn centered_rect(
    percent_x: u16,
    percent_y: u16,
    area: ratatui::layout::Rect,
) -> ratatui::layout::Rect {
    let pct_x = percent_x.min(100);
    let pct_y = percent_y.min(100);

    let [_, vertical, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .areas(area);
    let [_, horizontal, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .areas(vertical);
    horizontal
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::{Result, anyhow};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;

    use super::{centered_rect, enter_with_ops, is_ctrl_c};

    type Calls = RefCell<Vec<&'static str>>;

    fn step<'a>(
        calls: &'a Calls,
        name: &'static str,
        fails: bool,
    ) -> impl FnMut() -> Result<()> + 'a {
        move || {
            calls.borrow_mut().push(name);
            if fails {
                Err(anyhow!("{name} failed"))
            } else {
                Ok(())
            }
        }
    }

    fn enter(calls: &Calls, failing: &[&str]) -> Result<&'static str> {
        let fails = |name: &str| failing.contains(&name);
        enter_with_ops(
            step(calls, "raw", fails("raw")),
            step(calls, "alt", fails("alt")),
            || {
                step(calls, "terminal", fails("terminal"))()?;
                Ok("terminal")
            },
            step(calls, "leave", fails("leave")),
            step(calls, "unraw", fails("unraw")),
        )
    }

    #[test]
    fn centered_rect_returns_middle_segment() {
        let centered = centered_rect(72, 44, Rect::new(0, 0, 100, 50));

        assert_eq!(centered, Rect::new(14, 14, 72, 22));
    }

    #[test]
    fn ctrl_c_cancels_but_plain_c_does_not() {
        assert!(is_ctrl_c(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_ctrl_c(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    }

    #[test]
    fn alt_screen_failure_only_restores_raw_mode() {
        let calls = Calls::default();
        let error = enter(&calls, &["alt"]).expect_err("alt screen fails");

        assert_eq!(calls.into_inner(), vec!["raw", "alt", "unraw"]);
        assert!(format!("{error:#}").contains("alt failed"));
    }

    #[test]
    fn reentry_after_handoff_unwinds_and_keeps_cleanup_errors() {
        let calls = Calls::default();
        let error = enter(&calls, &["terminal", "leave"]).expect_err("terminal fails");

        assert_eq!(
            calls.into_inner(),
            vec!["raw", "alt", "terminal", "leave", "unraw"]
        );
        let message = format!("{error:#}");
        assert!(message.starts_with("terminal failed"));
        assert!(message.contains("terminal rollback cleanup failed: leave failed"));
        assert!(!message.contains("unraw failed"));
    }

    #[test]
    fn successful_enter_returns_terminal_without_rollback() {
        let calls = Calls::default();
        let terminal = enter(&calls, &[]).expect("enter succeeds");

        assert_eq!(terminal, "terminal");
        assert_eq!(calls.into_inner(), vec!["raw", "alt", "terminal"]);
    }
}
