use std::path::{Path, PathBuf};

use anyhow::Result;
use crossterm::event::{Event, KeyEvent};
use pyfreeze_app::{
    App, CompileNotification, CompileRequest, RequirementsOutcome, Session, WorkflowError,
    WorkflowState,
};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::UiExit;
use crate::keymap;
use crate::theme;
use crate::ui::binary_choice::{BinaryChoice, BinaryChoiceEvent};
use crate::ui::modal::{ModalSpec, render_error_modal, render_modal, render_success_modal};
use crate::ui::text::{
    checkbox, compact_hint, focus_line, highlighted_label_value_line, key_hint_height,
    key_hint_paragraph, label_value_line, wrapped_paragraph, yes_no,
};

pub(crate) trait FormOps {
    fn choose_launcher(&self, session: &mut Session, cwd: &Path, input: &str) -> Result<bool>;
    fn write_requirements(&self, session: &Session) -> Result<RequirementsOutcome>;
    fn open_editor(&self, path: &Path) -> Result<()>;
    fn build_compile(&self, session: &Session) -> Result<CompileRequest>;
    fn run_compile(
        &self,
        session: &mut Session,
        request: &CompileRequest,
    ) -> Result<CompileNotification>;
    fn show_output(&self, directory: &Path) -> Result<()>;
}

impl<'a> FormOps for App<'a> {
    fn choose_launcher(&self, session: &mut Session, cwd: &Path, input: &str) -> Result<bool> {
        self.select_launcher(session, cwd, input)
    }

    fn write_requirements(&self, session: &Session) -> Result<RequirementsOutcome> {
        self.create_requirements(session)
    }

    fn open_editor(&self, path: &Path) -> Result<()> {
        self.edit_requirements(path)
    }

    fn build_compile(&self, session: &Session) -> Result<CompileRequest> {
        self.prepare_compile(session)
    }

    fn run_compile(
        &self,
        session: &mut Session,
        request: &CompileRequest,
    ) -> Result<CompileNotification> {
        self.compile(session, request)
    }

    fn show_output(&self, directory: &Path) -> Result<()> {
        self.open_output(directory)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Launcher,
    Requirements,
    ShowConsole,
    OneFile,
    Compile,
}

const FIELDS: [Field; 5] = [
    Field::Launcher,
    Field::Requirements,
    Field::ShowConsole,
    Field::OneFile,
    Field::Compile,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Form,
    LauncherInput,
    RequirementsPrompt,
    ConfirmCompile,
    Compiled,
    Error,
}

/// Work that needs the real terminal. The caller leaves the alternate screen first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Handoff {
    EditRequirements(PathBuf),
    Compile(CompileRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlowSignal {
    Continue,
    Handoff(Handoff),
    Exit(UiExit),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormError {
    title: String,
    message: String,
}

#[derive(Debug)]
pub(crate) struct CompileForm {
    cwd: PathBuf,
    session: Session,
    step: Step,
    selected: usize,
    launcher_input: Input,
    requirements_choice: BinaryChoice,
    compile_choice: BinaryChoice,
    pending: Option<CompileRequest>,
    notification: Option<CompileNotification>,
    error: Option<FormError>,
}

impl CompileForm {
    pub(crate) fn new(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            session: Session::new(),
            step: Step::Form,
            selected: 0,
            launcher_input: Input::default(),
            requirements_choice: BinaryChoice::new(true),
            compile_choice: BinaryChoice::with_labels(true, "Compile", "Cancel"),
            pending: None,
            notification: None,
            error: None,
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, ops: &dyn FormOps) -> Result<FlowSignal> {
        match self.step {
            Step::Form => self.on_key_form(key, ops),
            Step::LauncherInput => self.on_key_launcher(key, ops),
            Step::RequirementsPrompt => self.on_key_requirements_prompt(key, ops),
            Step::ConfirmCompile => Ok(self.on_key_confirm(key)),
            Step::Compiled => Ok(self.on_key_compiled(key, ops)),
            Step::Error => Ok(self.on_key_error(key)),
        }
    }

    /// Runs the blocking part of a handoff and moves the form to the resulting step.
    pub(crate) fn complete_handoff(&mut self, handoff: Handoff, ops: &dyn FormOps) {
        match handoff {
            Handoff::EditRequirements(path) => match ops.open_editor(&path) {
                Ok(()) => self.step = Step::Form,
                Err(error) => self.show_error("Editor Failed", format!("{error:#}")),
            },
            Handoff::Compile(request) => match ops.run_compile(&mut self.session, &request) {
                Ok(notification) => {
                    self.notification = Some(notification);
                    self.step = Step::Compiled;
                }
                Err(error) => self.show_error(
                    "Compile Failed",
                    format!("Your program was not compiled.\n{error:#}"),
                ),
            },
        }
    }

    fn on_key_form(&mut self, key: KeyEvent, ops: &dyn FormOps) -> Result<FlowSignal> {
        if keymap::is_back(key) || keymap::is_quit(key) {
            return Ok(FlowSignal::Exit(UiExit::Completed));
        }

        if keymap::is_up(key) {
            self.selected = self.selected.saturating_sub(1);
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_down(key) {
            if self.selected + 1 < FIELDS.len() {
                self.selected += 1;
            }
            return Ok(FlowSignal::Continue);
        }

        if !keymap::is_confirm(key) && !keymap::is_toggle(key) {
            return Ok(FlowSignal::Continue);
        }

        match FIELDS[self.selected] {
            Field::Launcher => {
                let current = self
                    .session
                    .target_file()
                    .map(|path| path.display().to_string())
                    .unwrap_or_default();
                self.launcher_input = Input::new(current);
                self.step = Step::LauncherInput;
                Ok(FlowSignal::Continue)
            }
            Field::Requirements => self.request_requirements(ops),
            Field::ShowConsole => {
                self.session.toggle_show_console();
                Ok(FlowSignal::Continue)
            }
            Field::OneFile => {
                self.session.toggle_one_file_mode();
                Ok(FlowSignal::Continue)
            }
            Field::Compile => self.request_compile(ops),
        }
    }

    fn on_key_launcher(&mut self, key: KeyEvent, ops: &dyn FormOps) -> Result<FlowSignal> {
        if keymap::is_back(key) {
            self.step = Step::Form;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_confirm(key) {
            let input = self.launcher_input.value().to_string();
            match ops.choose_launcher(&mut self.session, &self.cwd, &input) {
                Ok(_) => self.step = Step::Form,
                Err(error) => self.show_failure(error, ""),
            }
            return Ok(FlowSignal::Continue);
        }

        self.launcher_input.handle_event(&Event::Key(key));
        Ok(FlowSignal::Continue)
    }

    fn on_key_requirements_prompt(
        &mut self,
        key: KeyEvent,
        ops: &dyn FormOps,
    ) -> Result<FlowSignal> {
        match self.requirements_choice.on_key(key) {
            BinaryChoiceEvent::Continue => Ok(FlowSignal::Continue),
            BinaryChoiceEvent::Back | BinaryChoiceEvent::ConfirmNo => {
                self.step = Step::Form;
                Ok(FlowSignal::Continue)
            }
            BinaryChoiceEvent::ConfirmYes => self.request_requirements(ops),
        }
    }

    fn on_key_confirm(&mut self, key: KeyEvent) -> FlowSignal {
        match self.compile_choice.on_key(key) {
            BinaryChoiceEvent::Continue => FlowSignal::Continue,
            BinaryChoiceEvent::Back | BinaryChoiceEvent::ConfirmNo => {
                self.pending = None;
                self.step = Step::Form;
                FlowSignal::Continue
            }
            BinaryChoiceEvent::ConfirmYes => match self.pending.take() {
                Some(request) => FlowSignal::Handoff(Handoff::Compile(request)),
                None => {
                    self.step = Step::Form;
                    FlowSignal::Continue
                }
            },
        }
    }

    fn on_key_compiled(&mut self, key: KeyEvent, ops: &dyn FormOps) -> FlowSignal {
        if keymap::is_quit(key) {
            return FlowSignal::Exit(UiExit::Completed);
        }

        if keymap::is_back(key) || keymap::is_confirm(key) {
            self.step = Step::Form;
            return FlowSignal::Continue;
        }

        if keymap::is_open_output(key)
            && let Some(directory) = self
                .notification
                .as_ref()
                .map(|notification| notification.output_dir.clone())
            && let Err(error) = ops.show_output(&directory)
        {
            self.show_error("Output Not Opened", format!("{error:#}"));
        }

        FlowSignal::Continue
    }

    fn on_key_error(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_back(key) || keymap::is_confirm(key) {
            self.error = None;
            self.step = Step::Form;
        }
        FlowSignal::Continue
    }

    fn request_requirements(&mut self, ops: &dyn FormOps) -> Result<FlowSignal> {
        match ops.write_requirements(&self.session) {
            Ok(outcome) => {
                self.step = Step::Form;
                Ok(FlowSignal::Handoff(Handoff::EditRequirements(outcome.path)))
            }
            Err(error) => {
                self.show_failure(error, "");
                Ok(FlowSignal::Continue)
            }
        }
    }

    fn request_compile(&mut self, ops: &dyn FormOps) -> Result<FlowSignal> {
        match ops.build_compile(&self.session) {
            Ok(request) => {
                self.pending = Some(request);
                self.compile_choice = BinaryChoice::with_labels(true, "Compile", "Cancel");
                self.step = Step::ConfirmCompile;
            }
            Err(error) => {
                if let Some(WorkflowError::RequirementsMissing { .. }) =
                    error.downcast_ref::<WorkflowError>()
                {
                    self.requirements_choice = BinaryChoice::new(true);
                    self.step = Step::RequirementsPrompt;
                } else {
                    self.show_failure(error, "Your program was not compiled.\n");
                }
            }
        }
        Ok(FlowSignal::Continue)
    }

    fn show_failure(&mut self, error: anyhow::Error, prefix: &str) {
        match error.downcast_ref::<WorkflowError>() {
            Some(workflow) => {
                let message = format!("{prefix}{}", workflow_message(workflow));
                self.show_error(workflow.title(), message);
            }
            None => self.show_error("Error", format!("{prefix}{error:#}")),
        }
    }

    fn show_error(&mut self, title: &str, message: String) {
        self.error = Some(FormError {
            title: title.to_string(),
            message,
        });
        self.step = Step::Error;
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.render_form(frame);
        match self.step {
            Step::Form => {}
            Step::LauncherInput => self.render_launcher_input(frame),
            Step::RequirementsPrompt => self.render_requirements_prompt(frame),
            Step::ConfirmCompile => self.render_confirm(frame),
            Step::Compiled => self.render_compiled(frame),
            Step::Error => self.render_error(frame),
        }
    }

    fn render_form(&self, frame: &mut ratatui::Frame<'_>) {
        let area = frame.area();
        let key_text = compact_hint(
            area.width,
            "Enter/Space: select or toggle    Up/Down or j/k: move    Esc/q: quit",
            "Enter/Space: select    j/k: move    Esc/q: quit",
            "Enter select | j/k move | q quit",
        );
        let footer_height = key_hint_height(area.width, key_text);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Min(7),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            Line::from(self.cwd.display().to_string()),
            label_value_line("Status", state_label(self.session.state())),
            focus_line("Configure and compile"),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome("pyfreeze")),
            header,
        );

        let items: Vec<ListItem<'_>> = FIELDS
            .iter()
            .map(|field| ListItem::new(self.field_label(*field)))
            .collect();
        let list = List::new(items)
            .block(theme::chrome(focus_line("Options")))
            .highlight_style(theme::row_highlight(Color::Cyan));
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, body, &mut state);

        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);
    }

    fn field_label(&self, field: Field) -> String {
        match field {
            Field::Launcher => {
                let value = self
                    .session
                    .target_file()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "Choose launcher...".to_string());
                format!("Launcher        {value}")
            }
            Field::Requirements => format!("Requirements    {}", self.requirements_label()),
            Field::ShowConsole => format!(
                "{} Show console",
                checkbox(self.session.show_console)
            ),
            Field::OneFile => format!("{} One file", checkbox(self.session.one_file_mode)),
            Field::Compile => "Compile".to_string(),
        }
    }

    fn requirements_label(&self) -> String {
        match self.session.requirements_path() {
            Err(_) => "Awaiting launcher...".to_string(),
            Ok(path) if path.is_file() => path.display().to_string(),
            Ok(_) => "Create".to_string(),
        }
    }

    fn render_launcher_input(&self, frame: &mut ratatui::Frame<'_>) {
        let hint = format!("Relative paths resolve against {}", self.cwd.display());
        let rendered = render_modal(
            frame,
            ModalSpec {
                title: "Launcher file",
                title_style: Some(theme::focus_prompt()),
                body: Text::from(vec![Line::from(""), Line::from(""), Line::from(hint)]),
                key_hint: Some("Type: path    Enter: select    Esc: cancel"),
                width_pct: 72,
                height_pct: 36,
            },
        );

        let inner = rendered.body_area.inner(Margin {
            vertical: 1,
            horizontal: 1,
        });
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let input_area = Rect::new(inner.x, inner.y, inner.width, 1);
        let width = input_area.width as usize;
        let scroll = self.launcher_input.visual_scroll(width);
        let input = Paragraph::new(self.launcher_input.value()).scroll((0, scroll as u16));
        frame.render_widget(input, input_area);

        let visual = self.launcher_input.visual_cursor();
        let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
        frame.set_cursor_position((input_area.x + relative as u16, input_area.y));
    }

    fn render_requirements_prompt(&self, frame: &mut ratatui::Frame<'_>) {
        let path = self
            .session
            .requirements_path()
            .map(|path| path.display().to_string())
            .unwrap_or_default();
        let text = Text::from(vec![
            Line::from("Your program needs a requirements.txt next to the launcher."),
            Line::from("Create one now and open it in the editor?"),
            Line::from(""),
            label_value_line("Path", path),
            highlighted_label_value_line(
                "Current selection",
                self.requirements_choice.selected_label(),
            ),
        ]);
        render_modal(
            frame,
            ModalSpec {
                title: "Requirements Not Found",
                title_style: Some(theme::warning_prompt()),
                body: text,
                key_hint: Some("Space: toggle    y/n: answer    Enter: continue    Esc: back"),
                width_pct: 72,
                height_pct: 44,
            },
        );
    }

    fn render_confirm(&self, frame: &mut ratatui::Frame<'_>) {
        let Some(request) = &self.pending else {
            return;
        };
        let command = &request.command;
        let text = Text::from(vec![
            label_value_line("Launcher", command.launcher.display().to_string()),
            label_value_line("One file", yes_no(command.one_file_mode)),
            label_value_line("Show console", yes_no(command.show_console)),
            label_value_line(
                "Install requirements",
                yes_no(request.install_requirements),
            ),
            label_value_line("Command", command.display()),
            Line::from(""),
            highlighted_label_value_line("Current selection", self.compile_choice.selected_label()),
        ]);
        render_modal(
            frame,
            ModalSpec {
                title: "Ready to compile",
                title_style: Some(theme::focus_prompt()),
                body: text,
                key_hint: Some("Space: toggle    y/n: answer    Enter: continue    Esc: back"),
                width_pct: 80,
                height_pct: 50,
            },
        );
    }

    fn render_compiled(&self, frame: &mut ratatui::Frame<'_>) {
        let Some(notification) = &self.notification else {
            return;
        };
        let message = format!(
            "{}\n\nOutput: {}\nCommand: {}",
            notification.body,
            notification.output_dir.display(),
            notification.command
        );
        let footer = compact_hint(
            frame.area().width,
            "o: open output    Enter/Esc: back to form    q: quit pyfreeze",
            "o: open output    Enter/Esc: back    q: quit",
            "o open | Enter back | q quit",
        );
        render_success_modal(frame, &notification.title, &message, footer);
    }

    fn render_error(&self, frame: &mut ratatui::Frame<'_>) {
        let (title, message) = match &self.error {
            Some(error) => (error.title.as_str(), error.message.as_str()),
            None => ("Error", "Something went wrong."),
        };
        render_error_modal(frame, title, message, "Enter/Esc: back");
    }
}

fn workflow_message(error: &WorkflowError) -> String {
    match error {
        WorkflowError::NoLauncherSelected => {
            "Please choose a launcher file before continuing.".to_string()
        }
        WorkflowError::LauncherNotFound { path } => {
            format!("No file exists at {}.", path.display())
        }
        WorkflowError::RequirementsMissing { path } => {
            format!("Please create {} before compiling.", path.display())
        }
        WorkflowError::AlreadyCompiled => {
            "This launcher was already compiled. Select it again to start a new build.".to_string()
        }
        other => other.to_string(),
    }
}

fn state_label(state: WorkflowState) -> &'static str {
    match state {
        WorkflowState::NoFileSelected => "no launcher selected",
        WorkflowState::FileSelected {
            has_requirements: false,
        } => "launcher selected, requirements missing",
        WorkflowState::FileSelected {
            has_requirements: true,
        } => "ready to compile",
        WorkflowState::Compiling => "compiling",
        WorkflowState::Compiled => "compiled",
    }
}
