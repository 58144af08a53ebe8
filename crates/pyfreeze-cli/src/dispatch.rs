use std::path::Path;

use anyhow::{Result, bail};
use comfy_table::{Cell, ContentArrangement, Table};
use pyfreeze_app::{App, Session, preflight};
use pyfreeze_core::command_runner::CommandRunner;
use pyfreeze_core::config::PyfreezeConfig;
use pyfreeze_core::doctor::{CheckState, DoctorReport};
use pyfreeze_core::event_log::EventLog;

use crate::cli::{Cli, Command, CompileArgs, LogArgs, RequirementsArgs};

/// Services built by `run` before any command executes.
pub struct Deps<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a PyfreezeConfig,
    pub log: &'a EventLog,
    pub config_path: Option<&'a Path>,
}

pub fn run_with_deps(cli: Cli, deps: Deps<'_>, cwd: &Path) -> Result<()> {
    let app = App::new(deps.runner, deps.log, deps.config);

    match cli.command {
        Some(Command::Doctor) => run_doctor_command(&app, deps.config_path),
        Some(Command::Log(args)) => run_log_command(deps.log, args),
        Some(Command::Compile(args)) => {
            preflight(deps.config, deps.runner, deps.log)?;
            run_compile_command(&app, cwd, args)
        }
        Some(Command::Requirements(args)) => {
            preflight(deps.config, deps.runner, deps.log)?;
            run_requirements_command(&app, cwd, args)
        }
        None => {
            preflight(deps.config, deps.runner, deps.log)?;
            run_form_command(&app, cwd)
        }
    }
}

fn run_form_command(app: &App<'_>, cwd: &Path) -> Result<()> {
    let _ = pyfreeze_tui::run_form(app, cwd)?;
    Ok(())
}

fn select_launcher(app: &App<'_>, cwd: &Path, launcher: &str) -> Result<Session> {
    let mut session = Session::new();
    if !app.select_launcher(&mut session, cwd, launcher)? {
        bail!("no launcher given");
    }
    Ok(session)
}

fn run_compile_command(app: &App<'_>, cwd: &Path, args: CompileArgs) -> Result<()> {
    let mut session = select_launcher(app, cwd, &args.launcher)?;
    session.one_file_mode = args.onefile;
    session.show_console = !args.windowed;

    let mut request = app.prepare_compile(&session)?;
    request.install_requirements |= args.install_requirements;

    println!("Running {}", request.command.display());
    let notification = app.compile(&mut session, &request)?;
    println!("{}", notification.title);
    println!("Output: {}", notification.output_dir.display());

    if args.open {
        app.open_output(&notification.output_dir)?;
    }

    Ok(())
}

fn run_requirements_command(app: &App<'_>, cwd: &Path, args: RequirementsArgs) -> Result<()> {
    let session = select_launcher(app, cwd, &args.launcher)?;
    let outcome = app.create_requirements(&session)?;

    if outcome.created {
        println!("Created {}", outcome.path.display());
    } else {
        println!("Using existing {}", outcome.path.display());
    }

    if !args.no_edit {
        app.edit_requirements(&outcome.path)?;
    }

    Ok(())
}

fn run_log_command(log: &EventLog, args: LogArgs) -> Result<()> {
    let lines = log.read_lines()?;
    let skip = match args.tail {
        Some(count) => lines.len().saturating_sub(count),
        None => 0,
    };

    for line in lines.into_iter().skip(skip) {
        match line {
            Ok(entry) => println!("{}", entry.render_colored()),
            Err(raw) => println!("{raw}"),
        }
    }

    Ok(())
}

fn run_doctor_command(app: &App<'_>, config_path: Option<&Path>) -> Result<()> {
    let report = app.doctor(config_path)?;
    print_doctor_report(&report);
    Ok(())
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        let status = match check.state {
            CheckState::Pass => "PASS",
            CheckState::Fail => "FAIL",
        };

        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(status),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}
