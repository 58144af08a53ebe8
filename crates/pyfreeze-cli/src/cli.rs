use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pyfreeze")]
#[command(bin_name = "pyfreeze")]
#[command(version)]
#[command(about = "Package a Python launcher script into an executable with pyinstaller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
    #[command(about = "Compile a launcher without opening the interactive form")]
    Compile(CompileArgs),
    #[command(about = "Create requirements.txt next to a launcher and open it in the editor")]
    Requirements(RequirementsArgs),
    #[command(about = "Print the event log")]
    Log(LogArgs),
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Python script used as the program entry point
    pub launcher: String,
    /// Bundle everything into a single executable
    #[arg(long)]
    pub onefile: bool,
    /// Hide the console window of the compiled program
    #[arg(long)]
    pub windowed: bool,
    /// Run `pip install -r requirements.txt` before compiling
    #[arg(long)]
    pub install_requirements: bool,
    /// Open the output directory once the compile succeeds
    #[arg(long)]
    pub open: bool,
}

#[derive(Debug, Args)]
pub struct RequirementsArgs {
    pub launcher: String,
    /// Create the file but do not start the editor
    #[arg(long)]
    pub no_edit: bool,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Only print the last N entries
    #[arg(long, value_name = "N")]
    pub tail: Option<usize>,
}
