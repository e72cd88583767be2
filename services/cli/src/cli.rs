use crate::commands::{run_export, run_plan, ExportArgs, PlanArgs};
use clap::{Parser, Subcommand};
use hoa_letters::config::AppConfig;
use hoa_letters::error::AppError;
use hoa_letters::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "hoa-letters",
    about = "Turn the latest HOA ledger export into Letter 1 / Letter 2 records",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write letters_letter1.csv and letters_letter2.csv (default command)
    Export(ExportArgs),
    /// Write the per-letter render plan and substitution contexts
    Plan(PlanArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Export(ExportArgs::default()));

    match command {
        Command::Export(args) => run_export(&config, args).map(|_| ()),
        Command::Plan(args) => run_plan(&config, args).map(|_| ()),
    }
}
