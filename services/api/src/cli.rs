use crate::report::{run_checklist, run_stage, ChecklistArgs, StageArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use kyc_casework::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "KYC Casework",
    about = "Derive KYC document checklists and onboarding stages, or serve them over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the document checklist for a case snapshot file
    Checklist(ChecklistArgs),
    /// Resolve a backend stage string to the onboarding progress strip
    Stage(StageArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Checklist(args) => run_checklist(args),
        Command::Stage(args) => run_stage(args),
    }
}
