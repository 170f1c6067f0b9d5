use crate::demo::{run_aps, run_demo, run_facets, ApsArgs, DemoArgs, FacetsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use nexus_notes::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Nexus Notes",
    about = "Run the Nexus Notes sharing service and its offline tools from the command line",
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
    /// Compute an Admission Point Score from subject marks
    Aps(ApsArgs),
    /// List university/faculty/module suggestions for a note export
    Facets(FacetsArgs),
    /// Run an offline end-to-end demo of the catalog and APS workflows
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory catalog from a note CSV export (ignored with a hosted backend)
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Aps(args) => run_aps(args),
        Command::Facets(args) => run_facets(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
