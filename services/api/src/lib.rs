mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use nexus_notes::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
