mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use domain_vetting::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
