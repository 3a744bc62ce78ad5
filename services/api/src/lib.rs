mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use zakat_priority::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
