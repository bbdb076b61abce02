mod app;
mod client;
mod config;
mod error;
mod image;
mod itinerary;
mod local_state;
#[cfg(test)]
mod testing;
mod ui;
mod wishlist;

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting triply_tui");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    if let Some(parent) = Path::new(&config.log_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "triply_tui={level},api_types={level}",
            level = config.log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| AppError::Logging(err.to_string()))
}
