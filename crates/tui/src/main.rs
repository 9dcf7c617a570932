mod app;
mod client;
mod config;
mod error;
mod session;
mod shipments;
mod ui;

#[cfg(test)]
mod test_support;

use std::{fs::OpenOptions, sync::Mutex};

use crate::{config::AppConfig, error::Result};

/// Logs go to a file: the terminal belongs to the UI.
fn init_tracing(config: &AppConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "shipsy_tui={level},api_types={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, "starting shipsy_tui");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}
