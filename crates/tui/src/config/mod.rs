use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/shipsy.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Prefills the login form.
    pub email: String,
    pub page_size: u32,
    /// Page size used while walking the whole collection for stats.
    pub stats_page_size: u32,
    pub log_level: String,
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            email: String::new(),
            page_size: 6,
            stats_page_size: 1000,
            log_level: "info".to_string(),
            log_file: "shipsy_tui.log".to_string(),
        }
    }
}

impl AppConfig {
    fn validate(self) -> Result<Self> {
        if self.page_size == 0 {
            return Err(AppError::InvalidConfig("page_size must be > 0".to_string()));
        }
        if self.stats_page_size == 0 {
            return Err(AppError::InvalidConfig(
                "stats_page_size must be > 0".to_string(),
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(AppError::InvalidConfig("base_url is empty".to_string()));
        }
        Ok(self)
    }
}

#[derive(Debug, Parser)]
#[command(name = "shipsy_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://localhost:8080/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Override login email (password is never read from CLI).
    #[arg(long)]
    email: Option<String>,
    /// Override the number of shipments per page.
    #[arg(long)]
    page_size: Option<u32>,
    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override the log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("SHIPSY_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(email) = args.email {
        settings.email = email;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    settings.validate()
}
