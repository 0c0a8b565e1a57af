use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::pipeline::store::DEFAULT_MODEL_PATH;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a malformed value is a startup error.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            model_path: std::env::var("MODEL_PATH")
                .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
                .into(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
