//! Configuration loading and parsing

use anyhow::{ensure, Context, Result};
use pgn_decoder::series::DEFAULT_OUTPUT_ROUTE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub decoding: DecodingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// NDJSON frame files; empty means stdin
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    #[serde(default = "default_route")]
    pub route: String,
    /// Write route and metadata around each body
    #[serde(default)]
    pub envelope: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            route: default_route(),
            envelope: false,
        }
    }
}

fn default_route() -> String {
    DEFAULT_OUTPUT_ROUTE.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecodingConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Only decode these identifiers
    pub identifiers: Option<Vec<String>>,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            batch_size: default_batch_size(),
            identifiers: None,
        }
    }
}

fn default_workers() -> usize {
    4
}

fn default_batch_size() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { summary: true }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.decoding.workers > 0, "decoding.workers must be at least 1");
        ensure!(self.decoding.batch_size > 0, "decoding.batch_size must be at least 1");
        ensure!(!self.output.route.trim().is_empty(), "output.route must not be empty");
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}
