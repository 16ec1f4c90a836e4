//! Configuration loading for the cave CLI.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub render: Option<RenderConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RenderConfig {
    pub enabled: Option<bool>,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
}

/// Default plot path, relative to the working directory
pub const DEFAULT_PLOT_PATH: &str = "points.png";

/// Default plot size in pixels (5 inches at 96 dpi)
pub const DEFAULT_PLOT_SIZE: u32 = 480;

impl Config {
    /// Whether a plot is written. Defaults to true.
    pub fn render_enabled(&self) -> bool {
        self.render
            .as_ref()
            .and_then(|render| render.enabled)
            .unwrap_or(true)
    }

    pub fn plot_path(&self) -> PathBuf {
        self.render
            .as_ref()
            .and_then(|render| render.output.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PLOT_PATH))
    }

    /// Plot (width, height) in pixels
    pub fn plot_size(&self) -> (u32, u32) {
        let render = self.render.as_ref();
        (
            render
                .and_then(|r| r.width)
                .unwrap_or(DEFAULT_PLOT_SIZE),
            render
                .and_then(|r| r.height)
                .unwrap_or(DEFAULT_PLOT_SIZE),
        )
    }

    /// Log filter directive, if configured
    pub fn log_filter(&self) -> Option<&str> {
        self.logging
            .as_ref()
            .and_then(|logging| logging.filter.as_deref())
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cave").context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
