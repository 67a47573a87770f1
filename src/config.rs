//! Configuration Module
//! Command line arguments and the optional JSON settings file.

use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::data::{CsvSource, ViewMode};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Export size must be non-zero, got {0}x{1}")]
    InvalidSize(u32, u32),
}

#[derive(Parser, Debug, Default)]
#[command(name = "topology-chart")]
#[command(about = "Chart top tier, blocking set and splitting set sizes over time")]
#[command(version)]
pub struct Args {
    /// CSV file path or http(s) URL to load on startup
    pub source: Option<String>,

    /// Start in the merged-by-organization view
    #[arg(long)]
    pub merge: bool,

    /// Start in the raw node view, overriding the settings file
    #[arg(long, conflicts_with = "merge")]
    pub raw: bool,

    /// URL opened on point click; `{label}` is replaced by the clicked label
    #[arg(long, value_name = "TEMPLATE")]
    pub click_url: Option<String>,

    /// JSON settings file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Render the chart to this PNG/SVG file and exit without opening a window
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Export width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Export height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// HTTP fetch timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Effective viewer settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub source: Option<String>,
    pub merge_by_organization: bool,
    pub click_url_template: Option<String>,
    pub fetch_timeout_secs: u64,
    pub export_width: u32,
    pub export_height: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: None,
            merge_by_organization: false,
            click_url_template: None,
            fetch_timeout_secs: 30,
            export_width: 1400,
            export_height: 800,
        }
    }
}

impl ViewerConfig {
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Settings file (if any) overlaid with command line flags.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };

        if let Some(source) = &args.source {
            config.source = Some(source.clone());
        }
        if args.merge {
            config.merge_by_organization = true;
        }
        if args.raw {
            config.merge_by_organization = false;
        }
        if let Some(template) = &args.click_url {
            config.click_url_template = Some(template.clone());
        }
        if let Some(width) = args.width {
            config.export_width = width;
        }
        if let Some(height) = args.height {
            config.export_height = height;
        }
        if let Some(secs) = args.timeout_secs {
            config.fetch_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export_width == 0 || self.export_height == 0 {
            return Err(ConfigError::InvalidSize(
                self.export_width,
                self.export_height,
            ));
        }
        Ok(())
    }

    pub fn csv_source(&self) -> Option<CsvSource> {
        self.source
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(CsvSource::parse)
    }

    pub fn view_mode(&self) -> ViewMode {
        ViewMode::from_merge_flag(self.merge_by_organization)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.export_width, self.export_height)
    }
}
