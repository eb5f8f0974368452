use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_START_MARKER: &str = "##--!!--## START AUTO-UPDATE ##--!!--##";
pub const DEFAULT_END_MARKER: &str = "##--!!--## END AUTO-UPDATE ##--!!--##";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub filter: FilterConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// A single remote playlist, fetched in the order it appears in the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub url: String,
    #[serde(default)]
    pub apply_filter: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Case-insensitive channel name fragments kept from filtered sources
    #[serde(default)]
    pub allow_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub path: PathBuf,
    pub start_marker: String,
    pub end_marker: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl SourceConfig {
    pub fn new<U: Into<String>>(url: U) -> Self {
        Self {
            url: url.into(),
            apply_filter: false,
        }
    }

    pub fn filtered<U: Into<String>>(url: U) -> Self {
        Self {
            url: url.into(),
            apply_filter: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new("https://solii.saqlainhaider8198.workers.dev/"),
                SourceConfig::new(
                    "https://raw.githubusercontent.com/doctor-8trange/zyphora/refs/heads/main/data/sony.m3u",
                ),
            ],
            filter: FilterConfig::default(),
            target: TargetConfig {
                path: PathBuf::from("final.m3u8"),
                start_marker: DEFAULT_START_MARKER.to_string(),
                end_marker: DEFAULT_END_MARKER.to_string(),
            },
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> Result<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
            Ok(default_config)
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.sources.is_empty() {
            return Err(AppError::configuration("at least one source is required"));
        }
        if let Some(source) = self.sources.iter().find(|s| s.url.trim().is_empty()) {
            return Err(AppError::configuration(format!(
                "source url must not be empty (apply_filter = {})",
                source.apply_filter
            )));
        }
        if self.target.path.as_os_str().is_empty() {
            return Err(AppError::configuration("target path must not be empty"));
        }
        if self.target.start_marker.is_empty() || self.target.end_marker.is_empty() {
            return Err(AppError::configuration("markers must not be empty"));
        }
        if self.target.start_marker == self.target.end_marker {
            return Err(AppError::configuration("start and end markers must differ"));
        }
        Ok(())
    }

    pub fn has_filtered_sources(&self) -> bool {
        self.sources.iter().any(|s| s.apply_filter)
    }
}
