//! Application configuration
//!
//! Loaded from `--config <path>` or `<config_dir>/dashdeck/config.toml`.
//! Every key is optional; a missing file means defaults throughout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::dashboards::DashboardKind;
use crate::loader::{
    LoaderSettings, StalePolicy, DEFAULT_ACTIVATION_DELAY, DEFAULT_FAILURE_MESSAGE,
    DEFAULT_TIMEOUT, DEFAULT_TIMEOUT_MESSAGE,
};
use crate::theme::ThemeVariant;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unable to determine config directory")]
    NoConfigDir,
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub loader: LoaderConfig,
    pub messages: MessagesConfig,
    /// Per-section overrides keyed by section id
    pub sections: BTreeMap<String, SectionOverride>,
    pub mock: MockConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub timeout_ms: u64,
    pub activation_delay_ms: u64,
    pub stale_policy: StalePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub timeout: String,
    /// Used for sections that do not define their own failure message
    pub failure: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionOverride {
    pub timeout_ms: Option<u64>,
    pub timeout_message: Option<String>,
    pub failure_message: Option<String>,
}

/// Behaviour of the in-memory mock data layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub latency_ms: u64,
    /// Random extra latency in `0..=jitter_ms`
    pub jitter_ms: u64,
    /// Sections whose fetch always fails
    pub fail_sections: Vec<String>,
    /// Sections whose fetch never completes
    pub hang_sections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
    pub page_size: usize,
    pub theme: ThemeVariant,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            activation_delay_ms: DEFAULT_ACTIVATION_DELAY.as_millis() as u64,
            stale_policy: StalePolicy::default(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_MESSAGE.to_string(),
            failure: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1200,
            jitter_ms: 400,
            fail_sections: Vec::new(),
            hang_sections: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            page_size: 8,
            theme: ThemeVariant::default(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("dashdeck").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, or from the default location when `path` is `None`
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_from_file(&Self::default_path()?),
        }
    }

    /// Load configuration from file; a missing file yields defaults
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        for section in config.unknown_sections() {
            tracing::warn!("config names unknown section {}, ignoring it", section);
        }
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.loader.timeout_ms == 0 {
            return Err(ConfigError::invalid("loader.timeout_ms must be greater than 0"));
        }
        for (section, overrides) in &self.sections {
            if overrides.timeout_ms == Some(0) {
                return Err(ConfigError::invalid(format!(
                    "sections.{}.timeout_ms must be greater than 0",
                    section
                )));
            }
        }
        if self.ui.page_size == 0 {
            return Err(ConfigError::invalid("ui.page_size must be greater than 0"));
        }
        if self.ui.tick_rate_ms == 0 {
            return Err(ConfigError::invalid("ui.tick_rate_ms must be greater than 0"));
        }
        if let Some(section) = self
            .mock
            .fail_sections
            .iter()
            .find(|section| self.mock.hang_sections.contains(section))
        {
            return Err(ConfigError::invalid(format!(
                "section {} cannot both fail and hang",
                section
            )));
        }
        Ok(())
    }

    /// Section ids named in `[sections]` or `[mock]` that no dashboard defines
    pub fn unknown_sections(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .sections
            .keys()
            .chain(&self.mock.fail_sections)
            .chain(&self.mock.hang_sections)
            .map(String::as_str)
            .filter(|id| {
                !DashboardKind::value_variants()
                    .iter()
                    .any(|kind| kind.section(id).is_some())
            })
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }

    pub fn activation_delay(&self) -> Duration {
        Duration::from_millis(self.loader.activation_delay_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    /// Effective loader settings for one section.
    ///
    /// `failure_message` is the section's own message; an empty one falls
    /// back to `messages.failure`. Per-section overrides win over both.
    pub fn loader_settings(&self, section: &str, failure_message: &str) -> LoaderSettings {
        let overrides = self.sections.get(section).cloned().unwrap_or_default();

        let failure = overrides.failure_message.unwrap_or_else(|| {
            if failure_message.is_empty() {
                self.messages.failure.clone()
            } else {
                failure_message.to_string()
            }
        });

        LoaderSettings::default()
            .with_timeout(Duration::from_millis(
                overrides.timeout_ms.unwrap_or(self.loader.timeout_ms),
            ))
            .with_timeout_message(
                overrides
                    .timeout_message
                    .unwrap_or_else(|| self.messages.timeout.clone()),
            )
            .with_failure_message(failure)
            .with_stale_policy(self.loader.stale_policy)
    }

    /// Longest timeout any section can have
    pub fn max_timeout(&self) -> Duration {
        let longest = self
            .sections
            .values()
            .filter_map(|overrides| overrides.timeout_ms)
            .chain(std::iter::once(self.loader.timeout_ms))
            .max()
            .unwrap_or(self.loader.timeout_ms);
        Duration::from_millis(longest)
    }
}
