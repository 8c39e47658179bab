//! Configuration loading and validation.
//!
//! Sources are layered, later ones winning:
//! 1. Built-in defaults
//! 2. An optional configuration file (TOML, YAML or JSON, picked by extension)
//! 3. Environment variables prefixed with `RECALL_`, with `__` separating
//!    nested keys (e.g. `RECALL_REMINDER__DELAY_SECS=600`)

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_PREFIX: &str = "RECALL_";
const DATABASE_FILE: &str = "flashcards.db";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub study: StudyConfig,
    pub reminder: ReminderConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}
impl Default for DatabaseConfig {
    fn default() -> Self {
        let dir = ProjectDirs::from("", "", "recall").map(|dirs| dirs.data_dir().to_path_buf());
        Self { path: dir.unwrap_or_default().join(DATABASE_FILE) }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Horizontal drag distance beyond which releasing a card is a swipe.
    pub swipe_threshold: f32,
    pub feedback: FeedbackConfig,
}
impl Default for StudyConfig {
    fn default() -> Self {
        Self { swipe_threshold: 100.0, feedback: FeedbackConfig::default() }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub fade_ms: u64,
    pub hold_ms: u64,
}
impl FeedbackConfig {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}
impl Default for FeedbackConfig {
    fn default() -> Self {
        Self { fade_ms: 500, hold_ms: 1000 }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub delay_secs: u64,
    pub title: String,
    pub body: String,
}
impl ReminderConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}
impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_secs: 2 * 60 * 60,
            title: "Reminder".to_string(),
            body: "Do you want to continue learning?".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `recall_store=debug`.
    pub level: String,
    pub format: LogFormat,
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}

impl Config {
    /// Load configuration from defaults, an optional file, and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(file)?.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Defaults merged with the optional file, without the environment.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let Some(path) = file else {
            return Ok(figment);
        };
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "Loading configuration file");
        Ok(match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Extract and validate a configuration from any figment.
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid("database path is empty"));
        }
        if !self.study.swipe_threshold.is_finite() || self.study.swipe_threshold <= 0.0 {
            exn::bail!(ErrorKind::Invalid("swipe threshold must be a positive number"));
        }
        if self.logging.level.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("logging level is empty"));
        }
        Ok(())
    }
}
