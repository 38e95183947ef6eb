//! Configuration management for tariff-check
//!
//! The configuration is read from a TOML or YAML file (chosen by extension)
//! and re-read at the start of every polling cycle. Each cycle works on its
//! own immutable [`Config`] snapshot.

use crate::error::{Result, TariffError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Locations searched when no explicit config path is given
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "config.toml",
    "/etc/ttc/config.toml",
    "config.yaml",
    "/etc/ttc/config.yaml",
];

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// evcc forecast source and lookup ranges
    pub evcc: EvccConfig,

    /// Home Assistant target entity
    pub homeassistant: HomeAssistantConfig,

    /// Loop timing and verbosity
    pub global: GlobalConfig,

    /// Logging outputs
    pub logging: LoggingConfig,
}

/// Hour range used both for dispatch (`start <= now < end`) and for the
/// forecast lookup (`start..=end`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub start: u32,
    pub end: u32,
}

impl RangeConfig {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `hour` falls inside the half-open dispatch window
    pub const fn contains_hour(&self, hour: u32) -> bool {
        self.start <= hour && hour < self.end
    }
}

/// evcc connection and lookup ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvccConfig {
    /// evcc host, optionally with port (e.g. `192.168.1.20:7070`)
    pub host: String,

    /// Range evaluated during the morning shift
    pub morning: RangeConfig,

    /// Range evaluated during the afternoon shift
    pub afternoon: RangeConfig,
}

/// Home Assistant connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeAssistantConfig {
    /// Home Assistant host, optionally with port
    pub host: String,

    /// Long-lived access token
    pub token: String,

    /// Entity that receives the window string
    pub text_entityid: String,

    /// Publish the empty `0:00 - 0:00` window while off shift
    #[serde(default = "default_true")]
    pub publish_off_shift: bool,
}

impl HomeAssistantConfig {
    /// Token with everything but the last four characters hidden
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/// Loop timing and verbosity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Seconds between cycles; 0 disables the loop entirely
    pub interval: u64,

    /// Enable debug logging
    pub debug: bool,

    /// IANA timezone used to determine the current hour (host local time if unset)
    pub timezone: Option<String>,

    /// Stop the process when the forecast cannot be fetched
    #[serde(default = "default_true")]
    pub exit_on_fetch_error: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit level (TRACE, DEBUG, INFO, WARN, ERROR); overrides `global.debug`
    pub level: Option<String>,

    /// Emit JSON lines instead of plain text
    pub json_format: bool,

    /// Whether to log to stderr
    pub console_output: bool,

    /// Optional log file (or directory); rotated daily
    pub file: Option<String>,

    /// Number of rotated files to keep
    pub backup_count: u32,
}

impl Default for EvccConfig {
    fn default() -> Self {
        Self {
            host: "localhost:7070".to_string(),
            morning: RangeConfig::new(5, 12),
            afternoon: RangeConfig::new(12, 20),
        }
    }
}

impl Default for HomeAssistantConfig {
    fn default() -> Self {
        Self {
            host: "localhost:8123".to_string(),
            token: String::new(),
            text_entityid: "input_text.cheapest_tariff_window".to_string(),
            publish_off_shift: true,
        }
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            interval: 0,
            debug: false,
            timezone: None,
            exit_on_fetch_error: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            json_format: true,
            console_output: true,
            file: None,
            backup_count: 5,
        }
    }
}

/// On-disk encoding of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything that is not
    /// `.yaml`/`.yml` is read as TOML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

impl Config {
    /// Load configuration from a TOML or YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => toml::from_str(&contents)?,
            ConfigFormat::Yaml => serde_yaml::from_str(&contents)?,
        };
        Ok(config)
    }

    /// Resolve the config file: the explicit path if given, otherwise the
    /// first existing default location
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(path.to_path_buf());
            }
            return Err(TariffError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        DEFAULT_CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .ok_or_else(|| {
                TariffError::config(format!(
                    "No config file found (searched {})",
                    DEFAULT_CONFIG_PATHS.join(", ")
                ))
            })
    }

    /// Locate and read the config file, returning the path for later reloads
    pub fn load(explicit: Option<&Path>) -> Result<(PathBuf, Self)> {
        let path = Self::locate(explicit)?;
        let config = Self::from_file(&path)?;
        Ok((path, config))
    }

    /// Save configuration in the format implied by the file extension
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path) {
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.evcc.host.trim().is_empty() {
            return Err(TariffError::validation("evcc.host", "Host cannot be empty"));
        }

        for (field, range) in [
            ("evcc.morning", &self.evcc.morning),
            ("evcc.afternoon", &self.evcc.afternoon),
        ] {
            if range.start > range.end {
                return Err(TariffError::validation(
                    field,
                    format!(
                        "start ({}) must not be after end ({})",
                        range.start, range.end
                    ),
                ));
            }
        }

        if self.homeassistant.host.trim().is_empty() {
            return Err(TariffError::validation(
                "homeassistant.host",
                "Host cannot be empty",
            ));
        }

        if self.homeassistant.text_entityid.trim().is_empty() {
            return Err(TariffError::validation(
                "homeassistant.text_entityid",
                "Entity id cannot be empty",
            ));
        }

        if let Some(tz) = self.global.timezone.as_deref()
            && chrono_tz::Tz::from_str(tz).is_err()
        {
            return Err(TariffError::validation(
                "global.timezone",
                format!("Unknown timezone: {}", tz),
            ));
        }

        Ok(())
    }
}
