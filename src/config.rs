//! User configuration loaded from `<config dir>/screenboard/config.toml`.
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration directory available")]
    NoConfigDir,

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("encoding default config: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid utc_offset '{0}', expected e.g. \"-03:00\"")]
    InvalidOffset(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the marketplace REST API.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Screens requested per page.
    pub page_size: u32,
    /// Reference zone for date filters and the active check, e.g. `"-03:00"`.
    /// The local zone is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_radius_km: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 10,
            page_size: 100,
            utc_offset: None,
            default_radius_km: None,
        }
    }
}

impl Config {
    pub fn reference_offset(&self) -> Result<Option<FixedOffset>, ConfigError> {
        self.utc_offset.as_deref().map(parse_offset).transpose()
    }

    pub fn reference_zone(&self) -> Result<ReferenceZone, ConfigError> {
        Ok(self
            .reference_offset()?
            .map_or(ReferenceZone::Local, ReferenceZone::Fixed))
    }
}

/// Zone that date filters and the active check are evaluated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl ReferenceZone {
    pub fn now(self) -> DateTime<FixedOffset> {
        match self {
            ReferenceZone::Local => Local::now().fixed_offset(),
            ReferenceZone::Fixed(offset) => Utc::now().with_timezone(&offset),
        }
    }
}

/// Parses `"+HH:MM"`, `"-HH:MM"` or `"Z"`.
fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidOffset(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }
    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    if hours.len() != 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 14 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join("screenboard").join("config.toml"))
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<Config, ConfigError> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if !path.exists() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, toml).map_err(io_err)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(config);
    }

    let data = fs::read_to_string(path).map_err(io_err)?;
    let config: Config = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.reference_offset()?;
    Ok(config)
}
