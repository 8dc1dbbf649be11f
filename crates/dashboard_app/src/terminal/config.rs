//! `dashboard.ron` loading.
//!
//! Every field has a default, so a partial file (or no file at all) is
//! a valid configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dashboard_engine::{ApiSettings, EngineSettings};
use engine_logging::{engine_info, LogDestination};
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "./dashboard.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub dispatch_delay_ms: u64,
    pub log_destination: LogTarget,
    pub log_level: LogLevel,
    /// Token to start the session with, e.g. one issued by `:login` earlier.
    pub access_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        let engine = EngineSettings::default();
        Self {
            api_base_url: api.base_url,
            connect_timeout_ms: api.connect_timeout.as_millis() as u64,
            request_timeout_ms: api.request_timeout.map(|t| t.as_millis() as u64),
            dispatch_delay_ms: engine.dispatch_delay.as_millis() as u64,
            log_destination: LogTarget::default(),
            log_level: LogLevel::default(),
            access_token: None,
        }
    }
}

impl AppConfig {
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            dispatch_delay: Duration::from_millis(self.dispatch_delay_ms),
        }
    }
}

/// Reads the config at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    engine_info!("Loaded config from {:?}", path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load(&temp.path().join("absent.ron")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.dispatch_delay_ms, 100);
        assert_eq!(config.request_timeout_ms, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dashboard.ron");
        fs::write(
            &path,
            r#"(
                api_base_url: "https://api.example.com/api/v1",
                request_timeout_ms: Some(45000),
                log_destination: Both,
                log_level: Debug,
            )"#,
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(config.log_destination, LogTarget::Both);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.connect_timeout_ms, 10_000);
        let api = config.api_settings();
        assert_eq!(api.request_timeout, Some(Duration::from_secs(45)));
        assert_eq!(
            config.engine_settings().dispatch_delay,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn invalid_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("dashboard.ron");
        fs::write(&path, "(api_base_url: 42,").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
