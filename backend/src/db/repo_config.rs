//! Configuration file support.
//!
//! This module reads the repository backend and engine settings from a TOML
//! configuration file:
//!
//! ```toml
//! [repository]
//! type = "local"
//!
//! [engine]
//! timezone = "Europe/Madrid"
//! global_limit = 10
//! request_timeout_ms = 2000
//! ```

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Default number of streamers in the global programme and rankings.
pub const DEFAULT_GLOBAL_LIMIT: usize = 10;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgrammeConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub engine: EngineSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: "local".to_string(),
        }
    }
}

/// Prediction engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// IANA zone used to bin activity samples into hour and weekday.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_global_limit")]
    pub global_limit: usize,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            global_limit: default_global_limit(),
            request_timeout_ms: None,
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_global_limit() -> usize {
    DEFAULT_GLOBAL_LIMIT
}

impl ProgrammeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ProgrammeConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        let config: ProgrammeConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `programme.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("programme.toml"),
            PathBuf::from("backend/programme.toml"),
            PathBuf::from("../programme.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No programme.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Zone used for hour/weekday binning.
    pub fn timezone(&self) -> Result<Tz, RepositoryError> {
        self.engine.timezone.parse::<Tz>().map_err(|e| {
            RepositoryError::configuration(format!(
                "Invalid timezone '{}': {}",
                self.engine.timezone, e
            ))
        })
    }

    /// Global programme size; `0` falls back to the default.
    pub fn global_limit(&self) -> usize {
        if self.engine.global_limit == 0 {
            DEFAULT_GLOBAL_LIMIT
        } else {
            self.engine.global_limit
        }
    }

    /// Default request deadline, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.engine.request_timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), RepositoryError> {
        self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;
        self.timezone()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config = ProgrammeConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.timezone().unwrap(), chrono_tz::UTC);
        assert_eq!(config.global_limit(), DEFAULT_GLOBAL_LIMIT);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_parse_engine_section() {
        let toml = r#"
[repository]
type = "local"

[engine]
timezone = "America/New_York"
global_limit = 25
request_timeout_ms = 1500
"#;

        let config = ProgrammeConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
        assert_eq!(config.global_limit(), 25);
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_zero_global_limit_uses_default() {
        let config = ProgrammeConfig::from_toml_str("[engine]\nglobal_limit = 0\n").unwrap();
        assert_eq!(config.global_limit(), DEFAULT_GLOBAL_LIMIT);
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let err = ProgrammeConfig::from_toml_str("[engine]\ntimezone = \"Mars/Olympus\"\n")
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_unknown_repository_type_is_rejected() {
        let result = ProgrammeConfig::from_toml_str("[repository]\ntype = \"sqlite\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\ntimezone = \"Europe/Madrid\"").unwrap();

        let config = ProgrammeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Madrid);
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProgrammeConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
