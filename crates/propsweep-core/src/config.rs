//! Configuration management for propsweep
//!
//! Handles loading and validation of `propsweep.toml` files.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pattern::{DEFAULT_PATTERN, NamePattern};
use crate::tester::DEFAULT_ITERATIONS;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "propsweep.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Tester settings
    pub tester: TesterConfig,

    /// Logging settings
    pub logging: LogConfig,
}

/// Tester configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TesterConfig {
    /// Naming pattern for candidates (regex, case-insensitive, start-anchored)
    pub pattern: String,

    /// Repetitions per property; must be positive
    pub iterations: i64,

    /// Optional plain-text report destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,

    /// Module sources to scan, by catalog name
    pub modules: Vec<String>,

    /// Class sources to scan, by catalog name
    pub classes: Vec<String>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            iterations: i64::from(DEFAULT_ITERATIONS),
            report: None,
            modules: Vec::new(),
            classes: Vec::new(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown log format: {s}. Expected one of: pretty, json")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error)
    /// Can be overridden by RUST_LOG environment variable
    pub level: String,

    /// Output format (pretty or json)
    pub format: LogFormat,

    /// Optional path to log file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::ReadFailed(path.display().to_string(), err.to_string()))?;
        let config = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::ParseFailed(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything that can be checked before a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tester = &self.tester;
        if tester.iterations <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "tester.iterations must be positive, got {}",
                tester.iterations
            )));
        }
        if u32::try_from(tester.iterations).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "tester.iterations is too large: {}",
                tester.iterations
            )));
        }
        NamePattern::new(&tester.pattern)
            .map_err(|err| ConfigError::ValidationError(format!("tester.pattern: {err}")))?;
        if !tester.modules.is_empty() && !tester.classes.is_empty() {
            return Err(ConfigError::ValidationError(
                "tester.modules and tester.classes are mutually exclusive".to_string(),
            ));
        }
        if self.logging.level.parse::<crate::logging::LogLevel>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "logging.level: unknown level `{}`",
                self.logging.level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.tester.pattern, "prop_");
        assert_eq!(config.tester.iterations, 100);
        assert!(config.tester.report.is_none());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        config.validate().unwrap();
    }

    #[test]
    fn parse_full_file() {
        let config = Config::parse(
            r#"
            [tester]
            pattern = "law_"
            iterations = 25
            report = "out/report.txt"
            classes = ["sortingTests"]

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.tester.pattern, "law_");
        assert_eq!(config.tester.iterations, 25);
        assert_eq!(config.tester.report, Some(PathBuf::from("out/report.txt")));
        assert_eq!(config.tester.classes, vec!["sortingTests"]);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config = Config::parse("[tester]\niterations = 5\n").unwrap();
        assert_eq!(config.tester.pattern, "prop_");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn rejects_non_positive_iterations() {
        for text in ["[tester]\niterations = 0\n", "[tester]\niterations = -3\n"] {
            let err = Config::parse(text).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)), "{err}");
        }
    }

    #[test]
    fn rejects_malformed_pattern() {
        let err = Config::parse("[tester]\npattern = \"prop_(\"\n").unwrap_err();
        assert!(err.to_string().contains("tester.pattern"));
    }

    #[test]
    fn rejects_wrong_pattern_type() {
        let err = Config::parse("[tester]\npattern = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::parse("[tester]\niters = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }

    #[test]
    fn rejects_modules_and_classes_together() {
        let err = Config::parse("[tester]\nmodules = [\"a\"]\nclasses = [\"B\"]\n").unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = Config::parse("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/propsweep.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tester]\niterations = 12\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.tester.iterations, 12);
    }

    #[test]
    fn log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn example_file_parses() {
        let config = Config::parse(include_str!("../../../propsweep.example.toml")).unwrap();
        assert_eq!(config.tester.modules, vec!["arithmetic"]);
        assert!(config.tester.report.is_none());
    }

    #[test]
    fn config_serializes_to_toml() {
        let text = toml::to_string(&Config::default()).unwrap();
        let back = Config::parse(&text).unwrap();
        assert_eq!(back.tester.iterations, 100);
    }
}
