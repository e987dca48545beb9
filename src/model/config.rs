use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "DA_COVERAGE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Similarity above which a test counts as a (partial) match
pub const DEFAULT_PARTIAL_MATCH: f64 = 0.4;
/// Similarity above which a match is labelled full
pub const DEFAULT_FULL_MATCH: f64 = 0.6;
/// Coverage score at or above which a requirement is covered
pub const DEFAULT_COVERED: f64 = 60.0;
/// Scores below this are Critical gaps
pub const DEFAULT_CRITICAL_BELOW: f64 = 20.0;
/// Scores below this (and at or above critical) are High gaps
pub const DEFAULT_HIGH_BELOW: f64 = 40.0;
/// Number of best matches averaged into the coverage score
pub const DEFAULT_TOP_MATCHES: usize = 3;

/// Thresholds driving matching, scoring and gap classification
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverageThresholds {
    pub partial_match: f64,
    pub full_match: f64,
    pub covered: f64,
    pub critical_below: f64,
    pub high_below: f64,
    pub top_matches: usize,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            partial_match: DEFAULT_PARTIAL_MATCH,
            full_match: DEFAULT_FULL_MATCH,
            covered: DEFAULT_COVERED,
            critical_below: DEFAULT_CRITICAL_BELOW,
            high_below: DEFAULT_HIGH_BELOW,
            top_matches: DEFAULT_TOP_MATCHES,
        }
    }
}

impl CoverageThresholds {
    /// Check the thresholds are ordered consistently
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.partial_match) || !(0.0..=1.0).contains(&self.full_match) {
            return Err("match thresholds must lie in [0, 1]".to_string());
        }
        if self.partial_match > self.full_match {
            return Err(format!(
                "partial_match ({}) must not exceed full_match ({})",
                self.partial_match, self.full_match
            ));
        }
        if !(0.0 <= self.critical_below
            && self.critical_below <= self.high_below
            && self.high_below <= self.covered
            && self.covered <= 100.0)
        {
            return Err(
                "expected 0 <= critical_below <= high_below <= covered <= 100".to_string(),
            );
        }
        if self.top_matches == 0 {
            return Err("top_matches must be at least 1".to_string());
        }
        Ok(())
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub coverage: CoverageThresholds,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub thresholds: CoverageThresholds,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: CoverageThresholds::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let thresholds = Self::thresholds_from_file(&config_path);

        Self {
            thresholds,
            port,
            host,
        }
    }

    /// Coverage thresholds from the YAML file at `path`.
    ///
    /// A missing or unreadable file, or a threshold set that fails
    /// validation, yields the defaults.
    pub fn thresholds_from_file(path: &str) -> CoverageThresholds {
        let thresholds = Self::load_config_file(path)
            .map(|cf| cf.coverage)
            .unwrap_or_default();

        let thresholds = match thresholds.validate() {
            Ok(()) => thresholds,
            Err(reason) => {
                tracing::warn!(reason = %reason, "Invalid coverage thresholds, using defaults");
                CoverageThresholds::default()
            }
        };

        tracing::debug!(thresholds = ?thresholds, "Coverage thresholds");
        thresholds
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents).or_else(|| {
                tracing::warn!(path = %path.display(), "Failed to parse config file, using defaults");
                None
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config(contents: &str) -> Option<ConfigFile> {
        let contents = contents.trim();
        if contents.is_empty() {
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::debug!(error = %e, "YAML parse error");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CoverageThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let cf = Config::parse_config("coverage:\n  covered: 70.0\n  top_matches: 5\n").unwrap();
        assert_eq!(cf.coverage.covered, 70.0);
        assert_eq!(cf.coverage.top_matches, 5);
        assert_eq!(cf.coverage.partial_match, DEFAULT_PARTIAL_MATCH);
        assert_eq!(cf.coverage.high_below, DEFAULT_HIGH_BELOW);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let cf = Config::parse_config("   \n").unwrap();
        assert_eq!(cf.coverage, CoverageThresholds::default());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(Config::parse_config("coverage: [1, 2").is_none());
    }

    fn write_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "coverage-config-{}-{}.yaml",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_misordered_file_thresholds_fall_back_to_defaults() {
        let path = write_config("misordered", "coverage:\n  partial_match: 0.9\n");
        let thresholds = Config::thresholds_from_file(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();

        assert_eq!(thresholds, CoverageThresholds::default());
    }

    #[test]
    fn test_valid_file_thresholds_are_applied() {
        let path = write_config("valid", "coverage:\n  covered: 75.0\n  high_below: 50.0\n");
        let thresholds = Config::thresholds_from_file(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();

        assert_eq!(thresholds.covered, 75.0);
        assert_eq!(thresholds.high_below, 50.0);
        assert_eq!(thresholds.critical_below, DEFAULT_CRITICAL_BELOW);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("coverage-config-does-not-exist.yaml");
        assert_eq!(
            Config::thresholds_from_file(path.to_str().unwrap()),
            CoverageThresholds::default()
        );
    }

    #[test]
    fn test_bind_addr() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Config::default()
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_misordered_thresholds_fail_validation() {
        let thresholds = CoverageThresholds {
            partial_match: 0.7,
            ..CoverageThresholds::default()
        };
        assert!(thresholds.validate().is_err());

        let thresholds = CoverageThresholds {
            critical_below: 50.0,
            ..CoverageThresholds::default()
        };
        assert!(thresholds.validate().is_err());

        let thresholds = CoverageThresholds {
            top_matches: 0,
            ..CoverageThresholds::default()
        };
        assert!(thresholds.validate().is_err());
    }
}
