//! Engine configuration
//!
//! Every section defaults to the production constants, so a JSON file only
//! needs the values it overrides.

use crate::jurisdictions::JurisdictionSet;
use crate::pattern_detection::PatternRules;
use crate::risk_scoring::ScoringRules;
use crate::stats::StatsConfig;
use crate::{EngineError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Jurisdiction every monitored transaction originates from
    pub home_country: String,
    pub scoring: ScoringRules,
    pub patterns: PatternRules,
    pub stats: StatsConfig,
    /// Jurisdictions highlighted in corridor monitoring
    pub monitoring_jurisdictions: JurisdictionSet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            home_country: "BN".to_string(),
            scoring: ScoringRules::default(),
            patterns: PatternRules::default(),
            stats: StatsConfig::default(),
            monitoring_jurisdictions: JurisdictionSet::monitoring_default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let code_regex =
            Regex::new(r"^[A-Z]{2}$").map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        if !code_regex.is_match(&self.home_country) {
            return Err(EngineError::InvalidCountryCode(format!(
                "home country {}",
                self.home_country
            )));
        }

        self.scoring.validate()?;
        self.patterns.validate()?;
        self.monitoring_jurisdictions.validate()?;

        if !(0.0..=100.0).contains(&self.stats.suspicious_cutoff) {
            return Err(EngineError::InvalidConfig(format!(
                "suspicious cutoff {} outside [0, 100]",
                self.stats.suspicious_cutoff
            )));
        }
        Ok(())
    }

    /// Export as JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.home_country, "BN");
        assert_eq!(config.stats.suspicious_cutoff, 70.0);
        assert_eq!(config.patterns.offshore_ratio, 0.3);
        assert_eq!(config.scoring.amount_tiers.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{
                "home_country": "SG",
                "patterns": { "round_robin_limit": 8 },
                "stats": { "suspicious_cutoff": 60.0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.home_country, "SG");
        assert_eq!(config.patterns.round_robin_limit, 8);
        assert_eq!(config.patterns.structuring_limit, 3);
        assert_eq!(config.stats.suspicious_cutoff, 60.0);
        assert_eq!(config.scoring, ScoringRules::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_home_country() {
        let err = EngineConfig::from_json_str(r#"{ "home_country": "Brunei" }"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidCountryCode(_)));
    }

    #[test]
    fn test_invalid_structuring_band() {
        let err = EngineConfig::from_json_str(
            r#"{ "scoring": { "structuring_lower": 10000.0, "structuring_upper": 9000.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_jurisdiction_sets_normalized_on_load() {
        let config = EngineConfig::from_json_str(
            r#"{
                "patterns": {
                    "offshore_jurisdictions": {
                        "name": "offshore",
                        "codes": ["KY", "ky", " pa "]
                    }
                }
            }"#,
        )
        .unwrap();

        let offshore = &config.patterns.offshore_jurisdictions;
        assert_eq!(offshore.len(), 2);
        assert_eq!(offshore.codes(), &["KY".to_string(), "PA".to_string()]);
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "stats": {{ "suspicious_cutoff": 80.0 }} }}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.stats.suspicious_cutoff, 80.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
