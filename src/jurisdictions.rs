//! Named high-risk jurisdiction sets
//!
//! Scoring, pattern detection and the cross-border monitor each carry their
//! own list of jurisdictions. They are kept as separate named sets so they
//! can be tuned (or replaced by fixtures in tests) independently.

use crate::{EngineError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordered, de-duplicated set of ISO 3166 alpha-2 country codes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "RawJurisdictionSet")]
pub struct JurisdictionSet {
    pub name: String,
    codes: Vec<String>,
}

/// Wire form, normalized through [`JurisdictionSet::new`] on load
#[derive(Deserialize)]
struct RawJurisdictionSet {
    name: String,
    #[serde(default)]
    codes: Vec<String>,
}

impl From<RawJurisdictionSet> for JurisdictionSet {
    fn from(raw: RawJurisdictionSet) -> Self {
        JurisdictionSet::new(&raw.name, raw.codes)
    }
}

impl JurisdictionSet {
    /// Create a set from country codes. Codes are upper-cased and duplicates dropped.
    pub fn new<I, S>(name: &str, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self {
            name: name.to_string(),
            codes: Vec::new(),
        };
        for code in codes {
            set.insert(code.as_ref());
        }
        set
    }

    /// Jurisdictions that add points to an individual transaction
    pub fn scoring_default() -> Self {
        Self::new("scoring", ["KY", "CH", "LI", "PA", "BZ", "VG"])
    }

    /// Jurisdictions counted by the offshore-concentration pattern
    pub fn offshore_default() -> Self {
        Self::new("offshore", ["KY", "CH", "LI", "PA", "BZ"])
    }

    /// Jurisdictions highlighted by corridor monitoring
    pub fn monitoring_default() -> Self {
        Self::new("monitoring", ["KY", "CH", "LI", "PA", "BZ", "VG", "BS", "AD"])
    }

    /// Add a code to the set
    pub fn insert(&mut self, code: &str) {
        let code = code.trim().to_uppercase();
        if !self.codes.contains(&code) {
            self.codes.push(code);
        }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c.eq_ignore_ascii_case(code.trim()))
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Check every code is a two-letter alpha code
    pub fn validate(&self) -> Result<()> {
        let code_regex = Regex::new(r"^[A-Z]{2}$")
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        match self.codes.iter().find(|c| !code_regex.is_match(c)) {
            Some(bad) => Err(EngineError::InvalidCountryCode(format!(
                "{} in jurisdiction set '{}'",
                bad, self.name
            ))),
            None => Ok(()),
        }
    }
}

/// Display name for the codes this engine commonly sees
pub fn country_name(code: &str) -> Option<&'static str> {
    let name = match code.to_uppercase().as_str() {
        "AD" => "Andorra",
        "AE" => "United Arab Emirates",
        "BN" => "Brunei Darussalam",
        "BS" => "Bahamas",
        "BZ" => "Belize",
        "CH" => "Switzerland",
        "CN" => "China",
        "GB" => "United Kingdom",
        "HK" => "Hong Kong",
        "ID" => "Indonesia",
        "JP" => "Japan",
        "KY" => "Cayman Islands",
        "LI" => "Liechtenstein",
        "MY" => "Malaysia",
        "PA" => "Panama",
        "PH" => "Philippines",
        "SG" => "Singapore",
        "TH" => "Thailand",
        "US" => "United States",
        "VG" => "British Virgin Islands",
        _ => return None,
    };
    Some(name)
}
