//! Batch pattern detection
//!
//! Cross-transaction rules that no single record reveals: structuring
//! concentration, bursts of recent activity, accounts cycling funds and
//! concentration towards offshore jurisdictions. Each rule looks at the
//! whole batch and reports at most once.

use crate::jurisdictions::JurisdictionSet;
use crate::{EngineError, Result, Transaction};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Batch-level pattern thresholds. Counts must be exceeded, not met.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PatternRules {
    pub structuring_lower: f64,
    pub structuring_upper: f64,
    pub structuring_limit: usize,
    pub recency_window_hours: i64,
    pub recency_limit: usize,
    pub round_robin_limit: usize,
    /// Share of the batch (0.0-1.0) that must be exceeded
    pub offshore_ratio: f64,
    pub offshore_jurisdictions: JurisdictionSet,
}

impl Default for PatternRules {
    fn default() -> Self {
        Self {
            structuring_lower: 9_000.0,
            structuring_upper: 10_000.0,
            structuring_limit: 3,
            recency_window_hours: 24,
            recency_limit: 10,
            round_robin_limit: 5,
            offshore_ratio: 0.3,
            offshore_jurisdictions: JurisdictionSet::offshore_default(),
        }
    }
}

impl PatternRules {
    pub fn validate(&self) -> Result<()> {
        if self.structuring_lower >= self.structuring_upper {
            return Err(EngineError::InvalidConfig(format!(
                "pattern structuring band is empty: ({}, {})",
                self.structuring_lower, self.structuring_upper
            )));
        }
        if self.recency_window_hours <= 0 {
            return Err(EngineError::InvalidConfig(
                "recency window must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.offshore_ratio) {
            return Err(EngineError::InvalidConfig(format!(
                "offshore ratio {} outside [0, 1]",
                self.offshore_ratio
            )));
        }
        self.offshore_jurisdictions.validate()
    }
}

/// A pattern found in a batch, with the count that triggered it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum SuspiciousPattern {
    /// Several amounts just below the reporting threshold
    Structuring { count: usize },
    /// Many transactions inside the recency window
    RapidMovement { count: usize },
    /// Accounts originating more transactions than the limit
    RoundRobin { accounts: usize },
    /// Too large a share of the batch going offshore
    OffshoreConcentration { count: usize, total: usize },
}

impl std::fmt::Display for SuspiciousPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuspiciousPattern::Structuring { .. } => write!(
                f,
                "Potential structuring detected - multiple transactions just below reporting threshold"
            ),
            SuspiciousPattern::RapidMovement { .. } => {
                write!(f, "Rapid transaction movement detected in last 24 hours")
            }
            SuspiciousPattern::RoundRobin { .. } => {
                write!(f, "Round robin transaction pattern detected")
            }
            SuspiciousPattern::OffshoreConcentration { .. } => {
                write!(f, "High volume of transactions to offshore jurisdictions")
            }
        }
    }
}

/// Batch pattern detector
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    rules: PatternRules,
}

impl PatternDetector {
    /// Create a detector with the standard rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom rules
    pub fn with_rules(rules: PatternRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &PatternRules {
        &self.rules
    }

    /// Describe every pattern present in the batch
    pub fn detect(&self, transactions: &[Transaction], now: DateTime<Utc>) -> Vec<String> {
        self.detect_patterns(transactions, now)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Typed form of [`detect`](Self::detect), in rule order
    pub fn detect_patterns(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Vec<SuspiciousPattern> {
        let mut patterns = Vec::new();

        if let Some(pattern) = self.check_structuring(transactions) {
            patterns.push(pattern);
        }
        if let Some(pattern) = self.check_rapid_movement(transactions, now) {
            patterns.push(pattern);
        }
        if let Some(pattern) = self.check_round_robin(transactions) {
            patterns.push(pattern);
        }
        if let Some(pattern) = self.check_offshore_concentration(transactions) {
            patterns.push(pattern);
        }

        info!(
            batch_size = transactions.len(),
            patterns = patterns.len(),
            "pattern detection complete"
        );
        patterns
    }

    fn check_structuring(&self, transactions: &[Transaction]) -> Option<SuspiciousPattern> {
        let count = transactions
            .iter()
            .filter(|t| {
                t.amount > self.rules.structuring_lower && t.amount < self.rules.structuring_upper
            })
            .count();

        if count > self.rules.structuring_limit {
            debug!(count, "structuring pattern");
            return Some(SuspiciousPattern::Structuring { count });
        }
        None
    }

    fn check_rapid_movement(
        &self,
        transactions: &[Transaction],
        now: DateTime<Utc>,
    ) -> Option<SuspiciousPattern> {
        let window = Duration::hours(self.rules.recency_window_hours);
        let count = transactions
            .iter()
            .filter(|t| now.signed_duration_since(t.timestamp) < window)
            .count();

        if count > self.rules.recency_limit {
            debug!(count, "rapid movement pattern");
            return Some(SuspiciousPattern::RapidMovement { count });
        }
        None
    }

    fn check_round_robin(&self, transactions: &[Transaction]) -> Option<SuspiciousPattern> {
        let mut per_account: HashMap<&str, usize> = HashMap::new();
        for t in transactions {
            *per_account.entry(t.from_account.as_str()).or_default() += 1;
        }

        let accounts = per_account
            .values()
            .filter(|&&count| count > self.rules.round_robin_limit)
            .count();

        if accounts > 0 {
            debug!(accounts, "round robin pattern");
            return Some(SuspiciousPattern::RoundRobin { accounts });
        }
        None
    }

    fn check_offshore_concentration(
        &self,
        transactions: &[Transaction],
    ) -> Option<SuspiciousPattern> {
        if transactions.is_empty() {
            return None;
        }

        let total = transactions.len();
        let count = transactions
            .iter()
            .filter(|t| self.rules.offshore_jurisdictions.contains(&t.to_country))
            .count();

        if count as f64 > total as f64 * self.rules.offshore_ratio {
            debug!(count, total, "offshore concentration pattern");
            return Some(SuspiciousPattern::OffshoreConcentration { count, total });
        }
        None
    }
}
