//! # Rust AML Surveillance
//!
//! A memory-safe anti-money-laundering surveillance engine for batches of
//! cross-border financial transactions.
//!
//! ## Features
//!
//! - **Risk Scoring**: Weighted rules assign every transaction a 0-100 score,
//!   a risk band and the flags that explain it
//! - **Pattern Detection**: Batch-wide structuring, rapid movement,
//!   round-robin and offshore concentration checks
//! - **Monitoring Stats**: Headline counters, risk distribution and
//!   corridor rankings for the monitoring views
//! - **Configurable Rules**: Thresholds, weights and jurisdiction lists
//!   load from JSON
//!
//! Scoring, detection and reduction are pure functions over an in-memory
//! batch. The current time is always passed in by the caller.

pub mod alerts;
pub mod config;
pub mod entity;
pub mod jurisdictions;
pub mod pattern_detection;
pub mod risk_scoring;
pub mod route_analysis;
pub mod stats;

pub use alerts::{dangling_alerts, Alert, AlertSeverity, AlertStatus, AlertType};
pub use config::EngineConfig;
pub use entity::{identify_front_business_indicators, EntityProfile};
pub use jurisdictions::JurisdictionSet;
pub use pattern_detection::{PatternDetector, PatternRules, SuspiciousPattern};
pub use risk_scoring::{RiskAssessment, RiskLevel, RiskScorer, ScoringRules};
pub use route_analysis::{JurisdictionExposure, Route, RouteSummary};
pub use stats::{summarize, MonitoringStats, RiskAnalysis, StatsConfig};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

/// Engine errors. Scoring and detection never fail; these come from
/// configuration and upstream input checks.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid account: {0}")]
    InvalidAccount(String),

    #[error("Invalid country code: {0}")]
    InvalidCountryCode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Transaction type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    WireTransfer,
    CashDeposit,
    CryptoExchange,
    TradeFinance,
    Remittance,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::WireTransfer => write!(f, "wire_transfer"),
            TransactionType::CashDeposit => write!(f, "cash_deposit"),
            TransactionType::CryptoExchange => write!(f, "crypto_exchange"),
            TransactionType::TradeFinance => write!(f, "trade_finance"),
            TransactionType::Remittance => write!(f, "remittance"),
        }
    }
}

/// Workflow status, owned by case management
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Approved,
    Flagged,
    Investigating,
}

/// Transaction structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    /// Display-only pseudonym, see [`pseudonymize`]
    #[serde(default)]
    pub pseudo_id: String,
    pub amount: f64,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
    pub from_account: String,
    pub to_account: String,
    pub from_country: String,
    pub to_country: String,
    pub transaction_type: TransactionType,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub flags: Vec<String>,
    pub is_overseas: bool,
    #[serde(default)]
    pub is_front_business: bool,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl Transaction {
    /// Create an unscored transaction. Parties default to empty and must be
    /// set with [`from_party`](Self::from_party) and [`to_party`](Self::to_party).
    pub fn new(
        id: &str,
        transaction_type: TransactionType,
        amount: f64,
        currency: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            pseudo_id: String::new(),
            amount,
            currency: currency.to_string(),
            timestamp,
            from_account: String::new(),
            to_account: String::new(),
            from_country: String::new(),
            to_country: String::new(),
            transaction_type,
            risk_score: 0.0,
            risk_level: RiskLevel::Low,
            flags: Vec::new(),
            is_overseas: false,
            is_front_business: false,
            status: TransactionStatus::Pending,
        }
    }

    pub fn from_party(mut self, account: &str, country: &str) -> Self {
        self.from_account = account.to_string();
        self.from_country = country.to_uppercase();
        self
    }

    pub fn to_party(mut self, account: &str, country: &str) -> Self {
        self.to_account = account.to_string();
        self.to_country = country.to_uppercase();
        self
    }

    pub fn front_business(mut self, is_front_business: bool) -> Self {
        self.is_front_business = is_front_business;
        self
    }

    pub fn with_pseudo_id(mut self, pseudo_id: &str) -> Self {
        self.pseudo_id = pseudo_id.to_string();
        self
    }

    /// Derive `is_overseas` relative to the home jurisdiction
    pub fn with_home_country(mut self, home_country: &str) -> Self {
        self.refresh_overseas(home_country);
        self
    }

    pub fn refresh_overseas(&mut self, home_country: &str) {
        self.is_overseas = !self.to_country.eq_ignore_ascii_case(home_country);
    }

    /// Upstream input check. The scorer itself accepts any value.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "{}: amount is not a finite number",
                self.id
            )));
        }
        if self.amount < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "{}: amount {} is negative",
                self.id, self.amount
            )));
        }
        if self.from_account.is_empty() || self.to_account.is_empty() {
            return Err(EngineError::InvalidAccount(format!(
                "{}: both accounts are required",
                self.id
            )));
        }
        Ok(())
    }
}

/// Display pseudonym: `PSI_` followed by 8 hex digits of SHA-256(salt ‖ value)
pub fn pseudonymize(value: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest[..4].iter().map(|b| format!("{:02X}", b)).collect();
    format!("PSI_{}", hex)
}

/// A record refused by the input check, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedTransaction {
    pub transaction: Transaction,
    pub reason: String,
}

/// Everything one surveillance cycle produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveillanceReport {
    pub generated_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub patterns: Vec<String>,
    pub stats: MonitoringStats,
    pub analysis: RiskAnalysis,
    pub corridors: Vec<RouteSummary>,
    pub jurisdictions: Vec<JurisdictionExposure>,
    pub rejected: Vec<RejectedTransaction>,
}

impl SurveillanceReport {
    /// Highest-scoring transactions first
    pub fn top_risk(&self, n: usize) -> Vec<&Transaction> {
        let mut ranked: Vec<&Transaction> = self.transactions.iter().collect();
        ranked.sort_by(|a, b| {
            b.risk_score
                .partial_cmp(&a.risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(n);
        ranked
    }

    pub fn has_patterns(&self) -> bool {
        !self.patterns.is_empty()
    }

    /// Export as JSON
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

const CORRIDOR_LIMIT: usize = 15;
const JURISDICTION_LIMIT: usize = 10;

/// Runs scoring, pattern detection and the reducers over one batch
#[derive(Debug, Clone)]
pub struct SurveillanceEngine {
    config: EngineConfig,
    scorer: RiskScorer,
    detector: PatternDetector,
}

impl SurveillanceEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            scorer: RiskScorer::with_rules(config.scoring.clone()),
            detector: PatternDetector::with_rules(config.patterns.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    pub fn detector(&self) -> &PatternDetector {
        &self.detector
    }

    /// Run one cycle. The batch is taken by value so the producer cannot
    /// mutate it mid-cycle.
    pub fn run_cycle(
        &self,
        batch: Vec<Transaction>,
        alerts: &[Alert],
        now: DateTime<Utc>,
    ) -> SurveillanceReport {
        let mut accepted = Vec::with_capacity(batch.len());
        let mut rejected = Vec::new();

        for mut transaction in batch {
            match transaction.validate() {
                Ok(()) => {
                    transaction.refresh_overseas(&self.config.home_country);
                    accepted.push(transaction);
                }
                Err(e) => {
                    warn!(transaction_id = %transaction.id, error = %e, "rejected transaction");
                    rejected.push(RejectedTransaction {
                        transaction,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let transactions = self.scorer.score_batch(accepted);
        let patterns = self.detector.detect(&transactions, now);
        let stats = summarize(&transactions, alerts, &self.config.stats);
        let analysis = RiskAnalysis::analyze(&transactions, &self.config.stats);
        let corridors = route_analysis::analyze_routes(
            &transactions,
            self.config.stats.suspicious_cutoff,
            CORRIDOR_LIMIT,
        );
        let jurisdictions = route_analysis::analyze_jurisdictions(
            &transactions,
            &self.config.monitoring_jurisdictions,
            self.config.stats.suspicious_cutoff,
            JURISDICTION_LIMIT,
        );

        let dangling = dangling_alerts(alerts, &transactions).len();
        if dangling > 0 {
            warn!(dangling, "alerts reference transactions outside this batch");
        }

        info!(
            total = stats.total_transactions,
            suspicious = stats.suspicious_transactions,
            rejected = rejected.len(),
            patterns = patterns.len(),
            average_risk = stats.average_risk_score,
            "surveillance cycle complete"
        );

        SurveillanceReport {
            generated_at: now,
            transactions,
            patterns,
            stats,
            analysis,
            corridors,
            jurisdictions,
            rejected,
        }
    }
}

impl Default for SurveillanceEngine {
    fn default() -> Self {
        Self::new()
    }
}
