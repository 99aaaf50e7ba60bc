//! Per-transaction risk scoring
//!
//! Weighted additive rules: every rule that fires adds a fixed number of
//! points and records a flag naming it. The total is clamped to 0-100 and
//! banded into a [`RiskLevel`].

use crate::jurisdictions::JurisdictionSet;
use crate::{EngineError, Result, Transaction, TransactionType};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Discrete risk band
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low, // < 25
    Medium,   // 25 - <50
    High,     // 50 - <75
    Critical, // >= 75
}

impl RiskLevel {
    /// Band a score; lower bounds are inclusive
    pub fn from_score(score: f64) -> Self {
        if score >= 75.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::High
        } else if score >= 25.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// One rung of the amount ladder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountTier {
    /// Exclusive lower bound
    pub threshold: f64,
    pub points: f64,
    pub label: String,
}

impl AmountTier {
    fn new(threshold: f64, points: f64, label: &str) -> Self {
        Self {
            threshold,
            points,
            label: label.to_string(),
        }
    }
}

/// Thresholds, weights and flag wording for every scoring rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringRules {
    /// Ordered from the highest threshold down; only the first match applies
    pub amount_tiers: Vec<AmountTier>,
    pub cross_border_points: f64,
    pub cross_border_flag: String,
    pub front_business_points: f64,
    pub front_business_flag: String,
    pub jurisdiction_points: f64,
    pub jurisdiction_flag: String,
    pub high_risk_jurisdictions: JurisdictionSet,
    pub crypto_points: f64,
    pub crypto_flag: String,
    pub cash_deposit_threshold: f64,
    pub cash_deposit_points: f64,
    pub cash_deposit_flag: String,
    /// Exclusive bounds of the just-below-reporting-threshold band
    pub structuring_lower: f64,
    pub structuring_upper: f64,
    pub structuring_points: f64,
    pub structuring_flag: String,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            amount_tiers: vec![
                AmountTier::new(5_000_000.0, 30.0, "Extremely Large Amount"),
                AmountTier::new(1_000_000.0, 20.0, "Large Amount"),
                AmountTier::new(100_000.0, 10.0, "Elevated Amount"),
            ],
            cross_border_points: 15.0,
            cross_border_flag: "Cross-Border Transfer".to_string(),
            front_business_points: 35.0,
            front_business_flag: "Front Business Indicator".to_string(),
            jurisdiction_points: 25.0,
            jurisdiction_flag: "High-Risk Jurisdiction".to_string(),
            high_risk_jurisdictions: JurisdictionSet::scoring_default(),
            crypto_points: 20.0,
            crypto_flag: "Crypto Exchange".to_string(),
            cash_deposit_threshold: 50_000.0,
            cash_deposit_points: 25.0,
            cash_deposit_flag: "Large Cash Deposit".to_string(),
            structuring_lower: 9_000.0,
            structuring_upper: 10_000.0,
            structuring_points: 40.0,
            structuring_flag: "Potential Structuring".to_string(),
        }
    }
}

impl ScoringRules {
    pub fn validate(&self) -> Result<()> {
        if self
            .amount_tiers
            .windows(2)
            .any(|w| w[0].threshold <= w[1].threshold)
        {
            return Err(EngineError::InvalidConfig(
                "amount tiers must be ordered by strictly decreasing threshold".to_string(),
            ));
        }
        if self.structuring_lower >= self.structuring_upper {
            return Err(EngineError::InvalidConfig(format!(
                "structuring band is empty: ({}, {})",
                self.structuring_lower, self.structuring_upper
            )));
        }
        self.high_risk_jurisdictions.validate()
    }

    /// Amount lies strictly inside the structuring band
    pub fn is_structuring_amount(&self, amount: f64) -> bool {
        amount > self.structuring_lower && amount < self.structuring_upper
    }
}

/// Rule identifiers in evaluation order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    AmountTier,
    CrossBorder,
    FrontBusiness,
    Jurisdiction,
    CryptoExchange,
    CashDeposit,
    Structuring,
}

/// Points and flag contributed by one fired rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleContribution {
    pub rule: ScoringRule,
    pub points: f64,
    pub flag: String,
}

/// Result of scoring one transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub flags: Vec<String>,
}

/// Rule-based risk scorer
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    rules: ScoringRules,
}

impl RiskScorer {
    /// Create a scorer with the standard rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom rules
    pub fn with_rules(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Evaluate every rule and return the ones that fired, in evaluation order
    pub fn explain(&self, transaction: &Transaction) -> Vec<RuleContribution> {
        let rules = &self.rules;
        let amount = transaction.amount;
        let mut fired = Vec::new();
        let mut push = |rule, points, flag: &str| {
            fired.push(RuleContribution {
                rule,
                points,
                flag: flag.to_string(),
            })
        };

        if let Some(tier) = rules.amount_tiers.iter().find(|t| amount > t.threshold) {
            push(ScoringRule::AmountTier, tier.points, &tier.label);
        }

        if transaction.is_overseas {
            push(
                ScoringRule::CrossBorder,
                rules.cross_border_points,
                &rules.cross_border_flag,
            );
        }

        if transaction.is_front_business {
            push(
                ScoringRule::FrontBusiness,
                rules.front_business_points,
                &rules.front_business_flag,
            );
        }

        if rules.high_risk_jurisdictions.contains(&transaction.to_country) {
            push(
                ScoringRule::Jurisdiction,
                rules.jurisdiction_points,
                &rules.jurisdiction_flag,
            );
        }

        // Type rules test different conditions and may both apply
        if transaction.transaction_type == TransactionType::CryptoExchange {
            push(
                ScoringRule::CryptoExchange,
                rules.crypto_points,
                &rules.crypto_flag,
            );
        }
        if transaction.transaction_type == TransactionType::CashDeposit
            && amount > rules.cash_deposit_threshold
        {
            push(
                ScoringRule::CashDeposit,
                rules.cash_deposit_points,
                &rules.cash_deposit_flag,
            );
        }

        if rules.is_structuring_amount(amount) {
            push(
                ScoringRule::Structuring,
                rules.structuring_points,
                &rules.structuring_flag,
            );
        }

        fired
    }

    /// Score a transaction
    pub fn score(&self, transaction: &Transaction) -> RiskAssessment {
        let fired = self.explain(transaction);
        let total: f64 = fired.iter().map(|c| c.points).sum();
        let risk_score = total.clamp(0.0, 100.0);

        RiskAssessment {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            flags: fired.into_iter().map(|c| c.flag).collect(),
        }
    }

    /// Write score, level and flags onto the transaction
    pub fn apply(&self, transaction: &mut Transaction) {
        let assessment = self.score(transaction);
        trace!(
            transaction_id = %transaction.id,
            risk_score = assessment.risk_score,
            "scored transaction"
        );
        transaction.risk_score = assessment.risk_score;
        transaction.risk_level = assessment.risk_level;
        transaction.flags = assessment.flags;
    }

    /// Score every transaction in the batch, preserving order
    pub fn score_batch(&self, mut transactions: Vec<Transaction>) -> Vec<Transaction> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            transactions.par_iter_mut().for_each(|t| self.apply(t));
        }
        #[cfg(not(feature = "parallel"))]
        transactions.iter_mut().for_each(|t| self.apply(t));

        debug!(
            batch_size = transactions.len(),
            critical = transactions
                .iter()
                .filter(|t| t.risk_level == RiskLevel::Critical)
                .count(),
            "scored batch"
        );
        transactions
    }
}
