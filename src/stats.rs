//! Batch summaries for the monitoring views

use crate::alerts::Alert;
use crate::{RiskLevel, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Reducer settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Scores strictly above this count as suspicious
    pub suspicious_cutoff: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            suspicious_cutoff: 70.0,
        }
    }
}

/// Headline counters for a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MonitoringStats {
    pub total_transactions: usize,
    pub suspicious_transactions: usize,
    pub active_alerts: usize,
    pub overseas_transactions: usize,
    pub front_business_transactions: usize,
    pub average_risk_score: f64,
}

/// Fold a scored batch and its alerts into headline counters
pub fn summarize(
    transactions: &[Transaction],
    alerts: &[Alert],
    config: &StatsConfig,
) -> MonitoringStats {
    let mut stats = transactions
        .iter()
        .fold(MonitoringStats::default(), |mut acc, t| {
            acc.total_transactions += 1;
            if t.risk_score > config.suspicious_cutoff {
                acc.suspicious_transactions += 1;
            }
            if t.is_overseas {
                acc.overseas_transactions += 1;
            }
            if t.is_front_business {
                acc.front_business_transactions += 1;
            }
            acc.average_risk_score += t.risk_score;
            acc
        });

    stats.active_alerts = alerts.iter().filter(|a| a.status.is_active()).count();
    stats.average_risk_score = if stats.total_transactions == 0 {
        0.0
    } else {
        stats.average_risk_score / stats.total_transactions as f64
    };
    stats
}

/// Count of transactions in each band
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl RiskDistribution {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut dist = Self::default();
        for t in transactions {
            match t.risk_level {
                RiskLevel::Low => dist.low += 1,
                RiskLevel::Medium => dist.medium += 1,
                RiskLevel::High => dist.high += 1,
                RiskLevel::Critical => dist.critical += 1,
            }
        }
        dist
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverseasAnalysis {
    pub total: usize,
    /// Overseas transactions above the suspicious cutoff
    pub high_risk: usize,
    /// Distinct destination countries
    pub jurisdictions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FrontBusinessAnalysis {
    pub total: usize,
    pub average_risk: f64,
    /// Distinct originating accounts
    pub flagged_entities: usize,
}

/// Breakdown behind the intelligence analysis view
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskAnalysis {
    pub distribution: RiskDistribution,
    pub overseas: OverseasAnalysis,
    pub front_business: FrontBusinessAnalysis,
}

impl RiskAnalysis {
    pub fn analyze(transactions: &[Transaction], config: &StatsConfig) -> Self {
        let overseas: Vec<&Transaction> = transactions.iter().filter(|t| t.is_overseas).collect();
        let fronts: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| t.is_front_business)
            .collect();

        let front_total_risk: f64 = fronts.iter().map(|t| t.risk_score).sum();

        Self {
            distribution: RiskDistribution::from_transactions(transactions),
            overseas: OverseasAnalysis {
                total: overseas.len(),
                high_risk: overseas
                    .iter()
                    .filter(|t| t.risk_score > config.suspicious_cutoff)
                    .count(),
                jurisdictions: overseas
                    .iter()
                    .map(|t| t.to_country.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
            },
            front_business: FrontBusinessAnalysis {
                total: fronts.len(),
                average_risk: front_total_risk / fronts.len().max(1) as f64,
                flagged_entities: fronts
                    .iter()
                    .map(|t| t.from_account.as_str())
                    .collect::<HashSet<_>>()
                    .len(),
            },
        }
    }
}
