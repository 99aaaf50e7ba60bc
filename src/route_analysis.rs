//! Cross-border corridor analysis
//!
//! Groups a scored batch by `(origin, destination)` route and by country so
//! the monitor can rank corridors and jurisdictions by average risk.

use crate::jurisdictions::{country_name, JurisdictionSet};
use crate::Transaction;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Directed country pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    pub from_country: String,
    pub to_country: String,
}

impl Route {
    pub fn new(from_country: &str, to_country: &str) -> Self {
        Self {
            from_country: from_country.to_string(),
            to_country: to_country.to_string(),
        }
    }

    fn of(transaction: &Transaction) -> Self {
        Self::new(&transaction.from_country, &transaction.to_country)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.from_country, self.to_country)
    }
}

/// Running mean of risk scores
#[derive(Debug, Clone, Copy, Default)]
struct RiskAccumulator {
    count: usize,
    total_amount: f64,
    average_risk: f64,
    high_risk_count: usize,
}

impl RiskAccumulator {
    fn add(&mut self, transaction: &Transaction, high_risk_cutoff: f64) {
        self.count += 1;
        self.total_amount += transaction.amount;
        self.average_risk += (transaction.risk_score - self.average_risk) / self.count as f64;
        if transaction.risk_score > high_risk_cutoff {
            self.high_risk_count += 1;
        }
    }
}

/// Aggregate for one route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    pub route: Route,
    pub count: usize,
    pub total_amount: f64,
    pub average_risk: f64,
    /// Transactions scoring above the high-risk cutoff
    pub high_risk_count: usize,
}

impl RouteSummary {
    /// Share of the route's transactions that are high risk
    pub fn high_risk_share(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.high_risk_count as f64 / self.count as f64
    }
}

/// Aggregate for one country, counting both directions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JurisdictionExposure {
    pub country: String,
    /// Display name, when the code is a known one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    pub transaction_count: usize,
    pub total_amount: f64,
    pub average_risk: f64,
    pub high_risk_count: usize,
    /// Listed in the monitored jurisdiction set
    pub is_high_risk: bool,
}

fn by_average_risk_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Rank routes by average risk, highest first
pub fn analyze_routes(
    transactions: &[Transaction],
    high_risk_cutoff: f64,
    limit: usize,
) -> Vec<RouteSummary> {
    let mut routes: HashMap<Route, RiskAccumulator> = HashMap::new();

    for t in transactions {
        routes
            .entry(Route::of(t))
            .or_default()
            .add(t, high_risk_cutoff);
    }

    let mut summaries: Vec<RouteSummary> = routes
        .into_iter()
        .map(|(route, acc)| RouteSummary {
            route,
            count: acc.count,
            total_amount: acc.total_amount,
            average_risk: acc.average_risk,
            high_risk_count: acc.high_risk_count,
        })
        .collect();

    summaries.sort_by(|a, b| {
        by_average_risk_desc(a.average_risk, b.average_risk).then_with(|| a.route.cmp(&b.route))
    });
    summaries.truncate(limit);
    summaries
}

/// Rank countries by average risk, highest first
pub fn analyze_jurisdictions(
    transactions: &[Transaction],
    high_risk: &JurisdictionSet,
    high_risk_cutoff: f64,
    limit: usize,
) -> Vec<JurisdictionExposure> {
    let mut countries: HashMap<&str, RiskAccumulator> = HashMap::new();

    for t in transactions {
        for country in [t.from_country.as_str(), t.to_country.as_str()] {
            countries
                .entry(country)
                .or_default()
                .add(t, high_risk_cutoff);
        }
    }

    let mut exposures: Vec<JurisdictionExposure> = countries
        .into_iter()
        .map(|(country, acc)| JurisdictionExposure {
            country: country.to_string(),
            country_name: country_name(country).map(str::to_string),
            transaction_count: acc.count,
            total_amount: acc.total_amount,
            average_risk: acc.average_risk,
            high_risk_count: acc.high_risk_count,
            is_high_risk: high_risk.contains(country),
        })
        .collect();

    exposures.sort_by(|a, b| {
        by_average_risk_desc(a.average_risk, b.average_risk).then_with(|| a.country.cmp(&b.country))
    });
    exposures.truncate(limit);
    exposures
}
