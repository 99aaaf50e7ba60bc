//! Investigation alerts
//!
//! Alerts come from case management, not from the scoring engine. They point
//! at a transaction by id only, and that transaction may not be in the
//! current batch.

use crate::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Aml,
    Fraud,
    Corruption,
    Sanctions,
    Structuring,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Open,
    Investigating,
    Resolved,
    FalsePositive,
}

impl AlertStatus {
    /// Still needs analyst attention
    pub fn is_active(&self) -> bool {
        matches!(self, AlertStatus::Open | AlertStatus::Investigating)
    }
}

/// Alert raised against a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Alert {
    /// Create an open, unassigned alert with a fresh id
    pub fn new(
        transaction_id: &str,
        alert_type: AlertType,
        severity: AlertSeverity,
        message: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id: transaction_id.to_string(),
            alert_type,
            severity,
            message: message.to_string(),
            timestamp,
            status: AlertStatus::Open,
            assigned_to: None,
        }
    }

    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = status;
        self
    }

    pub fn assigned_to(mut self, analyst: &str) -> Self {
        self.assigned_to = Some(analyst.to_string());
        self
    }

    pub fn references(&self, transaction: &Transaction) -> bool {
        self.transaction_id == transaction.id
    }
}

/// Alerts whose transaction is not part of the batch
pub fn dangling_alerts<'a>(alerts: &'a [Alert], transactions: &[Transaction]) -> Vec<&'a Alert> {
    let ids: HashSet<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
    alerts
        .iter()
        .filter(|a| !ids.contains(a.transaction_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TransactionStatus, TransactionType};

    fn create_test_alert(transaction_id: &str) -> Alert {
        Alert::new(
            transaction_id,
            AlertType::Structuring,
            AlertSeverity::High,
            "Structuring pattern detected",
            Utc::now(),
        )
    }

    #[test]
    fn test_new_alert_is_open() {
        let alert = create_test_alert("txn_000001");
        assert_eq!(alert.status, AlertStatus::Open);
        assert!(alert.assigned_to.is_none());
        assert!(uuid::Uuid::parse_str(&alert.id).is_ok());
    }

    #[test]
    fn test_alert_ids_are_unique() {
        assert_ne!(create_test_alert("a").id, create_test_alert("a").id);
    }

    #[test]
    fn test_active_statuses() {
        assert!(AlertStatus::Open.is_active());
        assert!(AlertStatus::Investigating.is_active());
        assert!(!AlertStatus::Resolved.is_active());
        assert!(!AlertStatus::FalsePositive.is_active());
    }

    #[test]
    fn test_dangling_alerts() {
        let txn = Transaction::new(
            "txn_000001",
            TransactionType::Remittance,
            9_500.0,
            "BND",
            Utc::now(),
        )
        .from_party("ACC_A", "BN")
        .to_party("ACC_B", "SG");
        assert_eq!(txn.status, TransactionStatus::Pending);

        let alerts = vec![create_test_alert("txn_000001"), create_test_alert("txn_999999")];
        assert!(alerts[0].references(&txn));

        let dangling = dangling_alerts(&alerts, std::slice::from_ref(&txn));
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].transaction_id, "txn_999999");
    }

    #[test]
    fn test_alert_json_shape() {
        let alert = create_test_alert("txn_000001")
            .with_status(AlertStatus::FalsePositive)
            .assigned_to("analyst_07");

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "structuring");
        assert_eq!(json["status"], "false_positive");
        assert_eq!(json["assigned_to"], "analyst_07");

        let back: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(back.status, AlertStatus::FalsePositive);
    }
}
