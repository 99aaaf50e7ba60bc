//! Front-business indicators for counterparty entities
//!
//! These checks feed `Transaction::is_front_business` upstream of scoring.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Registered counterparty profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityProfile {
    pub id: String,
    pub name: String,
    pub country: String,
    pub registration_date: DateTime<Utc>,
    pub total_transaction_volume: f64,
    pub reported_revenue: f64,
    pub ownership_layers: u32,
}

impl EntityProfile {
    /// True when any shell-company indicator fires
    pub fn is_front_business_suspect(&self, now: DateTime<Utc>) -> bool {
        !identify_front_business_indicators(self, now).is_empty()
    }
}

const VOLUME_TO_REVENUE_RATIO: f64 = 2.0;
const RECENT_INCORPORATION_DAYS: i64 = 90;
const RECENT_ENTITY_VOLUME: f64 = 1_000_000.0;
const MAX_OWNERSHIP_LAYERS: u32 = 3;

/// List the shell-company indicators an entity shows as of `now`
pub fn identify_front_business_indicators(
    entity: &EntityProfile,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut indicators = Vec::new();

    if entity.total_transaction_volume > entity.reported_revenue * VOLUME_TO_REVENUE_RATIO {
        indicators.push("Transaction volume exceeds reported business activity".to_string());
    }

    let age = now.signed_duration_since(entity.registration_date);
    if age < Duration::days(RECENT_INCORPORATION_DAYS)
        && entity.total_transaction_volume > RECENT_ENTITY_VOLUME
    {
        indicators.push("High transaction volume for recently incorporated entity".to_string());
    }

    if entity.ownership_layers > MAX_OWNERSHIP_LAYERS {
        indicators.push("Complex multi-layered ownership structure".to_string());
    }

    indicators
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn create_test_entity() -> EntityProfile {
        EntityProfile {
            id: "ent_0001".to_string(),
            name: "Seri Trading Sdn Bhd".to_string(),
            country: "BN".to_string(),
            registration_date: now() - Duration::days(3650),
            total_transaction_volume: 500_000.0,
            reported_revenue: 400_000.0,
            ownership_layers: 1,
        }
    }

    #[test]
    fn test_established_entity_is_clean() {
        let entity = create_test_entity();
        assert!(identify_front_business_indicators(&entity, now()).is_empty());
        assert!(!entity.is_front_business_suspect(now()));
    }

    #[test]
    fn test_volume_exceeds_revenue() {
        let mut entity = create_test_entity();
        entity.total_transaction_volume = 800_001.0;
        assert_eq!(
            identify_front_business_indicators(&entity, now()),
            vec!["Transaction volume exceeds reported business activity"]
        );
    }

    #[test]
    fn test_recent_incorporation() {
        let mut entity = create_test_entity();
        entity.registration_date = now() - Duration::days(30);
        entity.total_transaction_volume = 1_500_000.0;
        entity.reported_revenue = 1_000_000.0;

        let indicators = identify_front_business_indicators(&entity, now());
        assert_eq!(
            indicators,
            vec!["High transaction volume for recently incorporated entity"]
        );

        // Same entity a year later
        let later = now() + Duration::days(365);
        assert!(identify_front_business_indicators(&entity, later).is_empty());
    }

    #[test]
    fn test_all_indicators_in_order() {
        let mut entity = create_test_entity();
        entity.registration_date = now() - Duration::days(10);
        entity.total_transaction_volume = 5_000_000.0;
        entity.ownership_layers = 4;

        let indicators = identify_front_business_indicators(&entity, now());
        assert_eq!(indicators.len(), 3);
        assert_eq!(indicators[2], "Complex multi-layered ownership structure");
        assert!(entity.is_front_business_suspect(now()));
    }
}
