pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{IssueSeverity, RiskProfile, TemplateId};
pub use error::CoreError;
pub use structs::{
    Champion, PerformanceSnapshot, TemplateRecommendation, UsageRecord, ValidationFeedback,
    ValidationIssue,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn template_id_round_trips_through_wire_name() {
        for id in TemplateId::ALL {
            assert_eq!(TemplateId::from_str(id.as_str()).unwrap(), id);
        }
    }

    #[test]
    fn unknown_template_name_is_rejected() {
        assert!(TemplateId::from_str("momentum-ranker").is_err());
    }

    #[test]
    fn usage_record_serializes_with_wire_field_names() {
        let record = UsageRecord {
            iteration: 7,
            timestamp: chrono::Utc::now(),
            template_name: TemplateId::DefensiveTrend,
            sharpe_ratio: 1.25,
            validation_passed: true,
            exploration_mode: false,
            champion_based: true,
            match_score: 0.7,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["template_name"], "defensive_trend");
        assert_eq!(json["sharpe_ratio"], 1.25);
        assert_eq!(json["champion_based"], true);
    }
}
