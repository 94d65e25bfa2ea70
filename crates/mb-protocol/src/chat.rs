use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::farm::FarmConditions;
use crate::query::{Domain, QueryClassification};
use crate::risk::{PestId, RiskAssessment};

/// Inbound chat message with optional farm conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm: Option<FarmConditions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Knowledge-base detail for one pest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecificPestAdvice {
    pub pest: PestId,
    pub description: String,
    pub symptoms: Vec<String>,
    pub organic_treatments: Vec<String>,
    pub prevention: Vec<String>,
    pub timing: String,
}

/// Monitoring schedule guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSchedule {
    pub frequency: String,
    pub what_to_check: Vec<String>,
    pub record_keeping: Vec<String>,
}

/// Integrated pest management advice assembled for a pest query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestAdvice {
    /// Composed advice text.
    pub advice: String,
    /// Pest named in the query, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_pest: Option<PestId>,
    pub ipm_principles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pest_details: Option<SpecificPestAdvice>,
    pub seasonal_advice: String,
    pub monitoring_schedule: MonitoringSchedule,
    /// Organic options grouped by category, in presentation order.
    pub organic_treatments: Vec<(String, Vec<String>)>,
}

/// Pieces the final response text is built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pest_risk: Option<RiskAssessment>,
    /// Why a requested prediction could not be made.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pest_advice: Option<PestAdvice>,
}

/// Advisor reply to a chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response ID (UUIDv7 for time-sortability).
    pub id: Uuid,
    pub user_query: String,
    pub domain: Domain,
    pub classification: QueryClassification,
    pub components: ResponseComponents,
    pub final_response: String,
    pub followup_questions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// One remembered exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_input: String,
    pub domain: Domain,
    pub response_summary: String,
}

/// Aggregate view over remembered exchanges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub total_conversations: usize,
    /// Domain counts, most frequent first.
    pub domains_discussed: Vec<(Domain, usize)>,
    pub recent_topics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_without_farm() {
        let req: ChatRequest = serde_json::from_str(r#"{"query": "how to prune?"}"#).unwrap();
        assert_eq!(req.query, "how to prune?");
        assert!(req.farm.is_none());
        assert!(req.user_id.is_none());
    }

    #[test]
    fn chat_request_with_farm() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"query": "pest risk?", "farm": {"soil_ph": 6.2, "temperature": 22, "humidity": 65,
                "rainfall": 120, "season": "spring", "tree_age": 5}}"#,
        )
        .unwrap();
        let farm = req.farm.unwrap();
        assert_eq!(farm.tree_age, 5);
        assert!((farm.temperature - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_components_serialize_to_empty_object() {
        let json = serde_json::to_string(&ResponseComponents::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
