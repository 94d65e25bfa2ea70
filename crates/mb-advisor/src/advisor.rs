//! Chat orchestration: classify, predict, advise, compose, remember.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use mb_pest_engine::PestRiskEngine;
use mb_protocol::{
    ChatRequest, ChatResponse, ConversationSummary, Domain, HistoryEntry, PredictionNeed,
    ResponseComponents,
};

use crate::classifier::QueryClassifier;
use crate::error::{AdvisorError, AdvisorResult};
use crate::pest_advisor::PestAdvisor;

/// Remembered exchanges; older ones are dropped first.
pub const HISTORY_LIMIT: usize = 50;

pub const MAX_QUERY_CHARS: usize = 2000;

const SUMMARY_CHARS: usize = 200;
const RECENT_TOPICS: usize = 5;
const TOP_RECOMMENDATIONS: usize = 3;

pub const INSUFFICIENT_FARM_DATA: &str = "Insufficient farm data for predictions: provide soil_ph, temperature, humidity, rainfall, season and tree_age";

/// Trimmed query, or an error if it is empty or longer than [`MAX_QUERY_CHARS`].
pub fn validate_query(query: &str) -> AdvisorResult<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AdvisorError::EmptyQuery);
    }
    let len = query.chars().count();
    if len > MAX_QUERY_CHARS {
        return Err(AdvisorError::QueryTooLong {
            len,
            max: MAX_QUERY_CHARS,
        });
    }
    Ok(query)
}

/// One-paragraph reply used when nothing more specific was produced.
pub fn fallback_reply(domain: Domain) -> &'static str {
    match domain {
        Domain::Planting => {
            "For macadamia planting advice, I recommend focusing on site selection with well-draining soil, proper spacing (8m x 8m), and choosing appropriate varieties for your climate. Would you like specific guidance on any of these aspects?"
        }
        Domain::PestManagement => {
            "For pest management, regular monitoring is key. Check your trees weekly for signs of pests like nut borers or stink bugs. Organic treatments like neem oil and beneficial insects can be very effective. What specific pest concerns do you have?"
        }
        Domain::Fertilization => {
            "Macadamia trees benefit from organic fertilization with compost, aged manure, and balanced organic fertilizers. Soil testing annually helps determine specific nutrient needs. What's your current fertilization program?"
        }
        Domain::Harvesting => {
            "Harvest timing is crucial for nut quality. Wait for nuts to fall naturally, collect within 2-3 days, and process promptly. Proper drying to 1.5-3.5% moisture is essential. What stage of harvest are you at?"
        }
        Domain::Certification => {
            "Organic certification requires 3-year transition period, detailed record keeping, and use of approved inputs only. Start documenting everything now, even before formal certification begins. Which certification are you pursuing?"
        }
        Domain::General => {
            "I'm here to help with all aspects of macadamia farming! I can provide advice on planting, pest management, fertilization, harvesting, and organic certification. What specific area would you like to discuss?"
        }
    }
}

/// Shared across request handlers; history is the only mutable state.
pub struct Advisor {
    engine: Arc<PestRiskEngine>,
    classifier: QueryClassifier,
    pest_advisor: PestAdvisor,
    history: RwLock<VecDeque<HistoryEntry>>,
}

impl Advisor {
    pub fn new(engine: Arc<PestRiskEngine>) -> Self {
        let pest_advisor = PestAdvisor::new(engine.knowledge().clone());
        Self {
            engine,
            classifier: QueryClassifier::new(),
            pest_advisor,
            history: RwLock::new(VecDeque::with_capacity(HISTORY_LIMIT)),
        }
    }

    pub fn engine(&self) -> &Arc<PestRiskEngine> {
        &self.engine
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn pest_advisor(&self) -> &PestAdvisor {
        &self.pest_advisor
    }

    /// Answer one chat message and record it in the history.
    pub async fn respond(&self, request: &ChatRequest) -> AdvisorResult<ChatResponse> {
        let query = validate_query(&request.query)?;

        let classification = self.classifier.classify(query);
        let domain = classification.domain;
        let strategy = &classification.response_strategy;

        let mut components = ResponseComponents::default();

        if strategy.use_ml_predictions && strategy.prediction_types.contains(&PredictionNeed::PestRisk) {
            match &request.farm {
                Some(farm) => components.pest_risk = Some(self.engine.assess(farm)),
                None => {
                    tracing::debug!("pest risk requested without farm conditions");
                    components.prediction_error = Some(INSUFFICIENT_FARM_DATA.into());
                }
            }
        }

        if domain == Domain::PestManagement {
            let season = request.farm.as_ref().map(|f| f.season.as_str());
            components.pest_advice = Some(self.pest_advisor.advise(query, season));
        }

        let final_response = compose(&components, domain);
        let followup_questions = self.classifier.followup_questions(domain);

        self.remember(HistoryEntry {
            timestamp: Utc::now(),
            user_id: request.user_id.clone(),
            user_input: query.to_string(),
            domain,
            response_summary: summarize(&final_response),
        })
        .await;

        tracing::info!(
            domain = domain.as_str(),
            pest_risk = components.pest_risk.is_some(),
            user_id = request.user_id.as_deref().unwrap_or("-"),
            "chat response generated"
        );

        Ok(ChatResponse {
            id: Uuid::now_v7(),
            user_query: query.to_string(),
            domain,
            classification,
            components,
            final_response,
            followup_questions,
            timestamp: Utc::now(),
        })
    }

    async fn remember(&self, entry: HistoryEntry) {
        let mut history = self.history.write().await;
        if history.len() == HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(entry);
    }

    /// Remembered exchanges, oldest first, optionally for one user.
    pub async fn history(&self, user_id: Option<&str>) -> Vec<HistoryEntry> {
        self.history
            .read()
            .await
            .iter()
            .filter(|e| user_id.is_none() || e.user_id.as_deref() == user_id)
            .cloned()
            .collect()
    }

    pub async fn summary(&self, user_id: Option<&str>) -> ConversationSummary {
        let entries = self.history(user_id).await;

        let mut domains_discussed: Vec<(Domain, usize)> = Vec::new();
        for entry in &entries {
            match domains_discussed.iter_mut().find(|(d, _)| *d == entry.domain) {
                Some((_, count)) => *count += 1,
                None => domains_discussed.push((entry.domain, 1)),
            }
        }
        // Stable: equal counts keep first-seen order
        domains_discussed.sort_by(|a, b| b.1.cmp(&a.1));

        let recent_topics = entries
            .iter()
            .rev()
            .take(RECENT_TOPICS)
            .rev()
            .map(|e| e.user_input.clone())
            .collect();

        ConversationSummary {
            total_conversations: entries.len(),
            domains_discussed,
            recent_topics,
        }
    }
}

/// Risk block, top recommendations, expert advice; or the domain's fallback reply.
fn compose(components: &ResponseComponents, domain: Domain) -> String {
    let mut parts = Vec::new();

    if let Some(risk) = &components.pest_risk {
        let measure = match risk.confidence {
            Some(c) => format!("Confidence: {:.0}%", c * 100.0),
            None => format!("Risk Score: {:.0}%", risk.risk_score * 100.0),
        };
        parts.push(format!(
            "**Current Pest Risk Analysis:**\nRisk Level: {}\n{measure}",
            risk.overall_risk_level.title()
        ));

        if !risk.recommendations.is_empty() {
            let lines: Vec<String> = risk
                .recommendations
                .iter()
                .take(TOP_RECOMMENDATIONS)
                .map(|r| format!("• {r}"))
                .collect();
            parts.push(format!("**Immediate Recommendations:**\n{}", lines.join("\n")));
        }
    }

    if let Some(advice) = &components.pest_advice {
        parts.push(format!("**Expert Advice:**\n{}", advice.advice));
    }

    if parts.is_empty() {
        fallback_reply(domain).to_string()
    } else {
        parts.join("\n\n")
    }
}

fn summarize(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SUMMARY_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
