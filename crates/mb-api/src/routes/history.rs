//! Conversation history endpoints.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use mb_protocol::{ConversationSummary, HistoryEntry};

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub user_id: Option<String>,
}

/// GET /api/v1/history: conversation summary, optionally for one user.
pub async fn summary(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<ConversationSummary> {
    Json(state.advisor.summary(params.user_id.as_deref()).await)
}

/// GET /api/v1/history/entries: remembered exchanges, oldest first.
pub async fn entries(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<HistoryEntry>> {
    Json(state.advisor.history(params.user_id.as_deref()).await)
}
