//! Chat endpoint.

use axum::Json;
use axum::extract::State;

use mb_protocol::{ChatRequest, ChatResponse};

use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/v1/chat: answer a grower's question.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let response = state.advisor.respond(&request).await?;
    Ok(Json(response))
}
