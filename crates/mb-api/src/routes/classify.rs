//! Query classification endpoint.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use mb_advisor::validate_query;
use mb_protocol::QueryClassification;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub query: String,
}

/// POST /api/v1/classify: classify without answering.
pub async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Json<QueryClassification>> {
    let query = validate_query(&request.query)?;
    Ok(Json(state.advisor.classifier().classify(query)))
}
