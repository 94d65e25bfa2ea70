//! Pest knowledge base endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use mb_protocol::{PestId, SpecificPestAdvice};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Summary view of a pest (for list responses).
#[derive(Debug, Serialize)]
pub struct PestSummary {
    pub id: PestId,
    pub name: &'static str,
    pub scientific_name: String,
    pub peak_activity: String,
}

/// GET /api/v1/pests: pests present in the knowledge base.
pub async fn list_pests(State(state): State<AppState>) -> Json<Vec<PestSummary>> {
    let knowledge = state.engine.knowledge();
    let pests = PestId::ALL
        .into_iter()
        .filter_map(|id| {
            knowledge.entry(id).map(|e| PestSummary {
                id,
                name: id.display_name(),
                scientific_name: e.scientific_name.clone(),
                peak_activity: e.timing.clone(),
            })
        })
        .collect();
    Json(pests)
}

/// GET /api/v1/pests/:id: full advice for one pest.
pub async fn get_pest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SpecificPestAdvice>> {
    PestId::from_key(&id)
        .and_then(|pest| state.advisor.pest_advisor().pest_details(pest))
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("pest '{id}' not found")))
}
