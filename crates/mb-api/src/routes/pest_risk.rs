//! Pest-risk assessment endpoint.

use axum::Json;
use axum::extract::State;

use mb_protocol::{FarmConditions, RiskAssessment};

use crate::state::AppState;

/// POST /api/v1/pest-risk: assess farm conditions.
///
/// Always 200: internal failures surface as the fallback assessment.
pub async fn assess(
    State(state): State<AppState>,
    Json(farm): Json<FarmConditions>,
) -> Json<RiskAssessment> {
    tracing::debug!(season = %farm.season, tree_age = farm.tree_age, "pest risk requested");
    Json(state.engine.assess(&farm))
}
