//! Shared test harness for E2E integration tests.
//!
//! Builds the real router over a real engine, optionally backed by model
//! artifacts written to a temporary directory, and drives it through
//! `tower::oneshot`.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use mb_api::routes::build_router;
use mb_api::state::AppState;
use mb_pest_engine::EngineConfig;
use mb_pest_engine::artifacts::MODEL_FILE;

/// Shipped knowledge base at the workspace root.
pub fn knowledge_base_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/pest_management.json")
}

/// One-split forest on temperature (> 25 °C goes right).
///
/// `cool` and `hot` are the class weights of the two leaves, ordered
/// very_low, low, medium, high, very_high.
pub fn temperature_stump(cool: [f64; 5], hot: [f64; 5]) -> Value {
    json!({
        "n_features": 6,
        "n_classes": 5,
        "trees": [{
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [1, -2, -2],
            "threshold": [25.0, 0.0, 0.0],
            "value": [[0, 0, 0, 0, 0], cool, hot]
        }]
    })
}

/// Farm-condition JSON body.
pub fn farm(
    soil_ph: f64,
    temperature: f64,
    humidity: f64,
    rainfall: f64,
    season: &str,
    tree_age: u32,
) -> Value {
    json!({
        "soil_ph": soil_ph,
        "temperature": temperature,
        "humidity": humidity,
        "rainfall": rainfall,
        "season": season,
        "tree_age": tree_age,
    })
}

/// End-to-end harness wiring config → engine → advisor → router.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
    /// Keeps the model directory alive for the harness's lifetime.
    model_dir: Option<TempDir>,
}

impl TestHarness {
    /// Rule-based engine with the shipped knowledge base.
    pub fn rule_based() -> Self {
        let config = EngineConfig {
            model_dir: PathBuf::from("/nonexistent/models"),
            knowledge_base_path: knowledge_base_path(),
            ..EngineConfig::default()
        };
        Self::from_config(&config, None)
    }

    /// Rule-based engine whose knowledge base path does not exist.
    pub fn without_knowledge_base() -> Self {
        let config = EngineConfig {
            model_dir: PathBuf::from("/nonexistent/models"),
            knowledge_base_path: PathBuf::from("/nonexistent/kb.json"),
            ..EngineConfig::default()
        };
        Self::from_config(&config, None)
    }

    /// Engine loaded from a model directory holding `model` (and no
    /// encoders or scalers).
    pub fn with_model(model: Value) -> Self {
        Self::with_model_files(&[(MODEL_FILE, model.to_string().into_bytes())])
    }

    /// Engine loaded from a model directory with the given raw files.
    pub fn with_model_files(files: &[(&str, Vec<u8>)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        for (name, bytes) in files {
            std::fs::write(dir.path().join(name), bytes).unwrap();
        }
        let config = EngineConfig {
            model_dir: dir.path().to_path_buf(),
            knowledge_base_path: knowledge_base_path(),
            ..EngineConfig::default()
        };
        Self::from_config(&config, Some(dir))
    }

    fn from_config(config: &EngineConfig, model_dir: Option<TempDir>) -> Self {
        let state = AppState::from_config(config);
        let router = build_router(state.clone());
        Self {
            state,
            router,
            model_dir,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        self.send(req).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(req).await
    }

    /// POST /api/v1/pest-risk.
    pub async fn assess(&self, farm: Value) -> (StatusCode, Value) {
        self.post("/api/v1/pest-risk", farm).await
    }

    /// POST /api/v1/chat.
    pub async fn chat(&self, query: &str, farm: Option<Value>, user_id: Option<&str>) -> (StatusCode, Value) {
        let mut body = json!({ "query": query });
        if let Some(farm) = farm {
            body["farm"] = farm;
        }
        if let Some(user) = user_id {
            body["user_id"] = json!(user);
        }
        self.post("/api/v1/chat", body).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(Value::Null)
        };
        (status, json)
    }
}
