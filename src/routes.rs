use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::TranslationError;
use crate::state::AppState;
use crate::types::TranslationResponse;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/translate", get(translate))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "lingo-backend"
    }))
}

#[derive(Debug, Deserialize)]
struct TranslateParams {
    #[serde(default)]
    phrase: String,
    #[serde(rename = "sourceLang", default)]
    source_lang: String,
    #[serde(rename = "targetLang", default)]
    target_lang: String,
}

async fn translate(
    State(state): State<AppState>,
    Query(params): Query<TranslateParams>,
) -> Result<Json<TranslationResponse>, TranslationError> {
    if params.phrase.trim().is_empty() {
        return Err(TranslationError::InvalidInput(
            "query parameter 'phrase' is required".to_string(),
        ));
    }
    if params.source_lang.trim().is_empty() {
        return Err(TranslationError::InvalidInput(
            "query parameter 'sourceLang' is required".to_string(),
        ));
    }
    if params.target_lang.trim().is_empty() {
        return Err(TranslationError::InvalidInput(
            "query parameter 'targetLang' is required".to_string(),
        ));
    }

    let result = state
        .engine
        .translate(&params.phrase, &params.source_lang, &params.target_lang)
        .await;

    if let Err(err) = &result {
        error!(phrase = %params.phrase, %err, "translation request failed");
    }

    result.map(Json)
}
