use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AnalysisError;
use crate::food::types::AnalysisReport;
use crate::food::FoodAnalyzer;
use crate::ledger::{format_summary, DailyLedger, MealType};

/// Shared state behind the UI-facing routes. The ledger is only written by
/// the explicit commit/reset handlers; concurrent readers see either the
/// pre- or post-commit state.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<FoodAnalyzer>,
    ledger: Arc<RwLock<DailyLedger>>,
    pending: Arc<RwLock<Option<AnalysisReport>>>,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded image bytes in any format the decoder understands.
    image: String,
}

#[derive(Deserialize)]
pub struct LookupRequest {
    /// Comma-separated food names, bypassing recognition.
    foods: String,
}

#[derive(Deserialize)]
pub struct CommitRequest {
    meal: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    summary: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(StatusResponse { status: message })).into_response()
}

fn analysis_error_response(err: &AnalysisError) -> Response {
    let status = match err {
        AnalysisError::NetworkError(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        AnalysisError::EncodingFailed => StatusCode::UNPROCESSABLE_ENTITY,
        AnalysisError::EmptyResult => StatusCode::UNPROCESSABLE_ENTITY,
    };
    error_response(status, err.to_string())
}

/// Create and configure the API router
pub fn create_api(analyzer: FoodAnalyzer) -> Router {
    let state = AppState {
        analyzer: Arc::new(analyzer),
        ledger: Arc::new(RwLock::new(DailyLedger::new())),
        pending: Arc::new(RwLock::new(None)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/lookup", post(lookup_handler))
        .route("/commit", post(commit_handler))
        .route("/reset", post(reset_handler))
        .route("/ledger", get(ledger_handler))
        .route("/summary", get(summary_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .with_state(state)
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    let bytes = match STANDARD.decode(request.image.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, format!("invalid base64: {e}")),
    };

    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, format!("invalid image: {e}")),
    };

    match state.analyzer.analyze_image(&image).await {
        Ok(report) => {
            *state.pending.write().await = Some(report.clone());
            Json(report).into_response()
        }
        Err(e) => analysis_error_response(&e),
    }
}

async fn lookup_handler(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Response {
    match state.analyzer.analyze_foods(&request.foods).await {
        Ok(report) => {
            *state.pending.write().await = Some(report.clone());
            Json(report).into_response()
        }
        Err(e) => analysis_error_response(&e),
    }
}

async fn commit_handler(
    State(state): State<AppState>,
    Json(request): Json<CommitRequest>,
) -> Response {
    let meal: MealType = match request.meal.parse() {
        Ok(meal) => meal,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let pending = state.pending.write().await.take();
    let report = match pending {
        Some(report) if !report.result.is_empty() => report,
        _ => {
            return error_response(
                StatusCode::CONFLICT,
                "no analyzed foods to commit".to_string(),
            )
        }
    };

    let mut ledger = state.ledger.write().await;
    ledger.commit(&report.result, meal);
    Json(StatusResponse {
        status: format!("added {} foods to {meal}", report.result.entries.len()),
    })
    .into_response()
}

async fn reset_handler(State(state): State<AppState>) -> Response {
    state.pending.write().await.take();
    state.ledger.write().await.reset();
    Json(StatusResponse {
        status: "daily tracking reset".to_string(),
    })
    .into_response()
}

async fn ledger_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.ledger.read().await.snapshot();
    Json(snapshot).into_response()
}

async fn summary_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.ledger.read().await.snapshot();
    Json(SummaryResponse {
        summary: format_summary(&snapshot),
    })
    .into_response()
}

async fn health_check() -> Response {
    Json(StatusResponse {
        status: "ok".to_string(),
    })
    .into_response()
}
