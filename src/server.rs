//! HTTP server exposing the classification API

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::engine::{rank, BackendHealth, SharedRankingEngine};
use crate::error::{ClassifyError, InferenceError};
use crate::types::{BackendKind, Classification, Gender, ScoreMap};

/// Query parameters for image classification
#[derive(Debug, Deserialize)]
pub struct ClassifyParams {
    pub gender: Option<Gender>,
}

/// Request for ranking precomputed scores
#[derive(Debug, Deserialize)]
pub struct RankRequestHttp {
    pub scores: ScoreMap,
    pub gender: Option<Gender>,
    #[serde(default)]
    pub backend: BackendKind,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub backends: Vec<BackendHealth>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, details: Option<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details,
        }),
    )
}

/// Classify a face image posted as raw bytes
async fn classify_handler(
    State(engine): State<SharedRankingEngine>,
    Query(params): Query<ClassifyParams>,
    body: Bytes,
) -> Result<Json<Classification>, ApiError> {
    info!(
        "Received classify request: {} bytes, gender={:?}",
        body.len(),
        params.gender
    );

    if body.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "empty image body", None));
    }

    match engine.classify(&body, params.gender).await {
        Ok(classification) => {
            info!(
                "Classification: {} ({:.1}%)",
                classification.main_result.category, classification.main_result.percentage
            );
            Ok(Json(classification))
        }
        Err(ClassifyError::Inference(InferenceError::NoFaceDetected)) => Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "no face detected",
            None,
        )),
        Err(ClassifyError::Inference(e @ InferenceError::ModelUnavailable(_))) => {
            error!("All backends unavailable: {}", e);
            Err(api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                "inference backend unavailable",
                Some(e.to_string()),
            ))
        }
        Err(e) => {
            error!("Classification failed: {:?}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "classification failed",
                Some(e.to_string()),
            ))
        }
    }
}

/// Rank a precomputed score map without touching any backend
async fn rank_handler(
    Json(req): Json<RankRequestHttp>,
) -> Result<Json<Classification>, ApiError> {
    match rank(req.scores, req.gender, req.backend) {
        Ok(result) => Ok(Json(Classification::from_result(result))),
        Err(e) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "invalid scores",
            Some(e.to_string()),
        )),
    }
}

/// Health check handler with per-backend status
async fn health_handler(State(engine): State<SharedRankingEngine>) -> Json<HealthResponse> {
    let backends = engine.health_report().await;
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "faunalens".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backends,
    })
}

/// Create and configure the HTTP server
pub fn create_router(engine: SharedRankingEngine) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/classify", post(classify_handler))
        .route("/rank", post(rank_handler))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: SharedRankingEngine, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting faunalens server on {}", addr);

    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("✓ Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
