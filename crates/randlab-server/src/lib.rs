//! JSON HTTP API for randlab.
//!
//! Generates sample sets and runs the randomness test battery over them.
//! Every request rebuilds its generator from `(kind, seed)`, so the same
//! query always returns the same samples for the seeded kinds.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use randlab_core::{GeneratorKind, LabError, SampleSet, Session, TestResultSet};

/// Shared server state.
struct AppState {
    session: Mutex<Session>,
}

#[derive(Deserialize)]
struct GenerateParams {
    kind: Option<String>,
    seed: Option<i64>,
    count: Option<i64>,
}

#[derive(Deserialize)]
struct EvaluateParams {
    kind: Option<String>,
    seed: Option<i64>,
    count: Option<i64>,
    bins: Option<usize>,
    lag: Option<usize>,
}

#[derive(Serialize)]
struct GenerateResponse {
    kind: String,
    /// Absent for the entropy kind.
    seed: Option<u32>,
    count: usize,
    samples: Vec<f64>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EvaluateResponse {
    kind: String,
    seed: Option<u32>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<TestResultSet>,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    entropy_source: String,
    session: String,
}

fn error_status(err: &LabError) -> StatusCode {
    match err {
        LabError::EntropySourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        LabError::UnknownGenerator(_) => StatusCode::BAD_REQUEST,
        LabError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Run one generation request, filling missing parameters from the config.
fn generate_set(
    session: &mut Session,
    kind: Option<&str>,
    seed: Option<i64>,
    count: Option<i64>,
) -> Result<SampleSet, LabError> {
    let kind = kind.map_or(Ok(GeneratorKind::MersenneTwister), str::parse)?;
    let seed = seed.unwrap_or(i64::from(session.config().default_seed));
    let count = count.unwrap_or(session.config().default_sample_count as i64);
    session.generate(kind, seed, count)
}

async fn handle_generate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GenerateParams>,
) -> (StatusCode, Json<GenerateResponse>) {
    let mut session = state.session.lock().await;
    match generate_set(&mut session, params.kind.as_deref(), params.seed, params.count) {
        Ok(set) => (
            StatusCode::OK,
            Json(GenerateResponse {
                kind: set.kind().to_string(),
                seed: set.seed(),
                count: set.len(),
                samples: set.as_slice().to_vec(),
                success: true,
                error: None,
            }),
        ),
        Err(e) => {
            warn!("generate failed: {e}");
            (
                error_status(&e),
                Json(GenerateResponse {
                    kind: params.kind.unwrap_or_default(),
                    seed: None,
                    count: 0,
                    samples: Vec::new(),
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn handle_evaluate(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EvaluateParams>,
) -> (StatusCode, Json<EvaluateResponse>) {
    let mut session = state.session.lock().await;
    match generate_set(&mut session, params.kind.as_deref(), params.seed, params.count) {
        Ok(set) => {
            let results = session.evaluate_with(&set, params.bins, params.lag);
            (
                StatusCode::OK,
                Json(EvaluateResponse {
                    kind: set.kind().to_string(),
                    seed: set.seed(),
                    count: set.len(),
                    results: Some(results),
                    success: true,
                    error: None,
                }),
            )
        }
        Err(e) => {
            warn!("evaluate failed: {e}");
            (
                error_status(&e),
                Json(EvaluateResponse {
                    kind: params.kind.unwrap_or_default(),
                    seed: None,
                    count: 0,
                    results: None,
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let session = state.session.lock().await;
    let source = session.entropy_source();
    Json(HealthResponse {
        status: if source.is_available() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        entropy_source: source.name().to_string(),
        session: session.id().to_string(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let session = state.session.lock().await;
    let config = session.config().clone();
    drop(session);

    let kinds: Vec<&str> = GeneratorKind::ALL.iter().map(|k| k.as_str()).collect();
    Json(serde_json::json!({
        "name": "randlab server",
        "version": randlab_core::VERSION,
        "generators": kinds,
        "endpoints": {
            "/": "This API index",
            "/api/v1/generate": {
                "method": "GET",
                "description": "Generate a sample set in [0, 1)",
                "params": {
                    "kind": format!("Generator: {} (default: mersenne-twister)", kinds.join(", ")),
                    "seed": format!("Seed, clamped to [0, 2^32-1] (default: {})", config.default_seed),
                    "count": format!("Sample count, clamped to [1, {}] (default: {})", config.max_sample_count, config.default_sample_count),
                }
            },
            "/api/v1/evaluate": {
                "method": "GET",
                "description": "Generate a sample set and run chi-square, runs and autocorrelation tests",
                "params": {
                    "kind": "As for /api/v1/generate",
                    "seed": "As for /api/v1/generate",
                    "count": "As for /api/v1/generate",
                    "bins": format!("Chi-square bins, clamped to [{}, {}] (default: {})", randlab_core::MIN_BINS, randlab_core::MAX_BINS, config.chi_square_bins),
                    "lag": format!("Autocorrelation lag (default: {})", config.autocorrelation_lag),
                }
            },
            "/health": "Health check",
        },
        "examples": {
            "mersenne_twister": "/api/v1/generate?kind=mt&seed=5489&count=10",
            "evaluate_lcg": "/api/v1/evaluate?kind=lcg&seed=1&count=1000",
            "entropy": "/api/v1/generate?kind=csprng&count=32",
        }
    }))
}

/// Build the axum router.
fn build_router(session: Session) -> Router {
    let state = Arc::new(AppState {
        session: Mutex::new(session),
    });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/generate", get(handle_generate))
        .route("/api/v1/evaluate", get(handle_evaluate))
        .route("/health", get(handle_health))
        .with_state(state)
}

/// Run the HTTP server until it fails or the process exits.
pub async fn run_server(session: Session, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(session);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("randlab server listening on http://{addr}");
    axum::serve(listener, app).await
}
