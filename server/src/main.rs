//! HTTP server for the triagem question pipeline.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use triagem_rag::{indexing, AppContext, Config, Error, QueryRouter};

#[derive(Debug, Deserialize)]
struct QuestionRequest {
    question: String,
}

#[derive(Debug, Serialize)]
struct AnswerResponse {
    answer: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Clone)]
struct AppState {
    ctx: Arc<AppContext>,
}

/// One status per error kind. User-facing bodies carry only the typed
/// display string; upstream details stay in the logs.
fn error_status(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Retrieval(_) | Error::LanguageModel(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn handle_question(
    State(state): State<AppState>,
    Json(payload): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, Json<ErrorResponse>)> {
    let router = QueryRouter::new(state.ctx.clone());
    match router.handle(&payload.question).await {
        Ok(result) => Ok(Json(AnswerResponse {
            answer: result.render_text(),
        })),
        Err(e) => {
            // The router already logged the full failure context.
            Err((
                error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "service": "triagem", "status": "ok" }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("TRIAGEM_CONFIG").unwrap_or_else(|_| "triagem.json".to_string());
    let config = Config::from_file(Path::new(&config_path))?;

    tracing::info!("loading stores and backends");
    let ctx = Arc::new(AppContext::initialize(config)?);
    indexing::bootstrap_index(ctx.index.as_ref(), &ctx.patients).await?;

    let app = Router::new()
        .route("/", get(health_check))
        .route("/question", post(handle_question))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { ctx });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!(%addr, "triagem server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
