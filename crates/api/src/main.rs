use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use database::Database;
use event_listener::{EventListener, EventSummary, ListenerConfig, WebhookEvent};
use llm_client::LlmClient;
use orchestrator::{OrchestratorConfig, ReplyOrchestrator};
use trainer::{StyleTrainer, TrainerConfig, TrainerError, TrainingReport};

mod config;
mod gateway;

use config::AppConfig;
use gateway::HttpGateway;

#[derive(Clone)]
struct AppState {
    listener: Arc<EventListener<HttpGateway, LlmClient>>,
    trainer: Arc<StyleTrainer<LlmClient>>,
}

#[derive(Debug, Deserialize)]
struct TrainRequest {
    tenant_id: String,
}

#[derive(Debug, Serialize)]
struct Health {
    status: String,
}

enum ApiError {
    BadRequest(serde_json::Value),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(body) => (StatusCode::BAD_REQUEST, Json(body)).into_response(),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let llm = LlmClient::from_env().expect("Failed to build model client");
    let http_gateway = HttpGateway::new(&config);

    let orchestrator = Arc::new(ReplyOrchestrator::new(
        db.clone(),
        http_gateway,
        llm.clone(),
        OrchestratorConfig::default(),
    ));
    let trainer = Arc::new(StyleTrainer::new(db.clone(), llm, TrainerConfig::default()));
    let listener = Arc::new(EventListener::new(
        db,
        orchestrator,
        trainer.clone(),
        ListenerConfig::default(),
    ));

    let state = AppState { listener, trainer };

    let app = Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .route("/train", post(train))
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse().expect("Invalid BIND_ADDR");
    info!(%addr, "Auto-reply API listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn webhook(
    State(state): State<AppState>,
    Json(event): Json<WebhookEvent>,
) -> Result<Json<EventSummary>, ApiError> {
    let summary = state.listener.handle_event(&event).await.map_err(|e| {
        error!("Webhook handling failed: {}", e);
        ApiError::Internal(e.to_string())
    })?;
    Ok(Json(summary))
}

async fn train(
    State(state): State<AppState>,
    Json(request): Json<TrainRequest>,
) -> Result<Json<TrainingReport>, ApiError> {
    match state.trainer.train(&request.tenant_id).await {
        Ok(report) => Ok(Json(report)),
        Err(TrainerError::InsufficientData { message_count }) => {
            Err(ApiError::BadRequest(serde_json::json!({
                "error": "Not enough messages to train. Keep chatting with auto-reply OFF; the trainer learns from your real messages.",
                "message_count": message_count,
                "tip": "Send at least 10-20 messages naturally while auto-reply is turned off.",
            })))
        }
        Err(TrainerError::MissingCredential) => Err(ApiError::BadRequest(serde_json::json!({
            "error": "Model API key not configured. Add it in settings first.",
        }))),
        Err(e) => {
            error!("Training failed for {}: {}", request.tenant_id, e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}
