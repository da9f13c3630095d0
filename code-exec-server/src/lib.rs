use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use code_exec::{
    CodeExecutionService, ExecutionRequest, ExecutionResult, ExecutorConfig, Language, Submission,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    InvalidRequest(code_exec::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("Execution error: {0}")]
    ExecutionError(code_exec::Error),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<code_exec::Error> for ServerError {
    fn from(e: code_exec::Error) -> Self {
        match e {
            e if e.is_rejection() => ServerError::InvalidRequest(e),
            code_exec::Error::NotFound(message) => ServerError::NotFound(message),
            e => ServerError::ExecutionError(e),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServerError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ServerError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::ExecutionError(_) | ServerError::ServerError(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Service descriptor served at `/`
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub languages: Vec<Language>,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub question_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct AppState {
    service: Arc<CodeExecutionService>,
}

pub fn create_app(config: ExecutorConfig) -> Router {
    let state = AppState {
        service: Arc::new(CodeExecutionService::new(config)),
    };

    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/execute", post(execute))
        .route("/submit", post(submit))
        .route("/submissions/:interview_id", get(list_submissions))
        .route("/submissions/latest/:interview_id", get(latest_submission))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), ServerError> {
    info!("Starting code execution server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::ServerError(e.to_string()))?;

    Ok(())
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "code-exec".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        languages: Language::ALL.to_vec(),
    })
}

async fn health_check() -> &'static str {
    "OK"
}

async fn execute(
    State(state): State<AppState>,
    Json(request): Json<ExecutionRequest>,
) -> Result<Json<ExecutionResult>, ServerError> {
    let result = state.service.execute(&request).await?;
    Ok(Json(result))
}

async fn submit(
    State(state): State<AppState>,
    Json(request): Json<ExecutionRequest>,
) -> Result<Json<Submission>, ServerError> {
    let submission = state.service.submit(request).await?;
    Ok(Json(submission))
}

async fn list_submissions(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<Vec<Submission>>, ServerError> {
    let submissions = state.service.submissions_for_interview(interview_id).await?;
    Ok(Json(submissions))
}

async fn latest_submission(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Submission>, ServerError> {
    let submission = state
        .service
        .latest_submission(interview_id, query.question_id)
        .await?;
    Ok(Json(submission))
}
