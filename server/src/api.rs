// server/src/api.rs

use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
    routing::{delete, get, post},
    Json, Router,
};
use community::{CommunityForum, NewAnswer, NewPost, Post};
use orchestrator::{DispatchError, Orchestrator};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tokio::task;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

const DISEASE_DOMAIN: &str = "plant-disease";

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub forum: CommunityForum,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Forum task failed")]
    TaskJoin(#[from] task::JoinError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("Forum storage failed")]
    Forum(#[from] anyhow::Error),
    #[error("Post not found")]
    PostNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let status = match &self {
            ApiError::Dispatch(DispatchError::UnknownDomain(_)) | ApiError::PostNotFound => StatusCode::NOT_FOUND,
            ApiError::TaskJoin(_) | ApiError::Forum(_) => {
                // {:#?} prints the whole cause chain.
                error!("[Server Error] Detailed error: {:#?}", self);
                let body = Json(json!({ "error": "Internal server error" }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Runs a blocking forum call off the async executor.
async fn with_forum<T, F>(forum: &CommunityForum, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CommunityForum) -> Result<T, anyhow::Error> + Send + 'static,
{
    let forum = forum.clone();
    Ok(task::spawn_blocking(move || op(&forum)).await??)
}

async fn list_domains(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.orchestrator.domains())
}

#[debug_handler]
async fn advise(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(request): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let result = state.orchestrator.dispatch(&domain, &request).await?;
    Ok(Json(result))
}

/// Plant-disease detection; advisory errors become 400s.
async fn detect_disease(State(state): State<AppState>, Json(request): Json<Value>) -> Result<AxumResponse, ApiError> {
    info!("[Server] Disease detection request received.");
    let result = state.orchestrator.dispatch(DISEASE_DOMAIN, &request).await?;

    let status = if result.get("error").is_some() { StatusCode::BAD_REQUEST } else { StatusCode::OK };
    Ok((status, Json(result)).into_response())
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = with_forum(&state.forum, |forum| forum.list_posts()).await?;
    Ok(Json(posts))
}

async fn create_post(State(state): State<AppState>, Json(new_post): Json<NewPost>) -> Result<Json<Post>, ApiError> {
    let post = with_forum(&state.forum, move |forum| forum.create_post(new_post)).await?;
    Ok(Json(post))
}

async fn add_answer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(new_answer): Json<NewAnswer>,
) -> Result<Json<Post>, ApiError> {
    let post = with_forum(&state.forum, move |forum| forum.add_answer(id, new_answer)).await?;
    post.map(Json).ok_or(ApiError::PostNotFound)
}

async fn delete_post(State(state): State<AppState>, Path(id): Path<i64>) -> Result<AxumResponse, ApiError> {
    let deleted = with_forum(&state.forum, move |forum| forum.delete_post(id)).await?;
    Ok(if deleted {
        (StatusCode::OK, "Post deleted").into_response()
    } else {
        (StatusCode::NOT_FOUND, "Post not found").into_response()
    })
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/advisory", get(list_domains))
        .route("/api/v1/advisory/:domain", post(advise))
        .route("/api/disease-detect", post(detect_disease))
        .route("/api/community-posts", get(list_posts).post(create_post))
        .route("/api/community-posts/:id", delete(delete_post))
        .route("/api/community-posts/:id/answers", post(add_answer))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
