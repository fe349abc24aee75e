use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{Post, PostId},
    error::{ApiError, ErrorCode},
    protocol::{NewPostRequest, UpdatePostRequest},
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::ApiContext;
use app_state::AppState;
use config::{load_posts, load_settings};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let posts = match &settings.data_file {
        Some(path) => load_posts(path).map_err(|error| {
            error!(
                data_file = %path.display(),
                error = %format!("{error:#}"),
                "failed to load posts; verify the file is a {{\"posts\": [...]}} document"
            );
            error
        })?,
        None => {
            warn!("no data file configured; posts live in memory only");
            Vec::new()
        }
    };
    info!(count = posts.len(), "posts loaded");

    let state = AppState {
        api: ApiContext::new(posts, settings.data_file.clone()),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/posts", get(http_list_posts).post(http_create_post))
        .route(
            "/posts/:id",
            get(http_get_post)
                .put(http_update_post)
                .delete(http_delete_post),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    if err.code == ErrorCode::Internal {
        error!(message = %err.message, "posts request failed");
    }
    (status_for(err.code), Json(err))
}

async fn http_list_posts(State(state): State<Arc<AppState>>) -> Json<Vec<Post>> {
    Json(api::list_posts(&state.api).await)
}

async fn http_get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Post>> {
    api::get_post(&state.api, PostId(id))
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_create_post(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = api::create_post(&state.api, req).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn http_update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    api::update_post(&state.api, PostId(id), req)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    api::delete_post(&state.api, PostId(id))
        .await
        .map_err(reject)?;
    Ok(Json(json!({})))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
