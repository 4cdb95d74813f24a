//! HTTP server: public pages, the public JSON API, and the admin API

mod api;
mod error;

pub use api::{AssistantReply, PostDetail};
pub use error::ApiError;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::assistant::Assistant;
use crate::content::Category;
use crate::store::ContentStore;
use crate::templates::TemplateRenderer;
use crate::Blogdesk;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub assistant: Assistant,
    pub pages: Arc<TemplateRenderer>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/posts", get(api::admin_list).post(api::admin_create))
        .route(
            "/posts/:id",
            get(api::admin_get)
                .put(api::admin_update)
                .delete(api::admin_delete),
        )
        .route("/posts/:id/published", put(api::admin_set_published))
        .route("/posts/:id/featured", put(api::admin_set_featured))
        .route("/posts/:id/social", post(api::assistant_social))
        .route("/drafts", get(api::admin_drafts))
        .route("/drafts/:id", axum::routing::delete(api::admin_delete_draft))
        .route("/assistant/prompts", post(api::assistant_prompts))
        .route("/assistant/inspiration", post(api::assistant_inspiration))
        .route("/assistant/improve", post(api::assistant_improve))
        .route("/assistant/motivation", post(api::assistant_motivation));

    Router::new()
        .route("/", get(index_page))
        .route("/posts/:slug", get(post_page))
        .route("/healthz", get(health))
        .route("/api/posts", get(api::list_published))
        .route("/api/posts/featured", get(api::list_featured))
        .route("/api/posts/:slug", get(api::show_published))
        .nest("/api/admin", admin)
        .fallback(not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(desk: &Blogdesk, ip: &str, port: u16) -> Result<()> {
    let store = Arc::new(desk.open_store().await?);
    let assistant = desk.assistant();
    let assistant_enabled = assistant.is_enabled();
    let state = AppState {
        store: store.clone(),
        assistant,
        pages: Arc::new(TemplateRenderer::new(desk.helpers())?),
    };
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Content backend: {}", store.backend().as_str());
    if !assistant_enabled {
        println!("Assistant disabled (no API key configured).");
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IndexQuery {
    page: Option<usize>,
    category: Option<String>,
}

async fn index_page(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Html<String>, ApiError> {
    // Unknown categories show everything.
    let category = query
        .category
        .as_deref()
        .and_then(|c| c.parse::<Category>().ok());
    let posts = state.store.published().await;
    let featured = state.store.featured().await;

    let html = state
        .pages
        .index(&posts, &featured, category, query.page.unwrap_or(1))?;
    Ok(Html(html))
}

async fn post_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<api::PasswordQuery>,
    uri: Uri,
) -> Result<Response, ApiError> {
    let Some(post) = state
        .store
        .get_by_slug(&slug)
        .await
        .filter(|p| p.published)
    else {
        let html = state.pages.not_found(uri.path())?;
        return Ok((StatusCode::NOT_FOUND, Html(html)).into_response());
    };

    if post.is_locked() {
        let candidate = query.password.unwrap_or_default();
        if !state.store.verify_password(post.id, &candidate).await {
            let html = state.pages.locked(&post, !candidate.is_empty())?;
            return Ok((StatusCode::FORBIDDEN, Html(html)).into_response());
        }
    }

    Ok(Html(state.pages.post(&post)?).into_response())
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "backend": state.store.backend().as_str(),
        "assistant": state.assistant.is_enabled(),
    }))
}

async fn not_found_page(State(state): State<AppState>, uri: Uri) -> Response {
    match state.pages.not_found(uri.path()) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => ApiError::Internal(e).into_response(),
    }
}
