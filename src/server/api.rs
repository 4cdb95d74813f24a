//! JSON API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ApiError;
use super::AppState;
use crate::assistant::Assistant;
use crate::content::{render, Block, Post, PostFields, PostPatch, PostSummary, SocialDraft};

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct PasswordQuery {
    pub password: Option<String>,
}

/// Public view of a readable post
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub content: String,
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl From<&Post> for PostDetail {
    fn from(post: &Post) -> Self {
        Self {
            summary: PostSummary::from(post),
            content: post.content.clone(),
            blocks: render(&post.content),
            updated: post.updated,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Toggle {
    pub value: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InspirationRequest {
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub content: String,
}

/// Assistant output; `result` is null when nothing usable came back
#[derive(Debug, Serialize)]
pub struct AssistantReply<T> {
    pub result: Option<T>,
}

// Public read surface

pub async fn list_published(State(state): State<AppState>) -> Json<Vec<PostSummary>> {
    let posts = state.store.published().await;
    Json(posts.iter().map(PostSummary::from).collect())
}

pub async fn list_featured(State(state): State<AppState>) -> Json<Vec<PostSummary>> {
    let posts = state.store.featured().await;
    Json(posts.iter().map(PostSummary::from).collect())
}

pub async fn show_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PasswordQuery>,
) -> ApiResult<Json<PostDetail>> {
    let post = state
        .store
        .get_by_slug(&slug)
        .await
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::NotFound(slug.clone()))?;

    if post.is_locked() {
        let candidate = query.password.unwrap_or_default();
        if !state.store.verify_password(post.id, &candidate).await {
            return Err(ApiError::Locked);
        }
    }

    Ok(Json(PostDetail::from(&post)))
}

// Admin write surface

pub async fn admin_list(State(state): State<AppState>) -> Json<Vec<Post>> {
    Json(state.store.list().await)
}

pub async fn admin_create(
    State(state): State<AppState>,
    Json(fields): Json<PostFields>,
) -> ApiResult<impl IntoResponse> {
    let post = state.store.create(fields).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn admin_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Post>> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(id.to_string()))
}

pub async fn admin_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<PostPatch>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.store.update(id, patch).await?))
}

pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_set_published(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<Toggle>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.store.set_published(id, toggle.value).await?))
}

pub async fn admin_set_featured(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(toggle): Json<Toggle>,
) -> ApiResult<Json<Post>> {
    Ok(Json(state.store.set_featured(id, toggle.value).await?))
}

pub async fn admin_drafts(State(state): State<AppState>) -> Json<Vec<SocialDraft>> {
    Json(state.store.drafts().await)
}

pub async fn admin_delete_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_draft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Assistant

fn enabled(assistant: &Assistant) -> ApiResult<&Assistant> {
    if assistant.is_enabled() {
        Ok(assistant)
    } else {
        Err(ApiError::AssistantDisabled)
    }
}

pub async fn assistant_prompts(
    State(state): State<AppState>,
) -> ApiResult<Json<AssistantReply<Vec<String>>>> {
    let result = enabled(&state.assistant)?.daily_prompts().await;
    Ok(Json(AssistantReply { result }))
}

pub async fn assistant_inspiration(
    State(state): State<AppState>,
    Json(request): Json<InspirationRequest>,
) -> ApiResult<Json<AssistantReply<String>>> {
    let result = enabled(&state.assistant)?
        .content_inspiration(request.topic.as_deref())
        .await;
    Ok(Json(AssistantReply { result }))
}

pub async fn assistant_improve(
    State(state): State<AppState>,
    Json(request): Json<ImproveRequest>,
) -> ApiResult<Json<AssistantReply<String>>> {
    let result = enabled(&state.assistant)?
        .improve_content(&request.content)
        .await;
    Ok(Json(AssistantReply { result }))
}

pub async fn assistant_motivation(
    State(state): State<AppState>,
) -> ApiResult<Json<AssistantReply<String>>> {
    let result = enabled(&state.assistant)?.motivational_message().await;
    Ok(Json(AssistantReply { result }))
}

/// Generate a content plan for a post and save it as drafts
pub async fn assistant_social(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AssistantReply<Vec<SocialDraft>>>> {
    let assistant = enabled(&state.assistant)?;
    let post = state
        .store
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

    let Some(plan) = assistant.content_plan(&post).await else {
        return Ok(Json(AssistantReply { result: None }));
    };

    let mut saved = Vec::new();
    for draft in plan.into_drafts(Some(post.id), Utc::now()) {
        saved.push(state.store.save_draft(draft).await?);
    }
    tracing::info!("Saved {} social drafts for {}", saved.len(), post.slug);

    Ok(Json(AssistantReply {
        result: Some(saved),
    }))
}
