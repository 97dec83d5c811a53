use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use yamdb_core::extract::{JsonBody, PathParams, QueryParams};
use yamdb_domain::pagination::PageRequest;

use super::actor::Actor;
use super::page_base;
use crate::domain::types::Comment;
use crate::error::ApiError;
use crate::infra::db::{DbCommentRepository, DbReviewRepository, DbTitleRepository};
use crate::state::AppState;
use crate::usecase::comment::CommentUseCase;

#[derive(Serialize)]
pub struct CommentResponse {
    pub id: i32,
    pub text: String,
    pub author: Option<String>,
    #[serde(serialize_with = "yamdb_core::time::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            author: comment.author,
            pub_date: comment.pub_date,
        }
    }
}

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: Option<String>,
}

fn usecase(state: &AppState) -> CommentUseCase<DbTitleRepository, DbReviewRepository, DbCommentRepository> {
    CommentUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
        comments: state.comment_repo(),
    }
}

// ── GET /titles/{title_id}/reviews/{review_id}/comments/ ─────────────────────

pub async fn list_comments(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParams((title_id, review_id)): PathParams<(i32, i32)>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = usecase(&state)
        .list(title_id, review_id, page.clamped(), page_base(&uri))
        .await?;
    Ok(JsonBody(page.map(CommentResponse::from)))
}

// ── POST /titles/{title_id}/reviews/{review_id}/comments/ ────────────────────

pub async fn create_comment(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams((title_id, review_id)): PathParams<(i32, i32)>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = usecase(&state)
        .create(Some(&identity), title_id, review_id, body.text)
        .await?;
    Ok((StatusCode::CREATED, JsonBody(CommentResponse::from(comment))))
}

// ── /titles/{title_id}/reviews/{review_id}/comments/{comment_id}/ ────────────

pub async fn get_comment(
    State(state): State<AppState>,
    PathParams((title_id, review_id, comment_id)): PathParams<(i32, i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = usecase(&state)
        .get(title_id, review_id, comment_id)
        .await?;
    Ok(JsonBody(CommentResponse::from(comment)))
}

pub async fn replace_comment(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(ids): PathParams<(i32, i32, i32)>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = usecase(&state)
        .update(Some(&identity), ids, body.text, false)
        .await?;
    Ok(JsonBody(CommentResponse::from(comment)))
}

pub async fn patch_comment(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(ids): PathParams<(i32, i32, i32)>,
    JsonBody(body): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = usecase(&state)
        .update(Some(&identity), ids, body.text, true)
        .await?;
    Ok(JsonBody(CommentResponse::from(comment)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(ids): PathParams<(i32, i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    usecase(&state).delete(Some(&identity), ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
