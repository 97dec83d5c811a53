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
use crate::domain::types::Review;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::review::{
    CreateReviewUseCase, DeleteReviewUseCase, GetReviewUseCase, ListReviewsUseCase, ReviewInput,
    UpdateReviewUseCase,
};

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub text: String,
    pub author: Option<String>,
    pub score: i16,
    #[serde(serialize_with = "yamdb_core::time::to_rfc3339_ms")]
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.text,
            author: review.author,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

impl From<ReviewRequest> for ReviewInput {
    fn from(body: ReviewRequest) -> Self {
        Self {
            text: body.text,
            score: body.score,
        }
    }
}

// ── GET /titles/{title_id}/reviews/ ──────────────────────────────────────────

pub async fn list_reviews(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParams(title_id): PathParams<i32>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ListReviewsUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let page = usecase
        .execute(title_id, page.clamped(), page_base(&uri))
        .await?;
    Ok(JsonBody(page.map(ReviewResponse::from)))
}

// ── POST /titles/{title_id}/reviews/ ─────────────────────────────────────────

pub async fn create_review(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(title_id): PathParams<i32>,
    JsonBody(body): JsonBody<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(Some(&identity), title_id, body.into())
        .await?;
    Ok((StatusCode::CREATED, JsonBody(ReviewResponse::from(review))))
}

// ── GET /titles/{title_id}/reviews/{review_id}/ ──────────────────────────────

pub async fn get_review(
    State(state): State<AppState>,
    PathParams((title_id, review_id)): PathParams<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase.execute(title_id, review_id).await?;
    Ok(JsonBody(ReviewResponse::from(review)))
}

// ── PUT / PATCH /titles/{title_id}/reviews/{review_id}/ ──────────────────────

async fn update_review(
    state: AppState,
    Actor(identity): Actor,
    (title_id, review_id): (i32, i32),
    body: ReviewRequest,
    partial: bool,
) -> Result<JsonBody<ReviewResponse>, ApiError> {
    let usecase = UpdateReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    let review = usecase
        .execute(Some(&identity), title_id, review_id, body.into(), partial)
        .await?;
    Ok(JsonBody(ReviewResponse::from(review)))
}

pub async fn replace_review(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(ids): PathParams<(i32, i32)>,
    JsonBody(body): JsonBody<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_review(state, Actor(identity), ids, body, false).await
}

pub async fn patch_review(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams(ids): PathParams<(i32, i32)>,
    JsonBody(body): JsonBody<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_review(state, Actor(identity), ids, body, true).await
}

// ── DELETE /titles/{title_id}/reviews/{review_id}/ ───────────────────────────

pub async fn delete_review(
    State(state): State<AppState>,
    Actor(identity): Actor,
    PathParams((title_id, review_id)): PathParams<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = DeleteReviewUseCase {
        titles: state.title_repo(),
        reviews: state.review_repo(),
    };
    usecase
        .execute(Some(&identity), title_id, review_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
