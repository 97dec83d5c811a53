use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use yamdb_auth_types::permission::{Access, AdminOrReadOnly, authorize};
use yamdb_core::extract::{JsonBody, PathParams, QueryParams};
use yamdb_domain::pagination::PageRequest;

use super::actor::MaybeActor;
use super::{TermResponse, double_option, page_base};
use crate::domain::types::{Title, TitleFilter, TitleInput};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::title::{
    CreateTitleUseCase, DeleteTitleUseCase, GetTitleUseCase, ListTitlesUseCase,
    UpdateTitleUseCase,
};

#[derive(Serialize)]
pub struct TitleResponse {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: String,
    pub genre: Vec<TermResponse>,
    pub category: Option<TermResponse>,
}

impl From<Title> for TitleResponse {
    fn from(title: Title) -> Self {
        Self {
            id: title.id,
            name: title.name,
            year: title.year,
            rating: title.rating,
            description: title.description,
            genre: title.genres.into_iter().map(TermResponse::from).collect(),
            category: title.category.map(TermResponse::from),
        }
    }
}

/// Genres and category are referenced by slug.
#[derive(Deserialize)]
pub struct TitleRequest {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

impl From<TitleRequest> for TitleInput {
    fn from(body: TitleRequest) -> Self {
        Self {
            name: body.name,
            year: body.year,
            description: body.description,
            genre: body.genre,
            category: body.category,
        }
    }
}

// ── GET /titles/ ─────────────────────────────────────────────────────────────

pub async fn list_titles(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(filter): QueryParams<TitleFilter>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ListTitlesUseCase {
        titles: state.title_repo(),
    };
    let page = usecase
        .execute(&filter, page.clamped(), page_base(&uri))
        .await?;
    Ok(JsonBody(page.map(TitleResponse::from)))
}

// ── POST /titles/ ────────────────────────────────────────────────────────────

pub async fn create_title(
    State(state): State<AppState>,
    MaybeActor(actor): MaybeActor,
    JsonBody(body): JsonBody<TitleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&AdminOrReadOnly, actor.as_ref(), Access::Write)?;
    let usecase = CreateTitleUseCase {
        titles: state.title_repo(),
        genres: state.genre_repo(),
        categories: state.category_repo(),
    };
    let title = usecase.execute(body.into()).await?;
    Ok((StatusCode::CREATED, JsonBody(TitleResponse::from(title))))
}

// ── GET /titles/{title_id}/ ──────────────────────────────────────────────────

pub async fn get_title(
    State(state): State<AppState>,
    PathParams(title_id): PathParams<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetTitleUseCase {
        titles: state.title_repo(),
    };
    let title = usecase.execute(title_id).await?;
    Ok(JsonBody(TitleResponse::from(title)))
}

// ── PUT / PATCH /titles/{title_id}/ ──────────────────────────────────────────

async fn update_title(
    state: AppState,
    actor: MaybeActor,
    title_id: i32,
    body: TitleRequest,
    partial: bool,
) -> Result<JsonBody<TitleResponse>, ApiError> {
    authorize(&AdminOrReadOnly, actor.identity(), Access::Write)?;
    let usecase = UpdateTitleUseCase {
        titles: state.title_repo(),
        genres: state.genre_repo(),
        categories: state.category_repo(),
    };
    let title = usecase.execute(title_id, body.into(), partial).await?;
    Ok(JsonBody(TitleResponse::from(title)))
}

pub async fn replace_title(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(title_id): PathParams<i32>,
    JsonBody(body): JsonBody<TitleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_title(state, actor, title_id, body, false).await
}

pub async fn patch_title(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(title_id): PathParams<i32>,
    JsonBody(body): JsonBody<TitleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_title(state, actor, title_id, body, true).await
}

// ── DELETE /titles/{title_id}/ ───────────────────────────────────────────────

pub async fn delete_title(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(title_id): PathParams<i32>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&AdminOrReadOnly, actor.identity(), Access::Write)?;
    let usecase = DeleteTitleUseCase {
        titles: state.title_repo(),
    };
    usecase.execute(title_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
