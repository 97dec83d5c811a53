//! `/genres/` and `/categories/` share request and response shapes; each
//! route delegates to a helper generic over the term repository.

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use yamdb_auth_types::permission::{Access, AdminOrReadOnly, authorize};
use yamdb_core::extract::{JsonBody, PathParams, QueryParams};
use yamdb_domain::pagination::{Page, PageRequest};

use super::actor::MaybeActor;
use super::{TermResponse, page_base};
use crate::domain::repository::TermRepository;
use crate::domain::types::NewTerm;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::taxonomy::{CreateTermUseCase, DeleteTermUseCase, ListTermsUseCase};

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Deserialize)]
pub struct TermRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

async fn list_terms<T: TermRepository>(
    terms: T,
    uri: &OriginalUri,
    search: SearchQuery,
    page: PageRequest,
) -> Result<JsonBody<Page<TermResponse>>, ApiError> {
    let usecase = ListTermsUseCase { terms };
    let page = usecase
        .execute(search.search.as_deref(), page.clamped(), page_base(&uri.0))
        .await?;
    Ok(JsonBody(page.map(TermResponse::from)))
}

async fn create_term<T: TermRepository>(
    terms: T,
    actor: MaybeActor,
    body: TermRequest,
) -> Result<(StatusCode, JsonBody<TermResponse>), ApiError> {
    authorize(&AdminOrReadOnly, actor.identity(), Access::Write)?;
    let usecase = CreateTermUseCase { terms };
    let term = usecase
        .execute(NewTerm {
            name: body.name,
            slug: body.slug,
        })
        .await?;
    Ok((StatusCode::CREATED, JsonBody(TermResponse::from(term))))
}

async fn delete_term<T: TermRepository>(
    terms: T,
    actor: MaybeActor,
    slug: &str,
) -> Result<StatusCode, ApiError> {
    authorize(&AdminOrReadOnly, actor.identity(), Access::Write)?;
    DeleteTermUseCase { terms }.execute(slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /genres/ ─────────────────────────────────────────────────────────────────

pub async fn list_genres(
    State(state): State<AppState>,
    uri: OriginalUri,
    QueryParams(search): QueryParams<SearchQuery>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    list_terms(state.genre_repo(), &uri, search, page).await
}

pub async fn create_genre(
    State(state): State<AppState>,
    actor: MaybeActor,
    JsonBody(body): JsonBody<TermRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_term(state.genre_repo(), actor, body).await
}

pub async fn delete_genre(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(slug): PathParams<String>,
) -> Result<impl IntoResponse, ApiError> {
    delete_term(state.genre_repo(), actor, &slug).await
}

// ── /categories/ ─────────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
    uri: OriginalUri,
    QueryParams(search): QueryParams<SearchQuery>,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    list_terms(state.category_repo(), &uri, search, page).await
}

pub async fn create_category(
    State(state): State<AppState>,
    actor: MaybeActor,
    JsonBody(body): JsonBody<TermRequest>,
) -> Result<impl IntoResponse, ApiError> {
    create_term(state.category_repo(), actor, body).await
}

pub async fn delete_category(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(slug): PathParams<String>,
) -> Result<impl IntoResponse, ApiError> {
    delete_term(state.category_repo(), actor, &slug).await
}
