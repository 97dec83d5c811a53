use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use yamdb_auth_types::permission::{Access, AdminOnly, IsStaff, Or, authorize};
use yamdb_core::extract::{JsonBody, PathParams, QueryParams};
use yamdb_domain::pagination::PageRequest;
use yamdb_domain::user::UserRole;

use super::actor::{Actor, MaybeActor};
use super::page_base;
use crate::domain::types::{User, UserPatch};
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateMeUseCase,
    UpdateUserUseCase,
};

/// Guards `/users/` and `/users/{username}/` for every verb.
const USER_ADMIN: Or<IsStaff, AdminOnly> = Or(IsStaff, AdminOnly);

#[derive(Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

#[derive(Deserialize)]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

impl From<UserRequest> for UserPatch {
    fn from(body: UserRequest) -> Self {
        Self {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            bio: body.bio,
            role: body.role,
        }
    }
}

// ── GET /users/ ──────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    actor: MaybeActor,
    OriginalUri(uri): OriginalUri,
    QueryParams(page): QueryParams<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&USER_ADMIN, actor.identity(), Access::Read)?;
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let page = usecase.execute(page.clamped(), page_base(&uri)).await?;
    Ok(JsonBody(page.map(UserResponse::from)))
}

// ── POST /users/ ─────────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    JsonBody(body): JsonBody<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&USER_ADMIN, actor.identity(), Access::Write)?;
    let usecase = CreateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(body.into()).await?;
    Ok((StatusCode::CREATED, JsonBody(UserResponse::from(user))))
}

// ── GET /users/{username}/ ───────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(username): PathParams<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&USER_ADMIN, actor.identity(), Access::Read)?;
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.by_username(&username).await?;
    Ok(JsonBody(UserResponse::from(user)))
}

// ── PUT / PATCH /users/{username}/ ───────────────────────────────────────────

async fn update_user(
    state: AppState,
    actor: MaybeActor,
    username: String,
    body: UserRequest,
    partial: bool,
) -> Result<JsonBody<UserResponse>, ApiError> {
    authorize(&USER_ADMIN, actor.identity(), Access::Write)?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(&username, body.into(), partial).await?;
    Ok(JsonBody(UserResponse::from(user)))
}

pub async fn replace_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(username): PathParams<String>,
    JsonBody(body): JsonBody<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_user(state, actor, username, body, false).await
}

pub async fn patch_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(username): PathParams<String>,
    JsonBody(body): JsonBody<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    update_user(state, actor, username, body, true).await
}

// ── DELETE /users/{username}/ ────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    PathParams(username): PathParams<String>,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&USER_ADMIN, actor.identity(), Access::Write)?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(&username).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET / PATCH /users/me/ ───────────────────────────────────────────────────

pub async fn get_me(
    State(state): State<AppState>,
    Actor(identity): Actor,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.by_id(identity.user_id).await?;
    Ok(JsonBody(UserResponse::from(user)))
}

pub async fn patch_me(
    State(state): State<AppState>,
    Actor(identity): Actor,
    JsonBody(body): JsonBody<UserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = UpdateMeUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(&identity, body.into()).await?;
    Ok(JsonBody(UserResponse::from(user)))
}
