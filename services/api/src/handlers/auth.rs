use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use yamdb_core::extract::JsonBody;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::auth::{ConfirmEmailInput, ConfirmEmailUseCase, SignupInput, SignupUseCase};
use crate::usecase::token::{ObtainTokenInput, ObtainTokenUseCase, RefreshTokenUseCase};

// ── POST /auth/email/ ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub email: String,
    pub username: String,
}

pub async fn signup(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = SignupUseCase {
        users: state.user_repo(),
    };
    let out = usecase
        .execute(SignupInput {
            email: body.email,
            username: body.username,
        })
        .await?;
    Ok((
        StatusCode::OK,
        JsonBody(SignupResponse {
            email: out.email,
            username: out.username,
        }),
    ))
}

// ── POST /auth/token/ ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConfirmEmailRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub confirmation_code: String,
}

pub async fn confirm_email(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ConfirmEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ConfirmEmailUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret(),
    };
    let pair = usecase
        .execute(ConfirmEmailInput {
            email: body.email,
            confirmation_code: body.confirmation_code,
        })
        .await?;
    Ok(JsonBody(pair))
}

// ── POST /token/ ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ObtainTokenRequest {
    pub username: String,
    pub password: String,
}

pub async fn obtain_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ObtainTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = ObtainTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret(),
    };
    let pair = usecase
        .execute(ObtainTokenInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(JsonBody(pair))
}

// ── POST /token/refresh/ ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

pub async fn refresh_token(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RefreshTokenUseCase {
        users: state.user_repo(),
        jwt_secret: state.jwt_secret(),
    };
    Ok(JsonBody(usecase.execute(&body.refresh).await?))
}
