//! Callers resolved against the user table.
//!
//! The bearer token only names the account. Role and staff flag are read from
//! the stored row on every request, so demotions and deletions apply before
//! the token expires.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_auth_types::identity::{Identity, MaybeIdentity};

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::user::AuthenticateUseCase;

/// Optional caller. `None` without an `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct MaybeActor(pub Option<Identity>);

impl MaybeActor {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

/// Authenticated caller; 401 without a bearer token.
#[derive(Debug, Clone, Copy)]
pub struct Actor(pub Identity);

impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeIdentity(claimed) = MaybeIdentity::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidToken)?;
        let Some(claimed) = claimed else {
            return Ok(Self(None));
        };
        let usecase = AuthenticateUseCase {
            users: state.user_repo(),
        };
        usecase.execute(claimed).await.map(|actor| Self(Some(actor)))
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeActor(actor) = MaybeActor::from_request_parts(parts, state).await?;
        actor.map(Self).ok_or(ApiError::NotAuthenticated)
    }
}
