//! Bearer-token identity extractors.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::request::Parts;
use uuid::Uuid;
use yamdb_core::error::AppError;
use yamdb_domain::user::UserRole;

use crate::token::validate_access_token;

/// HS256 signing secret, pulled out of the router state by the extractors.
#[derive(Clone)]
pub struct JwtSecret(pub String);

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("JwtSecret(..)")
    }
}

/// Caller as claimed by `Authorization: Bearer <access token>`.
///
/// Role and staff flag are the values signed into the token. Services that
/// authorize against the current account re-read it by `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_staff: bool,
}

/// Optional caller. `None` without an `Authorization` header; a header that
/// is present but invalid is still rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

fn identity_from_parts(parts: &Parts, secret: &str) -> Result<Option<Identity>, AppError> {
    let header = parts
        .headers
        .typed_try_get::<Authorization<Bearer>>()
        .map_err(|_| AppError::Unauthorized)?;
    let Some(Authorization(bearer)) = header else {
        return Ok(None);
    };

    let info = validate_access_token(bearer.token(), secret).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;
    Ok(Some(Identity {
        user_id: info.user_id,
        role: info.role,
        is_staff: info.is_staff,
    }))
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0).map(MaybeIdentity);
        async move { result }
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0)
            .and_then(|identity| identity.ok_or(AppError::Unauthorized));
        async move { result }
    }
}
