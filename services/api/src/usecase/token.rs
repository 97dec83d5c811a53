use chrono::Utc;
use serde::Serialize;

use yamdb_auth_types::token::{
    ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP, TokenType, encode_jwt, validate_refresh_token,
};

use crate::domain::repository::UserRepository;
use crate::domain::types::{TokenPair, User};
use crate::error::ApiError;
use crate::infra::password::verify_password;

fn now_secs() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

fn issue(user: &User, secret: &str, token_type: TokenType, ttl: u64) -> Result<String, ApiError> {
    let claims = JwtClaims {
        sub: user.id.to_string(),
        role: user.role,
        is_staff: user.is_staff,
        token_type,
        exp: now_secs() + ttl,
    };
    encode_jwt(&claims, secret).map_err(|e| ApiError::Internal(e.into()))
}

pub fn issue_access_token(user: &User, secret: &str) -> Result<String, ApiError> {
    issue(user, secret, TokenType::Access, ACCESS_TOKEN_EXP)
}

pub fn issue_token_pair(user: &User, secret: &str) -> Result<TokenPair, ApiError> {
    Ok(TokenPair {
        refresh: issue(user, secret, TokenType::Refresh, REFRESH_TOKEN_EXP)?,
        access: issue_access_token(user, secret)?,
    })
}

// ── ObtainToken (username + password) ────────────────────────────────────────

pub struct ObtainTokenInput {
    pub username: String,
    pub password: String,
}

pub struct ObtainTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> ObtainTokenUseCase<U> {
    pub async fn execute(&self, input: ObtainTokenInput) -> Result<TokenPair, ApiError> {
        let user = self
            .users
            .find_by_username(&input.username)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(&input.password, hash) {
            return Err(ApiError::InvalidCredentials);
        }

        issue_token_pair(&user, &self.jwt_secret)
    }
}

// ── RefreshToken ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}

pub struct RefreshTokenUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> RefreshTokenUseCase<U> {
    /// New access token for the refresh token's user, carrying the user's
    /// current role.
    pub async fn execute(&self, refresh_token: &str) -> Result<AccessToken, ApiError> {
        let info = validate_refresh_token(refresh_token, &self.jwt_secret)
            .map_err(|_| ApiError::InvalidToken)?;
        let user = self
            .users
            .find_by_id(info.user_id)
            .await?
            .ok_or(ApiError::InvalidToken)?;

        Ok(AccessToken {
            access: issue_access_token(&user, &self.jwt_secret)?,
        })
    }
}
