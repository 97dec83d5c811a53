//! Signed bearer credentials for tests.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;
use yamdb_auth_types::identity::Identity;
use yamdb_auth_types::token::{ACCESS_TOKEN_EXP, JwtClaims, TokenType, encode_jwt};
use yamdb_domain::user::UserRole;

/// Configurable caller whose access token is signed with the test secret.
#[derive(Debug, Clone, Copy)]
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_staff: bool,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            is_staff: false,
        }
    }

    pub fn user() -> Self {
        Self::new(Uuid::now_v7(), UserRole::User)
    }

    pub fn moderator() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Moderator)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::now_v7(), UserRole::Admin)
    }

    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id,
            role: self.role,
            is_staff: self.is_staff,
        }
    }

    /// Signed access token valid for the usual lifetime.
    pub fn token(&self, secret: &str) -> String {
        self.signed(secret, TokenType::Access)
    }

    pub fn refresh_token(&self, secret: &str) -> String {
        self.signed(secret, TokenType::Refresh)
    }

    /// `Bearer <token>` header value.
    pub fn bearer(&self, secret: &str) -> String {
        format!("Bearer {}", self.token(secret))
    }

    pub fn headers(&self, secret: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&self.bearer(secret)).unwrap(),
        );
        map
    }

    fn signed(&self, secret: &str, token_type: TokenType) -> String {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let claims = JwtClaims {
            sub: self.user_id.to_string(),
            role: self.role,
            is_staff: self.is_staff,
            token_type,
            exp: now + ACCESS_TOKEN_EXP,
        };
        encode_jwt(&claims, secret).unwrap()
    }
}
