use rand::RngExt;
use serde_json::json;
use uuid::Uuid;
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::UserRepository;
use crate::domain::types::{
    CONFIRMATION_CODE_EVENT, CONFIRMATION_CODE_LEN, OutboxEvent, TokenPair, User,
};
use crate::domain::validate;
use crate::error::ApiError;
use crate::usecase::token::issue_token_pair;

/// Charset for confirmation codes (ASCII letters and digits).
const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

fn confirmation_event(user: &User, code: &str) -> OutboxEvent {
    let id = Uuid::new_v4();
    OutboxEvent {
        id,
        kind: CONFIRMATION_CODE_EVENT.to_owned(),
        recipient: user.email.clone(),
        payload: json!({
            "email": user.email,
            "username": user.username,
            "confirmation_code": code,
        }),
        idempotency_key: format!("{CONFIRMATION_CODE_EVENT}:{id}"),
    }
}

// ── Signup (POST /auth/email/) ───────────────────────────────────────────────

pub struct SignupInput {
    pub email: String,
    pub username: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SignupOutput {
    pub email: String,
    pub username: String,
}

pub struct SignupUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SignupUseCase<U> {
    /// Register `username`/`email` (or reuse the account when both match an
    /// existing one) and mail it a fresh confirmation code.
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, ApiError> {
        let mut errors = FieldErrors::new();
        validate::email(&mut errors, &input.email);
        validate::username(&mut errors, &input.username);
        errors.into_result()?;

        let by_email = self.users.find_by_email(&input.email).await?;
        let by_username = self.users.find_by_username(&input.username).await?;

        let code = generate_code();
        match (by_email, by_username) {
            (None, None) => {
                let mut user = User::new(input.username, input.email);
                user.confirmation_code = Some(code.clone());
                let event = confirmation_event(&user, &code);
                self.users.create_with_outbox(&user, &event).await?;
                tracing::info!(user_id = %user.id, "confirmation code issued to new user");
                Ok(SignupOutput {
                    email: user.email,
                    username: user.username,
                })
            }
            (Some(user), Some(same)) if user.id == same.id => {
                let event = confirmation_event(&user, &code);
                self.users
                    .store_confirmation_code(user.id, &code, &event)
                    .await?;
                tracing::info!(user_id = %user.id, "confirmation code reissued");
                Ok(SignupOutput {
                    email: user.email,
                    username: user.username,
                })
            }
            (by_email, by_username) => {
                let mut errors = FieldErrors::new();
                if by_email.is_some() {
                    errors.add("email", "user with this email already exists");
                }
                if by_username.is_some() {
                    errors.add("username", "user with this username already exists");
                }
                Err(ApiError::Validation(errors))
            }
        }
    }
}

// ── ConfirmEmail (POST /auth/token/) ─────────────────────────────────────────

pub struct ConfirmEmailInput {
    pub email: String,
    pub confirmation_code: String,
}

pub struct ConfirmEmailUseCase<U: UserRepository> {
    pub users: U,
    pub jwt_secret: String,
}

impl<U: UserRepository> ConfirmEmailUseCase<U> {
    /// Exchange a confirmation code for a token pair. The code is single-use.
    pub async fn execute(&self, input: ConfirmEmailInput) -> Result<TokenPair, ApiError> {
        let user = self
            .users
            .consume_confirmation_code(&input.email, &input.confirmation_code)
            .await?
            .ok_or(ApiError::InvalidConfirmationCode)?;

        issue_token_pair(&user, &self.jwt_secret)
    }
}
