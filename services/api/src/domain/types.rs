use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yamdb_domain::user::UserRole;

/// Registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: UserRole,
    pub is_staff: bool,
    pub email_confirmed: bool,
    pub confirmation_code: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Fresh account with default profile fields and the `user` role.
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: UserRole::User,
            is_staff: false,
            email_confirmed: false,
            confirmation_code: None,
            password_hash: None,
            created_at: Utc::now(),
        }
    }
}

/// Editable profile fields. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<UserRole>,
}

/// Which lookup table a [`Term`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Genre,
    Category,
}

impl TermKind {
    pub fn name_max_len(self) -> usize {
        match self {
            Self::Genre => GENRE_NAME_MAX,
            Self::Category => CATEGORY_NAME_MAX,
        }
    }
}

/// Genre or category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct NewTerm {
    pub name: String,
    pub slug: String,
}

/// Title as read, with its genres, category and derived rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub description: String,
    pub genres: Vec<Term>,
    pub category: Option<Term>,
    pub rating: Option<f64>,
}

/// Stored title columns, with genres and category already resolved to ids.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleRecord {
    pub name: String,
    pub year: i32,
    pub description: String,
    pub genre_ids: Vec<i32>,
    pub category_id: Option<i32>,
}

/// Title write payload; genres and category are referenced by slug.
///
/// On partial updates `None` keeps the stored value. `category: Some(None)`
/// clears the category.
#[derive(Debug, Clone, Default)]
pub struct TitleInput {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    pub category: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TitleFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: i32,
    pub title_id: i32,
    pub author_id: Option<Uuid>,
    /// Author's username.
    pub author: Option<String>,
    pub text: String,
    pub score: i16,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub title_id: i32,
    pub author_id: Uuid,
    pub text: String,
    pub score: i16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: i32,
    pub review_id: i32,
    pub author_id: Option<Uuid>,
    /// Author's username.
    pub author: Option<String>,
    pub text: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub review_id: i32,
    pub author_id: Uuid,
    pub text: String,
}

/// Mail queued in the same transaction as the change that triggers it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

/// Signed JWT pair returned by the token endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Confirmation code length in characters.
pub const CONFIRMATION_CODE_LEN: usize = 32;

/// Outbox event kind consumed by the mail relay.
pub const CONFIRMATION_CODE_EVENT: &str = "confirmation_code_created";

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const PERSON_NAME_MAX: usize = 30;
pub const BIO_MAX: usize = 300;
pub const GENRE_NAME_MAX: usize = 30;
pub const CATEGORY_NAME_MAX: usize = 300;
pub const SLUG_MAX: usize = 50;
pub const TITLE_NAME_MAX: usize = 300;
pub const DESCRIPTION_MAX: usize = 300;
