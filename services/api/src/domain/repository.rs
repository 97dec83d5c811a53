#![allow(async_fn_in_trait)]

use uuid::Uuid;
use yamdb_domain::pagination::PageRequest;

use crate::domain::types::{
    Comment, NewComment, NewReview, NewTerm, OutboxEvent, Review, Term, TermKind, Title,
    TitleFilter, TitleRecord, User,
};
use crate::error::ApiError;

pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Users ordered by username, plus the total count.
    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError>;

    async fn create(&self, user: &User) -> Result<(), ApiError>;

    /// Overwrite every column of an existing user.
    async fn update(&self, user: &User) -> Result<(), ApiError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;

    /// Insert a new user (carrying its confirmation code) and an outbox event
    /// atomically (same transaction).
    async fn create_with_outbox(&self, user: &User, event: &OutboxEvent) -> Result<(), ApiError>;

    /// Replace the confirmation code of an existing user and write an outbox
    /// event atomically.
    async fn store_confirmation_code(
        &self,
        user_id: Uuid,
        code: &str,
        event: &OutboxEvent,
    ) -> Result<(), ApiError>;

    /// Confirm the account and clear its code in one conditional write.
    /// Returns `None` when no user with this email holds this code, so a code
    /// is accepted at most once.
    async fn consume_confirmation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<User>, ApiError>;
}

/// Genre or category lookup table; one instance serves one [`TermKind`].
pub trait TermRepository: Send + Sync {
    fn kind(&self) -> TermKind;

    /// Terms ordered by name, optionally filtered by a case-insensitive
    /// substring of the name.
    async fn list(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Term>, u64), ApiError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Term>, ApiError>;

    /// Terms whose slug is in `slugs`; unknown slugs are skipped.
    async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Term>, ApiError>;

    async fn create(&self, term: &NewTerm) -> Result<Term, ApiError>;

    /// Returns `true` if deleted, `false` if not found. A category still
    /// referenced by titles fails with [`ApiError::CategoryInUse`].
    async fn delete(&self, slug: &str) -> Result<bool, ApiError>;
}

pub trait TitleRepository: Send + Sync {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Title>, u64), ApiError>;

    async fn find(&self, id: i32) -> Result<Option<Title>, ApiError>;

    async fn exists(&self, id: i32) -> Result<bool, ApiError>;

    async fn create(&self, record: &TitleRecord) -> Result<Title, ApiError>;

    /// Replace columns and genre links of an existing title.
    async fn update(&self, id: i32, record: &TitleRecord) -> Result<Title, ApiError>;

    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

pub trait ReviewRepository: Send + Sync {
    /// Reviews of a title, oldest first.
    async fn list(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), ApiError>;

    async fn find(&self, title_id: i32, id: i32) -> Result<Option<Review>, ApiError>;

    async fn exists_by_author(&self, title_id: i32, author_id: Uuid) -> Result<bool, ApiError>;

    /// A second review by the same author on the same title fails with
    /// [`ApiError::DuplicateReview`].
    async fn create(&self, review: &NewReview) -> Result<Review, ApiError>;

    async fn update(&self, id: i32, text: &str, score: i16) -> Result<Review, ApiError>;

    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}

pub trait CommentRepository: Send + Sync {
    /// Comments of a review, oldest first.
    async fn list(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, u64), ApiError>;

    async fn find(&self, review_id: i32, id: i32) -> Result<Option<Comment>, ApiError>;

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError>;

    async fn update(&self, id: i32, text: &str) -> Result<Comment, ApiError>;

    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}
