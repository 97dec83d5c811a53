use yamdb_auth_types::identity::Identity;
use yamdb_auth_types::permission::{Access, OwnerOrStaffOrReadOnly, authorize_object};
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::{ReviewRepository, TitleRepository};
use crate::domain::types::{NewReview, Review};
use crate::domain::validate;
use crate::error::ApiError;

/// Review write payload. On partial updates `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ReviewInput {
    pub text: Option<String>,
    pub score: Option<i32>,
}

fn validated(text: Option<String>, score: Option<i32>) -> Result<(String, i16), ApiError> {
    let mut errors = FieldErrors::new();
    let text = match text {
        Some(text) => {
            validate::required(&mut errors, "text", &text);
            text
        }
        None => {
            errors.add("text", "this field is required");
            String::new()
        }
    };
    let score = match score {
        Some(score) => {
            validate::score(&mut errors, score);
            score
        }
        None => {
            errors.add("score", "this field is required");
            0
        }
    };
    errors.into_result()?;

    let score = i16::try_from(score).map_err(|e| ApiError::Internal(e.into()))?;
    Ok((text, score))
}

async fn ensure_title<T: TitleRepository>(titles: &T, title_id: i32) -> Result<(), ApiError> {
    if titles.exists(title_id).await? {
        Ok(())
    } else {
        Err(ApiError::TitleNotFound)
    }
}

// ── ListReviews ──────────────────────────────────────────────────────────────

pub struct ListReviewsUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> ListReviewsUseCase<T, R> {
    pub async fn execute(
        &self,
        title_id: i32,
        page: PageRequest,
        uri: &str,
    ) -> Result<Page<Review>, ApiError> {
        ensure_title(&self.titles, title_id).await?;
        let (reviews, count) = self.reviews.list(title_id, page).await?;
        Ok(Page::new(reviews, count, page, uri))
    }
}

// ── GetReview ────────────────────────────────────────────────────────────────

pub struct GetReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> GetReviewUseCase<T, R> {
    pub async fn execute(&self, title_id: i32, id: i32) -> Result<Review, ApiError> {
        ensure_title(&self.titles, title_id).await?;
        self.reviews
            .find(title_id, id)
            .await?
            .ok_or(ApiError::ReviewNotFound)
    }
}

// ── CreateReview ─────────────────────────────────────────────────────────────

pub struct CreateReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> CreateReviewUseCase<T, R> {
    /// Any authenticated user may review a title once.
    pub async fn execute(
        &self,
        actor: Option<&Identity>,
        title_id: i32,
        input: ReviewInput,
    ) -> Result<Review, ApiError> {
        let actor = actor.ok_or(ApiError::NotAuthenticated)?;
        ensure_title(&self.titles, title_id).await?;
        let (text, score) = validated(input.text, input.score)?;

        if self
            .reviews
            .exists_by_author(title_id, actor.user_id)
            .await?
        {
            return Err(ApiError::DuplicateReview);
        }

        self.reviews
            .create(&NewReview {
                title_id,
                author_id: actor.user_id,
                text,
                score,
            })
            .await
    }
}

// ── UpdateReview ─────────────────────────────────────────────────────────────

pub struct UpdateReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> UpdateReviewUseCase<T, R> {
    /// Author, moderators and admins only. `partial` is PATCH semantics.
    pub async fn execute(
        &self,
        actor: Option<&Identity>,
        title_id: i32,
        id: i32,
        input: ReviewInput,
        partial: bool,
    ) -> Result<Review, ApiError> {
        ensure_title(&self.titles, title_id).await?;
        let review = self
            .reviews
            .find(title_id, id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;
        authorize_object(
            &OwnerOrStaffOrReadOnly,
            actor,
            Access::Write,
            review.author_id,
        )?;

        let (text, score) = if partial {
            validated(
                input.text.or(Some(review.text)),
                input.score.or(Some(i32::from(review.score))),
            )?
        } else {
            validated(input.text, input.score)?
        };
        self.reviews.update(id, &text, score).await
    }
}

// ── DeleteReview ─────────────────────────────────────────────────────────────

pub struct DeleteReviewUseCase<T: TitleRepository, R: ReviewRepository> {
    pub titles: T,
    pub reviews: R,
}

impl<T: TitleRepository, R: ReviewRepository> DeleteReviewUseCase<T, R> {
    pub async fn execute(
        &self,
        actor: Option<&Identity>,
        title_id: i32,
        id: i32,
    ) -> Result<(), ApiError> {
        ensure_title(&self.titles, title_id).await?;
        let review = self
            .reviews
            .find(title_id, id)
            .await?
            .ok_or(ApiError::ReviewNotFound)?;
        authorize_object(
            &OwnerOrStaffOrReadOnly,
            actor,
            Access::Write,
            review.author_id,
        )?;
        self.reviews.delete(id).await?;
        Ok(())
    }
}
