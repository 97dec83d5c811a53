use yamdb_auth_types::identity::Identity;
use yamdb_auth_types::permission::{Access, OwnerOrStaffOrReadOnly, authorize_object};
use yamdb_domain::pagination::{Page, PageRequest};
use yamdb_domain::validation::FieldErrors;

use crate::domain::repository::{CommentRepository, ReviewRepository, TitleRepository};
use crate::domain::types::{Comment, NewComment};
use crate::domain::validate;
use crate::error::ApiError;

/// Comments live under `/titles/{title_id}/reviews/{review_id}/`; both
/// parents must exist and belong together.
pub struct CommentUseCase<T, R, C>
where
    T: TitleRepository,
    R: ReviewRepository,
    C: CommentRepository,
{
    pub titles: T,
    pub reviews: R,
    pub comments: C,
}

impl<T, R, C> CommentUseCase<T, R, C>
where
    T: TitleRepository,
    R: ReviewRepository,
    C: CommentRepository,
{
    async fn ensure_review(&self, title_id: i32, review_id: i32) -> Result<(), ApiError> {
        if !self.titles.exists(title_id).await? {
            return Err(ApiError::TitleNotFound);
        }
        match self.reviews.find(title_id, review_id).await? {
            Some(_) => Ok(()),
            None => Err(ApiError::ReviewNotFound),
        }
    }

    async fn find(&self, title_id: i32, review_id: i32, id: i32) -> Result<Comment, ApiError> {
        self.ensure_review(title_id, review_id).await?;
        self.comments
            .find(review_id, id)
            .await?
            .ok_or(ApiError::CommentNotFound)
    }

    pub async fn list(
        &self,
        title_id: i32,
        review_id: i32,
        page: PageRequest,
        uri: &str,
    ) -> Result<Page<Comment>, ApiError> {
        self.ensure_review(title_id, review_id).await?;
        let (comments, count) = self.comments.list(review_id, page).await?;
        Ok(Page::new(comments, count, page, uri))
    }

    pub async fn get(&self, title_id: i32, review_id: i32, id: i32) -> Result<Comment, ApiError> {
        self.find(title_id, review_id, id).await
    }

    /// Any authenticated user may comment.
    pub async fn create(
        &self,
        actor: Option<&Identity>,
        title_id: i32,
        review_id: i32,
        text: Option<String>,
    ) -> Result<Comment, ApiError> {
        let actor = actor.ok_or(ApiError::NotAuthenticated)?;
        self.ensure_review(title_id, review_id).await?;
        let text = validated(text)?;
        self.comments
            .create(&NewComment {
                review_id,
                author_id: actor.user_id,
                text,
            })
            .await
    }

    /// Author, moderators and admins only. A missing `text` on PATCH keeps the
    /// stored one.
    pub async fn update(
        &self,
        actor: Option<&Identity>,
        (title_id, review_id, id): (i32, i32, i32),
        text: Option<String>,
        partial: bool,
    ) -> Result<Comment, ApiError> {
        let comment = self.find(title_id, review_id, id).await?;
        authorize_object(
            &OwnerOrStaffOrReadOnly,
            actor,
            Access::Write,
            comment.author_id,
        )?;
        let text = if partial {
            validated(text.or(Some(comment.text)))?
        } else {
            validated(text)?
        };
        self.comments.update(id, &text).await
    }

    pub async fn delete(
        &self,
        actor: Option<&Identity>,
        (title_id, review_id, id): (i32, i32, i32),
    ) -> Result<(), ApiError> {
        let comment = self.find(title_id, review_id, id).await?;
        authorize_object(
            &OwnerOrStaffOrReadOnly,
            actor,
            Access::Write,
            comment.author_id,
        )?;
        self.comments.delete(id).await?;
        Ok(())
    }
}

fn validated(text: Option<String>) -> Result<String, ApiError> {
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
    errors.into_result()?;
    Ok(text)
}
