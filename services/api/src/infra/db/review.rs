use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;
use yamdb_core::sea_ext::fetch_page;
use yamdb_domain::pagination::PageRequest;

use yamdb_api_schema::reviews;

use super::{broken_reference, usernames};
use crate::domain::repository::ReviewRepository;
use crate::domain::types::{NewReview, Review};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl DbReviewRepository {
    async fn with_author(&self, model: reviews::Model) -> Result<Review, ApiError> {
        let mut authors = usernames(&self.db, [model.author_id])
            .await
            .context("load review author")?;
        let author = model.author_id.and_then(|id| authors.remove(&id));
        Ok(review_from_model(model, author))
    }
}

impl ReviewRepository for DbReviewRepository {
    async fn list(
        &self,
        title_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Review>, u64), ApiError> {
        let select = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .order_by_asc(reviews::Column::PubDate)
            .order_by_asc(reviews::Column::Id);
        let (models, count) = fetch_page(select, &self.db, page)
            .await
            .context("list reviews")?;
        let authors = usernames(&self.db, models.iter().map(|m| m.author_id))
            .await
            .context("load review authors")?;
        let reviews = models
            .into_iter()
            .map(|m| {
                let author = m.author_id.and_then(|id| authors.get(&id).cloned());
                review_from_model(m, author)
            })
            .collect();
        Ok((reviews, count))
    }

    async fn find(&self, title_id: i32, id: i32) -> Result<Option<Review>, ApiError> {
        let model = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::TitleId.eq(title_id))
            .one(&self.db)
            .await
            .context("find review")?;
        match model {
            Some(model) => self.with_author(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn exists_by_author(&self, title_id: i32, author_id: Uuid) -> Result<bool, ApiError> {
        let count = reviews::Entity::find()
            .filter(reviews::Column::TitleId.eq(title_id))
            .filter(reviews::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .context("check review exists by author")?;
        Ok(count > 0)
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        let model = reviews::ActiveModel {
            title_id: Set(review.title_id),
            author_id: Set(Some(review.author_id)),
            text: Set(review.text.clone()),
            score: Set(review.score),
            pub_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => ApiError::DuplicateReview,
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                broken_reference(&message, ApiError::TitleNotFound)
            }
            _ => ApiError::Internal(anyhow::Error::new(err).context("create review")),
        })?;
        self.with_author(model).await
    }

    async fn update(&self, id: i32, text: &str, score: i16) -> Result<Review, ApiError> {
        let model = reviews::ActiveModel {
            id: Set(id),
            text: Set(text.to_owned()),
            score: Set(score),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update review")?;
        self.with_author(model).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = reviews::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete review")?;
        Ok(result.rows_affected > 0)
    }
}

fn review_from_model(model: reviews::Model, author: Option<String>) -> Review {
    Review {
        id: model.id,
        title_id: model.title_id,
        author_id: model.author_id,
        author,
        text: model.text,
        score: model.score,
        pub_date: model.pub_date,
    }
}
