use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, SqlErr,
};
use yamdb_core::sea_ext::fetch_page;
use yamdb_domain::pagination::PageRequest;

use yamdb_api_schema::comments;

use super::{broken_reference, usernames};
use crate::domain::repository::CommentRepository;
use crate::domain::types::{Comment, NewComment};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DbCommentRepository {
    pub db: DatabaseConnection,
}

impl DbCommentRepository {
    /// Attach the author's username.
    async fn with_author(&self, model: comments::Model) -> Result<Comment, ApiError> {
        let mut authors = usernames(&self.db, [model.author_id])
            .await
            .context("load comment author")?;
        let author = model.author_id.and_then(|id| authors.remove(&id));
        Ok(comment_from_model(model, author))
    }
}

impl CommentRepository for DbCommentRepository {
    async fn list(
        &self,
        review_id: i32,
        page: PageRequest,
    ) -> Result<(Vec<Comment>, u64), ApiError> {
        let select = comments::Entity::find()
            .filter(comments::Column::ReviewId.eq(review_id))
            .order_by_asc(comments::Column::PubDate)
            .order_by_asc(comments::Column::Id);
        let (models, count) = fetch_page(select, &self.db, page)
            .await
            .context("list comments")?;
        let authors = usernames(&self.db, models.iter().map(|m| m.author_id))
            .await
            .context("load comment authors")?;
        let comments = models
            .into_iter()
            .map(|m| {
                let author = m.author_id.and_then(|id| authors.get(&id).cloned());
                comment_from_model(m, author)
            })
            .collect();
        Ok((comments, count))
    }

    async fn find(&self, review_id: i32, id: i32) -> Result<Option<Comment>, ApiError> {
        let model = comments::Entity::find_by_id(id)
            .filter(comments::Column::ReviewId.eq(review_id))
            .one(&self.db)
            .await
            .context("find comment")?;
        match model {
            Some(model) => self.with_author(model).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        let model = comments::ActiveModel {
            review_id: Set(comment.review_id),
            author_id: Set(Some(comment.author_id)),
            text: Set(comment.text.clone()),
            pub_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
                broken_reference(&message, ApiError::ReviewNotFound)
            }
            _ => ApiError::Internal(anyhow::Error::new(err).context("create comment")),
        })?;
        self.with_author(model).await
    }

    async fn update(&self, id: i32, text: &str) -> Result<Comment, ApiError> {
        let model = comments::ActiveModel {
            id: Set(id),
            text: Set(text.to_owned()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update comment")?;
        self.with_author(model).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = comments::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete comment")?;
        Ok(result.rows_affected > 0)
    }
}

fn comment_from_model(model: comments::Model, author: Option<String>) -> Comment {
    Comment {
        id: model.id,
        review_id: model.review_id,
        author_id: model.author_id,
        author,
        text: model.text,
        pub_date: model.pub_date,
    }
}
