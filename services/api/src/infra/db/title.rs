use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    sea_query::{Expr, Query},
};
use yamdb_core::sea_ext::fetch_page;
use yamdb_domain::{pagination::PageRequest, rating::ratings_by_title};

use yamdb_api_schema::{categories, genres, reviews, title_genres, titles};

use super::contains_ci;
use crate::domain::repository::TitleRepository;
use crate::domain::types::{Term, Title, TitleFilter, TitleRecord};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DbTitleRepository {
    pub db: DatabaseConnection,
}

impl TitleRepository for DbTitleRepository {
    async fn list(
        &self,
        filter: &TitleFilter,
        page: PageRequest,
    ) -> Result<(Vec<Title>, u64), ApiError> {
        let mut select = titles::Entity::find().order_by_asc(titles::Column::Id);

        if let Some(name) = filter.name.as_deref().filter(|n| !n.is_empty()) {
            select = select.filter(contains_ci(
                Expr::col((titles::Entity, titles::Column::Name)),
                name,
            ));
        }
        if let Some(year) = filter.year {
            select = select.filter(titles::Column::Year.eq(year));
        }
        if let Some(slug) = &filter.category {
            select = select.filter(
                titles::Column::CategoryId.in_subquery(
                    Query::select()
                        .column(categories::Column::Id)
                        .from(categories::Entity)
                        .and_where(categories::Column::Slug.eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }
        if let Some(slug) = &filter.genre {
            select = select.filter(
                titles::Column::Id.in_subquery(
                    Query::select()
                        .column((title_genres::Entity, title_genres::Column::TitleId))
                        .from(title_genres::Entity)
                        .inner_join(
                            genres::Entity,
                            Expr::col((genres::Entity, genres::Column::Id))
                                .equals((title_genres::Entity, title_genres::Column::GenreId)),
                        )
                        .and_where(Expr::col((genres::Entity, genres::Column::Slug)).eq(slug.as_str()))
                        .to_owned(),
                ),
            );
        }

        let (models, count) = fetch_page(select, &self.db, page)
            .await
            .context("list titles")?;
        let titles = hydrate(&self.db, models).await.context("load title relations")?;
        Ok((titles, count))
    }

    async fn find(&self, id: i32) -> Result<Option<Title>, ApiError> {
        let Some(model) = titles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find title")?
        else {
            return Ok(None);
        };
        let mut titles = hydrate(&self.db, vec![model])
            .await
            .context("load title relations")?;
        Ok(titles.pop())
    }

    async fn exists(&self, id: i32) -> Result<bool, ApiError> {
        let count = titles::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .context("check title exists")?;
        Ok(count > 0)
    }

    async fn create(&self, record: &TitleRecord) -> Result<Title, ApiError> {
        let id = self
            .db
            .transaction::<_, i32, DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    let model = titles::ActiveModel {
                        name: Set(record.name),
                        year: Set(record.year),
                        description: Set(record.description),
                        category_id: Set(record.category_id),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;
                    link_genres(txn, model.id, &record.genre_ids).await?;
                    Ok(model.id)
                })
            })
            .await
            .context("create title")?;
        self.find(id)
            .await?
            .with_context(|| format!("title {id} missing after insert"))
            .map_err(ApiError::from)
    }

    async fn update(&self, id: i32, record: &TitleRecord) -> Result<Title, ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let record = record.clone();
                Box::pin(async move {
                    titles::ActiveModel {
                        id: Set(id),
                        name: Set(record.name),
                        year: Set(record.year),
                        description: Set(record.description),
                        category_id: Set(record.category_id),
                    }
                    .update(txn)
                    .await?;
                    title_genres::Entity::delete_many()
                        .filter(title_genres::Column::TitleId.eq(id))
                        .exec(txn)
                        .await?;
                    link_genres(txn, id, &record.genre_ids).await?;
                    Ok(())
                })
            })
            .await
            .context("update title")?;
        self.find(id)
            .await?
            .with_context(|| format!("title {id} missing after update"))
            .map_err(ApiError::from)
    }

    async fn delete(&self, id: i32) -> Result<bool, ApiError> {
        let result = titles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete title")?;
        Ok(result.rows_affected > 0)
    }
}

async fn link_genres<C: ConnectionTrait>(
    conn: &C,
    title_id: i32,
    genre_ids: &[i32],
) -> Result<(), DbErr> {
    if genre_ids.is_empty() {
        return Ok(());
    }
    let links = genre_ids.iter().map(|&genre_id| title_genres::ActiveModel {
        title_id: Set(title_id),
        genre_id: Set(genre_id),
    });
    title_genres::Entity::insert_many(links).exec(conn).await?;
    Ok(())
}

/// Attach genres, category and rating to each title, keeping input order.
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    models: Vec<titles::Model>,
) -> Result<Vec<Title>, DbErr> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let mut genres_by_title: HashMap<i32, Vec<Term>> = HashMap::new();
    let links = title_genres::Entity::find()
        .filter(title_genres::Column::TitleId.is_in(ids.clone()))
        .find_also_related(genres::Entity)
        .order_by_asc(genres::Column::Name)
        .all(conn)
        .await?;
    for (link, genre) in links {
        if let Some(genre) = genre {
            genres_by_title.entry(link.title_id).or_default().push(Term {
                id: genre.id,
                name: genre.name,
                slug: genre.slug,
            });
        }
    }

    let mut category_ids: Vec<i32> = models.iter().filter_map(|m| m.category_id).collect();
    category_ids.sort_unstable();
    category_ids.dedup();
    let categories: HashMap<i32, Term> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        categories::Entity::find()
            .filter(categories::Column::Id.is_in(category_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|c| {
                (
                    c.id,
                    Term {
                        id: c.id,
                        name: c.name,
                        slug: c.slug,
                    },
                )
            })
            .collect()
    };

    let scores: Vec<(i32, i16)> = reviews::Entity::find()
        .select_only()
        .column(reviews::Column::TitleId)
        .column(reviews::Column::Score)
        .filter(reviews::Column::TitleId.is_in(ids))
        .into_tuple()
        .all(conn)
        .await?;
    let ratings = ratings_by_title(scores);

    Ok(models
        .into_iter()
        .map(|m| Title {
            id: m.id,
            genres: genres_by_title.remove(&m.id).unwrap_or_default(),
            category: m.category_id.and_then(|id| categories.get(&id).cloned()),
            rating: ratings.get(&m.id).copied(),
            name: m.name,
            year: m.year,
            description: m.description,
        })
        .collect())
}
