use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};
use yamdb_core::sea_ext::{fetch_page, is_foreign_key_violation, is_unique_violation};
use yamdb_domain::pagination::PageRequest;

use yamdb_api_schema::{categories, genres};

use super::contains_ci;
use crate::domain::repository::TermRepository;
use crate::domain::types::{NewTerm, Term, TermKind};
use crate::error::ApiError;
use crate::usecase::taxonomy::slug_taken;

/// Genres and categories share one table shape; this expands to a repository
/// over the given entity module.
macro_rules! term_repository {
    ($repo:ident, $entity:ident, $kind:expr, $label:literal) => {
        #[derive(Clone)]
        pub struct $repo {
            pub db: DatabaseConnection,
        }

        impl TermRepository for $repo {
            fn kind(&self) -> TermKind {
                $kind
            }

            async fn list(
                &self,
                search: Option<&str>,
                page: PageRequest,
            ) -> Result<(Vec<Term>, u64), ApiError> {
                let mut select = $entity::Entity::find()
                    .order_by_asc($entity::Column::Name)
                    .order_by_asc($entity::Column::Id);
                if let Some(search) = search.filter(|s| !s.is_empty()) {
                    select = select.filter(contains_ci(
                        Expr::col(($entity::Entity, $entity::Column::Name)),
                        search,
                    ));
                }
                let (models, count) = fetch_page(select, &self.db, page)
                    .await
                    .context(concat!("list ", $label))?;
                Ok((models.into_iter().map(term_from_model!($entity)).collect(), count))
            }

            async fn find_by_slug(&self, slug: &str) -> Result<Option<Term>, ApiError> {
                let model = $entity::Entity::find()
                    .filter($entity::Column::Slug.eq(slug))
                    .one(&self.db)
                    .await
                    .context(concat!("find ", $label, " by slug"))?;
                Ok(model.map(term_from_model!($entity)))
            }

            async fn find_by_slugs(&self, slugs: &[String]) -> Result<Vec<Term>, ApiError> {
                if slugs.is_empty() {
                    return Ok(Vec::new());
                }
                let models = $entity::Entity::find()
                    .filter($entity::Column::Slug.is_in(slugs.iter().cloned()))
                    .order_by_asc($entity::Column::Name)
                    .all(&self.db)
                    .await
                    .context(concat!("find ", $label, " by slugs"))?;
                Ok(models.into_iter().map(term_from_model!($entity)).collect())
            }

            async fn create(&self, term: &NewTerm) -> Result<Term, ApiError> {
                let model = $entity::ActiveModel {
                    name: Set(term.name.clone()),
                    slug: Set(term.slug.clone()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        ApiError::from(slug_taken())
                    } else {
                        ApiError::Internal(anyhow::Error::new(err).context(concat!("create ", $label)))
                    }
                })?;
                Ok(term_from_model!($entity)(model))
            }

            async fn delete(&self, slug: &str) -> Result<bool, ApiError> {
                let result = $entity::Entity::delete_many()
                    .filter($entity::Column::Slug.eq(slug))
                    .exec(&self.db)
                    .await
                    .map_err(|err| {
                        if is_foreign_key_violation(&err) {
                            ApiError::CategoryInUse
                        } else {
                            ApiError::Internal(anyhow::Error::new(err).context(concat!("delete ", $label)))
                        }
                    })?;
                Ok(result.rows_affected > 0)
            }
        }
    };
}

macro_rules! term_from_model {
    ($entity:ident) => {
        |model: $entity::Model| Term {
            id: model.id,
            name: model.name,
            slug: model.slug,
        }
    };
}

term_repository!(DbGenreRepository, genres, TermKind::Genre, "genres");
term_repository!(DbCategoryRepository, categories, TermKind::Category, "categories");
