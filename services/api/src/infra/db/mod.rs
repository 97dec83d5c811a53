//! sea-orm implementations of the repository traits.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use uuid::Uuid;

use yamdb_api_schema::{mail_outbox, users};

use crate::domain::types::OutboxEvent;
use crate::error::ApiError;

mod comment;
mod review;
mod term;
mod title;
mod user;

pub use comment::DbCommentRepository;
pub use review::DbReviewRepository;
pub use term::{DbCategoryRepository, DbGenreRepository};
pub use title::DbTitleRepository;
pub use user::DbUserRepository;

async fn insert_outbox_event<C: ConnectionTrait>(
    conn: &C,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    mail_outbox::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        recipient: Set(event.recipient.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        created_at: Set(Utc::now()),
        sent_at: Set(None),
    }
    .insert(conn)
    .await?;
    Ok(())
}

/// Usernames of the given authors, for rendering reviews and comments.
async fn usernames<C: ConnectionTrait>(
    conn: &C,
    author_ids: impl IntoIterator<Item = Option<Uuid>>,
) -> Result<HashMap<Uuid, String>, DbErr> {
    let mut ids: Vec<Uuid> = author_ids.into_iter().flatten().collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Uuid, String)> = users::Entity::find()
        .select_only()
        .column(users::Column::Id)
        .column(users::Column::Username)
        .filter(users::Column::Id.is_in(ids))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Foreign key violation on an insert under a parent row: the author's
/// account (`fk_*_author_id`) or the parent was deleted after the request was
/// authorized.
fn broken_reference(message: &str, missing_parent: ApiError) -> ApiError {
    if message.contains("author_id") {
        ApiError::NotAuthenticated
    } else {
        missing_parent
    }
}

/// `lower(column) LIKE '%needle%'`.
fn contains_ci(column: impl Into<SimpleExpr>, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(column)).like(like_pattern(needle))
}

/// Lowercased substring pattern with LIKE wildcards in `needle` escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
