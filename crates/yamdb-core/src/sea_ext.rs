use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select, SqlErr,
};
use yamdb_domain::pagination::PageRequest;

/// Fetch one page of `select` together with the total row count.
pub async fn fetch_page<E, C>(
    select: Select<E>,
    db: &C,
    page: PageRequest,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync + 'static,
    C: ConnectionTrait,
{
    let paginator = select.paginate(db, u64::from(page.per_page));
    let count = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.index()).await?;
    Ok((rows, count))
}

/// Unique index violation, e.g. a duplicate slug or username.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Foreign key violation, e.g. deleting a category still referenced by titles.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
