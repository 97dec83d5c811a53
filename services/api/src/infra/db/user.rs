use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionError, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;
use yamdb_core::sea_ext::fetch_page;
use yamdb_domain::{pagination::PageRequest, validation::FieldErrors};

use yamdb_api_schema::users;

use super::insert_outbox_event;
use crate::domain::repository::UserRepository;
use crate::domain::types::{OutboxEvent, User};
use crate::error::ApiError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn list(&self, page: PageRequest) -> Result<(Vec<User>, u64), ApiError> {
        let select = users::Entity::find().order_by_asc(users::Column::Username);
        let (models, count) = fetch_page(select, &self.db, page)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((users, count))
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        user_active_model(user)
            .insert(&self.db)
            .await
            .map_err(|err| write_error(err, "create user"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), ApiError> {
        user_active_model(user)
            .update(&self.db)
            .await
            .map_err(|err| write_error(err, "update user"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn create_with_outbox(&self, user: &User, event: &OutboxEvent) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let user = user.clone();
                let event = event.clone();
                Box::pin(async move {
                    user_active_model(&user).insert(txn).await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Transaction(err) => write_error(err, "create user with outbox"),
                other => ApiError::Internal(
                    anyhow::Error::new(other).context("create user with outbox"),
                ),
            })?;
        Ok(())
    }

    async fn store_confirmation_code(
        &self,
        user_id: Uuid,
        code: &str,
        event: &OutboxEvent,
    ) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let code = code.to_owned();
                let event = event.clone();
                Box::pin(async move {
                    users::ActiveModel {
                        id: Set(user_id),
                        confirmation_code: Set(Some(code)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                    insert_outbox_event(txn, &event).await?;
                    Ok(())
                })
            })
            .await
            .context("store confirmation code with outbox")?;
        Ok(())
    }

    async fn consume_confirmation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<User>, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::EmailConfirmed, Expr::value(true))
            .col_expr(users::Column::ConfirmationCode, Expr::value(Option::<String>::None))
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::ConfirmationCode.eq(code))
            .exec(&self.db)
            .await
            .context("consume confirmation code")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_email(email).await
    }
}

/// Unique violations lost a race against the use case's own uniqueness check;
/// report them the same way.
fn write_error(err: DbErr, context: &'static str) -> ApiError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message)) => duplicate_field(&message).into(),
        _ => ApiError::Internal(anyhow::Error::new(err).context(context)),
    }
}

/// Names the offending column from the constraint in the database message
/// (`users_email_key`, `users_username_key`).
fn duplicate_field(message: &str) -> FieldErrors {
    if message.contains("email") {
        FieldErrors::single("email", "user with this email already exists")
    } else {
        FieldErrors::single("username", "user with this username already exists")
    }
}

fn user_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        first_name: Set(user.first_name.clone()),
        last_name: Set(user.last_name.clone()),
        bio: Set(user.bio.clone()),
        role: Set(user.role.as_str().to_owned()),
        is_staff: Set(user.is_staff),
        email_confirmed: Set(user.email_confirmed),
        confirmation_code: Set(user.confirmation_code.clone()),
        password_hash: Set(user.password_hash.clone()),
        created_at: Set(user.created_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = model
        .role
        .parse()
        .with_context(|| format!("user {} has an unknown role", model.id))?;
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        bio: model.bio,
        role,
        is_staff: model.is_staff,
        email_confirmed: model.email_confirmed,
        confirmation_code: model.confirmation_code,
        password_hash: model.password_hash,
        created_at: model.created_at,
    })
}
