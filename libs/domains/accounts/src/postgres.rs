use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{StorageError, StorageResult},
    models::{Account, NewAccount},
    repository::AccountRepository,
};

/// PostgreSQL implementation of [`AccountRepository`] using SeaORM.
///
/// Email uniqueness is enforced by the unique index on `accounts.email`;
/// violations surface as [`StorageError::Conflict`].
#[derive(Clone)]
pub struct PgAccountRepository {
    db: DatabaseConnection,
}

impl PgAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage_error(error: DbErr) -> StorageError {
    classify(error.sql_err(), &error)
}

/// Driver-classified unique violations are conflicts. Errors the driver did
/// not classify are matched on the Postgres message text.
fn classify(sql_err: Option<SqlErr>, error: &DbErr) -> StorageError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = sql_err {
        return StorageError::Conflict(detail);
    }

    let message = error.to_string();
    if message.contains("duplicate key") || message.contains("unique constraint") {
        StorageError::Conflict(message)
    } else {
        StorageError::Backend(format!("Database error: {}", message))
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn list_all(&self) -> StorageResult<Vec<Account>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::CreatedAt)
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Account>> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<Account>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, account: NewAccount) -> StorageResult<Account> {
        let active_model: entity::ActiveModel = account.into();

        let model = entity::Entity::insert(active_model)
            .exec_with_returning(&self.db)
            .await
            .map_err(storage_error)?;

        tracing::debug!(account_id = %model.id, "Inserted account row");
        Ok(model.into())
    }

    async fn update_by_id(&self, id: Uuid, name: &str, email: &str) -> StorageResult<()> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(name))
            .col_expr(entity::Column::Email, Expr::value(email))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        expect_one_row(result.rows_affected, id)
    }

    async fn update_password_by_id(&self, id: Uuid, password_hash: &str) -> StorageResult<()> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::PasswordHash, Expr::value(password_hash))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
            .filter(entity::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        expect_one_row(result.rows_affected, id)
    }

    async fn delete_by_id(&self, id: Uuid) -> StorageResult<()> {
        let result = entity::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        expect_one_row(result.rows_affected, id)
    }
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

// The row was checked just before the write; zero rows means it was removed in between.
fn expect_one_row(rows_affected: u64, id: Uuid) -> StorageResult<()> {
    if rows_affected == 0 {
        return Err(StorageError::Backend(format!("account {} vanished", id)));
    }
    Ok(())
}
