use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::user_dto::{CreateUserPayload, UpdateUserPayload};
use crate::models::user::User;

/// Columns guarded by a unique constraint on `users`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
}

impl UniqueField {
    pub fn from_constraint(name: &str) -> Option<Self> {
        match name {
            "users_email_key" => Some(UniqueField::Email),
            "users_username_key" => Some(UniqueField::Username),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Username => "username",
        }
    }

    pub fn conflict_message(&self) -> &'static str {
        match self {
            UniqueField::Email => "Email already exists",
            UniqueField::Username => "Username already exists",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write was rejected by a unique constraint. `None` when the
    /// constraint is not one of the known `users` keys.
    #[error("unique constraint violated on {}", .0.map(|f| f.as_str()).unwrap_or("unknown column"))]
    UniqueViolation(Option<UniqueField>),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = db_err.constraint().and_then(UniqueField::from_constraint);
                return StoreError::UniqueViolation(field);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence for [`User`] records. Uniqueness of `email` and `username` is
/// the store's job: writes that collide must fail with
/// [`StoreError::UniqueViolation`] and leave nothing behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in ascending id order.
    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn get(&self, id: i64) -> StoreResult<Option<User>>;

    async fn insert(&self, payload: CreateUserPayload) -> StoreResult<User>;

    /// Applies the present fields of `changes`. `Ok(None)` if the row is gone.
    async fn update(&self, id: i64, changes: UpdateUserPayload) -> StoreResult<Option<User>>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> StoreResult<Vec<User>> {
        let query = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn insert(&self, payload: CreateUserPayload) -> StoreResult<User> {
        let query = format!(
            "INSERT INTO users (email, username, first_name, last_name)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(payload.email)
            .bind(payload.username)
            .bind(payload.first_name)
            .bind(payload.last_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UpdateUserPayload) -> StoreResult<Option<User>> {
        let query = format!(
            "UPDATE users
             SET
                 email = COALESCE($2, email),
                 username = COALESCE($3, username),
                 first_name = COALESCE($4, first_name),
                 last_name = COALESCE($5, last_name),
                 is_active = COALESCE($6, is_active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(changes.email)
            .bind(changes.username)
            .bind(changes.first_name)
            .bind(changes.last_name)
            .bind(changes.is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
