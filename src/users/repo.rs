use async_trait::async_trait;
use sqlx::{error::DatabaseError, postgres::PgDatabaseError, PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::users::repo_types::{User, UserChanges};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Driver message and DETAIL are kept as reported.
    #[error("{message}{}", detail_suffix(.detail))]
    UniqueViolation {
        constraint: Option<String>,
        message: String,
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

/// Data access for the `users` table.
///
/// Lookups return `Ok(None)` when no row matches the id.
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert(&self, user: User) -> Result<User, StoreError>;
    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;
    async fn update(&self, user_id: Uuid, changes: &UserChanges)
        -> Result<Option<Uuid>, StoreError>;
    async fn delete(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl StoreError {
    pub fn constraint(&self) -> Option<&str> {
        match self {
            StoreError::UniqueViolation { constraint, .. } => constraint.as_deref(),
            StoreError::Database(sqlx::Error::Database(db)) => db.constraint(),
            StoreError::Database(_) => None,
        }
    }

    /// Splits unique-constraint rejections out of a write error.
    fn from_write(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation {
                constraint: db.constraint().map(str::to_string),
                message: db.message().to_string(),
                detail: db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .map(str::to_string),
            },
            other => StoreError::Database(other),
        }
    }
}

/// Builds `UPDATE users SET ... WHERE user_id = $n RETURNING user_id`.
/// `changes` must not be empty.
fn update_query(user_id: Uuid, changes: &UserChanges) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
    let mut set = qb.separated(", ");
    if let Some(name) = &changes.name {
        set.push("name = ").push_bind_unseparated(name.clone());
    }
    if let Some(surname) = &changes.surname {
        set.push("surname = ").push_bind_unseparated(surname.clone());
    }
    if let Some(email) = &changes.email {
        set.push("email = ").push_bind_unseparated(email.clone());
    }
    qb.push(" WHERE user_id = ")
        .push_bind(user_id)
        .push(" RETURNING user_id");
    qb
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn insert(&self, user: User) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, name, surname, email, is_active, hashed_password)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, name, surname, email, is_active, hashed_password
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.surname)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(&user.hashed_password)
        .fetch_one(&self.db)
        .await
        .map_err(StoreError::from_write)?;
        Ok(user)
    }

    async fn get_by_id(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, surname, email, is_active, hashed_password
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<Uuid>, StoreError> {
        if changes.is_empty() {
            return Ok(self.get_by_id(user_id).await?.map(|u| u.user_id));
        }
        let mut qb = update_query(user_id, changes);
        let updated = qb
            .build_query_scalar::<Uuid>()
            .fetch_optional(&self.db)
            .await
            .map_err(StoreError::from_write)?;
        Ok(updated)
    }

    async fn delete(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            r#"DELETE FROM users WHERE user_id = $1 RETURNING user_id"#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(deleted)
    }
}
