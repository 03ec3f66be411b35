//! # User Repository
//!
//! Database operations for library users.

use libris_core::User;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::executor::{execute, Statement};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(())` - User stored
    /// * `Err(DbError::UniqueViolation)` - user_id already exists
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(user_id = user.user_id, "Inserting user");

        let stmt = Statement::new(
            "INSERT INTO Users (user_id, name, contact_info) VALUES (?1, ?2, ?3)",
        )
        .bind(user.user_id)
        .bind(user.name.as_str())
        .bind(user.contact_info.as_str());

        execute(&self.pool, &stmt).await?;
        Ok(())
    }

    /// Deletes a user by id.
    ///
    /// ## Returns
    /// * `Ok(true)` - User deleted
    /// * `Ok(false)` - No user had this id
    /// * `Err(DbError::ForeignKeyViolation)` - A transaction still references the user
    pub async fn delete(&self, user_id: i64) -> DbResult<bool> {
        debug!(user_id, "Deleting user");

        let stmt = Statement::new("DELETE FROM Users WHERE user_id = ?1").bind(user_id);
        let outcome = execute(&self.pool, &stmt).await?;

        Ok(outcome.touched_rows())
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, user_id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, name, contact_info FROM Users WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by id.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, name, contact_info FROM Users ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
