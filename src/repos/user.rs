//! User repository: account rows in the `users` table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::Database;
use crate::repos::RepoError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
    pub phone_number: Option<String>,
    pub saved_location: Option<String>,
}

/// Fields required to register a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub user_id: i64,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Clone)]
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn find(&self, user_id: i64) -> Result<Option<User>, RepoError> {
        let mut conn = self.db.read().await?;
        let row = sqlx::query_as::<_, User>(
            "SELECT user_id, username, firstname, lastname, phone_number, saved_location \
             FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn create(&self, user: &NewUser) -> Result<(), RepoError> {
        let mut conn = self.db.write().await?;
        sqlx::query(
            "INSERT INTO users (user_id, username, firstname, lastname) VALUES (?, ?, ?, ?)",
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Update whichever contact fields were provided. Each field is its own
    /// statement; omitted fields are left untouched.
    pub async fn update_contact(
        &self,
        user_id: i64,
        phone_number: Option<&str>,
        location: Option<&str>,
    ) -> Result<(), RepoError> {
        let mut conn = self.db.write().await?;

        if let Some(phone) = phone_number {
            sqlx::query("UPDATE users SET phone_number = ? WHERE user_id = ?")
                .bind(phone)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;
        }
        if let Some(location) = location {
            sqlx::query("UPDATE users SET saved_location = ? WHERE user_id = ?")
                .bind(location)
                .bind(user_id)
                .execute(&mut *conn)
                .await?;
        }

        Ok(())
    }
}
