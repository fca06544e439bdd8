//! Menu repository: read-only lookups over the `menu` table.

use std::sync::Arc;

use serde::Serialize;
use sqlx::FromRow;

use crate::db::Database;
use crate::repos::RepoError;

/// Full menu entry, as returned by the details endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PizzaDetails {
    pub name: String,
    pub description: String,
    pub photo_url: String,
    pub price: f64,
    pub id: i64,
}

/// Compact menu entry used for cart pricing and id lookups.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PizzaSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Clone)]
pub struct MenuRepository {
    db: Arc<Database>,
}

impl MenuRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// All dish names on the menu.
    pub async fn list_names(&self) -> Result<Vec<String>, RepoError> {
        let mut conn = self.db.read().await?;
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM menu")
            .fetch_all(&mut *conn)
            .await?;
        Ok(names)
    }

    /// Look up one pizza by name.
    pub async fn pizza_details(&self, pizza_name: &str) -> Result<Option<PizzaDetails>, RepoError> {
        let mut conn = self.db.read().await?;
        let row = sqlx::query_as::<_, PizzaDetails>(
            "SELECT name, description, photo_url, price, id FROM menu WHERE name = ?",
        )
        .bind(pizza_name)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    /// Look up one pizza by product id.
    pub async fn pizza_summary(&self, product_id: i64) -> Result<Option<PizzaSummary>, RepoError> {
        let mut conn = self.db.read().await?;
        let row = sqlx::query_as::<_, PizzaSummary>("SELECT id, name, price FROM menu WHERE id = ?")
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }
}
