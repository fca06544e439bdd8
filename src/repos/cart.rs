//! Cart repository: per-user cart rows in the `user_cart` table.

use std::sync::Arc;

use serde::Serialize;
use sqlx::FromRow;

use crate::db::Database;
use crate::repos::menu::PizzaSummary;
use crate::repos::RepoError;

/// One line in a user's cart.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartItem {
    pub product_name: String,
    pub quantity: i64,
    pub total_price: f64,
}

#[derive(Clone)]
pub struct CartRepository {
    db: Arc<Database>,
}

impl CartRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Add one unit of a product to the cart, creating the row on first add.
    ///
    /// Pricing comes from the menu; an unknown product id is silently
    /// ignored. All statements run on the same write connection so the
    /// price read cannot race a lagging replica.
    pub async fn add_item(&self, user_id: i64, product_id: i64) -> Result<(), RepoError> {
        let mut conn = self.db.write().await?;

        let existing = sqlx::query_as::<_, (i64, f64)>(
            "SELECT quantity, total_price FROM user_cart WHERE user_id = ? AND product_id = ?",
        )
        .bind(user_id)
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;

        match existing {
            Some((quantity, total_price)) => {
                let unit_price = total_price / quantity as f64;
                let new_quantity = quantity + 1;
                sqlx::query(
                    "UPDATE user_cart SET quantity = ?, total_price = ? \
                     WHERE user_id = ? AND product_id = ?",
                )
                .bind(new_quantity)
                .bind(new_quantity as f64 * unit_price)
                .bind(user_id)
                .bind(product_id)
                .execute(&mut *conn)
                .await?;
            }
            None => {
                let pizza = sqlx::query_as::<_, PizzaSummary>(
                    "SELECT id, name, price FROM menu WHERE id = ?",
                )
                .bind(product_id)
                .fetch_optional(&mut *conn)
                .await?;

                if let Some(pizza) = pizza {
                    sqlx::query(
                        "INSERT INTO user_cart (user_id, product_id, product_name, quantity, total_price) \
                         VALUES (?, ?, ?, 1, ?)",
                    )
                    .bind(user_id)
                    .bind(product_id)
                    .bind(&pizza.name)
                    .bind(pizza.price)
                    .execute(&mut *conn)
                    .await?;
                }
            }
        }

        Ok(())
    }

    /// Everything currently in the user's cart.
    pub async fn items(&self, user_id: i64) -> Result<Vec<CartItem>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, CartItem>(
            "SELECT product_name, quantity, total_price FROM user_cart WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Remove every row from the user's cart.
    pub async fn clear(&self, user_id: i64) -> Result<(), RepoError> {
        let mut conn = self.db.write().await?;
        sqlx::query("DELETE FROM user_cart WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
