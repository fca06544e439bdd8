//! Order repository: order lifecycle over the `orders` table.
//!
//! Orders move through the statuses On Hold → In Progress → Delivery →
//! (Done/Cancelled); the first three count as active.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{Connection, FromRow};

use crate::db::Database;
use crate::repos::RepoError;

const ORDER_COLUMNS: &str =
    "order_id, user_id, phone_number, order_list, total_price, order_time, location, status";

/// A full order row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub order_id: i64,
    pub user_id: i64,
    pub phone_number: String,
    pub order_list: String,
    pub total_price: f64,
    pub order_time: NaiveDateTime,
    pub location: String,
    pub status: String,
}

/// Id + status pair used by the listing endpoints.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderStatus {
    pub order_id: i64,
    pub status: String,
}

/// Minimal view of orders created after a given id.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderNotice {
    pub order_id: i64,
    pub order_time: NaiveDateTime,
}

/// Fields required to place an order. The item list is stored as text,
/// serialized from whatever JSON the client sent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub user_id: i64,
    pub phone_number: String,
    pub order_list: serde_json::Value,
    pub total_price: f64,
    pub location: String,
}

#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<Database>,
}

impl OrderRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Place a new order and return its id.
    ///
    /// Id allocation and the insert run in one transaction on the primary
    /// so concurrent orders cannot claim the same id.
    pub async fn create(&self, order: &NewOrder) -> Result<i64, RepoError> {
        let mut conn = self.db.write().await?;
        let mut tx = conn.begin().await?;

        let order_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(order_id), 0) + 1 FROM orders")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO orders \
             (order_id, user_id, phone_number, order_list, total_price, order_time, location, status) \
             VALUES (?, ?, ?, ?, ?, NOW(), ?, 'On Hold')",
        )
        .bind(order_id)
        .bind(order.user_id)
        .bind(&order.phone_number)
        .bind(order.order_list.to_string())
        .bind(order.total_price)
        .bind(&order.location)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order_id)
    }

    /// Highest order id so far, 0 when the table is empty.
    pub async fn last_order_id(&self) -> Result<i64, RepoError> {
        let mut conn = self.db.read().await?;
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(order_id) FROM orders")
            .fetch_one(&mut *conn)
            .await?;
        Ok(max.unwrap_or(0))
    }

    /// Orders created after the given id.
    pub async fn fetch_new(&self, after_id: i64) -> Result<Vec<OrderNotice>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, OrderNotice>(
            "SELECT order_id, order_time FROM orders WHERE order_id > ?",
        )
        .bind(after_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    /// Orders still being prepared or delivered.
    pub async fn active(&self) -> Result<Vec<OrderStatus>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, OrderStatus>(
            "SELECT order_id, status FROM orders \
             WHERE status IN ('On Hold', 'In Progress', 'Delivery')",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn today(&self) -> Result<Vec<OrderStatus>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, OrderStatus>(
            "SELECT order_id, status FROM orders WHERE DATE(order_time) = CURDATE()",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn last_week(&self) -> Result<Vec<OrderStatus>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, OrderStatus>(
            "SELECT order_id, status FROM orders \
             WHERE order_time >= CURDATE() - INTERVAL 7 DAY",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn last_month(&self) -> Result<Vec<Order>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_time >= CURDATE() - INTERVAL 1 MONTH"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn last_year(&self) -> Result<Vec<Order>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_time >= CURDATE() - INTERVAL 1 YEAR"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }

    pub async fn all(&self) -> Result<Vec<Order>, RepoError> {
        let mut conn = self.db.read().await?;
        let rows = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders"))
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    pub async fn details(&self, order_id: i64) -> Result<Option<Order>, RepoError> {
        let mut conn = self.db.read().await?;
        let row = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn change_status(&self, order_id: i64, status: &str) -> Result<(), RepoError> {
        let mut conn = self.db.write().await?;
        sqlx::query("UPDATE orders SET status = ? WHERE order_id = ?")
            .bind(status)
            .bind(order_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
