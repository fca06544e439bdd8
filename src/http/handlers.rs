//! Request handlers, one per endpoint.
//!
//! Handlers stay thin: extract parameters, call the repository, map the
//! result to JSON or a typed API error. Routing intent (read vs write) is
//! decided inside the repositories, not here.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::RouterError;
use crate::http::server::AppState;
use crate::repos::cart::CartItem;
use crate::repos::menu::{PizzaDetails, PizzaSummary};
use crate::repos::order::{NewOrder, Order, OrderNotice, OrderStatus};
use crate::repos::user::{NewUser, User};
use crate::repos::RepoError;

/// Failures mapped to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::Repo(RepoError::Router(error)) => {
                // Routing failures mean no node could serve the request at
                // all; 503 tells clients to retry later.
                let kind = match error {
                    RouterError::PrimaryUnavailable(_) => "primary unavailable",
                    RouterError::AllNodesUnavailable(_) => "all nodes unavailable",
                };
                tracing::error!(error = %error, "Database routing failed");
                (StatusCode::SERVICE_UNAVAILABLE, kind.to_string())
            }
            ApiError::Repo(RepoError::Query(error)) => {
                tracing::error!(error = %error, "Database query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn message(text: &str) -> Json<serde_json::Value> {
    Json(json!({ "message": text }))
}

// --- Menu ---

pub async fn get_menu(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.menu.list_names().await?))
}

pub async fn get_pizza_details(
    State(state): State<AppState>,
    Path(pizza_name): Path<String>,
) -> Result<Json<PizzaDetails>, ApiError> {
    state
        .menu
        .pizza_details(&pizza_name)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Pizza not found"))
}

pub async fn get_pizza_details_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<PizzaSummary>, ApiError> {
    state
        .menu
        .pizza_summary(product_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Product not found"))
}

// --- Cart ---

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub user_id: i64,
    pub product_id: i64,
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.cart.add_item(req.user_id, req.product_id).await?;
    Ok(message("Product added to cart"))
}

pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CartItem>>, ApiError> {
    Ok(Json(state.cart.items(user_id).await?))
}

pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.cart.clear(user_id).await?;
    Ok(message("Cart cleared"))
}

// --- Users ---

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .find(user_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("User not found"))
}

pub async fn add_user(
    State(state): State<AppState>,
    Json(user): Json<NewUser>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.create(&user).await?;
    Ok(message("User added"))
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactRequest {
    pub user_id: i64,
    pub phone_number: Option<String>,
    pub location: Option<String>,
}

pub async fn update_user_contact(
    State(state): State<AppState>,
    Json(req): Json<UpdateContactRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .users
        .update_contact(req.user_id, req.phone_number.as_deref(), req.location.as_deref())
        .await?;
    Ok(message("User contact updated"))
}

// --- Orders ---

pub async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let order_id = state.orders.create(&order).await?;
    Ok(Json(json!({ "order_id": order_id })))
}

pub async fn get_active_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderStatus>>, ApiError> {
    Ok(Json(state.orders.active().await?))
}

pub async fn get_orders_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderStatus>>, ApiError> {
    Ok(Json(state.orders.today().await?))
}

pub async fn get_orders_last_week(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderStatus>>, ApiError> {
    Ok(Json(state.orders.last_week().await?))
}

pub async fn get_orders_last_month(
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.last_month().await?))
}

pub async fn get_orders_last_year(
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.last_year().await?))
}

pub async fn get_all_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.orders.all().await?))
}

pub async fn get_order_details(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<Order>, ApiError> {
    state
        .orders
        .details(order_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Order not found"))
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub order_id: i64,
    pub status: String,
}

/// Both fields are required; an order id of 0 never exists (allocation
/// starts at 1), so it is treated the same as a missing one.
fn check_change_status(req: &ChangeStatusRequest) -> Result<(), ApiError> {
    if req.order_id == 0 || req.status.is_empty() {
        return Err(ApiError::BadRequest("Missing order_id or status"));
    }
    Ok(())
}

pub async fn change_order_status(
    State(state): State<AppState>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_change_status(&req)?;
    state.orders.change_status(req.order_id, &req.status).await?;
    Ok(Json(json!({
        "message": format!("Order {} status updated to {}", req.order_id, req.status)
    })))
}

pub async fn get_last_order_id(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let last_order_id = state.orders.last_order_id().await?;
    Ok(Json(json!({ "last_order_id": last_order_id })))
}

pub async fn fetch_new_orders(
    State(state): State<AppState>,
    Path(last_order_id): Path<i64>,
) -> Result<Json<Vec<OrderNotice>>, ApiError> {
    Ok(Json(state.orders.fetch_new(last_order_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = ApiError::NotFound("Pizza not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn router_errors_map_to_503() {
        let error = RepoError::Router(RouterError::AllNodesUnavailable(sqlx::Error::PoolTimedOut));
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn query_errors_map_to_500() {
        let error = RepoError::Query(sqlx::Error::PoolTimedOut);
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn change_status_rejects_missing_fields() {
        let zero_id = ChangeStatusRequest {
            order_id: 0,
            status: "Done".into(),
        };
        let response = check_change_status(&zero_id).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let empty_status = ChangeStatusRequest {
            order_id: 7,
            status: String::new(),
        };
        let response = check_change_status(&empty_status).unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let valid = ChangeStatusRequest {
            order_id: 7,
            status: "Done".into(),
        };
        assert!(check_change_status(&valid).is_ok());
    }
}
