//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all endpoint handlers
//! - Wire up middleware (timeout, tracing, request IDs, request metrics)
//! - Serve until the shutdown coordinator fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::db::Database;
use crate::http::handlers;
use crate::observability::metrics;
use crate::repos::{CartRepository, MenuRepository, OrderRepository, UserRepository};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub menu: MenuRepository,
    pub cart: CartRepository,
    pub users: UserRepository,
    pub orders: OrderRepository,
}

/// HTTP server for the ordering API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over an already-connected database router.
    pub fn new(config: &AppConfig, db: Arc<Database>) -> Self {
        let state = AppState {
            menu: MenuRepository::new(db.clone()),
            cart: CartRepository::new(db.clone()),
            users: UserRepository::new(db.clone()),
            orders: OrderRepository::new(db),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all endpoints and middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route("/menu", get(handlers::get_menu))
            .route("/menu/details/{pizza_name}", get(handlers::get_pizza_details))
            .route(
                "/menu/details-by-id/{product_id}",
                get(handlers::get_pizza_details_by_id),
            )
            .route("/cart/add", post(handlers::add_to_cart))
            .route("/cart/{user_id}", get(handlers::get_cart))
            .route("/cart/clear/{user_id}", delete(handlers::clear_cart))
            .route("/user/{user_id}", get(handlers::get_user))
            .route("/user/add", post(handlers::add_user))
            .route("/user/update/contact", patch(handlers::update_user_contact))
            .route("/order/create", post(handlers::create_order))
            .route("/orders/active", get(handlers::get_active_orders))
            .route("/orders/today", get(handlers::get_orders_today))
            .route("/orders/last-week", get(handlers::get_orders_last_week))
            .route("/orders/last-month", get(handlers::get_orders_last_month))
            .route("/orders/last-year", get(handlers::get_orders_last_year))
            .route("/orders/all", get(handlers::get_all_orders))
            .route("/orders/details/{order_id}", get(handlers::get_order_details))
            .route("/orders/change-status", patch(handlers::change_order_status))
            .route("/orders/last-order-id", get(handlers::get_last_order_id))
            .route(
                "/orders/fetch-new/{last_order_id}",
                get(handlers::fetch_new_orders),
            )
            .with_state(state)
            .layer(middleware::from_fn(track_requests))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve until the shutdown signal fires, then drain gracefully.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Count and time every request, labelled by method and status.
async fn track_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();

    let response = next.run(request).await;

    metrics::record_request(&method, response.status().as_u16(), started);
    response
}
