use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::orders::handlers;
use crate::features::orders::services::OrderService;

/// Create routes for the orders feature
pub fn routes(service: Arc<OrderService>) -> Router {
    Router::new()
        .route(
            "/api/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(handlers::get_order)
                .patch(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .with_state(service)
}
