use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::messages::handlers;
use crate::features::messages::services::MessageService;

/// Create routes for the messages feature
pub fn routes(service: Arc<MessageService>) -> Router {
    Router::new()
        .route(
            "/api/messages",
            get(handlers::list_messages).post(handlers::create_message),
        )
        .route(
            "/api/messages/{id}",
            get(handlers::get_message)
                .patch(handlers::update_message)
                .delete(handlers::delete_message),
        )
        .with_state(service)
}
