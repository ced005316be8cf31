//! HTTP API
//!
//! Route table and handler modules. Every handler returns the
//! [`crate::error::AppResponse`] envelope; errors funnel through
//! [`crate::error::AppError`].

pub mod auth;
pub mod events;
pub mod health;
pub mod orders;
pub mod products;
pub mod statistics;
pub mod systems;
pub mod topology;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route(
            "/systems",
            get(systems::list_systems).put(systems::save_system),
        )
        .route("/systems/{id}", delete(systems::delete_system))
        .route(
            "/systems/{id}/products",
            get(products::get_products).put(products::save_products),
        )
        .route(
            "/systems/{id}/topology",
            get(topology::get_topology).put(topology::save_topology),
        )
        .route("/order-products", get(products::order_products))
        .route("/orders", post(orders::place_order))
        .route("/orders/{id}/send", post(orders::send_order))
        .route("/bars/{bar_number}/orders", get(orders::bar_orders))
        .route("/kitchen/orders", get(orders::kitchen_orders))
        .route("/statistics", get(statistics::get_statistics))
        .route("/messages", post(events::send_message))
        .route("/events/orders", get(events::order_events))
        .route("/events/data", get(events::data_events))
        .route("/events/messages", get(events::message_events));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
