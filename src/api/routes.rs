use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog
        .route("/products", get(handlers::list_products::<S>))
        // Lists
        .route(
            "/lists",
            get(handlers::list_lists::<S>).post(handlers::create_list::<S>),
        )
        .route("/lists/:list_id", get(handlers::get_list::<S>))
        // Items, always addressed through their list
        .route("/lists/:list_id/items", post(handlers::add_items::<S>))
        .route("/lists/:list_id/items/", post(handlers::add_items::<S>))
        .route(
            "/lists/:list_id/items/:item_id",
            delete(handlers::remove_item::<S>),
        )
        .route(
            "/lists/:list_id/items/:item_id/bought",
            post(handlers::mark_item_bought::<S>).delete(handlers::mark_item_unbought::<S>),
        )
}
