pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::{BatchPolicy, ListError, ListOperations, ListResult, ProductCatalog};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use std::sync::Arc;

use crate::api::handlers::AppContext;
use crate::config::{AppConfig, StorageBackend};

/// Build the application router over the given store
pub fn build_app<S: Store + 'static>(store: S, batch_policy: BatchPolicy) -> axum::Router {
    crate::api::routes::create_router::<S>().with_state(Arc::new(AppContext::new(store, batch_policy)))
}

/// Connect the configured store backend and serve until the listener fails.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let batch_policy = config.lists.batch_policy;

    let app = match config.storage.backend {
        StorageBackend::Memory => {
            log::info!("Using in-memory storage");
            build_app(MemoryStore::new(), batch_policy)
        }
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store = PostgresStore::new(&config.database_url(), config.max_connections()).await?;

            log::info!("Running database migrations...");
            store.migrate().await?;
            build_app(store, batch_policy)
        }
    };

    let bind_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("Shopping list server running on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
