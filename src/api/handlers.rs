use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    Json as RequestJson,
};
use serde::Serialize;
use std::sync::Arc;

use crate::api::errors::ApiError;
use crate::logic::{BatchPolicy, ListOperations, ProductCatalog};
use crate::model::{parse_id, Id, ItemDescriptor, ItemView, ListView, NewList, Product};
use crate::store::traits::Store;

/// Shared handler state: the store plus the policies configured for it.
#[derive(Debug)]
pub struct AppContext<S> {
    pub store: S,
    pub batch_policy: BatchPolicy,
}

impl<S> AppContext<S> {
    pub fn new(store: S, batch_policy: BatchPolicy) -> Self {
        Self {
            store,
            batch_policy,
        }
    }
}

pub type AppState<S> = Arc<AppContext<S>>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// Path ids arrive as strings; one that does not parse names nothing.
fn path_id(raw: &str) -> Result<Id, ApiError> {
    parse_id(raw).ok_or(ApiError::NotFound)
}

pub async fn list_products<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = ProductCatalog::list(&state.store).await?;
    Ok(Json(products))
}

pub async fn list_lists<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<ListView>>, ApiError> {
    let lists = ListOperations::list_all(&state.store).await?;
    Ok(Json(lists.iter().map(ListView::from).collect()))
}

pub async fn get_list<S: Store>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
) -> Result<Json<ListView>, ApiError> {
    let list = ListOperations::find(&state.store, path_id(&list_id)?).await?;
    Ok(Json(list.view()))
}

pub async fn create_list<S: Store>(
    State(state): State<AppState<S>>,
    RequestJson(new_list): RequestJson<NewList>,
) -> Result<Response, ApiError> {
    let list = ListOperations::create(&state.store, new_list, state.batch_policy).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/lists/{}", list.id))],
        Json(list.view()),
    )
        .into_response())
}

/// A request against an unknown list is a 404 whatever its body carries.
pub async fn add_items<S: Store>(
    State(state): State<AppState<S>>,
    Path(list_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let list_id = path_id(&list_id)?;

    let descriptors: Vec<ItemDescriptor> = match serde_json::from_slice(&body) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            ListOperations::ensure_list(&state.store, list_id).await?;
            return Err(ApiError::Unprocessable(format!("invalid item list: {}", e)));
        }
    };

    ListOperations::add_items(&state.store, list_id, descriptors, state.batch_policy).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_item<S: Store>(
    State(state): State<AppState<S>>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    ListOperations::remove_item(&state.store, path_id(&list_id)?, path_id(&item_id)?).await?;
    Ok(StatusCode::OK)
}

pub async fn mark_item_bought<S: Store>(
    State(state): State<AppState<S>>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<(StatusCode, Json<ItemView>), ApiError> {
    let item =
        ListOperations::mark_bought(&state.store, path_id(&list_id)?, path_id(&item_id)?).await?;
    Ok((StatusCode::CREATED, Json(item.view())))
}

pub async fn mark_item_unbought<S: Store>(
    State(state): State<AppState<S>>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<ItemView>, ApiError> {
    let item =
        ListOperations::mark_unbought(&state.store, path_id(&list_id)?, path_id(&item_id)?).await?;
    Ok(Json(item.view()))
}
