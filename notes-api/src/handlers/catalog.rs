//! `/tasks` and `/products` handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use storage::{NewTask, Product, Task};

use crate::error::ApiResult;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// POST /tasks
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    ValidatedJson(task): ValidatedJson<NewTask>
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.create(&task).await?))
}

/// GET /tasks
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list().await?))
}

/// POST /products
///
/// Duplicate `id`, `slug` or `sku` is rejected with 409.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    ValidatedJson(product): ValidatedJson<Product>
) -> ApiResult<Json<Product>> {
    let created = state.products.create(&product).await?;
    tracing::info!(product_id = %created.id, sku = %created.sku, "Product created");
    Ok(Json(created))
}

/// GET /products
pub async fn list_products(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.products.list().await?))
}
