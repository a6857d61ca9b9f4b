use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

use super::CatalogState;
use crate::error::CatalogResult;
use crate::models::{Category, Product};
use crate::repository::{CategoryRepository, ProductRepository};

#[derive(OpenApi)]
#[openapi(
    paths(list_products, get_product),
    components(schemas(Product, Category, ErrorResponse)),
    tags(
        (name = "Productos", description = "Read-only product catalog")
    )
)]
pub struct ApiDoc;

/// List every product with its name upper-cased
#[utoipa::path(
    get,
    path = "/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn list_products<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
) -> CatalogResult<Json<Vec<Product>>> {
    let products = state.service.find_all_upper_cased().await?;
    for product in &products {
        info!(nombre = %product.name, "Producto");
    }
    Ok(Json(products))
}

/// Fetch one product by id
///
/// An unknown id answers 200 with an empty body.
#[utoipa::path(
    get,
    path = "/productos/{id}",
    tag = "Productos",
    params(
        ("id" = String, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "The product, or an empty body when absent", body = Product),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
pub async fn get_product<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Path(id): Path<String>,
) -> CatalogResult<Response> {
    match state.service.find_by_id(&id).await? {
        Some(product) => Ok(Json(product).into_response()),
        None => {
            info!(product_id = %id, "Producto not found");
            Ok(StatusCode::OK.into_response())
        }
    }
}
