//! HTTP surface: server-rendered pages and the JSON API

pub mod pages;
pub mod rest;

use axum::{Router, extract::DefaultBodyLimit, routing::get};
use axum_helpers::ShutdownCoordinator;
use std::sync::Arc;
use tracing::info;

use crate::config::CatalogConfig;
use crate::error::CatalogResult;
use crate::models::Category;
use crate::repository::{CategoryRepository, ProductRepository};
use crate::service::CatalogService;
use crate::uploads::PhotoStore;
use crate::views::ViewRenderer;

pub use rest::ApiDoc;

/// Everything the catalog handlers share
pub struct CatalogState<P: ProductRepository, C: CategoryRepository> {
    pub service: CatalogService<P, C>,
    pub views: ViewRenderer,
    pub photos: PhotoStore,
    pub config: CatalogConfig,
    pub max_upload_bytes: usize,
    /// Observed by streamed listings so they end once the server drains
    pub shutdown: ShutdownCoordinator,
}

impl<P: ProductRepository, C: CategoryRepository> CatalogState<P, C> {
    /// Category list for page furniture, logging each name as it loads.
    pub async fn load_categories(&self) -> CatalogResult<Vec<Category>> {
        let categories = self.service.find_all_categories().await?;
        for category in &categories {
            info!(categoria = %category.name, "Categoria cargada");
        }
        Ok(categories)
    }
}

/// Page routes, mounted at the root.
pub fn pages_router<P, C>(state: Arc<CatalogState<P, C>>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(pages::list::<P, C>))
        .route("/listar", get(pages::list::<P, C>))
        .route("/listar-datadriver", get(pages::list_data_driver::<P, C>))
        .route("/listarfull", get(pages::list_full::<P, C>))
        .route("/listarchunked", get(pages::list_chunked::<P, C>))
        .route(
            "/form",
            get(pages::new_form::<P, C>)
                .post(pages::save::<P, C>)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/form/{id}", get(pages::edit_form::<P, C>))
        .route("/form-v2/{id}", get(pages::edit_form::<P, C>))
        .route("/ver/{id}", get(pages::view::<P, C>))
        .route("/eliminar/{id}", get(pages::delete::<P, C>))
        .route("/uploads/img/{filename}", get(pages::serve_photo::<P, C>))
        .with_state(state)
}

/// JSON routes, meant to be nested under `/api`.
pub fn api_router<P, C>(state: Arc<CatalogState<P, C>>) -> Router
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    Router::new()
        .route("/productos", get(rest::list_products::<P, C>))
        .route("/productos/{id}", get(rest::get_product::<P, C>))
        .with_state(state)
}
