//! Shared application state.

use domain_catalog::CatalogState;
use domain_catalog::mongodb::{MongoCategoryRepository, MongoProductRepository};
use mongodb::{Client, Database};
use std::sync::Arc;

pub type Catalog = CatalogState<MongoProductRepository, MongoCategoryRepository>;

/// Cloned into every handler; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares the driver's connection pool
    pub mongo_client: Client,
    pub db: Database,
    pub catalog: Arc<Catalog>,
}
