//! Catalog Domain
//!
//! Products and their categories, stored in MongoDB and served both as
//! server-rendered pages and as a read-only JSON API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐
//! │  Handlers (pages, rest)  │  ← HTML pages, photo upload/download, JSON
//! └────────────┬─────────────┘
//!              │
//! ┌────────────▼─────────────┐   ┌─────────────┐
//! │         Service          │   │ PhotoStore  │  ← upload root on disk
//! └────────────┬─────────────┘   └─────────────┘
//!              │
//! ┌────────────▼─────────────┐
//! │ Repositories (MongoDB)   │  ← `producto`, `categoria` collections
//! └──────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_catalog::{
//!     CatalogConfig, CatalogService, CatalogState, PhotoStore, ViewRenderer,
//!     handlers, mongodb::{MongoCategoryRepository, MongoProductRepository},
//! };
//! use axum_helpers::ShutdownCoordinator;
//! use std::sync::Arc;
//!
//! # async fn example(db: mongodb::Database) -> Result<(), Box<dyn std::error::Error>> {
//! let service = CatalogService::new(
//!     MongoProductRepository::new(&db),
//!     MongoCategoryRepository::new(&db),
//! );
//! let state = Arc::new(CatalogState {
//!     service,
//!     views: ViewRenderer::new()?,
//!     photos: PhotoStore::open("./uploads").await?,
//!     config: CatalogConfig::default(),
//!     max_upload_bytes: 10 * 1024 * 1024,
//!     shutdown: ShutdownCoordinator::default(),
//! });
//!
//! let pages = handlers::pages_router(state.clone());
//! let api = handlers::api_router(state);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod seed;
pub mod service;
pub mod uploads;
pub mod views;

pub use config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use handlers::{ApiDoc, CatalogState, api_router, pages_router};
pub use models::{Category, NewProduct, Product, ProductForm};
pub use repository::{CategoryRepository, ProductRepository};
pub use seed::seed_if_empty;
pub use service::CatalogService;
pub use uploads::{PhotoStore, StagedPhoto, UploadsConfig};
pub use views::ViewRenderer;
