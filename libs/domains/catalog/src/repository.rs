use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{Category, NewProduct, Product};

/// Persistence for the `producto` collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, input: NewProduct) -> CatalogResult<Product>;

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>>;

    /// Every product, in store order
    async fn find_all(&self) -> CatalogResult<Vec<Product>>;

    /// Replace the stored document with the same id; `None` if it vanished.
    async fn update(&self, product: Product) -> CatalogResult<Option<Product>>;

    /// Returns whether a document was removed
    async fn delete(&self, id: &str) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;
}

/// Read access to the `categoria` collection, plus inserts for seeding
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> CatalogResult<Vec<Category>>;

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>>;

    async fn create(&self, category: Category) -> CatalogResult<Category>;

    async fn count(&self) -> CatalogResult<u64>;
}
