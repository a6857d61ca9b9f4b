//! MongoDB repositories over the `producto` and `categoria` collections

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{Collection, Database, bson::doc};
use tracing::instrument;

use crate::error::CatalogResult;
use crate::models::{Category, NewProduct, Product};
use crate::repository::{CategoryRepository, ProductRepository};

pub const PRODUCT_COLLECTION: &str = "producto";
pub const CATEGORY_COLLECTION: &str = "categoria";

pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Product>(collection_name),
        }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        let product = Product::new(input);

        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Producto created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> CatalogResult<Option<Product>> {
        let result = self
            .collection
            .replace_one(doc! { "_id": &product.id }, &product)
            .await?;

        if result.matched_count == 0 {
            return Ok(None);
        }

        tracing::info!(product_id = %product.id, "Producto updated");
        Ok(Some(product))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> CatalogResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;

        if result.deleted_count > 0 {
            tracing::info!(product_id = %id, "Producto deleted");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

pub struct MongoCategoryRepository {
    collection: Collection<Category>,
}

impl MongoCategoryRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, CATEGORY_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Category>(collection_name),
        }
    }
}

#[async_trait]
impl CategoryRepository for MongoCategoryRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        let cursor = self.collection.find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn create(&self, category: Category) -> CatalogResult<Category> {
        self.collection.insert_one(&category).await?;
        tracing::info!(category_id = %category.id, nombre = %category.name, "Categoria created");
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
