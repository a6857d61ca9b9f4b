//! Catalog service: category resolution and derived listings

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, NewProduct, Product, ProductForm};
use crate::repository::{CategoryRepository, ProductRepository};

pub struct CatalogService<P: ProductRepository, C: CategoryRepository> {
    products: Arc<P>,
    categories: Arc<C>,
}

impl<P: ProductRepository, C: CategoryRepository> CatalogService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products: Arc::new(products),
            categories: Arc::new(categories),
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        self.products.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        self.products.find_by_id(id).await
    }

    /// Like [`find_by_id`](Self::find_by_id) with absence as [`CatalogError::ProductNotFound`].
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> CatalogResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))
    }

    /// Validate the form, resolve its category and persist.
    ///
    /// A form carrying an id replaces that product; otherwise a new one is
    /// created. `photo` is the stored name of a freshly uploaded file and
    /// takes precedence over the photo already on the form.
    #[instrument(skip(self, form, photo), fields(nombre = %form.nombre))]
    pub async fn save(&self, form: ProductForm, photo: Option<String>) -> CatalogResult<Product> {
        form.validate()?;

        let category_id = form.categoria_id.clone().unwrap_or_default();
        let category = self
            .categories
            .find_by_id(&category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(category_id))?;

        let create_at = form.create_at.unwrap_or_else(Utc::now);
        let photo = photo.or(form.foto);
        let price = form.precio.unwrap_or_default();

        let saved = match form.id {
            Some(id) => {
                let product = Product {
                    id: id.clone(),
                    name: form.nombre,
                    price,
                    create_at,
                    photo,
                    category,
                };
                self.products
                    .update(product)
                    .await?
                    .ok_or(CatalogError::ProductNotFound(id))?
            }
            None => {
                self.products
                    .create(NewProduct {
                        name: form.nombre,
                        price,
                        create_at,
                        photo,
                        category,
                    })
                    .await?
            }
        };

        tracing::info!(product_id = %saved.id, nombre = %saved.name, "Producto guardado");
        Ok(saved)
    }

    /// Remove the product; [`CatalogError::ProductNotFound`] if nothing was deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> CatalogResult<()> {
        if self.products.delete(id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound(id.to_string()))
        }
    }

    #[instrument(skip(self))]
    pub async fn find_all_categories(&self) -> CatalogResult<Vec<Category>> {
        self.categories.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_category_by_id(&self, id: &str) -> CatalogResult<Option<Category>> {
        self.categories.find_by_id(id).await
    }

    /// All products with their names upper-cased.
    #[instrument(skip(self))]
    pub async fn find_all_upper_cased(&self) -> CatalogResult<Vec<Product>> {
        let products = self.products.find_all().await?;
        Ok(products
            .into_iter()
            .map(Product::with_upper_cased_name)
            .collect())
    }

    /// The upper-cased listing concatenated `times` times.
    #[instrument(skip(self))]
    pub async fn find_all_upper_cased_repeated(&self, times: usize) -> CatalogResult<Vec<Product>> {
        let products = self.find_all_upper_cased().await?;
        let mut repeated = Vec::with_capacity(products.len() * times);
        for _ in 0..times {
            repeated.extend(products.iter().cloned());
        }
        Ok(repeated)
    }
}

impl<P: ProductRepository, C: CategoryRepository> Clone for CatalogService<P, C> {
    fn clone(&self) -> Self {
        Self {
            products: Arc::clone(&self.products),
            categories: Arc::clone(&self.categories),
        }
    }
}
