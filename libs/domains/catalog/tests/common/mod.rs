//! In-memory repositories and request helpers shared by the handler tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use axum_helpers::ShutdownCoordinator;
use domain_catalog::*;
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "catalog-test-boundary";

fn injected() -> CatalogError {
    CatalogError::Database("injected failure".into())
}

/// Product store shared between the test and the service under test
#[derive(Clone, Default)]
pub struct InMemoryProducts {
    items: Arc<Mutex<Vec<Product>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryProducts {
    pub fn insert(&self, product: Product) {
        self.items.lock().unwrap().push(product);
    }

    pub fn all(&self) -> Vec<Product> {
        self.items.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        self.all().into_iter().find(|p| p.id == id)
    }

    /// Every call fails with a database error while set.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> CatalogResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(injected())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProducts {
    async fn create(&self, input: NewProduct) -> CatalogResult<Product> {
        self.check()?;
        let product = Product::new(input);
        self.insert(product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Product>> {
        self.check()?;
        Ok(self.get(id))
    }

    async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        self.check()?;
        Ok(self.all())
    }

    async fn update(&self, product: Product) -> CatalogResult<Option<Product>> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> CatalogResult<bool> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|p| p.id != id);
        Ok(items.len() < before)
    }

    async fn count(&self) -> CatalogResult<u64> {
        self.check()?;
        Ok(self.items.lock().unwrap().len() as u64)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCategories {
    items: Arc<Mutex<Vec<Category>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryCategories {
    pub fn with(categories: &[Category]) -> Self {
        let store = Self::default();
        store.items.lock().unwrap().extend_from_slice(categories);
        store
    }

    /// Listing categories fails while set.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategories {
    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected());
        }
        Ok(self.items.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: &str) -> CatalogResult<Option<Category>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, category: Category) -> CatalogResult<Category> {
        self.items.lock().unwrap().push(category.clone());
        Ok(category)
    }

    async fn count(&self) -> CatalogResult<u64> {
        Ok(self.items.lock().unwrap().len() as u64)
    }
}

pub fn electronico() -> Category {
    Category::new("c1", "Electrónico")
}

pub fn deporte() -> Category {
    Category::new("c2", "Deporte")
}

pub fn product(name: &str, price: f64, category: Category) -> Product {
    Product::new(NewProduct {
        name: name.into(),
        price,
        create_at: chrono::Utc::now(),
        photo: None,
        category,
    })
}

pub struct TestApp {
    pub router: Router,
    pub products: InMemoryProducts,
    pub categories: InMemoryCategories,
    pub state: Arc<CatalogState<InMemoryProducts, InMemoryCategories>>,
    pub uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(CatalogConfig {
            listing_repeat: 3,
            element_delay: Duration::from_millis(1),
            chunk_size: 2,
            seed: false,
        })
        .await
    }

    pub async fn with_config(config: CatalogConfig) -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let products = InMemoryProducts::default();
        let categories = InMemoryCategories::with(&[electronico(), deporte()]);

        let state = Arc::new(CatalogState {
            service: CatalogService::new(products.clone(), categories.clone()),
            views: ViewRenderer::new().unwrap(),
            photos: PhotoStore::open(uploads.path()).await.unwrap(),
            config,
            max_upload_bytes: 1024 * 1024,
            shutdown: ShutdownCoordinator::default(),
        });

        let router = pages_router(state.clone()).nest("/api", api_router(state.clone()));

        Self {
            router,
            products,
            categories,
            state,
            uploads,
        }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn post_form(&self, body: Vec<u8>) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri("/form")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Names of the files in the upload root, hidden ones included.
    pub fn uploaded_files(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

/// Multipart body with text fields and an optional `file` part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
