//! Sample data for a fresh database.

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::error::CatalogResult;
use crate::models::{Category, NewProduct};
use crate::repository::{CategoryRepository, ProductRepository};

const CATEGORIES: [&str; 4] = ["Electrónico", "Deporte", "Computación", "Muebles"];

/// (nombre, precio, index into [`CATEGORIES`])
const PRODUCTS: [(&str, f64, usize); 8] = [
    ("TV Panasonic Pantalla LCD", 456.89, 0),
    ("Sony Camara HD Digital", 177.89, 0),
    ("Apple iPod", 46.89, 0),
    ("Sony Notebook", 846.89, 2),
    ("Hewlett Packard Multifuncional", 200.89, 2),
    ("Bianchi Bicicleta", 70.89, 1),
    ("HP Notebook Omen 17", 2500.89, 2),
    ("Mica Cómoda 5 Cajones", 150.89, 3),
];

/// Insert sample categories and products when both collections are empty.
///
/// Returns whether anything was written.
#[instrument(skip_all)]
pub async fn seed_if_empty<P, C>(products: &P, categories: &C) -> CatalogResult<bool>
where
    P: ProductRepository,
    C: CategoryRepository,
{
    if products.count().await? > 0 || categories.count().await? > 0 {
        info!("Catalog already has data, skipping seed");
        return Ok(false);
    }

    let mut created = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = Category::new(ObjectId::new().to_hex(), name);
        created.push(categories.create(category).await?);
    }

    for (name, price, category) in PRODUCTS {
        let product = products
            .create(NewProduct {
                name: name.to_string(),
                price,
                create_at: Utc::now(),
                photo: None,
                category: created[category].clone(),
            })
            .await?;
        info!(product_id = %product.id, nombre = %product.name, "Seeded producto");
    }

    info!(
        categorias = created.len(),
        productos = PRODUCTS.len(),
        "Catalog seeded"
    );
    Ok(true)
}
