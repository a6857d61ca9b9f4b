use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Product category, embedded whole in every product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Product document in the `producto` collection
///
/// A persisted product always carries a resolved [`Category`] and a creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Hex object id (stored as `_id`)
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "createAt")]
    pub create_at: DateTime<Utc>,
    /// Stored photo filename under the upload root
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(rename = "categoria")]
    pub category: Category,
}

impl Product {
    /// Assign a fresh id to a new product.
    pub fn new(input: NewProduct) -> Self {
        Self {
            id: ObjectId::new().to_hex(),
            name: input.name,
            price: input.price,
            create_at: input.create_at,
            photo: input.photo,
            category: input.category,
        }
    }

    pub fn with_upper_cased_name(mut self) -> Self {
        self.name = self.name.to_uppercase();
        self
    }
}

/// Fully resolved product ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub create_at: DateTime<Utc>,
    pub photo: Option<String>,
    pub category: Category,
}

/// Values submitted by the product form
///
/// The hidden `id`, `create_at` and `foto` fields carry the product being
/// edited between the edit page and the submission.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ProductForm {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "el nombre no puede estar vacío"))]
    pub nombre: String,
    #[validate(required(message = "el precio es obligatorio y debe ser numérico"))]
    pub precio: Option<f64>,
    #[validate(
        required(message = "la categoría es obligatoria"),
        length(min = 1, message = "la categoría es obligatoria")
    )]
    pub categoria_id: Option<String>,
    pub create_at: Option<DateTime<Utc>>,
    pub foto: Option<String>,
}

impl ProductForm {
    /// Bind one text field by its form name. Unknown names are ignored.
    ///
    /// Blank values bind as absent. So do an unparseable date and a price that
    /// is not a finite number.
    pub fn bind(&mut self, field: &str, value: String) {
        let value = value.trim().to_string();
        let present = (!value.is_empty()).then_some(value);

        match field {
            "id" => self.id = present,
            "nombre" => self.nombre = present.unwrap_or_default(),
            "precio" => {
                self.precio = present
                    .and_then(|v| v.parse().ok())
                    .filter(|p: &f64| p.is_finite())
            }
            "categoria_id" => self.categoria_id = present,
            "createAt" => {
                self.create_at = present
                    .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
                    .map(|dt| dt.with_timezone(&Utc))
            }
            "foto" => self.foto = present,
            _ => {}
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            nombre: product.name.clone(),
            precio: Some(product.price),
            categoria_id: Some(product.category.id.clone()),
            create_at: Some(product.create_at),
            foto: product.photo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Category {
        Category::new("c1", "Electrónico")
    }

    #[test]
    fn test_product_document_field_names() {
        let product = Product::new(NewProduct {
            name: "Laptop".into(),
            price: 999.99,
            create_at: Utc::now(),
            photo: None,
            category: category(),
        });

        let doc = mongodb::bson::to_document(&product).unwrap();
        assert_eq!(doc.get_str("_id").unwrap(), product.id);
        assert_eq!(doc.get_str("nombre").unwrap(), "Laptop");
        assert_eq!(doc.get_f64("precio").unwrap(), 999.99);
        assert!(doc.contains_key("createAt"));
        assert!(!doc.contains_key("foto"));
        assert_eq!(
            doc.get_document("categoria").unwrap().get_str("nombre").unwrap(),
            "Electrónico"
        );
    }

    #[test]
    fn test_new_products_get_distinct_ids() {
        let input = NewProduct {
            name: "Silla".into(),
            price: 10.0,
            create_at: Utc::now(),
            photo: None,
            category: category(),
        };
        let a = Product::new(input.clone());
        let b = Product::new(input);
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 24);
    }

    #[test]
    fn test_upper_cased_name() {
        let product = Product::new(NewProduct {
            name: "bicicleta de montaña".into(),
            price: 350.0,
            create_at: Utc::now(),
            photo: None,
            category: Category::new("c2", "Deporte"),
        });
        assert_eq!(product.with_upper_cased_name().name, "BICICLETA DE MONTAÑA");
    }

    #[test]
    fn test_form_binding_and_validation() {
        let mut form = ProductForm::default();
        form.bind("nombre", "Laptop".into());
        form.bind("precio", "999.99".into());
        form.bind("categoria_id", "c1".into());
        form.bind("id", "   ".into());
        form.bind("desconocido", "x".into());

        assert!(form.validate().is_ok());
        assert_eq!(form.precio, Some(999.99));
        assert!(form.id.is_none());
    }

    #[test]
    fn test_form_reports_each_missing_field() {
        let mut form = ProductForm::default();
        form.bind("precio", "no-es-numero".into());

        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nombre"));
        assert!(fields.contains_key("precio"));
        assert!(fields.contains_key("categoria_id"));
    }

    #[test]
    fn test_form_rejects_non_finite_prices() {
        for raw in ["NaN", "inf", "-infinity"] {
            let mut form = ProductForm::default();
            form.bind("nombre", "Laptop".into());
            form.bind("categoria_id", "c1".into());
            form.bind("precio", raw.into());

            assert!(form.precio.is_none(), "{raw}");
            let errors = form.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("precio"), "{raw}");
        }
    }

    #[test]
    fn test_form_parses_hidden_create_at() {
        let mut form = ProductForm::default();
        form.bind("createAt", "2024-03-01T10:15:00Z".into());
        assert_eq!(
            form.create_at.unwrap().to_rfc3339(),
            "2024-03-01T10:15:00+00:00"
        );

        form.bind("createAt", "ayer".into());
        assert!(form.create_at.is_none());
    }
}
