//! Server-side page rendering with Handlebars.
//!
//! Views are addressed by name (`listar`, `listar-chunked`, `form`, `ver`)
//! and rendered against a JSON model built with [`PageModel`]. Listing views
//! can also be rendered piecewise (head, one row per product, tail) for
//! streamed responses.

mod templates;

use handlebars::Handlebars;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::debug;
use validator::ValidationErrors;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, Product, ProductForm};

/// Listing pages that can be streamed row by row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView {
    Listar,
    ListarChunked,
}

impl ListingView {
    pub fn name(&self) -> &'static str {
        match self {
            ListingView::Listar => "listar",
            ListingView::ListarChunked => "listar-chunked",
        }
    }

    fn row_template(&self) -> &'static str {
        match self {
            ListingView::Listar => "producto_fila",
            ListingView::ListarChunked => "producto_fila_simple",
        }
    }
}

#[derive(Clone)]
pub struct ViewRenderer {
    handlebars: Arc<Handlebars<'static>>,
}

impl ViewRenderer {
    pub fn new() -> CatalogResult<Self> {
        let mut handlebars = Handlebars::new();

        for (name, source) in [
            ("layout_header", templates::LAYOUT_HEADER),
            ("layout_footer", templates::LAYOUT_FOOTER),
            ("listar_head", templates::LISTAR_HEAD),
            ("listar_tail", templates::LISTAR_TAIL),
            ("producto_fila", templates::PRODUCTO_FILA),
            ("producto_fila_simple", templates::PRODUCTO_FILA_SIMPLE),
            ("listar", templates::LISTAR),
            ("listar-chunked", templates::LISTAR_CHUNKED),
            ("form", templates::FORM),
            ("ver", templates::VER),
        ] {
            handlebars.register_template_string(name, source).map_err(|e| {
                CatalogError::Template(format!("Failed to register {}: {}", name, e))
            })?;
        }

        Ok(Self {
            handlebars: Arc::new(handlebars),
        })
    }

    pub fn render(&self, view: &str, model: &Value) -> CatalogResult<String> {
        debug!(view, "Rendering view");
        Ok(self.handlebars.render(view, model)?)
    }

    /// Everything before the first row of a listing page.
    pub fn render_head(&self, _view: ListingView, model: &Value) -> CatalogResult<String> {
        self.render("listar_head", model)
    }

    pub fn render_row(&self, view: ListingView, product: &Product) -> CatalogResult<String> {
        self.render(view.row_template(), &product_value(product))
    }

    /// Everything after the last row of a listing page.
    pub fn render_tail(&self, _view: ListingView, model: &Value) -> CatalogResult<String> {
        self.render("listar_tail", model)
    }
}

/// Model shared by every page: the title plus the category list.
pub struct PageModel {
    values: Map<String, Value>,
}

impl PageModel {
    pub fn new(titulo: &str, categorias: &[Category]) -> Self {
        let mut values = Map::new();
        values.insert("titulo".into(), json!(titulo));
        values.insert(
            "categorias".into(),
            Value::Array(categorias.iter().map(category_value).collect()),
        );
        Self { values }
    }

    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    pub fn with_products(self, products: &[Product]) -> Self {
        let rows = products.iter().map(product_value).collect();
        self.with("productos", Value::Array(rows))
    }

    /// `success`/`error` banners; blank messages are skipped.
    pub fn with_flash(mut self, success: Option<&str>, error: Option<&str>) -> Self {
        for (key, message) in [("success", success), ("error", error)] {
            if let Some(message) = message.filter(|m| !m.trim().is_empty()) {
                self.values.insert(key.into(), json!(message));
            }
        }
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

pub fn category_value(category: &Category) -> Value {
    json!({ "id": category.id, "nombre": category.name })
}

pub fn product_value(product: &Product) -> Value {
    json!({
        "id": product.id,
        "nombre": product.name,
        "precio": product.price,
        "createAt": product.create_at.to_rfc3339(),
        "fecha": product.create_at.format("%d/%m/%Y").to_string(),
        "foto": product.photo,
        "categoria": category_value(&product.category),
    })
}

/// Echo submitted values back into the form after a failed save.
pub fn form_value(form: &ProductForm) -> Value {
    json!({
        "id": form.id,
        "nombre": form.nombre,
        "precio": form.precio,
        "createAt": form.create_at.map(|at| at.to_rfc3339()),
        "foto": form.foto,
        "categoria": { "id": form.categoria_id },
    })
}

/// First message per invalid field, keyed by form field name.
pub fn field_errors(errors: &ValidationErrors) -> Value {
    let map = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let message = errs.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })?;
            Some((field.to_string(), json!(message)))
        })
        .collect();
    Value::Object(map)
}
