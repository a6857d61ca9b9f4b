use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Producto {0} not found")]
    ProductNotFound(String),

    #[error("Categoria {0} not found")]
    CategoryNotFound(String),

    #[error("Invalid product form: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    /// Reading or writing under the upload root failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed multipart submission
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Invalid photo name: {0}")]
    InvalidPhotoName(String),

    #[error("Photo {0} not found")]
    PhotoNotFound(String),

    #[error("Template error: {0}")]
    Template(String),
}

impl CatalogError {
    /// Entity-absent errors, as opposed to infrastructure failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::ProductNotFound(_)
                | CatalogError::CategoryNotFound(_)
                | CatalogError::PhotoNotFound(_)
        )
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            e @ (CatalogError::ProductNotFound(_)
            | CatalogError::CategoryNotFound(_)
            | CatalogError::PhotoNotFound(_)) => AppError::NotFound(e.to_string()),
            CatalogError::Validation(errors) => AppError::ValidationError(errors),
            CatalogError::InvalidUpload(msg) => AppError::BadRequest(msg),
            CatalogError::InvalidPhotoName(name) => {
                AppError::BadRequest(format!("Invalid photo name '{}'", name))
            }
            CatalogError::Database(msg) => AppError::Database(msg),
            CatalogError::Storage(msg) => AppError::Storage(msg),
            CatalogError::Template(msg) => AppError::Template(msg),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CatalogError {
    fn from(err: mongodb::error::Error) -> Self {
        CatalogError::Database(err.to_string())
    }
}

impl From<handlebars::RenderError> for CatalogError {
    fn from(err: handlebars::RenderError) -> Self {
        CatalogError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for CatalogError {
    fn from(err: handlebars::TemplateError) -> Self {
        CatalogError::Template(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Storage(err.to_string())
    }
}
