//! Server-rendered catalog pages.
//!
//! Id-based pages (`/ver`, `/form/{id}`, `/eliminar`) never fail with an
//! error page: a missing product or a failing store (products or
//! categories) ends in a redirect to `/listar` carrying a flash message in
//! the query string.

use async_stream::try_stream;
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State, multipart::MultipartError},
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use futures_util::Stream;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{error, info, warn};

use super::CatalogState;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Product, ProductForm};
use crate::repository::{CategoryRepository, ProductRepository};
use crate::uploads::{PhotoStore, StagedPhoto, content_type_for};
use crate::views::{ListingView, PageModel, field_errors, form_value, product_value};

pub const NOT_FOUND_REDIRECT: &str = "/listar?error=no+existe+el+producto";
pub const LOOKUP_FAILED_REDIRECT: &str = "/listar?error=error+al+consultar+el+producto";
pub const SAVED_REDIRECT: &str = "/listar?success=Producto+guardado+con+exito";
pub const SAVE_FAILED_REDIRECT: &str = "/listar?error=no+se+pudo+guardar+el+producto";
pub const DELETED_REDIRECT: &str = "/listar?success=producto+eliminado+con+exito";
pub const DELETE_NOT_FOUND_REDIRECT: &str = "/listar?error=no+existe+el+producto+a+eliminar";
pub const DELETE_FAILED_REDIRECT: &str = "/listar?error=no+se+pudo+eliminar+el+producto";

const LIST_TITLE: &str = "Lista de productos";

/// Rows per flushed chunk on `/listarchunked`
const CHUNKED_LISTING_ROWS: usize = 64;

const PHOTO_READ_BUFFER: usize = 8 * 1024;

/// Banner messages carried across a redirect
#[derive(Debug, Default, Deserialize)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// `GET /` and `GET /listar`
pub async fn list<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Query(flash): Query<Flash>,
) -> CatalogResult<Html<String>> {
    let (categories, products) = tokio::join!(
        state.load_categories(),
        state.service.find_all_upper_cased()
    );

    let products = products?;
    for product in &products {
        info!(nombre = %product.name, "Producto");
    }

    let model = PageModel::new(LIST_TITLE, &categories?)
        .with_products(&products)
        .with_flash(flash.success.as_deref(), flash.error.as_deref())
        .into_value();

    Ok(Html(state.views.render(ListingView::Listar.name(), &model)?))
}

/// `GET /listar-datadriver`: rows arrive one per configured delay, flushed
/// in small chunks.
pub async fn list_data_driver<P, C>(
    State(state): State<Arc<CatalogState<P, C>>>,
) -> CatalogResult<Response>
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let (categories, products) = tokio::join!(
        state.load_categories(),
        state.service.find_all_upper_cased()
    );
    let model = PageModel::new(LIST_TITLE, &categories?).into_value();

    let chunk_size = state.config.chunk_size;
    let delay = state.config.element_delay;
    Ok(html_stream(listing_stream(
        state,
        ListingView::Listar,
        model,
        products?,
        chunk_size,
        delay,
    )))
}

/// `GET /listarfull`: the repeated listing rendered in one piece.
pub async fn list_full<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
) -> CatalogResult<Html<String>> {
    let (categories, products) = tokio::join!(
        state.load_categories(),
        state
            .service
            .find_all_upper_cased_repeated(state.config.listing_repeat)
    );

    let model = PageModel::new(LIST_TITLE, &categories?)
        .with_products(&products?)
        .into_value();

    Ok(Html(state.views.render(ListingView::Listar.name(), &model)?))
}

/// `GET /listarchunked`: the repeated listing streamed chunk by chunk.
pub async fn list_chunked<P, C>(
    State(state): State<Arc<CatalogState<P, C>>>,
) -> CatalogResult<Response>
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    let (categories, products) = tokio::join!(
        state.load_categories(),
        state
            .service
            .find_all_upper_cased_repeated(state.config.listing_repeat)
    );
    let model = PageModel::new(LIST_TITLE, &categories?).into_value();

    Ok(html_stream(listing_stream(
        state,
        ListingView::ListarChunked,
        model,
        products?,
        CHUNKED_LISTING_ROWS,
        Duration::ZERO,
    )))
}

/// Head, rows in chunks of `chunk_size`, tail. Stops early once the server
/// starts shutting down so a drain is not held up by a slow listing.
fn listing_stream<P, C>(
    state: Arc<CatalogState<P, C>>,
    view: ListingView,
    model: Value,
    products: Vec<Product>,
    chunk_size: usize,
    delay: Duration,
) -> impl Stream<Item = CatalogResult<String>> + Send + 'static
where
    P: ProductRepository + 'static,
    C: CategoryRepository + 'static,
{
    try_stream! {
        yield state.views.render_head(view, &model)?;

        for chunk in products.chunks(chunk_size.max(1)) {
            if state.shutdown.is_shutting_down() {
                warn!(view = view.name(), "Shutdown in progress, cutting listing short");
                break;
            }

            let mut rows = String::new();
            for product in chunk {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                info!(nombre = %product.name, "Producto");
                rows.push_str(&state.views.render_row(view, product)?);
            }
            yield rows;
        }

        yield state.views.render_tail(view, &model)?;
    }
}

fn html_stream<S>(stream: S) -> Response
where
    S: Stream<Item = CatalogResult<String>> + Send + 'static,
{
    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}

/// `GET /form`
pub async fn new_form<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
) -> CatalogResult<Html<String>> {
    let categories = state.load_categories().await?;
    let model = PageModel::new("Formulario de producto", &categories)
        .with("producto", json!({}))
        .with("boton", json!("Crear"))
        .into_value();

    Ok(Html(state.views.render("form", &model)?))
}

/// `GET /form/{id}` and `GET /form-v2/{id}`
pub async fn edit_form<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Path(id): Path<String>,
) -> CatalogResult<Response> {
    let (categories, product) =
        tokio::join!(state.load_categories(), state.service.get_by_id(&id));

    let (categories, product) = match (categories, product) {
        (Ok(categories), Ok(product)) => (categories, product),
        (_, Err(err)) | (Err(err), _) => return Ok(lookup_redirect(&id, err).into_response()),
    };

    let model = PageModel::new("Editar producto", &categories)
        .with("producto", product_value(&product))
        .with("boton", json!("Editar"))
        .into_value();

    Ok(Html(state.views.render("form", &model)?).into_response())
}

/// `GET /ver/{id}`
pub async fn view<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Path(id): Path<String>,
) -> CatalogResult<Response> {
    let (categories, product) =
        tokio::join!(state.load_categories(), state.service.get_by_id(&id));

    let (categories, product) = match (categories, product) {
        (Ok(categories), Ok(product)) => (categories, product),
        (_, Err(err)) | (Err(err), _) => return Ok(lookup_redirect(&id, err).into_response()),
    };

    let model = PageModel::new("Detalle producto", &categories)
        .with("producto", product_value(&product))
        .into_value();

    Ok(Html(state.views.render("ver", &model)?).into_response())
}

fn lookup_redirect(id: &str, err: CatalogError) -> Redirect {
    if err.is_not_found() {
        info!(product_id = %id, "Producto not found");
        Redirect::to(NOT_FOUND_REDIRECT)
    } else {
        error!(product_id = %id, error = %err, "Failed to look up producto");
        Redirect::to(LOOKUP_FAILED_REDIRECT)
    }
}

/// `POST /form` (multipart)
///
/// The uploaded photo is staged while the body is read, then committed under
/// its final name only after the product has been persisted.
pub async fn save<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    multipart: Multipart,
) -> Response {
    let (form, staged) = match read_submission(&state.photos, multipart).await {
        Ok(submission) => submission,
        Err(err @ CatalogError::InvalidUpload(_)) => {
            warn!(error = %err, "Rejected product submission");
            return err.into_response();
        }
        Err(err) => {
            error!(error = %err, "Failed to stage uploaded photo");
            return Redirect::to(SAVE_FAILED_REDIRECT).into_response();
        }
    };

    let photo_name = staged.as_ref().map(|photo| photo.name().to_string());
    let submitted = form.clone();

    match state.service.save(form, photo_name).await {
        Ok(product) => {
            if let Some(photo) = staged {
                if let Err(err) = photo.commit().await {
                    error!(product_id = %product.id, error = %err, "Producto saved but photo could not be stored");
                    return Redirect::to(SAVE_FAILED_REDIRECT).into_response();
                }
            }
            Redirect::to(SAVED_REDIRECT).into_response()
        }
        Err(err) => {
            if let Some(photo) = staged {
                photo.discard().await;
            }

            match err {
                CatalogError::Validation(errors) => {
                    form_with_errors(&state, &submitted, field_errors(&errors)).await
                }
                CatalogError::CategoryNotFound(category_id) => {
                    info!(categoria_id = %category_id, "Categoria not found");
                    let errores = json!({ "categoria_id": "la categoría no existe" });
                    form_with_errors(&state, &submitted, errores).await
                }
                CatalogError::ProductNotFound(id) => {
                    info!(product_id = %id, "Producto to update not found");
                    Redirect::to(NOT_FOUND_REDIRECT).into_response()
                }
                err => {
                    error!(error = %err, "Failed to save producto");
                    Redirect::to(SAVE_FAILED_REDIRECT).into_response()
                }
            }
        }
    }
}

/// Bind text fields into the form and stage the `file` part, if one with a
/// filename was sent.
async fn read_submission(
    photos: &PhotoStore,
    mut multipart: Multipart,
) -> CatalogResult<(ProductForm, Option<StagedPhoto>)> {
    let mut form = ProductForm::default();
    let mut staged = None;

    while let Some(mut field) = multipart.next_field().await.map_err(invalid_upload)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().unwrap_or_default().trim().to_string();
            if filename.is_empty() {
                continue;
            }

            let mut photo = photos.stage(&filename).await?;
            while let Some(chunk) = field.chunk().await.map_err(invalid_upload)? {
                photo.write_chunk(&chunk).await?;
            }
            staged = Some(photo);
        } else {
            let value = field.text().await.map_err(invalid_upload)?;
            form.bind(&name, value);
        }
    }

    Ok((form, staged))
}

fn invalid_upload(err: MultipartError) -> CatalogError {
    CatalogError::InvalidUpload(err.body_text())
}

async fn form_with_errors<P: ProductRepository, C: CategoryRepository>(
    state: &CatalogState<P, C>,
    form: &ProductForm,
    errores: Value,
) -> Response {
    let rendered = state.load_categories().await.and_then(|categories| {
        let model = PageModel::new("Errores en formulario producto", &categories)
            .with("producto", form_value(form))
            .with("errores", errores)
            .with("boton", json!("Guardar"))
            .into_value();
        state.views.render("form", &model)
    });

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            error!(error = %err, "Failed to render product form");
            Redirect::to(SAVE_FAILED_REDIRECT).into_response()
        }
    }
}

/// `GET /eliminar/{id}`
pub async fn delete<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Path(id): Path<String>,
) -> Redirect {
    match state.service.delete(&id).await {
        Ok(()) => {
            info!(product_id = %id, "Producto eliminado");
            Redirect::to(DELETED_REDIRECT)
        }
        Err(err) if err.is_not_found() => {
            info!(product_id = %id, "Producto to delete not found");
            Redirect::to(DELETE_NOT_FOUND_REDIRECT)
        }
        Err(err) => {
            error!(product_id = %id, error = %err, "Failed to delete producto");
            Redirect::to(DELETE_FAILED_REDIRECT)
        }
    }
}

/// `GET /uploads/img/{filename}`: the stored photo as an attachment.
pub async fn serve_photo<P: ProductRepository, C: CategoryRepository>(
    State(state): State<Arc<CatalogState<P, C>>>,
    Path(filename): Path<String>,
) -> CatalogResult<Response> {
    let file = state.photos.open_photo(&filename).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        filename.replace('"', "\\\"")
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|_| CatalogError::InvalidPhotoName(filename.clone()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type_for(&filename)),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from_stream(file_stream(file)),
    )
        .into_response())
}

fn file_stream(mut file: File) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static {
    try_stream! {
        let mut buf = vec![0u8; PHOTO_READ_BUFFER];
        loop {
            let read = file.read(&mut buf).await?;
            if read == 0 {
                break;
            }
            yield buf[..read].to_vec();
        }
    }
}
