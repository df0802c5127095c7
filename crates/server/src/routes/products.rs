//! Catalog handlers: public browsing and admin CRUD.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use greengrocer_core::ProductId;

use crate::db::ProductRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, ProductRow, ProductUpdate};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub search: Option<String>,
}

/// One page of the admin catalog listing.
#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub products: Vec<ProductRow>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<ProductRow>>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.list(query.search.as_deref()).await?;

    Ok(Json(products))
}

/// `GET /api/products/{category}`
#[instrument(skip(state))]
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ProductRow>>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let products = repo.by_category(&category).await?;

    Ok(Json(products))
}

/// `GET /api/admin/products`
#[instrument(skip(state, _admin))]
pub async fn admin_page(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductsPage>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let search = query.search.unwrap_or_default();

    let repo = ProductRepository::new(state.pool());
    let (products, total_pages) = repo.page(page, &search).await?;

    Ok(Json(ProductsPage {
        products,
        current_page: page,
        total_pages,
    }))
}

/// `POST /api/admin/products`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductRow>), AppError> {
    if payload.has_blank_field() {
        return Err(AppError::BadRequest(
            "all product fields are required".to_owned(),
        ));
    }

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&payload).await?;

    tracing::info!(product_id = %product.id, name = %product.name, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/admin/products/{id}`
#[instrument(skip(state, _admin, payload))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(payload): Json<ProductUpdate>,
) -> Result<Json<ProductRow>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let product = repo.update(ProductId::new(id), &payload).await?;

    Ok(Json(product))
}

/// `DELETE /api/admin/products/{id}`
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ProductRow>, AppError> {
    let repo = ProductRepository::new(state.pool());
    let product = repo.delete(ProductId::new(id)).await?;

    tracing::info!(product_id = %product.id, "product deleted");

    Ok(Json(product))
}
