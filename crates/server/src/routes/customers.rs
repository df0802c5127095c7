//! Admin customer listing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;
use tracing::instrument;

use crate::db::CustomerRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::customer::CustomerView;
use crate::routes::products::PageQuery;
use crate::state::AppState;

/// One page of the admin customer listing.
#[derive(Debug, Serialize)]
pub struct CustomersPage {
    pub customers: Vec<CustomerView>,
    pub current_page: u32,
    pub total_pages: u32,
}

/// `GET /api/admin/customers`
#[instrument(skip(state, _admin))]
pub async fn page(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<PageQuery>,
) -> Result<Json<CustomersPage>, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let search = query.search.unwrap_or_default();

    let repo = CustomerRepository::new(state.pool());
    let (rows, total_pages) = repo.page(page, &search).await?;

    Ok(Json(CustomersPage {
        customers: rows.into_iter().map(CustomerView::from).collect(),
        current_page: page,
        total_pages,
    }))
}
