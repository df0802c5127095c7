//! Order handlers: submission, customer history, and the admin console.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use greengrocer_core::cart::CartLine;
use greengrocer_core::{Email, Order, OrderId, OrderStatus};

use crate::error::AppError;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::customer::{AdminOrder, CustomerView};
use crate::services::OrderService;
use crate::services::orders::ShippingDetails;
use crate::state::AppState;

/// Order submission payload.
///
/// A `total_price` field, if sent, is ignored: the total is always
/// recomputed server-side from `items`.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub ward: String,
    #[serde(default)]
    pub note: Option<String>,
    pub items: Vec<CartLine>,
}

/// `POST /api/order`
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(_customer): RequireAuth,
    payload: Result<Json<SubmitOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let email =
        Email::parse(&payload.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let shipping = ShippingDetails {
        address: payload.address,
        province: payload.province,
        district: payload.district,
        ward: payload.ward,
    };

    let service = OrderService::new(state.pool());
    let order = service
        .submit(&email, payload.items, &shipping, payload.note)
        .await?;

    tracing::info!(order_id = %order.order_id, %email, "order submitted");

    Ok((StatusCode::OK, "Order successfully!!"))
}

/// `GET /api/myorders/{email}`
#[instrument(skip(state, customer))]
pub async fn my_orders(
    State(state): State<AppState>,
    RequireAuth(customer): RequireAuth,
    Path(email): Path<String>,
) -> Result<Json<Vec<Order>>, AppError> {
    let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Customers can only read their own history; admins can read anyone's.
    if !customer.is_admin && customer.email != email {
        return Err(AppError::Unauthorized(
            "cannot read another customer's orders".to_owned(),
        ));
    }

    let service = OrderService::new(state.pool());
    let orders = service.my_orders(&email).await?;

    Ok(Json(orders))
}

/// `GET /api/admin/orders`
#[instrument(skip_all)]
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<AdminOrder>>, AppError> {
    let service = OrderService::new(state.pool());
    let orders = service.all_orders().await?;

    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// `PATCH /api/admin/orders/{id}`
#[instrument(skip(state, _admin, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<CustomerView>, AppError> {
    let order_id =
        OrderId::parse(&id).map_err(|_| AppError::BadRequest("malformed order id".to_owned()))?;

    let service = OrderService::new(state.pool());
    let row = service.set_status(order_id, payload.status).await?;

    tracing::info!(%order_id, status = %payload.status, "order status updated");

    Ok(Json(CustomerView::from(row)))
}
