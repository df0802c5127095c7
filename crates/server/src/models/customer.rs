//! Customer row and view types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::types::Json;

use greengrocer_core::{CustomerId, Order, OrderId, OrderLine, OrderStatus};

/// One row of `store.customer`, orders included.
///
/// The embedded `orders` array is the system of record for orders; it is
/// deserialized as a whole whenever the row is read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: CustomerId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub orders: Json<Vec<Order>>,
}

/// API-facing customer document. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub orders: Vec<Order>,
}

impl From<CustomerRow> for CustomerView {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            orders: row.orders.0,
        }
    }
}

/// One order flattened for the admin console: the order fields plus the
/// owning customer's contact details merged in.
#[derive(Debug, Clone, Serialize)]
pub struct AdminOrder {
    pub order_id: OrderId,
    pub username: String,
    pub phone: String,
    pub address: String,
    pub products: Vec<OrderLine>,
    pub total_price: Decimal,
    pub date_order: DateTime<Utc>,
    pub status: OrderStatus,
}

impl AdminOrder {
    /// Annotate one embedded order with its owner's contact details.
    #[must_use]
    pub fn from_order(order: Order, username: String, phone: String) -> Self {
        Self {
            order_id: order.order_id,
            username,
            phone,
            address: order.address,
            products: order.products,
            total_price: order.total_price,
            date_order: order.date_order,
            status: order.status,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_view_drops_password_hash() {
        let row = CustomerRow {
            id: CustomerId::new(1),
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            phone: "0123456789".to_owned(),
            password_hash: "$argon2id$v=19$...".to_owned(),
            is_admin: false,
            orders: Json(Vec::new()),
        };

        let json = serde_json::to_string(&CustomerView::from(row)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
        assert!(json.contains("alice@example.com"));
    }
}
