//! Order lifecycle: submission, queries, and status changes.
//!
//! An order is an immutable snapshot of what was bought and what it cost,
//! taken at submission time. After submission the only mutable field is
//! the status, and that only moves along the legal workflow.

use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use greengrocer_core::cart::{Cart, CartLine};
use greengrocer_core::pricing;
use greengrocer_core::{Email, Order, OrderId, OrderLine, OrderStatus, Payment, StatusError};

use crate::db::{CustomerRepository, RepositoryError, StatusUpdateError};
use crate::models::customer::{AdminOrder, CustomerRow};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order must contain at least one item")]
    EmptyItems,

    #[error("customer not found")]
    CustomerNotFound,

    #[error("order not found")]
    OrderNotFound,

    #[error(transparent)]
    Transition(#[from] StatusError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Delivery address, assembled from the checkout form's parts.
#[derive(Debug, Clone, Default)]
pub struct ShippingDetails {
    pub address: String,
    pub province: String,
    pub district: String,
    pub ward: String,
}

impl ShippingDetails {
    /// Join the non-empty parts into the single address line stored on the
    /// order: street address, then province, district, and ward, in the
    /// order the checkout form collects them.
    #[must_use]
    pub fn joined(&self) -> String {
        [&self.address, &self.province, &self.district, &self.ward]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Service for the order lifecycle.
pub struct OrderService<'a> {
    customers: CustomerRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool),
        }
    }

    /// Submit an order for a customer.
    ///
    /// The total is always computed server-side from the submitted lines;
    /// any client-supplied total is ignored.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyItems` if no usable lines were submitted
    /// and `OrderError::CustomerNotFound` if the email matches no account.
    pub async fn submit(
        &self,
        email: &Email,
        items: Vec<CartLine>,
        shipping: &ShippingDetails,
        note: Option<String>,
    ) -> Result<Order, OrderError> {
        let order = build_order(items, shipping, note)?;

        self.customers
            .append_order(email, &order)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => OrderError::CustomerNotFound,
                other => OrderError::Repository(other),
            })?;

        Ok(order)
    }

    /// A customer's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::CustomerNotFound` if the email matches no
    /// account.
    pub async fn my_orders(&self, email: &Email) -> Result<Vec<Order>, OrderError> {
        let customer = self
            .customers
            .get_by_email(email)
            .await?
            .ok_or(OrderError::CustomerNotFound)?;

        let mut orders = customer.orders.0;
        sort_newest_first(&mut orders);

        Ok(orders)
    }

    /// Every order across all customers, flattened for the admin console.
    /// Kept in storage order; the console does its own sorting and filtering.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn all_orders(&self) -> Result<Vec<AdminOrder>, OrderError> {
        let customers = self.customers.all().await?;

        let orders = customers
            .into_iter()
            .flat_map(|customer| {
                let CustomerRow {
                    username,
                    phone,
                    orders,
                    ..
                } = customer;
                orders
                    .0
                    .into_iter()
                    .map(move |order| AdminOrder::from_order(order, username.clone(), phone.clone()))
            })
            .collect();

        Ok(orders)
    }

    /// Change the status of one order, wherever it lives.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::OrderNotFound` if no order has this id and
    /// `OrderError::Transition` if the order is already in a terminal
    /// state.
    pub async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<CustomerRow, OrderError> {
        self.customers
            .update_order_status(order_id, status)
            .await
            .map_err(status_update_error)
    }
}

/// Sort orders newest first by submission time.
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.date_order.cmp(&a.date_order));
}

/// Map a repository-level status update failure onto the order taxonomy.
///
/// A failed containment probe means no customer owns an order with the
/// requested id, which is the order-not-found case, not a store failure.
fn status_update_error(e: StatusUpdateError) -> OrderError {
    match e {
        StatusUpdateError::Repository(RepositoryError::NotFound) => OrderError::OrderNotFound,
        StatusUpdateError::Repository(other) => OrderError::Repository(other),
        StatusUpdateError::Transition(t) => OrderError::Transition(t),
    }
}

/// Build the order snapshot from the submitted lines.
///
/// Pure so the snapshot rules can be tested without a database.
fn build_order(
    items: Vec<CartLine>,
    shipping: &ShippingDetails,
    note: Option<String>,
) -> Result<Order, OrderError> {
    let cart = Cart::from_lines(items);
    if cart.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let quote = pricing::quote(&cart);
    let now = Utc::now();

    let products = cart
        .lines()
        .iter()
        .map(|line| OrderLine {
            name: line.product_name.clone(),
            price: line.product_price,
            quantity: line.quantity,
        })
        .collect();

    Ok(Order {
        order_id: OrderId::generate(),
        total_price: quote.total,
        date_order: now,
        address: shipping.joined(),
        products,
        payment: Payment {
            date_payment: now,
            method: greengrocer_core::PaymentMethod::CashOnDelivery,
        },
        status: OrderStatus::default(),
        note: note.unwrap_or_default(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn line(name: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: 1.into(),
            product_name: name.to_owned(),
            product_price: Decimal::from(price),
            product_image_link: String::new(),
            quantity,
        }
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            address: "12 Market St".to_owned(),
            province: "Hanoi".to_owned(),
            district: "Ba Dinh".to_owned(),
            ward: "Truc Bach".to_owned(),
        }
    }

    #[test]
    fn test_empty_submission_rejected() {
        let result = build_order(vec![], &shipping(), None);
        assert!(matches!(result, Err(OrderError::EmptyItems)));
    }

    #[test]
    fn test_new_order_starts_waiting() {
        let order = build_order(vec![line("Apples", 100_000, 2)], &shipping(), None).unwrap();
        assert_eq!(order.status, OrderStatus::WaitingForConfirmation);
    }

    #[test]
    fn test_total_computed_server_side() {
        // 100000 * 2 + 30000 shipping + 20000 tax
        let order = build_order(vec![line("Apples", 100_000, 2)], &shipping(), None).unwrap();
        assert_eq!(order.total_price, Decimal::from(250_000));
    }

    #[test]
    fn test_lines_snapshot_name_price_quantity() {
        let order = build_order(vec![line("Apples", 45_000, 3)], &shipping(), None).unwrap();
        assert_eq!(order.products.len(), 1);
        assert_eq!(order.products[0].name, "Apples");
        assert_eq!(order.products[0].price, Decimal::from(45_000));
        assert_eq!(order.products[0].quantity, 3);
    }

    #[test]
    fn test_address_joins_non_empty_parts() {
        let order = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        assert_eq!(order.address, "12 Market St, Hanoi, Ba Dinh, Truc Bach");

        let partial = ShippingDetails {
            address: "12 Market St".to_owned(),
            ..ShippingDetails::default()
        };
        let order = build_order(vec![line("Apples", 1_000, 1)], &partial, None).unwrap();
        assert_eq!(order.address, "12 Market St");
    }

    #[test]
    fn test_payment_defaults_to_cash_on_delivery() {
        let order = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        assert_eq!(
            order.payment.method,
            greengrocer_core::PaymentMethod::CashOnDelivery
        );
    }

    #[test]
    fn test_note_defaults_to_empty() {
        let order = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        assert!(order.note.is_empty());

        let order = build_order(
            vec![line("Apples", 1_000, 1)],
            &shipping(),
            Some("ring the bell".to_owned()),
        )
        .unwrap();
        assert_eq!(order.note, "ring the bell");
    }

    fn order_submitted_at(secs: i64) -> Order {
        let mut order = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        order.date_order = chrono::DateTime::from_timestamp(secs, 0).unwrap();
        order
    }

    #[test]
    fn test_history_sorted_newest_first() {
        let mut orders = vec![
            order_submitted_at(100),
            order_submitted_at(300),
            order_submitted_at(200),
        ];
        sort_newest_first(&mut orders);

        assert!(
            orders
                .windows(2)
                .all(|pair| pair[0].date_order >= pair[1].date_order)
        );
        assert_eq!(orders[0].date_order.timestamp(), 300);
        assert_eq!(orders[2].date_order.timestamp(), 100);
    }

    #[test]
    fn test_unknown_order_id_maps_to_not_found() {
        let mapped = status_update_error(StatusUpdateError::Repository(RepositoryError::NotFound));
        assert!(matches!(mapped, OrderError::OrderNotFound));
    }

    #[test]
    fn test_illegal_transition_maps_to_transition_error() {
        let mapped = status_update_error(StatusUpdateError::Transition(
            greengrocer_core::StatusError::Terminal {
                from: OrderStatus::Delivered,
                to: OrderStatus::Shipping,
            },
        ));
        assert!(matches!(mapped, OrderError::Transition(_)));
    }

    #[test]
    fn test_fresh_ids_per_order() {
        let a = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        let b = build_order(vec![line("Apples", 1_000, 1)], &shipping(), None).unwrap();
        assert_ne!(a.order_id, b.order_id);
    }
}
