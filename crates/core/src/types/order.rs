//! The order model and its status workflow.
//!
//! An [`Order`] is an immutable-once-created financial record of a completed
//! checkout. It lives embedded under its owning customer document; the only
//! field that ever changes after creation is [`Order::status`], and only
//! through [`OrderStatus::transition`].
//!
//! The line items inside an order are [`OrderLine`] snapshots, deliberately a
//! different type from the live catalog product: later catalog edits or
//! deletions must never alter historical orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::OrderId;

/// Stage of order fulfillment.
///
/// Wire names keep the historical strings used by the storefront client.
///
/// `Delivered` and `Cancelled` are terminal: once an order reaches either,
/// no further status change is accepted. The two open states may move in
/// either direction (an admin can pull an order back from `shipping` to
/// `waiting for confirmation` if it was confirmed by mistake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Initial state of every submitted order.
    #[default]
    #[serde(rename = "waiting for confirmation")]
    WaitingForConfirmation,
    /// Confirmed and handed to the courier.
    #[serde(rename = "shipping")]
    Shipping,
    /// Terminal: the customer has received the order.
    #[serde(rename = "delivered")]
    Delivered,
    /// Terminal: the order was cancelled before delivery.
    #[serde(rename = "cancelled")]
    Cancelled,
}

/// Rejected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The order is already in a terminal state.
    #[error("order is already {from}, cannot change it to {to}")]
    Terminal {
        /// Current (terminal) status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Validate a transition from `self` to `next`.
    ///
    /// Setting the current status again is allowed, so repeated updates are
    /// idempotent last-write-wins. Any transition out of a terminal state is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::Terminal`] when `self` is terminal and `next`
    /// differs from it.
    pub fn transition(self, next: Self) -> Result<Self, StatusError> {
        if self == next {
            return Ok(next);
        }
        if self.is_terminal() {
            return Err(StatusError::Terminal {
                from: self,
                to: next,
            });
        }
        Ok(next)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::WaitingForConfirmation => "waiting for confirmation",
            Self::Shipping => "shipping",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting for confirmation" => Ok(Self::WaitingForConfirmation),
            "shipping" => Ok(Self::Shipping),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// The only supported method; there is no payment gateway.
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

/// Payment record attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// When the payment record was created (order submission time for
    /// cash-on-delivery).
    pub date_payment: DateTime<Utc>,
    /// Payment method.
    #[serde(default)]
    pub method: PaymentMethod,
}

/// Denormalized snapshot of one purchased product.
///
/// Copied from the cart at submission time and never re-derived from the
/// live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product name as it was at purchase time.
    pub name: String,
    /// Unit price as it was at purchase time.
    pub price: Decimal,
    /// Purchased quantity.
    pub quantity: u32,
}

/// One order, embedded in its owning customer document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Globally unique identifier, assigned at creation.
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    /// Total computed once at submission (subtotal + shipping fee + tax).
    /// A point-in-time financial record, never recomputed.
    pub total_price: Decimal,
    /// Submission timestamp.
    pub date_order: DateTime<Utc>,
    /// Full shipping address line.
    pub address: String,
    /// Snapshot of the purchased items.
    pub products: Vec<OrderLine>,
    /// Payment record.
    pub payment: Payment,
    /// Fulfillment status. Documents written before the status field existed
    /// default to the initial state.
    #[serde(default)]
    pub status: OrderStatus,
    /// Optional note left by the customer at checkout.
    #[serde(default)]
    pub note: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status_is_waiting() {
        assert_eq!(OrderStatus::default(), OrderStatus::WaitingForConfirmation);
    }

    #[test]
    fn test_forward_transitions_allowed() {
        let status = OrderStatus::WaitingForConfirmation;
        let status = status.transition(OrderStatus::Shipping).unwrap();
        let status = status.transition(OrderStatus::Delivered).unwrap();
        assert_eq!(status, OrderStatus::Delivered);
    }

    #[test]
    fn test_backward_transition_between_open_states_allowed() {
        let status = OrderStatus::Shipping;
        assert_eq!(
            status.transition(OrderStatus::WaitingForConfirmation),
            Ok(OrderStatus::WaitingForConfirmation)
        );
    }

    #[test]
    fn test_cancel_from_any_open_state() {
        assert!(
            OrderStatus::WaitingForConfirmation
                .transition(OrderStatus::Cancelled)
                .is_ok()
        );
        assert!(
            OrderStatus::Shipping
                .transition(OrderStatus::Cancelled)
                .is_ok()
        );
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let err = OrderStatus::Delivered
            .transition(OrderStatus::Shipping)
            .unwrap_err();
        assert_eq!(
            err,
            StatusError::Terminal {
                from: OrderStatus::Delivered,
                to: OrderStatus::Shipping,
            }
        );
        assert!(
            OrderStatus::Cancelled
                .transition(OrderStatus::WaitingForConfirmation)
                .is_err()
        );
    }

    #[test]
    fn test_setting_same_status_is_idempotent() {
        assert!(
            OrderStatus::Delivered
                .transition(OrderStatus::Delivered)
                .is_ok()
        );
        assert!(
            OrderStatus::Shipping
                .transition(OrderStatus::Shipping)
                .is_ok()
        );
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&OrderStatus::WaitingForConfirmation).unwrap();
        assert_eq!(json, "\"waiting for confirmation\"");
        let parsed: OrderStatus = serde_json::from_str("\"shipping\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipping);
    }

    #[test]
    fn test_order_without_status_defaults_to_waiting() {
        let json = format!(
            r#"{{
                "orderId": "{}",
                "total_price": "250000",
                "date_order": "2024-05-01T10:00:00Z",
                "address": "12 Market St, Hometown",
                "products": [{{"name": "Apples", "price": "100000", "quantity": 2}}],
                "payment": {{"date_payment": "2024-05-01T10:00:00Z", "method": "Cash on Delivery"}}
            }}"#,
            OrderId::generate()
        );
        let order: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order.status, OrderStatus::WaitingForConfirmation);
        assert_eq!(order.note, "");
    }
}
