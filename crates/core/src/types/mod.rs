//! Shared domain types.

pub mod email;
pub mod id;
pub mod order;

pub use email::{Email, EmailError};
pub use id::{CustomerId, OrderId, ProductId};
pub use order::{Order, OrderLine, OrderStatus, Payment, PaymentMethod, StatusError};
