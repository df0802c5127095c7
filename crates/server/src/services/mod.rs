//! Business logic, kept out of the HTTP handlers.

pub mod auth;
pub mod orders;

pub use auth::AuthService;
pub use orders::OrderService;
