//! Greengrocer Core - shared domain types and order logic.
//!
//! This crate provides the types and pure logic used across the Greengrocer
//! components:
//! - `server` - REST API for the storefront and the admin console
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Everything that touches the outside world lives
//! in the server crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, and the order model with its status
//!   workflow
//! - [`cart`] - The pre-order working set of line items and its invariants
//! - [`pricing`] - Order totals (subtotal, shipping fee, tax)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use types::*;
