//! Database row types and their API-facing views.

pub mod customer;
pub mod product;

pub use customer::{AdminOrder, CustomerRow, CustomerView};
pub use product::{NewProduct, ProductRow, ProductUpdate};
