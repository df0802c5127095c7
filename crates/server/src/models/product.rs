//! Catalog product types.
//!
//! These describe the live catalog only. Purchased items are snapshotted
//! into `greengrocer_core::OrderLine` at submission time and never refer
//! back to these rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greengrocer_core::ProductId;

/// One row of `store.product`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    /// Units in stock. Informational only; there is no reservation.
    pub quantity: i32,
    pub category: String,
    pub description: String,
}

/// Payload for creating a product. All fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub image: String,
    pub price: Decimal,
    pub quantity: i32,
    pub category: String,
    pub description: String,
}

impl NewProduct {
    /// Whether any of the free-text fields is blank.
    #[must_use]
    pub fn has_blank_field(&self) -> bool {
        [&self.name, &self.image, &self.category, &self.description]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

/// Partial update payload; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
    pub description: Option<String>,
}
