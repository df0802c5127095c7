//! The cart: the pre-order working set of line items.
//!
//! The cart belongs to one browsing session and is persisted by the client
//! between page loads; the server only ever sees it as the item list attached
//! to an order submission. Its two invariants are enforced here, in one
//! place, rather than at every call site:
//!
//! - every line has `quantity >= 1`
//! - at most one line per product ID (adding an existing product increments
//!   its quantity instead of duplicating the line)
//!
//! Serialization is isolated to [`Cart::from_json`] / [`Cart::to_json`] and
//! [`Cart::from_lines`]; anything malformed at that boundary degrades to an
//! empty cart or gets normalized, never into a broken invariant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// One line of the cart: a product reference plus display data and quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog product this line refers to.
    pub product_id: ProductId,
    /// Product name for display and for the order snapshot.
    pub product_name: String,
    /// Unit price at the time the product was put in the cart.
    pub product_price: Decimal,
    /// Product image URL for display.
    #[serde(default)]
    pub product_image_link: String,
    /// Number of units, always >= 1 once inside a [`Cart`].
    pub quantity: u32,
}

/// The cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from an untrusted line list (e.g., the `items` array of
    /// an order submission), normalizing it through the cart invariants:
    /// zero quantities are floored to 1 and duplicate product IDs are merged
    /// by summing their quantities.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            line.quantity = line.quantity.max(1);
            match cart.line_mut(line.product_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Deserialize a cart from persisted JSON.
    ///
    /// Malformed persisted state is treated as an empty cart; there is
    /// nothing useful to recover from it.
    #[must_use]
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str::<Vec<CartLine>>(json)
            .map(Self::from_lines)
            .unwrap_or_default()
    }

    /// Serialize the cart for persistence.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.lines).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Add one unit of a product.
    ///
    /// If a line with the same product ID already exists its quantity is
    /// incremented by 1 and the rest of `product` is ignored; otherwise a new
    /// line is appended with quantity 1.
    pub fn add(&mut self, product: CartLine) {
        match self.line_mut(product.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.lines.push(CartLine {
                quantity: 1,
                ..product
            }),
        }
    }

    /// Set the quantity of an existing line, floored at 1.
    ///
    /// Unknown product IDs are a no-op. Callers holding raw user input
    /// should run it through [`parse_quantity`] first.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity.max(1);
        }
    }

    /// Remove a line; no-op if absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart. Called after a successful order submission and on
    /// logout so no stale cart survives either boundary.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price * quantity` over all lines, recomputed on every call.
    ///
    /// Quantities and prices come from untrusted input, so the arithmetic
    /// saturates at [`Decimal::MAX`] instead of panicking on overflow.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().fold(Decimal::ZERO, |acc, line| {
            let line_total = line
                .product_price
                .checked_mul(Decimal::from(line.quantity))
                .unwrap_or(Decimal::MAX);
            acc.checked_add(line_total).unwrap_or(Decimal::MAX)
        })
    }

    /// The current lines.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

/// Coerce a raw quantity input to a valid cart quantity.
///
/// Non-numeric, zero, or negative input becomes 1, never 0 and never an
/// error: a quantity field the user mangled should leave one unit in the
/// cart, not eject the line.
#[must_use]
pub fn parse_quantity(raw: &str) -> u32 {
    raw.trim().parse::<u32>().ok().filter(|q| *q >= 1).unwrap_or(1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            product_name: format!("product-{id}"),
            product_price: Decimal::from(price),
            product_image_link: String::new(),
            quantity,
        }
    }

    #[test]
    fn test_add_new_product_starts_at_one() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 99));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_product_twice_merges() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 1));
        cart.add(line(1, 15_000, 1));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity_floors_at_one() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 1));
        cart.set_quantity(ProductId::new(1), 0);
        assert_eq!(cart.lines()[0].quantity, 1);
        cart.set_quantity(ProductId::new(1), 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_unknown_product_is_noop() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 1));
        cart.set_quantity(ProductId::new(42), 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 1));
        cart.remove(ProductId::new(42));
        assert_eq!(cart.lines().len(), 1);
        cart.remove(ProductId::new(1));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add(line(1, 10_000, 1));
        cart.add(line(2, 5_000, 1));
        cart.add(line(1, 10_000, 1));
        assert_eq!(cart.total(), Decimal::from(25_000));

        cart.set_quantity(ProductId::new(2), 3);
        assert_eq!(cart.total(), Decimal::from(35_000));

        cart.remove(ProductId::new(1));
        assert_eq!(cart.total(), Decimal::from(15_000));

        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_quantity_never_below_one() {
        let mut cart = Cart::from_lines(vec![line(1, 1_000, 0), line(2, 2_000, 3)]);
        cart.set_quantity(ProductId::new(2), 0);
        assert!(cart.lines().iter().all(|l| l.quantity >= 1));
    }

    #[test]
    fn test_quantity_merge_saturates_instead_of_wrapping() {
        let half = 2_u32.pow(31);
        let cart = Cart::from_lines(vec![line(1, 1_000, half), line(1, 1_000, half)]);
        assert_eq!(cart.lines()[0].quantity, u32::MAX);

        let mut cart = Cart::from_lines(vec![line(1, 1_000, u32::MAX)]);
        cart.add(line(1, 1_000, 1));
        assert_eq!(cart.lines()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_total_saturates_instead_of_panicking() {
        let mut cart = Cart::from_lines(vec![CartLine {
            product_id: ProductId::new(1),
            product_name: "product".to_owned(),
            product_price: Decimal::MAX,
            product_image_link: String::new(),
            quantity: u32::MAX,
        }]);
        assert_eq!(cart.total(), Decimal::MAX);

        cart.add(line(2, 1, 1));
        assert_eq!(cart.total(), Decimal::MAX);
    }

    #[test]
    fn test_from_lines_merges_duplicates() {
        let cart = Cart::from_lines(vec![line(1, 1_000, 2), line(1, 1_000, 3)]);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_parse_quantity_coerces_garbage_to_one() {
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity(""), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-3"), 1);
        assert_eq!(parse_quantity(" 4 "), 4);
    }

    #[test]
    fn test_malformed_persisted_state_is_empty_cart() {
        assert!(Cart::from_json("{not json").is_empty());
        assert!(Cart::from_json("{\"an\": \"object\"}").is_empty());
        assert!(Cart::from_json("[]").is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut cart = Cart::new();
        cart.add(line(1, 15_000, 1));
        cart.add(line(2, 30_000, 1));
        let restored = Cart::from_json(&cart.to_json());
        assert_eq!(restored, cart);
    }
}
