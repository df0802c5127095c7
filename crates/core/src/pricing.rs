//! Order pricing.
//!
//! The total of an order is computed exactly once, at submission time, from
//! the cart snapshot: `subtotal + shipping fee + subtotal * tax rate`. The
//! result is stored on the order and never recomputed, even if catalog
//! prices change later.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::Cart;

/// Flat shipping fee charged on every order.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::from(30_000)
}

/// Tax rate applied to the subtotal (10%).
#[must_use]
pub fn tax_rate() -> Decimal {
    Decimal::new(1, 1)
}

/// Price breakdown for one cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Sum of `price * quantity` over the cart lines.
    pub subtotal: Decimal,
    /// Flat shipping fee.
    pub shipping: Decimal,
    /// `subtotal * tax rate`.
    pub tax: Decimal,
    /// `subtotal + shipping + tax`.
    pub total: Decimal,
}

/// Price a cart snapshot.
#[must_use]
pub fn quote(cart: &Cart) -> Quote {
    let subtotal = cart.total();
    let shipping = shipping_fee();
    let tax = subtotal * tax_rate();
    Quote {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use crate::types::ProductId;

    fn cart_with(price: i64, quantity: u32) -> Cart {
        Cart::from_lines(vec![CartLine {
            product_id: ProductId::new(1),
            product_name: "product".to_owned(),
            product_price: Decimal::from(price),
            product_image_link: String::new(),
            quantity,
        }])
    }

    #[test]
    fn test_reference_scenario() {
        // 100 000 x 2 with a 30 000 fee and 10% tax.
        let quote = quote(&cart_with(100_000, 2));
        assert_eq!(quote.subtotal, Decimal::from(200_000));
        assert_eq!(quote.shipping, Decimal::from(30_000));
        assert_eq!(quote.tax, Decimal::from(20_000));
        assert_eq!(quote.total, Decimal::from(250_000));
    }

    #[test]
    fn test_empty_cart_still_charges_shipping() {
        let quote = quote(&Cart::new());
        assert_eq!(quote.subtotal, Decimal::ZERO);
        assert_eq!(quote.total, shipping_fee());
    }

    #[test]
    fn test_fractional_tax_keeps_precision() {
        let quote = quote(&cart_with(15, 1));
        assert_eq!(quote.tax, Decimal::new(15, 1)); // 1.5
        assert_eq!(quote.total, Decimal::from(30_015) + Decimal::new(15, 1));
    }
}
