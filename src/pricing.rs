//! Pricing

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{cart::CartLine, coupons::Coupon};

/// Rounds a monetary amount to two decimal places.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives the sellable unit price from a catalog entry's original price and
/// discount percentage.
///
/// Missing or negative inputs normalize to zero so malformed catalog
/// documents cannot leak into downstream totals; percentages above 100 clamp
/// to 100. With a zero or absent discount the original price is returned
/// unchanged; otherwise the discounted price is rounded to two decimal
/// places.
pub fn final_unit_price(
    original_price: Option<Decimal>,
    discount_percent: Option<Decimal>,
) -> Decimal {
    let original = original_price.unwrap_or_default().max(Decimal::ZERO);

    let percent = discount_percent
        .unwrap_or_default()
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    if percent.is_zero() {
        return original;
    }

    round_money(original - original * percent / Decimal::ONE_HUNDRED)
}

/// Order-level shipping rules: a flat fee, waived once the subtotal exceeds a
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal above which shipping is free.
    pub free_threshold: Decimal,

    /// Flat fee charged at or below the threshold.
    pub flat_fee: Decimal,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Decimal::from(250),
            flat_fee: Decimal::from(30),
        }
    }
}

impl ShippingPolicy {
    /// The shipping fee charged on the given subtotal.
    pub fn fee_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal > self.free_threshold {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Totals derived from a cart snapshot and an optional coupon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    /// Sum of `unit_price * quantity` across all lines.
    pub subtotal: Decimal,

    /// Shipping fee per the [`ShippingPolicy`].
    pub shipping: Decimal,

    /// Coupon discount taken off the subtotal.
    pub discount: Decimal,

    /// `subtotal + shipping - discount`, floored at zero.
    pub total: Decimal,
}

/// Derives order totals from cart lines and an optional coupon.
///
/// An empty cart yields all-zero totals: no lines means nothing to ship, so
/// the flat fee does not apply. The total never goes negative, even when the
/// discount exceeds the subtotal.
pub fn cart_totals(
    lines: &[CartLine],
    coupon: Option<&Coupon>,
    policy: &ShippingPolicy,
) -> CartTotals {
    if lines.is_empty() {
        return CartTotals::default();
    }

    let subtotal = round_money(lines.iter().map(CartLine::line_total).sum());
    let shipping = policy.fee_for(subtotal);
    let discount = coupon.map_or(Decimal::ZERO, |coupon| coupon.discount_on(subtotal));
    let total = (subtotal + shipping - discount).max(Decimal::ZERO);

    CartTotals {
        subtotal,
        shipping,
        discount,
        total,
    }
}
