//! Order models.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hemline::cart::CartLine;

use crate::domain::checkout::models::ShippingAddress;

/// The frozen record of a completed checkout.
///
/// This is the field-exact wire shape of the persisted order document. Every
/// monetary field is a copy taken when the order was placed — later catalog
/// or coupon changes never touch it — and `total == subtotal + shipping -
/// discount` holds by construction. Orders are written once and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    /// Account that placed the order; reads are restricted to it.
    pub user_id: String,

    /// Cart lines as they stood at checkout.
    pub items: Vec<CartLine>,

    /// Destination supplied or confirmed at checkout.
    pub shipping_info: ShippingAddress,

    /// Sum of line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,

    /// Shipping fee charged on this order.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,

    /// Coupon discount taken off the subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,

    /// Amount paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,

    /// Applied coupon code, or the empty string when none was used.
    #[serde(default)]
    pub coupon: String,

    /// Creation time, serialized as an ISO-8601 string.
    pub created_at: Timestamp,
}

/// An order snapshot together with its document id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    /// Document id, derived from the purchaser and placement time.
    pub order_id: String,

    /// The snapshot itself.
    pub order: OrderSnapshot,
}
