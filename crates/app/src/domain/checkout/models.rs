//! Checkout models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hemline::coupons::Coupon;

/// A shipping destination.
///
/// Saved on the user record for reuse across checkouts, or supplied ad hoc
/// for a single order. Fields default individually so a partially-written
/// document still reads; completeness is enforced at checkout, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name.
    #[serde(default)]
    pub full_name: String,

    /// Street address.
    #[serde(default)]
    pub address: String,

    /// City.
    #[serde(default)]
    pub city: String,

    /// State or region. Not required at checkout.
    #[serde(default)]
    pub state: String,

    /// Postal code.
    #[serde(default)]
    pub zip: String,

    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
}

/// A coupon accepted for the checkout in progress, with the discount it
/// takes off the subtotal it was applied against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// The matched coupon rule.
    pub coupon: &'static Coupon,

    /// Discount amount at application time.
    pub discount: Decimal,
}

impl AppliedCoupon {
    /// The canonical coupon code.
    pub fn code(&self) -> &'static str {
        self.coupon.code
    }
}
