//! Coupons

use rust_decimal::Decimal;

use crate::pricing::round_money;

/// A named percentage discount rule.
///
/// At most one coupon applies per checkout. A `once_only` coupon may be
/// redeemed at most once per client; that restriction is enforced by the
/// checkout layer's redemption ledger, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coupon {
    /// Code customers enter at checkout; matched case-insensitively.
    pub code: &'static str,

    /// Whole-number percentage taken off the order subtotal.
    pub percent: u8,

    /// Whether the coupon may be redeemed at most once per client.
    pub once_only: bool,
}

/// The coupons accepted at checkout.
pub const VALID_COUPONS: &[Coupon] = &[
    Coupon {
        code: "SAVE15",
        percent: 15,
        once_only: false,
    },
    Coupon {
        code: "FIRST10",
        percent: 10,
        once_only: false,
    },
    Coupon {
        code: "LUCKY5",
        percent: 5,
        once_only: false,
    },
    Coupon {
        code: "WINMORE16",
        percent: 16,
        once_only: false,
    },
    Coupon {
        code: "NEWBIE50",
        percent: 20,
        once_only: true,
    },
];

/// Looks up a coupon by code, ignoring case and surrounding whitespace.
pub fn find_coupon(code: &str) -> Option<&'static Coupon> {
    let code = code.trim();

    VALID_COUPONS
        .iter()
        .find(|coupon| coupon.code.eq_ignore_ascii_case(code))
}

impl Coupon {
    /// The amount this coupon takes off the given subtotal, rounded to two
    /// decimal places.
    pub fn discount_on(&self, subtotal: Decimal) -> Decimal {
        round_money(subtotal * Decimal::from(self.percent) / Decimal::ONE_HUNDRED)
    }
}
