//! Checkout errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with no lines in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A required address field is missing or blank.
    #[error("incomplete shipping address")]
    IncompleteAddress,

    /// The coupon code does not match any known coupon.
    #[error("invalid coupon code")]
    InvalidCoupon,

    /// A once-only coupon was already redeemed on this client.
    #[error("coupon already used")]
    CouponAlreadyUsed,

    /// Underlying storage error; the order was not placed.
    #[error("storage error")]
    Store(#[from] StoreError),
}
