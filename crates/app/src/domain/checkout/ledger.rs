//! Coupon redemption ledger.

use std::{
    collections::HashSet,
    sync::{Mutex, PoisonError},
};

use mockall::automock;

/// Client-local record of redeemed once-only coupons.
///
/// Advisory only: the marker lives with the client, so a fresh client starts
/// with a clean ledger, and the check-then-set in coupon application is not
/// atomic across concurrent sessions. A server-side per-user redemption
/// ledger would close both gaps; this trait is the seam where one would plug
/// in.
#[automock]
pub trait CouponLedger: Send + Sync {
    /// Whether the code has been redeemed on this client.
    fn is_redeemed(&self, code: &str) -> bool;

    /// Records a redemption of the code.
    fn mark_redeemed(&self, code: &str);
}

/// In-process ledger.
#[derive(Debug, Default)]
pub struct MemoryCouponLedger {
    redeemed: Mutex<HashSet<String>>,
}

impl MemoryCouponLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CouponLedger for MemoryCouponLedger {
    fn is_redeemed(&self, code: &str) -> bool {
        self.redeemed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(code)
    }

    fn mark_redeemed(&self, code: &str) {
        self.redeemed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(code.to_string());
    }
}
