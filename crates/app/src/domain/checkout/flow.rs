//! Checkout flow.

use std::sync::Arc;

use rust_decimal::Decimal;

use hemline::cart::CartLine;

use crate::{
    auth::AuthContext,
    domain::{
        checkout::{
            errors::CheckoutError,
            models::{AppliedCoupon, ShippingAddress},
            service::{CheckoutService, validate_address},
        },
        orders::models::StoredOrder,
    },
};

/// Where a checkout attempt stands.
///
/// There is no failed stage: a rejected payment attempt surfaces its error
/// and the flow stays at [`CheckoutStage::ReadyToPay`] for another try.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutStage {
    /// Waiting for a complete shipping address.
    #[default]
    CollectingAddress,

    /// Address accepted; a coupon may be applied or skipped.
    CouponOptional,

    /// Everything collected; waiting on the payment action.
    ReadyToPay,

    /// The order snapshot is persisted.
    OrderPlaced,
}

/// Drives one checkout attempt through its stages, holding what has been
/// collected so far.
#[derive(Clone)]
pub struct CheckoutFlow {
    checkout: Arc<dyn CheckoutService>,
    stage: CheckoutStage,
    address: Option<ShippingAddress>,
    coupon: Option<AppliedCoupon>,
}

impl CheckoutFlow {
    /// Starts a fresh flow at [`CheckoutStage::CollectingAddress`].
    pub fn new(checkout: Arc<dyn CheckoutService>) -> Self {
        Self {
            checkout,
            stage: CheckoutStage::default(),
            address: None,
            coupon: None,
        }
    }

    /// The current stage.
    pub fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// The coupon applied so far, if any.
    pub fn coupon(&self) -> Option<AppliedCoupon> {
        self.coupon
    }

    /// Accepts a validated shipping address and moves on to the coupon step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteAddress`] when a required field is
    /// blank; the flow stays where it was.
    pub fn submit_address(&mut self, address: ShippingAddress) -> Result<(), CheckoutError> {
        validate_address(&address)?;

        self.address = Some(address);

        if self.stage == CheckoutStage::CollectingAddress {
            self.stage = CheckoutStage::CouponOptional;
        }

        Ok(())
    }

    /// Applies a coupon against the given subtotal and marks the flow ready
    /// to pay.
    ///
    /// # Errors
    ///
    /// Propagates coupon validation errors; the flow keeps any previously
    /// applied coupon and stage.
    pub fn apply_coupon(&mut self, code: &str, subtotal: Decimal) -> Result<AppliedCoupon, CheckoutError> {
        let applied = self.checkout.apply_coupon(code, subtotal)?;

        self.coupon = Some(applied);

        if self.stage == CheckoutStage::CouponOptional {
            self.stage = CheckoutStage::ReadyToPay;
        }

        Ok(applied)
    }

    /// Skips the coupon step.
    pub fn skip_coupon(&mut self) {
        if self.stage == CheckoutStage::CouponOptional {
            self.stage = CheckoutStage::ReadyToPay;
        }
    }

    /// Places the order from the collected state and the given cart lines.
    ///
    /// On success the flow ends at [`CheckoutStage::OrderPlaced`]. On
    /// failure the error surfaces and the flow returns to
    /// [`CheckoutStage::ReadyToPay`] for another attempt.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::IncompleteAddress`] when no address was collected,
    /// [`CheckoutError::EmptyCart`] for an empty line list, and any error of
    /// the underlying [`CheckoutService::place_order`].
    pub async fn place_order(
        &mut self,
        auth: &AuthContext,
        lines: &[CartLine],
    ) -> Result<StoredOrder, CheckoutError> {
        let address = self
            .address
            .clone()
            .ok_or(CheckoutError::IncompleteAddress)?;

        match self
            .checkout
            .place_order(auth, lines, &address, self.coupon)
            .await
        {
            Ok(placed) => {
                self.stage = CheckoutStage::OrderPlaced;

                Ok(placed)
            }
            Err(error) => {
                self.stage = CheckoutStage::ReadyToPay;

                Err(error)
            }
        }
    }
}
