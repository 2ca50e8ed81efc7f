//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::{info, warn};

use hemline::{
    cart::CartLine,
    coupons::find_coupon,
    pricing::{ShippingPolicy, cart_totals},
};

use crate::{
    auth::AuthContext,
    domain::{
        checkout::{
            errors::CheckoutError,
            ledger::CouponLedger,
            models::{AppliedCoupon, ShippingAddress},
        },
        orders::models::{OrderSnapshot, StoredOrder},
    },
    store::{OrderStore, UserStore},
};

/// Checks that every field required at checkout is present.
///
/// `state` is deliberately not required: orders have always gone through
/// without one, and existing saved addresses rely on that.
///
/// # Errors
///
/// Returns [`CheckoutError::IncompleteAddress`] when a required field is
/// missing or blank.
pub fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    let required = [
        &address.full_name,
        &address.address,
        &address.city,
        &address.zip,
        &address.phone,
    ];

    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(CheckoutError::IncompleteAddress);
    }

    Ok(())
}

#[derive(Clone)]
pub struct StoreCheckoutService {
    users: Arc<dyn UserStore>,
    orders: Arc<dyn OrderStore>,
    ledger: Arc<dyn CouponLedger>,
    policy: ShippingPolicy,
}

impl StoreCheckoutService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        orders: Arc<dyn OrderStore>,
        ledger: Arc<dyn CouponLedger>,
    ) -> Self {
        Self {
            users,
            orders,
            ledger,
            policy: ShippingPolicy::default(),
        }
    }

    /// Two-step commit: persist the order, then clear the cart.
    ///
    /// The store has no multi-document transaction, so the sequence is
    /// best-effort. Once the order write lands it is authoritative; a
    /// failure clearing the cart afterwards leaves a stale cart next to a
    /// placed order, which is logged and tolerated rather than misreported
    /// as a failed checkout.
    async fn commit_order_and_clear_cart(
        &self,
        order_id: &str,
        order: &OrderSnapshot,
    ) -> Result<(), CheckoutError> {
        self.orders.create_order(order_id, order).await?;

        if let Err(error) = self.users.set_user_cart(&order.user_id, &[]).await {
            warn!(
                order_id,
                error = %error,
                "order persisted but cart clear failed; cart left stale"
            );
        }

        Ok(())
    }
}

fn order_id_for(uid: &str, created_at: Timestamp) -> String {
    format!("{uid}_{}", created_at.as_millisecond())
}

#[async_trait]
impl CheckoutService for StoreCheckoutService {
    fn apply_coupon(&self, code: &str, subtotal: Decimal) -> Result<AppliedCoupon, CheckoutError> {
        let coupon = find_coupon(code).ok_or(CheckoutError::InvalidCoupon)?;

        if coupon.once_only && self.ledger.is_redeemed(coupon.code) {
            return Err(CheckoutError::CouponAlreadyUsed);
        }

        let discount = coupon.discount_on(subtotal);

        if coupon.once_only {
            self.ledger.mark_redeemed(coupon.code);
        }

        Ok(AppliedCoupon { coupon, discount })
    }

    async fn saved_shipping_info(
        &self,
        auth: &AuthContext,
    ) -> Result<Option<ShippingAddress>, CheckoutError> {
        let record = self.users.get_user_record(&auth.user_id).await?;

        Ok(record.and_then(|record| record.shipping_info))
    }

    async fn save_shipping_info(
        &self,
        auth: &AuthContext,
        address: &ShippingAddress,
    ) -> Result<(), CheckoutError> {
        self.users
            .set_user_shipping_info(&auth.user_id, Some(address))
            .await?;

        Ok(())
    }

    async fn delete_shipping_info(&self, auth: &AuthContext) -> Result<(), CheckoutError> {
        self.users
            .set_user_shipping_info(&auth.user_id, None)
            .await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "checkout.service.place_order",
        skip(self, auth, lines, address, coupon),
        fields(user_id = %auth.user_id, line_count = lines.len()),
        err
    )]
    async fn place_order(
        &self,
        auth: &AuthContext,
        lines: &[CartLine],
        address: &ShippingAddress,
        coupon: Option<AppliedCoupon>,
    ) -> Result<StoredOrder, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        validate_address(address)?;

        let totals = cart_totals(lines, coupon.map(|applied| applied.coupon), &self.policy);
        let created_at = Timestamp::now();
        let order_id = order_id_for(&auth.user_id, created_at);

        let order = OrderSnapshot {
            user_id: auth.user_id.clone(),
            items: lines.to_vec(),
            shipping_info: address.clone(),
            subtotal: totals.subtotal,
            shipping: totals.shipping,
            discount: totals.discount,
            total: totals.total,
            coupon: coupon.map(|applied| applied.code().to_string()).unwrap_or_default(),
            created_at,
        };

        self.commit_order_and_clear_cart(&order_id, &order).await?;

        info!(%order_id, total = %order.total, "order placed");

        Ok(StoredOrder { order_id, order })
    }
}

/// The state machine that turns a cart, an address and an optional coupon
/// into an immutable order.
#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Validates a coupon code against the static table and, for once-only
    /// coupons, the client-local redemption ledger.
    ///
    /// The ledger check and the redemption marker are a check-then-set with
    /// no atomicity across concurrent sessions; the ledger is advisory (see
    /// [`CouponLedger`]).
    fn apply_coupon(&self, code: &str, subtotal: Decimal) -> Result<AppliedCoupon, CheckoutError>;

    /// The caller's saved shipping address, if one is on the record.
    async fn saved_shipping_info(
        &self,
        auth: &AuthContext,
    ) -> Result<Option<ShippingAddress>, CheckoutError>;

    /// Persists a reusable shipping address on the caller's record.
    /// Completeness is enforced when the address is used to pay, not here.
    async fn save_shipping_info(
        &self,
        auth: &AuthContext,
        address: &ShippingAddress,
    ) -> Result<(), CheckoutError>;

    /// Clears the saved shipping address.
    async fn delete_shipping_info(&self, auth: &AuthContext) -> Result<(), CheckoutError>;

    /// Places an order: computes totals from the given lines, persists the
    /// immutable snapshot under a fresh id, then clears the caller's cart.
    ///
    /// The two writes are not transactional; see the contract notes on the
    /// implementation for the inconsistency window.
    async fn place_order(
        &self,
        auth: &AuthContext,
        lines: &[CartLine],
        address: &ShippingAddress,
        coupon: Option<AppliedCoupon>,
    ) -> Result<StoredOrder, CheckoutError>;
}
