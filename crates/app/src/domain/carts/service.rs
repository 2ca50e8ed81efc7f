//! Carts service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use hemline::cart::{Cart, CartLine};

use crate::{
    auth::AuthContext,
    domain::carts::errors::CartsServiceError,
    store::{UserRecord, UserStore},
};

#[derive(Clone)]
pub struct StoreCartsService {
    users: Arc<dyn UserStore>,
}

impl StoreCartsService {
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    async fn load_cart(&self, uid: &str) -> Result<Option<Cart>, CartsServiceError> {
        let record = self.users.get_user_record(uid).await?;

        Ok(record.map(|record| Cart::from_lines(record.cart)))
    }

    async fn persist(&self, uid: &str, cart: &Cart) -> Result<(), CartsServiceError> {
        self.users.set_user_cart(uid, cart.lines()).await?;

        Ok(())
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    async fn get_cart(&self, auth: &AuthContext) -> Result<Cart, CartsServiceError> {
        Ok(self.load_cart(&auth.user_id).await?.unwrap_or_default())
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, auth, line),
        fields(user_id = %auth.user_id, product_id = %line.product_id),
        err
    )]
    async fn add_item(&self, auth: &AuthContext, line: CartLine) -> Result<Cart, CartsServiceError> {
        match self.load_cart(&auth.user_id).await? {
            Some(mut cart) => {
                cart.add(line);
                self.persist(&auth.user_id, &cart).await?;

                Ok(cart)
            }
            None => {
                // First add on a brand-new account: the user document does
                // not exist yet, so create it with the cart in place.
                let mut cart = Cart::new();
                cart.add(line);

                let record = UserRecord {
                    cart: cart.lines().to_vec(),
                    ..UserRecord::new(auth.user_id.clone())
                };

                self.users.put_user_record(&record).await?;

                info!(user_id = %auth.user_id, "created user record on first add");

                Ok(cart)
            }
        }
    }

    async fn change_quantity<'a>(
        &self,
        auth: &AuthContext,
        product_id: &str,
        size: Option<&'a str>,
        delta: i64,
    ) -> Result<Cart, CartsServiceError> {
        let Some(mut cart) = self.load_cart(&auth.user_id).await? else {
            return Ok(Cart::new());
        };

        cart.change_quantity(product_id, size, delta);
        self.persist(&auth.user_id, &cart).await?;

        Ok(cart)
    }

    async fn remove_item<'a>(
        &self,
        auth: &AuthContext,
        product_id: &str,
        size: Option<&'a str>,
    ) -> Result<Cart, CartsServiceError> {
        let Some(mut cart) = self.load_cart(&auth.user_id).await? else {
            return Ok(Cart::new());
        };

        cart.remove(product_id, size);
        self.persist(&auth.user_id, &cart).await?;

        Ok(cart)
    }

    async fn clear(&self, auth: &AuthContext) -> Result<Cart, CartsServiceError> {
        let Some(mut cart) = self.load_cart(&auth.user_id).await? else {
            return Ok(Cart::new());
        };

        cart.clear();
        self.persist(&auth.user_id, &cart).await?;

        Ok(cart)
    }
}

/// Cart reconciliation over the user's persisted record.
///
/// Every mutation is persisted before the returned cart is authoritative: on
/// a storage error the mutation must be treated as not having happened, and
/// the caller's previous snapshot remains the cart of record. There is no
/// server-side coordination between concurrent sessions — the last write to
/// the cart field wins.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The caller's persisted cart; an account with no record reads as empty.
    async fn get_cart(&self, auth: &AuthContext) -> Result<Cart, CartsServiceError>;

    /// Merges a line into the cart, keyed by `(product_id, size)`. A
    /// matching line gains the new quantity and keeps its snapshot price;
    /// otherwise the line is appended.
    async fn add_item(&self, auth: &AuthContext, line: CartLine)
    -> Result<Cart, CartsServiceError>;

    /// Adjusts a line's quantity by `delta`, removing the line when it
    /// reaches zero. Unknown lines are a silent no-op.
    async fn change_quantity<'a>(
        &self,
        auth: &AuthContext,
        product_id: &str,
        size: Option<&'a str>,
        delta: i64,
    ) -> Result<Cart, CartsServiceError>;

    /// Removes the line keyed by `(product_id, size)`.
    async fn remove_item<'a>(
        &self,
        auth: &AuthContext,
        product_id: &str,
        size: Option<&'a str>,
    ) -> Result<Cart, CartsServiceError>;

    /// Empties the cart.
    async fn clear(&self, auth: &AuthContext) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        store::{MockUserStore, StoreError, UserStore as _},
        test::TestContext,
    };

    use super::*;

    fn line(product_id: &str, size: Option<&str>) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            title: format!("Product {product_id}"),
            image: format!("https://img.example/{product_id}.jpg"),
            unit_price: Decimal::from(200),
            quantity: 1,
            size: size.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn get_cart_without_record_is_empty() -> TestResult {
        let ctx = TestContext::new();
        let auth = AuthContext::user("u1");

        let cart = ctx.carts.get_cart(&auth).await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn first_add_creates_record_with_cart() -> TestResult {
        let ctx = TestContext::new();
        let auth = AuthContext::user("u1");

        let cart = ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;

        assert_eq!(cart.len(), 1);

        let record = ctx.store.get_user_record("u1").await?;

        assert_eq!(record.map(|r| r.cart.len()), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn double_add_merges_into_one_persisted_line() -> TestResult {
        let ctx = TestContext::new();
        let auth = ctx.signed_in("u1").await?;

        ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;
        let cart = ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);

        let record = ctx.store.get_user_record("u1").await?;

        assert_eq!(record.map(|r| r.cart.len()), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn decrement_to_zero_removes_persisted_line() -> TestResult {
        let ctx = TestContext::new();
        let auth = ctx.signed_in("u1").await?;

        ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;

        let cart = ctx
            .carts
            .change_quantity(&auth, "p1", Some("M"), -1)
            .await?;

        assert!(cart.is_empty());

        let record = ctx.store.get_user_record("u1").await?;

        assert_eq!(record.map(|r| r.cart.len()), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn change_quantity_of_unknown_line_is_noop() -> TestResult {
        let ctx = TestContext::new();
        let auth = ctx.signed_in("u1").await?;

        ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;

        let cart = ctx
            .carts
            .change_quantity(&auth, "p1", Some("XL"), 1)
            .await?;

        assert_eq!(cart.total_quantity(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_item_leaves_other_sizes_alone() -> TestResult {
        let ctx = TestContext::new();
        let auth = ctx.signed_in("u1").await?;

        ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;
        ctx.carts.add_item(&auth, line("p1", Some("L"))).await?;

        let cart = ctx.carts.remove_item(&auth, "p1", Some("M")).await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(
            cart.lines().first().and_then(|l| l.size.as_deref()),
            Some("L")
        );

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_persisted_cart() -> TestResult {
        let ctx = TestContext::new();
        let auth = ctx.signed_in("u1").await?;

        ctx.carts.add_item(&auth, line("p1", Some("M"))).await?;
        ctx.carts.add_item(&auth, line("p2", None)).await?;

        let cart = ctx.carts.clear(&auth).await?;

        assert!(cart.is_empty());

        let record = ctx.store.get_user_record("u1").await?;

        assert_eq!(record.map(|r| r.cart.len()), Some(0));

        Ok(())
    }

    #[tokio::test]
    async fn failed_persist_surfaces_storage_error() {
        let mut users = MockUserStore::new();

        users
            .expect_get_user_record()
            .returning(|uid| Ok(Some(UserRecord::new(uid))));

        users
            .expect_set_user_cart()
            .returning(|_, _| Err(StoreError::Timeout));

        let service = StoreCartsService::new(Arc::new(users));
        let auth = AuthContext::user("u1");

        let result = service.add_item(&auth, line("p1", Some("M"))).await;

        assert!(
            matches!(result, Err(CartsServiceError::Store(StoreError::Timeout))),
            "expected storage error, got {result:?}"
        );
    }
}
