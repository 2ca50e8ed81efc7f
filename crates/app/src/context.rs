//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthContext, AuthError, SessionIdentity},
    config::AppConfig,
    domain::{
        carts::{CartsService, StoreCartsService},
        checkout::{CheckoutService, MemoryCouponLedger, StoreCheckoutService},
        orders::{OrdersService, StoreOrdersService},
        products::{ProductsService, StoreProductsService},
    },
    store::{
        MemoryStore, MessageStore, OrderStore, ProductStore, RestStore, RestStoreConfig,
        StoreError, UserStore,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to set up the document store client")]
    Store(#[from] StoreError),
}

/// Wired-up application services sharing one store backend and one identity
/// session.
#[derive(Clone)]
pub struct AppContext {
    pub identity: Arc<SessionIdentity>,
    pub carts: Arc<dyn CartsService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub orders: Arc<dyn OrdersService>,
    pub products: Arc<dyn ProductsService>,
    pub users: Arc<dyn UserStore>,
    pub messages: Arc<dyn MessageStore>,
}

impl AppContext {
    /// Builds the context against the hosted document store.
    ///
    /// # Errors
    ///
    /// Returns an error when the store client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let store = Arc::new(RestStore::new(RestStoreConfig {
            base_url: config.store_url.clone(),
            auth_token: config.store_auth_token.clone(),
            timeout: config.store_timeout,
        })?);

        Ok(Self::with_store(store))
    }

    /// Builds the context against the in-process store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Wires every service to one shared store backend.
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: UserStore + OrderStore + ProductStore + MessageStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let orders: Arc<dyn OrderStore> = store.clone();
        let products: Arc<dyn ProductStore> = store.clone();
        let messages: Arc<dyn MessageStore> = store;

        let ledger = Arc::new(MemoryCouponLedger::new());

        Self {
            identity: Arc::new(SessionIdentity::new()),
            carts: Arc::new(StoreCartsService::new(users.clone())),
            checkout: Arc::new(StoreCheckoutService::new(
                users.clone(),
                orders.clone(),
                ledger,
            )),
            orders: Arc::new(StoreOrdersService::new(orders)),
            products: Arc::new(StoreProductsService::new(products)),
            users,
            messages,
        }
    }

    /// Resolves the auth context for the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns an error when nobody is signed in or the user record cannot
    /// be read.
    pub async fn current_auth(&self) -> Result<AuthContext, AuthError> {
        AuthContext::resolve(self.identity.as_ref(), self.users.as_ref()).await
    }
}
