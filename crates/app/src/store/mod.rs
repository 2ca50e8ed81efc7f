//! Document store abstraction.
//!
//! Storefront state lives in a hosted document database; these traits are the
//! seam. Every operation is one request against one document — the store has
//! no multi-document transactions, and concurrent writers to the same
//! document are last-write-wins.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use hemline::cart::CartLine;

use crate::domain::{
    checkout::models::ShippingAddress,
    messages::WelcomeMessage,
    orders::models::{OrderSnapshot, StoredOrder},
    products::models::{Product, StoredProduct},
};

mod memory;
mod rest;

pub use memory::MemoryStore;
pub use rest::{RestStore, RestStoreConfig};

/// Errors surfaced by the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document not found")]
    NotFound,

    /// The request did not complete within the configured timeout.
    #[error("store request timed out")]
    Timeout,

    /// Transport-level failure talking to the store.
    #[error("store request failed")]
    Http(#[source] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("unexpected store response: {0}")]
    UnexpectedResponse(String),

    /// A document failed to decode into its expected shape.
    #[error("malformed document")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}

/// The per-account document in the users collection.
///
/// Documents written by earlier clients may be missing fields, so everything
/// except the uid defaults on the way in rather than failing the whole read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Account id issued by the identity provider.
    pub uid: String,

    /// Sign-in email, when the creating client recorded it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// The account's cart lines.
    #[serde(default)]
    pub cart: Vec<CartLine>,

    /// Saved shipping address for checkout reuse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_info: Option<ShippingAddress>,

    /// Whether the account may use the admin surface.
    #[serde(default)]
    pub admin: bool,
}

impl UserRecord {
    /// A fresh record for an account with no document yet.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            cart: Vec::new(),
            shipping_info: None,
            admin: false,
        }
    }
}

/// Users collection: one document per account, keyed by uid.
#[automock]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetches an account's record, or `None` when it has no document yet.
    async fn get_user_record(&self, uid: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Creates or replaces an account's record wholesale.
    async fn put_user_record(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Overwrites the cart field on an existing record.
    async fn set_user_cart(&self, uid: &str, cart: &[CartLine]) -> Result<(), StoreError>;

    /// Overwrites the saved shipping address, or clears it with `None`.
    async fn set_user_shipping_info<'a>(
        &self,
        uid: &str,
        info: Option<&'a ShippingAddress>,
    ) -> Result<(), StoreError>;
}

/// Orders collection: immutable snapshots keyed by order id.
#[automock]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a new order snapshot under the given id.
    async fn create_order(&self, order_id: &str, order: &OrderSnapshot) -> Result<(), StoreError>;

    /// All orders placed by the given account, in no particular order.
    async fn get_orders_by_user(&self, uid: &str) -> Result<Vec<StoredOrder>, StoreError>;

    /// Fetches one order snapshot, or `None` when the id is unknown.
    async fn get_order(&self, order_id: &str) -> Result<Option<OrderSnapshot>, StoreError>;
}

/// Products collection: the catalog, keyed by product id.
#[automock]
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// The whole catalog.
    async fn list_products(&self) -> Result<Vec<StoredProduct>, StoreError>;

    /// Fetches one catalog entry, or `None` when the id is unknown.
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError>;

    /// Creates or replaces a catalog entry.
    async fn put_product(&self, product_id: &str, product: &Product) -> Result<(), StoreError>;

    /// Deletes a catalog entry; deleting an absent entry is a no-op.
    async fn delete_product(&self, product_id: &str) -> Result<(), StoreError>;
}

/// Messages collection: append-only greetings.
#[automock]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message document under a store-generated id.
    async fn add_message(&self, message: &WelcomeMessage) -> Result<(), StoreError>;
}
