//! In-process document store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hemline::cart::CartLine;

use crate::{
    domain::{
        checkout::models::ShippingAddress,
        messages::WelcomeMessage,
        orders::models::{OrderSnapshot, StoredOrder},
        products::models::{Product, StoredProduct},
    },
    store::{MessageStore, OrderStore, ProductStore, StoreError, UserRecord, UserStore},
};

/// In-process store backend for tests and local development.
///
/// Behaves like the hosted backend: whole-document reads, last-write-wins
/// writes, and `NotFound` when a field update addresses a document that does
/// not exist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserRecord>>,
    orders: RwLock<HashMap<String, OrderSnapshot>>,
    products: RwLock<HashMap<String, Product>>,
    messages: RwLock<Vec<WelcomeMessage>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message written so far, in write order.
    pub async fn messages(&self) -> Vec<WelcomeMessage> {
        self.messages.read().await.clone()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_record(&self, uid: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn put_user_record(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(record.uid.clone(), record.clone());

        Ok(())
    }

    async fn set_user_cart(&self, uid: &str, cart: &[CartLine]) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(uid).ok_or(StoreError::NotFound)?;

        record.cart = cart.to_vec();

        Ok(())
    }

    async fn set_user_shipping_info<'a>(
        &self,
        uid: &str,
        info: Option<&'a ShippingAddress>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let record = users.get_mut(uid).ok_or(StoreError::NotFound)?;

        record.shipping_info = info.cloned();

        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order_id: &str, order: &OrderSnapshot) -> Result<(), StoreError> {
        self.orders
            .write()
            .await
            .insert(order_id.to_string(), order.clone());

        Ok(())
    }

    async fn get_orders_by_user(&self, uid: &str) -> Result<Vec<StoredOrder>, StoreError> {
        let orders = self.orders.read().await;

        Ok(orders
            .iter()
            .filter(|(_, order)| order.user_id == uid)
            .map(|(order_id, order)| StoredOrder {
                order_id: order_id.clone(),
                order: order.clone(),
            })
            .collect())
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<StoredProduct>, StoreError> {
        let products = self.products.read().await;

        let mut listed: Vec<StoredProduct> = products
            .iter()
            .map(|(product_id, product)| StoredProduct {
                product_id: product_id.clone(),
                product: product.clone(),
            })
            .collect();

        // Map iteration order is unstable; present the catalog deterministically.
        listed.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        Ok(listed)
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(product_id).cloned())
    }

    async fn put_product(&self, product_id: &str, product: &Product) -> Result<(), StoreError> {
        self.products
            .write()
            .await
            .insert(product_id.to_string(), product.clone());

        Ok(())
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), StoreError> {
        self.products.write().await.remove(product_id);

        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn add_message(&self, message: &WelcomeMessage) -> Result<(), StoreError> {
        self.messages.write().await.push(message.clone());

        Ok(())
    }
}
