//! REST client for the hosted document database.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

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

/// Connection settings for the hosted document database.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Base URL of the database, e.g. `"https://shop.example-db.app"`.
    pub base_url: String,

    /// Database credential appended to every request, when required.
    pub auth_token: Option<String>,

    /// Per-request timeout; expiry surfaces as [`StoreError::Timeout`].
    pub timeout: Duration,
}

/// HTTP client for a hosted JSON document database.
///
/// Documents live at `<base>/<collection>/<key>.json`. Reads of absent
/// documents yield a JSON `null` body rather than an error status; partial
/// updates go through `PATCH` with only the changed fields, so untouched
/// fields on the document survive.
#[derive(Debug, Clone)]
pub struct RestStore {
    config: RestStoreConfig,
    http: Client,
}

impl RestStore {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: RestStoreConfig) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}.json", self.config.base_url.trim_end_matches('/'))
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        self.config
            .auth_token
            .iter()
            .map(|token| ("auth", token.clone()))
            .collect()
    }

    async fn ok(response: Response) -> Result<Response, StoreError> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(StoreError::UnexpectedResponse(format!(
                "status {status}: {text}"
            )));
        }

        Ok(response)
    }

    async fn get_document<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let response = self
            .http
            .get(self.url(path))
            .query(&self.auth_query())
            .send()
            .await?;

        let body = Self::ok(response).await?.text().await?;
        let document = serde_json::from_str(&body)?;

        Ok(document)
    }

    async fn put_document<T: Serialize + Sync>(
        &self,
        path: &str,
        document: &T,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .put(self.url(path))
            .query(&self.auth_query())
            .json(document)
            .send()
            .await?;

        Self::ok(response).await?;

        debug!(path, "document written");

        Ok(())
    }

    async fn patch_document(
        &self,
        path: &str,
        fields: &serde_json::Value,
    ) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.url(path))
            .query(&self.auth_query())
            .json(fields)
            .send()
            .await?;

        Self::ok(response).await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for RestStore {
    async fn get_user_record(&self, uid: &str) -> Result<Option<UserRecord>, StoreError> {
        self.get_document(&format!("users/{uid}")).await
    }

    async fn put_user_record(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.put_document(&format!("users/{}", record.uid), record)
            .await
    }

    async fn set_user_cart(&self, uid: &str, cart: &[CartLine]) -> Result<(), StoreError> {
        self.patch_document(&format!("users/{uid}"), &json!({ "cart": cart }))
            .await
    }

    async fn set_user_shipping_info<'a>(
        &self,
        uid: &str,
        info: Option<&'a ShippingAddress>,
    ) -> Result<(), StoreError> {
        // A null value deletes the field on the hosted backend.
        self.patch_document(&format!("users/{uid}"), &json!({ "shippingInfo": info }))
            .await
    }
}

#[async_trait]
impl OrderStore for RestStore {
    async fn create_order(&self, order_id: &str, order: &OrderSnapshot) -> Result<(), StoreError> {
        self.put_document(&format!("orders/{order_id}"), order)
            .await
    }

    async fn get_orders_by_user(&self, uid: &str) -> Result<Vec<StoredOrder>, StoreError> {
        let equal_to = format!("\"{uid}\"");

        let response = self
            .http
            .get(self.url("orders"))
            .query(&[("orderBy", "\"userId\""), ("equalTo", equal_to.as_str())])
            .query(&self.auth_query())
            .send()
            .await?;

        let body = Self::ok(response).await?.text().await?;
        let orders: Option<HashMap<String, OrderSnapshot>> = serde_json::from_str(&body)?;

        Ok(orders
            .unwrap_or_default()
            .into_iter()
            .map(|(order_id, order)| StoredOrder { order_id, order })
            .collect())
    }

    async fn get_order(&self, order_id: &str) -> Result<Option<OrderSnapshot>, StoreError> {
        self.get_document(&format!("orders/{order_id}")).await
    }
}

#[async_trait]
impl ProductStore for RestStore {
    async fn list_products(&self) -> Result<Vec<StoredProduct>, StoreError> {
        let products: Option<HashMap<String, Product>> = self.get_document("products").await?;

        let mut listed: Vec<StoredProduct> = products
            .unwrap_or_default()
            .into_iter()
            .map(|(product_id, product)| StoredProduct {
                product_id,
                product,
            })
            .collect();

        listed.sort_by(|a, b| a.product_id.cmp(&b.product_id));

        Ok(listed)
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>, StoreError> {
        self.get_document(&format!("products/{product_id}")).await
    }

    async fn put_product(&self, product_id: &str, product: &Product) -> Result<(), StoreError> {
        self.put_document(&format!("products/{product_id}"), product)
            .await
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(self.url(&format!("products/{product_id}")))
            .query(&self.auth_query())
            .send()
            .await?;

        Self::ok(response).await?;

        Ok(())
    }
}

#[async_trait]
impl MessageStore for RestStore {
    async fn add_message(&self, message: &WelcomeMessage) -> Result<(), StoreError> {
        // POST appends under a store-generated key.
        let response = self
            .http
            .post(self.url("messages"))
            .query(&self.auth_query())
            .json(message)
            .send()
            .await?;

        Self::ok(response).await?;

        Ok(())
    }
}
