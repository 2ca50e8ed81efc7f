//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::AuthContext,
    domain::orders::{
        errors::OrdersServiceError,
        models::{OrderSnapshot, StoredOrder},
    },
    store::OrderStore,
};

#[derive(Clone)]
pub struct StoreOrdersService {
    orders: Arc<dyn OrderStore>,
}

impl StoreOrdersService {
    #[must_use]
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl OrdersService for StoreOrdersService {
    async fn list_orders(&self, auth: &AuthContext) -> Result<Vec<StoredOrder>, OrdersServiceError> {
        let mut orders = self.orders.get_orders_by_user(&auth.user_id).await?;

        orders.sort_by(|a, b| b.order.created_at.cmp(&a.order.created_at));

        Ok(orders)
    }

    async fn get_order(
        &self,
        auth: &AuthContext,
        order_id: &str,
    ) -> Result<OrderSnapshot, OrdersServiceError> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        if order.user_id != auth.user_id {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The caller's order history, newest first.
    async fn list_orders(&self, auth: &AuthContext)
    -> Result<Vec<StoredOrder>, OrdersServiceError>;

    /// Retrieves one of the caller's orders. Orders are readable only by the
    /// account that placed them.
    async fn get_order(
        &self,
        auth: &AuthContext,
        order_id: &str,
    ) -> Result<OrderSnapshot, OrdersServiceError>;
}
