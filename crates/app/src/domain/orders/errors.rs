//! Orders service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// No order exists under that id.
    #[error("order not found")]
    NotFound,

    /// The order belongs to a different account.
    #[error("order belongs to another account")]
    Forbidden,

    /// Underlying storage error.
    #[error("storage error")]
    Store(#[from] StoreError),
}
