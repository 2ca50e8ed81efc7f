//! Carts service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The document store rejected or failed the write; the mutation is to
    /// be treated as not having happened.
    #[error("storage error")]
    Store(#[from] StoreError),
}
