//! Products service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    /// No catalog entry under that id.
    #[error("product not found")]
    NotFound,

    /// The caller does not carry the admin flag.
    #[error("admin access required")]
    Forbidden,

    /// Review text was blank.
    #[error("review text is required")]
    EmptyReview,

    /// Review rating outside 1 to 5.
    #[error("rating must be between 1 and 5")]
    InvalidRating,

    /// Underlying storage error.
    #[error("storage error")]
    Store(#[from] StoreError),
}
