//! Auth errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AuthError {
    /// A mutating action was attempted with nobody signed in.
    #[error("sign in required")]
    NotSignedIn,

    /// The user record could not be read while resolving the context.
    #[error("storage error")]
    Store(#[from] StoreError),
}
