//! Checkout

pub mod errors;
pub mod flow;
pub mod ledger;
pub mod models;
pub mod service;

pub use errors::CheckoutError;
pub use flow::{CheckoutFlow, CheckoutStage};
pub use ledger::{CouponLedger, MemoryCouponLedger};
pub use service::*;
