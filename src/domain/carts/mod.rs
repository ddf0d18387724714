//! Carts

pub mod checkout;
pub mod errors;
pub mod models;
pub mod service;

pub use errors::{CartsServiceError, CheckoutError};
pub use service::*;
