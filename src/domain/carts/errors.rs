//! Carts service errors.

use thiserror::Error;

use crate::{domain::customers::FormError, store::StoreError};

/// Errors raised by cart mutations.
#[derive(Debug, Error)]
pub enum CartsServiceError {
    /// The cart document could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Reasons a checkout is refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// The checkout form is incomplete or invalid.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The emptied cart could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),
}
