//! Requests service errors.

use thiserror::Error;

use crate::store::StoreError;

/// Errors raised by request mutations.
#[derive(Debug, Error)]
pub enum RequestsServiceError {
    /// The requests document could not be saved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The estimated arrival date cannot be represented.
    #[error("estimated arrival is out of range")]
    DateOutOfRange(#[from] jiff::Error),
}
