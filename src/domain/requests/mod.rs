//! Gear Requests

pub mod errors;
pub mod models;
pub mod service;

pub use errors::RequestsServiceError;
pub use service::*;
