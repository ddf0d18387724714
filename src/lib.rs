//! Greenway
//!
//! Cart and gear-request state for the Greenway golf pro-shop storefront.
//!
//! The state lives in two JSON documents held by an injectable key-value
//! store. The [`storefront::Storefront`] facade composes a cart manager and a
//! request manager over that store and announces every change on a
//! [`notifier::Notifier`], including changes written by other contexts that
//! share the same storage.

pub mod clock;
pub mod config;
pub mod domain;
pub mod fixtures;
pub mod notifier;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod store;
pub mod storefront;
