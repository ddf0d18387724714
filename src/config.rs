//! Storefront configuration
//!
//! Gear request policies differ between pro-shops, so they are settings.
//! Every setting can come from a flag or an environment variable; library
//! users start from [`StorefrontConfig::default`].

use clap::{Args, ValueEnum};

use crate::domain::requests::models::RequestStatus;

/// What to do when a product that already has a request is requested again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DuplicateRequestPolicy {
    /// Keep the existing request and ignore the new one.
    #[default]
    Ignore,

    /// Record every request, one entry each.
    Allow,
}

/// Behaviour of the cart and request managers.
#[derive(Clone, Debug, PartialEq, Eq, Args)]
pub struct StorefrontConfig {
    /// Days between a gear request and its estimated arrival
    #[arg(long, env = "GREENWAY_REQUEST_LEAD_DAYS", default_value_t = 14)]
    pub request_lead_days: u16,

    /// Handling of repeated requests for the same product
    #[arg(
        long,
        env = "GREENWAY_DUPLICATE_REQUESTS",
        value_enum,
        default_value_t = DuplicateRequestPolicy::Ignore
    )]
    pub duplicate_requests: DuplicateRequestPolicy,

    /// Status a new gear request starts in
    #[arg(
        long,
        env = "GREENWAY_INITIAL_STATUS",
        value_enum,
        default_value_t = RequestStatus::Pending
    )]
    pub initial_status: RequestStatus,

    /// Remove a product's request with its cart line, and its cart line with its request
    #[arg(long, env = "GREENWAY_COUPLED_REMOVALS")]
    pub coupled_removals: bool,

    /// Minimum days between today and a pickup date
    #[arg(long, env = "GREENWAY_PICKUP_LEAD_DAYS", default_value_t = 3)]
    pub pickup_lead_days: u16,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            request_lead_days: 14,
            duplicate_requests: DuplicateRequestPolicy::Ignore,
            initial_status: RequestStatus::Pending,
            coupled_removals: false,
            pickup_lead_days: 3,
        }
    }
}
