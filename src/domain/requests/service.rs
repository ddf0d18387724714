//! Requests service.

use std::{fmt, sync::Arc};

use jiff::Span;
use mockall::automock;
use tracing::{debug, info};

use crate::{
    clock::Clock,
    config::{DuplicateRequestPolicy, StorefrontConfig},
    domain::{
        carts::models::CartLine,
        customers::CustomerInfo,
        requests::{errors::RequestsServiceError, models::RequestedItem},
    },
    notifier::{Change, Notifier, Topic},
    pricing::{REQUEST_DISCOUNT_PERCENT, discounted_price},
    products::{Product, ProductId},
    store::{CART_KEY, Documents, REQUESTS_KEY},
};

/// Request manager over the shared documents.
#[derive(Clone)]
pub struct LocalRequestsService {
    documents: Documents,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    config: StorefrontConfig,
}

impl LocalRequestsService {
    /// Create a request manager writing through `documents` and announcing on `notifier`.
    #[must_use]
    pub fn new(
        documents: Documents,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
        config: StorefrontConfig,
    ) -> Self {
        Self {
            documents,
            notifier,
            clock,
            config,
        }
    }

    fn save_and_publish(&self, requests: &[RequestedItem]) -> Result<(), RequestsServiceError> {
        self.documents.save(REQUESTS_KEY, requests)?;
        self.notifier.publish(&Change::local([Topic::Requests]));

        Ok(())
    }
}

impl fmt::Debug for LocalRequestsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalRequestsService")
            .field("documents", &self.documents)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestsService for LocalRequestsService {
    fn get_requests(&self) -> Vec<RequestedItem> {
        self.documents.load(REQUESTS_KEY)
    }

    fn request_item(
        &self,
        product: &Product,
        customer: Option<CustomerInfo>,
    ) -> Result<Option<RequestedItem>, RequestsServiceError> {
        let mut requests = self.get_requests();

        if self.config.duplicate_requests == DuplicateRequestPolicy::Ignore
            && requests.iter().any(|item| item.id() == product.id)
        {
            debug!(product_id = %product.id, "ignoring repeated request");
            return Ok(None);
        }

        let today = self.clock.today();
        let estimated_arrival =
            today.checked_add(Span::new().days(i64::from(self.config.request_lead_days)))?;

        let item = RequestedItem {
            product: Product {
                price: discounted_price(product.price),
                ..product.clone()
            },
            original_price: Some(product.price),
            discount: Some(REQUEST_DISCOUNT_PERCENT),
            request_date: today,
            estimated_arrival,
            status: self.config.initial_status,
            customer_info: customer,
        };

        requests.push(item.clone());
        self.save_and_publish(&requests)?;

        info!(
            product_id = %product.id,
            price = %item.price(),
            %estimated_arrival,
            "gear requested"
        );

        Ok(Some(item))
    }

    fn remove_requested_item(&self, id: ProductId) -> Result<(), RequestsServiceError> {
        let mut requests = self.get_requests();
        requests.retain(|item| item.id() != id);

        self.documents.save(REQUESTS_KEY, &requests)?;

        if !self.config.coupled_removals {
            self.notifier.publish(&Change::local([Topic::Requests]));
            return Ok(());
        }

        let mut cart: Vec<CartLine> = self.documents.load(CART_KEY);
        cart.retain(|line| line.id() != id);

        if let Err(error) = self.documents.save(CART_KEY, &cart) {
            // The requests are already written; their subscribers still need to hear about it.
            self.notifier.publish(&Change::local([Topic::Requests]));
            return Err(error.into());
        }

        self.notifier.publish(&Change::local([Topic::Requests, Topic::Cart]));

        debug!(product_id = %id, "removed from requests and cart");

        Ok(())
    }

    fn clear_all_requests(&self) -> Result<(), RequestsServiceError> {
        self.save_and_publish(&[])
    }
}

/// Gear request operations offered to the views.
#[automock]
pub trait RequestsService: Send + Sync {
    /// Current requested items, empty when nothing is stored.
    fn get_requests(&self) -> Vec<RequestedItem>;

    /// Request `product` at the request markdown.
    ///
    /// Returns `None` when the request was ignored as a repeat.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError::DateOutOfRange`] when the arrival date
    /// cannot be computed and [`RequestsServiceError::Store`] when the
    /// requests cannot be saved.
    fn request_item(
        &self,
        product: &Product,
        customer: Option<CustomerInfo>,
    ) -> Result<Option<RequestedItem>, RequestsServiceError>;

    /// Remove the request for `id`, and its cart line when removals are coupled.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError::Store`] when a document cannot be saved.
    /// If the requests were saved but the cart was not, the requests change
    /// is still published before the error is returned.
    fn remove_requested_item(&self, id: ProductId) -> Result<(), RequestsServiceError>;

    /// Drop every request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError::Store`] when the requests cannot be saved.
    fn clear_all_requests(&self) -> Result<(), RequestsServiceError>;
}
