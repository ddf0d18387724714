//! Storefront
//!
//! The view-facing facade: one store, one notifier and the two managers
//! built over them. Views call the mutations here and re-read the cart or the
//! requests from their change handlers.
//!
//! Every mutation is a read-modify-write of a whole document with nothing
//! held across the read and the write. Two contexts acting on the same stale
//! state overwrite each other; the last write wins.

use std::{fmt, ops::ControlFlow, sync::Arc};

use tracing::debug;

use crate::{
    clock::Clock,
    config::StorefrontConfig,
    domain::{
        carts::{
            CartsService, CartsServiceError, CheckoutError, LocalCartsService,
            checkout::OrderConfirmation, models::CartLine,
        },
        customers::CustomerInfo,
        requests::{
            LocalRequestsService, RequestsService, RequestsServiceError,
            models::RequestedItem,
        },
    },
    notifier::{Change, Notifier, Subscription, Topic},
    pricing::{Totals, compute_totals},
    products::{Product, ProductId},
    store::{Documents, KeyValueStore, StorageEvent},
};

/// Cart and request state of one storefront context.
#[derive(Clone)]
pub struct Storefront {
    /// Cart manager.
    pub carts: Arc<dyn CartsService>,

    /// Request manager.
    pub requests: Arc<dyn RequestsService>,

    notifier: Notifier,
}

impl Storefront {
    /// Build a storefront over `store`.
    ///
    /// Writes made to `store` by other contexts are republished on this
    /// storefront's notifier as changes from another context.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        config: StorefrontConfig,
    ) -> Self {
        let notifier = Notifier::new();
        let weak = notifier.downgrade();

        store.watch(Arc::new(move |event: &StorageEvent| {
            let Some(notifier) = weak.upgrade() else {
                return ControlFlow::Break(());
            };

            if let Some(topic) = Topic::for_key(&event.key) {
                debug!(
                    key = event.key.as_str(),
                    origin = %event.origin,
                    "document changed elsewhere"
                );
                notifier.publish(&Change::external(topic));
            }

            ControlFlow::Continue(())
        }));

        let documents = Documents::new(store);

        let carts = LocalCartsService::new(
            documents.clone(),
            notifier.clone(),
            Arc::clone(&clock),
            config.clone(),
        );
        let requests = LocalRequestsService::new(documents, notifier.clone(), clock, config);

        Self::with_services(Arc::new(carts), Arc::new(requests), notifier)
    }

    /// Assemble a storefront from existing managers sharing `notifier`.
    pub fn with_services(
        carts: Arc<dyn CartsService>,
        requests: Arc<dyn RequestsService>,
        notifier: Notifier,
    ) -> Self {
        Self {
            carts,
            requests,
            notifier,
        }
    }

    /// Current cart lines.
    pub fn get_cart(&self) -> Vec<CartLine> {
        self.carts.get_cart()
    }

    /// Current requested items.
    pub fn get_requests(&self) -> Vec<RequestedItem> {
        self.requests.get_requests()
    }

    /// Totals of the current cart.
    pub fn totals(&self) -> Totals {
        compute_totals(&self.get_cart())
    }

    /// Add one unit of `product` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError`] when the cart cannot be saved.
    pub fn add_to_cart(&self, product: &Product) -> Result<CartLine, CartsServiceError> {
        self.carts.add_to_cart(product)
    }

    /// Set a cart line's quantity. Quantities below 1 are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError`] when the cart cannot be saved.
    pub fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<bool, CartsServiceError> {
        self.carts.update_quantity(id, quantity)
    }

    /// Lower a cart line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError`] when the cart cannot be saved.
    pub fn decrement_quantity(&self, id: ProductId) -> Result<(), CartsServiceError> {
        self.carts.decrement_quantity(id)
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError`] when a document cannot be saved.
    pub fn remove_item(&self, id: ProductId) -> Result<(), CartsServiceError> {
        self.carts.remove_item(id)
    }

    /// Request `product` at the request markdown.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError`] when the request cannot be recorded.
    pub fn request_item(
        &self,
        product: &Product,
        customer: Option<CustomerInfo>,
    ) -> Result<Option<RequestedItem>, RequestsServiceError> {
        self.requests.request_item(product, customer)
    }

    /// Remove a requested item.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError`] when a document cannot be saved.
    pub fn remove_requested_item(&self, id: ProductId) -> Result<(), RequestsServiceError> {
        self.requests.remove_requested_item(id)
    }

    /// Drop every requested item.
    ///
    /// # Errors
    ///
    /// Returns [`RequestsServiceError`] when the requests cannot be saved.
    pub fn clear_all_requests(&self) -> Result<(), RequestsServiceError> {
        self.requests.clear_all_requests()
    }

    /// Check out the cart for `customer`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] when the form is invalid, the cart is empty or
    /// the emptied cart cannot be saved.
    pub fn checkout(&self, customer: &CustomerInfo) -> Result<OrderConfirmation, CheckoutError> {
        self.carts.checkout(customer)
    }

    /// Call `handler` once for every change to the cart or the requests,
    /// whichever context made it.
    pub fn subscribe_to_changes(
        &self,
        handler: impl Fn(&Change) + Send + Sync + 'static,
    ) -> Subscription {
        self.notifier.subscribe_all(handler)
    }

    /// The notifier changes are published on.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl fmt::Debug for Storefront {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}
