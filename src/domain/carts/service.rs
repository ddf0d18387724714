//! Carts service.

use std::{fmt, sync::Arc};

use mockall::automock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    clock::Clock,
    config::StorefrontConfig,
    domain::{
        carts::{
            checkout::OrderConfirmation,
            errors::{CartsServiceError, CheckoutError},
            models::CartLine,
        },
        customers::CustomerInfo,
        requests::models::RequestedItem,
    },
    notifier::{Change, Notifier, Topic},
    pricing::compute_totals,
    products::{Product, ProductId},
    store::{CART_KEY, Documents, REQUESTS_KEY},
};

/// Cart manager over the shared documents.
#[derive(Clone)]
pub struct LocalCartsService {
    documents: Documents,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    config: StorefrontConfig,
}

impl LocalCartsService {
    /// Create a cart manager writing through `documents` and announcing on `notifier`.
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

    fn save_and_publish(&self, cart: &[CartLine]) -> Result<(), CartsServiceError> {
        self.documents.save(CART_KEY, cart)?;
        self.notifier.publish(&Change::local([Topic::Cart]));

        Ok(())
    }
}

impl fmt::Debug for LocalCartsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCartsService")
            .field("documents", &self.documents)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CartsService for LocalCartsService {
    fn get_cart(&self) -> Vec<CartLine> {
        self.documents.load(CART_KEY)
    }

    fn add_to_cart(&self, product: &Product) -> Result<CartLine, CartsServiceError> {
        let mut cart = self.get_cart();

        let line = if let Some(line) = cart.iter_mut().find(|line| line.id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            line.clone()
        } else {
            let line = CartLine::new(product.clone());
            cart.push(line.clone());
            line
        };

        self.save_and_publish(&cart)?;

        debug!(product_id = %product.id, quantity = line.quantity, "added to cart");

        Ok(line)
    }

    fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<bool, CartsServiceError> {
        if quantity < 1 {
            debug!(product_id = %id, quantity, "ignoring quantity below 1");
            return Ok(false);
        }

        let Ok(quantity) = u32::try_from(quantity) else {
            debug!(product_id = %id, quantity, "ignoring quantity above u32::MAX");
            return Ok(false);
        };
        let mut cart = self.get_cart();

        for line in cart.iter_mut().filter(|line| line.id() == id) {
            line.quantity = quantity;
        }

        self.save_and_publish(&cart)?;

        Ok(true)
    }

    fn decrement_quantity(&self, id: ProductId) -> Result<(), CartsServiceError> {
        let mut cart = self.get_cart();

        if let Some(line) = cart.iter_mut().find(|line| line.id() == id) {
            line.quantity = line.quantity.saturating_sub(1);
        }

        cart.retain(|line| line.quantity >= 1);

        self.save_and_publish(&cart)
    }

    fn remove_item(&self, id: ProductId) -> Result<(), CartsServiceError> {
        let mut cart = self.get_cart();
        cart.retain(|line| line.id() != id);

        self.documents.save(CART_KEY, &cart)?;

        if !self.config.coupled_removals {
            self.notifier.publish(&Change::local([Topic::Cart]));
            return Ok(());
        }

        let mut requests: Vec<RequestedItem> = self.documents.load(REQUESTS_KEY);
        requests.retain(|item| item.id() != id);

        if let Err(error) = self.documents.save(REQUESTS_KEY, &requests) {
            // The cart is already written; its subscribers still need to hear about it.
            self.notifier.publish(&Change::local([Topic::Cart]));
            return Err(error.into());
        }

        self.notifier.publish(&Change::local([Topic::Cart, Topic::Requests]));

        debug!(product_id = %id, "removed from cart and requests");

        Ok(())
    }

    fn checkout(&self, customer: &CustomerInfo) -> Result<OrderConfirmation, CheckoutError> {
        let placed_on = self.clock.today();
        let pickup_date = customer.validate(placed_on, self.config.pickup_lead_days)?;

        let lines = self.get_cart();

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.documents.save::<CartLine>(CART_KEY, &[])?;
        self.notifier.publish(&Change::local([Topic::Cart]));

        let confirmation = OrderConfirmation {
            reference: Uuid::now_v7(),
            customer: customer.clone(),
            totals: compute_totals(&lines),
            lines,
            placed_on,
            pickup_date,
        };

        info!(
            reference = %confirmation.reference,
            units = confirmation.units(),
            total = %confirmation.totals.total,
            %pickup_date,
            "order placed"
        );

        Ok(confirmation)
    }
}

/// Cart operations offered to the views.
#[automock]
pub trait CartsService: Send + Sync {
    /// Current cart lines, empty when nothing is stored.
    fn get_cart(&self) -> Vec<CartLine>;

    /// Add one unit of `product`, merging with an existing line.
    ///
    /// Returns the line as saved.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Store`] when the cart cannot be saved.
    fn add_to_cart(&self, product: &Product) -> Result<CartLine, CartsServiceError>;

    /// Set the quantity of the line for `id`.
    ///
    /// Quantities below 1 or above `u32::MAX` are ignored: nothing is saved
    /// or published and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Store`] when the cart cannot be saved.
    fn update_quantity(&self, id: ProductId, quantity: i64) -> Result<bool, CartsServiceError>;

    /// Lower the quantity of the line for `id` by one, dropping the line at zero.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Store`] when the cart cannot be saved.
    fn decrement_quantity(&self, id: ProductId) -> Result<(), CartsServiceError>;

    /// Remove the line for `id`, and its request when removals are coupled.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::Store`] when a document cannot be saved.
    /// If the cart was saved but the requests were not, the cart change is
    /// still published before the error is returned.
    fn remove_item(&self, id: ProductId) -> Result<(), CartsServiceError>;

    /// Validate `customer`, empty the cart and confirm the order.
    ///
    /// Requested items are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Form`] for an invalid form,
    /// [`CheckoutError::EmptyCart`] when there is nothing to order and
    /// [`CheckoutError::Store`] when the emptied cart cannot be saved.
    fn checkout(&self, customer: &CustomerInfo) -> Result<OrderConfirmation, CheckoutError>;
}
