//! Change Notifier
//!
//! Signals "the cart or the requests changed, re-read the store". A change
//! carries the topics it touched and where it came from, never the documents
//! themselves.

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use smallvec::{SmallVec, smallvec};

use crate::store::{CART_KEY, REQUESTS_KEY};

/// Document a change touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// The cart document.
    Cart,

    /// The requested-items document.
    Requests,
}

impl Topic {
    /// Topic stored under a storage key, if the key is one of ours.
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            CART_KEY => Some(Self::Cart),
            REQUESTS_KEY => Some(Self::Requests),
            _ => None,
        }
    }
}

/// Where a change was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Through this storefront.
    ThisContext,

    /// By another context sharing the same storage.
    OtherContext,
}

/// A published change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    topics: SmallVec<[Topic; 2]>,
    origin: Origin,
}

impl Change {
    /// A change made through this storefront.
    pub fn local(topics: impl IntoIterator<Item = Topic>) -> Self {
        Self {
            topics: topics.into_iter().collect(),
            origin: Origin::ThisContext,
        }
    }

    /// A change written by another context.
    pub fn external(topic: Topic) -> Self {
        Self {
            topics: smallvec![topic],
            origin: Origin::OtherContext,
        }
    }

    /// Topics touched by this change.
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Whether this change touched `topic`.
    pub fn touches(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// Where the change was made.
    pub fn origin(&self) -> Origin {
        self.origin
    }
}

type Handler = Arc<dyn Fn(&Change) + Send + Sync>;

struct Registration {
    id: u64,
    topic: Option<Topic>,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// Publish/subscribe hub owned by one storefront.
#[derive(Clone, Default)]
pub struct Notifier {
    registry: Arc<Mutex<Registry>>,
}

impl Notifier {
    /// Create a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every change touching `topic`.
    pub fn subscribe(
        &self,
        topic: Topic,
        handler: impl Fn(&Change) + Send + Sync + 'static,
    ) -> Subscription {
        self.register(Some(topic), Arc::new(handler))
    }

    /// Call `handler` once for every change.
    pub fn subscribe_all(&self, handler: impl Fn(&Change) + Send + Sync + 'static) -> Subscription {
        self.register(None, Arc::new(handler))
    }

    /// Deliver `change` to every matching subscriber.
    ///
    /// Handlers run after the registry lock is released, so a handler may
    /// subscribe, unsubscribe or publish.
    pub fn publish(&self, change: &Change) {
        let handlers: Vec<Handler> = self
            .lock()
            .registrations
            .iter()
            .filter(|registration| registration.topic.is_none_or(|topic| change.touches(topic)))
            .map(|registration| Arc::clone(&registration.handler))
            .collect();

        for handler in handlers {
            handler(change);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.lock().registrations.len()
    }

    pub(crate) fn downgrade(&self) -> WeakNotifier {
        WeakNotifier(Arc::downgrade(&self.registry))
    }

    fn register(&self, topic: Option<Topic>, handler: Handler) -> Subscription {
        let mut registry = self.lock();

        let id = registry.next_id;
        registry.next_id += 1;
        registry.registrations.push(Registration { id, topic, handler });

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Non-owning handle on a [`Notifier`], held by storage listeners.
#[derive(Clone)]
pub(crate) struct WeakNotifier(Weak<Mutex<Registry>>);

impl WeakNotifier {
    pub(crate) fn upgrade(&self) -> Option<Notifier> {
        self.0.upgrade().map(|registry| Notifier { registry })
    }
}

/// Handle returned by a subscription.
#[must_use = "the handler stays registered until `unsubscribe` is called"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Remove the handler. Later changes no longer reach it.
    pub fn unsubscribe(self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .registrations
            .retain(|registration| registration.id != self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counter(notifier: &Notifier, topic: Option<Topic>) -> (Arc<AtomicUsize>, Subscription) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let handler = move |_change: &Change| {
            seen.fetch_add(1, Ordering::SeqCst);
        };

        let subscription = match topic {
            Some(topic) => notifier.subscribe(topic, handler),
            None => notifier.subscribe_all(handler),
        };

        (count, subscription)
    }

    #[test]
    fn topic_for_key_maps_document_keys() {
        assert_eq!(Topic::for_key(CART_KEY), Some(Topic::Cart));
        assert_eq!(Topic::for_key(REQUESTS_KEY), Some(Topic::Requests));
        assert_eq!(Topic::for_key("theme"), None);
    }

    #[test]
    fn subscribe_all_sees_every_change_once() {
        let notifier = Notifier::new();
        let (count, _subscription) = counter(&notifier, None);

        notifier.publish(&Change::local([Topic::Cart, Topic::Requests]));
        notifier.publish(&Change::external(Topic::Requests));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn topic_subscription_filters_changes() {
        let notifier = Notifier::new();
        let (cart, _cart_subscription) = counter(&notifier, Some(Topic::Cart));
        let (requests, _requests_subscription) = counter(&notifier, Some(Topic::Requests));

        notifier.publish(&Change::local([Topic::Cart]));

        assert_eq!(cart.load(Ordering::SeqCst), 1);
        assert_eq!(requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let notifier = Notifier::new();
        let (count, subscription) = counter(&notifier, None);

        notifier.publish(&Change::local([Topic::Cart]));
        subscription.unsubscribe();
        notifier.publish(&Change::local([Topic::Cart]));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn handler_may_subscribe_while_publishing() {
        let notifier = Notifier::new();
        let inner = notifier.clone();

        let _subscription = notifier.subscribe_all(move |_change| {
            let _nested = inner.subscribe_all(|_change| {});
        });

        notifier.publish(&Change::local([Topic::Cart]));

        assert_eq!(notifier.subscriber_count(), 2);
    }

    #[test]
    fn external_change_reports_origin() {
        let change = Change::external(Topic::Cart);

        assert_eq!(change.origin(), Origin::OtherContext);
        assert_eq!(change.topics(), &[Topic::Cart]);
        assert!(!change.touches(Topic::Requests));
    }
}
