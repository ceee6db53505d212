//! Host-side event subscription bookkeeping.

use std::{
    cell::RefCell,
    collections::BTreeSet,
    rc::{Rc, Weak},
};

use serde_json::{Map, Value};

use crate::{dispatch::CommandDispatcher, registry::ChannelObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Host-facing subscription toggle emitted on a 0<->1 listener transition.
pub enum SubscriptionSignal {
    /// First listener of a channel was added.
    Subscribe,
    /// Last listener of a channel was removed.
    Unsubscribe,
}

/// Keeps the host's event subscriptions in step with the registry's listeners.
///
/// Listener counts are read from the dispatcher's registry, which reports every first and last
/// member of a channel to the manager. Removal through any path, including a direct
/// [`crate::CallbackRegistry::unregister`], therefore unsubscribes.
#[derive(Clone)]
pub struct SubscriptionManager {
    inner: Rc<SubscriptionInner>,
}

struct SubscriptionInner {
    subscribed: RefCell<BTreeSet<String>>,
    dispatcher: CommandDispatcher,
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("subscribed", &self.inner.subscribed.borrow())
            .finish_non_exhaustive()
    }
}

impl SubscriptionManager {
    /// Creates a manager that signals the host through `dispatcher` and observes its registry.
    pub fn new(dispatcher: CommandDispatcher) -> Self {
        let registry = dispatcher.registry().clone();
        let inner = Rc::new(SubscriptionInner {
            subscribed: RefCell::new(BTreeSet::new()),
            dispatcher,
        });
        registry.attach_observer(Rc::downgrade(&inner) as Weak<dyn ChannelObserver>);
        Self { inner }
    }

    /// Reconciles `channel_name` after a listener was added; subscribes on the 0->1 transition.
    pub fn note_added(&self, channel_name: &str) -> Option<SubscriptionSignal> {
        self.inner.note_added(channel_name)
    }

    /// Reconciles `channel_name` after a listener was removed; unsubscribes on the 1->0
    /// transition.
    ///
    /// Channels that still have listeners, or were never subscribed, are left alone.
    pub fn note_removed(&self, channel_name: &str) -> Option<SubscriptionSignal> {
        self.inner.note_removed(channel_name)
    }

    /// Returns the number of live listeners on `channel_name`.
    pub fn active_count(&self, channel_name: &str) -> usize {
        self.inner.active_count(channel_name)
    }

    /// Returns every channel the host is subscribed to, sorted.
    pub fn active_channels(&self) -> Vec<String> {
        self.inner.subscribed.borrow().iter().cloned().collect()
    }

    /// Returns whether the host is subscribed to `channel_name`.
    pub fn is_subscribed(&self, channel_name: &str) -> bool {
        self.inner.subscribed.borrow().contains(channel_name)
    }
}

impl SubscriptionInner {
    fn active_count(&self, channel_name: &str) -> usize {
        self.dispatcher.registry().persistent_count(channel_name)
    }

    fn note_added(&self, channel_name: &str) -> Option<SubscriptionSignal> {
        let opened = self.active_count(channel_name) > 0
            && self.subscribed.borrow_mut().insert(channel_name.to_string());
        opened.then(|| self.emit(channel_name, SubscriptionSignal::Subscribe))
    }

    fn note_removed(&self, channel_name: &str) -> Option<SubscriptionSignal> {
        let closed =
            self.active_count(channel_name) == 0 && self.subscribed.borrow_mut().remove(channel_name);
        closed.then(|| self.emit(channel_name, SubscriptionSignal::Unsubscribe))
    }

    fn emit(&self, channel_name: &str, signal: SubscriptionSignal) -> SubscriptionSignal {
        let config = self.dispatcher.config();
        let command = match signal {
            SubscriptionSignal::Subscribe => config.subscribe_channel.clone(),
            SubscriptionSignal::Unsubscribe => config.unsubscribe_channel.clone(),
        };
        let mut params = Map::new();
        params.insert(
            config.event_field.clone(),
            Value::String(channel_name.to_string()),
        );
        if let Err(err) = self
            .dispatcher
            .send_value(&command, Some(Value::Object(params)), false)
        {
            log::warn!("{signal:?} for `{channel_name}` was not delivered: {err}");
        }
        signal
    }
}

impl ChannelObserver for SubscriptionInner {
    fn channel_opened(&self, channel_name: &str) {
        self.note_added(channel_name);
    }

    fn channel_closed(&self, channel_name: &str) {
        self.note_removed(channel_name);
    }
}
