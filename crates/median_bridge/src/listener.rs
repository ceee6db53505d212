//! Named event channels with add/remove listener semantics.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    naming::RegistryId,
    registry::{typed_handler, CallbackRegistry, Handler, PersistentHandler},
    subscription::SubscriptionManager,
};

/// Listener surface for one host event channel (for example `_median_device_shake`).
#[derive(Clone, Debug)]
pub struct ListenerChannel {
    name: Rc<str>,
    registry: CallbackRegistry,
    subscriptions: SubscriptionManager,
}

impl ListenerChannel {
    /// Creates the surface for `name` over a shared registry and subscription manager.
    ///
    /// `subscriptions` must observe `registry`; it toggles the host subscription as listeners
    /// come and go.
    pub fn new(name: &str, registry: CallbackRegistry, subscriptions: SubscriptionManager) -> Self {
        Self {
            name: Rc::from(name),
            registry,
            subscriptions,
        }
    }

    /// Returns the event channel name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a listener and returns the id used to remove it.
    pub fn add_listener(&self, callback: impl Fn(&Value) + 'static) -> RegistryId {
        self.add_listener_handler(Some(Rc::new(callback)))
    }

    /// Adds a listener that receives payloads decoded as `T`.
    ///
    /// Payloads that do not decode are logged and skipped.
    pub fn add_typed_listener<T, F>(&self, callback: F) -> RegistryId
    where
        T: DeserializeOwned,
        F: Fn(T) + 'static,
    {
        self.add_listener(typed_handler(Rc::clone(&self.name), callback))
    }

    /// Adds an optional handler.
    ///
    /// `None` stands for a value that cannot be invoked: a fresh id is still returned, but
    /// nothing is registered and no subscription is sent.
    pub fn add_listener_handler(&self, callback: Option<PersistentHandler>) -> RegistryId {
        let Some(handler) = callback else {
            return self.registry.names().next_name(&self.name);
        };
        self.registry
            .register(&self.name, Handler::Persistent(handler))
    }

    /// Removes the listener named `id`.
    ///
    /// Returns `false` without touching any state for empty ids, unknown ids and ids belonging
    /// to another channel.
    pub fn remove_listener(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        self.registry.unregister_in(&self.name, id).is_some()
    }

    /// Returns the number of live listeners on this channel.
    pub fn listener_count(&self) -> usize {
        self.registry.persistent_count(&self.name)
    }

    /// Returns whether the host is currently subscribed to this channel.
    pub fn is_subscribed(&self) -> bool {
        self.subscriptions.is_subscribed(&self.name)
    }
}
