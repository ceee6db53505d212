//! Bridge wiring: one registry, dispatcher and subscription manager per page.

use std::rc::Rc;

use crate::{
    config::BridgeConfig,
    dispatch::CommandDispatcher,
    error::BridgeResult,
    host::{CallbackScope, HostBridge},
    listener::ListenerChannel,
    registry::CallbackRegistry,
    subscription::SubscriptionManager,
};

/// Shared bridge state handed to SDK wrappers.
///
/// Cloning is cheap and every clone shares the same registry, name counter and subscription
/// counts.
#[derive(Clone, Debug)]
pub struct BridgeContext {
    config: Rc<BridgeConfig>,
    registry: CallbackRegistry,
    dispatcher: CommandDispatcher,
    subscriptions: SubscriptionManager,
}

impl BridgeContext {
    /// Wires a context over `host`, exposing callbacks through `scope` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BridgeError::Config`] when `config` fails validation.
    pub fn init(
        host: Rc<dyn HostBridge>,
        scope: Option<Rc<dyn CallbackScope>>,
        config: BridgeConfig,
    ) -> BridgeResult<Self> {
        config.validate()?;
        let config = Rc::new(config);
        let registry = CallbackRegistry::new();
        if let Some(scope) = scope {
            registry.attach_scope(scope);
        }
        let dispatcher = CommandDispatcher::new(host, registry.clone(), Rc::clone(&config));
        let subscriptions = SubscriptionManager::new(dispatcher.clone());
        log::debug!(
            "median bridge initialized (reply prefix `{}`)",
            config.reply_prefix
        );
        Ok(Self {
            config,
            registry,
            dispatcher,
            subscriptions,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Returns the callback registry.
    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Returns the command dispatcher.
    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Returns the subscription manager.
    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    /// Returns the listener surface for the event channel `name`.
    pub fn listener(&self, name: &str) -> ListenerChannel {
        ListenerChannel::new(name, self.registry.clone(), self.subscriptions.clone())
    }
}
