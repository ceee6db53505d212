//! Host bridge contracts and in-process adapters.
//!
//! Concrete browser transports live in `median_bridge_web`. The adapters here cover hosts that
//! are absent ([`NoopHostBridge`]) and an in-memory host used to drive the bridge
//! deterministically ([`MemoryHostBridge`]).

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    rc::Rc,
};

use serde_json::Value;

use crate::{
    envelope::CommandEnvelope,
    error::{BridgeError, BridgeResult},
    registry::InboundRoute,
};

/// Reports whether a host bridge is reachable from the current execution context.
pub trait HostDetector {
    /// Returns `true` once the host-injected bridge capability is present.
    ///
    /// Implementations must be safe to call before the bridge exists and must not panic.
    fn is_host_available(&self) -> bool;
}

/// Outbound half of the host bridge.
pub trait HostBridge: HostDetector {
    /// Hands an envelope to the host.
    ///
    /// Callers check [`HostDetector::is_host_available`] first; posting without a host returns
    /// [`BridgeError::HostUnavailable`].
    fn post_envelope(&self, envelope: &CommandEnvelope) -> BridgeResult<()>;
}

/// Global name space the host calls back into.
pub trait CallbackScope {
    /// Makes `name` callable by the host; calls are forwarded to `route`.
    fn expose(&self, name: &str, route: InboundRoute);

    /// Makes `name` unreachable again. Unknown names are ignored.
    fn retract(&self, name: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// Host adapter for contexts without a native host (pure web fallback).
pub struct NoopHostBridge;

impl HostDetector for NoopHostBridge {
    fn is_host_available(&self) -> bool {
        false
    }
}

impl HostBridge for NoopHostBridge {
    fn post_envelope(&self, _envelope: &CommandEnvelope) -> BridgeResult<()> {
        Err(BridgeError::HostUnavailable)
    }
}

impl CallbackScope for NoopHostBridge {
    fn expose(&self, _name: &str, _route: InboundRoute) {}

    fn retract(&self, _name: &str) {}
}

#[derive(Default)]
struct MemoryHostState {
    available: Cell<bool>,
    available_from_check: Cell<Option<u32>>,
    checks: Cell<u32>,
    reject_posts: RefCell<Option<String>>,
    sent: RefCell<Vec<CommandEnvelope>>,
    globals: RefCell<BTreeMap<String, InboundRoute>>,
}

/// In-memory host that records envelopes and exposes callbacks as named globals.
///
/// [`MemoryHostBridge::call_global`] plays the role of the native side calling
/// `window[name](payload)`.
#[derive(Clone, Default)]
pub struct MemoryHostBridge {
    inner: Rc<MemoryHostState>,
}

impl std::fmt::Debug for MemoryHostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHostBridge")
            .field("available", &self.inner.available.get())
            .field("checks", &self.inner.checks.get())
            .field("sent", &self.inner.sent.borrow().len())
            .field("globals", &self.exposed_names())
            .finish()
    }
}

impl MemoryHostBridge {
    /// Creates a host that is present from the start.
    pub fn available() -> Self {
        let host = Self::default();
        host.set_available(true);
        host
    }

    /// Creates a host that is absent until [`MemoryHostBridge::set_available`] is called.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Creates a host that appears on the `check`-th availability check (1-based).
    pub fn available_from_check(check: u32) -> Self {
        let host = Self::default();
        host.inner.available_from_check.set(Some(check));
        host
    }

    /// Toggles host presence.
    pub fn set_available(&self, available: bool) {
        self.inner.available.set(available);
        self.inner.available_from_check.set(None);
    }

    /// Makes every subsequent post fail with `message` (`None` restores delivery).
    pub fn reject_posts(&self, message: Option<&str>) {
        *self.inner.reject_posts.borrow_mut() = message.map(str::to_string);
    }

    /// Returns how many availability checks were made.
    pub fn check_count(&self) -> u32 {
        self.inner.checks.get()
    }

    /// Returns every envelope posted so far.
    pub fn sent(&self) -> Vec<CommandEnvelope> {
        self.inner.sent.borrow().clone()
    }

    /// Returns the channels of every envelope posted so far.
    pub fn sent_channels(&self) -> Vec<String> {
        self.inner
            .sent
            .borrow()
            .iter()
            .map(|envelope| envelope.channel.as_str().to_string())
            .collect()
    }

    /// Returns the most recent envelope.
    pub fn last_sent(&self) -> Option<CommandEnvelope> {
        self.inner.sent.borrow().last().cloned()
    }

    /// Drains the recorded envelopes.
    pub fn take_sent(&self) -> Vec<CommandEnvelope> {
        std::mem::take(&mut *self.inner.sent.borrow_mut())
    }

    /// Returns the currently callable global names, sorted.
    pub fn exposed_names(&self) -> Vec<String> {
        self.inner.globals.borrow().keys().cloned().collect()
    }

    /// Returns whether `name` is currently callable.
    pub fn is_exposed(&self, name: &str) -> bool {
        self.inner.globals.borrow().contains_key(name)
    }

    /// Calls the global `name` with `payload` the way the native side would.
    ///
    /// Returns `false` when no such global exists or no handler ran.
    pub fn call_global(&self, name: &str, payload: Value) -> bool {
        let route = self.inner.globals.borrow().get(name).cloned();
        route.is_some_and(|route| route.deliver(payload))
    }

    /// Answers `envelope` through the callback named in its `reply_field` parameter.
    pub fn reply(&self, envelope: &CommandEnvelope, reply_field: &str, payload: Value) -> bool {
        match envelope.param(reply_field).and_then(Value::as_str) {
            Some(name) => self.call_global(name, payload),
            None => false,
        }
    }
}

impl HostDetector for MemoryHostBridge {
    fn is_host_available(&self) -> bool {
        let check = self.inner.checks.get().saturating_add(1);
        self.inner.checks.set(check);
        match self.inner.available_from_check.get() {
            Some(first) => check >= first,
            None => self.inner.available.get(),
        }
    }
}

impl HostBridge for MemoryHostBridge {
    fn post_envelope(&self, envelope: &CommandEnvelope) -> BridgeResult<()> {
        if let Some(message) = self.inner.reject_posts.borrow().as_ref() {
            return Err(BridgeError::Transport(message.clone()));
        }
        self.inner.sent.borrow_mut().push(envelope.clone());
        Ok(())
    }
}

impl CallbackScope for MemoryHostBridge {
    fn expose(&self, name: &str, route: InboundRoute) {
        self.inner
            .globals
            .borrow_mut()
            .insert(name.to_string(), route);
    }

    fn retract(&self, name: &str) {
        self.inner.globals.borrow_mut().remove(name);
    }
}
