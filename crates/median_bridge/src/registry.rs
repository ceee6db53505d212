//! Process-wide callback registry.
//!
//! The registry is the only owner of callback entries. Hosts reach entries through
//! [`InboundRoute`]s handed to an attached [`CallbackScope`]; routes hold weak handles so an
//! installed global never keeps a dropped registry alive.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    host::CallbackScope,
    naming::{NameGenerator, RegistryId},
};

/// Handler invoked at most once, then dropped.
pub type OneShotHandler = Box<dyn FnOnce(Value)>;
/// Handler invoked on every delivery until its entry is removed.
pub type PersistentHandler = Rc<dyn Fn(&Value)>;

/// Wraps `handler` so it receives payloads decoded as `T`.
///
/// Payloads that do not decode are logged under `label` and skipped.
pub fn typed_handler<T, F>(label: impl Into<Rc<str>>, handler: F) -> impl Fn(&Value) + 'static
where
    T: DeserializeOwned,
    F: Fn(T) + 'static,
{
    let label: Rc<str> = label.into();
    move |payload: &Value| match T::deserialize(payload) {
        Ok(value) => handler(value),
        Err(err) => log::warn!("skipping malformed `{label}` payload: {err}"),
    }
}

/// Notified when a channel gains its first or loses its last grouped persistent entry.
pub trait ChannelObserver {
    /// `channel_name` now has at least one listener.
    fn channel_opened(&self, channel_name: &str);
    /// `channel_name` has no listeners left.
    fn channel_closed(&self, channel_name: &str);
}

/// Tagged callback handler stored in a registry entry.
pub enum Handler {
    /// Fires at most once; the entry is removed before the handler runs.
    OneShot(OneShotHandler),
    /// Fires on every delivery.
    Persistent(PersistentHandler),
}

impl Handler {
    /// Returns the entry kind implied by this handler.
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::OneShot(_) => EntryKind::OneShot,
            Self::Persistent(_) => EntryKind::Persistent,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Delivery discipline of a registry entry.
pub enum EntryKind {
    /// Exactly-once reply.
    OneShot,
    /// Recurring event listener.
    Persistent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of an inbound invocation.
pub enum InvokeOutcome {
    /// A live entry handled the payload.
    Invoked(EntryKind),
    /// No live entry had that id; the payload was dropped.
    Unknown,
}

impl InvokeOutcome {
    /// Returns whether a handler ran.
    pub fn is_invoked(self) -> bool {
        matches!(self, Self::Invoked(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Snapshot of an entry removed by [`CallbackRegistry::unregister`].
pub struct RemovedEntry {
    /// Removed id.
    pub id: RegistryId,
    /// Channel the entry was grouped under.
    pub channel_name: String,
    /// Kind of the removed entry.
    pub kind: EntryKind,
}

struct Entry {
    channel_name: String,
    handler: Handler,
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<RegistryId, Entry>,
    // Persistent ids per channel, in registration order.
    channel_members: HashMap<String, Vec<RegistryId>>,
}

impl RegistryState {
    /// Removes `id` and reports whether its channel lost its last persistent member.
    fn remove(&mut self, id: &str) -> Option<(RegistryId, Entry, bool)> {
        let (id, entry) = self.entries.remove_entry(id)?;
        let mut channel_emptied = false;
        if let Some(members) = self.channel_members.get_mut(&entry.channel_name) {
            members.retain(|member| member != &id);
            if members.is_empty() {
                self.channel_members.remove(&entry.channel_name);
                channel_emptied = true;
            }
        }
        Some((id, entry, channel_emptied))
    }
}

struct RegistryInner {
    names: NameGenerator,
    state: RefCell<RegistryState>,
    scope: RefCell<Option<Rc<dyn CallbackScope>>>,
    observer: RefCell<Option<Weak<dyn ChannelObserver>>>,
}

/// Shared handle to the callback registry.
#[derive(Clone)]
pub struct CallbackRegistry {
    inner: Rc<RegistryInner>,
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("entries", &self.len())
            .field("issued_names", &self.inner.names.issued())
            .finish()
    }
}

impl CallbackRegistry {
    /// Creates an empty registry with its own name generator.
    pub fn new() -> Self {
        Self::with_names(NameGenerator::new())
    }

    /// Creates an empty registry drawing ids from `names`.
    pub fn with_names(names: NameGenerator) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                names,
                state: RefCell::new(RegistryState::default()),
                scope: RefCell::new(None),
                observer: RefCell::new(None),
            }),
        }
    }

    /// Returns the generator ids are drawn from.
    pub fn names(&self) -> &NameGenerator {
        &self.inner.names
    }

    /// Attaches the scope that makes entries reachable by the host.
    ///
    /// Entries registered before attachment are exposed immediately.
    pub fn attach_scope(&self, scope: Rc<dyn CallbackScope>) {
        let (ids, channels) = {
            let state = self.inner.state.borrow();
            let ids: Vec<RegistryId> = state.entries.keys().cloned().collect();
            let channels: Vec<String> = state.channel_members.keys().cloned().collect();
            (ids, channels)
        };
        *self.inner.scope.borrow_mut() = Some(Rc::clone(&scope));
        for id in ids {
            scope.expose(id.as_str(), self.entry_route(id.clone()));
        }
        for channel_name in channels {
            scope.expose(&channel_name, self.channel_route(channel_name.clone()));
        }
    }

    /// Attaches the observer told about channel membership changes.
    ///
    /// Channels that already have listeners are reported as opened right away. The registry
    /// holds the observer weakly.
    pub fn attach_observer(&self, observer: Weak<dyn ChannelObserver>) {
        let channels: Vec<String> = self
            .inner
            .state
            .borrow()
            .channel_members
            .keys()
            .cloned()
            .collect();
        *self.inner.observer.borrow_mut() = Some(observer);
        if let Some(observer) = self.observer() {
            for channel_name in channels {
                observer.channel_opened(&channel_name);
            }
        }
    }

    /// Registers `handler` under `channel_name` and returns its fresh id.
    ///
    /// Persistent handlers join the channel's fan-out group.
    pub fn register(&self, channel_name: &str, handler: Handler) -> RegistryId {
        let grouped = matches!(handler, Handler::Persistent(_));
        self.insert(channel_name, handler, grouped)
    }

    /// Registers a persistent handler reachable only through its own id.
    ///
    /// The entry never joins a fan-out group, so `base` is not exposed as a channel and
    /// channel observers are not told about it.
    pub fn register_standalone(
        &self,
        base: &str,
        handler: impl Fn(&Value) + 'static,
    ) -> RegistryId {
        self.insert(base, Handler::Persistent(Rc::new(handler)), false)
    }

    fn insert(&self, channel_name: &str, handler: Handler, grouped: bool) -> RegistryId {
        let id = self.inner.names.next_name(channel_name);
        let first_in_channel = {
            let mut state = self.inner.state.borrow_mut();
            state.entries.insert(
                id.clone(),
                Entry {
                    channel_name: channel_name.to_string(),
                    handler,
                },
            );
            if grouped {
                let members = state
                    .channel_members
                    .entry(channel_name.to_string())
                    .or_default();
                members.push(id.clone());
                members.len() == 1
            } else {
                false
            }
        };

        if let Some(scope) = self.scope() {
            scope.expose(id.as_str(), self.entry_route(id.clone()));
            if first_in_channel {
                scope.expose(channel_name, self.channel_route(channel_name.to_string()));
            }
        }
        if first_in_channel {
            if let Some(observer) = self.observer() {
                observer.channel_opened(channel_name);
            }
        }
        id
    }

    /// Registers a handler that fires at most once.
    pub fn register_one_shot(
        &self,
        channel_name: &str,
        handler: impl FnOnce(Value) + 'static,
    ) -> RegistryId {
        self.register(channel_name, Handler::OneShot(Box::new(handler)))
    }

    /// Registers a handler that fires on every delivery until removed.
    pub fn register_persistent(
        &self,
        channel_name: &str,
        handler: impl Fn(&Value) + 'static,
    ) -> RegistryId {
        self.register(channel_name, Handler::Persistent(Rc::new(handler)))
    }

    /// Delivers `payload` to the entry named `id`.
    ///
    /// One-shot entries are removed before their handler runs, so duplicate or re-entrant
    /// deliveries observe [`InvokeOutcome::Unknown`].
    pub fn invoke(&self, id: &str, payload: Value) -> InvokeOutcome {
        enum Delivery {
            Once(OneShotHandler, bool, String),
            Repeat(PersistentHandler),
        }

        let delivery = {
            let mut state = self.inner.state.borrow_mut();
            let kind = state.entries.get(id).map(|entry| entry.handler.kind());
            match kind {
                None => None,
                Some(EntryKind::Persistent) => {
                    state
                        .entries
                        .get(id)
                        .and_then(|entry| match &entry.handler {
                            Handler::Persistent(handler) => {
                                Some(Delivery::Repeat(Rc::clone(handler)))
                            }
                            Handler::OneShot(_) => None,
                        })
                }
                Some(EntryKind::OneShot) => {
                    state
                        .remove(id)
                        .and_then(|(_, entry, emptied)| match entry.handler {
                            Handler::OneShot(handler) => {
                                Some(Delivery::Once(handler, emptied, entry.channel_name))
                            }
                            Handler::Persistent(_) => None,
                        })
                }
            }
        };

        match delivery {
            None => {
                log::trace!("dropping host payload for unknown callback `{id}`");
                InvokeOutcome::Unknown
            }
            Some(Delivery::Once(handler, emptied, channel_name)) => {
                self.retract(id, emptied.then_some(channel_name.as_str()));
                handler(payload);
                InvokeOutcome::Invoked(EntryKind::OneShot)
            }
            Some(Delivery::Repeat(handler)) => {
                handler(&payload);
                InvokeOutcome::Invoked(EntryKind::Persistent)
            }
        }
    }

    /// Delivers `payload` to every persistent entry of `channel_name`, in registration order.
    ///
    /// Members are looked up again right before each call, so an entry removed by an earlier
    /// handler of the same delivery does not run. Returns the number of handlers that ran.
    pub fn invoke_channel(&self, channel_name: &str, payload: Value) -> usize {
        let members = self.channel_ids(channel_name);
        let mut delivered = 0;
        for id in &members {
            let handler = match self.inner.state.borrow().entries.get(id) {
                Some(Entry {
                    handler: Handler::Persistent(handler),
                    ..
                }) => Rc::clone(handler),
                _ => continue,
            };
            handler(&payload);
            delivered += 1;
        }
        if delivered == 0 {
            log::trace!("dropping host event for channel `{channel_name}` without listeners");
        }
        delivered
    }

    /// Removes the entry named `id`; unknown ids are a no-op.
    pub fn unregister(&self, id: &str) -> Option<RemovedEntry> {
        let removed = self.inner.state.borrow_mut().remove(id);
        let (id, entry, emptied) = removed?;
        self.retract(id.as_str(), emptied.then_some(entry.channel_name.as_str()));
        Some(RemovedEntry {
            kind: entry.handler.kind(),
            channel_name: entry.channel_name,
            id,
        })
    }

    /// Removes `id` only when it belongs to `channel_name`.
    pub fn unregister_in(&self, channel_name: &str, id: &str) -> Option<RemovedEntry> {
        let removed = {
            let mut state = self.inner.state.borrow_mut();
            match state.entries.get(id) {
                Some(entry) if entry.channel_name == channel_name => state.remove(id),
                _ => None,
            }
        };
        let (id, entry, emptied) = removed?;
        self.retract(id.as_str(), emptied.then_some(entry.channel_name.as_str()));
        Some(RemovedEntry {
            kind: entry.handler.kind(),
            channel_name: entry.channel_name,
            id,
        })
    }

    /// Returns whether `id` names a live entry.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.state.borrow().entries.contains_key(id)
    }

    /// Returns the kind of the live entry named `id`.
    pub fn kind_of(&self, id: &str) -> Option<EntryKind> {
        self.inner
            .state
            .borrow()
            .entries
            .get(id)
            .map(|entry| entry.handler.kind())
    }

    /// Returns the channel of the live entry named `id`.
    pub fn channel_of(&self, id: &str) -> Option<String> {
        self.inner
            .state
            .borrow()
            .entries
            .get(id)
            .map(|entry| entry.channel_name.clone())
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().entries.len()
    }

    /// Returns whether the registry has no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of live persistent entries grouped under `channel_name`.
    pub fn persistent_count(&self, channel_name: &str) -> usize {
        self.inner
            .state
            .borrow()
            .channel_members
            .get(channel_name)
            .map_or(0, Vec::len)
    }

    /// Returns the live persistent ids of `channel_name` in registration order.
    pub fn channel_ids(&self, channel_name: &str) -> Vec<RegistryId> {
        self.inner
            .state
            .borrow()
            .channel_members
            .get(channel_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns a weak handle that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakCallbackRegistry {
        WeakCallbackRegistry {
            inner: Rc::downgrade(&self.inner),
        }
    }

    fn scope(&self) -> Option<Rc<dyn CallbackScope>> {
        self.inner.scope.borrow().clone()
    }

    fn observer(&self) -> Option<Rc<dyn ChannelObserver>> {
        self.inner.observer.borrow().as_ref().and_then(Weak::upgrade)
    }

    fn retract(&self, id: &str, emptied_channel: Option<&str>) {
        if let Some(scope) = self.scope() {
            scope.retract(id);
            if let Some(channel_name) = emptied_channel {
                scope.retract(channel_name);
            }
        }
        if let (Some(channel_name), Some(observer)) = (emptied_channel, self.observer()) {
            observer.channel_closed(channel_name);
        }
    }

    fn entry_route(&self, id: RegistryId) -> InboundRoute {
        InboundRoute {
            registry: self.downgrade(),
            target: RouteTarget::Entry(id),
        }
    }

    fn channel_route(&self, channel_name: String) -> InboundRoute {
        InboundRoute {
            registry: self.downgrade(),
            target: RouteTarget::Channel(channel_name),
        }
    }
}

/// Weak counterpart of [`CallbackRegistry`].
#[derive(Clone)]
pub struct WeakCallbackRegistry {
    inner: Weak<RegistryInner>,
}

impl WeakCallbackRegistry {
    /// Upgrades to a strong handle while the registry is alive.
    pub fn upgrade(&self) -> Option<CallbackRegistry> {
        self.inner
            .upgrade()
            .map(|inner| CallbackRegistry { inner })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What an inbound route delivers to.
pub enum RouteTarget {
    /// A single registry entry.
    Entry(RegistryId),
    /// Every persistent entry of a channel.
    Channel(String),
}

/// Host-reachable delivery path installed by a [`CallbackScope`].
#[derive(Clone)]
pub struct InboundRoute {
    registry: WeakCallbackRegistry,
    target: RouteTarget,
}

impl std::fmt::Debug for InboundRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundRoute")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl InboundRoute {
    /// Returns the route target.
    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    /// Delivers a host payload; returns whether any handler ran.
    pub fn deliver(&self, payload: Value) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        match &self.target {
            RouteTarget::Entry(id) => registry.invoke(id.as_str(), payload).is_invoked(),
            RouteTarget::Channel(channel_name) => registry.invoke_channel(channel_name, payload) > 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::host::MemoryHostBridge;

    #[test]
    fn one_shot_fires_at_most_once() {
        let registry = CallbackRegistry::new();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let id = registry.register_one_shot("_median_temp_", move |payload| {
            sink.borrow_mut().push(payload)
        });

        assert_eq!(
            registry.invoke(id.as_str(), json!({ "ok": true })),
            InvokeOutcome::Invoked(EntryKind::OneShot)
        );
        assert_eq!(registry.invoke(id.as_str(), json!({ "ok": false })), InvokeOutcome::Unknown);
        assert_eq!(*calls.borrow(), vec![json!({ "ok": true })]);
        assert!(!registry.contains(id.as_str()));
        assert!(registry.is_empty());
    }

    #[test]
    fn persistent_entries_fire_until_removed() {
        let registry = CallbackRegistry::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let id = registry.register_persistent("_median_app_resumed", move |_| {
            seen.set(seen.get() + 1)
        });

        for _ in 0..3 {
            assert!(registry.invoke(id.as_str(), json!({})).is_invoked());
        }
        assert_eq!(count.get(), 3);

        let removed = registry.unregister(id.as_str()).expect("live entry");
        assert_eq!(removed.kind, EntryKind::Persistent);
        assert_eq!(removed.channel_name, "_median_app_resumed");
        assert_eq!(registry.invoke(id.as_str(), json!({})), InvokeOutcome::Unknown);
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn unregister_is_idempotent_and_tolerates_unknown_ids() {
        let registry = CallbackRegistry::new();
        let id = registry.register_one_shot("_median_temp_", |_| {});
        assert!(registry.unregister(id.as_str()).is_some());
        assert_eq!(registry.unregister(id.as_str()), None);
        assert_eq!(registry.unregister("never-issued"), None);
        assert_eq!(registry.unregister(""), None);
        assert_eq!(registry.invoke("", json!(null)), InvokeOutcome::Unknown);
    }

    #[test]
    fn handlers_may_reenter_the_registry() {
        let registry = CallbackRegistry::new();
        let inner = registry.clone();
        let slot: Rc<RefCell<Option<RegistryId>>> = Rc::new(RefCell::new(None));
        let own_id = Rc::clone(&slot);
        let id = registry.register_persistent("_median_device_shake", move |_| {
            if let Some(id) = own_id.borrow().as_ref() {
                inner.unregister(id.as_str());
            }
            inner.register_one_shot("_median_temp_", |_| {});
        });
        *slot.borrow_mut() = Some(id.clone());

        assert!(registry.invoke(id.as_str(), json!({})).is_invoked());
        assert!(!registry.contains(id.as_str()));
        assert_eq!(registry.len(), 1);

        let nested = registry.clone();
        let reply = registry.register_one_shot("_median_temp_", move |payload| {
            assert_eq!(nested.invoke("anything", payload), InvokeOutcome::Unknown);
        });
        assert!(registry.invoke(reply.as_str(), json!(1)).is_invoked());
    }

    #[test]
    fn channel_fan_out_follows_registration_order() {
        let registry = CallbackRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for label in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            registry.register_persistent("_median_share_to_app", move |_| {
                order.borrow_mut().push(label)
            });
        }
        registry.register_one_shot("_median_share_to_app", |_| panic!("one-shots never fan out"));

        assert_eq!(registry.persistent_count("_median_share_to_app"), 3);
        assert_eq!(registry.invoke_channel("_median_share_to_app", json!({})), 3);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
        assert_eq!(registry.invoke_channel("_median_unknown", json!({})), 0);
    }

    #[test]
    fn listener_removed_mid_fan_out_does_not_fire() {
        let host = MemoryHostBridge::available();
        let registry = CallbackRegistry::new();
        registry.attach_scope(Rc::new(host.clone()));
        let later: Rc<RefCell<Option<RegistryId>>> = Rc::new(RefCell::new(None));
        let fired = Rc::new(Cell::new(0));

        let remover = registry.clone();
        let target = Rc::clone(&later);
        registry.register_persistent("_median_device_shake", move |_| {
            if let Some(id) = target.borrow().as_ref() {
                remover.unregister(id.as_str());
            }
        });
        let counter = Rc::clone(&fired);
        let second = registry.register_persistent("_median_device_shake", move |_| {
            counter.set(counter.get() + 1)
        });
        *later.borrow_mut() = Some(second.clone());

        assert!(host.call_global("_median_device_shake", json!({})));
        assert_eq!(fired.get(), 0);
        assert!(!registry.contains(second.as_str()));
        assert_eq!(registry.invoke_channel("_median_device_shake", json!({})), 1);
    }

    #[test]
    fn standalone_entries_are_reachable_only_by_id() {
        let host = MemoryHostBridge::available();
        let registry = CallbackRegistry::new();
        registry.attach_scope(Rc::new(host.clone()));
        let hits = Rc::new(Cell::new(0));
        let first_hits = Rc::clone(&hits);
        let second_hits = Rc::clone(&hits);
        let first = registry.register_standalone("_median_temp_", move |_| {
            first_hits.set(first_hits.get() + 1)
        });
        let second = registry.register_standalone("_median_temp_", move |_| {
            second_hits.set(second_hits.get() + 1)
        });

        assert_eq!(
            host.exposed_names(),
            vec![first.as_str().to_string(), second.as_str().to_string()]
        );
        assert!(!host.call_global("_median_temp_", json!({})));
        assert_eq!(registry.persistent_count("_median_temp_"), 0);
        assert_eq!(registry.kind_of(first.as_str()), Some(EntryKind::Persistent));

        assert!(host.call_global(first.as_str(), json!({})));
        assert!(host.call_global(first.as_str(), json!({})));
        assert_eq!(hits.get(), 2);
        assert!(registry.unregister(second.as_str()).is_some());
        assert_eq!(host.exposed_names(), vec![first.as_str().to_string()]);
    }

    #[derive(Default)]
    struct RecordingObserver {
        changes: RefCell<Vec<String>>,
    }

    impl ChannelObserver for RecordingObserver {
        fn channel_opened(&self, channel_name: &str) {
            self.changes.borrow_mut().push(format!("+{channel_name}"));
        }

        fn channel_closed(&self, channel_name: &str) {
            self.changes.borrow_mut().push(format!("-{channel_name}"));
        }
    }

    #[test]
    fn observer_sees_first_and_last_channel_members() {
        let registry = CallbackRegistry::new();
        let early = registry.register_persistent("_median_app_resumed", |_| {});
        let observer = Rc::new(RecordingObserver::default());
        let weak = Rc::downgrade(&observer) as Weak<dyn ChannelObserver>;
        registry.attach_observer(weak);

        let shake = registry.register_persistent("_median_device_shake", |_| {});
        registry.register_persistent("_median_device_shake", |_| {});
        registry.register_one_shot("_median_temp_", |_| {});
        registry.register_standalone("_median_temp_", |_| {});
        registry.unregister(shake.as_str());
        registry.unregister(early.as_str());

        assert_eq!(
            *observer.changes.borrow(),
            vec![
                "+_median_app_resumed".to_string(),
                "+_median_device_shake".to_string(),
                "-_median_app_resumed".to_string(),
            ]
        );

        drop(observer);
        registry.register_persistent("_median_share_to_app", |_| {});
    }

    #[test]
    fn unregister_in_ignores_ids_of_other_channels() {
        let registry = CallbackRegistry::new();
        let id = registry.register_persistent("_median_app_resumed", |_| {});
        assert_eq!(registry.unregister_in("_median_device_shake", id.as_str()), None);
        assert!(registry.contains(id.as_str()));
        assert!(registry
            .unregister_in("_median_app_resumed", id.as_str())
            .is_some());
    }

    #[test]
    fn scope_tracks_entry_and_channel_reachability() {
        let host = MemoryHostBridge::available();
        let registry = CallbackRegistry::new();
        let early = registry.register_persistent("_median_app_resumed", |_| {});
        registry.attach_scope(Rc::new(host.clone()));
        assert!(host.is_exposed(early.as_str()));
        assert!(host.is_exposed("_median_app_resumed"));

        let reply = registry.register_one_shot("_median_temp_", |_| {});
        assert!(host.is_exposed(reply.as_str()));
        assert!(host.call_global(reply.as_str(), json!({})));
        assert!(!host.is_exposed(reply.as_str()));
        assert!(!host.call_global(reply.as_str(), json!({})));

        registry.unregister(early.as_str());
        assert!(!host.is_exposed(early.as_str()));
        assert!(!host.is_exposed("_median_app_resumed"));
    }

    #[test]
    fn routes_do_not_outlive_the_registry() {
        let host = MemoryHostBridge::available();
        let registry = CallbackRegistry::new();
        registry.attach_scope(Rc::new(host.clone()));
        let id = registry.register_persistent("_median_app_resumed", |_| {});
        drop(registry);
        assert!(!host.call_global(id.as_str(), json!({})));
    }
}
