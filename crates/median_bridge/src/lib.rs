//! Host-agnostic core of the Median JavaScript bridge.
//!
//! Web content talks to a native Median shell by posting `{ medianCommand, data }` envelopes and
//! receiving replies or events through uniquely named global callbacks. This crate owns that
//! protocol: callback naming and registry, command dispatch, listener/subscription bookkeeping,
//! and bounded readiness polling. Concrete browser transports live in `median_bridge_web`.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), matching the page event loop the bridge
//! runs on.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod context;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod host;
pub mod listener;
pub mod naming;
pub mod readiness;
pub mod registry;
pub mod subscription;

pub use config::{
    BridgeConfig, ReadinessConfig, DEFAULT_EVENT_FIELD, DEFAULT_REPLY_FIELD, DEFAULT_REPLY_PREFIX,
    DEFAULT_SUBSCRIBE_CHANNEL, DEFAULT_UNSUBSCRIBE_CHANNEL,
};
pub use context::BridgeContext;
pub use dispatch::{CommandDispatcher, PendingReply, TypedReply};
pub use envelope::{Channel, CommandEnvelope, COMMAND_KEY, DATA_KEY};
pub use error::{BridgeError, BridgeResult};
pub use host::{CallbackScope, HostBridge, HostDetector, MemoryHostBridge, NoopHostBridge};
pub use listener::ListenerChannel;
pub use naming::{NameGenerator, RegistryId};
pub use readiness::{
    start_readiness_poll, Continuation, ManualScheduler, PollerState, ReadinessHandle,
    ReadinessPoller, TickControl, TickOutcome, TickScheduler,
};
pub use registry::{
    typed_handler, CallbackRegistry, ChannelObserver, EntryKind, Handler, InboundRoute,
    InvokeOutcome, OneShotHandler, PersistentHandler, RemovedEntry, RouteTarget,
    WeakCallbackRegistry,
};
pub use subscription::{SubscriptionManager, SubscriptionSignal};
