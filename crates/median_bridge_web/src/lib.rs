//! Browser (`wasm32`) implementations of the [`median_bridge`] host contracts.
//!
//! The native shell injects `JSBridge` either as a WebKit message handler or as a page global.
//! This crate detects which one is present, posts envelopes to it, installs `window[<name>]`
//! functions for the shell to call back into, and drives readiness polling with `setInterval`.
//!
//! Non-wasm builds compile the same API over inert shims: no host is ever detected.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
mod bridge;
pub mod detect;
pub mod scheduler;
pub mod scope;
pub mod transport;

pub use adapters::{
    build_bridge_context, callback_scope, host_bridge, host_detector, host_strategy_name,
    selected_host_strategy, tick_scheduler, CallbackScopeAdapter, HostBridgeAdapter,
    HostDetectorAdapter, HostStrategy,
};
pub use detect::{detect_host_transport, HostTransport, WebHostDetector, BRIDGE_OBJECT};
pub use scheduler::IntervalScheduler;
pub use scope::WebCallbackScope;
pub use transport::WebHostBridge;
