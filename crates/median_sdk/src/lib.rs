//! Typed Median JavaScript bridge for Rust web front-ends.
//!
//! [`Median`] is the page-level entry point: it answers whether the page runs inside a Median
//! shell, waits for the shell with bounded polling, exposes host event channels as listener
//! surfaces and hands out wrappers for the native features under [`plugins`].
//!
//! Enable the `host-stub` feature to build against a host that is never present.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod events;
mod median;
pub mod plugins;

pub use median::{Median, WEB_PLATFORM};
pub use median_bridge::{
    BridgeConfig, BridgeError, BridgeResult, ListenerChannel, PollerState, ReadinessHandle,
    RegistryId, TypedReply,
};
pub use plugins::{
    app_review::AppReview, auth::Auth, device::DeviceInfo, health_bridge::HealthBridge,
    onesignal::OneSignal, permissions::Permissions, CallbackData,
};
