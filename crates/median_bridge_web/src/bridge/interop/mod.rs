//! Shared transport interop for the browser host bridge.
//!
//! This module routes calls to target-specific implementations while preserving a uniform API
//! for the detector, transport, callback scope and scheduler adapters.

use std::time::Duration;

use median_bridge::{InboundRoute, TickControl};
use serde_json::Value;

use crate::detect::HostTransport;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub fn host_transport() -> Option<HostTransport> {
    imp::host_transport()
}

pub fn post_to_host(transport: HostTransport, message: &Value) -> Result<(), String> {
    imp::post_to_host(transport, message)
}

pub fn install_global(name: &str, route: InboundRoute) -> Result<(), String> {
    imp::install_global(name, route)
}

pub fn remove_global(name: &str) {
    imp::remove_global(name)
}

pub fn installed_globals() -> Vec<String> {
    imp::installed_globals()
}

pub fn set_interval(interval: Duration, tick: Box<dyn FnMut() -> TickControl>) -> Result<(), String> {
    imp::set_interval(interval, tick)
}
