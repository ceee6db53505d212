use std::rc::Rc;

use median_bridge::{
    BridgeConfig, BridgeContext, BridgeResult, CallbackScope, CommandEnvelope, HostBridge,
    HostDetector, InboundRoute, NoopHostBridge,
};

use crate::{IntervalScheduler, WebCallbackScope, WebHostBridge, WebHostDetector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `median_bridge_web` adapters.
pub enum HostStrategy {
    /// Page globals and `postMessage` transports.
    Browser,
    /// No-op host used for builds that must never reach a native shell.
    Stub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "host-stub")]
    {
        HostStrategy::Stub
    }

    #[cfg(not(feature = "host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::Stub => "stub",
    }
}

/// Adapter enum that erases the concrete host behind [`HostBridge`].
#[derive(Debug, Clone, Copy)]
pub enum HostBridgeAdapter {
    /// Browser transport.
    Browser(WebHostBridge),
    /// Always-absent host.
    Stub(NoopHostBridge),
}

impl HostDetector for HostBridgeAdapter {
    fn is_host_available(&self) -> bool {
        match self {
            Self::Browser(host) => host.is_host_available(),
            Self::Stub(host) => host.is_host_available(),
        }
    }
}

impl HostBridge for HostBridgeAdapter {
    fn post_envelope(&self, envelope: &CommandEnvelope) -> BridgeResult<()> {
        match self {
            Self::Browser(host) => host.post_envelope(envelope),
            Self::Stub(host) => host.post_envelope(envelope),
        }
    }
}

/// Adapter enum that erases the concrete callback scope behind [`CallbackScope`].
#[derive(Debug, Clone, Copy)]
pub enum CallbackScopeAdapter {
    /// `window[<name>]` globals.
    Browser(WebCallbackScope),
    /// Scope that exposes nothing.
    Stub(NoopHostBridge),
}

impl CallbackScope for CallbackScopeAdapter {
    fn expose(&self, name: &str, route: InboundRoute) {
        match self {
            Self::Browser(scope) => scope.expose(name, route),
            Self::Stub(scope) => scope.expose(name, route),
        }
    }

    fn retract(&self, name: &str) {
        match self {
            Self::Browser(scope) => scope.retract(name),
            Self::Stub(scope) => scope.retract(name),
        }
    }
}

/// Adapter enum that erases the concrete detector behind [`HostDetector`].
#[derive(Debug, Clone, Copy)]
pub enum HostDetectorAdapter {
    /// Page global inspection.
    Browser(WebHostDetector),
    /// Never detects a host.
    Stub(NoopHostBridge),
}

impl HostDetector for HostDetectorAdapter {
    fn is_host_available(&self) -> bool {
        match self {
            Self::Browser(detector) => detector.is_host_available(),
            Self::Stub(detector) => detector.is_host_available(),
        }
    }
}

/// Builds the host bridge for the selected strategy.
pub fn host_bridge() -> HostBridgeAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => HostBridgeAdapter::Browser(WebHostBridge),
        HostStrategy::Stub => HostBridgeAdapter::Stub(NoopHostBridge),
    }
}

/// Builds the callback scope for the selected strategy.
pub fn callback_scope() -> CallbackScopeAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => CallbackScopeAdapter::Browser(WebCallbackScope),
        HostStrategy::Stub => CallbackScopeAdapter::Stub(NoopHostBridge),
    }
}

/// Builds the host detector for the selected strategy.
pub fn host_detector() -> HostDetectorAdapter {
    match selected_host_strategy() {
        HostStrategy::Browser => HostDetectorAdapter::Browser(WebHostDetector),
        HostStrategy::Stub => HostDetectorAdapter::Stub(NoopHostBridge),
    }
}

/// Builds the tick scheduler used for readiness polling.
pub fn tick_scheduler() -> IntervalScheduler {
    IntervalScheduler
}

/// Wires a [`BridgeContext`] over the selected host strategy.
///
/// # Errors
///
/// Returns [`median_bridge::BridgeError::Config`] when `config` fails validation.
pub fn build_bridge_context(config: BridgeConfig) -> BridgeResult<BridgeContext> {
    log::debug!("building median bridge with `{}` host", host_strategy_name());
    BridgeContext::init(
        Rc::new(host_bridge()),
        Some(Rc::new(callback_scope())),
        config,
    )
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use median_bridge::BridgeError;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;

    #[test]
    fn strategy_name_matches_selection() {
        let expected = if cfg!(feature = "host-stub") {
            "stub"
        } else {
            "browser"
        };
        assert_eq!(host_strategy_name(), expected);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn context_degrades_without_a_host() {
        let ctx = build_bridge_context(BridgeConfig::default()).expect("context");
        assert!(!host_detector().is_host_available());

        let reply = ctx
            .dispatcher()
            .send_with_reply("median://auth/status", None::<&Value>)
            .expect("dispatch");
        assert!(reply.is_settled());
        assert_eq!(block_on(reply), Err(BridgeError::HostUnavailable));
        assert_eq!(
            ctx.dispatcher()
                .send_value("median://appReview/prompt", None, false),
            Ok(())
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BridgeConfig {
            reply_prefix: " ".to_string(),
            ..BridgeConfig::default()
        };
        assert!(matches!(
            build_bridge_context(config),
            Err(BridgeError::Config(_))
        ));
    }
}
