//! Host bridge detection from the page's global handles.

use median_bridge::HostDetector;

/// Name of the host-injected bridge object, both as a WebKit message handler and as a global.
pub const BRIDGE_OBJECT: &str = "JSBridge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How the native shell receives envelopes.
pub enum HostTransport {
    /// `window.webkit.messageHandlers.JSBridge` (iOS); receives structured messages.
    WebkitMessageHandler,
    /// `window.JSBridge` (Android); receives JSON text.
    InjectedInterface,
}

impl HostTransport {
    /// Returns a stable token naming the transport.
    pub const fn name(self) -> &'static str {
        match self {
            Self::WebkitMessageHandler => "webkit-message-handler",
            Self::InjectedInterface => "injected-interface",
        }
    }
}

/// Inspects the global handles, WebKit handler first.
///
/// Returns `None` outside a Median shell and on non-wasm targets.
pub fn detect_host_transport() -> Option<HostTransport> {
    crate::bridge::host_transport()
}

#[derive(Debug, Clone, Copy, Default)]
/// [`HostDetector`] over the page's global handles.
pub struct WebHostDetector;

impl HostDetector for WebHostDetector {
    fn is_host_available(&self) -> bool {
        detect_host_transport().is_some()
    }
}
