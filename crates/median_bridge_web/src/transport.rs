//! Envelope delivery through the detected host transport.

use median_bridge::{BridgeError, BridgeResult, CommandEnvelope, HostBridge, HostDetector};

use crate::detect::detect_host_transport;

#[derive(Debug, Clone, Copy, Default)]
/// Browser [`HostBridge`] posting `{ medianCommand, data }` messages to the native shell.
pub struct WebHostBridge;

impl HostDetector for WebHostBridge {
    fn is_host_available(&self) -> bool {
        detect_host_transport().is_some()
    }
}

impl HostBridge for WebHostBridge {
    fn post_envelope(&self, envelope: &CommandEnvelope) -> BridgeResult<()> {
        let transport = detect_host_transport().ok_or(BridgeError::HostUnavailable)?;
        log::trace!("posting `{}` via {}", envelope.channel, transport.name());
        crate::bridge::post_to_host(transport, &envelope.to_wire()).map_err(BridgeError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use median_bridge::Channel;
    use pretty_assertions::assert_eq;

    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn web_host_is_absent_off_wasm() {
        let host = WebHostBridge;
        let envelope = CommandEnvelope::new(Channel::new("median://appReview/prompt").expect("channel"));

        assert!(!host.is_host_available());
        assert_eq!(host.post_envelope(&envelope), Err(BridgeError::HostUnavailable));
    }
}
