//! Feature wrappers translating typed calls into bridge commands.
//!
//! Every wrapper borrows the page's [`CommandDispatcher`]. Calls expecting an answer return a
//! [`TypedReply`], which settles with [`median_bridge::BridgeError::HostUnavailable`] outside a
//! Median shell; fire-and-forget calls return `Ok(())` there.

pub mod app_review;
pub mod auth;
pub mod device;
pub mod health_bridge;
pub mod onesignal;
pub mod permissions;

use median_bridge::{BridgeResult, CommandDispatcher, PendingReply, TypedReply};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic success/error answer most commands reply with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallbackData {
    /// Whether the host reports success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Host error message, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Command-specific members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CallbackData {
    /// Returns whether the host reported success without an error.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.success.unwrap_or(true)
    }
}

pub(crate) fn request<T, P>(
    dispatcher: &CommandDispatcher,
    channel: &str,
    params: Option<&P>,
) -> TypedReply<T>
where
    T: DeserializeOwned,
    P: Serialize + ?Sized,
{
    dispatcher
        .send_with_reply(channel, params)
        .unwrap_or_else(PendingReply::failed)
        .typed()
}

pub(crate) fn command<P: Serialize + ?Sized>(
    dispatcher: &CommandDispatcher,
    channel: &str,
    params: Option<&P>,
) -> BridgeResult<()> {
    dispatcher.send(channel, params, false)
}

pub(crate) const NO_PARAMS: Option<&Value> = None;

#[cfg(test)]
pub(crate) mod test_support {
    use std::rc::Rc;

    use median_bridge::{BridgeConfig, BridgeContext, CommandEnvelope, MemoryHostBridge};
    use serde_json::Value;

    pub fn host_and_context() -> (MemoryHostBridge, BridgeContext) {
        let host = MemoryHostBridge::available();
        let context = BridgeContext::init(
            Rc::new(host.clone()),
            Some(Rc::new(host.clone())),
            BridgeConfig::default(),
        )
        .expect("bridge context");
        (host, context)
    }

    pub fn answer(host: &MemoryHostBridge, payload: Value) -> CommandEnvelope {
        let envelope = host.last_sent().expect("command sent");
        assert!(host.reply(&envelope, "callback", payload), "reply delivered");
        envelope
    }
}
