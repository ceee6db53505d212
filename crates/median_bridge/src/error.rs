//! Bridge error taxonomy.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors surfaced by bridge dispatch and configuration.
///
/// Conditions the boundary treats as routine (stale inbound ids, removing an unknown listener,
/// fire-and-forget dispatch without a host) are not errors and never show up here.
pub enum BridgeError {
    /// The command channel was empty or whitespace.
    #[error("command channel must not be empty")]
    EmptyChannel,
    /// Wrapped-mode parameters were not a JSON object.
    #[error("command parameters must be a JSON object, got {0}")]
    ParamsNotObject(&'static str),
    /// Parameters could not be serialized into a plain JSON value.
    #[error("command parameters could not be serialized: {0}")]
    Serialization(String),
    /// A host payload did not match the expected reply shape.
    #[error("host reply could not be decoded: {0}")]
    Decode(String),
    /// No host bridge is reachable from the current execution context.
    #[error("no host bridge is available")]
    HostUnavailable,
    /// The host transport rejected or failed to accept the message.
    #[error("host transport rejected the message: {0}")]
    Transport(String),
    /// The pending reply's registry entry was removed before the host answered.
    #[error("reply `{0}` was abandoned before the host answered")]
    Abandoned(String),
    /// Bridge configuration failed validation.
    #[error("invalid bridge configuration: {0}")]
    Config(String),
}

/// Convenience result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Returns the JSON type name of `value` for diagnostics.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
