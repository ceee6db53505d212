//! Command channels and the envelope handed to the host bridge.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_kind, BridgeError, BridgeResult};

/// Wire key carrying the command channel.
pub const COMMAND_KEY: &str = "medianCommand";
/// Wire key carrying the command parameters.
pub const DATA_KEY: &str = "data";

/// Hierarchical command identifier such as `median://auth/status`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Channel(String);

impl Channel {
    /// Validates and wraps a channel string.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::EmptyChannel`] for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> BridgeResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(BridgeError::EmptyChannel);
        }
        Ok(Self(raw))
    }

    /// Returns the channel as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URL-style scheme (`median` in `median://auth/status`), if any.
    pub fn scheme(&self) -> Option<&str> {
        self.0.split_once("://").map(|(scheme, _)| scheme)
    }

    /// Returns the path segments after the scheme, without any query string.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        let rest = self
            .0
            .split_once("://")
            .map_or(self.0.as_str(), |(_, rest)| rest);
        let path = rest.split_once('?').map_or(rest, |(path, _)| path);
        path.split('/').filter(|segment| !segment.is_empty())
    }

    /// Returns the first path segment (`auth` in `median://auth/status`).
    pub fn namespace(&self) -> Option<&str> {
        self.segments().next()
    }

    /// Returns the last path segment (`status` in `median://auth/status`).
    pub fn action(&self) -> Option<&str> {
        self.segments().last()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Channel {
    type Error = BridgeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Channel {
    type Error = BridgeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        value.0
    }
}

/// A single outbound command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEnvelope {
    /// Target command channel.
    pub channel: Channel,
    /// Parameter value, if any.
    pub params: Option<Value>,
    /// When set, `params` is passed through as a bare value of any shape.
    pub raw_params_mode: bool,
}

impl CommandEnvelope {
    /// Creates an envelope without parameters.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            params: None,
            raw_params_mode: false,
        }
    }

    /// Builds an envelope from already-serialized parameters.
    ///
    /// In wrapped mode the parameters must be an object; top-level `null` members are dropped and
    /// a `null` value counts as no parameters. Raw mode keeps the value exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ParamsNotObject`] for a non-object value in wrapped mode.
    pub fn from_value(
        channel: Channel,
        params: Option<Value>,
        raw_params_mode: bool,
    ) -> BridgeResult<Self> {
        let params = match params {
            None => None,
            Some(value) if raw_params_mode => Some(value),
            Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(Value::Object(strip_null_members(map))),
            Some(other) => return Err(BridgeError::ParamsNotObject(json_kind(&other))),
        };
        Ok(Self {
            channel,
            params,
            raw_params_mode,
        })
    }

    /// Serializes `params` and builds an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Serialization`] when `params` has no plain JSON form, plus the
    /// errors of [`CommandEnvelope::from_value`].
    pub fn with_params<P: Serialize + ?Sized>(
        channel: Channel,
        params: &P,
        raw_params_mode: bool,
    ) -> BridgeResult<Self> {
        let value = to_plain_value(params)?;
        Self::from_value(channel, Some(value), raw_params_mode)
    }

    /// Returns a top-level parameter when `params` is an object.
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref()?.as_object()?.get(key)
    }

    /// Returns the structured message posted to object-accepting transports.
    pub fn to_wire(&self) -> Value {
        let mut message = Map::new();
        message.insert(
            COMMAND_KEY.to_string(),
            Value::String(self.channel.as_str().to_string()),
        );
        if let Some(params) = &self.params {
            message.insert(DATA_KEY.to_string(), params.clone());
        }
        Value::Object(message)
    }

    /// Returns the JSON text posted to string-only transports.
    pub fn to_wire_string(&self) -> String {
        self.to_wire().to_string()
    }
}

/// Serializes any value into a plain JSON tree.
pub(crate) fn to_plain_value<P: Serialize + ?Sized>(params: &P) -> BridgeResult<Value> {
    serde_json::to_value(params).map_err(|err| BridgeError::Serialization(err.to_string()))
}

fn strip_null_members(mut map: Map<String, Value>) -> Map<String, Value> {
    map.retain(|_, value| !value.is_null());
    map
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn channel(raw: &str) -> Channel {
        Channel::new(raw).expect("valid channel")
    }

    #[test]
    fn channel_rejects_blank_input() {
        assert_eq!(Channel::new(""), Err(BridgeError::EmptyChannel));
        assert_eq!(Channel::new("  \t"), Err(BridgeError::EmptyChannel));
        assert!(serde_json::from_value::<Channel>(json!("")).is_err());
    }

    #[test]
    fn channel_exposes_hierarchy() {
        let ch = channel("median://onesignal/iam/pauseInAppMessages?pause=true");
        assert_eq!(ch.scheme(), Some("median"));
        assert_eq!(ch.namespace(), Some("onesignal"));
        assert_eq!(ch.action(), Some("pauseInAppMessages"));
        assert_eq!(
            ch.segments().collect::<Vec<_>>(),
            vec!["onesignal", "iam", "pauseInAppMessages"]
        );

        let bare = channel("_median_device_shake");
        assert_eq!(bare.scheme(), None);
        assert_eq!(bare.namespace(), Some("_median_device_shake"));
    }

    #[test]
    fn wrapped_params_drop_null_members_and_reject_non_objects() {
        let envelope = CommandEnvelope::from_value(
            channel("median://auth/get"),
            Some(json!({ "prompt": null, "secret": "s" })),
            false,
        )
        .expect("wrapped object");
        assert_eq!(envelope.params, Some(json!({ "secret": "s" })));

        assert_eq!(
            CommandEnvelope::from_value(channel("median://x/y"), Some(json!([1, 2])), false),
            Err(BridgeError::ParamsNotObject("array"))
        );

        let none = CommandEnvelope::from_value(channel("median://x/y"), Some(Value::Null), false)
            .expect("null params");
        assert_eq!(none.params, None);
    }

    #[test]
    fn raw_params_pass_through_verbatim() {
        let envelope =
            CommandEnvelope::from_value(channel("median://x/y"), Some(json!(["a", null])), true)
                .expect("raw array");
        assert_eq!(envelope.params, Some(json!(["a", null])));
    }

    #[test]
    fn non_string_map_keys_fail_serialization_before_dispatch() {
        let mut params = BTreeMap::new();
        params.insert(vec![1_u8], "value");
        let err = CommandEnvelope::with_params(channel("median://x/y"), &params, false)
            .expect_err("vector keys are not JSON");
        assert!(matches!(err, BridgeError::Serialization(_)));
    }

    #[test]
    fn wire_form_names_command_and_data() {
        let envelope = CommandEnvelope::with_params(
            channel("median://permissions/status"),
            &json!({ "permissions": ["camera"] }),
            false,
        )
        .expect("envelope");
        assert_eq!(
            envelope.to_wire(),
            json!({
                "medianCommand": "median://permissions/status",
                "data": { "permissions": ["camera"] }
            })
        );
        assert_eq!(
            CommandEnvelope::new(channel("median://onesignal/register")).to_wire_string(),
            r#"{"medianCommand":"median://onesignal/register"}"#
        );
        assert_eq!(envelope.param("permissions"), Some(&json!(["camera"])));
    }
}
