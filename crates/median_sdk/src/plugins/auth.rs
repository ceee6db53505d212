//! Biometric-protected secret storage.

use median_bridge::{BridgeError, CommandDispatcher, PendingReply, TypedReply};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{request, CallbackData, NO_PARAMS};

/// Biometry and stored-secret status.
pub const STATUS: &str = "median://auth/status";
/// Store a secret.
pub const SAVE: &str = "median://auth/save";
/// Read the stored secret.
pub const GET: &str = "median://auth/get";
/// Delete the stored secret.
pub const DELETE: &str = "median://auth/delete";

/// Authentication capabilities reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthStatusData {
    /// Available biometry, e.g. `"touchId"`, `"faceId"`.
    pub biometry_type: Option<String>,
    /// Whether Touch ID style authentication is available.
    pub has_touch_id: bool,
    /// Whether a saved secret exists.
    pub has_secret: bool,
    /// Platform error message, if any.
    pub error: Option<String>,
}

/// Answer to [`Auth::get`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthGetData {
    /// The stored secret, if one exists.
    pub secret: Option<String>,
    /// Success flag and error.
    #[serde(flatten)]
    pub result: CallbackData,
}

#[derive(Serialize)]
struct SaveParams {
    secret: String,
}

#[derive(Serialize)]
struct GetParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt: Option<&'a str>,
}

/// `median://auth/*` commands.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    dispatcher: &'a CommandDispatcher,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(dispatcher: &'a CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Queries biometry availability and whether a secret is stored.
    pub fn status(&self) -> TypedReply<AuthStatusData> {
        request(self.dispatcher, STATUS, NO_PARAMS)
    }

    /// Stores `secret`; values that are not strings are saved as their JSON text.
    pub fn save<S: Serialize + ?Sized>(&self, secret: &S) -> TypedReply<CallbackData> {
        let secret = match serde_json::to_value(secret) {
            Ok(Value::String(text)) => text,
            Ok(other) => other.to_string(),
            Err(err) => {
                return PendingReply::failed(BridgeError::Serialization(err.to_string())).typed()
            }
        };
        request(self.dispatcher, SAVE, Some(&SaveParams { secret }))
    }

    /// Reads the stored secret, optionally overriding the system prompt text.
    pub fn get(&self, prompt: Option<&str>) -> TypedReply<AuthGetData> {
        request(self.dispatcher, GET, Some(&GetParams { prompt }))
    }

    /// Deletes the stored secret.
    pub fn delete(&self) -> TypedReply<CallbackData> {
        request(self.dispatcher, DELETE, NO_PARAMS)
    }
}
