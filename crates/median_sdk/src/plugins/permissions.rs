//! Runtime permission queries.

use std::collections::BTreeMap;

use median_bridge::{CommandDispatcher, TypedReply};
use serde::Serialize;

use super::{request, CallbackData, NO_PARAMS};

/// Permission status query.
pub const STATUS: &str = "median://permissions/status";
/// Phone call management request.
pub const REQUEST_PHONE_CALL_MGMT: &str = "median://permissions/requestPhoneCallMgmt";

#[derive(Serialize)]
struct StatusParams<'a> {
    permissions: &'a [&'a str],
}

/// `median://permissions/*` commands.
#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    dispatcher: &'a CommandDispatcher,
}

impl<'a> Permissions<'a> {
    pub(crate) fn new(dispatcher: &'a CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Returns the platform's status string for each named permission.
    pub fn status(&self, permissions: &[&str]) -> TypedReply<BTreeMap<String, String>> {
        request(self.dispatcher, STATUS, Some(&StatusParams { permissions }))
    }

    /// Requests phone call management (Android self-managed calls).
    pub fn request_phone_call_mgmt(&self) -> TypedReply<CallbackData> {
        request(self.dispatcher, REQUEST_PHONE_CALL_MGMT, NO_PARAMS)
    }
}
