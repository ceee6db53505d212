//! Device and app metadata.

use median_bridge::{CommandDispatcher, TypedReply};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{request, NO_PARAMS};

/// Device info query channel.
pub const DEVICE_INFO: &str = "median://run/median_device_info";

/// Device and app metadata reported by the shell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceInfo {
    /// `"ios"` or `"android"`.
    pub platform: Option<String>,
    /// App version string.
    pub app_version: Option<String>,
    /// App build number.
    pub app_build: Option<String>,
    /// Distribution channel, e.g. `"appstore"`.
    pub distribution: Option<String>,
    /// Hardware identifier.
    pub hardware: Option<String>,
    /// Stable per-install identifier.
    pub installation_id: Option<String>,
    /// Device language.
    pub language: Option<String>,
    /// Device model.
    pub model: Option<String>,
    /// Operating system name.
    pub os: Option<String>,
    /// Operating system version.
    pub os_version: Option<String>,
    /// IANA time zone.
    pub timezone: Option<String>,
    /// Remaining members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Queries [`DeviceInfo`].
pub fn device_info(dispatcher: &CommandDispatcher) -> TypedReply<DeviceInfo> {
    request(dispatcher, DEVICE_INFO, NO_PARAMS)
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::plugins::test_support::{answer, host_and_context};

    #[test]
    fn unknown_members_are_kept() {
        let (host, ctx) = host_and_context();
        let reply = device_info(ctx.dispatcher());
        answer(
            &host,
            json!({ "platform": "android", "osVersion": "15", "isFirstLaunch": true }),
        );

        let info = block_on(reply).expect("device info");
        assert_eq!(info.platform.as_deref(), Some("android"));
        assert_eq!(info.os_version.as_deref(), Some("15"));
        assert_eq!(info.extra.get("isFirstLaunch"), Some(&json!(true)));
    }
}
