//! Host event channels and their payloads.

use serde::Deserialize;
use serde_json::{Map, Value};

/// App returned to the foreground.
pub const APP_RESUMED: &str = "_median_app_resumed";
/// Device was shaken.
pub const DEVICE_SHAKE: &str = "_median_device_shake";
/// Content was shared into the app.
pub const SHARE_TO_APP: &str = "_median_share_to_app";
/// In-app purchase catalog is ready.
pub const IAP_INFO_READY: &str = "_median_info_ready";
/// In-app purchases changed.
pub const IAP_PURCHASES: &str = "_median_iap_purchases";
/// A OneSignal push was opened.
pub const ONESIGNAL_PUSH_OPENED: &str = "_median_onesignal_push_opened";
/// Branch finished initializing.
pub const BRANCH_INITIALIZED: &str = "_median_branch_initialized";
/// AppsFlyer conversion data arrived.
pub const APPSFLYER_CONVERSION_DATA: &str = "_median_appsflyer_cd_success";
/// The web view navigated.
pub const JS_NAVIGATION_URL: &str = "_median_url_changed";

/// Payload of [`SHARE_TO_APP`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShareToAppData {
    /// Shared URL or text.
    pub url: Option<String>,
    /// Share sheet subject, if any.
    pub subject: Option<String>,
}

/// Payload of [`JS_NAVIGATION_URL`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UrlChangedData {
    /// New page URL.
    pub url: String,
}

/// Payload of [`BRANCH_INITIALIZED`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BranchInitializedData {
    /// Branch session parameters.
    pub params: Option<Map<String, Value>>,
    /// Initialization error, if any.
    pub error: Option<String>,
}

/// Payload of [`IAP_INFO_READY`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InAppPurchaseInfoReadyData {
    /// Store platform.
    pub platform: Option<String>,
    /// Whether purchases can be made.
    pub can_make_payments: Option<bool>,
    /// Product catalog as reported by the store.
    pub in_app_purchases: Option<Value>,
    /// Remaining members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
