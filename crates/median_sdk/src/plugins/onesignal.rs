//! OneSignal push messaging.

use std::collections::BTreeMap;

use median_bridge::{typed_handler, BridgeResult, CommandDispatcher, RegistryId, TypedReply};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{command, request, CallbackData, NO_PARAMS};

/// OneSignal state query.
pub const INFO: &str = "median://onesignal/info";
/// Push registration.
pub const REGISTER: &str = "median://onesignal/register";
/// Grant privacy consent.
pub const CONSENT_GRANT: &str = "median://onesignal/userPrivacyConsent/grant";
/// Revoke privacy consent.
pub const CONSENT_REVOKE: &str = "median://onesignal/userPrivacyConsent/revoke";
/// Read user tags.
pub const TAGS_GET: &str = "median://onesignal/tags/get";
/// Set user tags.
pub const TAGS_SET: &str = "median://onesignal/tags/set";
/// Delete user tags.
pub const TAGS_DELETE: &str = "median://onesignal/tags/delete";
/// Native tag editor.
pub const SHOW_TAGS_UI: &str = "median://onesignal/showTagsUI";
/// Location permission prompt.
pub const PROMPT_LOCATION: &str = "median://onesignal/promptLocation";
/// Add one in-app message trigger.
pub const IAM_ADD_TRIGGER: &str = "median://onesignal/iam/addTrigger";
/// Add in-app message triggers.
pub const IAM_ADD_TRIGGERS: &str = "median://onesignal/iam/addTriggers";
/// Remove an in-app message trigger.
pub const IAM_REMOVE_TRIGGER: &str = "median://onesignal/iam/removeTriggerForKey";
/// Query an in-app message trigger.
pub const IAM_GET_TRIGGER: &str = "median://onesignal/iam/getTriggerValueForKey";
/// Pause in-app messages.
pub const IAM_PAUSE: &str = "median://onesignal/iam/pauseInAppMessages?pause=true";
/// Resume in-app messages.
pub const IAM_RESUME: &str = "median://onesignal/iam/pauseInAppMessages?pause=false";
/// Install the in-app message click handler.
pub const IAM_CLICK_HANDLER: &str = "median://onesignal/iam/setInAppMessageClickHandler";
/// Set the external user id.
pub const EXTERNAL_ID_SET: &str = "median://onesignal/externalUserId/set";
/// Clear the external user id.
pub const EXTERNAL_ID_REMOVE: &str = "median://onesignal/externalUserId/remove";
/// Toggle foreground notifications.
pub const FOREGROUND_NOTIFICATIONS: &str = "median://onesignal/enableForegroundNotifications";
/// Set the badge count.
pub const BADGE_SET: &str = "median://onesignal/badge/set";
/// Log in under an external id.
pub const LOGIN: &str = "median://onesignal/login";
/// Log out.
pub const LOGOUT: &str = "median://onesignal/logout";

/// Push subscription state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneSignalSubscription {
    /// Subscription id.
    pub id: Option<String>,
    /// Whether the user opted in.
    pub opted_in: bool,
    /// Push token.
    pub token: Option<String>,
}

/// OneSignal (v5 plugin) state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OneSignalInfo {
    /// OneSignal app id.
    pub app_id: Option<String>,
    /// OneSignal user id.
    pub one_signal_id: Option<String>,
    /// External id set through [`OneSignal::login`].
    pub external_id: Option<String>,
    /// `"ios"` or `"android"`.
    pub platform: Option<String>,
    /// Push subscription.
    pub subscription: Option<OneSignalSubscription>,
    /// Whether privacy consent is required before registering.
    pub requires_user_privacy_consent: bool,
    /// Whether consent was given.
    pub user_consent_given: bool,
    /// Remaining members.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answer to [`OneSignal::get_tags`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OneSignalTags {
    /// Tag values by key.
    pub tags: BTreeMap<String, String>,
    /// Success flag and error.
    #[serde(flatten)]
    pub result: CallbackData,
}

/// In-app message click delivered to [`OneSignal::set_in_app_message_click_handler`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InAppMessageClick {
    /// Click action name.
    pub click_name: Option<String>,
    /// Click action URL.
    pub click_url: Option<String>,
    /// Whether this was the first click.
    pub first_click: Option<Value>,
    /// Whether the click closes the message.
    pub closes_message: Option<Value>,
}

#[derive(Serialize)]
struct TagsParams<'a> {
    tags: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct TagKeysParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [&'a str]>,
}

#[derive(Serialize)]
struct TriggerParams<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExternalIdParams<'a> {
    external_id: &'a str,
}

/// `median://onesignal/*` commands.
#[derive(Debug, Clone, Copy)]
pub struct OneSignal<'a> {
    dispatcher: &'a CommandDispatcher,
}

impl<'a> OneSignal<'a> {
    pub(crate) fn new(dispatcher: &'a CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Queries the current OneSignal state once.
    pub fn info(&self) -> TypedReply<OneSignalInfo> {
        request(self.dispatcher, INFO, NO_PARAMS)
    }

    /// Queries the OneSignal state and keeps `handler` registered for later updates.
    ///
    /// # Errors
    ///
    /// Returns dispatch errors; see [`CommandDispatcher::send_with_callback`].
    pub fn watch_info(
        &self,
        handler: impl Fn(OneSignalInfo) + 'static,
    ) -> BridgeResult<RegistryId> {
        self.dispatcher
            .send_with_callback(INFO, NO_PARAMS, typed_handler(INFO, handler))
    }

    /// Registers for push notifications.
    pub fn register(&self) -> BridgeResult<()> {
        command(self.dispatcher, REGISTER, NO_PARAMS)
    }

    /// Grants user privacy consent.
    pub fn grant_privacy_consent(&self) -> BridgeResult<()> {
        command(self.dispatcher, CONSENT_GRANT, NO_PARAMS)
    }

    /// Revokes user privacy consent.
    pub fn revoke_privacy_consent(&self) -> BridgeResult<()> {
        command(self.dispatcher, CONSENT_REVOKE, NO_PARAMS)
    }

    /// Reads the user's tags.
    pub fn get_tags(&self) -> TypedReply<OneSignalTags> {
        request(self.dispatcher, TAGS_GET, NO_PARAMS)
    }

    /// Sets `tags` on the user.
    pub fn set_tags(&self, tags: &BTreeMap<String, String>) -> TypedReply<CallbackData> {
        request(self.dispatcher, TAGS_SET, Some(&TagsParams { tags }))
    }

    /// Deletes the named tags, or every tag when `keys` is `None`.
    pub fn delete_tags(&self, keys: Option<&[&str]>) -> TypedReply<CallbackData> {
        request(self.dispatcher, TAGS_DELETE, Some(&TagKeysParams { tags: keys }))
    }

    /// Shows the native tag editor.
    pub fn show_tags_ui(&self) -> BridgeResult<()> {
        command(self.dispatcher, SHOW_TAGS_UI, NO_PARAMS)
    }

    /// Prompts for location permission.
    pub fn prompt_location(&self) -> BridgeResult<()> {
        command(self.dispatcher, PROMPT_LOCATION, NO_PARAMS)
    }

    /// Adds one in-app message trigger.
    pub fn add_trigger(&self, key: &str, value: &str) -> BridgeResult<()> {
        command(
            self.dispatcher,
            IAM_ADD_TRIGGER,
            Some(&TriggerParams {
                key,
                value: Some(value),
            }),
        )
    }

    /// Adds several in-app message triggers.
    pub fn add_triggers(&self, triggers: &BTreeMap<String, String>) -> BridgeResult<()> {
        command(self.dispatcher, IAM_ADD_TRIGGERS, Some(triggers))
    }

    /// Removes the trigger named `key`.
    pub fn remove_trigger_for_key(&self, key: &str) -> BridgeResult<()> {
        command(
            self.dispatcher,
            IAM_REMOVE_TRIGGER,
            Some(&TriggerParams { key, value: None }),
        )
    }

    /// Asks the host for the value of trigger `key`.
    pub fn get_trigger_value_for_key(&self, key: &str) -> BridgeResult<()> {
        command(
            self.dispatcher,
            IAM_GET_TRIGGER,
            Some(&TriggerParams { key, value: None }),
        )
    }

    /// Pauses in-app messages.
    pub fn pause_in_app_messages(&self) -> BridgeResult<()> {
        command(self.dispatcher, IAM_PAUSE, NO_PARAMS)
    }

    /// Resumes in-app messages.
    pub fn resume_in_app_messages(&self) -> BridgeResult<()> {
        command(self.dispatcher, IAM_RESUME, NO_PARAMS)
    }

    /// Routes in-app message clicks to `handler`; returns the callback id the host calls.
    ///
    /// # Errors
    ///
    /// Returns dispatch errors; the callback is removed again when the command is rejected.
    /// Outside a Median shell nothing is registered.
    pub fn set_in_app_message_click_handler(
        &self,
        handler: impl Fn(InAppMessageClick) + 'static,
    ) -> BridgeResult<RegistryId> {
        let id = self
            .dispatcher
            .register_callback(typed_handler(IAM_CLICK_HANDLER, handler));
        let mut params = Map::new();
        params.insert("handler".to_string(), Value::String(id.as_str().to_string()));
        self.dispatcher
            .send_value(IAM_CLICK_HANDLER, Some(Value::Object(params)), false)
            .inspect_err(|_| {
                self.dispatcher.registry().unregister(id.as_str());
            })?;
        Ok(id)
    }

    /// Sets the external user id.
    pub fn set_external_user_id(&self, external_id: &str) -> TypedReply<CallbackData> {
        request(
            self.dispatcher,
            EXTERNAL_ID_SET,
            Some(&ExternalIdParams { external_id }),
        )
    }

    /// Clears the external user id.
    pub fn remove_external_user_id(&self) -> TypedReply<CallbackData> {
        request(self.dispatcher, EXTERNAL_ID_REMOVE, NO_PARAMS)
    }

    /// Shows or suppresses notifications while the app is in the foreground.
    pub fn enable_foreground_notifications(&self, enabled: bool) -> BridgeResult<()> {
        let mut params = Map::new();
        params.insert("enabled".to_string(), Value::Bool(enabled));
        self.dispatcher
            .send_value(FOREGROUND_NOTIFICATIONS, Some(Value::Object(params)), false)
    }

    /// Sets the app icon badge count.
    pub fn set_badge(&self, count: u32) -> BridgeResult<()> {
        let mut params = Map::new();
        params.insert("count".to_string(), Value::from(count));
        self.dispatcher
            .send_value(BADGE_SET, Some(Value::Object(params)), false)
    }

    /// Logs the user in under `external_id`.
    pub fn login(&self, external_id: &str) -> TypedReply<CallbackData> {
        request(self.dispatcher, LOGIN, Some(&ExternalIdParams { external_id }))
    }

    /// Logs the user out.
    pub fn logout(&self) -> TypedReply<CallbackData> {
        request(self.dispatcher, LOGOUT, NO_PARAMS)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::plugins::test_support::{answer, host_and_context};

    #[test]
    fn tags_round_trip_through_the_host() {
        let (host, ctx) = host_and_context();
        let onesignal = OneSignal::new(ctx.dispatcher());
        let tags = BTreeMap::from([("tier".to_string(), "gold".to_string())]);

        let _set = onesignal.set_tags(&tags);
        assert_eq!(
            host.last_sent().and_then(|envelope| envelope.param("tags").cloned()),
            Some(json!({ "tier": "gold" }))
        );

        let reply = onesignal.get_tags();
        answer(&host, json!({ "success": true, "tags": { "tier": "gold" } }));
        let fetched = block_on(reply).expect("tags");
        assert_eq!(fetched.tags, tags);
        assert!(fetched.result.is_success());
    }

    #[test]
    fn delete_tags_without_keys_omits_the_list() {
        let (host, ctx) = host_and_context();
        let onesignal = OneSignal::new(ctx.dispatcher());

        let _all = onesignal.delete_tags(None);
        assert_eq!(host.last_sent().and_then(|e| e.param("tags").cloned()), None);
        let _some = onesignal.delete_tags(Some(&["tier"]));
        assert_eq!(
            host.last_sent().and_then(|e| e.param("tags").cloned()),
            Some(json!(["tier"]))
        );
    }

    #[test]
    fn fire_and_forget_commands_use_expected_channels() {
        let (host, ctx) = host_and_context();
        let onesignal = OneSignal::new(ctx.dispatcher());

        onesignal.register().expect("register");
        onesignal.add_trigger("level", "3").expect("trigger");
        onesignal.pause_in_app_messages().expect("pause");
        onesignal.set_badge(4).expect("badge");

        let sent = host.take_sent();
        assert_eq!(
            sent.iter().map(|e| e.channel.as_str()).collect::<Vec<_>>(),
            vec![REGISTER, IAM_ADD_TRIGGER, IAM_PAUSE, BADGE_SET]
        );
        assert_eq!(sent[1].params, Some(json!({ "key": "level", "value": "3" })));
        assert_eq!(sent[3].params, Some(json!({ "count": 4 })));
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn click_handler_stays_registered_across_clicks() {
        let (host, ctx) = host_and_context();
        let clicks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&clicks);

        let id = OneSignal::new(ctx.dispatcher())
            .set_in_app_message_click_handler(move |click| {
                sink.borrow_mut().push(click.click_name.unwrap_or_default())
            })
            .expect("handler");
        assert_eq!(
            host.last_sent().and_then(|e| e.param("handler").cloned()),
            Some(json!(id.as_str()))
        );

        assert!(host.call_global(id.as_str(), json!({ "clickName": "upgrade" })));
        assert!(host.call_global(id.as_str(), json!({ "clickName": "dismiss" })));
        assert_eq!(*clicks.borrow(), vec!["upgrade".to_string(), "dismiss".to_string()]);
    }

    #[test]
    fn rejected_click_handler_is_unregistered() {
        let (host, ctx) = host_and_context();
        host.reject_posts(Some("bridge closed"));

        let result = OneSignal::new(ctx.dispatcher()).set_in_app_message_click_handler(|_| {});
        assert!(result.is_err());
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn click_handler_outside_the_shell_registers_nothing() {
        let (host, ctx) = host_and_context();
        host.set_available(false);
        let onesignal = OneSignal::new(ctx.dispatcher());

        for _ in 0..3 {
            onesignal
                .set_in_app_message_click_handler(|_| {})
                .expect("no-op outside the shell");
        }
        assert!(ctx.registry().is_empty());
        assert!(host.exposed_names().is_empty());
        assert!(host.sent().is_empty());
    }

    #[test]
    fn watched_info_receives_every_update() {
        let (host, ctx) = host_and_context();
        let ids = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&ids);

        OneSignal::new(ctx.dispatcher())
            .watch_info(move |info| sink.borrow_mut().push(info.one_signal_id))
            .expect("watch");
        answer(&host, json!({ "oneSignalId": "a" }));
        answer(&host, json!({ "oneSignalId": "b", "subscription": { "optedIn": true } }));

        assert_eq!(
            *ids.borrow(),
            vec![Some("a".to_string()), Some("b".to_string())]
        );
    }

    #[test]
    fn login_sends_external_id() {
        let (host, ctx) = host_and_context();
        let reply = OneSignal::new(ctx.dispatcher()).login("user-42");
        let envelope = answer(&host, json!({ "success": true }));

        assert_eq!(envelope.param("externalId"), Some(&json!("user-42")));
        assert!(block_on(reply).expect("login").is_success());
    }
}
