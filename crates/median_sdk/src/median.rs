use std::rc::Rc;

use median_bridge::{
    BridgeConfig, BridgeContext, BridgeResult, HostDetector, ListenerChannel, ReadinessHandle,
    TickScheduler, TypedReply,
};

use crate::{
    events,
    plugins::{
        app_review::AppReview, auth::Auth, device, device::DeviceInfo, health_bridge::HealthBridge,
        onesignal::OneSignal, permissions::Permissions,
    },
};

/// Platform reported by [`Median::get_platform`] outside a Median shell.
pub const WEB_PLATFORM: &str = "web";

/// Page-level entry point: detection, readiness, event listeners and feature wrappers.
#[derive(Clone)]
pub struct Median {
    context: BridgeContext,
    detector: Rc<dyn HostDetector>,
    scheduler: Rc<dyn TickScheduler>,
}

impl std::fmt::Debug for Median {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Median")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl Median {
    /// Builds the facade over an existing context.
    pub fn new(
        context: BridgeContext,
        detector: Rc<dyn HostDetector>,
        scheduler: Rc<dyn TickScheduler>,
    ) -> Self {
        Self {
            context,
            detector,
            scheduler,
        }
    }

    /// Builds the facade over the browser host selected at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`median_bridge::BridgeError::Config`] when `config` fails validation.
    pub fn from_web(config: BridgeConfig) -> BridgeResult<Self> {
        let context = median_bridge_web::build_bridge_context(config)?;
        Ok(Self::new(
            context,
            Rc::new(median_bridge_web::host_detector()),
            Rc::new(median_bridge_web::tick_scheduler()),
        ))
    }

    /// Returns the underlying bridge context.
    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Returns whether the page runs inside a Median shell.
    pub fn is_native_app(&self) -> bool {
        self.detector.is_host_available()
    }

    /// Returns `"web"` outside a shell, otherwise the platform the shell reports.
    ///
    /// # Errors
    ///
    /// Returns the device-info reply error when the shell does not answer cleanly.
    pub async fn get_platform(&self) -> BridgeResult<Option<String>> {
        if !self.is_native_app() {
            return Ok(Some(WEB_PLATFORM.to_string()));
        }
        Ok(self.device_info().await?.platform)
    }

    /// Runs `callback` once the shell is detected, polling with the configured budget.
    pub fn on_ready(&self, callback: impl FnOnce() + 'static) -> ReadinessHandle {
        median_bridge::start_readiness_poll(
            Rc::clone(&self.detector),
            self.scheduler.as_ref(),
            &self.context.config().readiness,
            callback,
        )
    }

    /// Queries device and app metadata.
    pub fn device_info(&self) -> TypedReply<DeviceInfo> {
        device::device_info(self.context.dispatcher())
    }

    /// App returned to the foreground.
    pub fn app_resumed(&self) -> ListenerChannel {
        self.context.listener(events::APP_RESUMED)
    }

    /// Device was shaken.
    pub fn device_shake(&self) -> ListenerChannel {
        self.context.listener(events::DEVICE_SHAKE)
    }

    /// Content shared into the app; payloads decode as [`events::ShareToAppData`].
    pub fn share_to_app(&self) -> ListenerChannel {
        self.context.listener(events::SHARE_TO_APP)
    }

    /// In-app purchase catalog; payloads decode as [`events::InAppPurchaseInfoReadyData`].
    pub fn iap_info_ready(&self) -> ListenerChannel {
        self.context.listener(events::IAP_INFO_READY)
    }

    /// In-app purchase updates.
    pub fn iap_purchases(&self) -> ListenerChannel {
        self.context.listener(events::IAP_PURCHASES)
    }

    /// OneSignal push opened.
    pub fn onesignal_push_opened(&self) -> ListenerChannel {
        self.context.listener(events::ONESIGNAL_PUSH_OPENED)
    }

    /// Branch initialized; payloads decode as [`events::BranchInitializedData`].
    pub fn branch_initialized(&self) -> ListenerChannel {
        self.context.listener(events::BRANCH_INITIALIZED)
    }

    /// AppsFlyer conversion data.
    pub fn appsflyer_conversion_data(&self) -> ListenerChannel {
        self.context.listener(events::APPSFLYER_CONVERSION_DATA)
    }

    /// Page navigations; payloads decode as [`events::UrlChangedData`].
    pub fn js_navigation_url(&self) -> ListenerChannel {
        self.context.listener(events::JS_NAVIGATION_URL)
    }

    /// Secret storage behind device authentication.
    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self.context.dispatcher())
    }

    /// Platform review dialog.
    pub fn app_review(&self) -> AppReview<'_> {
        AppReview::new(self.context.dispatcher())
    }

    /// Runtime permissions.
    pub fn permissions(&self) -> Permissions<'_> {
        Permissions::new(self.context.dispatcher())
    }

    /// Health data.
    pub fn health_bridge(&self) -> HealthBridge<'_> {
        HealthBridge::new(self.context.dispatcher())
    }

    /// OneSignal push messaging.
    pub fn onesignal(&self) -> OneSignal<'_> {
        OneSignal::new(self.context.dispatcher())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        future::Future,
        task::{Context, Poll},
    };

    use futures::executor::block_on;
    use median_bridge::{BridgeError, ManualScheduler, MemoryHostBridge, PollerState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::events::UrlChangedData;

    fn median_over(host: &MemoryHostBridge, scheduler: &ManualScheduler) -> Median {
        let context = BridgeContext::init(
            Rc::new(host.clone()),
            Some(Rc::new(host.clone())),
            BridgeConfig::default(),
        )
        .expect("context");
        Median::new(context, Rc::new(host.clone()), Rc::new(scheduler.clone()))
    }

    #[test]
    fn platform_is_web_without_a_host() {
        let host = MemoryHostBridge::unavailable();
        let median = median_over(&host, &ManualScheduler::new());

        assert!(!median.is_native_app());
        assert_eq!(
            block_on(median.get_platform()),
            Ok(Some(WEB_PLATFORM.to_string()))
        );
        assert!(host.sent().is_empty());
    }

    #[test]
    fn platform_comes_from_device_info_inside_the_shell() {
        let host = MemoryHostBridge::available();
        let median = median_over(&host, &ManualScheduler::new());
        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);

        let mut platform = Box::pin(median.get_platform());
        assert!(platform.as_mut().poll(&mut cx).is_pending());
        let envelope = host.last_sent().expect("device info requested");
        assert_eq!(envelope.channel.as_str(), device::DEVICE_INFO);

        assert!(host.reply(&envelope, "callback", json!({ "platform": "ios" })));
        assert_eq!(
            platform.as_mut().poll(&mut cx),
            Poll::Ready(Ok(Some("ios".to_string())))
        );
    }

    #[test]
    fn device_info_without_host_is_unavailable() {
        let host = MemoryHostBridge::unavailable();
        let median = median_over(&host, &ManualScheduler::new());
        assert_eq!(
            block_on(median.device_info()),
            Err(BridgeError::HostUnavailable)
        );
    }

    #[test]
    fn on_ready_fires_once_the_shell_appears() {
        let host = MemoryHostBridge::unavailable();
        let scheduler = ManualScheduler::new();
        let median = median_over(&host, &scheduler);
        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);

        let handle = median.on_ready(move || flag.set(true));
        scheduler.advance();
        scheduler.advance();
        assert!(!ready.get());

        host.set_available(true);
        scheduler.advance();
        assert!(ready.get());
        assert_eq!(handle.state(), PollerState::Ready);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn navigation_listener_decodes_urls() {
        let host = MemoryHostBridge::available();
        let median = median_over(&host, &ManualScheduler::new());
        let urls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&urls);

        let id = median
            .js_navigation_url()
            .add_typed_listener(move |event: UrlChangedData| sink.borrow_mut().push(event.url));
        assert!(host.call_global(events::JS_NAVIGATION_URL, json!({ "url": "https://median.co/a" })));
        assert!(median.js_navigation_url().remove_listener(id.as_str()));
        assert!(!host.call_global(events::JS_NAVIGATION_URL, json!({ "url": "https://median.co/b" })));

        assert_eq!(*urls.borrow(), vec!["https://median.co/a".to_string()]);
        assert_eq!(
            host.sent_channels(),
            vec![
                "median://events/subscribe".to_string(),
                "median://events/unsubscribe".to_string()
            ]
        );
    }

    #[test]
    fn listener_props_share_one_registry() {
        let host = MemoryHostBridge::available();
        let median = median_over(&host, &ManualScheduler::new());

        let shake = median.device_shake().add_listener(|_| {});
        let resumed = median.app_resumed().add_listener(|_| {});
        assert_ne!(shake, resumed);
        assert!(!median.app_resumed().remove_listener(shake.as_str()));
        assert_eq!(median.context().registry().len(), 2);
    }
}
