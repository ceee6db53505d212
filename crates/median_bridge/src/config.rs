//! Bridge configuration.
//!
//! Defaults match the host protocol shipped by native Median apps. Embedders only need a config
//! document when talking to a host build that renamed the event or reply plumbing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, BridgeResult};

/// Default prefix for one-shot reply callback ids.
pub const DEFAULT_REPLY_PREFIX: &str = "_median_temp_";
/// Default parameter field carrying the reply callback id.
pub const DEFAULT_REPLY_FIELD: &str = "callback";
/// Default channel used to turn a host event subscription on.
pub const DEFAULT_SUBSCRIBE_CHANNEL: &str = "median://events/subscribe";
/// Default channel used to turn a host event subscription off.
pub const DEFAULT_UNSUBSCRIBE_CHANNEL: &str = "median://events/unsubscribe";
/// Default parameter field naming the event in subscription commands.
pub const DEFAULT_EVENT_FIELD: &str = "eventName";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Readiness polling cadence and attempt budget.
pub struct ReadinessConfig {
    /// Delay between host availability checks.
    pub interval_ms: u64,
    /// Number of checks before the poller gives up.
    pub max_attempts: u32,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            interval_ms: 500,
            max_attempts: 20,
        }
    }
}

impl ReadinessConfig {
    /// Returns the polling interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Protocol names and cadence used by the bridge core.
pub struct BridgeConfig {
    /// Prefix used when naming one-shot reply callbacks.
    pub reply_prefix: String,
    /// Parameter field the host reads the reply callback id from.
    pub reply_field: String,
    /// Channel sent when the first listener of an event channel is added.
    pub subscribe_channel: String,
    /// Channel sent when the last listener of an event channel is removed.
    pub unsubscribe_channel: String,
    /// Parameter field carrying the event channel name in subscription commands.
    pub event_field: String,
    /// Readiness poller settings.
    pub readiness: ReadinessConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            reply_prefix: DEFAULT_REPLY_PREFIX.to_string(),
            reply_field: DEFAULT_REPLY_FIELD.to_string(),
            subscribe_channel: DEFAULT_SUBSCRIBE_CHANNEL.to_string(),
            unsubscribe_channel: DEFAULT_UNSUBSCRIBE_CHANNEL.to_string(),
            event_field: DEFAULT_EVENT_FIELD.to_string(),
            readiness: ReadinessConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Parses a JSON config document and validates it.
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] when the document does not parse or fails validation.
    pub fn from_json_str(raw: &str) -> BridgeResult<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| BridgeError::Config(format!("failed to parse config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every protocol name is usable and the poller budget is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Config`] naming the first offending field.
    pub fn validate(&self) -> BridgeResult<()> {
        let names = [
            ("reply_prefix", &self.reply_prefix),
            ("reply_field", &self.reply_field),
            ("subscribe_channel", &self.subscribe_channel),
            ("unsubscribe_channel", &self.unsubscribe_channel),
            ("event_field", &self.event_field),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(BridgeError::Config(format!("`{field}` must not be empty")));
            }
        }
        if self.subscribe_channel == self.unsubscribe_channel {
            return Err(BridgeError::Config(
                "`subscribe_channel` and `unsubscribe_channel` must differ".to_string(),
            ));
        }
        if self.readiness.interval_ms == 0 {
            return Err(BridgeError::Config(
                "`readiness.interval_ms` must be positive".to_string(),
            ));
        }
        if self.readiness.max_attempts == 0 {
            return Err(BridgeError::Config(
                "`readiness.max_attempts` must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
