//! HealthKit / Health Connect reads.

use std::collections::BTreeMap;

use median_bridge::{CommandDispatcher, TypedReply};
use serde::{Deserialize, Serialize};

use super::{request, CallbackData};

/// Health read permission request.
pub const REQUEST_PERMISSIONS: &str = "median://healthBridge/requestPermissions";
/// Health data query.
pub const GET_DATA: &str = "median://healthBridge/getData";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Health metric kinds.
pub enum HealthDataType {
    /// Step count.
    Steps,
    /// Walking/running distance.
    Distance,
    /// Active energy burned.
    ActiveEnergy,
    /// Exercise minutes.
    ExerciseTime,
    /// Body height.
    Height,
    /// Body weight.
    Weight,
    /// Body mass index.
    Bmi,
    /// Dietary energy.
    CalorieIntake,
    /// Water consumed.
    WaterIntake,
    /// Sleep duration.
    Sleep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Aggregation window for [`HealthBridge::get_data`].
pub enum HealthBucket {
    /// Individual samples.
    Raw,
    /// Per-minute sums.
    Minute,
    /// Per-hour sums.
    Hour,
    /// Per-day sums.
    Day,
}

/// Query for [`HealthBridge::get_data`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDataQuery {
    /// Metrics to read.
    pub data_types: Vec<HealthDataType>,
    /// Inclusive ISO-8601 start.
    pub start_date: String,
    /// Exclusive ISO-8601 end.
    pub end_date: String,
    /// Aggregation window; the host default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<HealthBucket>,
}

/// One reading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthSample {
    /// Measured value.
    pub value: f64,
    /// Instant of a point sample.
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Start of an aggregated sample.
    #[serde(default)]
    pub start: Option<String>,
    /// End of an aggregated sample.
    #[serde(default)]
    pub end: Option<String>,
}

/// Answer to [`HealthBridge::get_data`], keyed by metric name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HealthData {
    /// Readings keyed by the metric's wire name (e.g. `"steps"`).
    #[serde(default)]
    pub data: BTreeMap<String, HealthSample>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PermissionParams<'a> {
    data_types: &'a [HealthDataType],
}

/// `median://healthBridge/*` commands.
#[derive(Debug, Clone, Copy)]
pub struct HealthBridge<'a> {
    dispatcher: &'a CommandDispatcher,
}

impl<'a> HealthBridge<'a> {
    pub(crate) fn new(dispatcher: &'a CommandDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Requests read access for `data_types`.
    pub fn request_permissions(&self, data_types: &[HealthDataType]) -> TypedReply<CallbackData> {
        request(
            self.dispatcher,
            REQUEST_PERMISSIONS,
            Some(&PermissionParams { data_types }),
        )
    }

    /// Reads the metrics described by `query`.
    pub fn get_data(&self, query: &HealthDataQuery) -> TypedReply<HealthData> {
        request(self.dispatcher, GET_DATA, Some(query))
    }
}
