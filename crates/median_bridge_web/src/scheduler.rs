//! `setInterval`-backed tick scheduling.

use std::time::Duration;

use median_bridge::{TickControl, TickScheduler};

#[derive(Debug, Clone, Copy, Default)]
/// [`TickScheduler`] over `window.setInterval`/`clearInterval`.
pub struct IntervalScheduler;

impl TickScheduler for IntervalScheduler {
    fn schedule_interval(&self, interval: Duration, tick: Box<dyn FnMut() -> TickControl>) {
        if let Err(err) = crate::bridge::set_interval(interval, tick) {
            log::warn!("interval scheduling failed: {err}");
        }
    }
}
