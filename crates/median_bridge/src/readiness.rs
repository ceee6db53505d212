//! Bounded polling for host bridge availability.
//!
//! The poller itself is a plain state machine advanced one check at a time. Timing comes from a
//! [`TickScheduler`]; browsers use `setInterval`, tests use [`ManualScheduler`].

use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::{config::ReadinessConfig, host::HostDetector};

/// Continuation run once the host becomes available.
pub type Continuation = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Poller lifecycle.
pub enum PollerState {
    /// Still checking for the host.
    Probing,
    /// Host detected; continuation handed out.
    Ready,
    /// Attempt budget exhausted without detecting the host.
    TimedOut,
}

impl PollerState {
    /// Returns whether the poller has stopped for good.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Probing)
    }
}

/// Result of one poller check.
#[must_use = "the continuation only fires when the outcome is run"]
pub struct TickOutcome {
    state: PollerState,
    continuation: Option<Continuation>,
}

impl TickOutcome {
    /// Returns the poller state after the check.
    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Runs the continuation if this check made the poller ready.
    pub fn run(self) -> PollerState {
        if let Some(continuation) = self.continuation {
            continuation();
        }
        self.state
    }
}

/// `Probing -> Ready | TimedOut` state machine.
pub struct ReadinessPoller {
    state: PollerState,
    attempts: u32,
    max_attempts: u32,
    continuation: Option<Continuation>,
}

impl std::fmt::Debug for ReadinessPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessPoller")
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl ReadinessPoller {
    /// Creates a poller allowed `max_attempts` checks (at least one).
    pub fn new(max_attempts: u32, continuation: impl FnOnce() + 'static) -> Self {
        Self {
            state: PollerState::Probing,
            attempts: 0,
            max_attempts: max_attempts.max(1),
            continuation: Some(Box::new(continuation)),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> PollerState {
        self.state
    }

    /// Returns how many checks have been made.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Applies one availability check.
    ///
    /// Terminal pollers ignore further checks.
    pub fn tick(&mut self, host_available: bool) -> TickOutcome {
        if self.state.is_terminal() {
            return TickOutcome {
                state: self.state,
                continuation: None,
            };
        }

        self.attempts += 1;
        if host_available {
            self.state = PollerState::Ready;
            return TickOutcome {
                state: self.state,
                continuation: self.continuation.take(),
            };
        }
        if self.attempts >= self.max_attempts {
            self.state = PollerState::TimedOut;
            self.continuation = None;
        }
        TickOutcome {
            state: self.state,
            continuation: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whether a scheduled interval should keep firing.
pub enum TickControl {
    /// Schedule the next tick.
    Continue,
    /// Cancel the interval.
    Stop,
}

/// Repeating timer source.
pub trait TickScheduler {
    /// Calls `tick` every `interval` until it returns [`TickControl::Stop`].
    fn schedule_interval(&self, interval: Duration, tick: Box<dyn FnMut() -> TickControl>);
}

/// Observation handle for a running readiness poll.
#[derive(Clone, Debug)]
pub struct ReadinessHandle {
    poller: Rc<RefCell<ReadinessPoller>>,
}

impl ReadinessHandle {
    /// Returns the current poller state.
    pub fn state(&self) -> PollerState {
        self.poller.borrow().state()
    }

    /// Returns how many checks have been made.
    pub fn attempts(&self) -> u32 {
        self.poller.borrow().attempts()
    }
}

/// Starts polling `detector` and runs `continuation` on the first positive check.
pub fn start_readiness_poll(
    detector: Rc<dyn HostDetector>,
    scheduler: &dyn TickScheduler,
    config: &ReadinessConfig,
    continuation: impl FnOnce() + 'static,
) -> ReadinessHandle {
    let poller = Rc::new(RefCell::new(ReadinessPoller::new(
        config.max_attempts,
        continuation,
    )));
    let driven = Rc::clone(&poller);
    scheduler.schedule_interval(
        config.interval(),
        Box::new(move || {
            let outcome = driven.borrow_mut().tick(detector.is_host_available());
            match outcome.run() {
                PollerState::Probing => TickControl::Continue,
                PollerState::Ready => {
                    log::debug!("host bridge ready");
                    TickControl::Stop
                }
                PollerState::TimedOut => {
                    log::debug!("host bridge not detected; readiness poll stopped");
                    TickControl::Stop
                }
            }
        }),
    );
    ReadinessHandle { poller }
}

struct ManualTimer {
    interval: Duration,
    tick: Box<dyn FnMut() -> TickControl>,
}

/// Scheduler advanced explicitly, one tick per live interval per [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timers: Rc<RefCell<Vec<ManualTimer>>>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualScheduler {
    /// Creates a scheduler with no intervals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires every live interval once; returns how many fired.
    pub fn advance(&self) -> usize {
        let mut due = std::mem::take(&mut *self.timers.borrow_mut());
        let fired = due.len();
        due.retain_mut(|timer| (timer.tick)() == TickControl::Continue);
        let mut timers = self.timers.borrow_mut();
        due.append(&mut timers);
        *timers = due;
        fired
    }

    /// Advances until no interval is live or `max_rounds` is reached; returns rounds run.
    pub fn run_until_idle(&self, max_rounds: usize) -> usize {
        let mut rounds = 0;
        while rounds < max_rounds && self.pending() > 0 {
            self.advance();
            rounds += 1;
        }
        rounds
    }

    /// Returns the number of live intervals.
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Returns the periods of the live intervals.
    pub fn intervals(&self) -> Vec<Duration> {
        self.timers
            .borrow()
            .iter()
            .map(|timer| timer.interval)
            .collect()
    }
}

impl TickScheduler for ManualScheduler {
    fn schedule_interval(&self, interval: Duration, tick: Box<dyn FnMut() -> TickControl>) {
        self.timers
            .borrow_mut()
            .push(ManualTimer { interval, tick });
    }
}
