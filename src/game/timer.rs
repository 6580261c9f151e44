use std::time::{Duration, Instant};

/// A repeating timer that says when the next tick is due.  It does not sleep
/// by itself; the event loop asks for the deadline and calls
/// [`TickTimer::fire()`] once it has passed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TickTimer {
    interval: Duration,
    deadline: Option<Instant>,
}

impl TickTimer {
    /// Create a stopped timer with the given interval
    pub(crate) fn new(interval: Duration) -> TickTimer {
        TickTimer {
            interval,
            deadline: None,
        }
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    /// The instant at which the next tick is due, or `None` if stopped
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub(crate) fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedule the next tick one interval after `now`
    pub(crate) fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.interval);
    }

    pub(crate) fn stop(&mut self) {
        self.deadline = None;
    }

    /// Change the interval.  A running timer is restarted from `now` at the
    /// new interval; a stopped one stays stopped.
    pub(crate) fn reschedule(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.is_running() {
            self.start(now);
        }
    }

    /// If the deadline has been reached, schedule the following tick and
    /// return `true`
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(when) if when <= now => {
                self.start(now);
                true
            }
            _ => false,
        }
    }
}
