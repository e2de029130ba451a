/*
 *  display/timer.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-delay repeating task handle
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::time::{Duration, Instant};

use log::warn;

/// One cancelable fixed-delay action
///
/// At most one firing is ever pending. When a firing is taken the timer
/// disarms; the owner re-arms it with `rearm_after` once the action has
/// completed, so late ticks drift instead of queueing.
#[derive(Debug, Clone)]
pub struct FixedDelayTimer {
    name: &'static str,
    delay: Duration,
    deadline: Option<Instant>,
}

impl FixedDelayTimer {
    pub fn new(name: &'static str, delay: Duration) -> Self {
        Self { name, delay, deadline: None }
    }

    /// Arm to fire as soon as polled
    pub fn arm_now(&mut self, now: Instant) {
        self.deadline = Some(now);
    }

    /// Arm to fire one full delay after `completed`
    ///
    /// A deadline past the end of `Instant` leaves the timer cancelled.
    pub fn rearm_after(&mut self, completed: Instant) {
        self.deadline = completed.checked_add(self.delay);
        if self.deadline.is_none() {
            warn!("Timer '{}' delay {:?} out of range, cancelled", self.name, self.delay);
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Take the pending firing if it is due; disarms on success
    #[inline]
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle() {
        let mut timer = FixedDelayTimer::new("t", Duration::from_millis(10));
        assert_eq!(timer.deadline(), None);
        assert!(!timer.take_due(Instant::now()));
    }

    #[test]
    fn test_fires_once_then_disarms() {
        let t0 = Instant::now();
        let mut timer = FixedDelayTimer::new("t", Duration::from_millis(10));
        timer.arm_now(t0);
        assert!(timer.take_due(t0));
        assert!(!timer.take_due(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn test_not_due_before_delay() {
        let t0 = Instant::now();
        let mut timer = FixedDelayTimer::new("t", Duration::from_millis(10));
        timer.rearm_after(t0);
        assert!(!timer.take_due(t0 + Duration::from_millis(9)));
        assert!(timer.take_due(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn test_late_poll_yields_one_firing() {
        let t0 = Instant::now();
        let mut timer = FixedDelayTimer::new("t", Duration::from_millis(10));
        timer.rearm_after(t0);
        let late = t0 + Duration::from_secs(5);
        assert!(timer.take_due(late));
        timer.rearm_after(late);
        assert!(!timer.take_due(late));
        assert_eq!(timer.deadline(), Some(late + Duration::from_millis(10)));
    }

    #[test]
    fn test_unreachable_deadline_cancels() {
        let mut timer = FixedDelayTimer::new("t", Duration::MAX);
        timer.arm_now(Instant::now());
        timer.rearm_after(Instant::now());
        assert_eq!(timer.deadline(), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut timer = FixedDelayTimer::new("t", Duration::from_millis(10));
        timer.arm_now(t0);
        timer.cancel();
        assert_eq!(timer.deadline(), None);
        assert!(!timer.take_due(t0 + Duration::from_secs(1)));
    }
}
