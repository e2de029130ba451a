/*
 *  display/components/clock.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock sampling and field change detection
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

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use log::{debug, warn};

use crate::display::field::FieldId;

/// Wall-clock source, read-only
pub trait TimeSource {
    fn now(&self) -> DateTime<Local>;
}

/// Host system clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Discrete fields shown on the clock face
///
/// Replaced wholesale on every fast tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    /// YYYY-MM-DD
    pub date: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    /// hundredths of a second, 0..=99
    pub centis: u8,
}

impl ClockState {
    /// Decompose an instant into zero-padded display fields
    pub fn from_instant<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        // chrono reports leap seconds as millis >= 1000
        let millis = now.timestamp_subsec_millis().min(999);
        Self {
            date: format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day()),
            hour: format!("{:02}", now.hour()),
            minute: format!("{:02}", now.minute()),
            second: format!("{:02}", now.second()),
            centis: (millis / 10) as u8,
        }
    }

    /// Centiseconds as the two-digit display string
    pub fn centis_text(&self) -> String {
        format!("{:02}", self.centis)
    }
}

/// Reads the time source and derives a `ClockState`
pub struct ClockSampler<T: TimeSource> {
    source: T,
    last_instant: Option<DateTime<Local>>,
}

impl<T: TimeSource> ClockSampler<T> {
    pub fn new(source: T) -> Self {
        Self { source, last_instant: None }
    }

    /// Sample the current instant
    ///
    /// A wall clock that steps backwards is reported as-is; the fields simply
    /// follow the clock on this tick.
    pub fn sample(&mut self) -> ClockState {
        let now = self.source.now();
        if let Some(last) = self.last_instant {
            if now < last {
                warn!("Wall clock stepped backwards by {} ms", (last - now).num_milliseconds());
            }
        }
        self.last_instant = Some(now);
        ClockState::from_instant(&now)
    }
}

/// Which fields need pushing to the surface this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChanges {
    pub date: bool,
    /// hour, minute, second and centis; always true
    pub time: bool,
}

impl FieldChanges {
    /// Compare two consecutive states
    ///
    /// Only the date is diffed; time sub-fields move at tick cadence and are
    /// always redrawn.
    pub fn between(previous: Option<&ClockState>, next: &ClockState) -> Self {
        let date = previous.map_or(true, |p| p.date != next.date);
        Self { date, time: true }
    }

    /// Field ids to refresh, in draw order
    pub fn fields(&self) -> Vec<FieldId> {
        let mut out = Vec::with_capacity(5);
        if self.date {
            out.push(FieldId::Date);
        }
        if self.time {
            out.extend_from_slice(&[FieldId::Hour, FieldId::Minute, FieldId::Second, FieldId::Centis]);
        }
        out
    }
}

/// Suppresses redundant date refreshes
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_emitted: Option<ClockState>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report changes against the last emitted state and remember `next`
    pub fn detect(&mut self, next: &ClockState) -> FieldChanges {
        let changes = FieldChanges::between(self.last_emitted.as_ref(), next);
        if changes.date {
            debug!("Date field changed to {}", next.date);
        }
        self.last_emitted = Some(next.clone());
        changes
    }

    /// Forget the last emitted state so the next tick redraws everything
    pub fn reset(&mut self) {
        self.last_emitted = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> DateTime<Utc> {
        let naive = NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap();
        Utc.from_utc_datetime(&naive)
    }

    #[test]
    fn test_fields_are_zero_padded() {
        let state = ClockState::from_instant(&at(2024, 1, 2, 3, 4, 5, 60));
        assert_eq!(state.date, "2024-01-02");
        assert_eq!(state.hour, "03");
        assert_eq!(state.minute, "04");
        assert_eq!(state.second, "05");
        assert_eq!(state.centis, 6);
        assert_eq!(state.centis_text(), "06");
    }

    #[test]
    fn test_centis_from_millis() {
        assert_eq!(ClockState::from_instant(&at(2024, 1, 1, 0, 0, 0, 237)).centis, 23);
        assert_eq!(ClockState::from_instant(&at(2024, 1, 1, 0, 0, 0, 9)).centis, 0);
        assert_eq!(ClockState::from_instant(&at(2024, 1, 1, 0, 0, 0, 999)).centis, 99);
    }

    #[test]
    fn test_leap_second_clamps_centis() {
        let naive = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 1_500)
            .unwrap();
        let state = ClockState::from_instant(&Utc.from_utc_datetime(&naive));
        assert_eq!(state.centis, 99);
    }

    #[test]
    fn test_first_detection_flags_date() {
        let mut detector = ChangeDetector::new();
        let state = ClockState::from_instant(&at(2024, 1, 1, 12, 0, 0, 0));
        assert!(detector.detect(&state).date);
    }

    #[test]
    fn test_unchanged_date_is_suppressed() {
        let mut detector = ChangeDetector::new();
        let first = ClockState::from_instant(&at(2024, 1, 1, 12, 0, 0, 0));
        let second = ClockState::from_instant(&at(2024, 1, 1, 12, 0, 0, 10));
        detector.detect(&first);
        let changes = detector.detect(&second);
        assert!(!changes.date);
        assert!(changes.time);
        assert_eq!(
            changes.fields(),
            vec![FieldId::Hour, FieldId::Minute, FieldId::Second, FieldId::Centis]
        );
    }

    #[test]
    fn test_midnight_rollover_flags_date() {
        let mut detector = ChangeDetector::new();
        detector.detect(&ClockState::from_instant(&at(2024, 1, 1, 23, 59, 59, 990)));
        let changes = detector.detect(&ClockState::from_instant(&at(2024, 1, 2, 0, 0, 0, 0)));
        assert!(changes.date);
        assert_eq!(changes.fields()[0], FieldId::Date);
    }

    #[test]
    fn test_backward_date_is_redrawn() {
        let mut detector = ChangeDetector::new();
        detector.detect(&ClockState::from_instant(&at(2024, 1, 2, 0, 0, 1, 0)));
        let changes = detector.detect(&ClockState::from_instant(&at(2024, 1, 1, 23, 0, 0, 0)));
        assert!(changes.date);
    }

    #[test]
    fn test_reset_forces_date() {
        let mut detector = ChangeDetector::new();
        let state = ClockState::from_instant(&at(2024, 1, 1, 12, 0, 0, 0));
        detector.detect(&state);
        detector.reset();
        assert!(detector.detect(&state).date);
    }

    struct Steps(std::cell::RefCell<Vec<DateTime<Local>>>);

    impl TimeSource for Steps {
        fn now(&self) -> DateTime<Local> {
            self.0.borrow_mut().remove(0)
        }
    }

    #[test]
    fn test_sampler_survives_backward_jump() {
        let later = Local.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).single().unwrap();
        let earlier = Local.with_ymd_and_hms(2024, 3, 30, 11, 0, 0).single().unwrap();
        let mut sampler = ClockSampler::new(Steps(std::cell::RefCell::new(vec![later, earlier])));
        let a = sampler.sample();
        let b = sampler.sample();
        assert_eq!(a.date, "2024-03-31");
        assert_eq!(b.date, "2024-03-30");
    }
}
