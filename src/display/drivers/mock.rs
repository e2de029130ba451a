/*
 *  display/drivers/mock.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Recording surface and manual clock for testing without a terminal
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

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::display::color::Rgb;
use crate::display::components::clock::TimeSource;
use crate::display::components::pulse::PulseConfig;
use crate::display::error::DisplayError;
use crate::display::field::FieldId;
use crate::display::traits::RenderSurface;

/// One call made against the surface, in order
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    SetText(FieldId, String),
    SetColor(FieldId, Rgb),
    SetBackground(Rgb),
    ApplyTransform(i32, i32, Duration),
    StartPulse(PulseConfig),
    Flush,
}

/// Internal state for the recording surface (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct RecordingState {
    /// Every call, in order
    pub calls: Vec<SurfaceCall>,

    /// Committed text per field (as of the last flush)
    pub text: BTreeMap<FieldId, String>,

    /// Committed color per field
    pub colors: BTreeMap<FieldId, Rgb>,

    /// Committed background
    pub background: Option<Rgb>,

    /// Committed transform target
    pub transform: Option<(i32, i32, Duration)>,

    pub pulse: Option<PulseConfig>,

    /// Number of times flush() succeeded
    pub flush_count: usize,

    /// Simulate failures (for error testing)
    pub fail_flush: bool,
    pub fail_set_text: bool,

    pending: Vec<SurfaceCall>,
}

impl RecordingState {
    fn commit(&mut self) {
        for call in self.pending.drain(..) {
            match call {
                SurfaceCall::SetText(field, text) => {
                    self.text.insert(field, text);
                }
                SurfaceCall::SetColor(field, color) => {
                    self.colors.insert(field, color);
                }
                SurfaceCall::SetBackground(color) => self.background = Some(color),
                SurfaceCall::ApplyTransform(dx, dy, d) => self.transform = Some((dx, dy, d)),
                SurfaceCall::StartPulse(p) => self.pulse = Some(p),
                SurfaceCall::Flush => {}
            }
        }
    }
}

/// Surface that records calls and only commits staged values on flush
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<RecordingState>> {
        Arc::clone(&self.state)
    }

    fn record(&mut self, call: SurfaceCall) -> Result<(), DisplayError> {
        let mut state = self.state.lock().map_err(|_| DisplayError::Closed)?;
        state.calls.push(call.clone());
        state.pending.push(call);
        Ok(())
    }
}

impl RenderSurface for RecordingSurface {
    fn set_text(&mut self, field: FieldId, text: &str) -> Result<(), DisplayError> {
        if self.state.lock().map_err(|_| DisplayError::Closed)?.fail_set_text {
            return Err(DisplayError::Surface("simulated set_text failure".into()));
        }
        self.record(SurfaceCall::SetText(field, text.to_string()))
    }

    fn set_color(&mut self, field: FieldId, color: Rgb) -> Result<(), DisplayError> {
        self.record(SurfaceCall::SetColor(field, color))
    }

    fn set_background(&mut self, color: Rgb) -> Result<(), DisplayError> {
        self.record(SurfaceCall::SetBackground(color))
    }

    fn apply_transform(&mut self, dx: i32, dy: i32, duration: Duration) -> Result<(), DisplayError> {
        self.record(SurfaceCall::ApplyTransform(dx, dy, duration))
    }

    fn start_pulse(&mut self, pulse: &PulseConfig) -> Result<(), DisplayError> {
        self.record(SurfaceCall::StartPulse(*pulse))
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.lock().map_err(|_| DisplayError::Closed)?;
        state.calls.push(SurfaceCall::Flush);
        if state.fail_flush {
            state.pending.clear();
            return Err(DisplayError::Surface("simulated flush failure".into()));
        }
        state.commit();
        state.flush_count += 1;
        Ok(())
    }
}

/// Settable wall clock; clones share the same instant
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Local>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn set(&self, now: DateTime<Local>) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    /// Negative deltas step the clock backwards
    pub fn advance(&self, delta: chrono::Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += delta;
        }
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<Local> {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_nothing_commits_before_flush() {
        let mut surface = RecordingSurface::new();
        surface.set_text(FieldId::Hour, "12").unwrap();
        let state = surface.state();
        assert!(state.lock().unwrap().text.is_empty());
        surface.flush().unwrap();
        assert_eq!(state.lock().unwrap().text.get(&FieldId::Hour).map(String::as_str), Some("12"));
    }

    #[test]
    fn test_failed_flush_drops_staged_values() {
        let mut surface = RecordingSurface::new();
        let state = surface.state();
        state.lock().unwrap().fail_flush = true;
        surface.set_text(FieldId::Hour, "12").unwrap();
        assert!(surface.flush().is_err());
        state.lock().unwrap().fail_flush = false;
        surface.flush().unwrap();
        assert!(state.lock().unwrap().text.is_empty());
    }

    #[test]
    fn test_manual_clock_is_shared() {
        let start = Local.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).single().unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();
        other.advance(chrono::Duration::seconds(90));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
        clock.set(start);
        assert_eq!(other.now(), start);
    }
}
