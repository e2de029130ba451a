/*
 *  display/scheduler.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display scheduler - the single cooperative timing loop that drives the
 *  clock face on a fast cadence and burn-in jitter on a slow one
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

use log::{debug, error, info};
use rand::Rng;
use rand::rngs::StdRng;

use super::components::clock::{ChangeDetector, ClockSampler, TimeSource};
use super::components::jitter::BurnInJitter;
use super::components::pulse::PulseConfig;
use super::components::zener::SymbolCycler;
use super::error::DisplayError;
use super::field::FieldId;
use super::theme::{ColorTable, ThemeState};
use super::timer::FixedDelayTimer;
use super::traits::RenderSurface;

pub const DEFAULT_FAST_TICK: Duration = Duration::from_millis(10);
pub const DEFAULT_JITTER_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the display scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay between clock refreshes
    pub fast_tick: Duration,

    /// Delay between burn-in jitter emissions
    pub jitter_interval: Duration,

    /// Breathing pulse for the clapper, `None` disables it
    pub pulse: Option<PulseConfig>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fast_tick: DEFAULT_FAST_TICK,
            jitter_interval: DEFAULT_JITTER_INTERVAL,
            pulse: Some(PulseConfig::default()),
        }
    }
}

/// Host visibility signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Active,
    Inactive,
}

/// What a call to `poll` actually ran
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fast_ticks: u32,
    pub slow_ticks: u32,
}

/// Owns all mutable display state
///
/// Everything here, theme and last emitted clock state included, is
/// mutated only from the thread that calls `poll`, `toggle_theme` and
/// `set_visibility`; it is never shared across threads.
pub struct DisplayScheduler<T: TimeSource, S: RenderSurface, R: Rng = StdRng> {
    sampler: ClockSampler<T>,
    detector: ChangeDetector,
    theme: ThemeState,
    jitter: BurnInJitter<R>,
    surface: S,
    fast: FixedDelayTimer,
    slow: FixedDelayTimer,
    pulse: Option<PulseConfig>,
    visibility: Visibility,
    painted: bool,
}

impl<T: TimeSource, S: RenderSurface> DisplayScheduler<T, S, StdRng> {
    /// Scheduler with an OS-seeded jitter source
    pub fn new(config: SchedulerConfig, source: T, surface: S) -> Self {
        Self::with_jitter(config, source, surface, BurnInJitter::new())
    }
}

impl<T: TimeSource, S: RenderSurface, R: Rng> DisplayScheduler<T, S, R> {
    pub fn with_jitter(config: SchedulerConfig, source: T, surface: S, jitter: BurnInJitter<R>) -> Self {
        Self {
            sampler: ClockSampler::new(source),
            detector: ChangeDetector::new(),
            theme: ThemeState::new(),
            jitter,
            surface,
            fast: FixedDelayTimer::new("clock", config.fast_tick),
            slow: FixedDelayTimer::new("burn-in", config.jitter_interval),
            pulse: config.pulse,
            visibility: Visibility::Inactive,
            painted: false,
        }
    }

    pub fn current_colors(&self) -> ColorTable {
        self.theme.current_colors()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consume the scheduler and hand the surface back, for teardown
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Apply the host visibility signal
    ///
    /// Going active arms the clock to fire immediately and the jitter one
    /// full interval out; missed ticks are never replayed. Going inactive
    /// cancels both.
    pub fn set_visibility(&mut self, visibility: Visibility, now: Instant) {
        if visibility == self.visibility {
            return;
        }
        self.visibility = visibility;
        match visibility {
            Visibility::Active => {
                if !self.painted {
                    self.initial_paint();
                }
                self.fast.arm_now(now);
                self.slow.rearm_after(now);
                info!("Display active, timers armed");
            }
            Visibility::Inactive => {
                self.fast.cancel();
                self.slow.cancel();
                info!("Display inactive, timers cancelled");
            }
        }
    }

    /// Flip the theme and push the new colors
    ///
    /// The theme flips even if the surface refuses the colors.
    pub fn toggle_theme(&mut self) -> Result<ColorTable, DisplayError> {
        let colors = self.theme.toggle();
        self.apply_colors(&colors)?;
        self.surface.flush()?;
        Ok(colors)
    }

    /// Earliest pending deadline, `None` while inactive
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.fast.deadline(), self.slow.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run whichever actions are due at `now`
    ///
    /// Each action re-arms one delay after `now`, which stands in for its
    /// completion time since tick work never suspends.
    pub fn poll(&mut self, now: Instant) -> TickReport {
        let mut report = TickReport::default();

        if self.fast.take_due(now) {
            if let Err(e) = self.fast_tick() {
                error!("Failed to push clock frame: {}", e);
                // staged fields were dropped, redraw the date next tick
                self.detector.reset();
            }
            self.fast.rearm_after(now);
            report.fast_ticks += 1;
        }

        if self.slow.take_due(now) {
            if let Err(e) = self.slow_tick() {
                error!("Failed to apply burn-in transform: {}", e);
            }
            self.slow.rearm_after(now);
            report.slow_ticks += 1;
        }

        report
    }

    /// Sample, diff, pick the symbol, then push the lot in one flush
    fn fast_tick(&mut self) -> Result<(), DisplayError> {
        let state = self.sampler.sample();
        let changes = self.detector.detect(&state);
        let symbol = SymbolCycler::symbol(state.centis);

        let centis = state.centis_text();
        for field in changes.fields() {
            let text = match field {
                FieldId::Date => state.date.as_str(),
                FieldId::Hour => state.hour.as_str(),
                FieldId::Minute => state.minute.as_str(),
                FieldId::Second => state.second.as_str(),
                FieldId::Centis => centis.as_str(),
                _ => continue,
            };
            self.surface.set_text(field, text)?;
        }
        self.surface.set_text(FieldId::Symbol, symbol.glyph)?;
        self.surface.flush()
    }

    fn slow_tick(&mut self) -> Result<(), DisplayError> {
        let transform = self.jitter.emit();
        self.surface
            .apply_transform(transform.offset.dx, transform.offset.dy, transform.duration)?;
        self.surface.flush()
    }

    fn apply_colors(&mut self, colors: &ColorTable) -> Result<(), DisplayError> {
        self.surface.set_background(colors.background)?;
        for field in FieldId::ALL {
            self.surface.set_color(field, colors.for_field(field))?;
        }
        Ok(())
    }

    fn initial_paint(&mut self) {
        match self.paint_static() {
            Ok(()) => {
                self.painted = true;
                debug!("Initial paint complete");
            }
            // retried on the next activation
            Err(e) => error!("Failed initial paint: {}", e),
        }
    }

    /// Static parts of the face: colors, separators, control label, pulse
    fn paint_static(&mut self) -> Result<(), DisplayError> {
        let colors = self.theme.current_colors();
        self.apply_colors(&colors)?;
        self.surface.set_text(FieldId::ColonHm, ":")?;
        self.surface.set_text(FieldId::ColonMs, ":")?;
        self.surface.set_text(FieldId::ToggleControl, "INVERT")?;
        if let Some(pulse) = self.pulse.as_ref() {
            self.surface.start_pulse(pulse)?;
        }
        self.surface.flush()
    }
}
