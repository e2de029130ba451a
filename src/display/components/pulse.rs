/*
 *  display/components/pulse.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Breathing pulse of the clapper icon
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

use std::f32::consts::PI;
use std::time::Duration;

/// Animation contract handed to the surface once at start-up
///
/// Runs `from` -> `to` over `half_period`, then reverses, forever.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseConfig {
    pub scale_from: f32,
    pub scale_to: f32,
    pub alpha_from: f32,
    pub alpha_to: f32,
    pub half_period: Duration,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            scale_from: 1.5,
            scale_to: 2.0,
            alpha_from: 0.10,
            alpha_to: 0.20,
            half_period: Duration::from_millis(6000),
        }
    }
}

/// Pulse values at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    pub scale: f32,
    pub alpha: f32,
}

impl PulseConfig {
    /// Progress through the current half cycle, eased, 0.0..=1.0
    fn phase(&self, elapsed: Duration) -> f32 {
        let half = self.half_period.as_secs_f64();
        if half <= 0.0 {
            return 0.0;
        }
        let cycles = elapsed.as_secs_f64() / half;
        let within = cycles.fract() as f32;
        // odd half cycles run backwards
        let linear = if (cycles as u64) % 2 == 0 { within } else { 1.0 - within };
        // accelerate-decelerate
        (1.0 - (PI * linear).cos()) / 2.0
    }

    pub fn sample(&self, elapsed: Duration) -> PulseFrame {
        let p = self.phase(elapsed);
        PulseFrame {
            scale: self.scale_from + (self.scale_to - self.scale_from) * p,
            alpha: self.alpha_from + (self.alpha_to - self.alpha_from) * p,
        }
    }
}
