/*
 *  display/components/jitter.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Burn-in mitigation: small random positional offsets
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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

pub const DEFAULT_MAX_OFFSET: i32 = 3;
/// Largest amplitude the builder accepts
pub const MAX_OFFSET: i32 = 16;
pub const DEFAULT_TRANSFORM_DURATION: Duration = Duration::from_millis(800);

/// Offset from the layout's rest position
///
/// Absolute target, never a delta from the previous emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JitterOffset {
    pub dx: i32,
    pub dy: i32,
}

/// Animate to `offset` over `duration`, then hold until the next emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transform {
    pub offset: JitterOffset,
    pub duration: Duration,
}

/// Draws independent uniform offsets in `[-max_offset, max_offset]`
pub struct BurnInJitter<R: Rng = StdRng> {
    rng: R,
    max_offset: i32,
    duration: Duration,
}

impl BurnInJitter<StdRng> {
    /// Seeded from the OS
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for BurnInJitter<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> BurnInJitter<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_offset: DEFAULT_MAX_OFFSET,
            duration: DEFAULT_TRANSFORM_DURATION,
        }
    }

    /// Amplitude in cells; sign is ignored and the value capped at `MAX_OFFSET`
    pub fn with_max_offset(mut self, max_offset: i32) -> Self {
        self.max_offset = max_offset.unsigned_abs().min(MAX_OFFSET as u32) as i32;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn max_offset(&self) -> i32 {
        self.max_offset
    }

    /// Draw a fresh offset; nothing about prior emissions is kept
    pub fn emit(&mut self) -> Transform {
        let m = self.max_offset;
        let offset = JitterOffset {
            dx: self.rng.random_range(-m..=m),
            dy: self.rng.random_range(-m..=m),
        };
        log::debug!("Burn-in jitter -> ({}, {}) over {:?}", offset.dx, offset.dy, self.duration);
        Transform { offset, duration: self.duration }
    }
}
