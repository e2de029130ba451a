/*
 *  display/components/mod.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Clock face components
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

pub mod clock;
pub mod zener;
pub mod jitter;
pub mod pulse;

// Re-exports
pub use clock::{ChangeDetector, ClockSampler, ClockState, FieldChanges, SystemClock, TimeSource};
pub use zener::{SymbolCycler, ZenerSymbol, ZENER_SYMBOLS};
pub use jitter::{BurnInJitter, JitterOffset, Transform};
pub use pulse::{PulseConfig, PulseFrame};
