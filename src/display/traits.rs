/*
 *  display/traits.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rendering surface abstraction
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

use std::time::Duration;

use crate::display::color::Rgb;
use crate::display::components::pulse::PulseConfig;
use crate::display::error::DisplayError;
use crate::display::field::FieldId;

/// The host's rendering surface
///
/// Setters stage changes; nothing becomes visible until `flush`, so a tick's
/// output lands on screen as one unit.
pub trait RenderSurface {
    /// Stage new text for a field
    fn set_text(&mut self, field: FieldId, text: &str) -> Result<(), DisplayError>;

    /// Stage a foreground color for a field
    fn set_color(&mut self, field: FieldId, color: Rgb) -> Result<(), DisplayError>;

    /// Stage the background color
    fn set_background(&mut self, color: Rgb) -> Result<(), DisplayError>;

    /// Move the whole layout to `(dx, dy)` from its rest position, animated
    /// over `duration`, and hold it there
    fn apply_transform(&mut self, dx: i32, dy: i32, duration: Duration) -> Result<(), DisplayError>;

    /// Start the decorative breathing pulse
    ///
    /// Surfaces without animation support ignore it.
    fn start_pulse(&mut self, _pulse: &PulseConfig) -> Result<(), DisplayError> {
        Ok(())
    }

    /// Make everything staged since the last flush visible
    fn flush(&mut self) -> Result<(), DisplayError>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn set_text(&mut self, field: FieldId, text: &str) -> Result<(), DisplayError> {
        (**self).set_text(field, text)
    }

    fn set_color(&mut self, field: FieldId, color: Rgb) -> Result<(), DisplayError> {
        (**self).set_color(field, color)
    }

    fn set_background(&mut self, color: Rgb) -> Result<(), DisplayError> {
        (**self).set_background(color)
    }

    fn apply_transform(&mut self, dx: i32, dy: i32, duration: Duration) -> Result<(), DisplayError> {
        (**self).apply_transform(dx, dy, duration)
    }

    fn start_pulse(&mut self, pulse: &PulseConfig) -> Result<(), DisplayError> {
        (**self).start_pulse(pulse)
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        (**self).flush()
    }
}
