/*
 *  display/theme.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Normal / Inverted theme state machine
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

use super::color::Rgb;
use super::field::{ColorRole, FieldId};

const DATE_ORANGE: Rgb = Rgb::new(0xFF, 0xA8, 0x00);
const TIME_YELLOW: Rgb = Rgb::new(0xFF, 0xEA, 0x00);
const SUB_GREEN: Rgb = Rgb::new(0x05, 0xD0, 0x00);
const INVERT_BLUE: Rgb = Rgb::new(0x00, 0x33, 0xCC);
const SUB_MAGENTA: Rgb = Rgb::new(0xFF, 0x2B, 0xFF);

/// Theme mode - two states, no intermediates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Normal,
    Inverted,
}

impl ThemeMode {
    pub fn flipped(self) -> Self {
        match self {
            ThemeMode::Normal => ThemeMode::Inverted,
            ThemeMode::Inverted => ThemeMode::Normal,
        }
    }

    /// The fixed color table for this mode
    pub fn colors(self) -> ColorTable {
        match self {
            ThemeMode::Normal => ColorTable {
                background: Rgb::BLACK,
                date: DATE_ORANGE,
                time: TIME_YELLOW,
                sub_second: SUB_GREEN,
                control: DATE_ORANGE,
            },
            ThemeMode::Inverted => ColorTable {
                background: Rgb::WHITE,
                date: INVERT_BLUE,
                time: INVERT_BLUE,
                sub_second: SUB_MAGENTA,
                control: INVERT_BLUE,
            },
        }
    }
}

/// Full color table for one theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTable {
    pub background: Rgb,
    pub date: Rgb,
    pub time: Rgb,
    /// centiseconds and zener symbol
    pub sub_second: Rgb,
    pub control: Rgb,
}

impl ColorTable {
    pub fn for_role(&self, role: ColorRole) -> Rgb {
        match role {
            ColorRole::Date => self.date,
            ColorRole::Time => self.time,
            ColorRole::SubSecond => self.sub_second,
            ColorRole::Control => self.control,
        }
    }

    pub fn for_field(&self, field: FieldId) -> Rgb {
        self.for_role(field.color_role())
    }
}

/// Theme state owned by the scheduling context
///
/// Starts Normal on every process start, only `toggle` mutates it.
#[derive(Debug, Default)]
pub struct ThemeState {
    mode: ThemeMode,
}

impl ThemeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip Normal <-> Inverted and return the new table
    pub fn toggle(&mut self) -> ColorTable {
        self.mode = self.mode.flipped();
        let colors = self.mode.colors();
        log::info!("Theme toggled to {:?} (background {})", self.mode, colors.background);
        colors
    }

    pub fn current_colors(&self) -> ColorTable {
        self.mode.colors()
    }
}
