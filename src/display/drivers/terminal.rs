/*
 *  display/drivers/terminal.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Full-screen terminal surface
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

use std::collections::BTreeMap;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::style::{Color, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::{ExecutableCommand, QueueableCommand, cursor, event, terminal};
use log::{debug, info};

use crate::display::color::Rgb;
use crate::display::components::pulse::PulseConfig;
use crate::display::error::DisplayError;
use crate::display::field::FieldId;
use crate::display::traits::RenderSurface;

const CLAPPER_GLYPH: &str = "\u{25C6}"; // ◆

// time row: HH:MM:SS cc  Z
const TIME_ROW_WIDTH: u16 = 14;

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

/// Animated move between two offsets from rest position
#[derive(Debug, Clone, Copy)]
struct Motion {
    from: (f32, f32),
    to: (i32, i32),
    started: Instant,
    duration: Duration,
}

impl Motion {
    fn at_rest() -> Self {
        Self { from: (0.0, 0.0), to: (0, 0), started: Instant::now(), duration: Duration::ZERO }
    }

    fn position(&self, now: Instant) -> (f32, f32) {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            (now.saturating_duration_since(self.started).as_secs_f32() / self.duration.as_secs_f32())
                .min(1.0)
        };
        (
            self.from.0 + (self.to.0 as f32 - self.from.0) * t,
            self.from.1 + (self.to.1 as f32 - self.from.1) * t,
        )
    }

    /// Cell offset, rounded
    fn cells(&self, now: Instant) -> (i32, i32) {
        let (x, y) = self.position(now);
        (x.round() as i32, y.round() as i32)
    }
}

/// Top-left cell of every field for a terminal of `cols` x `rows`, shifted
/// by `offset` and clamped on screen
pub fn layout(cols: u16, rows: u16, offset: (i32, i32)) -> BTreeMap<FieldId, (u16, u16)> {
    let cx = cols as i32 / 2;
    let cy = rows as i32 / 2;
    let x0 = cx - TIME_ROW_WIDTH as i32 / 2;

    let rest: [(FieldId, i32, i32); 10] = [
        (FieldId::Date, cx - 5, cy - 2),
        (FieldId::Hour, x0, cy),
        (FieldId::ColonHm, x0 + 2, cy),
        (FieldId::Minute, x0 + 3, cy),
        (FieldId::ColonMs, x0 + 5, cy),
        (FieldId::Second, x0 + 6, cy),
        (FieldId::Centis, x0 + 9, cy),
        (FieldId::Symbol, x0 + 12, cy),
        (FieldId::Clapper, cx, cy + 2),
        (FieldId::ToggleControl, cx - 4, cy + 4),
    ];

    let max_x = cols.saturating_sub(1) as i32;
    let max_y = rows.saturating_sub(1) as i32;
    rest.iter()
        .map(|&(field, x, y)| {
            let x = (x + offset.0).clamp(0, max_x) as u16;
            let y = (y + offset.1).clamp(0, max_y) as u16;
            (field, (x, y))
        })
        .collect()
}

/// Terminal surface
///
/// Setters only touch in-memory state; `flush` redraws the whole face inside
/// one synchronized update so a frame is never shown half-written.
pub struct TerminalSurface<W: Write = Stdout> {
    out: W,
    size: (u16, u16),
    text: BTreeMap<FieldId, String>,
    colors: BTreeMap<FieldId, Rgb>,
    background: Rgb,
    motion: Motion,
    pulse: Option<(PulseConfig, Instant)>,
    owns_terminal: bool,
    closed: bool,
}

impl TerminalSurface<Stdout> {
    /// Take over stdout: raw mode, alternate screen, hidden cursor
    pub fn stdout() -> Result<Self, DisplayError> {
        let size = terminal::size()?;
        terminal::enable_raw_mode()?;
        // from here on Drop puts the terminal back, even on a failed setup
        let mut surface = Self::with_writer(io::stdout(), size);
        surface.owns_terminal = true;
        surface.out.execute(terminal::EnterAlternateScreen)?;
        surface.out.execute(cursor::Hide)?;
        // not every terminal reports focus; the manual pause key covers those
        surface.out.execute(event::EnableFocusChange)?;
        info!("Terminal surface {}x{}", size.0, size.1);
        Ok(surface)
    }
}

impl<W: Write> TerminalSurface<W> {
    /// Draw into any writer without touching terminal modes
    pub fn with_writer(out: W, size: (u16, u16)) -> Self {
        Self {
            out,
            size,
            text: BTreeMap::new(),
            colors: BTreeMap::new(),
            background: Rgb::BLACK,
            motion: Motion::at_rest(),
            pulse: None,
            owns_terminal: false,
            closed: false,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        debug!("Terminal resized to {}x{}", cols, rows);
        self.size = (cols, rows);
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Current offset from rest, mid-animation values included
    pub fn offset_at(&self, now: Instant) -> (i32, i32) {
        self.motion.cells(now)
    }

    /// Leave the alternate screen and give the terminal back
    pub fn restore(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.owns_terminal {
            let _ = self.out.execute(event::DisableFocusChange);
            let _ = self.out.execute(cursor::Show);
            let _ = self.out.execute(terminal::LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
            let _ = self.out.flush();
        }
    }

    fn clapper_color(&self, now: Instant) -> Rgb {
        let base = self.colors.get(&FieldId::Clapper).copied().unwrap_or(Rgb::WHITE);
        match self.pulse {
            Some((cfg, started)) => {
                let frame = cfg.sample(now.saturating_duration_since(started));
                self.background.blend(base, frame.alpha)
            }
            None => base,
        }
    }

    fn draw(&mut self, now: Instant) -> io::Result<()> {
        let (cols, rows) = self.size;
        let positions = layout(cols, rows, self.offset_at(now));

        self.out.queue(terminal::BeginSynchronizedUpdate)?;
        self.out.queue(SetBackgroundColor(self.background.into()))?;
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        for (field, &(x, y)) in &positions {
            let (text, color) = match field {
                FieldId::Clapper if self.pulse.is_some() => (CLAPPER_GLYPH, self.clapper_color(now)),
                FieldId::Clapper => continue,
                _ => match self.text.get(field) {
                    Some(text) => (
                        text.as_str(),
                        self.colors.get(field).copied().unwrap_or(Rgb::WHITE),
                    ),
                    None => continue,
                },
            };
            self.out.queue(cursor::MoveTo(x, y))?;
            self.out.queue(SetForegroundColor(color.into()))?;
            self.out.queue(Print(text))?;
        }

        self.out.queue(terminal::EndSynchronizedUpdate)?;
        self.out.flush()
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn set_text(&mut self, field: FieldId, text: &str) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        match self.text.get_mut(&field) {
            Some(existing) if existing == text => {}
            Some(existing) => {
                existing.clear();
                existing.push_str(text);
            }
            None => {
                self.text.insert(field, text.to_string());
            }
        }
        Ok(())
    }

    fn set_color(&mut self, field: FieldId, color: Rgb) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        self.colors.insert(field, color);
        Ok(())
    }

    fn set_background(&mut self, color: Rgb) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        self.background = color;
        Ok(())
    }

    fn apply_transform(&mut self, dx: i32, dy: i32, duration: Duration) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        let now = Instant::now();
        // animate from wherever the face is right now
        self.motion = Motion { from: self.motion.position(now), to: (dx, dy), started: now, duration };
        Ok(())
    }

    fn start_pulse(&mut self, pulse: &PulseConfig) -> Result<(), DisplayError> {
        self.pulse = Some((*pulse, Instant::now()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.closed {
            return Err(DisplayError::Closed);
        }
        self.draw(Instant::now())?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalSurface<W> {
    fn drop(&mut self) {
        self.restore();
    }
}
