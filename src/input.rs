/*
 *  input.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host input: keys, focus and resize mapped onto clock events
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

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};
use tokio::sync::mpsc;

use crate::display::Visibility;

/// Events the main loop reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Flip the theme
    Toggle,
    /// Terminal focus gained (true) or lost (false)
    Focus(bool),
    /// Manual pause/resume
    TogglePause,
    Resize(u16, u16),
    Quit,
}

pub fn map_key(key: &KeyEvent) -> Option<HostEvent> {
    // key repeat and release events would double-toggle on some terminals
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(HostEvent::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(HostEvent::Quit),
        KeyCode::Char('i') | KeyCode::Char(' ') | KeyCode::Enter => Some(HostEvent::Toggle),
        KeyCode::Char('p') => Some(HostEvent::TogglePause),
        _ => None,
    }
}

pub fn map_event(ev: &Event) -> Option<HostEvent> {
    match ev {
        Event::Key(key) => map_key(key),
        Event::FocusGained => Some(HostEvent::Focus(true)),
        Event::FocusLost => Some(HostEvent::Focus(false)),
        Event::Resize(cols, rows) => Some(HostEvent::Resize(*cols, *rows)),
        _ => None,
    }
}

/// Combines terminal focus with the manual pause key
#[derive(Debug, Clone, Copy)]
pub struct VisibilityTracker {
    focused: bool,
    paused: bool,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self { focused: true, paused: false }
    }
}

impl VisibilityTracker {
    pub fn set_focus(&mut self, focused: bool) -> Visibility {
        self.focused = focused;
        self.visibility()
    }

    pub fn toggle_pause(&mut self) -> Visibility {
        self.paused = !self.paused;
        self.visibility()
    }

    pub fn visibility(&self) -> Visibility {
        if self.focused && !self.paused {
            Visibility::Active
        } else {
            Visibility::Inactive
        }
    }
}

/// Read terminal events on a blocking thread and forward the mapped ones
///
/// crossterm's `event::read` blocks, so it stays off the scheduling thread.
/// The thread ends once the receiver is dropped.
pub fn spawn_reader(tx: mpsc::UnboundedSender<HostEvent>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if let Some(host) = map_event(&ev) {
                        debug!("Input {:?}", host);
                        if tx.send(host).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    warn!("Terminal event read failed: {}", e);
                    let _ = tx.send(HostEvent::Quit);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent { code, modifiers, kind: KeyEventKind::Press, state: KeyEventState::NONE }
    }

    #[test]
    fn test_toggle_keys() {
        for code in [KeyCode::Char('i'), KeyCode::Char(' '), KeyCode::Enter] {
            assert_eq!(map_key(&press(code, KeyModifiers::NONE)), Some(HostEvent::Toggle));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Some(HostEvent::Quit));
        assert_eq!(map_key(&press(KeyCode::Esc, KeyModifiers::NONE)), Some(HostEvent::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(HostEvent::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let mut key = press(KeyCode::Char('i'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(&key), None);
    }

    #[test]
    fn test_focus_and_resize() {
        assert_eq!(map_event(&Event::FocusLost), Some(HostEvent::Focus(false)));
        assert_eq!(map_event(&Event::FocusGained), Some(HostEvent::Focus(true)));
        assert_eq!(map_event(&Event::Resize(100, 30)), Some(HostEvent::Resize(100, 30)));
    }

    #[test]
    fn test_visibility_needs_focus_and_no_pause() {
        let mut tracker = VisibilityTracker::default();
        assert_eq!(tracker.visibility(), Visibility::Active);
        assert_eq!(tracker.set_focus(false), Visibility::Inactive);
        assert_eq!(tracker.toggle_pause(), Visibility::Inactive);
        assert_eq!(tracker.set_focus(true), Visibility::Inactive);
        assert_eq!(tracker.toggle_pause(), Visibility::Active);
    }
}
