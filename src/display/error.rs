/*
 *  display/error.rs
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the display subsystem
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

use thiserror::Error;

/// Unified error type for all rendering surface operations
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Terminal or stdout write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Surface rejected an operation
    #[error("Surface error: {0}")]
    Surface(String),

    /// Surface has already been torn down
    #[error("Surface is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: DisplayError = io.into();
        assert!(matches!(err, DisplayError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_messages() {
        assert_eq!(DisplayError::Closed.to_string(), "Surface is closed");
        assert_eq!(
            DisplayError::Surface("flush failed".into()).to_string(),
            "Surface error: flush failed"
        );
    }
}
