//! Startup and configuration errors
//!
//! The simulation itself cannot fail; only wiring it to a page or reading
//! settings can.

use std::fmt;

/// Fatal problems while attaching the game to its host page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    /// No global `window` (not running in a browser main thread)
    NoWindow,
    /// A required DOM element is missing
    MissingElement {
        /// Element id that was looked up
        id: &'static str,
    },
    /// An element exists but has the wrong type
    WrongElementType {
        id: &'static str,
        expected: &'static str,
    },
    /// The canvas refused to hand out a 2D drawing context
    ContextUnavailable,
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::NoWindow => write!(f, "no browser window available"),
            StartupError::MissingElement { id } => {
                write!(f, "required element '#{}' not found", id)
            }
            StartupError::WrongElementType { id, expected } => {
                write!(f, "element '#{}' is not a {}", id, expected)
            }
            StartupError::ContextUnavailable => {
                write!(f, "canvas 2D rendering context unavailable")
            }
        }
    }
}

impl std::error::Error for StartupError {}

/// A settings document could not be parsed
#[derive(Debug)]
pub enum SettingsError {
    /// Malformed JSON or wrong field types
    Parse(serde_json::Error),
    /// Settings file could not be read
    Io(std::io::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(e) => write!(f, "invalid settings: {}", e),
            SettingsError::Io(e) => write!(f, "cannot read settings: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(e) => Some(e),
            SettingsError::Io(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_messages() {
        let err = StartupError::MissingElement { id: "gameCanvas" };
        assert_eq!(err.to_string(), "required element '#gameCanvas' not found");
        assert_eq!(
            StartupError::ContextUnavailable.to_string(),
            "canvas 2D rendering context unavailable"
        );
    }

    #[test]
    fn test_settings_error_wraps_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = SettingsError::from(json_err);
        assert!(err.to_string().starts_with("invalid settings"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
