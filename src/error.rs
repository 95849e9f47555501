//! Crate-level error types.

use std::fmt;

use crate::scene::ElementHandle;

/// Errors produced by the holotilt crate.
///
/// None of these ever escape into the host's event loop: the engine logs
/// them and skips the affected selector or entity.
#[derive(Debug)]
pub enum EffectError {
    /// The host could not report a rectangle for the element (detached or
    /// not laid out).
    GeometryUnavailable(ElementHandle),
    /// A configured selector could not be parsed.
    SelectorInvalid {
        /// The offending selector text.
        selector: String,
        /// What the parser choked on.
        reason: String,
    },
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Scene or pointer-trace JSON could not be parsed.
    SceneParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// The browser host could not be set up.
    Host(String),
}

impl fmt::Display for EffectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeometryUnavailable(el) => {
                write!(f, "geometry unavailable for element {}", el.0)
            }
            Self::SelectorInvalid { selector, reason } => {
                write!(f, "invalid selector '{selector}': {reason}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::SceneParse(msg) => write!(f, "scene parse error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for EffectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EffectError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
