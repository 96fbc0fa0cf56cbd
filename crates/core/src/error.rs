//! Error types for snapshot views.

use alloc::string::String;
use core::fmt;

/// Result type alias for snapshot operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for snapshot operations.
///
/// None of these cross the transport boundary: the view and session layers log
/// them and fall back to a safe default.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// A filter, sort, group or range request named a dimension that does not exist.
    UnknownDimension {
        key: String,
    },
    /// A filter pattern could not be parsed.
    InvalidPattern {
        pattern: String,
        message: String,
    },
    /// An inbound message carried arguments of the wrong shape.
    InvalidMessage {
        event: String,
        message: String,
    },
    /// An inbound channel named an event that is not part of the protocol.
    UnknownEvent {
        channel: String,
    },
    /// A record field held a nested structure instead of a scalar.
    NotScalar {
        found: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownDimension { key } => {
                write!(f, "Invalid column name found: \"{}\"", key)
            }
            Error::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern {:?}: {}", pattern, message)
            }
            Error::InvalidMessage { event, message } => {
                write!(f, "Invalid arguments for {}: {}", event, message)
            }
            Error::UnknownEvent { channel } => {
                write!(f, "Unknown event channel: {}", channel)
            }
            Error::NotScalar { found } => {
                write!(f, "Expected a scalar value, found {}", found)
            }
        }
    }
}

impl Error {
    /// Creates an unknown dimension error.
    pub fn unknown_dimension(key: impl Into<String>) -> Self {
        Error::UnknownDimension { key: key.into() }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid message error.
    pub fn invalid_message(event: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidMessage {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown event error.
    pub fn unknown_event(channel: impl Into<String>) -> Self {
        Error::UnknownEvent {
            channel: channel.into(),
        }
    }

    /// Creates a not-a-scalar error.
    pub fn not_scalar(found: impl Into<String>) -> Self {
        Error::NotScalar {
            found: found.into(),
        }
    }

    /// Returns true for the configuration warning raised by unknown dimension keys.
    pub fn is_configuration_warning(&self) -> bool {
        matches!(self, Error::UnknownDimension { .. })
    }
}
