//! Error types for the transformation engine
//!
//! Provides error handling for:
//! - Dispatch failures (format mismatch, unknown action)
//! - Parameter validation
//! - Codec failures inside individual operations
//! - History replay and undo
//! - Registry construction

use crate::format::Format;

/// Coarse classification of an [`ActionError`]
///
/// Adapters use this to pick how a failure is displayed without matching
/// every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Action invoked against a value of the wrong shape
    FormatMismatch,
    /// Missing, wrong-typed or out-of-range parameter
    Parameter,
    /// Malformed input for a codec or parser
    Decode,
    /// No action registered under the requested key
    NotFound,
    /// Undo requested with no history
    EmptyStack,
    /// A side-effect hook failed after the value was computed
    Effect,
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// Action input format does not match the current value
    #[error("action {action} expects {expected} input, got {actual}")]
    FormatMismatch {
        action: String,
        expected: Format,
        actual: Format,
    },

    /// Action produced a value of another format than declared
    #[error("action {action} declared {expected} output, produced {actual}")]
    UnexpectedOutput {
        action: String,
        expected: Format,
        actual: Format,
    },

    /// Parameter missing, wrong type or out of range
    #[error("invalid parameter for {action}: {reason}")]
    InvalidParameter { action: String, reason: String },

    /// Input could not be decoded
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// No action under this format and name
    #[error("action {name} does not exist for {format} input")]
    NotFound { format: Format, name: String },

    /// Undo on an empty history
    #[error("empty stack")]
    EmptyStack,

    /// A step failed while rebuilding history
    #[error("replay failed at step {step} ({action}): {source}")]
    Replay {
        step: usize,
        action: String,
        #[source]
        source: Box<ActionError>,
    },

    /// Side-effect hook failed
    #[error("side effect of {action} failed: {reason}")]
    Effect { action: String, reason: String },
}

impl ActionError {
    /// Create a parameter error
    #[inline]
    pub fn invalid_parameter(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Classify the error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FormatMismatch { .. } | Self::UnexpectedOutput { .. } => {
                ErrorKind::FormatMismatch
            }
            Self::InvalidParameter { .. } => ErrorKind::Parameter,
            Self::Decode(_) => ErrorKind::Decode,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::EmptyStack => ErrorKind::EmptyStack,
            Self::Replay { source, .. } => source.kind(),
            Self::Effect { .. } => ErrorKind::Effect,
        }
    }

    /// Check if the error is a format mismatch
    #[inline]
    #[must_use]
    pub fn is_format_mismatch(&self) -> bool {
        self.kind() == ErrorKind::FormatMismatch
    }

    /// Check if the error is a parameter error
    #[inline]
    #[must_use]
    pub fn is_parameter(&self) -> bool {
        self.kind() == ErrorKind::Parameter
    }

    /// Check if the error came from a codec
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        self.kind() == ErrorKind::Decode
    }
}

/// Codec and parser failures
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Invalid hexadecimal input
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid base64 input
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Invalid JSON input
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid date or time
    #[error("invalid time: {0}")]
    Time(#[from] chrono::ParseError),

    /// Invalid integer
    #[error("invalid integer: {0}")]
    Int(#[from] std::num::ParseIntError),

    /// Epoch out of the representable range
    #[error("timestamp out of range: {0}")]
    TimestampRange(i64),

    /// Input does not contain the separator
    #[error("can't split using {0}")]
    NoSeparator(&'static str),

    /// Malformed JSON Web Token
    #[error("not a valid JWT: {0}")]
    Jwt(String),

    /// Invalid UTF-8 where text was required
    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid WKT input
    #[error("invalid wkt: {0}")]
    Wkt(String),

    /// Invalid GeoJSON input
    #[error("invalid geojson: {0}")]
    GeoJson(String),

    /// Input is not in the expected shape
    #[error("{0}")]
    Malformed(String),
}

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two actions share an input format and a name
    #[error("duplicate action key: {0}")]
    Collision(String),

    /// Definition declares no name
    #[error("action definition for {0} input has no name")]
    Unnamed(Format),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override has an unexpected value
    #[error("invalid value for {name}: {value}")]
    Env { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_of_replay_is_kind_of_source() {
        let err = ActionError::Replay {
            step: 1,
            action: "hex".to_string(),
            source: Box::new(ActionError::Decode(DecodeError::NoSeparator(","))),
        };
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.is_decode());
    }

    #[test]
    fn display_messages() {
        let err = ActionError::NotFound {
            format: Format::Text,
            name: "nope".to_string(),
        };
        assert_eq!(err.to_string(), "action nope does not exist for text input");

        let err = ActionError::invalid_parameter("index", "index is out of list limits");
        assert!(err.is_parameter());
        assert_eq!(
            err.to_string(),
            "invalid parameter for index: index is out of list limits"
        );
    }

    #[test]
    fn decode_from_codec_error() {
        let hex_err = hex::decode("zz").unwrap_err();
        let err: ActionError = DecodeError::from(hex_err).into();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
