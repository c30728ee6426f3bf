//! Error types for frame decoding.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Reasons an inbound frame cannot be turned into a [`crate::Command`].
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON or an argument has the wrong shape.
    #[error("malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// The frame is not a non-empty JSON array.
    #[error("frame is not a [verb, arguments] array")]
    NotAnArray,

    /// The first element of the frame is not a string.
    #[error("frame verb is not a string")]
    VerbNotString,

    /// The verb is not part of the protocol.
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// A `mode` or `msg` frame names neither a channel nor a user.
    #[error("{0} needs a channel or a user")]
    MissingTarget(&'static str),
}

impl ProtocolError {
    /// Static label for metrics.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "malformed",
            Self::NotAnArray => "not_an_array",
            Self::VerbNotString => "verb_not_string",
            Self::UnknownVerb(_) => "unknown_verb",
            Self::MissingTarget(_) => "missing_target",
        }
    }
}
