//! Error types for parsing, value conversion and style application.

use serde::Serialize;
use thiserror::Error;

use crate::tokenizer::Position;

/// A grammar error at a position in the source.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{position}: {message}")]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// Where it went wrong.
    pub position: Position,
}

impl ParseError {
    /// Create a parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Converting declaration tokens into a typed value failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ConversionError {
    /// A token other than the expected one was found.
    #[error("{position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Human-readable description of what was expected.
        expected: String,
        /// The offending token, serialized.
        found: String,
        /// Where the token starts.
        position: Position,
    },

    /// A transform function was called with an unsupported number of arguments.
    #[error("{position}: {function}() does not accept {count} argument(s)")]
    ArgumentCount {
        /// Function name.
        function: String,
        /// Number of arguments found.
        count: usize,
        /// Where the function starts.
        position: Position,
    },

    /// The property is not known for the element.
    #[error("{position}: unknown property `{name}`")]
    UnknownProperty {
        /// Qualified property name.
        name: String,
        /// Where the declaration starts.
        position: Position,
    },

    /// The tokens are well-formed but the value is out of range or unknown.
    #[error("{position}: {message}")]
    InvalidValue {
        /// What went wrong.
        message: String,
        /// Where the value starts.
        position: Position,
    },
}

impl ConversionError {
    /// Position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::ArgumentCount { position, .. }
            | Self::UnknownProperty { position, .. }
            | Self::InvalidValue { position, .. } => *position,
        }
    }
}

/// Error raised while applying a stylesheet or a single declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum StyleError {
    /// The stylesheet or declaration list did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A declaration's value could not be converted.
    #[error("{property}: {source}")]
    Conversion {
        /// Qualified property name.
        property: String,
        /// The underlying failure.
        source: ConversionError,
    },
}

impl StyleError {
    /// Position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Parse(e) => e.position,
            Self::Conversion { source, .. } => source.position(),
        }
    }
}
