//! Parser configuration.

use crate::cascade::StyleOrigin;

/// How a stylesheet is parsed and where its rules sit in the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Optional source filename or url, used in diagnostics.
    pub source: Option<String>,
    /// Origin assigned to every rule in the stylesheet.
    pub origin: StyleOrigin,
    /// Skip recording recoverable errors. Parsing recovers either way.
    pub ignore_errors: bool,
}

impl ParserConfig {
    /// Configuration for a stylesheet of the given origin.
    #[must_use]
    pub const fn with_origin(origin: StyleOrigin) -> Self {
        Self {
            source: None,
            origin,
            ignore_errors: false,
        }
    }

    /// Set the source name.
    #[must_use]
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Name used in log messages.
    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.as_deref().unwrap_or("<inline>")
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::with_origin(StyleOrigin::Author)
    }
}
