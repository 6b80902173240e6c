//! Markup parse errors

/// Errors raised while parsing markup text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// Tab characters are not accepted as indentation
    #[error("line {line}: tab used for indentation")]
    TabIndent { line: usize },

    /// Element name is empty or contains whitespace
    #[error("line {line}: invalid element name '{name}'")]
    InvalidName { line: usize, name: String },

    /// Continuation line with no element to continue
    #[error("line {line}: continuation outside of an element")]
    OrphanContinuation { line: usize },
}

impl MarkupError {
    /// Line number (1-based) the error was raised on
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::TabIndent { line }
            | Self::InvalidName { line, .. }
            | Self::OrphanContinuation { line } => *line,
        }
    }
}
