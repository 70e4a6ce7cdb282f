//! Parse error type.

use thiserror::Error;

/// Error raised while parsing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Syntax error with source position (1-based).
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// What went wrong.
        message: String,
        /// Line number.
        line: u32,
        /// Column number.
        column: u32,
    },

    /// The document contained no definitions.
    #[error("document contains no definitions")]
    EmptyDocument,
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, line: u32, column: u32) -> Self {
        Self::Syntax {
            message: message.into(),
            line,
            column,
        }
    }
}
