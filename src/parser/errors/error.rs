//! Parse error and diagnostic types

use text_size::{TextRange, TextSize};
use thiserror::Error;

use super::codes::DiagnosticCode;
use super::context::ParseContext;
use crate::base::LineCol;
use crate::model::ExtraType;
use crate::parser::TokenKind;

/// Severity level for diagnostics
///
/// Problems that leave no usable tree are [`FormatError`]s instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Content that was skipped or reinterpreted
    #[default]
    Warning,
    /// An informational hint
    Hint,
}

impl Severity {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

/// A recoverable anomaly found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    /// Source location
    pub range: TextRange,
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Structure the parser was in
    pub context: ParseContext,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(
        code: DiagnosticCode,
        message: impl Into<String>,
        range: TextRange,
        context: ParseContext,
    ) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            severity: code.default_severity(),
            context,
        }
    }

    /// Create a diagnostic using the code's default message
    pub fn from_code(code: DiagnosticCode, range: TextRange, context: ParseContext) -> Self {
        Self::new(code, code.default_message(), range, context)
    }

    /// Format the diagnostic for display
    pub fn format(&self) -> String {
        format!(
            "{} {}: {} {}",
            self.severity.as_str(),
            self.code,
            self.message,
            self.context.description()
        )
    }
}

/// Hard failure while reading a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A token runs into the end of the input
    #[error("unterminated {kind} at {position}")]
    UnterminatedToken {
        kind: TokenKind,
        offset: TextSize,
        position: LineCol,
    },

    /// An extra type line at the end of the input without a body
    #[error("extra {extra} at {position} has no body")]
    MissingExtraBody {
        extra: ExtraType,
        offset: TextSize,
        position: LineCol,
    },
}

impl FormatError {
    /// Offset of the token that caused the failure
    pub fn offset(&self) -> TextSize {
        match self {
            Self::UnterminatedToken { offset, .. } | Self::MissingExtraBody { offset, .. } => *offset,
        }
    }

    pub fn position(&self) -> LineCol {
        match self {
            Self::UnterminatedToken { position, .. } | Self::MissingExtraBody { position, .. } => {
                *position
            }
        }
    }
}
