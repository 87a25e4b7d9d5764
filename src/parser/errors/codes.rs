//! Diagnostic code definitions
//!
//! Codes follow a naming convention: M{category}{number}
//! - M01xx: lines the format does not recognize
//! - M02xx: topic structure
//! - M03xx: extra blocks
//! - M04xx: attribute lines
//! - M05xx: code snippets

use std::fmt;

use super::error::Severity;

/// Codes for recoverable parse anomalies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // =========================================================================
    // M01xx: Unrecognized content
    // =========================================================================
    /// A line that matches no token shape in its position
    UnknownLine,

    // =========================================================================
    // M02xx: Topic structure
    // =========================================================================
    /// A topic whose depth does not fit where it appears
    DemotedTopic,
    /// A second top-level topic; the map has exactly one root
    ExtraRoot,

    // =========================================================================
    // M03xx: Extra blocks
    // =========================================================================
    /// A second body after an extra block already got one
    ExcessExtraBody,
    /// An extra type line followed by no body
    MissingExtraBody,
    /// An extra type name that is not FILE, LINK, NOTE or TOPIC
    UnknownExtraType,
    /// A body that cannot become an extra of its type (e.g. blank link)
    InvalidExtraBody,

    // =========================================================================
    // M04xx: Attributes
    // =========================================================================
    /// An attribute line with broken `key=`value`` pairs
    MalformedAttribute,

    // =========================================================================
    // M05xx: Code snippets
    // =========================================================================
    /// A closing fence with no opening fence
    StrayCodeSnippetEnd,
}

impl DiagnosticCode {
    /// String representation (e.g., "M0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownLine => "M0101",
            Self::DemotedTopic => "M0201",
            Self::ExtraRoot => "M0202",
            Self::ExcessExtraBody => "M0301",
            Self::MissingExtraBody => "M0302",
            Self::UnknownExtraType => "M0303",
            Self::InvalidExtraBody => "M0304",
            Self::MalformedAttribute => "M0401",
            Self::StrayCodeSnippetEnd => "M0501",
        }
    }

    pub fn category_description(&self) -> &'static str {
        match self {
            Self::UnknownLine => "unrecognized content",
            Self::DemotedTopic | Self::ExtraRoot => "topic structure",
            Self::ExcessExtraBody
            | Self::MissingExtraBody
            | Self::UnknownExtraType
            | Self::InvalidExtraBody => "extra block",
            Self::MalformedAttribute => "attribute",
            Self::StrayCodeSnippetEnd => "code snippet",
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::UnknownLine => "unrecognized line",
            Self::DemotedTopic => "topic depth does not fit its position",
            Self::ExtraRoot => "additional root topic",
            Self::ExcessExtraBody => "extra already has a body",
            Self::MissingExtraBody => "extra has no body",
            Self::UnknownExtraType => "unknown extra type",
            Self::InvalidExtraBody => "invalid extra body",
            Self::MalformedAttribute => "malformed attribute line",
            Self::StrayCodeSnippetEnd => "code snippet end without start",
        }
    }

    /// Severity a diagnostic with this code gets unless overridden
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnknownLine => Severity::Hint,
            _ => Severity::Warning,
        }
    }

    /// Check if the anomaly dropped user content from the tree
    pub fn loses_content(&self) -> bool {
        !matches!(self, Self::UnknownLine | Self::StrayCodeSnippetEnd)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
