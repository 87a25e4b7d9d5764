//! Parser error handling module
//!
//! Two tiers of problems are reported while reading an MMD document:
//! - [`FormatError`]: a hard failure; no tree is produced
//! - [`Diagnostic`]: a recoverable anomaly; the content is skipped and
//!   parsing continues
//!
//! Diagnostics carry a [`DiagnosticCode`] for filtering and the
//! [`ParseContext`] they were found in.

mod codes;
mod context;
mod error;

pub use codes::DiagnosticCode;
pub use context::ParseContext;
pub use error::{Diagnostic, FormatError, Severity};
