//! Hand-written lexer and recursive-descent parser for MMD documents
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! MindMapLexer → line tokens with TokenKind (the kind doubles as lexer state)
//!     ↓
//! TokenCursor → peekable token vector with checkpoint/rewind
//!     ↓
//! Parser → MindMap + Diagnostics, or FormatError
//! ```
//!
//! The lexer never fails. Shapes it does not recognize become
//! `UNKNOWN_LINE` tokens, which the parser reports and drops.

#[allow(clippy::module_inception)]
mod parser;

mod attributes;
mod cursor;
pub mod errors;
mod lexer;
mod token_kind;

pub use attributes::{AttributeLine, parse_attribute_line};
pub use cursor::{Checkpoint, TokenCursor};
pub use errors::{Diagnostic, DiagnosticCode, FormatError, ParseContext, Severity};
pub use lexer::{LexerPosition, MindMapLexer, Token, tokenize};
pub use parser::{Parse, parse};
pub use token_kind::TokenKind;
