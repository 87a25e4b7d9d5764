//! # mmd-base
//!
//! Core library for the MMD mind map format: lexing, parsing, the topic
//! tree model and serialization.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! syntax    → Serializer: MindMap → MMD text
//!   ↓
//! model     → MindMap arena, Topic, Extra, UID links, traversal
//!   ↓
//! parser    → Line lexer, token cursor, recursive-descent parser
//!   ↓
//! core      → Escaping helpers shared by parser and serializer
//!   ↓
//! base      → Primitives (TextRange, LineIndex)
//! ```
//!
//! `model` and `parser` reference each other: the parser builds a
//! [`MindMap`] and [`MindMap::parse`] delegates to the parser.
//!
//! ## Example
//!
//! ```
//! let map = mmd::MindMap::parse("---\n# Root\n## Child\n").unwrap();
//! let child = map.children(map.root()).unwrap()[0];
//! assert_eq!(map.topic(child).unwrap().text(), "Child");
//! assert!(mmd::serialize(&map).ends_with("# Root\n## Child\n"));
//! ```

// ============================================================================
// MODULES (dependency order: base → core → parser → model → syntax)
// ============================================================================

/// Foundation types: TextRange, LineIndex
pub mod base;

/// Text helpers: Markdown and `<pre>` escaping, attribute code spans
pub mod core;

/// Parser: line lexer, token cursor, diagnostics
pub mod parser;

/// Tree model: MindMap, Topic, Extra
pub mod model;

/// Serializer and its options
pub mod syntax;

// Re-export foundation types
pub use base::{LineCol, LineIndex, TextRange, TextSize};

// Re-export the document API
pub use model::{Extra, ExtraType, FileLink, MindMap, ModelError, SharedMindMap, Topic, TopicId};
pub use parser::{Diagnostic, DiagnosticCode, FormatError, Parse, parse};
pub use syntax::{LineEnding, SerializeOptions, serialize, serialize_with};
