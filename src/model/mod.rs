//! Mind map tree model
//!
//! ```text
//! MindMap ── document attributes
//!    └── arena of Topic slots ── root (slot 0)
//!          Topic: text, attributes, extras (≤ 1 per ExtraType),
//!                 code snippets, parent, ordered children
//! ```
//!
//! Every structural change goes through [`MindMap`], which keeps the
//! parent/children links consistent and rejects cycles. [`Topic`] exposes
//! the payload: title, attributes, extras and code snippets.

pub mod attributes;
mod error;
mod extra;
mod iter;
mod links;
mod map;
mod shared;
mod snapshot;
mod topic;

pub use error::ModelError;
pub use extra::{Extra, ExtraType, FILE_PARAM_LINE, FILE_PARAM_USE_SYSTEM, FileLink};
pub use iter::Descendants;
pub use map::MindMap;
pub use shared::SharedMindMap;
pub use snapshot::{MindMapTree, TopicTree};
pub use topic::{Topic, TopicId};
