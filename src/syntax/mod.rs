//! Serializer: [`MindMap`](crate::model::MindMap) → MMD text
//!
//! The output re-parses to the same topic tree, attributes, extras and
//! code snippets.

mod options;
mod writer;

pub use options::{LineEnding, SerializeOptions};
pub use writer::{serialize, serialize_with};
