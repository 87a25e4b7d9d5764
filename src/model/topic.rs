//! Topic nodes and their handles

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use uuid::Uuid;

use super::attributes::validate_key;
use super::error::ModelError;
use super::extra::{Extra, ExtraType};
use crate::core::text_utils::normalize_title;

/// Handle of a topic inside one [`MindMap`](super::MindMap)
///
/// Handles stay valid until the topic is removed. A handle of a removed
/// topic, or one taken from another map, is rejected by every map operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TopicId {
    map: Uuid,
    index: u32,
    generation: u32,
}

impl TopicId {
    pub(crate) fn new(map: Uuid, index: u32, generation: u32) -> Self {
        Self {
            map,
            index,
            generation,
        }
    }

    /// Identity of the map this handle belongs to
    pub fn map_id(&self) -> Uuid {
        self.map
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.generation
    }

    /// Same slot in the map identified by `map`
    pub(crate) fn rebound(self, map: Uuid) -> Self {
        Self { map, ..self }
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A node of the mind map tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topic {
    text: String,
    parent: Option<TopicId>,
    children: Vec<TopicId>,
    attributes: IndexMap<String, String>,
    extras: BTreeMap<ExtraType, Extra>,
    code_snippets: IndexMap<String, String>,
}

impl Topic {
    /// Single-line title
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the title
    ///
    /// Line breaks and control characters become spaces and leading
    /// whitespace is dropped, so the title reads back from a `#` line as is.
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        self.text = normalize_title(text.as_ref());
    }

    pub fn parent(&self) -> Option<TopicId> {
        self.parent
    }

    pub fn children(&self) -> &[TopicId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Set or, with `None`, remove an attribute; returns the previous value
    pub fn set_attribute(
        &mut self,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, ModelError> {
        validate_key(key)?;
        Ok(match value {
            Some(value) => self.attributes.insert(key.to_string(), value.to_string()),
            None => self.attributes.shift_remove(key),
        })
    }

    pub(crate) fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    // =========================================================================
    // Extras
    // =========================================================================

    /// Extras in write order
    pub fn extras(&self) -> impl Iterator<Item = &Extra> {
        self.extras.values()
    }

    pub fn extra(&self, extra_type: ExtraType) -> Option<&Extra> {
        self.extras.get(&extra_type)
    }

    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }

    /// Attach an extra, replacing and returning one of the same type
    pub fn set_extra(&mut self, extra: Extra) -> Result<Option<Extra>, ModelError> {
        extra.validate()?;
        Ok(self.extras.insert(extra.extra_type(), extra))
    }

    pub fn remove_extra(&mut self, extra_type: ExtraType) -> Option<Extra> {
        self.extras.remove(&extra_type)
    }

    /// UID of a `TOPIC` extra, if present
    pub fn topic_link(&self) -> Option<&str> {
        match self.extras.get(&ExtraType::Topic) {
            Some(Extra::Topic(uid)) => Some(uid),
            _ => None,
        }
    }

    // =========================================================================
    // Code snippets
    // =========================================================================

    /// Snippets keyed by language, in insertion order
    pub fn code_snippets(&self) -> &IndexMap<String, String> {
        &self.code_snippets
    }

    pub fn code_snippet(&self, language: &str) -> Option<&str> {
        self.code_snippets.get(language).map(String::as_str)
    }

    /// Set or, with `None`, remove the snippet for `language`
    ///
    /// The language must be a non-empty single line without backticks and
    /// no body line may be a bare ```` ``` ```` fence.
    pub fn set_code_snippet(
        &mut self,
        language: &str,
        body: Option<&str>,
    ) -> Result<Option<String>, ModelError> {
        let language = language.trim();
        let Some(body) = body else {
            return Ok(self.code_snippets.shift_remove(language));
        };
        if language.is_empty() || language.contains(['`', '\n', '\r']) {
            return Err(ModelError::InvalidCodeSnippet(format!(
                "bad language `{language}`"
            )));
        }
        if body.lines().any(is_fence_line) {
            return Err(ModelError::InvalidCodeSnippet(format!(
                "{language} body contains a closing fence"
            )));
        }
        Ok(self
            .code_snippets
            .insert(language.to_string(), body.to_string()))
    }

    // =========================================================================
    // Structure (owned by the map)
    // =========================================================================

    pub(crate) fn set_parent(&mut self, parent: Option<TopicId>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<TopicId> {
        &mut self.children
    }

    /// Copy of the payload without structure
    pub(crate) fn payload_copy(&self) -> Topic {
        Topic {
            text: self.text.clone(),
            parent: None,
            children: Vec::new(),
            attributes: self.attributes.clone(),
            extras: self.extras.clone(),
            code_snippets: self.code_snippets.clone(),
        }
    }

    /// Copy with structure handles moved to the map identified by `map`
    pub(crate) fn rebound(&self, map: Uuid) -> Topic {
        Topic {
            parent: self.parent.map(|parent| parent.rebound(map)),
            children: self.children.iter().map(|child| child.rebound(map)).collect(),
            ..self.clone()
        }
    }

    /// Reset everything but the parent link
    pub(crate) fn clear_payload(&mut self) {
        self.text.clear();
        self.attributes.clear();
        self.extras.clear();
        self.code_snippets.clear();
        self.children.clear();
    }
}

fn is_fence_line(line: &str) -> bool {
    line.strip_prefix("```")
        .is_some_and(|rest| rest.chars().all(|c| matches!(c, ' ' | '\t' | '\r')))
}
