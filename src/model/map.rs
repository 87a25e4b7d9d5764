//! Arena-backed mind map tree
//!
//! Topics live in slots owned by the map. A [`TopicId`] is the slot index plus
//! the slot generation, so handles of removed topics are detected instead of
//! aliasing a reused slot.

use indexmap::IndexMap;
use uuid::Uuid;

use super::attributes::{self, validate_key};
use super::error::ModelError;
use super::extra::{Extra, ExtraType};
use super::topic::{Topic, TopicId};
use crate::parser::FormatError;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    topic: Option<Topic>,
}

/// A mind map document: metadata attributes and a topic tree with one root
///
/// A clone is a new document with its own identity. Handles taken from the
/// original are foreign to the clone; use [`MindMap::position_path`] and
/// [`MindMap::topic_at_position_path`] to find the matching topic.
#[derive(Debug)]
pub struct MindMap {
    id: Uuid,
    attributes: IndexMap<String, String>,
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: TopicId,
}

impl Clone for MindMap {
    fn clone(&self) -> Self {
        let id = Uuid::new_v4();
        let slots = self
            .slots
            .iter()
            .map(|slot| Slot {
                generation: slot.generation,
                topic: slot.topic.as_ref().map(|topic| topic.rebound(id)),
            })
            .collect();
        Self {
            id,
            attributes: self.attributes.clone(),
            slots,
            free: self.free.clone(),
            root: self.root.rebound(id),
        }
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MindMap {
    /// Empty map with an empty root
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            attributes: IndexMap::new(),
            slots: vec![Slot {
                generation: 0,
                topic: Some(Topic::default()),
            }],
            free: Vec::new(),
            root: TopicId::new(id, 0, 0),
        }
    }

    /// Parse a document, dropping diagnostics
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        crate::parser::parse(text).map(|parse| parse.map)
    }

    /// Serialize with default options
    pub fn to_text(&self) -> String {
        crate::syntax::serialize(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn root(&self) -> TopicId {
        self.root
    }

    /// Number of live topics, root included
    pub fn topic_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.topic.is_some()).count()
    }

    pub fn contains(&self, id: TopicId) -> bool {
        self.slot_index(id).is_ok()
    }

    pub fn topic(&self, id: TopicId) -> Result<&Topic, ModelError> {
        let index = self.slot_index(id)?;
        self.slots[index]
            .topic
            .as_ref()
            .ok_or(ModelError::UnknownTopic(id))
    }

    pub fn topic_mut(&mut self, id: TopicId) -> Result<&mut Topic, ModelError> {
        let index = self.slot_index(id)?;
        self.slots[index]
            .topic
            .as_mut()
            .ok_or(ModelError::UnknownTopic(id))
    }

    // =========================================================================
    // Slots
    // =========================================================================

    fn slot_index(&self, id: TopicId) -> Result<usize, ModelError> {
        if id.map_id() != self.id {
            return Err(ModelError::ForeignTopic(id));
        }
        match self.slots.get(id.index()) {
            Some(slot) if slot.generation == id.generation() && slot.topic.is_some() => {
                Ok(id.index())
            }
            _ => Err(ModelError::UnknownTopic(id)),
        }
    }

    fn allocate(&mut self, topic: Topic) -> TopicId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.topic = Some(topic);
            return TopicId::new(self.id, index, slot.generation);
        }
        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            topic: Some(topic),
        });
        TopicId::new(self.id, index, 0)
    }

    fn release(&mut self, id: TopicId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.topic.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index() as u32);
            }
        }
    }

    // =========================================================================
    // Tree mutation
    // =========================================================================

    /// Append (or insert at `index`) a new empty child of `parent`
    pub fn add_child(&mut self, parent: TopicId, index: Option<usize>) -> Result<TopicId, ModelError> {
        let len = self.topic(parent)?.children().len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(ModelError::IndexOutOfBounds { index, len });
        }
        let mut topic = Topic::default();
        topic.set_parent(Some(parent));
        let id = self.allocate(topic);
        self.topic_mut(parent)?.children_mut().insert(index, id);
        Ok(id)
    }

    /// Append a new child with the given title
    pub fn add_topic(&mut self, parent: TopicId, text: impl AsRef<str>) -> Result<TopicId, ModelError> {
        let id = self.add_child(parent, None)?;
        self.topic_mut(id)?.set_text(text);
        Ok(id)
    }

    /// Detach and drop a subtree
    ///
    /// Returns `Ok(false)` for the root, which is never removed. `TOPIC`
    /// extras elsewhere in the map that pointed into the removed subtree are
    /// removed as well.
    pub fn remove_subtree(&mut self, id: TopicId) -> Result<bool, ModelError> {
        if id == self.root {
            self.slot_index(id)?;
            return Ok(false);
        }
        let removed: Vec<TopicId> = self.descendants(id)?.map(|(topic_id, _)| topic_id).collect();
        let removed_uids: Vec<String> = removed
            .iter()
            .filter_map(|topic_id| self.attribute(*topic_id, attributes::TOPIC_LINK_UID))
            .map(str::to_string)
            .collect();

        self.detach(id)?;
        for topic_id in &removed {
            self.release(*topic_id);
        }
        tracing::debug!(topic = %id, count = removed.len(), "removed subtree");

        if !removed_uids.is_empty() {
            self.remove_links_to(&removed_uids);
        }
        Ok(true)
    }

    /// Reset the root and drop every other topic; document attributes stay
    pub fn clear(&mut self) {
        let root = self.root;
        for index in 0..self.slots.len() {
            if index != root.index() {
                let generation = self.slots[index].generation;
                self.release(TopicId::new(self.id, index as u32, generation));
            }
        }
        if let Some(topic) = self.slots[root.index()].topic.as_mut() {
            topic.clear_payload();
        }
    }

    fn detach(&mut self, id: TopicId) -> Result<usize, ModelError> {
        let parent = self
            .topic(id)?
            .parent()
            .ok_or(ModelError::RootOperation("detach"))?;
        let siblings = self.topic_mut(parent)?.children_mut();
        let position = siblings
            .iter()
            .position(|child| *child == id)
            .ok_or(ModelError::UnknownTopic(id))?;
        siblings.remove(position);
        self.topic_mut(id)?.set_parent(None);
        Ok(position)
    }

    fn attach(&mut self, id: TopicId, parent: TopicId, index: usize) -> Result<(), ModelError> {
        self.topic_mut(parent)?.children_mut().insert(index, id);
        self.topic_mut(id)?.set_parent(Some(parent));
        Ok(())
    }

    /// Move a topic under `new_parent` at `index` (appended when `None`)
    pub fn move_topic(
        &mut self,
        id: TopicId,
        new_parent: TopicId,
        index: Option<usize>,
    ) -> Result<(), ModelError> {
        let old_parent = self
            .topic(id)?
            .parent()
            .ok_or(ModelError::RootOperation("move"))?;
        self.slot_index(new_parent)?;
        if new_parent == id || self.has_ancestor(new_parent, id)? {
            return Err(ModelError::CyclicMove {
                topic: id,
                target: new_parent,
            });
        }

        let mut len = self.topic(new_parent)?.children().len();
        if old_parent == new_parent {
            len -= 1;
        }
        let index = index.unwrap_or(len);
        if index > len {
            return Err(ModelError::IndexOutOfBounds { index, len });
        }

        self.detach(id)?;
        self.attach(id, new_parent, index)
    }

    /// Move a topic to the front of its siblings; `false` if already there
    pub fn make_first(&mut self, id: TopicId) -> Result<bool, ModelError> {
        let (parent, position) = self.sibling_position(id, "make_first")?;
        if position == 0 {
            return Ok(false);
        }
        self.move_topic(id, parent, Some(0))?;
        Ok(true)
    }

    /// Move a topic to the end of its siblings; `false` if already there
    pub fn make_last(&mut self, id: TopicId) -> Result<bool, ModelError> {
        let (parent, position) = self.sibling_position(id, "make_last")?;
        if position + 1 == self.topic(parent)?.children().len() {
            return Ok(false);
        }
        self.move_topic(id, parent, None)?;
        Ok(true)
    }

    /// Move a topic next to `anchor`, just before it
    pub fn move_before(&mut self, id: TopicId, anchor: TopicId) -> Result<(), ModelError> {
        self.move_next_to(id, anchor, 0, "move_before")
    }

    /// Move a topic next to `anchor`, just after it
    pub fn move_after(&mut self, id: TopicId, anchor: TopicId) -> Result<(), ModelError> {
        self.move_next_to(id, anchor, 1, "move_after")
    }

    fn move_next_to(
        &mut self,
        id: TopicId,
        anchor: TopicId,
        shift: usize,
        operation: &'static str,
    ) -> Result<(), ModelError> {
        if self.topic(id)?.parent().is_none() {
            return Err(ModelError::RootOperation(operation));
        }
        if id == anchor {
            return Ok(());
        }
        let (parent, _) = self.sibling_position(anchor, operation)?;
        if parent == id || self.has_ancestor(parent, id)? {
            return Err(ModelError::CyclicMove { topic: id, target: parent });
        }
        self.detach(id)?;
        let (_, anchor_position) = self.sibling_position(anchor, operation)?;
        self.attach(id, parent, anchor_position + shift)
    }

    fn sibling_position(
        &self,
        id: TopicId,
        operation: &'static str,
    ) -> Result<(TopicId, usize), ModelError> {
        let parent = self
            .topic(id)?
            .parent()
            .ok_or(ModelError::RootOperation(operation))?;
        let position = self
            .topic(parent)?
            .children()
            .iter()
            .position(|child| *child == id)
            .ok_or(ModelError::UnknownTopic(id))?;
        Ok((parent, position))
    }

    /// Copy a topic under the same parent, appended after its siblings
    ///
    /// With `deep` the whole subtree is copied. Link UIDs are stripped from
    /// the copy so links keep resolving to the original.
    pub fn clone_subtree(&mut self, id: TopicId, deep: bool) -> Result<TopicId, ModelError> {
        let parent = self
            .topic(id)?
            .parent()
            .ok_or(ModelError::RootOperation("clone"))?;
        let copy = self.copy_topic(id, parent, deep)?;
        self.topic_mut(parent)?.children_mut().push(copy);
        self.remove_attribute_from_subtree(copy, &[attributes::TOPIC_LINK_UID])?;
        Ok(copy)
    }

    fn copy_topic(&mut self, source: TopicId, parent: TopicId, deep: bool) -> Result<TopicId, ModelError> {
        let mut topic = self.topic(source)?.payload_copy();
        topic.set_parent(Some(parent));
        let copy = self.allocate(topic);
        if deep {
            let children = self.topic(source)?.children().to_vec();
            for child in children {
                let child_copy = self.copy_topic(child, copy, true)?;
                self.topic_mut(copy)?.children_mut().push(child_copy);
            }
        }
        Ok(copy)
    }

    // =========================================================================
    // Extras and attributes
    // =========================================================================

    /// Attach an extra; an extra of the same type is replaced and returned
    pub fn set_extra(&mut self, id: TopicId, extra: Extra) -> Result<Option<Extra>, ModelError> {
        self.topic_mut(id)?.set_extra(extra)
    }

    pub fn remove_extra(&mut self, id: TopicId, extra_type: ExtraType) -> Result<Option<Extra>, ModelError> {
        Ok(self.topic_mut(id)?.remove_extra(extra_type))
    }

    /// Set or, with `None`, remove a topic attribute
    pub fn set_attribute(
        &mut self,
        id: TopicId,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, ModelError> {
        self.topic_mut(id)?.set_attribute(key, value)
    }

    /// Attribute value; `None` also for handles not in this map
    pub fn attribute(&self, id: TopicId, key: &str) -> Option<&str> {
        self.topic(id).ok()?.attribute(key)
    }

    pub fn attribute_or<'m>(&'m self, id: TopicId, key: &str, default: &'m str) -> &'m str {
        self.attribute(id, key).unwrap_or(default)
    }

    pub fn document_attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Set or, with `None`, remove a document attribute
    pub fn set_document_attribute(
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

    pub fn document_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn document_attribute_or<'m>(&'m self, key: &str, default: &'m str) -> &'m str {
        self.document_attribute(key).unwrap_or(default)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, id: TopicId) -> Result<Option<TopicId>, ModelError> {
        Ok(self.topic(id)?.parent())
    }

    pub fn children(&self, id: TopicId) -> Result<&[TopicId], ModelError> {
        Ok(self.topic(id)?.children())
    }

    /// Distance from the root; the root has depth 0
    pub fn depth(&self, id: TopicId) -> Result<usize, ModelError> {
        Ok(self.path(id)?.len() - 1)
    }

    /// Topics from the root down to `id`, both included
    pub fn path(&self, id: TopicId) -> Result<Vec<TopicId>, ModelError> {
        let mut path = vec![id];
        let mut current = self.topic(id)?.parent();
        while let Some(parent) = current {
            path.push(parent);
            current = self.topic(parent)?.parent();
        }
        path.reverse();
        Ok(path)
    }

    /// Child indices along the path, starting with `0` for the root
    pub fn position_path(&self, id: TopicId) -> Result<Vec<usize>, ModelError> {
        let path = self.path(id)?;
        let mut positions = Vec::with_capacity(path.len());
        positions.push(0);
        for pair in path.windows(2) {
            let position = self
                .topic(pair[0])?
                .children()
                .iter()
                .position(|child| *child == pair[1])
                .ok_or(ModelError::UnknownTopic(pair[1]))?;
            positions.push(position);
        }
        Ok(positions)
    }

    /// Inverse of [`MindMap::position_path`]
    pub fn topic_at_position_path(&self, positions: &[usize]) -> Option<TopicId> {
        let (_, rest) = positions.split_first()?;
        let mut current = self.root;
        for position in rest {
            current = *self.topic(current).ok()?.children().get(*position)?;
        }
        Some(current)
    }

    /// Check if `ancestor` is a strict ancestor of `id`
    pub fn has_ancestor(&self, id: TopicId, ancestor: TopicId) -> Result<bool, ModelError> {
        self.slot_index(ancestor)?;
        let mut current = self.topic(id)?.parent();
        while let Some(parent) = current {
            if parent == ancestor {
                return Ok(true);
            }
            current = self.topic(parent)?.parent();
        }
        Ok(false)
    }

    pub fn index_in_parent(&self, id: TopicId) -> Result<Option<usize>, ModelError> {
        match self.topic(id)?.parent() {
            Some(parent) => Ok(self.topic(parent)?.children().iter().position(|c| *c == id)),
            None => Ok(None),
        }
    }

    /// First following sibling accepted by `predicate`
    pub fn find_next(
        &self,
        id: TopicId,
        mut predicate: impl FnMut(&Topic) -> bool,
    ) -> Result<Option<TopicId>, ModelError> {
        let Some(parent) = self.topic(id)?.parent() else {
            return Ok(None);
        };
        let siblings = self.topic(parent)?.children();
        let Some(position) = siblings.iter().position(|c| *c == id) else {
            return Ok(None);
        };
        for sibling in &siblings[position + 1..] {
            if predicate(self.topic(*sibling)?) {
                return Ok(Some(*sibling));
            }
        }
        Ok(None)
    }

    /// Nearest preceding sibling accepted by `predicate`
    pub fn find_prev(
        &self,
        id: TopicId,
        mut predicate: impl FnMut(&Topic) -> bool,
    ) -> Result<Option<TopicId>, ModelError> {
        let Some(parent) = self.topic(id)?.parent() else {
            return Ok(None);
        };
        let siblings = self.topic(parent)?.children();
        let Some(position) = siblings.iter().position(|c| *c == id) else {
            return Ok(None);
        };
        for sibling in siblings[..position].iter().rev() {
            if predicate(self.topic(*sibling)?) {
                return Ok(Some(*sibling));
            }
        }
        Ok(None)
    }

    /// All topics carrying an extra of the type, in pre-order
    pub fn find_all_with_extra(&self, extra_type: ExtraType) -> Vec<TopicId> {
        self.iter()
            .filter(|(_, topic)| topic.extra(extra_type).is_some())
            .map(|(id, _)| id)
            .collect()
    }

    /// Value of `key` on the nearest strict ancestor that has it
    pub fn find_attribute_in_ancestors(&self, id: TopicId, key: &str) -> Result<Option<&str>, ModelError> {
        let mut current = self.topic(id)?.parent();
        while let Some(parent) = current {
            let topic = self.topic(parent)?;
            if let Some(value) = topic.attribute(key) {
                return Ok(Some(value));
            }
            current = topic.parent();
        }
        Ok(None)
    }

    /// Remove the keys from every topic of the subtree; `true` if any was set
    pub fn remove_attribute_from_subtree(&mut self, id: TopicId, keys: &[&str]) -> Result<bool, ModelError> {
        let ids: Vec<TopicId> = self.descendants(id)?.map(|(topic_id, _)| topic_id).collect();
        let mut removed = false;
        for topic_id in ids {
            let topic = self.topic_mut(topic_id)?;
            for key in keys {
                removed |= topic.remove_attribute(key).is_some();
            }
        }
        Ok(removed)
    }

    /// Remove extras of the types from every topic of the subtree
    pub fn remove_extra_from_subtree(&mut self, id: TopicId, types: &[ExtraType]) -> Result<bool, ModelError> {
        let ids: Vec<TopicId> = self.descendants(id)?.map(|(topic_id, _)| topic_id).collect();
        let mut removed = false;
        for topic_id in ids {
            let topic = self.topic_mut(topic_id)?;
            for extra_type in types {
                removed |= topic.remove_extra(*extra_type).is_some();
            }
        }
        Ok(removed)
    }
}
