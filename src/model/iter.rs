//! Depth-first traversal

use super::error::ModelError;
use super::map::MindMap;
use super::topic::{Topic, TopicId};

/// Pre-order iterator over a subtree
///
/// Visits a topic before its children, children in order. The iterator is
/// finite and a new one can be created at any time.
#[derive(Debug, Clone)]
pub struct Descendants<'m> {
    map: &'m MindMap,
    stack: Vec<TopicId>,
}

impl<'m> Iterator for Descendants<'m> {
    type Item = (TopicId, &'m Topic);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.stack.pop()?;
            // handles on the stack come from the map itself
            let Ok(topic) = self.map.topic(id) else {
                continue;
            };
            self.stack.extend(topic.children().iter().rev());
            return Some((id, topic));
        }
    }
}

impl MindMap {
    /// All topics in pre-order, starting with the root
    pub fn iter(&self) -> Descendants<'_> {
        Descendants {
            map: self,
            stack: vec![self.root()],
        }
    }

    /// `id` and everything below it in pre-order
    pub fn descendants(&self, id: TopicId) -> Result<Descendants<'_>, ModelError> {
        self.topic(id)?;
        Ok(Descendants {
            map: self,
            stack: vec![id],
        })
    }
}

impl<'m> IntoIterator for &'m MindMap {
    type Item = (TopicId, &'m Topic);
    type IntoIter = Descendants<'m>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
