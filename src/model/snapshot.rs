//! Owned tree snapshots for comparison and export

use indexmap::IndexMap;

use super::extra::Extra;
use super::map::MindMap;
use super::topic::TopicId;

/// A topic and its subtree, detached from any map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopicTree {
    pub text: String,
    pub attributes: IndexMap<String, String>,
    /// Extras in write order
    pub extras: Vec<Extra>,
    pub code_snippets: IndexMap<String, String>,
    pub children: Vec<TopicTree>,
}

impl TopicTree {
    /// Leaf with a title
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<TopicTree>) -> Self {
        self.children = children;
        self
    }

    /// Number of topics in this tree
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TopicTree::size).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path, counting edges
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}

/// A whole document, detached from any map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MindMapTree {
    pub attributes: IndexMap<String, String>,
    pub root: TopicTree,
}

impl MindMap {
    /// Snapshot of the whole document
    pub fn to_tree(&self) -> MindMapTree {
        MindMapTree {
            attributes: self.document_attributes().clone(),
            root: self.subtree_to_tree(self.root()),
        }
    }

    /// Snapshot of one subtree; empty for a handle not in this map
    pub fn subtree_to_tree(&self, id: TopicId) -> TopicTree {
        let Ok(topic) = self.topic(id) else {
            return TopicTree::default();
        };
        TopicTree {
            text: topic.text().to_string(),
            attributes: topic.attributes().clone(),
            extras: topic.extras().cloned().collect(),
            code_snippets: topic.code_snippets().clone(),
            children: topic
                .children()
                .iter()
                .map(|child| self.subtree_to_tree(*child))
                .collect(),
        }
    }
}
