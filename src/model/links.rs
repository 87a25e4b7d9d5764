//! Topic-to-topic links through the `topicLinkUID` attribute

use rustc_hash::FxHashMap;
use uuid::Uuid;

use super::attributes::TOPIC_LINK_UID;
use super::error::ModelError;
use super::extra::{Extra, ExtraType};
use super::map::MindMap;
use super::topic::TopicId;

impl MindMap {
    /// Topic whose `topicLinkUID` equals `uid`
    ///
    /// Fails with [`ModelError::DuplicateUid`] when several topics claim it.
    pub fn find_by_uid(&self, uid: &str) -> Result<Option<TopicId>, ModelError> {
        let mut found = None;
        for (id, topic) in self.iter() {
            if topic.attribute(TOPIC_LINK_UID) == Some(uid) {
                if found.is_some() {
                    tracing::warn!(uid, "duplicate topic UID");
                    return Err(ModelError::duplicate_uid(uid));
                }
                found = Some(id);
            }
        }
        Ok(found)
    }

    /// UIDs carried by more than one topic, in first-seen order
    pub fn duplicate_uids(&self) -> Vec<String> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        let mut order = Vec::new();
        for (_, topic) in self.iter() {
            if let Some(uid) = topic.attribute(TOPIC_LINK_UID) {
                let count = counts.entry(uid).or_insert(0);
                *count += 1;
                if *count == 2 {
                    order.push(uid.to_string());
                }
            }
        }
        order
    }

    /// Target of the topic's `TOPIC` extra; `None` when absent or dangling
    pub fn resolve_link(&self, id: TopicId) -> Result<Option<TopicId>, ModelError> {
        match self.topic(id)?.topic_link() {
            Some(uid) => self.find_by_uid(uid),
            None => Ok(None),
        }
    }

    /// `TOPIC` extra pointing at `target`, assigning a fresh UID if needed
    pub fn make_link_to(&mut self, target: TopicId) -> Result<Extra, ModelError> {
        if let Some(uid) = self.topic(target)?.attribute(TOPIC_LINK_UID) {
            return Ok(Extra::topic_link(uid));
        }
        let uid = loop {
            let candidate = Uuid::new_v4().simple().to_string().to_uppercase();
            if self.find_by_uid(&candidate)?.is_none() {
                break candidate;
            }
        };
        self.set_attribute(target, TOPIC_LINK_UID, Some(&uid))?;
        Ok(Extra::topic_link(uid))
    }

    /// Drop `TOPIC` extras whose UID is no longer carried by any topic
    pub(crate) fn remove_links_to(&mut self, uids: &[String]) {
        let dangling: Vec<&String> = uids
            .iter()
            .filter(|uid| {
                !self
                    .iter()
                    .any(|(_, topic)| topic.attribute(TOPIC_LINK_UID) == Some(uid.as_str()))
            })
            .collect();
        if dangling.is_empty() {
            return;
        }
        let sources: Vec<TopicId> = self
            .iter()
            .filter(|(_, topic)| {
                topic
                    .topic_link()
                    .is_some_and(|uid| dangling.iter().any(|d| d.as_str() == uid))
            })
            .map(|(id, _)| id)
            .collect();
        for id in sources {
            if let Ok(topic) = self.topic_mut(id) {
                topic.remove_extra(ExtraType::Topic);
                tracing::warn!(topic = %id, "removed link to deleted topic");
            }
        }
    }
}
