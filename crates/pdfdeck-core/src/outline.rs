//! The user-curated topic outline.

use serde::{Deserialize, Serialize};

use crate::error::OutlineError;

/// Prefix of ids minted locally, keeping them apart from server-issued ids.
pub const LOCAL_ID_PREFIX: &str = "manual-";

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Topic {
    /// Whether this topic was added by the user rather than extracted.
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }
}

/// Ordered topic collection with unique ids.
///
/// Order is insertion order and is the order handed to generation. Every
/// operation validates before it touches the collection, so a rejected call
/// leaves it exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    topics: Vec<Topic>,
    /// Session-monotonic; not reset by `replace_all`.
    next_local: u64,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.id == id)
    }

    /// Copy of the current order, as handed to a generation request.
    pub fn snapshot(&self) -> Vec<Topic> {
        self.topics.clone()
    }

    /// Append a new topic with a locally minted id.
    pub fn add(&mut self, title: &str, description: &str) -> Result<Topic, OutlineError> {
        let (title, description) = validate(title, description)?;
        let topic = Topic {
            id: self.mint_id(),
            title,
            description,
        };
        self.topics.push(topic.clone());
        Ok(topic)
    }

    /// Replace title and description of the topic with `id`, keeping its position.
    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<Topic, OutlineError> {
        let (title, description) = validate(title, description)?;
        let topic = self
            .topics
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| OutlineError::NotFound { id: id.to_string() })?;
        topic.title = title;
        topic.description = description;
        Ok(topic.clone())
    }

    /// Remove the topic with `id`. Removing an absent id is a no-op.
    ///
    /// Returns the removed topic, if there was one.
    pub fn remove(&mut self, id: &str) -> Option<Topic> {
        let idx = self.position(id)?;
        Some(self.topics.remove(idx))
    }

    /// Discard the current collection and take `topics` in their given order.
    ///
    /// Later duplicates of an id are dropped.
    pub fn replace_all(&mut self, topics: Vec<Topic>) {
        let mut kept: Vec<Topic> = Vec::with_capacity(topics.len());
        for topic in topics {
            if kept.iter().any(|t| t.id == topic.id) {
                log::warn!("dropping duplicate topic id {:?} from extraction", topic.id);
                continue;
            }
            kept.push(topic);
        }
        self.topics = kept;
    }

    /// Drop every topic.
    pub fn clear(&mut self) {
        self.topics.clear();
    }

    fn mint_id(&mut self) -> String {
        loop {
            self.next_local += 1;
            let candidate = format!("{LOCAL_ID_PREFIX}{}", self.next_local);
            if self.get(&candidate).is_none() {
                return candidate;
            }
        }
    }
}

fn validate(title: &str, description: &str) -> Result<(String, String), OutlineError> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() {
        return Err(OutlineError::EmptyTitle);
    }
    if description.is_empty() {
        return Err(OutlineError::EmptyDescription);
    }
    Ok((title.to_string(), description.to_string()))
}
