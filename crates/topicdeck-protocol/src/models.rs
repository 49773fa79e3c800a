use serde::{Deserialize, Serialize};

/// A single topic: one non-empty cell of the delimited input, tagged with
/// the header of the column it came from.
///
/// Serialized field order is `id`, `title`, `category`, `done`.
/// `completedAt` only appears once a topic has been marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Content fingerprint of `(title, category)`, e.g. `"t6e9e487c5c"`
    pub id: String,
    /// Trimmed cell text, never empty
    pub title: String,
    /// Column header, or `""` for cells past the header width
    pub category: String,
    /// Completion flag; always `false` on generation
    #[serde(default)]
    pub done: bool,
    /// Epoch milliseconds at which the topic was marked done
    #[serde(
        rename = "completedAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_at: Option<i64>,
}

impl TopicRecord {
    /// Create an open topic with the given id, title and category
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            done: false,
            completed_at: None,
        }
    }

    /// Mark the topic done at the given timestamp
    pub fn with_completed_at(mut self, completed_at: i64) -> Self {
        self.done = true;
        self.completed_at = Some(completed_at);
        self
    }

    /// Whether the topic carries a category label
    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}
