//! Saved catalog progress.
//!
//! `progress.json` holds the done state of every topic (keyed by id) and the
//! topics a user added by hand. It is kept apart from the generated topic
//! list, which each conversion overwrites.

use crate::{Result, TopicError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use topicdeck_protocol::TopicRecord;
use tracing::{debug, instrument, warn};

/// Completion state of one topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    /// Completion flag
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

/// Everything the store persists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Topic id -> completion state
    #[serde(default)]
    pub progress: BTreeMap<String, TopicProgress>,
    /// Topics added by hand, in insertion order
    #[serde(rename = "userTopics", default)]
    pub user_topics: Vec<TopicRecord>,
}

/// JSON file holding a [`ProgressState`]
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store backed by the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the saved state.
    ///
    /// A missing file is an empty state. A file that does not parse is
    /// logged and treated as empty too, so a corrupt store never blocks
    /// loading the topics themselves.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<ProgressState> {
        if !self.path.exists() {
            return Ok(ProgressState::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Ignoring unreadable progress file: {}", e);
                Ok(ProgressState::default())
            }
        }
    }

    /// Replace the saved state atomically
    #[instrument(skip(self, state), fields(path = %self.path.display()))]
    pub fn save(&self, state: &ProgressState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| TopicError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(json.as_bytes())?;
        staged.flush()?;
        staged.persist(&self.path).map_err(|e| e.error)?;

        debug!(
            "Saved progress for {} topics, {} user topics",
            state.progress.len(),
            state.user_topics.len()
        );
        Ok(())
    }
}
