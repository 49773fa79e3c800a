//! In-memory topic catalog.
//!
//! Loads the generated topic list (or converts the sheet when no list
//! exists yet) and offers the browsing operations a front end needs:
//! category listing, filtered and sorted queries, random picks, completion
//! toggling, and user-added topics. Done state and user topics survive
//! reloads through the [`ProgressStore`].

use crate::config::ConvertConfig;
use crate::convert::convert_file;
use crate::identity::topic_id;
use crate::progress::{ProgressState, ProgressStore, TopicProgress};
use crate::{Result, TopicError};
use chrono::{DateTime, TimeZone, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use topicdeck_protocol::TopicRecord;
use tracing::{debug, info, warn};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where a catalog's topics were read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSource {
    /// A previously generated JSON topic list
    Json(PathBuf),
    /// The delimited sheet, converted on the fly
    Delimited(PathBuf),
}

/// Completion-time filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionWindow {
    /// No filtering
    #[default]
    All,
    /// Done on the same calendar day as `now`
    Today,
    /// Done within the last `n` days
    LastDays(u32),
    /// Open, or done without a timestamp
    Never,
}

/// Ordering applied to query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Most recently completed first; open topics last, by title
    #[default]
    DateDesc,
    /// Oldest completion first; open topics last, by title
    DateAsc,
    /// Title A→Z, case-insensitive
    Alpha,
    /// Title Z→A, case-insensitive
    AlphaDesc,
    /// Category A→Z, then title
    Category,
}

/// Filter and ordering for [`TopicCatalog::query`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicQuery {
    /// Case-insensitive substring matched against `"<title> <category>"`
    pub search: String,
    /// Exact category to keep; `None` keeps all
    pub category: Option<String>,
    /// Completion-time window
    pub window: CompletionWindow,
    /// Result ordering
    pub sort: SortMode,
}

/// Ordered collection of topics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCatalog {
    topics: Vec<TopicRecord>,
    user_ids: Vec<String>,
}

impl TopicCatalog {
    /// Wrap an already-built list of topics
    pub fn new(topics: Vec<TopicRecord>) -> Self {
        Self {
            topics,
            user_ids: Vec::new(),
        }
    }

    /// Build a catalog from loosely-typed JSON objects
    pub fn from_json_values(values: &[Value]) -> Self {
        Self::new(normalize_records(values))
    }

    /// Load topics for the configured directory.
    ///
    /// The JSON list wins when it exists and holds an array; otherwise the
    /// delimited sheet is converted. Saved progress is applied on top.
    pub fn load(config: &ConvertConfig) -> Result<(Self, TopicSource)> {
        let (mut catalog, source) = Self::load_topics(config)?;
        let state = ProgressStore::new(&config.progress).load()?;
        catalog.apply_progress(&state);
        Ok((catalog, source))
    }

    fn load_topics(config: &ConvertConfig) -> Result<(Self, TopicSource)> {
        if config.output.exists() {
            match read_json_array(&config.output) {
                Ok(values) => {
                    let catalog = Self::from_json_values(&values);
                    info!(
                        "Loaded {} topics from {}",
                        catalog.len(),
                        config.output.display()
                    );
                    return Ok((catalog, TopicSource::Json(config.output.clone())));
                }
                Err(e) => warn!(
                    "Ignoring unreadable topic list {}: {}",
                    config.output.display(),
                    e
                ),
            }
        }

        if config.input.exists() {
            let catalog = Self::new(convert_file(config)?);
            info!(
                "Loaded {} topics from {}",
                catalog.len(),
                config.input.display()
            );
            return Ok((catalog, TopicSource::Delimited(config.input.clone())));
        }

        Err(TopicError::NoTopicSource {
            dir: config.directory().to_path_buf(),
        })
    }

    /// All topics in catalog order
    pub fn topics(&self) -> &[TopicRecord] {
        &self.topics
    }

    /// Number of topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the catalog holds no topics
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a topic by id
    pub fn get(&self, id: &str) -> Option<&TopicRecord> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Topics added through [`TopicCatalog::add_topic`] or restored from the
    /// progress store
    pub fn user_topics(&self) -> Vec<&TopicRecord> {
        self.user_ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Merge saved state: append user topics that are not already present,
    /// then restore the done flag and timestamp of every known id
    pub fn apply_progress(&mut self, state: &ProgressState) {
        for topic in &state.user_topics {
            if topic.title.trim().is_empty() || self.get(&topic.id).is_some() {
                continue;
            }
            self.user_ids.push(topic.id.clone());
            self.topics.push(topic.clone());
        }

        for topic in &mut self.topics {
            if let Some(progress) = state.progress.get(&topic.id) {
                topic.done = progress.done;
                topic.completed_at = progress.completed_at;
            }
        }

        debug!(
            "Applied progress: {} entries, {} user topics",
            state.progress.len(),
            self.user_ids.len()
        );
    }

    /// Snapshot of the state worth persisting
    pub fn progress_state(&self) -> ProgressState {
        ProgressState {
            progress: self
                .topics
                .iter()
                .map(|t| {
                    let progress = TopicProgress {
                        done: t.done,
                        completed_at: t.completed_at,
                    };
                    (t.id.clone(), progress)
                })
                .collect(),
            user_topics: self.user_topics().into_iter().cloned().collect(),
        }
    }

    /// Write done state and user topics to the configured progress file
    pub fn save_progress(&self, config: &ConvertConfig) -> Result<()> {
        ProgressStore::new(&config.progress).save(&self.progress_state())
    }

    /// Sorted, de-duplicated, non-empty categories
    pub fn categories(&self) -> Vec<String> {
        self.topics
            .iter()
            .filter(|t| t.has_category())
            .map(|t| t.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Filter and sort topics.
    ///
    /// The completion window is applied first, then the search text, then
    /// the category. `now` fixes both the reference instant and the time
    /// zone used for calendar-day comparisons.
    pub fn query<Tz: TimeZone>(&self, query: &TopicQuery, now: &DateTime<Tz>) -> Vec<&TopicRecord> {
        let needle = query.search.trim().to_lowercase();
        let category = query.category.as_deref().filter(|c| !c.is_empty());

        let mut items: Vec<&TopicRecord> = self
            .topics
            .iter()
            .filter(|t| in_window(t, query.window, now))
            .filter(|t| {
                needle.is_empty()
                    || format!("{} {}", t.title, t.category)
                        .to_lowercase()
                        .contains(&needle)
            })
            .filter(|t| category.map_or(true, |c| t.category == c))
            .collect();

        sort_topics(&mut items, query.sort);
        items
    }

    /// Pick a random open topic, or any topic when all are done
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TopicRecord> {
        let open: Vec<&TopicRecord> = self.topics.iter().filter(|t| !t.done).collect();

        if open.is_empty() {
            self.topics.choose(rng)
        } else {
            open.choose(rng).copied()
        }
    }

    /// Flip a topic's completion flag.
    ///
    /// Marking done stamps `completed_at` with `now`; reopening clears it.
    /// Returns the new flag, or `None` for an unknown id.
    pub fn toggle_done(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let topic = self.topics.iter_mut().find(|t| t.id == id)?;
        topic.done = !topic.done;
        topic.completed_at = topic.done.then(|| now.timestamp_millis());
        debug!("Topic {} done={}", topic.id, topic.done);
        Some(topic.done)
    }

    /// Add a user topic.
    ///
    /// Title and category are trimmed and must both be non-empty; a topic
    /// with the same `(title, category)` must not already exist.
    pub fn add_topic(&mut self, title: &str, category: &str) -> Result<&TopicRecord> {
        let title = title.trim();
        if title.is_empty() {
            return Err(TopicError::EmptyTitle);
        }

        let category = category.trim();
        if category.is_empty() {
            return Err(TopicError::EmptyCategory);
        }

        let id = topic_id(title, category);
        if self.get(&id).is_some() {
            return Err(TopicError::DuplicateTopic { id });
        }

        let index = self.topics.len();
        self.user_ids.push(id.clone());
        self.topics.push(TopicRecord::new(id, title, category));
        Ok(&self.topics[index])
    }
}

/// Normalize loosely-typed topic objects.
///
/// Titles and categories are trimmed, a missing id is recomputed from the
/// pair, `done` follows JSON truthiness and `completedAt` is kept only when
/// it is a positive number. Entries whose title ends up empty are dropped.
pub fn normalize_records(values: &[Value]) -> Vec<TopicRecord> {
    values
        .iter()
        .filter_map(|value| {
            let title = str_field(value, "title").trim();
            if title.is_empty() {
                return None;
            }
            let category = str_field(value, "category").trim();

            let id = match str_field(value, "id") {
                "" => topic_id(title, category),
                id => id.to_string(),
            };

            Some(TopicRecord {
                id,
                title: title.to_string(),
                category: category.to_string(),
                done: value.get("done").is_some_and(is_truthy),
                completed_at: value.get("completedAt").and_then(positive_millis),
            })
        })
        .collect()
}

fn read_json_array(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| TopicError::Serialization(e.to_string()))?;

    match value {
        Value::Array(values) => Ok(values),
        _ => Err(TopicError::Serialization(
            "expected a JSON array of topics".to_string(),
        )),
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn positive_millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .filter(|ms| *ms > 0)
}

fn in_window<Tz: TimeZone>(topic: &TopicRecord, window: CompletionWindow, now: &DateTime<Tz>) -> bool {
    match window {
        CompletionWindow::All => true,
        CompletionWindow::Never => !topic.done || topic.completed_at.is_none(),
        CompletionWindow::Today => {
            topic.done
                && topic
                    .completed_at
                    .and_then(|ms| now.timezone().timestamp_millis_opt(ms).single())
                    .is_some_and(|at| at.date_naive() == now.date_naive())
        }
        CompletionWindow::LastDays(days) => {
            topic.done
                && topic.completed_at.is_some_and(|ms| {
                    now.timestamp_millis() - ms <= i64::from(days) * MILLIS_PER_DAY
                })
        }
    }
}

fn sort_topics(items: &mut [&TopicRecord], mode: SortMode) {
    match mode {
        SortMode::DateDesc => items.sort_by(|a, b| by_completion(a, b, true)),
        SortMode::DateAsc => items.sort_by(|a, b| by_completion(a, b, false)),
        SortMode::Alpha => items.sort_by_cached_key(|t| t.title.to_lowercase()),
        SortMode::AlphaDesc => {
            items.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        SortMode::Category => items.sort_by_cached_key(|t| {
            (t.category.to_lowercase(), t.title.to_lowercase())
        }),
    }
}

/// Completed topics by timestamp, open ones after them ordered by title
fn by_completion(a: &TopicRecord, b: &TopicRecord, newest_first: bool) -> Ordering {
    let stamp = |t: &TopicRecord| t.completed_at.filter(|ms| *ms > 0);

    match (stamp(a), stamp(b)) {
        (None, None) => a.title.cmp(&b.title),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(da), Some(db)) if newest_first => db.cmp(&da),
        (Some(da), Some(db)) => da.cmp(&db),
    }
}
