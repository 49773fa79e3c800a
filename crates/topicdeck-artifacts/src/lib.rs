//! Topic list generation for topicdeck

#![warn(missing_docs)]

use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use topicdeck_core::{convert_file, ConvertConfig};
use topicdeck_protocol::TopicRecord;
use tracing::{info, instrument};

/// Outcome of one conversion run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Number of topics written
    pub count: usize,
    /// Location of the written topic list
    pub output: PathBuf,
}

/// Writes topic lists to disk
pub struct TopicWriter {
    output_path: PathBuf,
}

impl TopicWriter {
    /// Create a writer for the given output file
    pub fn new(output_path: impl AsRef<Path>) -> Self {
        Self {
            output_path: output_path.as_ref().to_path_buf(),
        }
    }

    /// Destination file
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Write topics as a pretty-printed JSON array.
    ///
    /// The content goes to a temporary file next to the destination which is
    /// then renamed over it, so readers never observe a half-written list.
    #[instrument(skip(self, topics), fields(count = topics.len()))]
    pub fn write(&self, topics: &[TopicRecord]) -> anyhow::Result<PathBuf> {
        let json = render_json(topics)?;

        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to stage topic list in {}", dir.display()))?;
        staged.write_all(json.as_bytes())?;
        staged.flush()?;
        staged
            .persist(&self.output_path)
            .with_context(|| format!("Failed to write {}", self.output_path.display()))?;

        info!("Wrote topic list: {}", self.output_path.display());
        Ok(self.output_path.clone())
    }
}

/// Render topics the way they are stored on disk: a two-space indented
/// JSON array with non-ASCII text kept literal
pub fn render_json(topics: &[TopicRecord]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(topics)?)
}

/// Convert the configured sheet and overwrite the topic list.
///
/// Nothing is written when the sheet is missing or unreadable.
pub fn run(config: &ConvertConfig) -> anyhow::Result<ConversionSummary> {
    let topics = convert_file(config)?;
    let output = TopicWriter::new(&config.output).write(&topics)?;

    Ok(ConversionSummary {
        count: topics.len(),
        output,
    })
}
