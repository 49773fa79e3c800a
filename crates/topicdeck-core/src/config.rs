//! Fixed locations for a conversion run.
//!
//! There are no flags and no environment overrides: the input is always
//! `topics.csv` and the output always `topics.json` in the same directory.
//! Catalog progress lives beside them in `progress.json`.

use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the delimited topic sheet
pub const INPUT_FILE_NAME: &str = "topics.csv";
/// File name of the generated topic list
pub const OUTPUT_FILE_NAME: &str = "topics.json";
/// File name of the saved done state and user-added topics
pub const PROGRESS_FILE_NAME: &str = "progress.json";

/// Input and output paths for one conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Delimited topic sheet to read
    pub input: PathBuf,
    /// JSON topic list to (over)write
    pub output: PathBuf,
    /// Catalog progress store; never touched by conversion
    pub progress: PathBuf,
}

impl ConvertConfig {
    /// Config for `topics.csv` / `topics.json` inside `dir`
    pub fn beside(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            input: dir.join(INPUT_FILE_NAME),
            output: dir.join(OUTPUT_FILE_NAME),
            progress: dir.join(PROGRESS_FILE_NAME),
        }
    }

    /// Pick the first candidate directory that holds a topic sheet.
    ///
    /// Falls back to the first candidate (or `.`) so that a missing sheet is
    /// reported against the most obvious location.
    pub fn locate_in<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut fallback: Option<PathBuf> = None;

        for dir in candidates {
            if dir.join(INPUT_FILE_NAME).is_file() {
                debug!("Found topic sheet in {}", dir.display());
                return Self::beside(dir);
            }
            fallback.get_or_insert(dir);
        }

        Self::beside(fallback.unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Look for the topic sheet in the working directory, then next to the
    /// executable, then one level above it.
    pub fn locate() -> Self {
        let mut candidates = vec![PathBuf::from(".")];

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        {
            let parent = exe_dir.parent().map(Path::to_path_buf);
            candidates.push(exe_dir);
            candidates.extend(parent);
        }

        Self::locate_in(candidates)
    }

    /// Directory holding the input file
    pub fn directory(&self) -> &Path {
        self.input.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::beside(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_beside_uses_fixed_names() {
        let config = ConvertConfig::beside("/data/topics");
        assert_eq!(config.input, PathBuf::from("/data/topics/topics.csv"));
        assert_eq!(config.output, PathBuf::from("/data/topics/topics.json"));
        assert_eq!(config.progress, PathBuf::from("/data/topics/progress.json"));
        assert_eq!(config.directory(), Path::new("/data/topics"));
    }

    #[test]
    fn test_locate_in_prefers_directory_with_sheet() {
        let empty = TempDir::new().unwrap();
        let filled = TempDir::new().unwrap();
        std::fs::write(filled.path().join(INPUT_FILE_NAME), "A,B\n").unwrap();

        let config = ConvertConfig::locate_in(vec![
            empty.path().to_path_buf(),
            filled.path().to_path_buf(),
        ]);

        assert_eq!(config, ConvertConfig::beside(filled.path()));
    }

    #[test]
    fn test_locate_in_falls_back_to_first_candidate() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        let config = ConvertConfig::locate_in(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);

        assert_eq!(config, ConvertConfig::beside(first.path()));
    }

    #[test]
    fn test_locate_in_without_candidates_uses_current_dir() {
        let config = ConvertConfig::locate_in(Vec::new());
        assert_eq!(config, ConvertConfig::default());
    }
}
