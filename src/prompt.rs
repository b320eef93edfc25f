//! Interactive prompt module
//!
//! This module reads single lines from the terminal with a per-prompt input
//! history that survives between runs.

use dialoguer::{History, Input};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maximum number of lines kept per history file
const MAX_HISTORY_ENTRIES: usize = 500;

/// What the operator typed at a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    /// A line of input (may be empty)
    Line(String),
    /// Input was closed or the terminal is unavailable
    EndOfInput,
}

/// Prompt history stored as a plain text file, one entry per line.
///
/// The file keeps the newest entry last. Failures to read or write the file
/// are logged and otherwise ignored, so a broken history never blocks input.
#[derive(Debug)]
pub(crate) struct FileHistory {
    path: PathBuf,
    /// Oldest first
    entries: VecDeque<String>,
}

impl FileHistory {
    /// Opens the history stored at `path`, starting empty if it does not exist
    pub(crate) fn open(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => VecDeque::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read prompt history");
                VecDeque::new()
            }
        };

        let mut history = Self {
            path: path.to_path_buf(),
            entries,
        };
        history.truncate();
        history
    }

    /// Opens the history file belonging to `history_key` in the temp directory
    pub(crate) fn for_key(history_key: &str) -> Self {
        Self::open(&history_path(history_key))
    }

    fn truncate(&mut self) {
        while self.entries.len() > MAX_HISTORY_ENTRIES {
            self.entries.pop_front();
        }
    }

    fn persist(&self) -> io::Result<()> {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(entry);
            content.push('\n');
        }
        fs::write(&self.path, content)
    }
}

impl<T: ToString> History<T> for FileHistory {
    fn read(&self, pos: usize) -> Option<String> {
        self.entries.iter().rev().nth(pos).cloned()
    }

    fn write(&mut self, val: &T) {
        let line = val.to_string().replace(['\r', '\n'], " ");
        if line.trim().is_empty() || self.entries.back() == Some(&line) {
            return;
        }

        self.entries.push_back(line);
        self.truncate();

        if let Err(e) = self.persist() {
            warn!(path = %self.path.display(), error = %e, "failed to write prompt history");
        }
    }
}

/// Path of the history file for `history_key`
pub(crate) fn history_path(history_key: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{history_key}.tmp"))
}

/// Asks for one line of input labelled `label`
///
/// Any input error (closed stdin, no terminal) is reported as
/// `PromptResponse::EndOfInput`.
pub fn read_line(label: &str, history_key: &str) -> PromptResponse {
    let mut history = FileHistory::for_key(history_key);

    let result = Input::<String>::new()
        .with_prompt(label)
        .allow_empty(true)
        .history_with(&mut history)
        .interact_text();

    match result {
        Ok(line) => PromptResponse::Line(line),
        Err(e) => {
            debug!(prompt = label, error = %e, "prompt closed");
            PromptResponse::EndOfInput
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(history: &mut FileHistory, line: &str) {
        History::<String>::write(history, &line.to_string());
    }

    fn read(history: &FileHistory, pos: usize) -> Option<String> {
        History::<String>::read(history, pos)
    }

    #[test]
    fn test_history_path_uses_key() {
        let path = history_path("workingFolder");
        assert_eq!(path.file_name().unwrap(), "workingFolder.tmp");
        assert!(path.starts_with(std::env::temp_dir()));
    }

    #[test]
    fn test_missing_history_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let history = FileHistory::open(&temp_dir.path().join("missing.tmp"));
        assert_eq!(read(&history, 0), None);
    }

    #[test]
    fn test_newest_entry_is_read_first() {
        let temp_dir = TempDir::new().unwrap();
        let mut history = FileHistory::open(&temp_dir.path().join("h.tmp"));
        write(&mut history, "/data/first");
        write(&mut history, "/data/second");

        assert_eq!(read(&history, 0).as_deref(), Some("/data/second"));
        assert_eq!(read(&history, 1).as_deref(), Some("/data/first"));
        assert_eq!(read(&history, 2), None);
    }

    #[test]
    fn test_history_persists_between_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("h.tmp");
        {
            let mut history = FileHistory::open(&path);
            write(&mut history, "サンプル番組");
        }

        let history = FileHistory::open(&path);
        assert_eq!(read(&history, 0).as_deref(), Some("サンプル番組"));
    }

    #[test]
    fn test_empty_and_repeated_lines_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut history = FileHistory::open(&temp_dir.path().join("h.tmp"));
        write(&mut history, "same");
        write(&mut history, "same");
        write(&mut history, "   ");
        assert_eq!(read(&history, 0).as_deref(), Some("same"));
        assert_eq!(read(&history, 1), None);
    }

    #[test]
    fn test_history_is_capped() {
        let temp_dir = TempDir::new().unwrap();
        let mut history = FileHistory::open(&temp_dir.path().join("h.tmp"));
        for i in 0..MAX_HISTORY_ENTRIES + 10 {
            write(&mut history, &format!("entry {i}"));
        }
        assert_eq!(read(&history, MAX_HISTORY_ENTRIES), None);
        assert_eq!(
            read(&history, MAX_HISTORY_ENTRIES - 1).as_deref(),
            Some("entry 10")
        );
    }
}
