//! File resolver module for locating schedule documents
//!
//! This module walks a working folder and collects the schedule XML files
//! that should be checked.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during file resolution
#[derive(Debug, Error)]
pub enum FileResolverError {
    /// Path is not a directory
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Failed to read directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDirectoryFailed { path: PathBuf, source: io::Error },
}

/// Represents a schedule document found on disk
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduleFile {
    /// Path to the schedule file
    pub path: PathBuf,
}

/// Walks `dir_path` recursively and returns every schedule file, sorted by path
///
/// Directories are descended into but never returned themselves; symlinks
/// to directories are not followed. Only files with an `.xml` extension
/// (any case) are collected.
/// Subdirectories or entries that cannot be read are logged and skipped; only
/// a root that cannot be read at all is an error.
pub(crate) fn scan_for_schedules(dir_path: &Path) -> Result<Vec<ScheduleFile>, FileResolverError> {
    if !dir_path.is_dir() {
        return Err(FileResolverError::NotADirectory(dir_path.to_path_buf()));
    }

    let mut schedule_files = Vec::new();
    let entries = fs::read_dir(dir_path).map_err(|e| FileResolverError::ReadDirectoryFailed {
        path: dir_path.to_path_buf(),
        source: e,
    })?;
    collect_entries(entries, dir_path, &mut schedule_files);

    schedule_files.sort();
    Ok(schedule_files)
}

fn collect_entries(entries: fs::ReadDir, dir_path: &Path, schedule_files: &mut Vec<ScheduleFile>) {
    for entry in entries {
        let (path, file_type) = match entry.and_then(|entry| Ok((entry.path(), entry.file_type()?))) {
            Ok(found) => found,
            Err(e) => {
                warn!(directory = %dir_path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        // `DirEntry::file_type` does not follow symlinks, so linked
        // directories are never descended into.
        if file_type.is_dir() {
            match fs::read_dir(&path) {
                Ok(sub_entries) => collect_entries(sub_entries, &path, schedule_files),
                Err(e) => {
                    warn!(directory = %path.display(), error = %e, "skipping unreadable directory");
                }
            }
        } else if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "not following directory symlink");
        } else if path.is_file() && is_schedule_file(&path) {
            schedule_files.push(ScheduleFile { path });
        }
    }
}

fn is_schedule_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}
