//! Schedule parser module
//!
//! This module reads broadcast listing schedules (`ListingGroup` documents)
//! and extracts the program titles that should be checked against the
//! search service.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a schedule document
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The schedule file could not be read
    #[error("Failed to read schedule file {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    /// The document is not a well-formed listing schedule
    #[error("Malformed schedule document: {0}")]
    Malformed(String),
}

/// A parsed listing schedule for a single channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// The Gemstar channel identifier (may be empty)
    pub channel_id: String,
    /// Listings in document order
    pub listings: Vec<Listing>,
}

/// A single program listing within a schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub kind: String,
    pub program_id: String,
    /// Title from the short event descriptor, if any
    pub title: Option<String>,
}

impl Schedule {
    /// Returns the titles worth searching for, in document order
    ///
    /// Listings without a title, or with an empty one, are skipped.
    pub fn titles(&self) -> Vec<String> {
        self.listings
            .iter()
            .filter_map(|listing| listing.title.as_deref())
            .filter(|title| !title.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Kind:[{}] - ID[{}] - Title[{}]",
            self.kind,
            self.program_id,
            self.title.as_deref().unwrap_or_default()
        )
    }
}

// Wire types mirroring the XML layout. Kept private; callers get `Schedule`.

#[derive(Debug, Deserialize)]
struct ListingGroupXml {
    #[serde(rename = "GemstarChannelID", default)]
    channel_id: String,
    #[serde(rename = "Listing", default)]
    listings: Vec<ListingXml>,
}

#[derive(Debug, Deserialize)]
struct ListingXml {
    #[serde(rename = "Kind", default)]
    kind: String,
    #[serde(rename = "ProgramID", default)]
    program_id: String,
    #[serde(rename = "short_event_descriptor", default)]
    short_event_descriptor: Option<ShortEventDescriptorXml>,
}

#[derive(Debug, Deserialize)]
struct ShortEventDescriptorXml {
    #[serde(rename = "Title", default)]
    title: Option<String>,
}

impl From<ListingXml> for Listing {
    fn from(listing: ListingXml) -> Self {
        Listing {
            kind: listing.kind,
            program_id: listing.program_id,
            title: listing.short_event_descriptor.and_then(|d| d.title),
        }
    }
}

/// Parses a listing schedule from raw document bytes
///
/// # Errors
///
/// Returns `ScheduleError::Malformed` if the bytes are not valid UTF-8 or
/// the markup cannot be deserialized.
pub fn parse_schedule(bytes: &[u8]) -> Result<Schedule, ScheduleError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| ScheduleError::Malformed(e.to_string()))?;

    let group: ListingGroupXml =
        quick_xml::de::from_str(text).map_err(|e| ScheduleError::Malformed(e.to_string()))?;

    Ok(Schedule {
        channel_id: group.channel_id,
        listings: group.listings.into_iter().map(Listing::from).collect(),
    })
}

/// Reads and parses the schedule stored at `path`
pub fn load_schedule(path: &Path) -> Result<Schedule, ScheduleError> {
    let bytes = fs::read(path).map_err(|e| ScheduleError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_schedule(&bytes)
}
