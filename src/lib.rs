//! Schedule Title Checker - find broadcast titles the search service does not know
//!
//! This library reads broadcast listing schedules, searches for every program
//! title, and reports which titles come back without any results.

mod display;
mod file_resolver;
mod prompt;
mod schedule;
mod search;

use file_resolver::scan_for_schedules;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// Re-export error types
pub use file_resolver::FileResolverError;
pub use schedule::ScheduleError;
pub use search::{AnalyzeError, SearchError};

pub use display::{display_match, strip_markup};
pub use file_resolver::ScheduleFile;
pub use prompt::{PromptResponse, read_line};
pub use schedule::{Listing, Schedule, load_schedule, parse_schedule};
pub use search::{
    DEFAULT_CUSTOMER_ID, DEFAULT_ENDPOINT, DEFAULT_PARTNER_ID, DEFAULT_RESPONSE_FORMAT,
    DEFAULT_RESULT_CAP, DEFAULT_TIMEOUT, Match, NO_RESULTS_SENTINEL, Outcome, SearchClient,
    SearchConfig, VeveoClient, analyze,
};

/// What to do when a search request fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log the failure and continue with the next title
    #[default]
    SkipTitle,
    /// Stop the whole run on the first network or read failure
    Abort,
}

/// Progress event emitted during a check run
///
/// These events allow library users to show what the pipeline is doing,
/// or to stay silent.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Run started
    Started { directory: PathBuf },

    /// Scanning the working folder for schedule files
    ScanningFiles,

    /// Schedule files found
    FilesFound { count: usize },

    /// Processing a specific schedule file
    ProcessingFile {
        index: usize,
        total: usize,
        path: PathBuf,
    },

    /// Schedule parsed
    ScheduleLoaded {
        path: PathBuf,
        channel_id: String,
        listings: Vec<Listing>,
    },

    /// Schedule could not be read or parsed; it contributes no titles
    ScheduleFailed { path: PathBuf, error: String },

    /// Search request about to be sent
    Searching { title: String, url: String },

    /// Raw response body received
    ResponseReceived { title: String, body: String },

    /// Title analyzed
    TitleChecked { outcome: Outcome },

    /// Title could not be checked
    TitleFailed { title: String, error: String },

    /// Run complete
    Complete {
        searches: usize,
        no_match_count: usize,
        failure_count: usize,
    },
}

/// A title that could not be checked, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleFailure {
    pub title: String,
    pub reason: String,
}

/// Result of a complete check run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    /// Schedules parsed successfully
    pub files_processed: usize,
    /// Schedules skipped because they could not be read or parsed
    pub files_failed: usize,
    /// Search requests sent
    pub searches: usize,
    /// Analyzed titles in processing order
    pub outcomes: Vec<Outcome>,
    /// Titles whose search or analysis failed
    pub failures: Vec<TitleFailure>,
}

impl CheckReport {
    /// Titles the search service returned "No Results" for
    pub fn no_match_titles(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_no_match())
            .map(Outcome::title)
            .collect()
    }

    pub fn matched_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_no_match()).count()
    }
}

/// Top-level error type for check operations
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Error while locating schedule files
    #[error("File resolution error: {0}")]
    FileResolver(#[from] FileResolverError),

    /// Error while talking to the search service
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Error while analyzing a search response
    #[error("Response analysis error: {0}")]
    Analyze(#[from] AnalyzeError),
}

/// Searches for a single title and classifies the response
///
/// Builds the query from `config`, sends it through `client` and analyzes
/// the body. Progress events are emitted for each step.
pub fn check_title<C, F>(
    title: &str,
    config: &SearchConfig,
    client: &C,
    progress_callback: &mut F,
) -> Result<Outcome, CheckerError>
where
    C: SearchClient + ?Sized,
    F: FnMut(ProgressEvent),
{
    let url = config.build_query(title);
    progress_callback(ProgressEvent::Searching {
        title: title.to_string(),
        url: url.to_string(),
    });

    let body = client.execute_search(&url)?;
    progress_callback(ProgressEvent::ResponseReceived {
        title: title.to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let outcome = analyze(title, &body)?;
    progress_callback(ProgressEvent::TitleChecked {
        outcome: outcome.clone(),
    });

    Ok(outcome)
}

/// Checks every schedule title under a directory against the search service
///
/// This function scans the given directory recursively for schedule XML
/// files, extracts the program titles from each one, and searches for each
/// title in turn. Files are handled one at a time, titles in document order,
/// with a single request per title.
///
/// Unreadable or malformed schedules are logged and skipped. A malformed
/// search response fails only its own title. Network and read failures
/// follow `failure_policy`.
///
/// # Arguments
///
/// * `directory` - The working folder containing schedule files
/// * `config` - Fixed search parameters
/// * `client` - Client used to send search requests
/// * `failure_policy` - Whether a failed request skips the title or aborts the run
/// * `progress_callback` - Closure called with progress events (can be empty for silent operation)
///
/// # Examples
///
/// ```no_run
/// use schedule_title_checker::{
///     check_schedules, FailurePolicy, SearchConfig, VeveoClient, DEFAULT_ENDPOINT,
/// };
/// use std::path::Path;
///
/// let config = SearchConfig::new(DEFAULT_ENDPOINT).unwrap();
/// let client = VeveoClient::new(&config).unwrap();
/// let report = check_schedules(
///     Path::new("/data/schedules"),
///     &config,
///     &client,
///     FailurePolicy::SkipTitle,
///     |_| {},
/// )
/// .unwrap();
///
/// for title in report.no_match_titles() {
///     println!("Not found: {}", title);
/// }
/// ```
pub fn check_schedules<C, F>(
    directory: &Path,
    config: &SearchConfig,
    client: &C,
    failure_policy: FailurePolicy,
    mut progress_callback: F,
) -> Result<CheckReport, CheckerError>
where
    C: SearchClient + ?Sized,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::Started {
        directory: directory.to_path_buf(),
    });

    progress_callback(ProgressEvent::ScanningFiles);
    let files = scan_for_schedules(directory)?;
    progress_callback(ProgressEvent::FilesFound { count: files.len() });

    let mut report = CheckReport::default();

    for (index, file) in files.iter().enumerate() {
        progress_callback(ProgressEvent::ProcessingFile {
            index,
            total: files.len(),
            path: file.path.clone(),
        });

        let schedule = match schedule::load_schedule(&file.path) {
            Ok(schedule) => schedule,
            Err(e) => {
                warn!(file = %file.path.display(), error = %e, "skipping schedule");
                report.files_failed += 1;
                progress_callback(ProgressEvent::ScheduleFailed {
                    path: file.path.clone(),
                    error: e.to_string(),
                });
                continue;
            }
        };

        report.files_processed += 1;
        let titles = schedule.titles();
        progress_callback(ProgressEvent::ScheduleLoaded {
            path: file.path.clone(),
            channel_id: schedule.channel_id,
            listings: schedule.listings,
        });

        for title in titles {
            report.searches += 1;

            match check_title(&title, config, client, &mut progress_callback) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    warn!(
                        file = %file.path.display(),
                        title = %title,
                        error = %e,
                        "title check failed"
                    );
                    progress_callback(ProgressEvent::TitleFailed {
                        title: title.clone(),
                        error: e.to_string(),
                    });

                    if failure_policy == FailurePolicy::Abort
                        && matches!(e, CheckerError::Search(_))
                    {
                        return Err(e);
                    }

                    report.failures.push(TitleFailure {
                        title,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    info!(
        files = report.files_processed,
        searches = report.searches,
        no_match = report.no_match_titles().len(),
        failures = report.failures.len(),
        "check complete"
    );
    progress_callback(ProgressEvent::Complete {
        searches: report.searches,
        no_match_count: report.no_match_titles().len(),
        failure_count: report.failures.len(),
    });

    Ok(report)
}
