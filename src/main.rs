use clap::{Parser, Subcommand};
use schedule_title_checker::{
    CheckReport, DEFAULT_CUSTOMER_ID, DEFAULT_ENDPOINT, DEFAULT_PARTNER_ID,
    DEFAULT_RESPONSE_FORMAT, DEFAULT_RESULT_CAP, DEFAULT_TIMEOUT, FailurePolicy, Outcome,
    ProgressEvent, PromptResponse, SearchConfig, SearchError, VeveoClient, check_schedules,
    check_title, display_match, read_line,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Check broadcast schedule titles against the search service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Search endpoint
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Partner id sent as XPID
    #[arg(long, global = true, default_value = DEFAULT_PARTNER_ID)]
    partner_id: String,

    /// Customer id sent as custid
    #[arg(long, global = true, default_value = DEFAULT_CUSTOMER_ID)]
    customer_id: String,

    /// Maximum number of results per search (RPR)
    #[arg(long, global = true, default_value_t = DEFAULT_RESULT_CAP)]
    result_cap: u32,

    /// Omit the ECT response format parameter
    #[arg(long, global = true)]
    no_ect: bool,

    /// Request timeout in seconds (at least 1)
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: u64,

    /// Strip markup such as <em> from matched titles when printing
    #[arg(long, global = true)]
    plain: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check every title in the schedule files under a folder (default)
    Check {
        /// Working folder; prompted for when omitted
        #[arg(short, long)]
        folder: Option<PathBuf>,

        /// Stop at the first failed search request instead of skipping the title
        #[arg(long)]
        fail_fast: bool,
    },
    /// Search for single titles; prompts repeatedly when no term is given
    Search {
        /// Title to search for
        term: Option<String>,
    },
}

impl Cli {
    fn search_config(&self) -> Result<SearchConfig, SearchError> {
        let response_format = if self.no_ect {
            None
        } else {
            Some(DEFAULT_RESPONSE_FORMAT.to_string())
        };

        Ok(SearchConfig::new(&self.endpoint)?
            .with_partner_id(self.partner_id.clone())
            .with_customer_id(self.customer_id.clone())
            .with_result_cap(self.result_cap)
            .with_response_format(response_format)
            .with_timeout(Duration::from_secs(self.timeout)))
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "schedule_title_checker=debug"
    } else {
        "schedule_title_checker=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Prints the outcome of a single title
fn print_outcome(outcome: &Outcome, plain: bool) {
    match outcome {
        Outcome::NoMatch { title } => {
            println!("  NO MATCH: '{}'", title);
        }
        Outcome::Matches { title, matches } => {
            println!("  {} match(es) for '{}'", matches.len(), title);
            for candidate in matches {
                println!("    - {}", display_match(candidate, plain));
            }
        }
    }
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent, plain: bool) {
    match event {
        ProgressEvent::Started { directory } => {
            println!("Checking schedule titles in {}...", directory.display());
        }
        ProgressEvent::ScanningFiles => {
            println!("\nScanning for schedule files...");
        }
        ProgressEvent::FilesFound { count } => {
            if count == 0 {
                println!("No schedule files found.");
            } else {
                println!("Found {} schedule file(s)\n", count);
            }
        }
        ProgressEvent::ProcessingFile { index, total, path } => {
            println!("[{}/{}] Processing: {}", index + 1, total, path.display());
        }
        ProgressEvent::ScheduleLoaded {
            channel_id,
            listings,
            ..
        } => {
            println!("Channel ID: {}", channel_id);
            for listing in listings {
                println!("\t{}", listing);
            }
        }
        ProgressEvent::ScheduleFailed { path, .. } => {
            println!("  Skipped unreadable schedule {}", path.display());
        }
        ProgressEvent::Searching { title, url } => {
            println!("--------------------begin---------------------------");
            println!("Search term: {}", title);
            println!("RQ: {}", url);
        }
        ProgressEvent::ResponseReceived { body, .. } => {
            println!("--------------------response------------------------");
            println!("{}", body);
            println!("---------------------end----------------------------");
        }
        ProgressEvent::TitleChecked { outcome } => {
            print_outcome(&outcome, plain);
        }
        ProgressEvent::TitleFailed { title, .. } => {
            println!("  FAILED: '{}' could not be checked", title);
        }
        ProgressEvent::Complete { .. } => {
            println!("\nCheck complete!");
        }
    }
}

fn print_summary(report: &CheckReport) {
    println!("\n=== Summary ===\n");
    println!("Schedules processed: {}", report.files_processed);
    if report.files_failed > 0 {
        println!("Schedules skipped:   {}", report.files_failed);
    }
    println!("Searches sent:       {}", report.searches);
    println!("Titles matched:      {}", report.matched_count());

    let no_match = report.no_match_titles();
    println!("Titles not found:    {}", no_match.len());
    for title in no_match {
        println!("  - {}", title);
    }

    if !report.failures.is_empty() {
        println!("Failed searches:     {}", report.failures.len());
        for failure in &report.failures {
            println!("  - {}: {}", failure.title, failure.reason);
        }
    }
}

fn run_check(
    cli: &Cli,
    config: &SearchConfig,
    client: &VeveoClient,
    folder: Option<PathBuf>,
    fail_fast: bool,
) {
    let directory = match folder {
        Some(folder) => folder,
        None => match read_line("Working Folder", "workingFolder") {
            PromptResponse::Line(line) if !line.trim().is_empty() => PathBuf::from(line.trim()),
            _ => return,
        },
    };

    // Check if directory exists
    if !directory.is_dir() {
        eprintln!("Error: Not a directory: {}", directory.display());
        process::exit(1);
    }

    let failure_policy = if fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::SkipTitle
    };

    let plain = cli.plain;
    match check_schedules(&directory, config, client, failure_policy, |event| {
        handle_progress_event(event, plain)
    }) {
        Ok(report) => print_summary(&report),
        Err(e) => {
            eprintln!("\nError during check: {}", e);
            process::exit(1);
        }
    }
}

fn run_search(cli: &Cli, config: &SearchConfig, client: &VeveoClient, term: Option<String>) {
    let plain = cli.plain;
    let search = |title: &str| {
        if let Err(e) = check_title(title, config, client, &mut |event| {
            handle_progress_event(event, plain)
        }) {
            eprintln!("Search for '{}' failed: {}", title, e);
        }
    };

    if let Some(term) = term {
        search(&term);
        return;
    }

    loop {
        println!("Enter search term (empty string to end):");
        match read_line("Search Term", "searchTerm") {
            PromptResponse::Line(line) if !line.trim().is_empty() => search(line.trim()),
            _ => break,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configuration problems are fatal before any processing starts
    let config = match cli.search_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let client = match VeveoClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match &cli.command {
        None => run_check(&cli, &config, &client, None, false),
        Some(Command::Check { folder, fail_fast }) => {
            run_check(&cli, &config, &client, folder.clone(), *fail_fast)
        }
        Some(Command::Search { term }) => run_search(&cli, &config, &client, term.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = Cli::try_parse_from(["schedule_title_checker", "--timeout", "0", "check"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_timeout_reaches_config() {
        let cli = Cli::try_parse_from(["schedule_title_checker", "--timeout", "7", "check"]).unwrap();
        let config = cli.search_config().unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_no_ect_drops_response_format() {
        let cli = Cli::try_parse_from(["schedule_title_checker", "search", "x", "--no-ect"]).unwrap();
        let url = cli.search_config().unwrap().build_query("x");
        assert!(url.query_pairs().all(|(key, _)| key != "ECT"));
    }
}
