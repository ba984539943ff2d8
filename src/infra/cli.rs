use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

/// Every option falls back to its environment variable, then to a built-in default.
#[derive(Parser, Debug, Default)]
#[command(name = "active-users")]
#[command(version, about = "Count active users through the platform admin API", long_about = None)]
pub struct Cli {
    /// API key sent in the Authorization header [env: ACTIVE_USERS_API_KEY]
    #[arg(short, long)]
    pub key: Option<String>,

    /// Admin API base URL [env: ACTIVE_USERS_BASE_URL, default: https://g.codefresh.io/api]
    #[arg(short, long)]
    pub url: Option<String>,

    /// Collection to sweep, relative to the base URL [env: ACTIVE_USERS_RESOURCE]
    #[arg(long)]
    pub resource: Option<String>,

    /// Records per page [env: ACTIVE_USERS_BATCH_SIZE, default: 1000]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub batch: Option<u32>,

    /// Stop after this many pages, for testing [env: ACTIVE_USERS_BATCH_LIMIT]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Months a user may go without logging in and still count as active [default: 3]
    #[arg(short, long)]
    pub months: Option<u32>,

    /// Days added to the months offset [default: 0]
    #[arg(short, long)]
    pub days: Option<u32>,

    /// Measure the window from midnight instead of the current hour and minute
    #[arg(long)]
    pub midnight: bool,

    /// Pages fetched in parallel once the page count is known [default: 1]
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub concurrency: Option<u32>,

    /// Seconds between progress log lines [default: 5]
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Evaluate the window as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,

    /// Write the fetched records to this file, as JSON keyed by user id (not the older users.yml YAML)
    #[arg(long, value_name = "PATH")]
    pub save_records: Option<PathBuf>,

    /// Classify records from a JSON file written by --save-records instead of calling the API
    #[arg(long, value_name = "PATH", conflicts_with = "save_records")]
    pub load_records: Option<PathBuf>,
}
