use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use url::Url;

use crate::browser::Waits;
use crate::record::RowIndexing;
use crate::{Error, Result, DEFAULT_CREDENTIALS_FILE, DEFAULT_FILE, DEFAULT_LIMIT, DEFAULT_URL};

#[derive(Parser, Debug)]
#[command(name = "glassdoor-scrap")]
#[command(about = "Scrapes employee reviews of a company from Glassdoor into a CSV file")]
#[command(version)]
pub struct Cli {
    /// URL of the company's Glassdoor landing page
    #[arg(short, long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Output file
    #[arg(short, long, default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Run Chrome in headless mode
    #[arg(long)]
    pub headless: bool,

    /// Email address used to sign in to Glassdoor
    #[arg(long)]
    pub username: Option<String>,

    /// Password to sign in to Glassdoor
    #[arg(short, long)]
    pub password: Option<String>,

    /// JSON credentials file with "username" and "password" keys
    #[arg(short, long)]
    pub credentials: Option<PathBuf>,

    /// Max reviews to scrape
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Start scraping from the passed URL
    #[arg(long, alias = "start_from_url")]
    pub start_from_url: bool,

    /// Latest review date to scrape (YYYY-MM-DD). Needs --start-from-url and reviews sorted ASCENDING by date
    #[arg(long, alias = "max_date", value_parser = parse_date)]
    pub max_date: Option<NaiveDate>,

    /// Earliest review date to scrape (YYYY-MM-DD). Needs --start-from-url and reviews sorted DESCENDING by date
    #[arg(long, alias = "min_date", value_parser = parse_date)]
    pub min_date: Option<NaiveDate>,

    /// Row index counts only the reviews that are kept, not every review seen
    #[arg(long)]
    pub index_kept_only: bool,

    /// Seconds to wait for a page to become ready
    #[arg(long, default_value_t = 10)]
    pub wait_timeout: u64,

    /// Verbose logging (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_date(s: &str) -> core::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Stop once a page holds a review past this date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Max(NaiveDate),
    Min(NaiveDate),
}

impl DateBound {
    fn name(&self) -> &'static str {
        match self {
            DateBound::Max(_) => "max_date",
            DateBound::Min(_) => "min_date",
        }
    }

    /// The review order the bound needs so the boundary is crossed exactly once.
    pub fn requires_ascending(&self) -> bool {
        matches!(self, DateBound::Max(_))
    }

    /// `true` if the newest date passes a max bound or the oldest one passes a min bound.
    pub fn is_crossed_by(&self, dates: impl IntoIterator<Item = NaiveDate>) -> bool {
        match self {
            DateBound::Max(max) => dates.into_iter().max().is_some_and(|d| d > *max),
            DateBound::Min(min) => dates.into_iter().min().is_some_and(|d| d < *min),
        }
    }

    /// Checks the `sort.ascending` query parameter of the resume URL against the bound.
    pub fn verify_sorting(&self, url: &str) -> Result<()> {
        let url = Url::parse(url)?;
        let ascending = url
            .query_pairs()
            .any(|(key, value)| key == "sort.ascending" && value == "true");

        if ascending == self.requires_ascending() {
            return Ok(());
        }
        Err(Error::SortOrderMismatch {
            bound: self.name(),
            required: if self.requires_ascending() {
                "ASCENDING"
            } else {
                "DESCENDING"
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Go to the landing page and follow its "Reviews" link.
    Landing,
    /// The URL already points at a reviews page.
    ResumeFromUrl,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    pub output: PathBuf,
    pub headless: bool,
    pub credentials: Credentials,
    pub limit: usize,
    pub start: StartMode,
    pub date_bound: Option<DateBound>,
    pub row_indexing: RowIndexing,
    pub waits: Waits,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::from_cli_with_default_credentials(cli, Path::new(DEFAULT_CREDENTIALS_FILE))
    }

    /// Validates the arguments. Nothing here touches the browser.
    pub fn from_cli_with_default_credentials(cli: Cli, default_credentials: &Path) -> Result<Self> {
        let date_bound = match (cli.max_date, cli.min_date) {
            (Some(_), Some(_)) if !cli.start_from_url => return Err(Error::DateBoundWithoutStartUrl),
            (Some(_), Some(_)) => return Err(Error::ConflictingDateBounds),
            (Some(max), None) => Some(DateBound::Max(max)),
            (None, Some(min)) => Some(DateBound::Min(min)),
            (None, None) => None,
        };
        if date_bound.is_some() && !cli.start_from_url {
            return Err(Error::DateBoundWithoutStartUrl);
        }
        if let Some(bound) = &date_bound {
            bound.verify_sorting(&cli.url)?;
        }

        let credentials = resolve_credentials(
            cli.username,
            cli.password,
            cli.credentials.as_deref(),
            default_credentials,
        )?;

        Ok(Self {
            url: cli.url,
            output: cli.file,
            headless: cli.headless,
            credentials,
            limit: cli.limit,
            start: if cli.start_from_url {
                StartMode::ResumeFromUrl
            } else {
                StartMode::Landing
            },
            date_bound,
            row_indexing: if cli.index_kept_only {
                RowIndexing::KeptOnly
            } else {
                RowIndexing::AllSeen
            },
            waits: Waits {
                timeout: Duration::from_secs(cli.wait_timeout),
                ..Waits::default()
            },
        })
    }
}

/// Inline credentials win, then an explicit credentials file, then the default file if it exists.
pub fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
    file: Option<&Path>,
    default_file: &Path,
) -> Result<Credentials> {
    if let (Some(username), Some(password)) = (username, password) {
        return Ok(Credentials { username, password });
    }
    if let Some(path) = file {
        return Credentials::from_file(path);
    }
    if default_file.exists() {
        return Credentials::from_file(default_file);
    }
    Err(Error::MissingCredentials)
}
