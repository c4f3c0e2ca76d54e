use std::fmt;

use chrono::Local;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::browser::{ChromeDriver, PageDriver};
use crate::config::{Config, StartMode};
use crate::page::{extract_from_page, PageSettings, RunState};
use crate::pagination::{go_to_next_page, has_next_page};
use crate::record::ReviewTable;
use crate::session::{accept_cookies, navigate_to_reviews, resume_from_url, sign_in};
use crate::writer::write_table;
use crate::{info_time, Result};

/// Why the run stopped asking for new pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    LimitReached,
    DateLimitReached,
    LastPage,
    InvalidPage,
    ExtractionFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::LimitReached => "review limit reached",
            StopReason::DateLimitReached => "date limit reached",
            StopReason::LastPage => "no more pages",
            StopReason::InvalidPage => "page failed to load",
            StopReason::ExtractionFailed => "extraction failed",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub table: ReviewTable,
    pub stop_reason: StopReason,
    pub last_page: u32,
}

/// Launches Chrome, scrapes, and writes whatever was collected to `config.output`.
pub async fn process_site(config: Config) -> Result<()> {
    let start_time = Local::now();
    info_time!("Scraping up to {} reviews.", config.limit);

    let report = spawn_blocking({
        let config = config.clone();
        move || -> Result<ScrapeReport> {
            let driver = ChromeDriver::launch(config.headless)?;
            scrape_reviews(&driver, &config)
        }
    })
    .await??;

    let local_now = Local::now();
    write_table(&report.table, &config.output).await?;
    info_time!(
        local_now,
        "Wrote {} reviews to file {}",
        report.table.len(),
        config.output.display()
    );
    info_time!(start_time, "Finished");

    Ok(())
}

/// Signs in, opens the reviews and extracts page by page until something stops the run.
///
/// Errors before the first page is extracted are fatal. Errors while extracting or
/// paginating end the run and keep the rows collected so far.
pub fn scrape_reviews<D: PageDriver>(driver: &D, config: &Config) -> Result<ScrapeReport> {
    let mut state = open_reviews(driver, config)?;
    accept_cookies(driver, &config.waits)?;

    let settings = PageSettings {
        row_indexing: config.row_indexing,
        date_bound: config.date_bound,
        waits: config.waits,
    };
    let mut table = ReviewTable::new();

    let stop_reason = loop {
        let outcome = match extract_from_page(driver, &mut state, &settings) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to extract page {}: {e}", state.page);
                break StopReason::ExtractionFailed;
            }
        };
        table.extend(outcome.rows);

        if !outcome.valid {
            break StopReason::InvalidPage;
        }
        if outcome.date_limit_reached {
            break StopReason::DateLimitReached;
        }
        if table.len() >= config.limit {
            break StopReason::LimitReached;
        }
        match driver.content() {
            Ok(html) if has_next_page(&html) => {}
            Ok(_) => break StopReason::LastPage,
            Err(e) => {
                warn!("Failed to read page {}: {e}", state.page);
                break StopReason::ExtractionFailed;
            }
        }
        if let Err(e) = go_to_next_page(driver, &mut state, &config.waits) {
            warn!("Failed to go to page {}: {e}", state.page + 1);
            break StopReason::ExtractionFailed;
        }
    };
    info!("Stopped scraping on page {}: {stop_reason}", state.page);

    Ok(ScrapeReport {
        table,
        stop_reason,
        last_page: state.page,
    })
}

fn open_reviews<D: PageDriver>(driver: &D, config: &Config) -> Result<RunState> {
    sign_in(driver, &config.credentials, &config.url, &config.waits)?;

    match config.start {
        StartMode::Landing => {
            navigate_to_reviews(driver, &config.url)?;
            Ok(RunState::default())
        }
        StartMode::ResumeFromUrl => {
            let page = resume_from_url(driver, &config.url, &config.waits)?;
            Ok(RunState::starting_at(page))
        }
    }
}
