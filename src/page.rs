use tracing::info;

use crate::browser::{PageDriver, Waits};
use crate::config::DateBound;
use crate::parse::{parse_reviews, ReviewEntry, REVIEW};
use crate::record::{RowIndexing, TableRow};
use crate::Result;

/// Mutable bookkeeping for one run. Nothing is persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub page: u32,
    pub next_row_index: usize,
}

impl RunState {
    pub fn starting_at(page: u32) -> Self {
        Self {
            page,
            next_row_index: 0,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

/// Settings the page extractor needs from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct PageSettings {
    pub row_indexing: RowIndexing,
    pub date_bound: Option<DateBound>,
    pub waits: Waits,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageOutcome {
    pub rows: Vec<TableRow>,
    /// `false` when the page stayed empty after a reload.
    pub valid: bool,
    pub date_limit_reached: bool,
}

/// Turns classified reviews into table rows, advancing the row index per `RowIndexing`.
pub fn collect_rows(
    entries: Vec<ReviewEntry>,
    state: &mut RunState,
    row_indexing: RowIndexing,
) -> Vec<TableRow> {
    let mut rows = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            ReviewEntry::Featured => info!("Discarding a featured review"),
            ReviewEntry::Blocked => info!("Discarding a blocked review"),
            ReviewEntry::Scraped(record) => {
                info!(
                    "Scraped data for \"{}\" ({}) as row {}",
                    record.review_title, record.review_date, state.next_row_index
                );
                rows.push(TableRow {
                    index: state.next_row_index,
                    record,
                });
                if row_indexing == RowIndexing::KeptOnly {
                    state.next_row_index += 1;
                }
            }
        }
        if row_indexing == RowIndexing::AllSeen {
            state.next_row_index += 1;
        }
    }
    rows
}

/// Extracts every organic review on the loaded page.
/// An empty page gets exactly one reload before it is reported invalid.
pub fn extract_from_page<D: PageDriver>(
    driver: &D,
    state: &mut RunState,
    settings: &PageSettings,
) -> Result<PageOutcome> {
    info!("Extracting reviews from page {}", state.page);

    let mut entries = parse_reviews(&driver.content()?)?;
    info!("Found {} reviews on page {}", entries.len(), state.page);

    if entries.is_empty() {
        driver.reload()?;
        driver.wait_for(REVIEW, &settings.waits)?;
        entries = parse_reviews(&driver.content()?)?;
        info!("Found {} reviews on page {}", entries.len(), state.page);
        if entries.is_empty() {
            return Ok(PageOutcome {
                valid: false,
                ..PageOutcome::default()
            });
        }
    }

    let rows = collect_rows(entries, state, settings.row_indexing);

    let date_limit_reached = settings.date_bound.is_some_and(|bound| {
        bound.is_crossed_by(rows.iter().filter_map(|row| row.record.review_date.known()))
    });
    if date_limit_reached {
        info!("Date limit reached, ending process");
    }

    Ok(PageOutcome {
        rows,
        valid: true,
        date_limit_reached,
    })
}
