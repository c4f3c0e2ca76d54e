use scraper::Html;
use tracing::{info, warn};

use crate::browser::{PageDriver, Waits};
use crate::page::RunState;
use crate::parse::create_selector;
use crate::{Error, Result};

const SELECTED_PAGE: &str = ".selected";
const PAGE_CONTAINER: &str = ".pageContainer";
const NEXT_BUTTON: &str = ".nextButton";

/// Number of the highlighted page in the pagination control.
pub fn current_page(doc: &Html) -> Result<Option<u32>> {
    let selected = create_selector(SELECTED_PAGE)?;
    let Some(element) = doc.select(&selected).next() else {
        return Ok(None);
    };
    let text = element.text().collect::<String>();
    text.trim()
        .parse()
        .map(Some)
        .map_err(|_| Error::InvalidPageNumber(text))
}

/// Last page number listed in the pagination control.
pub fn total_pages(doc: &Html) -> Result<Option<u32>> {
    let container = create_selector(PAGE_CONTAINER)?;
    let Some(element) = doc.select(&container).next() else {
        return Ok(None);
    };
    let Some(last) = element.text().flat_map(str::split_whitespace).last() else {
        return Ok(None);
    };
    last.parse()
        .map(Some)
        .map_err(|_| Error::InvalidPageNumber(last.to_string()))
}

/// A missing or unreadable pagination control means there is nothing after this page.
pub fn has_next_page(html: &str) -> bool {
    let doc = Html::parse_document(html);
    match (current_page(&doc), total_pages(&doc)) {
        (Ok(Some(current)), Ok(Some(total))) => current < total,
        (Err(e), _) | (_, Err(e)) => {
            warn!("Couldn't read the pagination control: {e}");
            false
        }
        _ => false,
    }
}

/// Clicks "next" and waits for the pagination control to highlight the next page.
pub fn go_to_next_page<D: PageDriver>(driver: &D, state: &mut RunState, waits: &Waits) -> Result<()> {
    let next = state.page + 1;
    info!("Going to page {next}");
    driver.click(NEXT_BUTTON)?;

    let arrived = driver.wait_until(waits, |doc| matches!(current_page(doc), Ok(Some(p)) if p == next))?;
    if !arrived {
        warn!("Page {next} didn't report itself as selected in time");
    }
    state.page = next;
    Ok(())
}
