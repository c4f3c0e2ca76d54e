use scraper::Html;
use tracing::{info, warn};
use url::Url;

use crate::browser::{PageDriver, Waits};
use crate::config::Credentials;
use crate::pagination::current_page;
use crate::parse::create_selector;
use crate::{Error, Result, LOGIN_URL};

const USERNAME_FIELD: &str = r#"input[name="username"]"#;
const PASSWORD_FIELD: &str = r#"input[name="password"]"#;
const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
const REVIEWS_LINK: &str = r#"a[data-label="Reviews"]"#;
const ACCEPT_COOKIES_BUTTON: &str = "#onetrust-accept-btn-handler";
const SELECTED_PAGE: &str = ".selected";

pub fn sign_in<D: PageDriver>(
    driver: &D,
    credentials: &Credentials,
    target_url: &str,
    waits: &Waits,
) -> Result<()> {
    info!("Signing in to {}", credentials.username);
    driver.navigate(LOGIN_URL)?;
    if !driver.wait_for(USERNAME_FIELD, waits)? {
        return Err(Error::MissingElement(USERNAME_FIELD.into()));
    }

    driver.type_into(USERNAME_FIELD, &credentials.username)?;
    driver.type_into(PASSWORD_FIELD, &credentials.password)?;
    driver.click(SUBMIT_BUTTON)?;

    let password = create_selector(PASSWORD_FIELD)?;
    let signed_in = driver.wait_until(waits, |doc| doc.select(&password).next().is_none())?;
    if !signed_in {
        warn!("Login form is still showing, continuing anyway");
    }

    driver.navigate(target_url)
}

/// Follows the landing page's "Reviews" link.
///
/// Companies without any reviews are not detected here: a landing page without
/// the link fails with `Error::MissingElement`.
pub fn navigate_to_reviews<D: PageDriver>(driver: &D, landing_url: &str) -> Result<()> {
    info!("Navigating to company reviews");
    driver.navigate(landing_url)?;

    let href = driver
        .attribute(REVIEWS_LINK, "href")?
        .ok_or_else(|| Error::MissingElement(REVIEWS_LINK.into()))?;
    let reviews_url = Url::parse(landing_url)?.join(&href)?;
    driver.navigate(reviews_url.as_str())
}

/// Clicks the consent dialog's accept button. The dialog is expected on every run.
pub fn accept_cookies<D: PageDriver>(driver: &D, waits: &Waits) -> Result<()> {
    info!("Accepting cookies");
    if !driver.wait_for(ACCEPT_COOKIES_BUTTON, waits)? {
        return Err(Error::MissingElement(ACCEPT_COOKIES_BUTTON.into()));
    }
    driver.click(ACCEPT_COOKIES_BUTTON)
}

/// Loads a reviews page directly and returns the page number it is on.
pub fn resume_from_url<D: PageDriver>(driver: &D, url: &str, waits: &Waits) -> Result<u32> {
    driver.navigate(url)?;
    driver.wait_for(SELECTED_PAGE, waits)?;

    info!("Getting current page number");
    let doc = Html::parse_document(&driver.content()?);
    let page = current_page(&doc)?.ok_or_else(|| Error::MissingElement(SELECTED_PAGE.into()))?;
    info!("Starting from page {page}.");
    Ok(page)
}
