use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions, Tab};
use scraper::Html;

use crate::parse::create_selector;
use crate::{info_time, Error, Result};

/// Bounds for every readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for Waits {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// The handful of browser interactions the scraper needs.
/// Everything else is read from HTML snapshots returned by `content`.
pub trait PageDriver {
    fn navigate(&self, url: &str) -> Result<()>;

    /// Full HTML of the currently loaded page.
    fn content(&self) -> Result<String>;

    fn reload(&self) -> Result<()>;

    fn click(&self, selector: &str) -> Result<()>;

    fn type_into(&self, selector: &str, text: &str) -> Result<()>;

    /// `Ok(None)` if either the element or the attribute is missing.
    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Polls page snapshots until `ready` holds. Returns `false` once `waits.timeout` elapses.
    fn wait_until<F>(&self, waits: &Waits, mut ready: F) -> Result<bool>
    where
        F: FnMut(&Html) -> bool,
    {
        let deadline = Instant::now() + waits.timeout;
        loop {
            let doc = Html::parse_document(&self.content()?);
            if ready(&doc) {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            std::thread::sleep(waits.poll_interval);
        }
    }

    fn wait_for(&self, selector: &str, waits: &Waits) -> Result<bool> {
        let sel = create_selector(selector)?;
        self.wait_until(waits, |doc| doc.select(&sel).next().is_some())
    }
}

/// A single Chrome tab, kept alive together with its browser process.
pub struct ChromeDriver {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeDriver {
    pub fn launch(headless: bool) -> Result<Self> {
        info_time!("Configuring browser");
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .window_size(Some((1920, 1080)))
            .build()
            .map_err(|e| Error::Browser(format!("Failed to build Chrome launch options: {e}")))?;
        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl PageDriver for ChromeDriver {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn content(&self) -> Result<String> {
        Ok(self.tab.get_content()?)
    }

    fn reload(&self) -> Result<()> {
        self.tab.reload(false, None)?.wait_until_navigated()?;
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.tab
            .find_element(selector)
            .map_err(|_| Error::MissingElement(selector.into()))?
            .click()?;
        Ok(())
    }

    fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        self.tab
            .find_element(selector)
            .map_err(|_| Error::MissingElement(selector.into()))?
            .type_into(text)?;
        Ok(())
    }

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        match self.tab.find_element(selector) {
            Ok(element) => Ok(element.get_attribute_value(name)?),
            Err(_) => Ok(None),
        }
    }
}
