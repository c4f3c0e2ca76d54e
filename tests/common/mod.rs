#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use glassdoor_scrap::browser::{PageDriver, Waits};
use glassdoor_scrap::config::{Config, Credentials, DateBound, StartMode};
use glassdoor_scrap::record::RowIndexing;
use glassdoor_scrap::{Error, Result};
use scraper::{Html, Selector};

pub const LANDING_URL: &str = "https://www.glassdoor.com/Overview/Working-at-Acme-EI_IE1.11,15.htm";
pub const REVIEWS_URL: &str = "https://www.glassdoor.com/Reviews/Acme-Reviews-E1.htm";
pub const LOGIN_URL: &str = "https://www.glassdoor.com/profile/login_input.htm";

pub fn test_config(url: &str) -> Config {
    Config {
        url: url.to_string(),
        output: PathBuf::from("unused.csv"),
        headless: true,
        credentials: Credentials {
            username: "me@example.com".into(),
            password: "hunter2".into(),
        },
        limit: 100,
        start: StartMode::Landing,
        date_bound: None,
        row_indexing: RowIndexing::AllSeen,
        waits: Waits {
            timeout: Duration::ZERO,
            poll_interval: Duration::ZERO,
        },
    }
}

pub fn resume_config(url: &str, bound: Option<DateBound>) -> Config {
    Config {
        start: StartMode::ResumeFromUrl,
        date_bound: bound,
        ..test_config(url)
    }
}

/// Builder for a single `.empReview` container.
#[derive(Debug, Clone)]
pub struct Review {
    title: Option<String>,
    date: String,
    featured: bool,
    blocked: bool,
    rating: String,
}

impl Review {
    pub fn new(title: &str, date: &str) -> Self {
        Self {
            title: Some(title.into()),
            date: date.into(),
            featured: false,
            blocked: false,
            rating: "4.0".into(),
        }
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn untitled(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn rating(mut self, rating: &str) -> Self {
        self.rating = rating.into();
        self
    }

    pub fn html(&self) -> String {
        let flag = if self.featured {
            r#"<span class="featuredFlag">Featured Review</span>"#
        } else {
            ""
        };
        let author = if self.blocked {
            String::new()
        } else {
            format!(
                r#"<div class="authorInfo"><span class="authorJobTitle">{} - Engineer</span><span class="authorLocation">Berlin</span></div>"#,
                self.date
            )
        };
        let title = self
            .title
            .as_ref()
            .map(|t| format!(r#"<a class="reviewLink">"{t}"</a>"#))
            .unwrap_or_default();
        format!(
            r#"<li class="empReview">{flag}<div class="gdReview"><div><div><span>Current Employee, 2 years</span></div></div>
               {title}<span class="ratingNumber">{}</span>{author}
               <span data-test="pros">Pros text</span><span data-test="cons">Cons text</span></div></li>"#,
            self.rating
        )
    }
}

pub fn reviews_page(reviews: &[Review], current: u32, total: u32) -> String {
    let items: String = reviews.iter().map(Review::html).collect();
    let pager: String = (1..=total)
        .map(|p| {
            if p == current {
                format!(r#"<li><span class="selected">{p}</span></li>"#)
            } else {
                format!("<li><a>{p}</a></li>")
            }
        })
        .collect();
    format!(
        r#"<html><body>
           <button id="onetrust-accept-btn-handler">Accept Cookies</button>
           <ol>{items}</ol>
           <ul class="pageContainer">{pager}</ul>
           <button class="nextButton">Next</button>
           </body></html>"#
    )
}

pub fn empty_page(current: u32, total: u32) -> String {
    reviews_page(&[], current, total)
}

pub fn login_page() -> String {
    r#"<html><body><form>
       <input name="username"><input name="password" type="password">
       <button type="submit">Sign In</button>
       </form></body></html>"#
        .to_string()
}

pub fn landing_page() -> String {
    r#"<html><body><a data-label="Reviews" href="/Reviews/Acme-Reviews-E1.htm">Reviews</a></body></html>"#
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Location {
    Url(String),
    /// Review page index and how many times it has been reloaded.
    Reviews { page: usize, loads: usize },
}

#[derive(Debug)]
struct SiteState {
    location: Location,
    actions: Vec<String>,
}

/// An in-memory stand-in for the review site.
///
/// Each review page is a list of snapshots: the first load shows the first one,
/// every reload moves on to the next (the last one sticks).
pub struct FakeSite {
    urls: HashMap<String, String>,
    review_urls: HashMap<String, usize>,
    review_pages: Vec<Vec<String>>,
    state: RefCell<SiteState>,
}

impl FakeSite {
    pub fn new(review_pages: Vec<Vec<String>>) -> Self {
        let mut urls = HashMap::new();
        urls.insert(LOGIN_URL.to_string(), login_page());
        urls.insert(LANDING_URL.to_string(), landing_page());
        let mut review_urls = HashMap::new();
        review_urls.insert(REVIEWS_URL.to_string(), 0);
        Self {
            urls,
            review_urls,
            review_pages,
            state: RefCell::new(SiteState {
                location: Location::Url("about:blank".into()),
                actions: Vec::new(),
            }),
        }
    }

    /// Every page with a single snapshot.
    pub fn with_pages(pages: Vec<String>) -> Self {
        Self::new(pages.into_iter().map(|p| vec![p]).collect())
    }

    /// Makes `url` open the review page at `page_index` directly.
    pub fn with_review_url(mut self, url: &str, page_index: usize) -> Self {
        self.review_urls.insert(url.to_string(), page_index);
        self
    }

    pub fn without_url(mut self, url: &str) -> Self {
        self.urls.remove(url);
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.borrow().actions.clone()
    }

    pub fn count_actions(&self, prefix: &str) -> usize {
        self.actions().iter().filter(|a| a.starts_with(prefix)).count()
    }

    fn record(&self, action: String) {
        self.state.borrow_mut().actions.push(action);
    }
}

impl PageDriver for FakeSite {
    fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate {url}"));
        let location = match self.review_urls.get(url) {
            Some(page) => Location::Reviews { page: *page, loads: 0 },
            None => Location::Url(url.to_string()),
        };
        self.state.borrow_mut().location = location;
        Ok(())
    }

    fn content(&self) -> Result<String> {
        match &self.state.borrow().location {
            Location::Url(url) => Ok(self
                .urls
                .get(url)
                .cloned()
                .unwrap_or_else(|| "<html><body></body></html>".to_string())),
            Location::Reviews { page, loads } => {
                let snapshots = self
                    .review_pages
                    .get(*page)
                    .ok_or_else(|| Error::Browser(format!("no review page {page}")))?;
                let idx = (*loads).min(snapshots.len() - 1);
                Ok(snapshots[idx].clone())
            }
        }
    }

    fn reload(&self) -> Result<()> {
        self.record("reload".to_string());
        if let Location::Reviews { loads, .. } = &mut self.state.borrow_mut().location {
            *loads += 1;
        }
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.record(format!("click {selector}"));
        if selector == ".nextButton" {
            if let Location::Reviews { page, loads } = &mut self.state.borrow_mut().location {
                *page += 1;
                *loads = 0;
            }
        }
        Ok(())
    }

    fn type_into(&self, selector: &str, text: &str) -> Result<()> {
        self.record(format!("type {selector} {text}"));
        Ok(())
    }

    fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let doc = Html::parse_document(&self.content()?);
        let sel = Selector::parse(selector).map_err(|_| Error::InvalidSelector(selector.into()))?;
        Ok(doc
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr(name).map(str::to_string)))
    }
}
