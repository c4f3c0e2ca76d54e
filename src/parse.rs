use chrono::NaiveDate;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use crate::record::{ReviewDate, ReviewRecord};
use crate::{Error, Result, NOT_AVAILABLE};

pub(crate) const REVIEW: &str = ".empReview";
const FEATURED: &str = ".featuredFlag";
const AUTHOR: &str = ".authorInfo";
const JOB_TITLE: &str = ".authorJobTitle";
const LOCATION: &str = "span.authorLocation";
const GD_REVIEW: &str = "div.gdReview";
const REVIEW_LINK: &str = ".reviewLink";
const PROS: &str = r#"span[data-test="pros"]"#;
const CONS: &str = r#"span[data-test="cons"]"#;
const RATING: &str = ".ratingNumber";

const ANONYMOUS_MARKER: &str = "Anonymous Employee";
const AUTHOR_DATE_FORMAT: &str = "%b %d, %Y";

#[inline]
pub(crate) fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::InvalidSelector(sel_str.into()))
}

/// Compiled selectors for everything read out of a single review.
pub struct ReviewSelectors {
    review: Selector,
    featured: Selector,
    author: Selector,
    job_title: Selector,
    location: Selector,
    gd_review: Selector,
    review_link: Selector,
    pros: Selector,
    cons: Selector,
    rating: Selector,
}

impl ReviewSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            review: create_selector(REVIEW)?,
            featured: create_selector(FEATURED)?,
            author: create_selector(AUTHOR)?,
            job_title: create_selector(JOB_TITLE)?,
            location: create_selector(LOCATION)?,
            gd_review: create_selector(GD_REVIEW)?,
            review_link: create_selector(REVIEW_LINK)?,
            pros: create_selector(PROS)?,
            cons: create_selector(CONS)?,
            rating: create_selector(RATING)?,
        })
    }
}

/// What a single review container on the page turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewEntry {
    /// Promoted review, shown out of order.
    Featured,
    /// No author section, the review is hidden from us.
    Blocked,
    Scraped(ReviewRecord),
}

#[inline]
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Text as a browser would render it: `<br>` breaks a line, runs of whitespace collapse to one space.
fn rendered_text(element: ElementRef) -> String {
    let mut raw = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(el) if el.name() == "br" => raw.push(' '),
            _ => {}
        }
    }
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn first_child_element<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

/// Reads the leading `Mon D, YYYY` out of the author line.
pub fn scrape_date(author: ElementRef) -> ReviewDate {
    let text = element_text(author);
    let token = text.split('-').next().unwrap_or_default().trim();
    match NaiveDate::parse_from_str(token, AUTHOR_DATE_FORMAT) {
        Ok(date) => ReviewDate::Known(date),
        Err(_) => {
            warn!("Failed to scrape review date");
            ReviewDate::Unknown
        }
    }
}

pub fn scrape_employee_title(author: ElementRef, sel: &ReviewSelectors) -> String {
    if element_text(author).contains(ANONYMOUS_MARKER) {
        return "Anonymous".to_string();
    }
    let title = author
        .select(&sel.job_title)
        .next()
        .map(element_text)
        .and_then(|text| text.split('-').nth(1).map(|s| s.trim().to_string()));
    match title {
        Some(title) => title,
        None => {
            warn!("Failed to scrape employee_title");
            NOT_AVAILABLE.to_string()
        }
    }
}

pub fn scrape_location(author: ElementRef, sel: &ReviewSelectors) -> String {
    match author.select(&sel.location).next() {
        Some(location) => element_text(location).trim().to_string(),
        None => {
            warn!("Failed to scrape employee_location");
            NOT_AVAILABLE.to_string()
        }
    }
}

/// Status line sits in the first span of the first nested div, e.g. "Current Employee, more than 1 year".
pub fn scrape_status(review: ElementRef, sel: &ReviewSelectors) -> String {
    let status = review
        .select(&sel.gd_review)
        .next()
        .and_then(|gd| first_child_element(gd, "div"))
        .and_then(|div| first_child_element(div, "div"))
        .and_then(|div| first_child_element(div, "span"))
        .map(element_text);
    match status {
        Some(text) => text
            .trim()
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string(),
        None => {
            warn!("Failed to scrape employee_status");
            NOT_AVAILABLE.to_string()
        }
    }
}

/// The only field without a fallback: a review without a title fails the page.
pub fn scrape_review_title(review: ElementRef, sel: &ReviewSelectors) -> Result<String> {
    let link = review
        .select(&sel.review_link)
        .next()
        .ok_or_else(|| Error::MissingElement(REVIEW_LINK.into()))?;
    Ok(element_text(link).trim().trim_matches('"').to_string())
}

/// A missing section and an empty one both come back as `None`.
fn scrape_labeled_text(review: ElementRef, selector: &Selector, field: &str) -> Option<String> {
    let text = review
        .select(selector)
        .next()
        .map(rendered_text)
        .filter(|text| !text.is_empty());
    if text.is_none() {
        warn!("Failed to scrape {field}");
    }
    text
}

pub fn scrape_pros(review: ElementRef, sel: &ReviewSelectors) -> Option<String> {
    scrape_labeled_text(review, &sel.pros, "pros")
}

pub fn scrape_cons(review: ElementRef, sel: &ReviewSelectors) -> Option<String> {
    scrape_labeled_text(review, &sel.cons, "cons")
}

/// Advice to management is not implemented yet: the section hides behind a
/// "continue reading" toggle that we don't expand. Always the sentinel.
pub fn scrape_advice() -> String {
    NOT_AVAILABLE.to_string()
}

/// Parses the first three characters, so "4.5 out of 5" becomes 4.5.
pub fn scrape_overall_rating(review: ElementRef, sel: &ReviewSelectors) -> Option<f64> {
    let rating = review.select(&sel.rating).next().and_then(|rating| {
        element_text(rating)
            .trim()
            .chars()
            .take(3)
            .collect::<String>()
            .parse::<f64>()
            .ok()
    });
    if rating.is_none() {
        warn!("Failed to scrape overall_rating");
    }
    rating
}

pub fn parse_review(review: ElementRef, sel: &ReviewSelectors) -> Result<ReviewEntry> {
    if review.select(&sel.featured).next().is_some() {
        return Ok(ReviewEntry::Featured);
    }
    let Some(author) = review.select(&sel.author).next() else {
        return Ok(ReviewEntry::Blocked);
    };

    Ok(ReviewEntry::Scraped(ReviewRecord {
        review_date: scrape_date(author),
        employee_title: scrape_employee_title(author, sel),
        employee_location: scrape_location(author, sel),
        employee_status: scrape_status(review, sel),
        review_title: scrape_review_title(review, sel)?,
        pros: scrape_pros(review, sel),
        cons: scrape_cons(review, sel),
        advice: scrape_advice(),
        overall_rating: scrape_overall_rating(review, sel),
    }))
}

/// Classifies every review container on the page, in document order.
pub fn parse_reviews(html: &str) -> Result<Vec<ReviewEntry>> {
    let sel = ReviewSelectors::new()?;
    let doc = Html::parse_document(html);
    doc.select(&sel.review)
        .map(|review| parse_review(review, &sel))
        .collect()
}
