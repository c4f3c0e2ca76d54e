use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::NOT_AVAILABLE;

/// Date format the review date is written with.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Review date, or `N/A` when the page didn't give us one we could parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReviewDate {
    Known(NaiveDate),
    Unknown,
}

impl ReviewDate {
    pub fn known(&self) -> Option<NaiveDate> {
        match self {
            ReviewDate::Known(date) => Some(*date),
            ReviewDate::Unknown => None,
        }
    }
}

impl fmt::Display for ReviewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewDate::Known(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            ReviewDate::Unknown => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for ReviewDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReviewDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim() == NOT_AVAILABLE {
            return Ok(ReviewDate::Unknown);
        }
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map(ReviewDate::Known)
            .map_err(serde::de::Error::custom)
    }
}

/// One row of the output table. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_date: ReviewDate,
    pub employee_title: String,
    pub employee_location: String,
    pub employee_status: String,
    pub review_title: String,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub advice: String,
    pub overall_rating: Option<f64>,
}

impl ReviewRecord {
    pub const FIELDS: [&'static str; 9] = [
        "review_date",
        "employee_title",
        "employee_location",
        "employee_status",
        "review_title",
        "pros",
        "cons",
        "advice",
        "overall_rating",
    ];
}

/// Decides what the row index counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowIndexing {
    /// Every review seen on a page advances the index, kept or not.
    #[default]
    AllSeen,
    /// Only reviews that end up in the table advance the index.
    KeptOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: usize,
    pub record: ReviewRecord,
}

/// Append-only table of scraped reviews, in the order they were scraped.
#[derive(Debug, Clone, Default)]
pub struct ReviewTable {
    rows: Vec<TableRow>,
}

impl ReviewTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = TableRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &ReviewRecord> {
        self.rows.iter().map(|row| &row.record)
    }
}
