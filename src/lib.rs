//! GLASSDOOR REVIEW SCRAPER
//! Signs in, walks a company's review pages and collects every organic review into a CSV.

pub mod browser;
pub mod config;
mod error;
mod macros;
pub mod page;
pub mod pagination;
pub mod parse;
pub mod process;
pub mod record;
pub mod session;
pub mod writer;

pub use error::{Error, Result};

pub const DEFAULT_URL: &str = "https://www.glassdoor.com/Overview/Working-at-Google-EI_IE9079.11,17.htm";
pub const DEFAULT_FILE: &str = "glassdoor_ratings.csv";
pub const DEFAULT_LIMIT: usize = 25;
pub const DEFAULT_CREDENTIALS_FILE: &str = "secret.json";
const LOGIN_URL: &str = "https://www.glassdoor.com/profile/login_input.htm";
/// Placeholder for a field we couldn't determine.
pub const NOT_AVAILABLE: &str = "N/A";
