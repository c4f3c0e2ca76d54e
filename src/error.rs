use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("The selector you are trying to scrape with is invalid. Selector: {0}")]
    InvalidSelector(String),
    #[error("The element you are trying to scrape is missing. Selector: {0}")]
    MissingElement(String),
    #[error("Couldn't read a page number from: {0:?}")]
    InvalidPageNumber(String),

    #[error("Invalid argument combination: no starting url passed, but max/min date specified.")]
    DateBoundWithoutStartUrl,
    #[error("Invalid argument combination: both min_date and max_date specified.")]
    ConflictingDateBounds,
    #[error("{bound} requires reviews to be sorted {required} by date.")]
    SortOrderMismatch {
        bound: &'static str,
        required: &'static str,
    },
    #[error(
        "Please provide Glassdoor credentials. Credentials can be provided as a secret.json file \
         in the working directory, or passed at the command line using the --username and \
         --password flags."
    )]
    MissingCredentials,
    #[error("Invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Browser Error: {0}")]
    Browser(String),
    #[error("Tokio Join Error, couldn't await a task! {0}")]
    RuntimeJoin(#[from] tokio::task::JoinError),
}

impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error::Browser(format!("{value:#}"))
    }
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for Error {
    fn from(value: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        Error::Io(value.into_error())
    }
}
