use thiserror::Error;

/// Errors that stop a crawl from starting.
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure to retrieve or read a single page. Never fatal to the crawl.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    /// For [`PageFetcher`](crate::fetch::PageFetcher) implementations whose
    /// failures are neither transport nor status errors.
    #[error("Fetch failed for {url}: {reason}")]
    Other { url: String, reason: String },
}

/// Why a discovered href did not become a target.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("Malformed link: {0}")]
    Malformed(#[from] url::ParseError),

    #[error("Link leaves scope (host: {host})")]
    OffScope { host: String },
}

pub type Result<T> = std::result::Result<T, CrawlError>;
