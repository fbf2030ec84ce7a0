pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod frontier;
pub mod normalize;
pub mod quiescence;
pub mod result;
pub mod target;
pub mod visited;
mod worker;

pub use config::CrawlConfig;
pub use crawler::Crawler;
pub use error::{CrawlError, FetchError, LinkError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use result::{CrawlOutcome, CrawlResult, CrawlStats};
pub use target::{Scope, Target};
pub use visited::VisitedSet;
pub use worker::ProgressCallback;
