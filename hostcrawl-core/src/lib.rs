pub mod crawl;
pub mod report;

pub use crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
pub use report::{ReportError, generate_crawl_report, save_urls_to_file};
