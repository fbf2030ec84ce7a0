pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{crawl_options_from_args, handle_crawl, resolve_output_path};

// Re-export crawl functionality from hostcrawl-core
pub use hostcrawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl, extract_url_path};
pub use hostcrawl_core::report::{generate_crawl_report, save_urls_to_file};
