// Output of a finished crawl: the JSON URL list and the console summary

use crate::crawl::extract_url_path;
use hostcrawl_scanner::{CrawlOutcome, CrawlResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode results as JSON: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Write the URLs as a JSON array of strings, followed by a newline.
pub fn save_urls_to_file(urls: &[String], path: &Path) -> Result<(), ReportError> {
    let io_error = |source| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, urls)?;
    writeln!(writer).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!("Saved {} URLs to {}", urls.len(), path.display());
    Ok(())
}

/// Generate a crawl report from a result
pub fn generate_crawl_report(result: &CrawlResult) -> String {
    let stats = &result.stats;
    let outcome = match result.outcome {
        CrawlOutcome::Completed => "completed",
        CrawlOutcome::Cancelled => "cancelled (partial results)",
        CrawlOutcome::Aborted => "aborted (all workers exited)",
    };

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Seed: {}\n", result.seed));
    report.push_str(&format!("  Outcome: {}\n", outcome));
    report.push_str(&format!("  Pages found: {}\n", result.len()));
    report.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    report.push_str(&format!("  Fetch failures: {}\n", stats.fetch_failures));
    report.push_str(&format!("  Duplicates skipped: {}\n", stats.duplicates_skipped));
    report.push_str(&format!("  Links rejected: {}\n", stats.links_rejected));
    report.push_str(&format!("  Processing time: {:.2?}\n", stats.elapsed));
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("## {}\n", result.scope));
    report.push_str(&format!("  {} pages found\n\n", result.len()));

    for target in &result.targets {
        let mut line = format!("  {}", extract_url_path(target.as_str()));
        if let Ok(url) = Url::parse(target.as_str())
            && let Some(query) = url.query()
        {
            line.push('?');
            line.push_str(query);
        }
        report.push_str(&line);
        report.push('\n');
    }

    report
}
