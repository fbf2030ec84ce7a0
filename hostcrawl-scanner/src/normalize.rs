use crate::error::LinkError;
use crate::target::{Scope, Target};
use crate::visited::VisitedSet;
use std::collections::HashSet;
use tracing::trace;
use url::Url;

/// Targets kept from one page's links, plus what was dropped along the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilteredLinks {
    pub targets: Vec<Target>,
    pub rejected: usize,
    pub already_seen: usize,
}

/// Turns raw hrefs into in-scope targets.
#[derive(Debug, Clone)]
pub struct Normalizer {
    scope: Scope,
}

impl Normalizer {
    pub fn new(scope: Scope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Resolves `href` against `base`, drops the fragment and checks scope.
    pub fn normalize(&self, base: &Url, href: &str) -> Result<Target, LinkError> {
        let resolved = base.join(href)?;
        if !self.scope.contains(&resolved) {
            return Err(LinkError::OffScope {
                host: resolved.host_str().unwrap_or_default().to_string(),
            });
        }
        Ok(Target::new(resolved))
    }

    /// Filters one page's worth of links.
    ///
    /// Duplicates within the batch and targets the visited set already holds
    /// are dropped here so workers do not push work that would only be
    /// discarded at claim time.
    pub fn filter_links<I, S>(&self, base: &Target, links: I, visited: &VisitedSet) -> FilteredLinks
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut batch = HashSet::new();
        let mut filtered = FilteredLinks::default();

        for href in links {
            let href = href.as_ref();
            let target = match self.normalize(base.url(), href) {
                Ok(target) => target,
                Err(e) => {
                    trace!("Dropping link {:?} from {}: {}", href, base, e);
                    filtered.rejected += 1;
                    continue;
                }
            };

            if !batch.insert(target.clone()) {
                continue;
            }

            if visited.contains(&target) {
                filtered.already_seen += 1;
                continue;
            }

            filtered.targets.push(target);
        }

        filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(seed: &str) -> Normalizer {
        Normalizer::new(Scope::from_url(&Url::parse(seed).unwrap()).unwrap())
    }

    #[test]
    fn test_resolves_parent_relative_link() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/dir/page.html").unwrap();
        let target = normalizer.normalize(&base, "../other.html").unwrap();
        assert_eq!(target.as_str(), "https://a.com/other.html");
    }

    #[test]
    fn test_resolves_root_relative_link() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/dir/page.html").unwrap();
        let target = normalizer.normalize(&base, "/top").unwrap();
        assert_eq!(target.as_str(), "https://a.com/top");
    }

    #[test]
    fn test_fragments_collapse() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/").unwrap();
        let foo = normalizer.normalize(&base, "https://a.com/x#foo").unwrap();
        let bar = normalizer.normalize(&base, "https://a.com/x#bar").unwrap();
        assert_eq!(foo, bar);
        assert_eq!(foo.as_str(), "https://a.com/x");
    }

    #[test]
    fn test_fragment_only_link_is_the_base_page() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/page").unwrap();
        let target = normalizer.normalize(&base, "#section").unwrap();
        assert_eq!(target.as_str(), "https://a.com/page");
    }

    #[test]
    fn test_rejects_other_host() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/").unwrap();
        let err = normalizer.normalize(&base, "https://other.com/").unwrap_err();
        assert_eq!(
            err,
            LinkError::OffScope {
                host: "other.com".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_hostless_schemes() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/").unwrap();
        assert!(normalizer.normalize(&base, "mailto:me@a.com").is_err());
        assert!(normalizer.normalize(&base, "javascript:void(0)").is_err());
    }

    #[test]
    fn test_rejects_malformed_link() {
        let normalizer = normalizer("https://a.com/");
        let base = Url::parse("https://a.com/").unwrap();
        let err = normalizer.normalize(&base, "http://[::1").unwrap_err();
        assert!(matches!(err, LinkError::Malformed(_)));
    }

    #[test]
    fn test_filter_dedups_within_batch() {
        let normalizer = normalizer("https://a.com/");
        let base = Target::parse("https://a.com/").unwrap();
        let visited = VisitedSet::new();

        let filtered = normalizer.filter_links(
            &base,
            ["/a", "/a#one", "https://a.com/a#two", "/b"],
            &visited,
        );

        let urls: Vec<&str> = filtered.targets.iter().map(Target::as_str).collect();
        assert_eq!(urls, vec!["https://a.com/a", "https://a.com/b"]);
        assert_eq!(filtered.rejected, 0);
    }

    #[test]
    fn test_filter_skips_visited_and_counts_rejections() {
        let normalizer = normalizer("https://a.com/");
        let base = Target::parse("https://a.com/").unwrap();
        let visited = VisitedSet::new();
        visited.try_claim(&base);

        let filtered = normalizer.filter_links(
            &base,
            vec!["/".to_string(), "https://other.com/".to_string(), "/new".to_string()],
            &visited,
        );

        let urls: Vec<&str> = filtered.targets.iter().map(Target::as_str).collect();
        assert_eq!(urls, vec!["https://a.com/new"]);
        assert_eq!(filtered.rejected, 1);
        assert_eq!(filtered.already_seen, 1);
    }
}
