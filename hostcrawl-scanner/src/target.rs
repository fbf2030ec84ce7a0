use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// A canonical URL: absolute and without a fragment.
///
/// Two targets are the same page exactly when their serialized forms match,
/// so `https://a.com/x#foo` and `https://a.com/x#bar` collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Target(Url);

impl Target {
    pub fn new(mut url: Url) -> Self {
        url.set_fragment(None);
        Self(url)
    }

    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }

    pub fn host_str(&self) -> Option<&str> {
        self.0.host_str()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for Target {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.0.into()
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The admission boundary of a crawl: the seed's host and explicit port.
///
/// Scheme is not part of the scope, so `http://` and `https://` links to the
/// seed host are both in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    host: String,
    port: Option<u16>,
}

impl Scope {
    /// Returns `None` when the URL has no host to scope on.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self {
            host: host.to_string(),
            port: url.port(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn contains(&self, url: &Url) -> bool {
        url.host_str() == Some(self.host.as_str()) && url.port() == self.port
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_strips_fragment() {
        let a = Target::parse("https://a.com/x#foo").unwrap();
        let b = Target::parse("https://a.com/x#bar").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://a.com/x");
    }

    #[test]
    fn test_target_keeps_query() {
        let target = Target::parse("https://a.com/search?q=1#top").unwrap();
        assert_eq!(target.as_str(), "https://a.com/search?q=1");
    }

    #[test]
    fn test_target_serializes_as_string() {
        let target = Target::parse("https://a.com/x").unwrap();
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, "\"https://a.com/x\"");
    }

    #[test]
    fn test_scope_matches_host_and_port() {
        let scope = Scope::from_url(&Url::parse("http://127.0.0.1:8080/").unwrap()).unwrap();
        assert!(scope.contains(&Url::parse("http://127.0.0.1:8080/a").unwrap()));
        assert!(!scope.contains(&Url::parse("http://127.0.0.1:9090/a").unwrap()));
        assert!(!scope.contains(&Url::parse("http://localhost:8080/a").unwrap()));
        assert_eq!(scope.to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_scope_ignores_scheme() {
        let scope = Scope::from_url(&Url::parse("https://ex.com/").unwrap()).unwrap();
        assert!(scope.contains(&Url::parse("http://ex.com/page").unwrap()));
        assert!(!scope.contains(&Url::parse("https://sub.ex.com/page").unwrap()));
    }

    #[test]
    fn test_scope_requires_host() {
        assert!(Scope::from_url(&Url::parse("mailto:someone@ex.com").unwrap()).is_none());
    }
}
