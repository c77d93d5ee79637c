//! Path Matcher Module
//!
//! Decides which canonical paths are eligible for caching.

// == Path Matcher ==
/// Static prefix filter. Plain case-sensitive prefix comparison, no wildcards.
#[derive(Debug, Clone, Default)]
pub struct PathMatcher {
    prefixes: Vec<String>,
}

impl PathMatcher {
    pub fn new(prefixes: Vec<String>) -> Self {
        Self { prefixes }
    }

    // == Is Cacheable ==
    /// Returns true iff `path` starts with one of the configured prefixes.
    pub fn is_cacheable(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
