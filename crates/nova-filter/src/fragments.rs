//! Filter Fragments
//!
//! A filter list is a set of opaque substring patterns. A fragment is not
//! a domain name: `analytics` matches anywhere in a URL, host or path.
//!
//! Lists are validated once at construction and are immutable afterwards.
//! The one rule enforced here: no fragment may be empty, since the empty
//! string is a substring of every URL and would block all traffic.

use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use thiserror::Error;
use tracing::{debug, warn};

/// Seed fragments loaded when no other configuration is given.
pub const SEED_FRAGMENTS: &[&str] = &[
    "doubleclick.net",
    "googleads",
    "googlesyndication.com",
    "adservice.google.com",
    "pagead2.googlesyndication.com",
    "ads.pubmatic.com",
    "adsystem.com",
    "analytics",
    "buffooncountabletreble.com",
    "constructpreachystopper.com",
    "122da.com",
    "curlyluxurypregnancy.com",
    "ad.zanox.com",
    "adsrvr.org",
    "openx.net",
];

/// Errors while building a filter list or an engine from it
#[derive(Debug, Error)]
pub enum FilterListError {
    #[error("empty fragment at position {position}")]
    EmptyFragment { position: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid filter configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to build matcher: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    #[error("filter list has no fragments")]
    Empty,
}

/// An immutable, deduplicated set of filter fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterList {
    fragments: Vec<String>,
}

impl FilterList {
    /// Build a list from raw fragments.
    ///
    /// Fragments are kept verbatim (no trimming, no case folding).
    /// Duplicates are dropped. Any empty fragment fails the whole list.
    pub fn new<I, S>(fragments: I) -> Result<Self, FilterListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        let mut seen = HashSet::new();

        for (position, fragment) in fragments.into_iter().enumerate() {
            let fragment: String = fragment.into();
            if fragment.is_empty() {
                warn!("Rejected empty filter fragment at position {}", position);
                return Err(FilterListError::EmptyFragment { position });
            }
            if fragment.trim().is_empty() {
                warn!(
                    "Whitespace-only filter fragment at position {} blocks every URL containing it",
                    position
                );
            }
            if seen.insert(fragment.clone()) {
                list.fragments.push(fragment);
            }
        }

        Ok(list)
    }

    /// The built-in seed list
    pub fn seed() -> Self {
        Self {
            fragments: SEED_FRAGMENTS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Parse a plain-text list: one fragment per line.
    ///
    /// Lines are trimmed. Blank lines and lines starting with `!` or `#`
    /// are skipped, so a parsed list never carries an empty fragment.
    pub fn parse<R: Read>(name: &str, reader: R) -> Result<Self, FilterListError> {
        let reader = BufReader::new(reader);
        let mut lines = Vec::new();
        let mut line_count = 0;

        for line in reader.lines() {
            let line = line?;
            line_count += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('!') || trimmed.starts_with('#') {
                continue;
            }
            lines.push(trimmed.to_string());
        }

        let list = Self::new(lines)?;
        debug!(
            "Parsed filter list '{}': {} lines, {} fragments",
            name,
            line_count,
            list.len()
        );
        Ok(list)
    }

    /// Union of this list and `other`
    pub fn extend(mut self, other: FilterList) -> Self {
        let mut seen: HashSet<String> = self.fragments.iter().cloned().collect();
        for fragment in other.fragments {
            if seen.insert(fragment.clone()) {
                self.fragments.push(fragment);
            }
        }
        self
    }

    /// Union of this list and raw fragments, validated like [`FilterList::new`]
    pub fn with_fragments<I, S>(self, fragments: I) -> Result<Self, FilterListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.extend(Self::new(fragments)?))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragment at `index`, in insertion order
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).map(String::as_str)
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.fragments.iter().any(|f| f == fragment)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_seed_list_is_verbatim() {
        let list = FilterList::seed();
        assert_eq!(list.len(), 15);
        assert!(list.contains("pagead2.googlesyndication.com"));
        assert!(list.contains("122da.com"));
        assert!(list.iter().all(|f| !f.is_empty()));
    }

    #[test]
    fn test_rejects_empty_fragment() {
        let err = FilterList::new(["doubleclick.net", "", "openx.net"]).unwrap_err();
        assert!(matches!(err, FilterListError::EmptyFragment { position: 1 }));
    }

    #[test]
    fn test_deduplicates() {
        let list = FilterList::new(["ads", "track", "ads"]).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_keeps_fragments_verbatim() {
        let list = FilterList::new([" Ads "]).unwrap();
        assert!(list.contains(" Ads "));
        assert!(!list.contains("ads"));
    }

    #[test]
    fn test_get_by_index() {
        let list = FilterList::new(["ads", "track", "ads", "pixel"]).unwrap();
        assert_eq!(list.get(0), Some("ads"));
        assert_eq!(list.get(2), Some("pixel"));
        assert_eq!(list.get(3), None);
    }

    #[test]
    fn test_whitespace_fragment_accepted_verbatim() {
        // Only the empty string is rejected; a lone space still matches literally
        let list = FilterList::new([" "]).unwrap();
        assert!(list.contains(" "));

        let engine = crate::engine::FilterEngine::new(list).unwrap();
        assert!(engine.is_blocked("a b"));
        assert!(!engine.is_blocked("https://example.com/"));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let content = r#"
! comment
# another comment
tracker.example

   pixel.example
"#;
        let list = FilterList::parse("test", Cursor::new(content)).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("tracker.example"));
        assert!(list.contains("pixel.example"));
    }

    #[test]
    fn test_extend_is_union() {
        let list = FilterList::seed()
            .with_fragments(["openx.net", "beacon"])
            .unwrap();
        assert_eq!(list.len(), 16);
        assert!(list.contains("beacon"));
    }
}
