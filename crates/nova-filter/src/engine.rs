//! Filter Engine
//!
//! Substring classification of request URLs using an Aho-Corasick
//! automaton. The automaton is built once from a [`FilterList`] and is
//! read-only afterwards, so any number of threads may classify at once
//! without locking.
//!
//! A URL is blocked iff at least one fragment occurs in it as a
//! contiguous, case-sensitive substring. The test is existential, so the
//! order fragments were loaded in never affects the result.

use crate::fragments::{FilterList, FilterListError};
use crate::response::{Classification, SubstituteResponse};
use aho_corasick::{AhoCorasick, MatchKind};
use tracing::info;

/// Multi-pattern substring matcher over a filter list
#[derive(Debug, Clone)]
pub struct FilterEngine {
    automaton: AhoCorasick,
    list: FilterList,
}

impl FilterEngine {
    /// Build an engine from a validated filter list.
    pub fn new(list: FilterList) -> Result<Self, FilterListError> {
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(list.iter())?;

        info!("Filter engine built with {} fragments", list.len());

        Ok(Self { automaton, list })
    }

    /// Engine over the built-in seed list
    pub fn seed() -> Self {
        match Self::new(FilterList::seed()) {
            Ok(engine) => engine,
            // The seed list is a handful of short literals.
            Err(e) => unreachable!("seed filter list failed to build: {e}"),
        }
    }

    /// Classify a request target.
    ///
    /// Total over all inputs, including the empty string. Performs no I/O
    /// and no allocation.
    #[inline]
    pub fn classify(&self, url: &str) -> Classification {
        if self.is_blocked(url) {
            Classification::Blocked(SubstituteResponse::empty())
        } else {
            Classification::Allowed
        }
    }

    #[inline]
    pub fn is_blocked(&self, url: &str) -> bool {
        self.automaton.is_match(url)
    }

    /// A fragment found in `url`, for diagnostics only.
    pub fn matched_fragment(&self, url: &str) -> Option<&str> {
        let found = self.automaton.find(url)?;
        self.list.get(found.pattern().as_usize())
    }

    pub fn fragment_count(&self) -> usize {
        self.list.len()
    }

    pub fn filter_list(&self) -> &FilterList {
        &self.list
    }
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::seed()
    }
}
