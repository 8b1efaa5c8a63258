//! Live-updatable filter.
//!
//! Readers always see one complete engine. Updates build a new engine off
//! to the side and publish it with a single atomic pointer swap; the list
//! behind a snapshot is never mutated in place.

use crate::engine::FilterEngine;
use crate::fragments::{FilterList, FilterListError};
use crate::interceptor::{RequestInterceptor, ResourceRequest};
use crate::response::Classification;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filter engine behind an atomically replaceable snapshot
#[derive(Debug)]
pub struct SharedFilter {
    current: ArcSwap<FilterEngine>,
}

impl SharedFilter {
    pub fn new(engine: FilterEngine) -> Self {
        Self {
            current: ArcSwap::from_pointee(engine),
        }
    }

    /// Classify against whichever snapshot is current. Lock-free.
    #[inline]
    pub fn classify(&self, url: &str) -> Classification {
        self.current.load().classify(url)
    }

    /// The current snapshot. Holding it pins that engine alive even if a
    /// newer one is published meanwhile.
    pub fn snapshot(&self) -> Arc<FilterEngine> {
        self.current.load_full()
    }

    /// Publish a fully built engine, returning the one it replaced.
    pub fn publish(&self, engine: FilterEngine) -> Arc<FilterEngine> {
        let fragments = engine.fragment_count();
        let previous = self.current.swap(Arc::new(engine));
        debug!(
            "Published filter snapshot: {} -> {} fragments",
            previous.fragment_count(),
            fragments
        );
        previous
    }

    /// Build an engine for `list` and publish it. On failure the current
    /// snapshot stays in place.
    pub fn replace_list(&self, list: FilterList) -> Result<(), FilterListError> {
        match FilterEngine::new(list) {
            Ok(engine) => {
                self.publish(engine);
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous filter snapshot: {}", e);
                Err(e)
            }
        }
    }
}

impl Default for SharedFilter {
    fn default() -> Self {
        Self::new(FilterEngine::seed())
    }
}

impl RequestInterceptor for SharedFilter {
    #[inline]
    fn intercept(&self, request: &dyn ResourceRequest) -> Classification {
        self.classify(request.target_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_list_swaps_snapshot() {
        let shared = SharedFilter::default();
        assert!(shared.classify("https://openx.net/").is_blocked());
        assert!(shared.classify("https://tracker.example/").is_allowed());

        shared
            .replace_list(FilterList::new(["tracker.example"]).unwrap())
            .unwrap();

        assert!(shared.classify("https://openx.net/").is_allowed());
        assert!(shared.classify("https://tracker.example/").is_blocked());
    }

    #[test]
    fn test_old_snapshot_is_untouched() {
        let shared = SharedFilter::default();
        let before = shared.snapshot();

        let previous = shared.publish(FilterEngine::new(FilterList::default()).unwrap());

        assert!(Arc::ptr_eq(&before, &previous));
        assert!(before.classify("https://doubleclick.net/").is_blocked());
        assert!(shared.classify("https://doubleclick.net/").is_allowed());
    }
}
