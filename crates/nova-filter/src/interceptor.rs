//! Request Interception
//!
//! The capability a browser host installs on its request hook: anything
//! that, given an outgoing request, answers "serve this substitute" or
//! "proceed as usual". Hosts adapt their native hook shape to
//! [`RequestInterceptor::intercept`]; the engine knows nothing about them.
//!
//! Flow:
//! 1. Host is about to fetch a resource
//! 2. Host calls `intercept` with the request
//! 3. Blocked -> host serves the substitute, no fetch
//! 4. Allowed -> host performs its default fetch unmodified

use crate::engine::FilterEngine;
use crate::response::Classification;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Read-only view of an outgoing request. Only the target URL is consulted.
pub trait ResourceRequest {
    /// Fully resolved absolute URL of the request
    fn target_url(&self) -> &str;
}

impl ResourceRequest for &str {
    fn target_url(&self) -> &str {
        self
    }
}

impl ResourceRequest for String {
    fn target_url(&self) -> &str {
        self
    }
}

/// Owned request descriptor for hosts without their own request type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    url: String,
}

impl OutgoingRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl ResourceRequest for OutgoingRequest {
    fn target_url(&self) -> &str {
        &self.url
    }
}

/// Anything that can decide whether an outgoing request is served a
/// substitute or fetched normally.
pub trait RequestInterceptor: Send + Sync {
    fn intercept(&self, request: &dyn ResourceRequest) -> Classification;
}

impl RequestInterceptor for FilterEngine {
    #[inline]
    fn intercept(&self, request: &dyn ResourceRequest) -> Classification {
        self.classify(request.target_url())
    }
}

impl<T: RequestInterceptor + ?Sized> RequestInterceptor for std::sync::Arc<T> {
    #[inline]
    fn intercept(&self, request: &dyn ResourceRequest) -> Classification {
        (**self).intercept(request)
    }
}

/// Interception counters
#[derive(Debug, Default)]
pub struct InterceptorStats {
    pub total_requests: AtomicU64,
    pub blocked_requests: AtomicU64,
}

impl InterceptorStats {
    /// (total, blocked)
    pub fn snapshot(&self) -> (u64, u64) {
        (
            self.total_requests.load(Ordering::Relaxed),
            self.blocked_requests.load(Ordering::Relaxed),
        )
    }
}

/// Wraps an interceptor and counts what passes through it.
///
/// Counting lives here, on the host side, so classification itself stays
/// free of side effects.
#[derive(Debug)]
pub struct CountingInterceptor<I> {
    inner: I,
    stats: InterceptorStats,
}

impl<I: RequestInterceptor> CountingInterceptor<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            stats: InterceptorStats::default(),
        }
    }

    pub fn stats(&self) -> &InterceptorStats {
        &self.stats
    }

    pub fn inner(&self) -> &I {
        &self.inner
    }
}

impl<I: RequestInterceptor> RequestInterceptor for CountingInterceptor<I> {
    fn intercept(&self, request: &dyn ResourceRequest) -> Classification {
        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);

        let result = self.inner.intercept(request);
        if result.is_blocked() {
            let blocked = self.stats.blocked_requests.fetch_add(1, Ordering::Relaxed) + 1;
            let url = request.target_url();
            trace!("Blocked ({}): {}", blocked, &url[..floor_char_boundary(url, 80)]);
        }
        result
    }
}

/// Largest char boundary not past `max`, for truncating log output
fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}
