//! Nova Filter
//!
//! Request interception for an embedded browser view: decides whether an
//! outgoing resource request targets a known ad/tracking fragment and, if
//! so, hands back an empty substitute response instead of a fetch.
//!
//! Architecture:
//! 1. Fragments are validated into a `FilterList` once at startup
//! 2. `FilterEngine` compiles the list into an Aho-Corasick automaton
//! 3. The host calls `intercept` for every request before fetching
//! 4. Blocked -> serve `SubstituteResponse`; Allowed -> fetch as usual

mod config;
mod engine;
mod fragments;
mod interceptor;
mod response;
mod shared;

pub use config::{FilterConfig, ListMode, CONFIG_ENV_VAR};
pub use engine::FilterEngine;
pub use fragments::{FilterList, FilterListError, SEED_FRAGMENTS};
pub use interceptor::{
    CountingInterceptor, InterceptorStats, OutgoingRequest, RequestInterceptor, ResourceRequest,
};
pub use response::{Classification, SubstituteResponse, SUBSTITUTE_ENCODING, SUBSTITUTE_MIME_TYPE};
pub use shared::SharedFilter;
