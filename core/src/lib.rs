//! API client core for the public profile service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and provides the in-memory
//! query cache the host wraps around its fetches.
//!
//! # Design
//! - `ProfileClient` is stateless; it holds only `base_url`.
//! - The profile operation is split into `build_get_profile` (produces the
//!   request) and `parse_get_profile` (consumes the response), so the I/O
//!   boundary is explicit.
//! - `QueryCache` is generic over the value and error types and knows nothing
//!   about HTTP; the host binds a key to a fetch function.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod query;
pub mod types;

pub use client::{ProfileClient, PROFILE_PATH};
pub use error::FetchError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use query::{QueryCache, QueryObserver, QueryOptions, QueryResult, QueryState, RefetchOnMount};
pub use types::UserProfile;
