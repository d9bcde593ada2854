//! Error types for the profile API client.
//!
//! # Design
//! There is a single failure category, "fetch failure". The variants only
//! record where the failure came from; every variant renders as a
//! human-readable message through `Display`, and callers are not expected to
//! treat them differently. `Clone` and `PartialEq` let the query cache store
//! the error and hand back the exact value the fetcher produced.

/// Errors produced while fetching the profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response. The transport's message is kept
    /// verbatim.
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),
}
