//! Host layer for the profile viewer.
//!
//! # Overview
//! Wires the I/O-free `profile-core` to the network and the terminal:
//! UI component → query hook → data accessor → transport → server.
//!
//! # Design
//! - `transport` executes core `HttpRequest` values with reqwest.
//! - `api::ProfileApi::get_profile` is the data accessor.
//! - `hooks::ProfileQuery` binds the accessor to the `"profile"` cache key.
//! - `ui` renders a query snapshot into one of three screens.

pub mod api;
pub mod config;
pub mod hooks;
pub mod telemetry;
pub mod transport;
pub mod ui;

pub use api::ProfileApi;
pub use config::Config;
pub use hooks::{ProfileCache, ProfileQuery, ProfileResult, PROFILE_QUERY_KEY};
pub use transport::{ReqwestTransport, Transport};
pub use ui::{render, App, Screen};
