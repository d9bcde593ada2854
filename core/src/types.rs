//! Domain DTOs for the profile API.
//!
//! # Design
//! `UserProfile` mirrors the mock-server's schema but is defined
//! independently. Integration tests in the app crate catch any schema drift
//! between the two crates.

use serde::{Deserialize, Serialize};

/// The public user profile returned by `GET /public-profile`.
///
/// Replaced wholesale on every successful fetch; never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub city: String,
    pub email: String,
}
