//! Stateless HTTP request builder and response parser for the profile API.
//!
//! # Design
//! `ProfileClient` holds only a `base_url` and carries no mutable state
//! between calls. The single operation is split into `build_get_profile`,
//! which produces an `HttpRequest`, and `parse_get_profile`, which consumes
//! an `HttpResponse`. The host executes the round-trip in between.

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::UserProfile;

/// Path of the profile resource, relative to the base URL.
pub const PROFILE_PATH: &str = "/public-profile";

/// Synchronous, stateless client for the profile API.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A body-less GET for the profile resource, without query parameters.
    pub fn build_get_profile(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{PROFILE_PATH}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    pub fn parse_get_profile(&self, response: HttpResponse) -> Result<UserProfile, FetchError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Any 2xx is accepted; everything else is a fetch failure.
fn check_status(response: &HttpResponse) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    Err(FetchError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_BODY: &str = r#"{"id":"public-profile","name":"Allan Beier","city":"Thompsonmouth","email":"carmen.mcdermott@kaleb.ca"}"#;

    fn client() -> ProfileClient {
        ProfileClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_get_profile_produces_correct_request() {
        let req = client().build_get_profile();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/public-profile");
        assert!(req.body.is_none());
        assert!(!req.path.contains('?'));
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ProfileClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.build_get_profile().path,
            "http://localhost:3000/public-profile"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let client = ProfileClient::new("http://localhost:3000/api");
        assert_eq!(
            client.build_get_profile().path,
            "http://localhost:3000/api/public-profile"
        );
    }

    #[test]
    fn parse_get_profile_success() {
        let profile = client().parse_get_profile(response(200, PROFILE_BODY)).unwrap();
        assert_eq!(profile.name, "Allan Beier");
        assert_eq!(profile.email, "carmen.mcdermott@kaleb.ca");
        assert_eq!(profile.city, "Thompsonmouth");
    }

    #[test]
    fn parse_get_profile_accepts_any_2xx() {
        assert!(client().parse_get_profile(response(203, PROFILE_BODY)).is_ok());
    }

    #[test]
    fn parse_get_profile_not_found() {
        let err = client().parse_get_profile(response(404, "")).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "Request failed with status code 404");
    }

    #[test]
    fn parse_get_profile_server_error_keeps_body() {
        let err = client()
            .parse_get_profile(response(500, "internal error"))
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 500,
                body: "internal error".to_string()
            }
        );
    }

    #[test]
    fn parse_get_profile_bad_json() {
        let err = client().parse_get_profile(response(200, "not json")).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn parse_get_profile_wrong_shape() {
        let err = client()
            .parse_get_profile(response(200, r#"{"id":"public-profile"}"#))
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
