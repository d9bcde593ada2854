use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub city: String,
    pub email: String,
}

impl Profile {
    /// The record served at `/public-profile` by default.
    pub fn fixture() -> Self {
        Self {
            id: "public-profile".to_string(),
            name: "Allan Beier".to_string(),
            city: "Thompsonmouth".to_string(),
            email: "carmen.mcdermott@kaleb.ca".to_string(),
        }
    }
}

/// Shared server state. Clones share the same profile slot and hit counter,
/// so a test can keep one handle and inspect it while the server runs.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    profile: Arc<RwLock<Option<Profile>>>,
    hits: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(profile: Option<Profile>) -> Self {
        Self {
            profile: Arc::new(RwLock::new(profile)),
            hits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `GET /public-profile` requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub async fn set_profile(&self, profile: Option<Profile>) {
        *self.profile.write().await = profile;
    }
}

pub fn app() -> Router {
    app_with_state(AppState::new(Some(Profile::fixture())))
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/public-profile", get(get_profile))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<Profile>, StatusCode> {
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    debug!(hit, "serving public profile");
    let profile = state.profile.read().await;
    profile.clone().map(Json).ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_serializes_to_expected_shape() {
        let json = serde_json::to_value(Profile::fixture()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "public-profile",
                "name": "Allan Beier",
                "city": "Thompsonmouth",
                "email": "carmen.mcdermott@kaleb.ca"
            })
        );
    }

    #[test]
    fn default_state_has_no_profile() {
        let state = AppState::default();
        assert_eq!(state.hits(), 0);
        assert!(state.profile.try_read().unwrap().is_none());
    }

    #[tokio::test]
    async fn set_profile_is_shared_between_clones() {
        let state = AppState::new(None);
        let handle = state.clone();
        handle.set_profile(Some(Profile::fixture())).await;
        assert_eq!(*state.profile.read().await, Some(Profile::fixture()));
    }
}
