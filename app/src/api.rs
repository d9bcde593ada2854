//! Profile data accessor.

use profile_core::{FetchError, ProfileClient, UserProfile};

use crate::transport::Transport;

/// Binds the request builder to a transport.
pub struct ProfileApi<T> {
    client: ProfileClient,
    transport: T,
}

impl<T: Transport> ProfileApi<T> {
    pub fn new(client: ProfileClient, transport: T) -> Self {
        Self { client, transport }
    }

    /// Issues one `GET /public-profile` and parses the body.
    ///
    /// Transport, status and decode failures are returned as produced; there
    /// is no retry or timeout policy here.
    pub async fn get_profile(&self) -> Result<UserProfile, FetchError> {
        let request = self.client.build_get_profile();
        let response = self.transport.execute(request).await?;
        self.client.parse_get_profile(response)
    }
}
