//! Profile query hook: the accessor bound to the `"profile"` cache key.

use std::sync::Arc;

use profile_core::{FetchError, QueryCache, QueryObserver, QueryOptions, QueryResult, UserProfile};

use crate::api::ProfileApi;
use crate::transport::Transport;

pub const PROFILE_QUERY_KEY: &str = "profile";

pub type ProfileCache = QueryCache<UserProfile, FetchError>;
pub type ProfileResult = QueryResult<UserProfile, FetchError>;

/// Cheap to clone; clones share the cache and the accessor.
pub struct ProfileQuery<T> {
    cache: Arc<ProfileCache>,
    api: Arc<ProfileApi<T>>,
}

impl<T> Clone for ProfileQuery<T> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            api: Arc::clone(&self.api),
        }
    }
}

impl<T: Transport> ProfileQuery<T> {
    pub fn new(cache: Arc<ProfileCache>, api: ProfileApi<T>) -> Self {
        Self {
            cache,
            api: Arc::new(api),
        }
    }

    /// Resolves the profile through the cache. `None` uses the default
    /// options: always stale, refetch on use, no retries.
    pub async fn use_profile(&self, options: Option<QueryOptions>) -> ProfileResult {
        let options = options.unwrap_or_default();
        let api: &ProfileApi<T> = &self.api;
        self.cache
            .fetch(PROFILE_QUERY_KEY, &options, move || api.get_profile())
            .await
    }

    /// Fetches even when the cached profile is fresh.
    pub async fn refetch(&self, options: Option<QueryOptions>) -> ProfileResult {
        let options = options.unwrap_or_default();
        let api: &ProfileApi<T> = &self.api;
        self.cache
            .refetch(PROFILE_QUERY_KEY, &options, move || api.get_profile())
            .await
    }

    pub fn current(&self) -> ProfileResult {
        self.cache.peek(PROFILE_QUERY_KEY)
    }

    pub fn subscribe(&self) -> QueryObserver<UserProfile, FetchError> {
        self.cache.subscribe(PROFILE_QUERY_KEY)
    }

    pub fn invalidate(&self) -> bool {
        self.cache.invalidate(PROFILE_QUERY_KEY)
    }
}
