//! In-memory query cache with per-key fetch deduplication.
//!
//! # Design
//! `QueryCache` maps a string key to a slot. Each slot owns a `watch` channel
//! carrying the latest entry snapshot, so readers can peek or subscribe
//! without blocking, and an async fetch lock that serialises fetches for the
//! key. A caller that waited on the lock while another fetch completed
//! shares that outcome instead of issuing its own request: the entry's
//! `generation` tells it whether a fetch settled in the meantime.
//!
//! Whether a cached value is reused is decided by `QueryOptions`. The cache
//! never inspects the fetcher's error; it stores it and hands it back as is.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, warn};

/// The three mutually exclusive states of a query as observed by readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T, E> {
    /// No value has been resolved yet.
    Pending,
    /// The latest fetch failed.
    Error(E),
    /// The latest fetch resolved.
    Success(T),
}

impl<T, E> QueryState<T, E> {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryState::Pending)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, QueryState::Error(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryState::Success(_))
    }
}

/// Whether a new use of a key refetches a value that is already cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefetchOnMount {
    Always,
    #[default]
    IfStale,
    Never,
}

/// Per-call caching policy. The key and the fetcher are supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a successful value counts as fresh. Zero means always stale.
    pub stale_time: Duration,
    pub refetch_on_mount: RefetchOnMount,
    /// A disabled query never fetches and only reports the cached entry.
    pub enabled: bool,
    /// Extra attempts after a failed fetch, issued immediately.
    pub retry: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            refetch_on_mount: RefetchOnMount::default(),
            enabled: true,
            retry: 0,
        }
    }
}

impl QueryOptions {
    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn refetch_on_mount(mut self, refetch_on_mount: RefetchOnMount) -> Self {
        self.refetch_on_mount = refetch_on_mount;
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }
}

/// Snapshot of a query handed to callers.
///
/// `data` is the last successful value and survives a later failure, so a
/// reader can tell "failed, nothing to show" from "failed, showing old data".
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T, E> {
    pub state: QueryState<T, E>,
    pub data: Option<T>,
    pub error: Option<E>,
    pub is_pending: bool,
    pub is_error: bool,
    /// A fetch for the key is in flight.
    pub is_fetching: bool,
    /// When `data` was last replaced.
    pub updated_at: Option<Instant>,
}

impl<T, E> QueryResult<T, E> {
    fn pending() -> Self {
        Self {
            state: QueryState::Pending,
            data: None,
            error: None,
            is_pending: true,
            is_error: false,
            is_fetching: false,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T, E> {
    state: QueryState<T, E>,
    data: Option<T>,
    data_updated_at: Option<Instant>,
    is_fetching: bool,
    is_invalidated: bool,
    generation: u64,
}

impl<T: Clone, E: Clone> Entry<T, E> {
    fn new() -> Self {
        Self {
            state: QueryState::Pending,
            data: None,
            data_updated_at: None,
            is_fetching: false,
            is_invalidated: false,
            generation: 0,
        }
    }

    fn result(&self) -> QueryResult<T, E> {
        QueryResult {
            state: self.state.clone(),
            data: self.data.clone(),
            error: match &self.state {
                QueryState::Error(error) => Some(error.clone()),
                _ => None,
            },
            is_pending: self.state.is_pending(),
            is_error: self.state.is_error(),
            is_fetching: self.is_fetching,
            updated_at: self.data_updated_at,
        }
    }

    fn should_fetch(&self, options: &QueryOptions, now: Instant) -> bool {
        if !options.enabled {
            return false;
        }
        if self.is_invalidated {
            return true;
        }
        match self.state {
            QueryState::Pending | QueryState::Error(_) => true,
            QueryState::Success(_) => match options.refetch_on_mount {
                RefetchOnMount::Always => true,
                RefetchOnMount::Never => false,
                RefetchOnMount::IfStale => self.is_stale(options.stale_time, now),
            },
        }
    }

    fn is_stale(&self, stale_time: Duration, now: Instant) -> bool {
        match self.data_updated_at {
            Some(at) => now.saturating_duration_since(at) >= stale_time,
            None => true,
        }
    }

    fn settle(&mut self, outcome: Result<T, E>, now: Instant) {
        match outcome {
            Ok(value) => {
                self.data = Some(value.clone());
                self.data_updated_at = Some(now);
                self.state = QueryState::Success(value);
            }
            Err(error) => self.state = QueryState::Error(error),
        }
        self.is_fetching = false;
        self.is_invalidated = false;
        self.generation = self.generation.wrapping_add(1);
    }
}

struct Slot<T, E> {
    fetch_lock: tokio::sync::Mutex<()>,
    entry: watch::Sender<Entry<T, E>>,
}

impl<T: Clone, E: Clone> Slot<T, E> {
    fn new() -> Self {
        let (entry, _) = watch::channel(Entry::new());
        Self {
            fetch_lock: tokio::sync::Mutex::new(()),
            entry,
        }
    }

    fn result(&self) -> QueryResult<T, E> {
        self.entry.borrow().result()
    }

    fn generation(&self) -> u64 {
        self.entry.borrow().generation
    }
}

/// Clears `is_fetching` if the fetch future is dropped before it settles.
struct InFlight<'a, T, E> {
    entry: &'a watch::Sender<Entry<T, E>>,
}

impl<T, E> Drop for InFlight<'_, T, E> {
    fn drop(&mut self) {
        self.entry
            .send_if_modified(|entry| std::mem::replace(&mut entry.is_fetching, false));
    }
}

/// Receives a fresh `QueryResult` every time the entry for a key changes.
pub struct QueryObserver<T, E> {
    rx: watch::Receiver<Entry<T, E>>,
}

impl<T: Clone, E: Clone> QueryObserver<T, E> {
    pub fn current(&self) -> QueryResult<T, E> {
        self.rx.borrow().result()
    }

    /// Waits for the next change. Returns `None` once the key has been
    /// removed from the cache and no fetch still holds it.
    pub async fn changed(&mut self) -> Option<QueryResult<T, E>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().result())
    }
}

/// Process-scoped map from query key to cached result.
pub struct QueryCache<T, E> {
    slots: Mutex<HashMap<String, Arc<Slot<T, E>>>>,
}

impl<T, E> Default for QueryCache<T, E> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone, E: Clone + fmt::Display> QueryCache<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot<T, E>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, key: &str) -> Arc<Slot<T, E>> {
        self.slots()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Slot::new()))
            .clone()
    }

    /// Current snapshot for `key` without fetching.
    pub fn peek(&self, key: &str) -> QueryResult<T, E> {
        self.slots()
            .get(key)
            .map(|slot| slot.result())
            .unwrap_or_else(QueryResult::pending)
    }

    pub fn subscribe(&self, key: &str) -> QueryObserver<T, E> {
        QueryObserver {
            rx: self.slot(key).entry.subscribe(),
        }
    }

    /// Resolves `key` according to `options`.
    ///
    /// Serves the cached entry when it is fresh enough, otherwise runs
    /// `fetcher` (or joins a fetch already in flight for the key) and stores
    /// the outcome.
    pub async fn fetch<F, Fut>(
        &self,
        key: &str,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryResult<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);
        let (should_fetch, seen) = {
            let entry = slot.entry.borrow();
            (entry.should_fetch(options, Instant::now()), entry.generation)
        };
        if !should_fetch {
            debug!(key, "serving cached query");
            return slot.result();
        }
        self.run(key, &slot, seen, options.retry, fetcher).await
    }

    /// Fetches `key` regardless of staleness or `enabled`.
    pub async fn refetch<F, Fut>(
        &self,
        key: &str,
        options: &QueryOptions,
        fetcher: F,
    ) -> QueryResult<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let slot = self.slot(key);
        let seen = slot.generation();
        self.run(key, &slot, seen, options.retry, fetcher).await
    }

    async fn run<F, Fut>(
        &self,
        key: &str,
        slot: &Slot<T, E>,
        seen: u64,
        retry: u32,
        fetcher: F,
    ) -> QueryResult<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let _lock = slot.fetch_lock.lock().await;
        if slot.generation() != seen {
            debug!(key, "joined in-flight query");
            return slot.result();
        }

        slot.entry.send_modify(|entry| entry.is_fetching = true);
        let _in_flight = InFlight { entry: &slot.entry };
        debug!(key, "fetching query");

        let mut outcome = fetcher().await;
        let mut attempt = 0;
        while outcome.is_err() && attempt < retry {
            attempt += 1;
            debug!(key, attempt, "retrying query");
            outcome = fetcher().await;
        }

        match &outcome {
            Ok(_) => debug!(key, "query resolved"),
            Err(error) => warn!(key, error = %error, "query failed"),
        }
        slot.entry.send_modify(|entry| entry.settle(outcome, Instant::now()));
        slot.result()
    }

    /// Marks `key` stale so its next use refetches. Returns `false` when the
    /// key has never been used.
    pub fn invalidate(&self, key: &str) -> bool {
        match self.slots().get(key) {
            Some(slot) => {
                slot.entry.send_modify(|entry| entry.is_invalidated = true);
                true
            }
            None => false,
        }
    }

    /// Drops the entry for `key`.
    pub fn remove(&self, key: &str) -> bool {
        self.slots().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }
}
