//! Latest-only dispatching for search requests.
//!
//! Starting a search cancels the one still in flight, so an older response can
//! never overwrite the result of a newer query.

use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Result of a dispatched search.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<T> {
    /// The search ran to completion and is still the newest one.
    Completed(T),
    /// A newer search started before this one finished; its result is dropped.
    Superseded,
}

impl<T> SearchOutcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            SearchOutcome::Completed(value) => Some(value),
            SearchOutcome::Superseded => None,
        }
    }
}

/// Serializes overlapping searches so that only the newest one delivers.
#[derive(Debug, Default)]
pub struct LatestOnly {
    generation: AtomicU64,
    in_flight: Mutex<Option<(u64, CancellationToken)>>,
    debounce: Duration,
}

impl LatestOnly {
    /// A dispatcher that waits `debounce` before issuing each search.
    ///
    /// A zero duration disables debouncing and only cancels.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            ..Self::default()
        }
    }

    /// Cancels whatever search is currently running.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some((_, token)) = self.swap_token(None) {
            token.cancel();
        }
    }

    /// Runs `search` unless a newer call supersedes it first.
    ///
    /// The future produced by `search` is only created after the debounce
    /// window, so a superseded call issues no request at all when it is
    /// cancelled while waiting.
    pub async fn run<F, Fut, T>(&self, search: F) -> SearchOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let token = CancellationToken::new();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((_, previous)) = self.swap_token(Some((generation, token.clone()))) {
            previous.cancel();
        }

        let debounce = self.debounce;
        let work = async move {
            if !debounce.is_zero() {
                tokio::time::sleep(debounce).await;
            }
            search().await
        };

        let outcome = tokio::select! {
            _ = token.cancelled() => SearchOutcome::Superseded,
            value = work => {
                if self.generation.load(Ordering::SeqCst) == generation {
                    SearchOutcome::Completed(value)
                } else {
                    SearchOutcome::Superseded
                }
            }
        };

        self.clear_if_current(generation);

        outcome
    }

    fn swap_token(
        &self,
        entry: Option<(u64, CancellationToken)>,
    ) -> Option<(u64, CancellationToken)> {
        let mut guard = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, entry)
    }

    fn clear_if_current(&self, generation: u64) {
        let mut guard = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if guard.as_ref().is_some_and(|(current, _)| *current == generation) {
            *guard = None;
        }
    }
}
