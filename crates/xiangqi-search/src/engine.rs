//! Asynchronous front end to the [`Searcher`].
//!
//! Searches run on tokio's blocking pool so the calling runtime stays
//! responsive. One searcher (and its transposition cache) is shared by every
//! search an [`Engine`] starts; searches queue on its lock.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;
use xiangqi_engine::Board;

use crate::config::SearchConfig;
use crate::search::{SearchResult, Searcher};

/// Errors reported by the asynchronous engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The blocking search task panicked or was aborted.
    #[error("Search task failed: {0}")]
    TaskFailed(#[from] JoinError),
}

/// A search running in the background.
///
/// Resolves to `Ok(None)` if the board has no legal move or the search was
/// cancelled.
#[derive(Debug)]
pub struct SearchTask {
    handle: JoinHandle<Option<SearchResult>>,
    stop: Arc<AtomicBool>,
}

impl SearchTask {
    /// Asks the search to stop. The task still has to be awaited.
    pub fn cancel(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

impl Future for SearchTask {
    type Output = Result<Option<SearchResult>, EngineError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.handle)
            .poll(cx)
            .map(|joined| joined.map_err(EngineError::from))
    }
}

/// Shareable search engine.
#[derive(Debug)]
pub struct Engine {
    searcher: Arc<Mutex<Searcher>>,
    current: Mutex<Option<Arc<AtomicBool>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Engine {
            searcher: Arc::new(Mutex::new(Searcher::new(config))),
            current: Mutex::new(None),
        }
    }

    /// Starts a search of `board` on the blocking pool.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_search(&self, board: Board) -> SearchTask {
        let stop = Arc::new(AtomicBool::new(false));
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&stop));

        let searcher = Arc::clone(&self.searcher);
        let flag = Arc::clone(&stop);
        let handle = tokio::task::spawn_blocking(move || {
            let mut searcher = searcher.lock().unwrap_or_else(PoisonError::into_inner);
            searcher.set_stop_flag(flag);
            searcher.find_best_move(&board)
        });

        SearchTask { handle, stop }
    }

    /// Searches `board` and waits for the result.
    pub async fn find_best_move(&self, board: &Board) -> Result<Option<SearchResult>, EngineError> {
        self.spawn_search(board.clone()).await
    }

    /// Cancels the most recently started search, if any.
    pub fn cancel(&self) {
        if let Some(stop) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            debug!("cancelling search");
            stop.store(true, Ordering::Relaxed);
        }
    }

    /// Clears the transposition cache. Waits for a running search.
    pub fn clear_cache(&self) {
        self.lock_searcher().clear_cache();
    }

    /// Number of cached entries. Waits for a running search.
    pub fn cache_size(&self) -> usize {
        self.lock_searcher().cache_size()
    }

    pub fn config(&self) -> SearchConfig {
        *self.lock_searcher().config()
    }

    /// Replaces the search limits for subsequent searches.
    pub fn set_config(&self, config: SearchConfig) {
        self.lock_searcher().set_config(config);
    }

    fn lock_searcher(&self) -> std::sync::MutexGuard<'_, Searcher> {
        self.searcher.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
