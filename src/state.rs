//! Build lifecycle state and staleness guard.
//!
//! Presentation reads the pipeline through [`CatalogState`], a tagged union
//! that makes impossible combinations ("loading and ready at once")
//! unrepresentable. [`CatalogLoader`] owns the current state and serializes
//! publication: every `load` call is stamped with a monotonically increasing
//! generation, and only the result belonging to the highest generation issued
//! so far may be published. A build that resolves after a newer one was
//! issued is dropped silently — re-triggering a load can never be overwritten
//! by a slower, older build.
//!
//! Published catalogs sit behind an `Arc`, so reading the state hands out a
//! cheap snapshot with no locking beyond the state fetch itself.

use crate::builder::CatalogBuilder;
use crate::catalog::Catalog;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Lifecycle of the catalog as seen by consumers.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    /// No build has been requested yet.
    #[default]
    Idle,
    /// A build is in flight and no newer result has been published.
    Loading,
    /// The most recent build succeeded.
    Ready(Arc<Catalog>),
    /// The most recent build failed fatally; the reason is display-ready.
    Failed(String),
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&Arc<Catalog>> {
        match self {
            CatalogState::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, CatalogState::Loading)
    }
}

/// Owns the builder and the published state; re-entrant trigger point.
pub struct CatalogLoader {
    builder: CatalogBuilder,
    issued: AtomicU64,
    state: Mutex<CatalogState>,
}

impl CatalogLoader {
    pub fn new(builder: CatalogBuilder) -> Self {
        Self {
            builder,
            issued: AtomicU64::new(0),
            state: Mutex::new(CatalogState::Idle),
        }
    }

    /// Current state snapshot. `Ready` clones share the published catalog.
    pub async fn state(&self) -> CatalogState {
        self.state.lock().await.clone()
    }

    /// Run one build and publish its result unless a newer load was issued
    /// in the meantime. Returns the state as observed after this attempt,
    /// which for a stale build is the newer generation's state.
    pub async fn load(&self) -> CatalogState {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().await;
            if generation == self.issued.load(Ordering::SeqCst) {
                *state = CatalogState::Loading;
            }
        }

        let result = self.builder.build().await;

        let mut state = self.state.lock().await;
        if generation != self.issued.load(Ordering::SeqCst) {
            debug!(generation, "dropping stale build result");
            return state.clone();
        }
        *state = match result {
            Ok(catalog) => CatalogState::Ready(Arc::new(catalog)),
            Err(err) => {
                warn!(error = %err, "catalog build failed");
                CatalogState::Failed(err.to_string())
            }
        };
        state.clone()
    }
}
