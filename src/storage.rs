//! Object-store gateway contract.
//!
//! The catalog pipeline never talks to a concrete store directly; it goes
//! through [`StorageGateway`], which covers the two operations the pipeline
//! needs: list the entries under a path, and resolve the public URL of a
//! single object. [`crate::supabase`] implements it over HTTP; the
//! [`MemoryGateway`] here backs tests with injectable failures and delays.
//!
//! Listing is inherently remote and fallible; URL resolution is a pure
//! derivation from configuration plus the path, so it is synchronous.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("path not found: {0}")]
    NotFound(String),
    #[error("transient storage failure: {0}")]
    Transient(String),
    #[error("listing timed out: {0}")]
    Timeout(String),
}

/// One entry as reported by a store listing.
///
/// `id` and `created_at` are optional because stores report them
/// inconsistently: folder pseudo-entries have neither, and some backends
/// omit ids for objects uploaded out-of-band.
#[derive(Debug, Clone)]
pub struct EntryDescriptor {
    pub name: String,
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Ordering and cap for a listing request.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub column: SortColumn,
    pub order: SortOrder,
    /// Maximum number of entries to return; `None` means store default.
    pub limit: Option<usize>,
}

impl SortSpec {
    /// Root discovery order: folder names, A→Z, uncapped.
    pub fn by_name_ascending() -> Self {
        Self {
            column: SortColumn::Name,
            order: SortOrder::Ascending,
            limit: None,
        }
    }

    /// Per-category order: newest uploads first, capped at `limit`.
    pub fn by_recency_descending(limit: usize) -> Self {
        Self {
            column: SortColumn::CreatedAt,
            order: SortOrder::Descending,
            limit: Some(limit),
        }
    }
}

/// Remote object store seen through the two operations the pipeline needs.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// List the entries directly under `path` (`""` for the bucket root).
    async fn list_entries(
        &self,
        path: &str,
        sort: SortSpec,
    ) -> Result<Vec<EntryDescriptor>, StorageError>;

    /// Public URL of the object at `path`. Pure derivation, no I/O.
    fn resolve_public_url(&self, path: &str) -> String;
}

// ============================================================================
// In-memory gateway for tests
// ============================================================================

/// Failure to inject for a specific path in [`MemoryGateway`].
#[derive(Debug, Clone, Copy)]
pub enum InjectedFault {
    NotFound,
    Transient,
}

/// In-memory store for tests. Not suitable for production.
///
/// Folders are keyed by listing path (`""` is the root). Tests can inject a
/// fault or an artificial listing delay per path to exercise partial-failure
/// isolation, timeouts, and completion-order skew. Thread-safe via `RwLock`
/// so a shared gateway can be reconfigured between builds.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    folders: RwLock<HashMap<String, Vec<EntryDescriptor>>>,
    faults: RwLock<HashMap<String, InjectedFault>>,
    delays: RwLock<HashMap<String, Duration>>,
    base_url: String,
}

impl MemoryGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the entries listed under `path`, replacing any previous listing.
    pub fn insert_folder(&self, path: &str, entries: Vec<EntryDescriptor>) {
        self.folders
            .write()
            .expect("gateway lock poisoned")
            .insert(path.to_string(), entries);
    }

    /// Make every listing of `path` fail with the given fault.
    pub fn inject_fault(&self, path: &str, fault: InjectedFault) {
        self.faults
            .write()
            .expect("gateway lock poisoned")
            .insert(path.to_string(), fault);
    }

    /// Remove a previously injected fault from `path`.
    pub fn clear_fault(&self, path: &str) {
        self.faults
            .write()
            .expect("gateway lock poisoned")
            .remove(path);
    }

    /// Delay every listing of `path` by `delay` before responding.
    pub fn set_delay(&self, path: &str, delay: Duration) {
        self.delays
            .write()
            .expect("gateway lock poisoned")
            .insert(path.to_string(), delay);
    }

    fn lookup(&self, path: &str, sort: SortSpec) -> Result<Vec<EntryDescriptor>, StorageError> {
        if let Some(fault) = self.faults.read().map_err(poisoned)?.get(path) {
            return Err(match fault {
                InjectedFault::NotFound => StorageError::NotFound(path.to_string()),
                InjectedFault::Transient => {
                    StorageError::Transient(format!("injected failure listing {path}"))
                }
            });
        }

        let folders = self.folders.read().map_err(poisoned)?;
        let mut entries = folders
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;

        entries.sort_by(|a, b| {
            let ord = match sort.column {
                SortColumn::Name => a.name.cmp(&b.name),
                // Undated entries compare lowest, so recency-descending
                // listings put them last.
                SortColumn::CreatedAt => match (&a.created_at, &b.created_at) {
                    (Some(x), Some(y)) => x.cmp(y),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                },
            };
            match sort.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        if let Some(limit) = sort.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Transient("gateway lock poisoned".to_string())
}

#[async_trait]
impl StorageGateway for MemoryGateway {
    async fn list_entries(
        &self,
        path: &str,
        sort: SortSpec,
    ) -> Result<Vec<EntryDescriptor>, StorageError> {
        let delay = self
            .delays
            .read()
            .map_err(poisoned)?
            .get(path)
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.lookup(path, sort)
    }

    fn resolve_public_url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}
