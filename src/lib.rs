//! # Remote Gal
//!
//! Catalog builder for photo portfolios hosted in remote object storage.
//! A bucket's top-level folders become gallery categories, their newest
//! uploads become display-ready assets, and the whole thing is assembled
//! into an immutable snapshot that presentation code only reads.
//!
//! # Architecture: One Pipeline, One Snapshot
//!
//! ```text
//! CatalogLoader ── triggers ──▶ CatalogBuilder
//!                                   │  list root (name asc)     ── fatal on error
//!                                   │  list folders, fanned out ── skip on error
//!                                   │  filter, transform, order
//!                                   ▼
//!                               Catalog (immutable)
//!                                   │
//! CatalogState ◀── published when still the newest generation
//! ```
//!
//! Every build produces a complete catalog or nothing; there is no
//! incremental merge. Presentation reads [`state::CatalogState`] — a tagged
//! union of `Idle`, `Loading`, `Ready`, and `Failed` — and can never observe
//! a half-built result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Snapshot model: `Catalog`, `Category`, `Asset` |
//! | [`storage`] | `StorageGateway` trait, listing types, in-memory test gateway |
//! | [`supabase`] | HTTP gateway against the Supabase Storage API |
//! | [`transform`] | Pure display-URL rewrite (direct → render endpoint) |
//! | [`builder`] | Discovery, filtering, concurrent fan-out, ordered assembly |
//! | [`state`] | Lifecycle tagged union + generation-guarded publication |
//! | [`config`] | `config.toml` loading, validation, stock config |
//! | [`output`] | CLI output formatting — tree display of a snapshot |
//!
//! # Design Decisions
//!
//! ## Gateway Trait at the Store Seam
//!
//! The pipeline depends on [`storage::StorageGateway`], not on any concrete
//! store. Listing and public-URL resolution are the only two operations the
//! pipeline needs, so that is the whole trait. Tests run against the
//! in-memory gateway with injectable faults and delays; production runs
//! against [`supabase::SupabaseGateway`].
//!
//! ## Fan-Out That Preserves Root Order
//!
//! Per-category listings are independent network calls, so they run
//! concurrently — total latency is bounded by the slowest category, not the
//! sum. The gather uses `join_all`, which returns results in the order the
//! futures were created, making the ordering guarantee structural rather
//! than an accident of iteration.
//!
//! ## Failure Isolation by Construction
//!
//! Only the root listing can fail a build. Every per-category problem —
//! transient store error, timeout, a folder emptied down to its placeholder
//! — collapses to "this category is absent from the snapshot", logged and
//! moved past. A portfolio with one broken gallery still renders the rest.
//!
//! ## Generation Guard Instead of Cancellation
//!
//! Re-triggering a load while one is in flight does not cancel the old
//! build; it outbids it. Each load gets a monotonically increasing
//! generation, and publication compares generations under the state lock.
//! The slow, stale build completes, finds itself outbid, and is dropped.
//! This is simpler than plumbing cancellation through the gateway and is
//! just as correct for a read-only pipeline.
//!
//! ## Pass-Through URL Transformation
//!
//! Display URLs are derived by rewriting the store's direct-download URL to
//! its render endpoint with size and quality parameters. URLs the rewrite
//! does not recognize pass through untouched — a raw original is a worse
//! image but a working one, so malformed references degrade instead of
//! erroring.

pub mod builder;
pub mod catalog;
pub mod config;
pub mod output;
pub mod state;
pub mod storage;
pub mod supabase;
pub mod transform;

#[cfg(test)]
pub(crate) mod test_helpers;
