//! Catalog assembly pipeline.
//!
//! Turns the store's flat two-level listing into an ordered [`Catalog`]:
//!
//! 1. List root entries sorted by name ascending. Failure here is fatal —
//!    without the root there is nothing to build.
//! 2. Drop root entries matching the reserved prefix, then list each
//!    remaining folder concurrently, newest first, capped at the configured
//!    limit. A folder whose listing fails or times out is skipped; one bad
//!    category never aborts the build.
//! 3. Drop placeholder sentinels and reserved-prefix entries from each
//!    folder's results, and omit folders left with zero assets.
//! 4. Resolve each surviving asset's public URL and derive its display URL.
//! 5. Assemble categories in root-listing order — never completion order.
//!
//! The fan-out uses [`futures::future::join_all`], which gathers results in
//! the order the futures were created, so ordering holds no matter how the
//! individual listings interleave.

use crate::catalog::{Asset, Catalog, Category};
use crate::config::SiteConfig;
use crate::storage::{EntryDescriptor, SortSpec, StorageError, StorageGateway};
use crate::transform::{RenderOptions, transform_url};
use futures::future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("root listing failed: {0}")]
    RootListing(#[from] StorageError),
}

/// Orchestrates one full build against a [`StorageGateway`].
///
/// Holds only configuration and the gateway handle; every call to
/// [`build`](Self::build) produces a fresh, independent snapshot.
pub struct CatalogBuilder {
    gateway: Arc<dyn StorageGateway>,
    per_category_limit: usize,
    reserved_prefix: String,
    placeholder_sentinel: String,
    category_timeout: Option<Duration>,
    render: RenderOptions,
}

impl CatalogBuilder {
    pub fn new(gateway: Arc<dyn StorageGateway>, config: &SiteConfig) -> Self {
        Self {
            gateway,
            per_category_limit: config.listing.per_category_limit,
            reserved_prefix: config.listing.reserved_prefix.clone(),
            placeholder_sentinel: config.listing.placeholder_sentinel.clone(),
            category_timeout: config.listing.category_timeout(),
            render: config.render.options(),
        }
    }

    /// Build one catalog snapshot.
    ///
    /// Errors only when the root listing itself fails; per-category problems
    /// are absorbed. An empty root is a valid, empty catalog.
    pub async fn build(&self) -> Result<Catalog, BuildError> {
        let roots = self
            .gateway
            .list_entries("", SortSpec::by_name_ascending())
            .await?;

        let candidates: Vec<EntryDescriptor> = roots
            .into_iter()
            .filter(|entry| !self.is_reserved(&entry.name))
            .collect();
        info!(folders = candidates.len(), "catalog build started");

        let fetches = candidates.iter().map(|entry| self.fetch_category(entry));
        let categories: Vec<Category> = future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        info!(
            categories = categories.len(),
            assets = categories.iter().map(|c| c.assets.len()).sum::<usize>(),
            "catalog build finished"
        );
        Ok(Catalog { categories })
    }

    /// Fetch and assemble one category, or `None` when it is skipped —
    /// either because its listing failed/timed out or because filtering
    /// left it empty.
    async fn fetch_category(&self, folder: &EntryDescriptor) -> Option<Category> {
        let entries = match self.list_folder(&folder.name).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %folder.name, error = %err, "skipping category: listing failed");
                return None;
            }
        };

        let assets: Vec<Asset> = entries
            .into_iter()
            .filter(|e| e.name != self.placeholder_sentinel && !self.is_reserved(&e.name))
            .map(|e| self.make_asset(&folder.name, e))
            .collect();

        if assets.is_empty() {
            debug!(path = %folder.name, "omitting category: no assets after filtering");
            return None;
        }
        Some(Category::new(folder.name.clone(), assets))
    }

    async fn list_folder(&self, path: &str) -> Result<Vec<EntryDescriptor>, StorageError> {
        let listing = self
            .gateway
            .list_entries(path, SortSpec::by_recency_descending(self.per_category_limit));
        match self.category_timeout {
            Some(limit) => tokio::time::timeout(limit, listing)
                .await
                .map_err(|_| StorageError::Timeout(path.to_string()))?,
            None => listing.await,
        }
    }

    fn make_asset(&self, folder: &str, entry: EntryDescriptor) -> Asset {
        let raw = self
            .gateway
            .resolve_public_url(&format!("{folder}/{}", entry.name));
        Asset {
            id: entry.id.unwrap_or_else(|| entry.name.clone()),
            display_url: transform_url(&raw, &self.render),
            created_at: entry.created_at,
        }
    }

    fn is_reserved(&self, name: &str) -> bool {
        !self.reserved_prefix.is_empty() && name.starts_with(&self.reserved_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn concrete_scenario_from_observed_store() {
        // Root: Weddings, .git, Urban.  Weddings holds one real photo plus
        // the placeholder; Urban is empty.  Only Weddings survives.
        let gw = gateway();
        gw.insert_folder("", vec![entry("Weddings"), entry(".git"), entry("Urban")]);
        gw.insert_folder(
            "Weddings",
            vec![entry("a.jpg"), entry(".emptyFolderPlaceholder")],
        );
        gw.insert_folder("Urban", vec![]);

        let catalog = builder(&gw).build().await.unwrap();

        assert_eq!(catalog.len(), 1);
        let weddings = &catalog.categories[0];
        assert_eq!(weddings.display_name, "Weddings");
        assert_eq!(weddings.assets.len(), 1);
        assert_eq!(weddings.assets[0].id, "a.jpg");
    }

    #[tokio::test]
    async fn empty_root_yields_empty_catalog_not_error() {
        let gw = gateway();
        gw.insert_folder("", vec![]);

        let catalog = builder(&gw).build().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn root_failure_is_fatal() {
        let gw = gateway();
        // No root folder inserted at all.
        let err = builder(&gw).build().await.unwrap_err();
        assert!(matches!(
            err,
            BuildError::RootListing(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn failing_category_is_skipped_not_fatal() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("alpine"), entry("urban")]);
        gw.insert_folder("alpine", vec![entry("a.jpg")]);
        gw.insert_folder("urban", vec![entry("u.jpg")]);
        gw.inject_fault("urban", crate::storage::InjectedFault::Transient);

        let catalog = builder(&gw).build().await.unwrap();
        let names: Vec<&str> = catalog
            .categories
            .iter()
            .map(|c| c.raw_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpine"]);
    }

    #[tokio::test]
    async fn timed_out_category_treated_like_failed_one() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("fast"), entry("slow")]);
        gw.insert_folder("fast", vec![entry("f.jpg")]);
        gw.insert_folder("slow", vec![entry("s.jpg")]);
        gw.set_delay("slow", std::time::Duration::from_millis(200));

        let mut b = builder(&gw);
        b.category_timeout = Some(std::time::Duration::from_millis(50));

        let catalog = b.build().await.unwrap();
        let names: Vec<&str> = catalog
            .categories
            .iter()
            .map(|c| c.raw_name.as_str())
            .collect();
        assert_eq!(names, vec!["fast"]);
    }

    #[tokio::test]
    async fn categories_keep_root_order_despite_completion_skew() {
        // The alphabetically-first category answers last; order must still
        // follow the root listing, not completion.
        let gw = gateway();
        gw.insert_folder("", vec![entry("alpine"), entry("macro"), entry("urban")]);
        gw.insert_folder("alpine", vec![entry("a.jpg")]);
        gw.insert_folder("macro", vec![entry("m.jpg")]);
        gw.insert_folder("urban", vec![entry("u.jpg")]);
        gw.set_delay("alpine", std::time::Duration::from_millis(80));
        gw.set_delay("macro", std::time::Duration::from_millis(40));

        let catalog = builder(&gw).build().await.unwrap();
        let names: Vec<&str> = catalog
            .categories
            .iter()
            .map(|c| c.raw_name.as_str())
            .collect();
        assert_eq!(names, vec!["alpine", "macro", "urban"]);
    }

    #[tokio::test]
    async fn per_category_cap_keeps_newest() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("city")]);
        gw.insert_folder(
            "city",
            vec![
                entry_at("oldest.jpg", 10),
                entry_at("newest.jpg", 40),
                entry_at("older.jpg", 20),
                entry_at("newer.jpg", 30),
            ],
        );

        let mut config = test_config();
        config.listing.per_category_limit = 2;
        let catalog = builder_with(&gw, &config).build().await.unwrap();

        let ids: Vec<&str> = catalog.categories[0]
            .assets
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["newest.jpg", "newer.jpg"]);
    }

    #[tokio::test]
    async fn asset_id_prefers_store_id_over_name() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("city")]);
        gw.insert_folder(
            "city",
            vec![entry_with_id("a.jpg", "3f2a"), entry("b.jpg")],
        );

        let catalog = builder(&gw).build().await.unwrap();
        let ids: Vec<&str> = catalog.categories[0]
            .assets
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert!(ids.contains(&"3f2a"));
        assert!(ids.contains(&"b.jpg"));
    }

    #[tokio::test]
    async fn display_urls_are_render_urls() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("city")]);
        gw.insert_folder("city", vec![entry("a.jpg")]);

        let catalog = builder(&gw).build().await.unwrap();
        let url = &catalog.categories[0].assets[0].display_url;
        assert!(url.contains("/render/image/public/"));
        assert!(url.contains("city/a.jpg"));
        assert!(url.contains("quality=85"));
    }

    #[tokio::test]
    async fn reserved_prefix_filters_assets_too() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("city")]);
        gw.insert_folder("city", vec![entry("a.jpg"), entry(".DS_Store")]);

        let catalog = builder(&gw).build().await.unwrap();
        assert_eq!(catalog.categories[0].assets.len(), 1);
        assert_eq!(catalog.categories[0].assets[0].id, "a.jpg");
    }

    #[tokio::test]
    async fn no_category_is_ever_empty() {
        let gw = gateway();
        gw.insert_folder("", vec![entry("ghost"), entry("real")]);
        gw.insert_folder("ghost", vec![entry(".emptyFolderPlaceholder")]);
        gw.insert_folder("real", vec![entry("r.jpg")]);

        let catalog = builder(&gw).build().await.unwrap();
        assert!(catalog.categories.iter().all(|c| !c.assets.is_empty()));
        assert_eq!(catalog.len(), 1);
    }
}
