//! Shared test utilities for the remote-gal test suite.
//!
//! Entry and gateway builders for exercising the pipeline against
//! [`MemoryGateway`] trees, plus a stock test configuration. The base URL
//! used by the test gateway includes the direct-download segment so display
//! URLs go through the render rewrite exactly like production URLs.

use crate::builder::CatalogBuilder;
use crate::config::SiteConfig;
use crate::storage::{EntryDescriptor, MemoryGateway};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

pub const TEST_BASE_URL: &str = "https://store.test/storage/v1/object/public/portfolio";

/// Empty in-memory gateway; tests insert folders as needed.
pub fn gateway() -> Arc<MemoryGateway> {
    Arc::new(MemoryGateway::new(TEST_BASE_URL))
}

/// Entry with neither id nor timestamp (folder rows, minimal objects).
pub fn entry(name: &str) -> EntryDescriptor {
    EntryDescriptor {
        name: name.to_string(),
        id: None,
        created_at: None,
    }
}

/// Entry created `secs` seconds after the epoch, for recency ordering.
pub fn entry_at(name: &str, secs: i64) -> EntryDescriptor {
    EntryDescriptor {
        created_at: Some(Utc.timestamp_opt(secs, 0).unwrap()),
        ..entry(name)
    }
}

/// Entry with a store-provided id.
pub fn entry_with_id(name: &str, id: &str) -> EntryDescriptor {
    EntryDescriptor {
        id: Some(id.to_string()),
        ..entry(name)
    }
}

/// Stock config with the category timeout disabled so no test ever races a
/// wall-clock deadline it didn't ask for.
pub fn test_config() -> SiteConfig {
    let mut config = SiteConfig::default();
    config.listing.category_timeout_secs = 0;
    config
}

pub fn builder(gateway: &Arc<MemoryGateway>) -> CatalogBuilder {
    builder_with(gateway, &test_config())
}

pub fn builder_with(gateway: &Arc<MemoryGateway>, config: &SiteConfig) -> CatalogBuilder {
    CatalogBuilder::new(Arc::clone(gateway) as Arc<dyn crate::storage::StorageGateway>, config)
}
