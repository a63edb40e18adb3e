//! Site configuration module.
//!
//! Handles loading and validating `config.toml`. Configuration is sparse:
//! stock defaults cover every key, user files override only what they set,
//! and unknown keys are rejected to catch typos early.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! bucket = "portfolio"          # Object-store bucket holding the galleries
//!
//! [listing]
//! per_category_limit = 15       # Newest N assets kept per category
//! reserved_prefix = "."         # Entries starting with this never enter the catalog
//! placeholder_sentinel = ".emptyFolderPlaceholder"  # Empty-folder marker entry
//! category_timeout_secs = 10    # Per-category listing timeout; 0 disables
//!
//! [render]
//! dimension = { height = 1000 } # Or { width = 1600 } for width-based sizing
//! quality = 85                  # Render quality (1-100)
//! resize = "contain"            # contain | cover | fill
//!
//! [supabase]
//! project_url = ""              # e.g. "https://abcd.supabase.co"
//! api_key = ""                  # Optional anon key sent as apikey header
//! ```
//!
//! Deployed variants of this pipeline have been observed with caps of 10 and
//! 15 and with height- or width-based render sizing; all of those are plain
//! config here rather than behavior baked into the build.

use crate::transform::{Dimension, Quality, RenderOptions, ResizeMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Object-store bucket holding the gallery folders.
    pub bucket: String,
    /// Discovery and filtering settings.
    pub listing: ListingConfig,
    /// Display-URL render presets.
    pub render: RenderConfig,
    /// Supabase project coordinates for the HTTP gateway.
    pub supabase: SupabaseConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bucket: "portfolio".to_string(),
            listing: ListingConfig::default(),
            render: RenderConfig::default(),
            supabase: SupabaseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Per-category asset cap K: only the newest K uploads are kept.
    pub per_category_limit: usize,
    /// Root or asset entries starting with this prefix are never listed.
    pub reserved_prefix: String,
    /// Marker entry a store writes into otherwise-empty folders.
    pub placeholder_sentinel: String,
    /// Per-category listing timeout in seconds; 0 disables the timeout.
    pub category_timeout_secs: u64,
}

impl ListingConfig {
    /// Timeout as a `Duration`, `None` when disabled.
    pub fn category_timeout(&self) -> Option<Duration> {
        (self.category_timeout_secs > 0).then(|| Duration::from_secs(self.category_timeout_secs))
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            per_category_limit: 15,
            reserved_prefix: ".".to_string(),
            placeholder_sentinel: ".emptyFolderPlaceholder".to_string(),
            category_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Edge to size by: `{ height = N }` or `{ width = N }`.
    pub dimension: Dimension,
    /// Render quality (1-100).
    pub quality: u32,
    /// Fit mode: contain, cover, or fill.
    pub resize: ResizeMode,
}

impl RenderConfig {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            dimension: self.dimension,
            quality: Quality::new(self.quality),
            resize: self.resize,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dimension: Dimension::Height(1000),
            quality: 85,
            resize: ResizeMode::Contain,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    pub project_url: String,
    /// Anon key sent as the `apikey` header. Empty means no header.
    pub api_key: String,
}

/// Load config from `path`, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let config = if path.exists() {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)?
    } else {
        SiteConfig::default()
    };
    config.validate()?;
    Ok(config)
}

impl SiteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.is_empty() {
            return Err(ConfigError::Validation("bucket must not be empty".into()));
        }
        if self.listing.per_category_limit == 0 {
            return Err(ConfigError::Validation(
                "listing.per_category_limit must be at least 1".into(),
            ));
        }
        if !(1..=100).contains(&self.render.quality) {
            return Err(ConfigError::Validation(format!(
                "render.quality must be between 1 and 100, got {}",
                self.render.quality
            )));
        }
        let (Dimension::Height(px) | Dimension::Width(px)) = self.render.dimension;
        if px == 0 {
            return Err(ConfigError::Validation(
                "render.dimension must be at least 1 pixel".into(),
            ));
        }
        Ok(())
    }
}

/// Documented stock `config.toml`, printed by `gen-config`.
pub fn stock_config() -> &'static str {
    r#"# remote-gal configuration
# All options are optional - the values below are the defaults.

# Object-store bucket holding the gallery folders.
bucket = "portfolio"

[listing]
# Only the newest N assets per category are kept.
per_category_limit = 15
# Entries whose name starts with this prefix never enter the catalog
# (dotfiles, store-internal folders).
reserved_prefix = "."
# Marker entry the store writes into otherwise-empty folders.
placeholder_sentinel = ".emptyFolderPlaceholder"
# Give up on a single category's listing after this many seconds and
# continue without it. 0 disables the timeout.
category_timeout_secs = 10

[render]
# Size displayed images by one edge: { height = N } or { width = N }.
dimension = { height = 1000 }
# Render quality, 1-100.
quality = 85
# Fit mode: "contain", "cover", or "fill".
resize = "contain"

[supabase]
# Project base URL, e.g. "https://abcd.supabase.co".
project_url = ""
# Anon key sent as the apikey header. Leave empty for public buckets
# that accept unauthenticated listing.
api_key = ""
"#
}
