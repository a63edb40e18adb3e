//! Catalog data model shared across the pipeline.
//!
//! A [`Catalog`] is the immutable output of one build cycle: an ordered list
//! of categories, each holding the display-ready assets that survived
//! filtering. It is serialized as-is for `fetch --json`, so field names here
//! are the public output contract.
//!
//! Snapshots are value types. A build constructs a fresh `Catalog`, publishes
//! it behind an `Arc`, and never mutates it afterwards — consumers may hold a
//! snapshot across rebuilds without seeing partial updates.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One displayable image within a category.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    /// Store-provided identifier, falling back to the entry name when the
    /// store reports none.
    pub id: String,
    /// Display-optimized URL (see [`crate::transform`]).
    pub display_url: String,
    /// Provider-reported creation time, used only for intra-category order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// One gallery section: a top-level folder and its surviving assets.
///
/// Categories are unique by `raw_name` within a catalog and keep the root
/// listing's ascending-name order. A category is never empty — folders whose
/// assets are all filtered out are omitted from the catalog entirely.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    /// Folder name exactly as reported by the store.
    pub raw_name: String,
    /// `raw_name` with its first character uppercased.
    pub display_name: String,
    pub assets: Vec<Asset>,
}

impl Category {
    pub fn new(raw_name: impl Into<String>, assets: Vec<Asset>) -> Self {
        let raw_name = raw_name.into();
        let display_name = display_name(&raw_name);
        Self {
            raw_name,
            display_name,
            assets,
        }
    }
}

/// Ordered, immutable snapshot of all categories from one build cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Total asset count across all categories.
    pub fn asset_count(&self) -> usize {
        self.categories.iter().map(|c| c.assets.len()).sum()
    }
}

/// Uppercase the first character of a folder name for display.
///
/// `"weddings"` → `"Weddings"`, `"ñandú"` → `"Ñandú"`. The rest of the name
/// is left untouched; the store's casing is the photographer's casing.
pub fn display_name(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_capitalizes_first_char() {
        assert_eq!(display_name("weddings"), "Weddings");
    }

    #[test]
    fn display_name_leaves_rest_untouched() {
        assert_eq!(display_name("urban nights"), "Urban nights");
        assert_eq!(display_name("Already"), "Already");
    }

    #[test]
    fn display_name_handles_unicode() {
        assert_eq!(display_name("ñandú"), "Ñandú");
    }

    #[test]
    fn display_name_empty_input() {
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn category_new_derives_display_name() {
        let cat = Category::new("travel", vec![]);
        assert_eq!(cat.raw_name, "travel");
        assert_eq!(cat.display_name, "Travel");
    }

    #[test]
    fn asset_count_sums_categories() {
        let catalog = Catalog {
            categories: vec![
                Category::new("a", vec![asset("1"), asset("2")]),
                Category::new("b", vec![asset("3")]),
            ],
        };
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.asset_count(), 3);
    }

    #[test]
    fn serialization_skips_absent_created_at() {
        let json = serde_json::to_value(asset("x")).unwrap();
        assert!(json.get("created_at").is_none());
        assert_eq!(json["id"], "x");
    }

    fn asset(id: &str) -> Asset {
        Asset {
            id: id.to_string(),
            display_url: format!("https://cdn.example/{id}"),
            created_at: None,
        }
    }
}
