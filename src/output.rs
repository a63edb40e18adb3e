//! CLI output formatting for catalog snapshots.
//!
//! Output is information-centric: the primary display for every entity is
//! its semantic identity — display name and positional index — with the
//! display URL shown as secondary context on an indented line.
//!
//! ```text
//! 001 Weddings (2 photos)
//!     001 a.jpg
//!         URL: https://x.supabase.co/storage/v1/render/image/public/...
//!     002 b.jpg
//!         URL: https://x.supabase.co/storage/v1/render/image/public/...
//! 002 Urban (1 photo)
//!     001 (3f2a)
//!         URL: https://...
//!
//! 2 categories, 3 photos
//! ```
//!
//! Format functions return `Vec<String>` and are pure — no I/O — so tests
//! assert on lines directly; `print_*` wrappers write to stdout.

use crate::catalog::{Catalog, Category};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Category header: positional index + display name + photo count.
fn category_header(index: usize, category: &Category) -> String {
    let noun = if category.assets.len() == 1 {
        "photo"
    } else {
        "photos"
    };
    format!(
        "{} {} ({} {noun})",
        format_index(index),
        category.display_name,
        category.assets.len()
    )
}

/// Format the full catalog tree.
pub fn format_catalog(catalog: &Catalog) -> Vec<String> {
    if catalog.is_empty() {
        return vec!["No categories found.".to_string()];
    }

    let mut lines = Vec::new();
    for (ci, category) in catalog.categories.iter().enumerate() {
        lines.push(category_header(ci + 1, category));
        for (ai, asset) in category.assets.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(ai + 1), asset.id));
            lines.push(format!("{}URL: {}", indent(2), asset.display_url));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{} categories, {} photos",
        catalog.len(),
        catalog.asset_count()
    ));
    lines
}

pub fn print_catalog(catalog: &Catalog) {
    for line in format_catalog(catalog) {
        println!("{line}");
    }
}
