//! Display URL derivation.
//!
//! Raw object URLs point at the store's direct-download endpoint and serve
//! full-size originals. Stores with an image render endpoint accept the same
//! path under a different URL segment plus query parameters, and resize on
//! the fly. [`transform_url`] rewrites the former into the latter:
//!
//! ```text
//! https://x.supabase.co/storage/v1/object/public/bucket/urban/a.jpg
//!   → https://x.supabase.co/storage/v1/render/image/public/bucket/urban/a.jpg
//!       ?height=1000&quality=85&resize=contain
//! ```
//!
//! The rewrite is deterministic, pure, and fail-safe: URLs that already use
//! the render endpoint, or that match no recognized pattern at all, pass
//! through unchanged. A reference the transformer cannot improve is still a
//! perfectly displayable reference, so there is no error path here.

use serde::{Deserialize, Serialize};

/// Direct-download URL segment recognized for rewriting.
pub const DIRECT_SEGMENT: &str = "/object/public/";
/// Render-endpoint URL segment substituted in.
pub const RENDER_SEGMENT: &str = "/render/image/public/";

/// Quality setting for the render endpoint (1–100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Which edge the render endpoint should size by.
///
/// Observed deployments disagree on height- vs width-based sizing, so both
/// are expressible and neither is privileged; the choice lives in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Height(u32),
    Width(u32),
}

/// Fit mode passed through to the render endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Contain,
    Cover,
    Fill,
}

impl ResizeMode {
    fn as_str(self) -> &'static str {
        match self {
            ResizeMode::Contain => "contain",
            ResizeMode::Cover => "cover",
            ResizeMode::Fill => "fill",
        }
    }
}

/// Full parameter set for one display-URL derivation.
///
/// Describes *what* to render, not *how* — the actual pixel work happens on
/// the store's render service, addressed purely via these URL parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub dimension: Dimension,
    pub quality: Quality,
    pub resize: ResizeMode,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dimension: Dimension::Height(1000),
            quality: Quality::default(),
            resize: ResizeMode::default(),
        }
    }
}

/// Derive a display-optimized URL from a raw public URL.
///
/// Pass-through-safe: applying this to its own output returns the output
/// unchanged, and unrecognized references are never touched.
pub fn transform_url(raw: &str, options: &RenderOptions) -> String {
    if raw.contains(RENDER_SEGMENT) || !raw.contains(DIRECT_SEGMENT) {
        return raw.to_string();
    }

    let rewritten = raw.replacen(DIRECT_SEGMENT, RENDER_SEGMENT, 1);
    let (key, value) = match options.dimension {
        Dimension::Height(px) => ("height", px),
        Dimension::Width(px) => ("width", px),
    };
    format!(
        "{rewritten}?{key}={value}&quality={}&resize={}",
        options.quality.value(),
        options.resize.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "https://x.supabase.co/storage/v1/object/public/bucket/urban/a.jpg";

    #[test]
    fn rewrites_direct_url_with_height_params() {
        let out = transform_url(RAW, &RenderOptions::default());
        assert_eq!(
            out,
            "https://x.supabase.co/storage/v1/render/image/public/bucket/urban/a.jpg\
             ?height=1000&quality=85&resize=contain"
        );
    }

    #[test]
    fn rewrites_with_width_dimension() {
        let options = RenderOptions {
            dimension: Dimension::Width(1600),
            quality: Quality::new(70),
            resize: ResizeMode::Cover,
        };
        let out = transform_url(RAW, &options);
        assert!(out.contains("/render/image/public/"));
        assert!(out.ends_with("?width=1600&quality=70&resize=cover"));
    }

    #[test]
    fn already_optimized_url_passes_through() {
        let once = transform_url(RAW, &RenderOptions::default());
        let twice = transform_url(&once, &RenderOptions::default());
        assert_eq!(once, twice);
    }

    #[test]
    fn unrecognized_url_passes_through() {
        let raw = "https://cdn.example.com/images/a.jpg";
        assert_eq!(transform_url(raw, &RenderOptions::default()), raw);
    }

    #[test]
    fn only_first_direct_segment_is_rewritten() {
        let raw = "https://x.test/object/public/bucket/object/public/a.jpg";
        let out = transform_url(raw, &RenderOptions::default());
        assert!(out.starts_with("https://x.test/render/image/public/bucket/object/public/a.jpg?"));
    }

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn dimension_deserializes_from_toml_table() {
        let h: Dimension = toml::from_str::<toml::Value>("height = 1000")
            .and_then(|v| v.try_into())
            .unwrap();
        assert_eq!(h, Dimension::Height(1000));
    }
}
