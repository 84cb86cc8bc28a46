//! Responsive `<img>` data for display components.
//!
//! A component asks for a semantic key ("stage") and a list of widths and
//! gets back the candidates that resolved, a fallback `src`, and natural
//! dimensions for layout. Widths that are missing from the manifest or the
//! lookup table are left out of `srcset` rather than emitted empty.

use crate::resolve::AssetResolver;

/// What to request for a picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureOptions {
    /// Candidate widths for `srcset`
    pub widths: Vec<u32>,
    /// Widths tried in order for the plain `src`
    pub fallback: Vec<u32>,
    /// Natural size used when no requested width exists
    pub default_size: (u32, u32),
}

impl Default for PictureOptions {
    fn default() -> Self {
        Self { widths: vec![800, 1200, 1600], fallback: vec![1200, 800], default_size: (1600, 900) }
    }
}

impl PictureOptions {
    /// Options requesting `widths`, falling back from the middle width down.
    pub fn for_widths(widths: &[u32]) -> Self {
        let mut sorted = widths.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        // second widest first, then narrower, then the widest
        let mut fallback: Vec<u32> = sorted.iter().rev().skip(1).copied().collect();
        if let Some(&widest) = sorted.last() {
            fallback.push(widest);
        }
        Self { widths: widths.to_vec(), fallback, ..Self::default() }
    }
}

/// One `srcset` candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Served URL
    pub url: String,
    /// Width descriptor
    pub width: u32,
}

/// Everything an `<img>` needs for one image key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsiveImage {
    /// Semantic key
    pub key: String,
    /// Plain `src`, if any fallback width resolved
    pub src: Option<String>,
    /// Resolved candidates in request order
    pub candidates: Vec<Candidate>,
    /// Natural width
    pub width: u32,
    /// Natural height
    pub height: u32,
}

impl ResponsiveImage {
    /// Assemble the picture for `key`.
    pub fn pick(resolver: &AssetResolver, key: &str, options: &PictureOptions) -> Self {
        let candidates = options
            .widths
            .iter()
            .filter_map(|&width| {
                resolver.url_for(key, width).map(|url| Candidate { url: url.to_string(), width })
            })
            .collect();

        let src = options
            .fallback
            .iter()
            .find_map(|&width| resolver.url_for(key, width))
            .map(str::to_string);

        let mut by_width = options.widths.clone();
        by_width.sort_unstable_by(|a, b| b.cmp(a));
        let (width, height) = by_width
            .iter()
            .find_map(|&w| resolver.manifest().variant(key, w))
            .map(|v| (v.width, v.height))
            .unwrap_or(options.default_size);

        Self { key: key.to_string(), src, candidates, width, height }
    }

    /// `srcset` attribute value, e.g. `a.webp 800w, b.webp 1200w`.
    pub fn srcset(&self) -> String {
        self.candidates
            .iter()
            .map(|c| format!("{} {}w", c.url, c.width))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether nothing resolved for this key.
    pub fn is_missing(&self) -> bool {
        self.src.is_none() && self.candidates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{Manifest, ManifestEntry, Variant};
    use crate::resolve::AssetTable;

    fn resolver() -> AssetResolver {
        let mut stage = ManifestEntry::new();
        for (w, h) in [(800, 533), (1200, 800), (1600, 1067)] {
            stage.record(Variant {
                width: w,
                height: h,
                src: format!("assets/images/optimized/stage-{}.webp", w),
                bytes: 1,
            });
        }
        let mut rooms = ManifestEntry::new();
        rooms.record(Variant {
            width: 600,
            height: 400,
            src: "assets/images/optimized/rooms-600.webp".to_string(),
            bytes: 1,
        });
        let mut manifest = Manifest::new();
        manifest.insert("stage", stage);
        manifest.insert("rooms", rooms);

        let table = AssetTable::from_pairs([
            ("/src/assets/images/optimized/stage-800.webp", "/h/stage-800.1.webp"),
            ("/src/assets/images/optimized/stage-1600.webp", "/h/stage-1600.3.webp"),
            ("/src/assets/images/optimized/rooms-600.webp", "/h/rooms-600.4.webp"),
        ]);
        AssetResolver::new(table, manifest)
    }

    #[test]
    fn test_pick_omits_unresolved_widths() {
        let picture = resolver().picture("stage");
        // 1200 is in the manifest but not in the table
        assert_eq!(picture.srcset(), "/h/stage-800.1.webp 800w, /h/stage-1600.3.webp 1600w");
        assert_eq!(picture.src.as_deref(), Some("/h/stage-800.1.webp"));
        assert_eq!((picture.width, picture.height), (1600, 1067));
        assert!(!picture.is_missing());
    }

    #[test]
    fn test_pick_unknown_key_uses_defaults() {
        let picture = resolver().picture("entrance");
        assert!(picture.is_missing());
        assert_eq!(picture.srcset(), "");
        assert_eq!((picture.width, picture.height), (1600, 900));
    }

    #[test]
    fn test_pick_small_source_default_widths() {
        // rooms only has a 600 variant: nothing at 800/1200/1600
        let picture = resolver().picture("rooms");
        assert!(picture.is_missing());
    }

    #[test]
    fn test_pick_with_custom_widths() {
        let options = PictureOptions::for_widths(&[600]);
        let picture = resolver().picture_with("rooms", &options);
        assert_eq!(picture.srcset(), "/h/rooms-600.4.webp 600w");
        assert_eq!(picture.src.as_deref(), Some("/h/rooms-600.4.webp"));
        assert_eq!((picture.width, picture.height), (600, 400));
    }

    #[test]
    fn test_for_widths_fallback_order() {
        let options = PictureOptions::for_widths(&[800, 1200, 1600]);
        assert_eq!(options.fallback, vec![1200, 800, 1600]);
        assert_eq!(PictureOptions::for_widths(&[600]).fallback, vec![600]);
        assert!(PictureOptions::for_widths(&[]).fallback.is_empty());
    }
}
