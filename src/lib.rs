// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Single-line text layout
//!
//! Given a text buffer, a byte range into it, a requested direction and a
//! [`TextStyle`], a [`Typesetter`] produces a [`Layout`]: positioned glyphs,
//! each referring to a font via a compact index into the layout's own
//! [`fonts::FaceTable`], together with per-glyph advances, the total advance
//! and the ink bounding box.
//!
//! The pipeline:
//!
//! 1.  bidi segmentation into directional runs, in visual order
//!     ([`BidiSegmenter`])
//! 2.  splitting each run into words ([`WordBreaker`])
//! 3.  font fallback for each word ([`fonts::FontResolver`])
//! 4.  look-up in the shared [`WordCache`]; on a miss, shaping ([`Shaper`])
//! 5.  merging each word fragment into the layout ([`LayoutBuilder::append`])
//!
//! Line breaking, justification and rasterization are out of scope.

#![cfg_attr(doc_cfg, feature(doc_cfg))]

use log::info;
use std::sync::Once;

pub mod conv;

mod data;
pub use data::{Direction, Rect, Vec2};

pub mod fonts;

mod style;
pub use style::{StyleFingerprint, TextStyle};

mod shaper;
pub use shaper::{GlyphId, ShapedGlyph, Shaper};

mod bidi;
pub use bidi::{BidiSegmenter, DirectionalRun, Runs, UnicodeBidi};

mod words;
pub use words::{LineBreakWords, SpaceWords, WordBreaker};

mod layout;
pub use layout::{Glyph, GlyphRun, Layout, LayoutBuilder, Typesetter};

mod cache;
pub use cache::{CacheStats, WordCache, WordCacheConfig, WordKey};

static INIT: Once = Once::new();

/// One-time initialization
///
/// Constructs the global [`WordCache`] with the given configuration. This is
/// optional: without it the global cache is constructed with default
/// configuration on first use. Calls after the first (or after the global
/// cache was first used) have no effect.
pub fn init(config: WordCacheConfig) {
    INIT.call_once(|| {
        if WordCache::init_global(config) {
            info!("glyphrun: initialized global word cache");
        } else {
            info!("glyphrun: global word cache already in use; config ignored");
        }
        cache::log_config(WordCache::global());
    });
}

/// Release cached data under memory pressure
///
/// Purges the global [`WordCache`] and the coverage caches of the given
/// collections. Existing layouts are unaffected.
pub fn purge_caches(collections: &[&fonts::FontCollection]) {
    WordCache::global().purge();
    for fonts in collections {
        fonts.purge();
    }
    info!("glyphrun: purged caches ({} collections)", collections.len());
}
