// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font selection, fallback and face tables
//!
//! Layout never touches a font file directly. Instead it asks a
//! [`FontResolver`] which face covers a given piece of text, receiving a
//! [`FontSelection`]: a face identifier plus synthetic styling ([`Fakery`])
//! and variation settings. Selections are compared by value.
//!
//! Each layout result records the distinct selections it uses in a
//! [`FaceTable`]; glyphs refer to their font by [`FontIndex`] into that
//! table. This keeps glyphs small and makes splicing cached fragments into a
//! layout a matter of rewriting small integers.
//!
//! [`FontCollection`] is the bundled resolver: a fallback chain of font
//! families loaded via `ttf-parser` (optionally discovered via `fontdb`).
//!
//! ### Font sizes
//!
//! Sizes are given in *dpem*: dots (pixels) per em. From a point size:
//!
//! -   DPP (Dots Per Point): `dpp = dpi / 72 = scale_factor × (96 / 72)`
//! -   DPEM (Dots Per Em): `dpem = point_size × dpp`
//!
//! Font files use an internal *font unit*; [`crate::conv::DPU`] is the
//! number of pixels per font unit.

use crate::TextStyle;

mod attributes;
mod collection;
mod face;
mod face_table;
mod selection;

pub use attributes::{FontStyle, FontWeight, FontWidth};
pub use collection::{FontCollection, FontCollectionBuilder, NoFontMatch};
pub use face::{FaceStore, FontError};
pub use face_table::{FaceTable, FontIndex};
pub use selection::{CollectionId, FaceId, Fakery, FontSelection, Variation};

/// Font fallback resolution
///
/// Implementations must be deterministic: the same inputs always yield the
/// same selection. They must also be total: some selection is returned even
/// if no face covers the text (shaping then yields missing-glyph
/// placeholders).
pub trait FontResolver {
    /// Identifier of the collection whose faces this resolver selects
    ///
    /// [`FaceId`]s in returned selections are only meaningful together with
    /// this identifier.
    fn collection_id(&self) -> CollectionId;

    /// Resolve a font for `text[start..end]`
    ///
    /// Returns the selection for the text at `start` and the number of bytes
    /// it covers. Where `start < end` the length must be positive, may not
    /// exceed `end - start` and must end on a `char` boundary. Callers walk a
    /// range by calling again from `start + len`.
    fn resolve(
        &self,
        style: &TextStyle,
        text: &str,
        start: usize,
        end: usize,
    ) -> (FontSelection, usize);
}
