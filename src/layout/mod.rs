// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Glyph runs and layout results
//!
//! A [`GlyphRun`] stores positioned glyphs in a flat array, each referring to
//! its font via a small [`FontIndex`] into the run's own [`FaceTable`], plus a
//! parallel array of advances. Word fragments in the cache are glyph runs;
//! a [`Layout`] is a glyph run assembled from fragments by
//! [`LayoutBuilder::append`] and then frozen.

use crate::conv::{to_u32, to_usize};
use crate::fonts::{FaceTable, FontIndex, FontSelection};
use crate::shaper::{GlyphId, ShapedGlyph};
use crate::{Rect, Vec2};
use smallvec::SmallVec;
use std::marker::PhantomData;
use std::ops::Deref;

mod typesetter;
pub use typesetter::Typesetter;

/// A positioned glyph
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    /// Index into the owning run's [`FaceTable`]
    pub font: FontIndex,
    /// Glyph identifier in font
    pub id: GlyphId,
    /// Horizontal position of the glyph origin
    pub x: f32,
    /// Vertical offset of the glyph origin from the baseline (`y` down)
    pub y: f32,
}

/// A sequence of positioned glyphs with their face table
///
/// Invariants: `glyphs`, `advances` and `clusters` have equal length, and
/// every glyph's font index is valid for `faces`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphRun {
    glyphs: Vec<Glyph>,
    advances: Vec<f32>,
    // Byte index of each glyph's cluster, relative to the run's text origin
    clusters: Vec<u32>,
    faces: FaceTable,
    advance: f32,
    bounds: Rect,
}

impl GlyphRun {
    /// Construct an empty run
    #[inline]
    pub fn new() -> Self {
        GlyphRun::default()
    }

    /// Append a shaped glyph at the pen position
    ///
    /// The glyph is placed at `(advance + offset.x, offset.y)` where
    /// `advance` is the current total advance, which is then incremented by
    /// the glyph's advance. `cluster` is relative to this run's text origin.
    pub fn push(&mut self, font: &FontSelection, glyph: &ShapedGlyph, cluster: u32) {
        let font = self.faces.find_or_insert(font);
        let pos = Vec2(self.advance, 0.0) + glyph.offset;
        self.glyphs.push(Glyph {
            font,
            id: glyph.id,
            x: pos.0,
            y: pos.1,
        });
        self.advances.push(glyph.advance);
        self.clusters.push(cluster);
        self.advance += glyph.advance;
        self.bounds.union(glyph.bounds.translate(pos));
    }

    /// Splice `src` into `self` at horizontal offset `x`
    ///
    /// Font indices of `src` are remapped through `self`'s face table, glyph
    /// positions are shifted by `x` (vertical positions are kept), advances
    /// are copied and clusters shifted by `text_offset`.
    pub(crate) fn append(&mut self, src: &GlyphRun, x: f32, text_offset: u32) {
        let map: SmallVec<[FontIndex; 4]> = src
            .faces
            .iter()
            .map(|font| self.faces.find_or_insert(font))
            .collect();

        self.glyphs.reserve(src.glyphs.len());
        for glyph in &src.glyphs {
            self.glyphs.push(Glyph {
                font: map[glyph.font.get()],
                id: glyph.id,
                x: glyph.x + x,
                y: glyph.y,
            });
        }
        self.advances.extend_from_slice(&src.advances);
        self.clusters
            .extend(src.clusters.iter().map(|c| c + text_offset));

        self.advance += src.advance;
        self.bounds.union(src.bounds.translate(Vec2(x, 0.0)));
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.glyphs.shrink_to_fit();
        self.advances.shrink_to_fit();
        self.clusters.shrink_to_fit();
    }

    /// Estimated memory usage, in bytes
    pub fn mem_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.glyphs.capacity() * std::mem::size_of::<Glyph>()
            + self.advances.capacity() * std::mem::size_of::<f32>()
            + self.clusters.capacity() * std::mem::size_of::<u32>()
            + self.faces.heap_size()
    }

    /// Number of glyphs
    #[inline]
    pub fn num_glyphs(&self) -> usize {
        self.glyphs.len()
    }

    /// True if there are no glyphs
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// All glyphs, in visual order
    #[inline]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The face table
    #[inline]
    pub fn faces(&self) -> &FaceTable {
        &self.faces
    }

    /// The font selection of glyph `i`
    #[inline]
    pub fn font(&self, i: usize) -> &FontSelection {
        &self.faces[self.glyphs[i].font]
    }

    /// The face-table index of glyph `i`
    #[inline]
    pub fn font_index(&self, i: usize) -> FontIndex {
        self.glyphs[i].font
    }

    /// The glyph identifier of glyph `i`
    #[inline]
    pub fn glyph_id(&self, i: usize) -> GlyphId {
        self.glyphs[i].id
    }

    /// The horizontal position of glyph `i`
    #[inline]
    pub fn x(&self, i: usize) -> f32 {
        self.glyphs[i].x
    }

    /// The vertical position of glyph `i`
    #[inline]
    pub fn y(&self, i: usize) -> f32 {
        self.glyphs[i].y
    }

    /// Per-glyph advances, parallel to [`Self::glyphs`]
    #[inline]
    pub fn glyph_advances(&self) -> &[f32] {
        &self.advances
    }

    /// Per-glyph cluster start (byte index relative to the text origin),
    /// parallel to [`Self::glyphs`]
    #[inline]
    pub fn clusters(&self) -> &[u32] {
        &self.clusters
    }

    /// Total advance
    #[inline]
    pub fn advance(&self) -> f32 {
        self.advance
    }

    /// Ink bounding box
    ///
    /// This is the union of each glyph's ink bounds at its position. It is
    /// [`Rect::EMPTY`] if no glyph has ink.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A completed layout
///
/// This is immutable and may be shared between threads. It borrows (at the
/// type level) the font collection it was laid out with, so that the
/// collection cannot be dropped while the layout is in use.
///
/// Glyph accessors are available via `Deref` to [`GlyphRun`].
#[derive(Clone, Debug, PartialEq)]
pub struct Layout<'c> {
    run: GlyphRun,
    text_len: usize,
    _fonts: PhantomData<&'c ()>,
}

impl<'c> Layout<'c> {
    /// Length (bytes) of the laid-out text range
    #[inline]
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Copy per-char advances into `buf`
    ///
    /// `buf` must have length [`Self::text_len`]. Each glyph's advance is
    /// added at the index of its cluster's first byte; all other entries are
    /// zero. Panics on length mismatch.
    pub fn advances_into(&self, buf: &mut [f32]) {
        assert_eq!(
            buf.len(),
            self.text_len,
            "Layout::advances_into: buffer length must equal text length"
        );
        buf.fill(0.0);
        for (cluster, advance) in self.run.clusters.iter().zip(&self.run.advances) {
            buf[to_usize(*cluster)] += *advance;
        }
    }

    /// Access the glyph run
    #[inline]
    pub fn as_run(&self) -> &GlyphRun {
        &self.run
    }
}

impl<'c> Deref for Layout<'c> {
    type Target = GlyphRun;

    #[inline]
    fn deref(&self) -> &GlyphRun {
        &self.run
    }
}

/// A layout under construction
///
/// Fragments are appended left-to-right; [`Self::finish`] freezes the
/// result into a [`Layout`].
#[derive(Debug)]
pub struct LayoutBuilder<'c> {
    run: GlyphRun,
    text_len: usize,
    _fonts: PhantomData<&'c ()>,
}

impl<'c> LayoutBuilder<'c> {
    /// Start a layout over a text range of `text_len` bytes
    pub fn new(text_len: usize) -> Self {
        LayoutBuilder {
            run: GlyphRun::new(),
            text_len,
            _fonts: PhantomData,
        }
    }

    /// Current total advance
    ///
    /// This is the insertion offset of the next fragment.
    #[inline]
    pub fn advance(&self) -> f32 {
        self.run.advance
    }

    /// Read access to the glyphs so far
    #[inline]
    pub fn as_run(&self) -> &GlyphRun {
        &self.run
    }

    /// Merge `fragment` at horizontal offset `x`
    ///
    /// `text_offset` is the byte index of the fragment's text relative to the
    /// start of the laid-out range. Panics if the fragment's text would
    /// extend beyond that range.
    pub fn append(&mut self, fragment: &GlyphRun, x: f32, text_offset: usize) {
        debug_assert!(fragment
            .clusters
            .iter()
            .all(|c| text_offset + to_usize(*c) < self.text_len));
        self.run.append(fragment, x, to_u32(text_offset));
    }

    /// Freeze the result
    pub fn finish(mut self) -> Layout<'c> {
        self.run.shrink_to_fit();
        Layout {
            run: self.run,
            text_len: self.text_len,
            _fonts: PhantomData,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fonts::FaceId;

    fn glyph(id: u32, advance: f32) -> ShapedGlyph {
        ShapedGlyph {
            id: GlyphId(id),
            cluster: 0,
            advance,
            offset: Vec2::ZERO,
            bounds: Rect::new(0.0, -5.0, advance, 1.0),
        }
    }

    #[test]
    fn size_of_elts() {
        use std::mem::size_of;
        assert_eq!(size_of::<Glyph>(), 16);
    }

    #[test]
    fn merge_remaps_faces() {
        let a = FontSelection::new(FaceId(0));
        let b = FontSelection::new(FaceId(1));

        let mut src = GlyphRun::new();
        src.push(&a, &glyph(10, 2.0), 0);
        src.push(&b, &glyph(11, 3.0), 1);
        src.push(&a, &glyph(12, 2.0), 2);
        let src_fonts: Vec<_> = src.glyphs().iter().map(|g| g.font.0).collect();
        assert_eq!(src_fonts, [0, 1, 0]);

        let mut target = LayoutBuilder::new(4);
        let mut prefix = GlyphRun::new();
        prefix.push(&b, &glyph(20, 1.0), 0);
        target.append(&prefix, 0.0, 0);
        assert_eq!(target.advance(), 1.0);

        target.append(&src, target.advance(), 1);
        let layout = target.finish();

        let faces: Vec<_> = layout.faces().iter().cloned().collect();
        assert_eq!(faces, [b.clone(), a.clone()]);
        let fonts: Vec<_> = layout.glyphs()[1..].iter().map(|g| g.font.0).collect();
        assert_eq!(fonts, [1, 0, 1]);
        assert_eq!(layout.font(2), &b);

        let xs: Vec<_> = layout.glyphs().iter().map(|g| g.x).collect();
        assert_eq!(xs, [0.0, 1.0, 3.0, 6.0]);
        assert_eq!(layout.advance(), 8.0);
        assert_eq!(layout.num_glyphs(), layout.glyph_advances().len());
        assert_eq!(layout.bounds(), Rect::new(0.0, -5.0, 8.0, 1.0));

        let mut buf = [0.0; 4];
        layout.advances_into(&mut buf);
        assert_eq!(buf, [1.0, 2.0, 3.0, 2.0]);
    }

    #[test]
    fn empty_layout() {
        let layout = LayoutBuilder::new(0).finish();
        assert!(layout.is_empty());
        assert_eq!(layout.advance(), 0.0);
        assert!(layout.bounds().is_empty());
        layout.advances_into(&mut []);
    }

    #[test]
    #[should_panic]
    fn advances_buffer_length() {
        let layout = LayoutBuilder::new(3).finish();
        layout.advances_into(&mut [0.0; 2]);
    }
}
