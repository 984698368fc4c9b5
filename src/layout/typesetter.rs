// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Layout orchestration: runs, words, cache and shaping

use super::{GlyphRun, Layout, LayoutBuilder};
use crate::bidi::{BidiSegmenter, UnicodeBidi};
use crate::cache::{WordCache, WordKey};
use crate::conv::to_u32;
use crate::fonts::{FontResolver, FontSelection};
use crate::shaper::{ShapedGlyph, Shaper};
use crate::words::{words, SpaceWords, WordBreaker};
use crate::{Direction, StyleFingerprint, TextStyle};
use smallvec::SmallVec;
use std::ops::Range;
use std::sync::Arc;

/// A font-fallback segment of a word: selection and byte range
type Segment = (FontSelection, Range<usize>);

/// The layout engine
///
/// A typesetter combines a font collection (which must implement both
/// [`FontResolver`] and [`Shaper`]), a word cache, a bidi segmenter and a
/// word breaker. It is cheap to construct and holds no mutable state of its
/// own; layouts may be computed from multiple threads concurrently.
///
/// ```ignore
/// let layout = Typesetter::new(&fonts).layout(text, 0..text.len(), Direction::Auto, &style);
/// ```
#[derive(Clone, Debug)]
pub struct Typesetter<'c, F: ?Sized, B = UnicodeBidi, W = SpaceWords> {
    fonts: &'c F,
    cache: Option<&'c WordCache>,
    bidi: B,
    words: W,
}

impl<'c, F: FontResolver + Shaper + ?Sized> Typesetter<'c, F> {
    /// Construct with the global word cache, [`UnicodeBidi`] and
    /// [`SpaceWords`]
    pub fn new(fonts: &'c F) -> Self {
        Typesetter {
            fonts,
            cache: Some(WordCache::global()),
            bidi: UnicodeBidi,
            words: SpaceWords,
        }
    }
}

impl<'c, F, B, W> Typesetter<'c, F, B, W>
where
    F: FontResolver + Shaper + ?Sized,
    B: BidiSegmenter,
    W: WordBreaker,
{
    /// Use the given word cache
    pub fn with_cache(mut self, cache: &'c WordCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Shape every word afresh, bypassing any cache
    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    /// Use a different bidi segmenter
    pub fn with_bidi<B2: BidiSegmenter>(self, bidi: B2) -> Typesetter<'c, F, B2, W> {
        Typesetter {
            fonts: self.fonts,
            cache: self.cache,
            bidi,
            words: self.words,
        }
    }

    /// Use a different word breaker
    pub fn with_words<W2: WordBreaker>(self, words: W2) -> Typesetter<'c, F, B, W2> {
        Typesetter {
            fonts: self.fonts,
            cache: self.cache,
            bidi: self.bidi,
            words,
        }
    }

    /// Lay out `text[range]`
    ///
    /// `text` is the whole buffer: text outside `range` is used as bidi
    /// context but not laid out. Glyph positions are relative to the start
    /// of the range; cluster indices are relative to `range.start`.
    ///
    /// Panics if `range` is not within `text` or does not lie on `char`
    /// boundaries.
    pub fn layout(
        &self,
        text: &str,
        range: Range<usize>,
        direction: Direction,
        style: &TextStyle,
    ) -> Layout<'c> {
        assert!(
            range.start <= range.end && range.end <= text.len(),
            "Typesetter::layout: range {range:?} out of bounds (len {})",
            text.len()
        );
        assert!(text.is_char_boundary(range.start) && text.is_char_boundary(range.end));

        let fingerprint = style.fingerprint();
        let mut builder = LayoutBuilder::new(range.len());

        for run in self.bidi.segment(text, range.clone(), direction) {
            let word_ranges: SmallVec<[(usize, usize); 16]> =
                words(&self.words, text, run.start, run.end()).collect();

            let mut layout_word = |&(start, end): &(usize, usize)| {
                self.layout_word(
                    &mut builder,
                    text,
                    start..end,
                    range.start,
                    run.rtl,
                    style,
                    &fingerprint,
                );
            };

            // Right-to-left runs are placed right-to-left: last word first
            if run.rtl {
                word_ranges.iter().rev().for_each(&mut layout_word);
            } else {
                word_ranges.iter().for_each(&mut layout_word);
            }
        }

        builder.finish()
    }

    #[allow(clippy::too_many_arguments)]
    fn layout_word(
        &self,
        builder: &mut LayoutBuilder<'c>,
        text: &str,
        word: Range<usize>,
        origin: usize,
        rtl: bool,
        style: &TextStyle,
        fingerprint: &StyleFingerprint,
    ) {
        let segments = self.resolve_segments(style, text, word.clone());

        let fragment = match self.cache {
            Some(cache) => {
                let key = WordKey::new(
                    &text[word.clone()],
                    fingerprint.clone(),
                    self.fonts.collection_id(),
                    rtl,
                    segments.iter().map(|(font, _)| font.clone()),
                );
                cache.get_or_insert_with(key, || {
                    self.shape_word(text, &word, &segments, rtl, style)
                })
            }
            None => Arc::new(self.shape_word(text, &word, &segments, rtl, style)),
        };

        let x = builder.advance();
        builder.append(&fragment, x, word.start - origin);
    }

    /// Walk the resolver over `word`, merging adjacent equal selections
    fn resolve_segments(
        &self,
        style: &TextStyle,
        text: &str,
        word: Range<usize>,
    ) -> SmallVec<[Segment; 1]> {
        let mut segments = SmallVec::<[Segment; 1]>::new();
        let mut pos = word.start;
        while pos < word.end {
            let (font, len) = self.fonts.resolve(style, text, pos, word.end);
            assert!(
                len > 0 && pos + len <= word.end,
                "FontResolver: invalid coverage {len} at {pos} (end {})",
                word.end
            );
            let end = pos + len;
            match segments.last_mut() {
                Some((last, range)) if *last == font => range.end = end,
                _ => segments.push((font, pos..end)),
            }
            pos = end;
        }
        segments
    }

    /// Shape a word into a new fragment
    ///
    /// Segments are shaped individually; for right-to-left words segments
    /// are placed in reverse order. Letter spacing is added to each cluster,
    /// half before and half after.
    fn shape_word(
        &self,
        text: &str,
        word: &Range<usize>,
        segments: &[Segment],
        rtl: bool,
        style: &TextStyle,
    ) -> GlyphRun {
        let spacing = style.letter_spacing_px();
        let mut fragment = GlyphRun::new();
        let mut glyphs: Vec<ShapedGlyph> = Vec::new();

        let mut shape_segment = |(font, range): &Segment| {
            glyphs.clear();
            self.fonts
                .shape(font, style, &text[range.clone()], rtl, &mut glyphs);
            let offset = to_u32(range.start - word.start);

            let mut last_cluster = None;
            for glyph in &glyphs {
                let mut glyph = *glyph;
                if spacing != 0.0 && last_cluster != Some(glyph.cluster) {
                    glyph.advance += spacing;
                    glyph.offset.0 += 0.5 * spacing;
                }
                last_cluster = Some(glyph.cluster);
                fragment.push(font, &glyph, glyph.cluster + offset);
            }
        };

        if rtl {
            segments.iter().rev().for_each(&mut shape_segment);
        } else {
            segments.iter().for_each(&mut shape_segment);
        }

        fragment.shrink_to_fit();
        fragment
    }
}
