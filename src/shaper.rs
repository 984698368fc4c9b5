// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text shaping
//!
//! To quote the HarfBuzz manual:
//!
//! > Text shaping is the process of translating a string of character codes
//! > (such as Unicode codepoints) into a properly arranged sequence of glyphs
//! > that can be rendered onto a screen or into final output form for
//! > inclusion in a document.
//!
//! This module provides the [`Shaper`] trait: one font, one run of text, one
//! direction. It *does not* perform font fallback, line-breaking or bidi
//! reordering.
//!
//! [`FontCollection`] implements [`Shaper`] using rustybuzz (with feature
//! `rustybuzz`) or else a simple per-char cmap look-up with horizontal
//! advances and bidi mirroring.

use crate::conv::{to_u32, DPU};
use crate::fonts::{FontCollection, FontSelection};
use crate::{Rect, TextStyle, Vec2};

/// Glyph identifier within a font
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId(pub u32);

/// A glyph as produced by a [`Shaper`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph identifier in font
    pub id: GlyphId,
    /// Byte index of the first char of this glyph's cluster, relative to the
    /// shaped text
    pub cluster: u32,
    /// Horizontal advance, in pixels
    pub advance: f32,
    /// Offset of the glyph from the pen position
    pub offset: Vec2,
    /// Ink bounds relative to the glyph origin (`y` pointing down)
    ///
    /// This is [`Rect::EMPTY`] for glyphs without ink (e.g. spaces).
    pub bounds: Rect,
}

/// The shaping primitive
pub trait Shaper {
    /// Shape `text` with a single font
    ///
    /// Glyphs are appended to `out` in visual order: for right-to-left text
    /// the first glyph is the right-most (logically last) one.
    fn shape(
        &self,
        font: &FontSelection,
        style: &TextStyle,
        text: &str,
        rtl: bool,
        out: &mut Vec<ShapedGlyph>,
    );
}

impl Shaper for FontCollection {
    fn shape(
        &self,
        font: &FontSelection,
        style: &TextStyle,
        text: &str,
        rtl: bool,
        out: &mut Vec<ShapedGlyph>,
    ) {
        cfg_if::cfg_if! {
            if #[cfg(feature = "rustybuzz")] {
                shape_rustybuzz(self, font, style, text, rtl, out);
            } else {
                shape_simple(self, font, style, text, rtl, out);
            }
        }
    }
}

fn glyph_bounds(
    face: &ttf_parser::Face,
    id: ttf_parser::GlyphId,
    dpu: DPU,
    style: &TextStyle,
) -> Rect {
    let scale_x = style.scale_x;
    let bounds = match face.glyph_bounding_box(id) {
        // Font units have y pointing up
        Some(r) => Rect::new(
            dpu.i16_to_px(r.x_min) * scale_x,
            -dpu.i16_to_px(r.y_max),
            dpu.i16_to_px(r.x_max) * scale_x,
            -dpu.i16_to_px(r.y_min),
        ),
        None => Rect::EMPTY,
    };
    bounds.skew_x(style.skew_x)
}

/// Apply the selection's variation settings to a copy of `face`, if any
#[cfg_attr(feature = "rustybuzz", allow(unused))]
fn varied_face<'f, 'a>(
    face: &'f ttf_parser::Face<'a>,
    font: &FontSelection,
) -> std::borrow::Cow<'f, ttf_parser::Face<'a>> {
    if font.variations.is_empty() {
        return std::borrow::Cow::Borrowed(face);
    }
    let mut face = face.clone();
    for v in &font.variations {
        // Unsupported axes are ignored
        let _ = face.set_variation(ttf_parser::Tag::from_bytes(&v.tag), v.value);
    }
    std::borrow::Cow::Owned(face)
}

#[cfg_attr(feature = "rustybuzz", allow(unused))]
fn shape_simple(
    fonts: &FontCollection,
    font: &FontSelection,
    style: &TextStyle,
    text: &str,
    rtl: bool,
    out: &mut Vec<ShapedGlyph>,
) {
    let store = fonts.face_store(font.face);
    let face = varied_face(store.face(), font);
    let dpu = DPU::new(style.dpem, face.units_per_em());

    let mut push = |index: usize, c: char| {
        let c = match rtl {
            true => unicode_bidi_mirroring::get_mirrored(c).unwrap_or(c),
            false => c,
        };
        // GlyphId 0 is the 'missing glyph' by definition of the cmap table
        let id = face.glyph_index(c).unwrap_or(ttf_parser::GlyphId(0));
        let advance = face.glyph_hor_advance(id).unwrap_or(0);
        out.push(ShapedGlyph {
            id: GlyphId(u32::from(id.0)),
            cluster: to_u32(index),
            advance: dpu.u16_to_px(advance) * style.scale_x,
            offset: Vec2::ZERO,
            bounds: glyph_bounds(&face, id, dpu, style),
        });
    };

    if rtl {
        for (index, c) in text.char_indices().rev() {
            push(index, c);
        }
    } else {
        for (index, c) in text.char_indices() {
            push(index, c);
        }
    }
}

#[cfg(feature = "rustybuzz")]
fn shape_rustybuzz(
    fonts: &FontCollection,
    font: &FontSelection,
    style: &TextStyle,
    text: &str,
    rtl: bool,
    out: &mut Vec<ShapedGlyph>,
) {
    use rustybuzz::{Direction, Language, UnicodeBuffer};
    use std::str::FromStr;

    let store = fonts.face_store(font.face);
    let mut face = store.rustybuzz().clone();
    if !font.variations.is_empty() {
        let vars: Vec<rustybuzz::Variation> = font
            .variations
            .iter()
            .map(|v| rustybuzz::Variation {
                tag: rustybuzz::ttf_parser::Tag::from_bytes(&v.tag),
                value: v.value,
            })
            .collect();
        face.set_variations(&vars);
    }
    // rustybuzz::Face::units_per_em returns i32; use the ttf-parser face
    let dpu = DPU::new(style.dpem, store.face().units_per_em());

    let mut buffer = UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.set_direction(match rtl {
        false => Direction::LeftToRight,
        true => Direction::RightToLeft,
    });
    if let Some(lang) = style.language.as_deref() {
        if let Ok(lang) = Language::from_str(lang) {
            buffer.set_language(lang);
        }
    }

    let output = rustybuzz::shape(&face, &[], buffer);
    for (info, pos) in output.glyph_infos().iter().zip(output.glyph_positions()) {
        let id = rustybuzz::ttf_parser::GlyphId(info.glyph_id as u16);
        out.push(ShapedGlyph {
            id: GlyphId(info.glyph_id),
            cluster: info.cluster,
            advance: dpu.i32_to_px(pos.x_advance) * style.scale_x,
            offset: Vec2(
                dpu.i32_to_px(pos.x_offset) * style.scale_x,
                -dpu.i32_to_px(pos.y_offset),
            ),
            bounds: glyph_bounds(&face, id, dpu, style),
        });
    }
}
