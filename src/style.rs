// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Text style descriptor

use crate::fonts::{FontStyle, FontWeight, FontWidth, Variation};
use smallvec::SmallVec;

/// Style and paint properties affecting layout
///
/// The whole descriptor applies to the whole layout call. Everything here
/// which may change shaping output contributes to the
/// [`StyleFingerprint`] used in word-cache keys.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size, in dots-per-em (pixel width of an 'M')
    ///
    /// This may be calculated from point size as `pt_size * dpp`, where `dpp`
    /// is the number of pixels per point.
    pub dpem: f32,
    /// Requested weight
    pub weight: FontWeight,
    /// Requested slope
    pub style: FontStyle,
    /// Requested width
    ///
    /// Used to choose between faces of a family; see [`FontWidth`].
    pub width: FontWidth,
    /// Extra space between clusters, in ems
    ///
    /// Half of the spacing is inserted before and half after each cluster.
    pub letter_spacing: f32,
    /// Horizontal scale factor applied to advances and positions
    pub scale_x: f32,
    /// Horizontal skew: tangent of the slant angle
    ///
    /// Outlines are sheared at render time; glyph ink bounds reported by the
    /// bundled shapers include the shear. Advances are unaffected.
    pub skew_x: f32,
    /// Variation axis settings applied to every resolved face
    pub variations: SmallVec<[Variation; 2]>,
    /// BCP 47 language tag, if known
    pub language: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            dpem: 16.0,
            weight: FontWeight::default(),
            style: FontStyle::default(),
            width: FontWidth::default(),
            letter_spacing: 0.0,
            scale_x: 1.0,
            skew_x: 0.0,
            variations: SmallVec::new(),
            language: None,
        }
    }
}

impl TextStyle {
    /// Construct with the given size in dots-per-em
    pub fn new(dpem: f32) -> Self {
        TextStyle {
            dpem,
            ..Default::default()
        }
    }

    /// Letter spacing in pixels
    #[inline]
    pub fn letter_spacing_px(&self) -> f32 {
        self.letter_spacing * self.dpem
    }

    /// Compute the cache fingerprint of this style
    pub fn fingerprint(&self) -> StyleFingerprint {
        StyleFingerprint {
            dpem: self.dpem.to_bits(),
            weight: self.weight,
            style: self.style,
            width: self.width,
            letter_spacing: self.letter_spacing.to_bits(),
            scale_x: self.scale_x.to_bits(),
            skew_x: self.skew_x.to_bits(),
            variations: self.variations.clone(),
            language: self.language.as_deref().map(Box::from),
        }
    }
}

/// A hashable projection of a [`TextStyle`]
///
/// Floats are compared by bit pattern. Two styles with equal fingerprints
/// produce identical shaping output for identical text and fonts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleFingerprint {
    dpem: u32,
    weight: FontWeight,
    style: FontStyle,
    width: FontWidth,
    letter_spacing: u32,
    scale_x: u32,
    skew_x: u32,
    variations: SmallVec<[Variation; 2]>,
    language: Option<Box<str>>,
}

impl StyleFingerprint {
    pub(crate) fn heap_size(&self) -> usize {
        self.language.as_ref().map(|l| l.len()).unwrap_or(0)
    }
}
