// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Properties for specifying font weight, width and slope

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Visual width of a font, relative to the normal aspect ratio
///
/// Stored in units of 1/256 (so [`FontWidth::NORMAL`] is 256). This maps to
/// the `wdth` variation axis and the CSS `font-width` property.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontWidth(u16);

impl FontWidth {
    /// Width that is 50% of normal.
    pub const ULTRA_CONDENSED: Self = Self(128);
    /// Width that is 75% of normal.
    pub const CONDENSED: Self = Self(192);
    /// Width that is 100% of normal. This is the default value.
    pub const NORMAL: Self = Self(256);
    /// Width that is 125% of normal.
    pub const EXPANDED: Self = Self(320);
    /// Width that is 200% of normal.
    pub const ULTRA_EXPANDED: Self = Self(512);

    /// Creates a new width attribute with the given ratio.
    ///
    /// Panics if the ratio is not between `0` and `255.996`.
    pub fn from_ratio(ratio: f32) -> Self {
        let value = (ratio * 256.0).round();
        assert!(0.0 <= value && value <= (u16::MAX as f32));
        Self(value as u16)
    }

    /// Returns the width attribute as a ratio (`1.0` is normal)
    pub fn ratio(self) -> f32 {
        (self.0 as f32) / 256.0
    }
}

impl Default for FontWidth {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual weight class of a font, on a scale from 1 to 1000
///
/// The default value is [`FontWeight::NORMAL`] or `400`. This maps to the
/// `wght` variation axis and the CSS `font-weight` property.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontWeight(u16);

impl FontWeight {
    /// Weight value of 100.
    pub const THIN: Self = Self(100);
    /// Weight value of 300.
    pub const LIGHT: Self = Self(300);
    /// Weight value of 400. This is the default value.
    pub const NORMAL: Self = Self(400);
    /// Weight value of 500.
    pub const MEDIUM: Self = Self(500);
    /// Weight value of 600.
    pub const SEMI_BOLD: Self = Self(600);
    /// Weight value of 700.
    pub const BOLD: Self = Self(700);
    /// Weight value of 900.
    pub const BLACK: Self = Self(900);

    /// Creates a new weight attribute with the given value.
    pub fn new(weight: u16) -> Self {
        Self(weight)
    }

    /// Returns the underlying weight value.
    pub fn value(self) -> u16 {
        self.0
    }

    /// Whether this weight counts as bold when synthesizing emboldening
    pub fn is_bold(self) -> bool {
        self >= Self::SEMI_BOLD
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Visual style or 'slope' of a font
///
/// The default value is [`FontStyle::Normal`].
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontStyle {
    /// An upright or "roman" style.
    #[default]
    Normal,
    /// Generally a slanted style, originally based on semi-cursive forms.
    Italic,
    /// Oblique (slanted) style with an optional angle in degrees times 256
    Oblique(Option<i16>),
}

impl FontStyle {
    /// True for italic and oblique styles
    #[inline]
    pub fn is_slanted(self) -> bool {
        self != FontStyle::Normal
    }
}

/// Distance between a requested and an available width/weight/slope triple
///
/// Lower is better. Width is matched first: each step of 12.5% costs more
/// than any weight difference. Weight differences are counted in steps of
/// 100; a slope mismatch costs as much as two weight steps.
pub(crate) fn match_cost(
    want: (FontWidth, FontWeight, FontStyle),
    have: (FontWidth, FontWeight, bool),
) -> u32 {
    let width = u32::from(want.0 .0.abs_diff(have.0 .0)) / 32 * 20;
    let weight = u32::from(want.1.value().abs_diff(have.1.value())) / 100;
    let slope = if want.2.is_slanted() != have.2 { 2 } else { 0 };
    width + weight + slope
}
