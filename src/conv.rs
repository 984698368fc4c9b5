// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Type conversion utilities
//!
//! Text indices are stored as `u32` instead of `usize` in glyph buffers in
//! order to save space (a single layout never approaches `u32::MAX` bytes of
//! text). Face-table indices are stored as `u16`.

use easy_cast::Cast;

/// Convert `usize` → `u32`
///
/// This is a "safer" wrapper around `as` ensuring (on debug builds) that the
/// input value may be represented correctly by `u32`.
#[inline]
pub fn to_u32(x: usize) -> u32 {
    x.cast()
}

/// Convert `u32` → `usize`
#[inline]
pub fn to_usize(x: u32) -> usize {
    x.cast()
}

/// Convert `usize` → `u16`, for face-table indices
///
/// Panics if `x` does not fit. A face table of this size means something has
/// gone badly wrong with font resolution.
#[inline]
pub fn to_u16(x: usize) -> u16 {
    u16::try_from(x).expect("face table index exceeds u16::MAX")
}

/// Scale factor: pixels per font unit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DPU(pub f32);

impl DPU {
    /// Scale from a font size in pixels per em and the font's units per em
    #[inline]
    pub fn new(dpem: f32, units_per_em: u16) -> Self {
        DPU(dpem / f32::from(units_per_em.max(1)))
    }

    #[cfg(feature = "rustybuzz")]
    pub(crate) fn i32_to_px(self, x: i32) -> f32 {
        x as f32 * self.0
    }
    pub(crate) fn i16_to_px(self, x: i16) -> f32 {
        f32::from(x) * self.0
    }
    pub(crate) fn u16_to_px(self, x: u16) -> f32 {
        f32::from(x) * self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dpu_scales_font_units() {
        let dpu = DPU::new(16.0, 1000);
        assert_eq!(dpu.u16_to_px(500), 8.0);
        assert_eq!(dpu.i16_to_px(-250), -4.0);
    }

    #[test]
    #[should_panic]
    fn face_index_overflow() {
        to_u16(usize::from(u16::MAX) + 1);
    }
}
