// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Simple data types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// 2D vector (position or size)
///
/// Coordinates are in pixels, with `y` pointing down.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec2(pub f32, pub f32);

impl Vec2 {
    /// Zero
    pub const ZERO: Vec2 = Vec2(0.0, 0.0);
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Vec2(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.1 += rhs.1;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Vec2(self.0 - rhs.0, self.1 - rhs.1)
    }
}

/// An axis-aligned rectangle given by its corners
///
/// A rectangle with zero width or height is *empty*. Empty rectangles are
/// ignored by [`Rect::union`]; the default value is the empty rectangle at
/// the origin.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Upper-left corner
    pub min: Vec2,
    /// Lower-right corner
    pub max: Vec2,
}

impl Rect {
    /// The empty rectangle at the origin
    pub const EMPTY: Rect = Rect {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Construct from coordinates
    #[inline]
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Rect {
            min: Vec2(x0, y0),
            max: Vec2(x1, y1),
        }
    }

    /// True if the rectangle has no area
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.min.0 < self.max.0 && self.min.1 < self.max.1)
    }

    /// Width
    #[inline]
    pub fn width(&self) -> f32 {
        self.max.0 - self.min.0
    }

    /// Height
    #[inline]
    pub fn height(&self) -> f32 {
        self.max.1 - self.min.1
    }

    /// Translate by `offset`
    #[inline]
    pub fn translate(self, offset: Vec2) -> Self {
        Rect {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Bounds after shearing by `skew` (`x += -skew × y`)
    ///
    /// With `y` pointing down, positive `skew` leans content to the right.
    pub fn skew_x(self, skew: f32) -> Self {
        if skew == 0.0 || self.is_empty() {
            return self;
        }
        let (a, b) = (-skew * self.min.1, -skew * self.max.1);
        Rect::new(
            self.min.0 + a.min(b),
            self.min.1,
            self.max.0 + a.max(b),
            self.max.1,
        )
    }

    /// Set `self` to the union of `self` and `other`
    pub fn union(&mut self, other: Rect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        self.min.0 = self.min.0.min(other.min.0);
        self.min.1 = self.min.1.min(other.min.1);
        self.max.0 = self.max.0.max(other.max.0);
        self.max.1 = self.max.1.max(other.max.1);
    }
}

/// Requested writing direction of a layout
///
/// This corresponds to the base (paragraph) level handed to the bidi
/// algorithm.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Auto-detect from the first strong character, falling back to LTR
    #[default]
    Auto,
    /// Auto-detect from the first strong character, falling back to RTL
    AutoRtl,
    /// Left-to-right paragraph; embedded right-to-left text is reordered
    Ltr,
    /// Right-to-left paragraph; embedded left-to-right text is reordered
    Rtl,
    /// Treat the whole range as one left-to-right run (no bidi analysis)
    ForceLtr,
    /// Treat the whole range as one right-to-left run (no bidi analysis)
    ForceRtl,
}
