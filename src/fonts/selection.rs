// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Resolved font selections

use crate::conv::to_usize;
use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

/// Font face identifier
///
/// Identifies a loaded font face within one font collection by index. Face
/// identifiers are only meaningful together with the [`CollectionId`] of the
/// collection which issued them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceId(pub u32);

impl FaceId {
    /// Get as `usize`
    #[inline]
    pub fn get(self) -> usize {
        to_usize(self.0)
    }
}

/// Font collection identifier
///
/// Every collection takes a unique identifier on construction; the word
/// cache uses it to keep fragments shaped against different collections
/// apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollectionId(u32);

impl CollectionId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        CollectionId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

bitflags! {
    /// Synthetic styling applied to a face which lacks the requested style
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Fakery: u8 {
        /// Embolden glyph outlines
        const BOLD = 1 << 0;
        /// Skew glyph outlines
        const ITALIC = 1 << 1;
    }
}

/// A variation-axis setting, e.g. `wght=650`
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variation {
    /// Axis tag
    pub tag: [u8; 4],
    /// Axis value
    pub value: f32,
}

impl Variation {
    /// Construct
    pub fn new(tag: &[u8; 4], value: f32) -> Self {
        Variation { tag: *tag, value }
    }
}

// Values compare by bit pattern so that `Variation` may be used in keys.
impl PartialEq for Variation {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for Variation {}

impl Hash for Variation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        self.value.to_bits().hash(state);
    }
}

/// A concrete font face plus synthetic style and variation settings
///
/// Two selections are equal if and only if all fields are equal; this value
/// equality is the deduplication key of face tables and part of the word
/// cache key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontSelection {
    /// Face within the collection
    pub face: FaceId,
    /// Synthetic emboldening / slanting
    pub fakery: Fakery,
    /// Variation axis settings
    pub variations: SmallVec<[Variation; 2]>,
}

impl FontSelection {
    /// Select a face without fakery or variations
    #[inline]
    pub fn new(face: FaceId) -> Self {
        FontSelection {
            face,
            ..Default::default()
        }
    }

    /// Set fakery
    #[inline]
    pub fn with_fakery(mut self, fakery: Fakery) -> Self {
        self.fakery = fakery;
        self
    }

    /// Set variation settings
    pub fn with_variations(mut self, variations: impl IntoIterator<Item = Variation>) -> Self {
        self.variations = variations.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn equality_is_by_value() {
        let a = FontSelection::new(FaceId(1)).with_fakery(Fakery::BOLD);
        let b = FontSelection::new(FaceId(1)).with_fakery(Fakery::BOLD);
        assert_eq!(a, b);
        assert_ne!(a, FontSelection::new(FaceId(1)));

        let wght = Variation::new(b"wght", 650.0);
        let c = a.clone().with_variations([wght]);
        assert_ne!(a, c);
        assert_eq!(c, b.with_variations([Variation::new(b"wght", 650.0)]));
    }

    #[test]
    fn collection_ids_are_unique() {
        assert_ne!(CollectionId::next(), CollectionId::next());
    }
}
