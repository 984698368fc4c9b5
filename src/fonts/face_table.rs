// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Per-result face tables

use super::FontSelection;
use crate::conv::to_u16;
use smallvec::SmallVec;

/// Index into a [`FaceTable`]
///
/// Glyphs carry this small index instead of a full [`FontSelection`]. An
/// index is only meaningful against the table of the layout or fragment
/// which owns the glyph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontIndex(pub u16);

impl FontIndex {
    /// Get as `usize`
    #[inline]
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

/// An ordered list of unique font selections
///
/// Tables only grow; there is no removal. Lookup is a linear scan: table
/// length is bounded by fallback depth and script mixing, not text length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceTable {
    faces: SmallVec<[FontSelection; 2]>,
}

impl FaceTable {
    /// Construct an empty table
    #[inline]
    pub fn new() -> Self {
        FaceTable::default()
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Find the index of `selection`, inserting if missing
    pub fn find_or_insert(&mut self, selection: &FontSelection) -> FontIndex {
        if let Some(i) = self.faces.iter().position(|f| f == selection) {
            return FontIndex(to_u16(i));
        }
        let index = FontIndex(to_u16(self.faces.len()));
        self.faces.push(selection.clone());
        index
    }

    /// Get an entry
    #[inline]
    pub fn get(&self, index: FontIndex) -> Option<&FontSelection> {
        self.faces.get(index.get())
    }

    /// Iterate over entries, in index order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, FontSelection> {
        self.faces.iter()
    }

    pub(crate) fn heap_size(&self) -> usize {
        if self.faces.spilled() {
            self.faces.capacity() * std::mem::size_of::<FontSelection>()
        } else {
            0
        }
    }
}

impl std::ops::Index<FontIndex> for FaceTable {
    type Output = FontSelection;

    #[inline]
    fn index(&self, index: FontIndex) -> &FontSelection {
        &self.faces[index.get()]
    }
}

impl<'a> IntoIterator for &'a FaceTable {
    type Item = &'a FontSelection;
    type IntoIter = std::slice::Iter<'a, FontSelection>;

    fn into_iter(self) -> Self::IntoIter {
        self.faces.iter()
    }
}
