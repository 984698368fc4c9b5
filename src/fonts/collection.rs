// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font collection: a fallback chain of font families

#![allow(clippy::len_without_is_empty)]

use super::attributes::match_cost;
use super::{
    CollectionId, FaceId, FaceStore, Fakery, FontError, FontResolver, FontSelection,
};
use crate::conv::{to_u32, to_usize};
use crate::TextStyle;
use fontdb::{Database, Family};
use log::{debug, error};
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// No matching font found
///
/// A collection must contain at least one face.
#[derive(Error, Debug)]
#[error("no font match")]
pub struct NoFontMatch;

/// Builder for a [`FontCollection`]
///
/// Families are added in fallback order: the first family is the primary
/// font, later families are consulted only for characters not covered by
/// earlier ones.
#[derive(Debug, Default)]
pub struct FontCollectionBuilder {
    faces: Vec<FaceStore>,
    families: Vec<Vec<FaceId>>,
}

impl FontCollectionBuilder {
    /// Add a family from font data
    ///
    /// Each item is `(data, index)` where `data` is the contents of a font
    /// file and `index` the face index within that file. All faces of a
    /// family should share a design; the face closest to the requested style
    /// is chosen at resolution time.
    pub fn add_family<I>(&mut self, faces: I) -> Result<&mut Self, FontError>
    where
        I: IntoIterator<Item = (Arc<[u8]>, u32)>,
    {
        let mut stores = Vec::new();
        for (data, index) in faces {
            stores.push(FaceStore::new(data, index)?);
        }
        Ok(self.push_family(stores))
    }

    fn push_family(&mut self, stores: Vec<FaceStore>) -> &mut Self {
        if stores.is_empty() {
            debug!("FontCollectionBuilder: skipping empty family");
            return self;
        }
        let mut family = Vec::with_capacity(stores.len());
        for store in stores {
            family.push(FaceId(to_u32(self.faces.len())));
            self.faces.push(store);
        }
        self.families.push(family);
        self
    }

    /// Finish
    ///
    /// Fails if no face was added.
    pub fn build(self) -> Result<FontCollection, NoFontMatch> {
        if self.families.is_empty() {
            return Err(NoFontMatch);
        }
        let id = CollectionId::next();
        debug!(
            "FontCollection {id:?}: {} families, {} faces",
            self.families.len(),
            self.faces.len()
        );
        Ok(FontCollection {
            id,
            faces: self.faces,
            families: self.families,
            coverage: Default::default(),
        })
    }
}

/// A fallback chain of font families
///
/// This is the default [`FontResolver`] (and, via
/// [`Shaper`](crate::Shaper), the default shaping backend). Layouts borrow the
/// collection they were built from, so a collection always outlives the
/// layouts referring to its faces.
#[derive(Debug)]
pub struct FontCollection {
    id: CollectionId,
    faces: Vec<FaceStore>,
    families: Vec<Vec<FaceId>>,
    // Cache: first family covering a char (None if no family does)
    coverage: Mutex<HashMap<char, Option<u32>>>,
}

impl FontCollection {
    /// Construct a builder
    #[inline]
    pub fn builder() -> FontCollectionBuilder {
        FontCollectionBuilder::default()
    }

    /// Construct from the faces of a [`Database`]
    ///
    /// `families` is the fallback chain. Each family is resolved to a family
    /// name (generic families via the database's settings) and all faces of
    /// that family are loaded. Faces which fail to load are logged and
    /// skipped; families without faces are skipped.
    pub fn from_database(db: &Database, families: &[Family<'_>]) -> Result<Self, NoFontMatch> {
        let mut builder = FontCollection::builder();
        for family in families {
            let name = db.family_name(family);
            let mut stores = Vec::new();
            for info in db.faces() {
                if !info.families.iter().any(|(n, _)| n == name) {
                    continue;
                }
                let result = db.with_face_data(info.id, |data, index| {
                    FaceStore::new(Arc::from(data), index)
                });
                match result {
                    Some(Ok(store)) => stores.push(store),
                    Some(Err(err)) => error!("Failed to load font: {err}"),
                    None => error!("Failed to load font: no data for {:?}", info.id),
                }
            }
            debug!("family {name}: {} faces", stores.len());
            builder.push_family(stores);
        }
        builder.build()
    }

    /// Number of loaded faces
    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Number of families in the fallback chain
    #[inline]
    pub fn num_families(&self) -> usize {
        self.families.len()
    }

    /// Access a loaded face
    ///
    /// Panics if `id` was not issued by this collection.
    #[inline]
    pub fn face_store(&self, id: FaceId) -> &FaceStore {
        assert!(id.get() < self.faces.len(), "FontCollection: invalid {id:?}!");
        &self.faces[id.get()]
    }

    /// Drop cached coverage look-ups
    pub fn purge(&self) {
        self.coverage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn family_covers(&self, family: u32, c: char) -> bool {
        self.families[to_usize(family)]
            .iter()
            .any(|id| self.faces[id.get()].covers(c))
    }

    /// Resolve the family for a char
    ///
    /// If `last` covers `c`, keep it; this avoids switching fonts on spaces
    /// and punctuation amid text in a fallback font. Otherwise use the first
    /// covering family, or else `last`, or else the primary family.
    fn family_for_char(&self, last: Option<u32>, c: char) -> u32 {
        if let Some(family) = last {
            if self.family_covers(family, c) {
                return family;
            }
        }

        let mut coverage = self.coverage.lock().unwrap_or_else(PoisonError::into_inner);
        let found = match coverage.entry(c) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let found = (0..to_u32(self.families.len())).find(|f| self.family_covers(*f, c));
                *entry.insert(found)
            }
        };
        found.or(last).unwrap_or(0)
    }

    /// Pick the face of `family` closest to `style` and compute fakery
    fn select_in_family(&self, family: u32, style: &TextStyle) -> FontSelection {
        let want = (style.width, style.weight, style.style);
        let mut best = self.families[to_usize(family)][0];
        let mut best_cost = u32::MAX;
        for id in &self.families[to_usize(family)] {
            let face = &self.faces[id.get()];
            let have = (face.width(), face.weight(), face.is_italic());
            let cost = match_cost(want, have);
            if cost < best_cost {
                best = *id;
                best_cost = cost;
            }
        }

        let face = &self.faces[best.get()];
        let mut fakery = Fakery::empty();
        let (want_w, have_w) = (style.weight.value(), face.weight().value());
        if style.weight.is_bold() && want_w.saturating_sub(have_w) >= 200 {
            fakery |= Fakery::BOLD;
        }
        if style.style.is_slanted() && !face.is_italic() {
            fakery |= Fakery::ITALIC;
        }

        FontSelection::new(best)
            .with_fakery(fakery)
            .with_variations(style.variations.iter().cloned())
    }

    /// The face used for a style before any fallback
    pub fn primary(&self, style: &TextStyle) -> FontSelection {
        self.select_in_family(0, style)
    }
}

impl FontResolver for FontCollection {
    #[inline]
    fn collection_id(&self) -> CollectionId {
        self.id
    }

    fn resolve(
        &self,
        style: &TextStyle,
        text: &str,
        start: usize,
        end: usize,
    ) -> (FontSelection, usize) {
        let mut chars = text[start..end].char_indices();
        let Some((_, first)) = chars.next() else {
            return (self.primary(style), 0);
        };

        let family = self.family_for_char(None, first);
        let mut len = end - start;
        for (pos, c) in chars {
            if self.family_for_char(Some(family), c) != family {
                len = pos;
                break;
            }
        }

        (self.select_in_family(family, style), len)
    }
}
