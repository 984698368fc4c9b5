// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Loaded font faces

use super::{FontWeight, FontWidth};
use std::sync::Arc;
use thiserror::Error;
use ttf_parser::Face;

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
}

/// A store of data for a font face, supporting various backends
pub struct FaceStore {
    // Borrows from `data`; never handed out with a lifetime beyond `&self`.
    face: Face<'static>,
    #[cfg(feature = "rustybuzz")]
    rustybuzz: rustybuzz::Face<'static>,
    data: Arc<[u8]>,
    index: u32,
    width: FontWidth,
    weight: FontWeight,
    italic: bool,
}

impl FaceStore {
    /// Construct from font file data and a face index within that file
    pub fn new(data: Arc<[u8]>, index: u32) -> Result<Self, FontError> {
        // Safety: the slice is owned by `data`, a heap allocation which is
        // kept alive (and never moved) by this FaceStore.
        let slice = unsafe { extend_lifetime(&*data) };
        let face = Face::parse(slice, index)?;

        let width = width_of(face.width());
        let weight = FontWeight::new(face.weight().to_number());
        let italic = face.is_italic() || face.is_oblique();

        Ok(FaceStore {
            #[cfg(feature = "rustybuzz")]
            rustybuzz: rustybuzz::Face::from_face(face.clone()),
            face,
            data,
            index,
            width,
            weight,
            italic,
        })
    }

    /// Access the [`Face`] object
    #[inline]
    pub fn face(&self) -> &Face<'static> {
        &self.face
    }

    /// Access the [`rustybuzz`] object
    #[cfg(feature = "rustybuzz")]
    #[cfg_attr(doc_cfg, doc(cfg(feature = "rustybuzz")))]
    #[inline]
    pub fn rustybuzz(&self) -> &rustybuzz::Face<'static> {
        &self.rustybuzz
    }

    /// Raw font file data
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Face index within the font file
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Width declared by the face
    #[inline]
    pub fn width(&self) -> FontWidth {
        self.width
    }

    /// Weight declared by the face
    #[inline]
    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// True if the face is italic or oblique
    #[inline]
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// True if the face maps `c` to a glyph other than the missing glyph
    #[inline]
    pub fn covers(&self, c: char) -> bool {
        self.face.glyph_index(c).is_some()
    }
}

impl std::fmt::Debug for FaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceStore")
            .field("len", &self.data.len())
            .field("index", &self.index)
            .field("width", &self.width)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .finish()
    }
}

fn width_of(width: ttf_parser::Width) -> FontWidth {
    use ttf_parser::Width::*;
    let ratio = match width {
        UltraCondensed => 0.5,
        ExtraCondensed => 0.625,
        Condensed => 0.75,
        SemiCondensed => 0.875,
        Normal => 1.0,
        SemiExpanded => 1.125,
        Expanded => 1.25,
        ExtraExpanded => 1.5,
        UltraExpanded => 2.0,
    };
    FontWidth::from_ratio(ratio)
}

unsafe fn extend_lifetime<'b, T: ?Sized>(r: &'b T) -> &'static T {
    std::mem::transmute::<&'b T, &'static T>(r)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn os2_widths() {
        assert_eq!(width_of(ttf_parser::Width::Condensed), FontWidth::CONDENSED);
        assert_eq!(width_of(ttf_parser::Width::Normal), FontWidth::NORMAL);
        assert_eq!(width_of(ttf_parser::Width::UltraExpanded), FontWidth::ULTRA_EXPANDED);
    }

    #[test]
    fn invalid_data() {
        let data: Arc<[u8]> = Arc::from(&b"definitely not a font"[..]);
        assert!(matches!(
            FaceStore::new(data, 0),
            Err(FontError::TtfParser(_))
        ));
    }
}
