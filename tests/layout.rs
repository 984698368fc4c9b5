// Layout tests using a deterministic mock font collection

use glyphrun::fonts::{CollectionId, FaceId, FontResolver, FontSelection};
use glyphrun::{
    Direction, GlyphId, Layout, Rect, ShapedGlyph, Shaper, TextStyle, Typesetter, WordCache,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Face 0 covers ASCII, face 1 everything else
///
/// Glyph ids are char values; spaces advance by half an em and have no ink,
/// other chars advance by one em.
struct MockFonts {
    id: CollectionId,
    shaped: AtomicUsize,
}

impl MockFonts {
    fn new() -> Self {
        MockFonts {
            id: CollectionId::next(),
            shaped: AtomicUsize::new(0),
        }
    }

    fn shaped(&self) -> usize {
        self.shaped.load(Ordering::Relaxed)
    }
}

fn face_for(c: char) -> u32 {
    if c.is_ascii() {
        0
    } else {
        1
    }
}

impl FontResolver for MockFonts {
    fn collection_id(&self) -> CollectionId {
        self.id
    }

    fn resolve(
        &self,
        _: &TextStyle,
        text: &str,
        start: usize,
        end: usize,
    ) -> (FontSelection, usize) {
        let mut chars = text[start..end].char_indices();
        let face = chars.next().map(|(_, c)| face_for(c)).unwrap_or(0);
        let len = chars
            .find(|(_, c)| face_for(*c) != face)
            .map(|(pos, _)| pos)
            .unwrap_or(end - start);
        (FontSelection::new(FaceId(face)), len)
    }
}

impl Shaper for MockFonts {
    fn shape(
        &self,
        font: &FontSelection,
        style: &TextStyle,
        text: &str,
        rtl: bool,
        out: &mut Vec<ShapedGlyph>,
    ) {
        self.shaped.fetch_add(1, Ordering::Relaxed);
        let mut chars: Vec<_> = text.char_indices().collect();
        if rtl {
            chars.reverse();
        }
        for (index, c) in chars {
            assert_eq!(face_for(c), font.face.0);
            let (advance, bounds) = match c {
                ' ' => (style.dpem * 0.5, Rect::EMPTY),
                _ => (style.dpem, Rect::new(0.0, -8.0, style.dpem, 2.0)),
            };
            out.push(ShapedGlyph {
                id: GlyphId(c as u32),
                cluster: index as u32,
                advance,
                offset: Default::default(),
                bounds,
            });
        }
    }
}

fn style() -> TextStyle {
    TextStyle::new(10.0)
}

fn ids(layout: &Layout) -> String {
    layout
        .glyphs()
        .iter()
        .map(|g| char::from_u32(g.id.0).unwrap())
        .collect()
}

fn xs(layout: &Layout) -> Vec<f32> {
    layout.glyphs().iter().map(|g| g.x).collect()
}

fn check_invariants(layout: &Layout) {
    assert_eq!(layout.num_glyphs(), layout.glyph_advances().len());
    assert_eq!(layout.num_glyphs(), layout.clusters().len());
    for i in 0..layout.num_glyphs() {
        assert!(layout.font_index(i).get() < layout.faces().len());
        assert!((layout.clusters()[i] as usize) < layout.text_len());
    }
    let sum: f32 = layout.glyph_advances().iter().sum();
    assert_eq!(sum, layout.advance());
}

#[test]
fn repeated_word_hits_cache() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let text = "go fast go";
    let layout = Typesetter::new(&fonts)
        .with_cache(&cache)
        .layout(text, 0..text.len(), Direction::Auto, &style());
    check_invariants(&layout);

    // "go", " " and "fast" are shaped; the second " " and "go" are hits
    assert_eq!(fonts.shaped(), 3);
    let stats = cache.stats();
    assert_eq!((stats.hits, stats.misses, stats.len), (2, 3, 3));

    assert_eq!(ids(&layout), text);
    assert_eq!(
        xs(&layout),
        [0.0, 10.0, 20.0, 25.0, 35.0, 45.0, 55.0, 65.0, 70.0, 80.0]
    );
    assert_eq!(layout.clusters(), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    assert_eq!(layout.advance(), 90.0);
    assert_eq!(layout.faces().len(), 1);
    assert_eq!(layout.font(9), &FontSelection::new(FaceId(0)));
    assert_eq!(layout.bounds(), Rect::new(0.0, -8.0, 90.0, 2.0));
}

#[test]
fn cache_is_transparent() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let text = "one two one αβγ two";
    let ts = Typesetter::new(&fonts).with_cache(&cache);

    let cold = ts.layout(text, 0..text.len(), Direction::Ltr, &style());
    let warm = ts.layout(text, 0..text.len(), Direction::Ltr, &style());
    let uncached = Typesetter::new(&fonts).without_cache().layout(
        text,
        0..text.len(),
        Direction::Ltr,
        &style(),
    );

    check_invariants(&cold);
    assert_eq!(cold, warm);
    assert_eq!(cold, uncached);
}

#[test]
fn font_fallback_within_word() {
    let fonts = MockFonts::new();
    let text = "abαβc";
    let layout = Typesetter::new(&fonts).without_cache().layout(
        text,
        0..text.len(),
        Direction::Auto,
        &style(),
    );
    check_invariants(&layout);

    assert_eq!(fonts.shaped(), 3);
    assert_eq!(ids(&layout), text);
    let faces: Vec<_> = layout.faces().iter().map(|f| f.face.0).collect();
    assert_eq!(faces, [0, 1]);
    let indices: Vec<_> = layout.glyphs().iter().map(|g| g.font.0).collect();
    assert_eq!(indices, [0, 0, 1, 1, 0]);
    assert_eq!(layout.clusters(), [0, 1, 2, 4, 6]);
    assert_eq!(xs(&layout), [0.0, 10.0, 20.0, 30.0, 40.0]);

    let mut buf = vec![0.0; text.len()];
    layout.advances_into(&mut buf);
    assert_eq!(buf, [10.0, 10.0, 10.0, 0.0, 10.0, 0.0, 10.0]);
    assert_eq!(buf.iter().sum::<f32>(), layout.advance());
}

#[test]
fn rtl_words_and_glyphs_reversed() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let text = "אב גד";
    let layout = Typesetter::new(&fonts)
        .with_cache(&cache)
        .layout(text, 0..text.len(), Direction::Auto, &style());
    check_invariants(&layout);

    assert_eq!(ids(&layout), "דג בא");
    assert_eq!(layout.clusters(), [7, 5, 4, 2, 0]);
    assert_eq!(xs(&layout), [0.0, 10.0, 20.0, 25.0, 35.0]);
    assert_eq!(layout.advance(), 45.0);

    let faces: Vec<_> = layout.faces().iter().map(|f| f.face.0).collect();
    assert_eq!(faces, [1, 0]);
}

#[test]
fn mixed_direction() {
    let fonts = MockFonts::new();
    let text = "abc אבג def";
    let layout = Typesetter::new(&fonts).without_cache().layout(
        text,
        0..text.len(),
        Direction::Ltr,
        &style(),
    );
    check_invariants(&layout);
    assert_eq!(ids(&layout), "abc גבא def");

    let forced = Typesetter::new(&fonts).without_cache().layout(
        text,
        0..text.len(),
        Direction::ForceLtr,
        &style(),
    );
    assert_eq!(ids(&forced), text);
    assert_eq!(forced.advance(), layout.advance());
}

#[test]
fn sub_range() {
    let fonts = MockFonts::new();
    let text = "one two three";
    let layout = Typesetter::new(&fonts)
        .without_cache()
        .layout(text, 4..7, Direction::Auto, &style());
    check_invariants(&layout);

    assert_eq!(layout.text_len(), 3);
    assert_eq!(ids(&layout), "two");
    assert_eq!(layout.clusters(), [0, 1, 2]);
    assert_eq!(xs(&layout), [0.0, 10.0, 20.0]);
}

#[test]
fn empty_range() {
    let fonts = MockFonts::new();
    let layout = Typesetter::new(&fonts)
        .without_cache()
        .layout("abc", 1..1, Direction::Auto, &style());

    assert!(layout.is_empty());
    assert_eq!(layout.text_len(), 0);
    assert_eq!(layout.advance(), 0.0);
    assert!(layout.bounds().is_empty());
    assert!(layout.faces().is_empty());
    assert_eq!(fonts.shaped(), 0);
}

#[test]
#[should_panic]
fn range_out_of_bounds() {
    let fonts = MockFonts::new();
    Typesetter::new(&fonts)
        .without_cache()
        .layout("abc", 1..4, Direction::Auto, &style());
}

#[test]
fn letter_spacing() {
    let fonts = MockFonts::new();
    let mut style = style();
    style.letter_spacing = 0.1;
    let layout = Typesetter::new(&fonts)
        .without_cache()
        .layout("ab", 0..2, Direction::Auto, &style);

    assert_eq!(layout.glyph_advances(), [11.0, 11.0]);
    assert_eq!(xs(&layout), [0.5, 11.5]);
    assert_eq!(layout.advance(), 22.0);
}

#[test]
fn style_is_part_of_key() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let ts = Typesetter::new(&fonts).with_cache(&cache);

    let small = ts.layout("word", 0..4, Direction::Auto, &style());
    let large = ts.layout("word", 0..4, Direction::Auto, &TextStyle::new(20.0));
    assert_eq!(fonts.shaped(), 2);
    assert_eq!(small.advance(), 40.0);
    assert_eq!(large.advance(), 80.0);

    // Same text, other collection
    let other = MockFonts::new();
    Typesetter::new(&other)
        .with_cache(&cache)
        .layout("word", 0..4, Direction::Auto, &style());
    assert_eq!(other.shaped(), 1);
    assert_eq!(cache.len(), 3);
}

#[test]
fn purge_keeps_layouts() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let text = "keep this";
    let ts = Typesetter::new(&fonts).with_cache(&cache);
    let before = ts.layout(text, 0..text.len(), Direction::Auto, &style());
    let copy = before.clone();

    cache.purge();
    assert!(cache.is_empty());
    assert_eq!(before, copy);
    check_invariants(&before);

    let after = ts.layout(text, 0..text.len(), Direction::Auto, &style());
    assert_eq!(before, after);
    assert_eq!(fonts.shaped(), 6);
}

#[test]
fn global_cache() {
    glyphrun::init(Default::default());
    let fonts = MockFonts::new();
    let text = "global words";
    let a = Typesetter::new(&fonts).layout(text, 0..text.len(), Direction::Auto, &style());
    glyphrun::purge_caches(&[]);
    let b = Typesetter::new(&fonts).layout(text, 0..text.len(), Direction::Auto, &style());
    assert_eq!(a, b);
    check_invariants(&a);
}

#[test]
fn concurrent_layout() {
    let fonts = MockFonts::new();
    let cache = WordCache::default();
    let texts = ["the cat sat", "on the mat", "אב the גד", "cat αβ mat"];
    let expected: Vec<_> = texts
        .iter()
        .map(|t| {
            Typesetter::new(&fonts)
                .without_cache()
                .layout(t, 0..t.len(), Direction::Auto, &style())
        })
        .collect();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let ts = Typesetter::new(&fonts).with_cache(&cache);
                for _ in 0..20 {
                    for (text, expected) in texts.iter().zip(&expected) {
                        let layout = ts.layout(text, 0..text.len(), Direction::Auto, &style());
                        assert_eq!(&layout, expected);
                    }
                }
            });
        }
    });

    let stats = cache.stats();
    assert!(stats.hits > 0);
    assert!(stats.len as u64 <= stats.misses);
}

#[test]
fn layout_is_send_sync() {
    fn check<T: Send + Sync>() {}
    check::<Layout<'static>>();
    check::<WordCache>();
}
