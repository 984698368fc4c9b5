// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Word splitting
//!
//! Runs are shaped word by word so that common words hit the word cache even
//! inside sentences not seen before.

use xi_unicode::LineBreakIterator;

/// Word boundary classification
pub trait WordBreaker {
    /// Find the end of the word starting at `start`
    ///
    /// `end` is the end of the enclosing directional run. The result must
    /// satisfy `start < result <= end` (where `start < end`) and lie on a
    /// `char` boundary.
    fn next_break(&self, text: &str, start: usize, end: usize) -> usize;
}

/// Spaces as word separators
///
/// Each space (U+0020) or no-break space (U+00A0) is a word of its own;
/// anything else extends to the next space. This keeps words free of
/// surrounding whitespace so that e.g. "go" hits the cache whether or not it
/// is followed by a space.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpaceWords;

#[inline]
fn is_word_space(c: char) -> bool {
    c == ' ' || c == '\u{A0}'
}

impl WordBreaker for SpaceWords {
    fn next_break(&self, text: &str, start: usize, end: usize) -> usize {
        let mut iter = text[start..end].char_indices();
        match iter.next() {
            None => end,
            Some((_, c)) if is_word_space(c) => start + c.len_utf8(),
            Some(_) => iter
                .find(|(_, c)| is_word_space(*c))
                .map(|(pos, _)| start + pos)
                .unwrap_or(end),
        }
    }
}

/// Words end at line-break opportunities (Unicode TR14)
///
/// Trailing spaces belong to the preceding word. Break opportunities are
/// computed within the run only.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineBreakWords;

impl WordBreaker for LineBreakWords {
    fn next_break(&self, text: &str, start: usize, end: usize) -> usize {
        LineBreakIterator::new(&text[start..end])
            .map(|(pos, _)| pos)
            .find(|pos| *pos > 0)
            .map(|pos| start + pos)
            .unwrap_or(end)
    }
}

/// Iterate over the words of `text[start..end]` as `(start, end)` pairs
pub(crate) fn words<'a, B: WordBreaker + ?Sized>(
    breaker: &'a B,
    text: &'a str,
    start: usize,
    end: usize,
) -> impl Iterator<Item = (usize, usize)> + 'a {
    let mut pos = start;
    std::iter::from_fn(move || {
        if pos >= end {
            return None;
        }
        let next = breaker.next_break(text, pos, end);
        assert!(
            pos < next && next <= end,
            "WordBreaker: invalid break {next} in {pos}..{end}"
        );
        let word = (pos, next);
        pos = next;
        Some(word)
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn split<'a, B: WordBreaker>(b: &B, text: &'a str) -> Vec<&'a str> {
        words(b, text, 0, text.len())
            .map(|(s, e)| &text[s..e])
            .collect()
    }

    #[test]
    fn space_words() {
        assert_eq!(split(&SpaceWords, "go fast go"), ["go", " ", "fast", " ", "go"]);
        assert_eq!(split(&SpaceWords, "  a\u{A0}b"), [" ", " ", "a", "\u{A0}", "b"]);
        assert!(split(&SpaceWords, "").is_empty());
    }

    #[test]
    fn line_break_words() {
        assert_eq!(split(&LineBreakWords, "go fast go"), ["go ", "fast ", "go"]);
    }

    #[test]
    fn words_stay_in_range() {
        let text = "one two three";
        let w: Vec<_> = words(&SpaceWords, text, 4, 9).collect();
        assert_eq!(w, [(4, 7), (7, 8), (8, 9)]);
    }
}
