// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Bidirectional run segmentation

use crate::Direction;
use smallvec::SmallVec;
use std::ops::Range;
use unicode_bidi::{bidi_class, BidiClass, BidiInfo, Level, LTR_LEVEL, RTL_LEVEL};

/// A maximal sub-range of text sharing one direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionalRun {
    /// Start (byte index into the text buffer)
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    /// True if the run is right-to-left
    pub rtl: bool,
}

impl DirectionalRun {
    /// End (byte index)
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Range of the text covered
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// A sequence of runs, typically of length 1
pub type Runs = SmallVec<[DirectionalRun; 1]>;

/// Bidi segmentation
///
/// Implementations return runs which exactly partition `range` (no gaps, no
/// overlap, no empty runs), in *visual* order: the order in which runs are
/// placed left-to-right on the line.
pub trait BidiSegmenter {
    /// Segment `text[range]`
    fn segment(&self, text: &str, range: Range<usize>, direction: Direction) -> Runs;
}

/// Segmentation via the `unicode-bidi` crate (Unicode TR9)
///
/// The whole `text` buffer is analysed, so text outside `range` may affect
/// embedding levels inside it; runs are clipped to `range`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeBidi;

/// Direction of the first strong character, if any
fn first_strong(text: &str) -> Option<Level> {
    text.chars().find_map(|c| match bidi_class(c) {
        BidiClass::L => Some(LTR_LEVEL),
        BidiClass::R | BidiClass::AL => Some(RTL_LEVEL),
        _ => None,
    })
}

impl BidiSegmenter for UnicodeBidi {
    fn segment(&self, text: &str, range: Range<usize>, direction: Direction) -> Runs {
        let mut runs = Runs::new();
        if range.is_empty() {
            return runs;
        }

        let level = match direction {
            Direction::ForceLtr | Direction::ForceRtl => {
                runs.push(DirectionalRun {
                    start: range.start,
                    len: range.len(),
                    rtl: direction == Direction::ForceRtl,
                });
                return runs;
            }
            Direction::Ltr => LTR_LEVEL,
            Direction::Rtl => RTL_LEVEL,
            Direction::Auto => first_strong(&text[range.clone()]).unwrap_or(LTR_LEVEL),
            Direction::AutoRtl => first_strong(&text[range.clone()]).unwrap_or(RTL_LEVEL),
        };

        let info = BidiInfo::new(text, Some(level));
        for para in &info.paragraphs {
            let start = para.range.start.max(range.start);
            let end = para.range.end.min(range.end);
            if start >= end {
                continue;
            }

            let (levels, level_runs) = info.visual_runs(para, start..end);
            for run in level_runs {
                if run.is_empty() {
                    continue;
                }
                runs.push(DirectionalRun {
                    start: run.start,
                    len: run.len(),
                    rtl: levels[run.start].is_rtl(),
                });
            }
        }

        runs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_partition(runs: &[DirectionalRun], range: Range<usize>) {
        let mut covered: Vec<_> = runs.iter().map(|r| r.range()).collect();
        covered.sort_by_key(|r| r.start);
        let mut pos = range.start;
        for r in covered {
            assert!(!r.is_empty());
            assert_eq!(r.start, pos);
            pos = r.end;
        }
        assert_eq!(pos, range.end);
    }

    #[test]
    fn empty_range() {
        let runs = UnicodeBidi.segment("abc", 1..1, Direction::Auto);
        assert!(runs.is_empty());
    }

    #[test]
    fn ltr_only() {
        let text = "go fast go";
        let runs = UnicodeBidi.segment(text, 0..text.len(), Direction::Auto);
        assert_eq!(
            runs.as_slice(),
            &[DirectionalRun {
                start: 0,
                len: text.len(),
                rtl: false
            }]
        );
    }

    #[test]
    fn forced() {
        let text = "abc אבג";
        let runs = UnicodeBidi.segment(text, 0..text.len(), Direction::ForceRtl);
        assert_eq!(runs.len(), 1);
        assert!(runs[0].rtl);
        assert_eq!(runs[0].len, text.len());
    }

    #[test]
    fn mixed_visual_order() {
        // "abc " then three Hebrew letters
        let text = "abc אבג def";
        let range = 0..text.len();
        let runs = UnicodeBidi.segment(text, range.clone(), Direction::Ltr);
        check_partition(&runs, range);
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].rtl);
        assert!(runs[1].rtl);
        assert_eq!(&text[runs[1].range()], "אבג");
        assert!(!runs[2].rtl);

        // In an RTL paragraph the LTR runs swap sides
        let runs = UnicodeBidi.segment(text, 0..text.len(), Direction::Rtl);
        check_partition(&runs, 0..text.len());
        assert_eq!(&text[runs.first().unwrap().range()], "def");
        assert_eq!(&text[runs.last().unwrap().range()], "abc");
    }

    #[test]
    fn auto_detects_rtl() {
        let text = "אבג abc";
        let runs = UnicodeBidi.segment(text, 0..text.len(), Direction::Auto);
        check_partition(&runs, 0..text.len());
        // Paragraph is RTL: the Latin word is placed first (left-most)
        assert_eq!(&text[runs[0].range()], "abc");
        assert!(!runs[0].rtl);
        assert!(runs.last().unwrap().rtl);
    }

    #[test]
    fn sub_range() {
        let text = "xx abc אבג yy";
        let range = 3..(text.len() - 3);
        let runs = UnicodeBidi.segment(text, range.clone(), Direction::Ltr);
        check_partition(&runs, range);
    }
}
