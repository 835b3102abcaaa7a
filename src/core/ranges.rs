//! Collapsing hour indices into contiguous ranges and describing them in Dutch.

use std::{
    collections::BTreeSet,
    fmt::{Display, Formatter},
};

use itertools::Itertools;

/// Closed range of hours: both `start` and `end` are included.
///
/// The upper bound is intentionally not limited to `23` since a day may count 25 hours.
/// The fields are private: [`Range::new`] is the only way to build one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Range {
    start: u32,
    end: u32,
}

impl Range {
    /// # Panics
    ///
    /// When `start` is greater than `end`.
    pub fn new(start: u32, end: u32) -> Self {
        assert!(start <= end, "range start ({start}) must not exceed its end ({end})");
        Self { start, end }
    }

    #[cfg(test)]
    pub fn single(hour: u32) -> Self {
        Self::new(hour, hour)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "van {:02}:00 tot {:02}:59", self.start, self.end)
    }
}

/// Collapse the hours into the minimal sorted list of maximal contiguous ranges.
///
/// The input may be unordered and may contain duplicates (the repeated hour on the «fall back» day).
pub fn collapse(hours: impl IntoIterator<Item = u32>) -> Vec<Range> {
    let mut ranges = Vec::new();
    let mut hours = hours.into_iter().collect::<BTreeSet<_>>().into_iter();
    let Some(first) = hours.next() else {
        return ranges;
    };
    let (mut start, mut end) = (first, first);
    for hour in hours {
        if hour == end + 1 {
            end = hour;
        } else {
            ranges.push(Range::new(start, end));
            (start, end) = (hour, hour);
        }
    }
    ranges.push(Range::new(start, end));
    ranges
}

/// Join the ranges with commas, except for the last one which is joined with «en».
pub fn format(ranges: &[Range]) -> String {
    match ranges {
        [] => String::new(),
        [single] => single.to_string(),
        [init @ .., last] => format!("{} en {last}", init.iter().join(", ")),
    }
}

pub fn collapse_and_format(hours: impl IntoIterator<Item = u32>) -> String {
    format(&collapse(hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_empty() {
        assert!(collapse([]).is_empty());
        assert!(collapse(Vec::new()).is_empty());
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse([1]), [Range::single(1)]);
        assert_eq!(collapse([1, 2, 3]), [Range::new(1, 3)]);
        assert_eq!(collapse([1, 2, 3, 5, 6, 7]), [Range::new(1, 3), Range::new(5, 7)]);
        assert_eq!(
            collapse([1, 2, 3, 5, 6, 7, 9, 10, 11]),
            [Range::new(1, 3), Range::new(5, 7), Range::new(9, 11)],
        );
        assert_eq!(collapse([1, 2, 4, 6]), [Range::new(1, 2), Range::single(4), Range::single(6)]);
        assert_eq!(collapse([1, 3, 5]), [Range::single(1), Range::single(3), Range::single(5)]);
        assert_eq!(collapse([1, 2, 10, 11]), [Range::new(1, 2), Range::new(10, 11)]);
    }

    #[test]
    fn test_collapse_beyond_23() {
        assert_eq!(
            collapse([1, 2, 3, 5, 6, 7, 9, 11, 12, 13, 15, 17, 19, 21, 22, 23, 25]),
            [
                Range::new(1, 3),
                Range::new(5, 7),
                Range::single(9),
                Range::new(11, 13),
                Range::single(15),
                Range::single(17),
                Range::single(19),
                Range::new(21, 23),
                Range::single(25),
            ],
        );
    }

    #[test]
    fn test_collapse_unordered() {
        assert_eq!(collapse([7, 1, 6, 3, 2, 5]), [Range::new(1, 3), Range::new(5, 7)]);
    }

    #[test]
    fn test_collapse_duplicates() {
        assert_eq!(collapse([2, 2, 3]), collapse([2, 3]));
        assert_eq!(collapse([2, 3, 3]), [Range::new(2, 3)]);
        assert_eq!(collapse([1, 1, 3, 3]), [Range::single(1), Range::single(3)]);
    }

    /// The ranges must cover exactly the input, be sorted, and not touch each other.
    #[test]
    fn test_collapse_is_exact_and_maximal() {
        let inputs: [&[u32]; 5] =
            [&[0], &[0, 23], &[0, 1, 2, 22, 23], &[4, 8, 9, 10, 15, 16], &[3, 5, 7, 9, 11, 13]];
        for input in inputs {
            let ranges = collapse(input.iter().copied());
            let covered = ranges.iter().flat_map(|range| range.start..=range.end).collect_vec();
            assert_eq!(covered, input, "{ranges:?}");
            for (left, right) in ranges.iter().tuple_windows() {
                assert!(left.end + 1 < right.start, "{left:?} and {right:?} must be merged");
            }
        }
    }

    #[test]
    #[should_panic = "must not exceed"]
    fn test_new_inverted_range() {
        let _ = Range::new(3, 1);
    }

    #[test]
    fn test_format() {
        assert_eq!(format(&[]), "");
        assert_eq!(format(&[Range::single(1)]), "van 01:00 tot 01:59");
        assert_eq!(format(&[Range::new(1, 3)]), "van 01:00 tot 03:59");
        assert_eq!(
            format(&[Range::new(1, 3), Range::single(5)]),
            "van 01:00 tot 03:59 en van 05:00 tot 05:59",
        );
        assert_eq!(
            format(&[Range::new(1, 3), Range::new(5, 7), Range::single(9)]),
            "van 01:00 tot 03:59, van 05:00 tot 07:59 en van 09:00 tot 09:59",
        );
    }

    #[test]
    fn test_format_many() {
        let ranges = [
            Range::new(1, 3),
            Range::new(5, 7),
            Range::single(9),
            Range::new(11, 13),
            Range::single(15),
            Range::single(17),
            Range::new(19, 20),
            Range::single(21),
            Range::new(22, 23),
        ];
        assert_eq!(
            format(&ranges),
            "van 01:00 tot 03:59, van 05:00 tot 07:59, van 09:00 tot 09:59, van 11:00 tot 13:59, van 15:00 tot 15:59, van 17:00 tot 17:59, van 19:00 tot 20:59, van 21:00 tot 21:59 en van 22:00 tot 23:59",
        );
    }

    #[test]
    fn test_collapse_and_format() {
        assert_eq!(collapse_and_format([]), "");
        assert_eq!(collapse_and_format([1]), "van 01:00 tot 01:59");
        assert_eq!(collapse_and_format([1, 2, 3]), "van 01:00 tot 03:59");
        assert_eq!(
            collapse_and_format([1, 2, 3, 5, 6, 7]),
            "van 01:00 tot 03:59 en van 05:00 tot 07:59",
        );
        assert_eq!(
            collapse_and_format([1, 2, 3, 5, 6, 7, 9, 10, 11]),
            "van 01:00 tot 03:59, van 05:00 tot 07:59 en van 09:00 tot 11:59",
        );
        assert_eq!(
            collapse_and_format([1, 2, 4, 6]),
            "van 01:00 tot 02:59, van 04:00 tot 04:59 en van 06:00 tot 06:59",
        );
        assert_eq!(
            collapse_and_format([1, 2, 3, 5, 6, 7, 9, 11, 12, 13, 15, 17, 19, 21, 22, 23]),
            "van 01:00 tot 03:59, van 05:00 tot 07:59, van 09:00 tot 09:59, van 11:00 tot 13:59, van 15:00 tot 15:59, van 17:00 tot 17:59, van 19:00 tot 19:59 en van 21:00 tot 23:59",
        );
    }

    #[test]
    fn test_collapse_and_format_duplicates() {
        assert_eq!(collapse_and_format([2, 2, 3]), "van 02:00 tot 03:59");
    }
}
