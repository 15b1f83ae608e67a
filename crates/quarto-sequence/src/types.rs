//! Core position types

use serde::{Deserialize, Serialize};

/// A location in a source buffer (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Character offset from start of the buffer
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters)
    pub column: usize,
}

/// A half-open range `[start, end)` of character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Range {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty range at a position
    pub const fn empty_at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when `other` starts exactly where this range ends
    pub fn is_followed_by(&self, other: &Range) -> bool {
        self.end == other.start
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(range: std::ops::Range<usize>) -> Self {
        Range::new(range.start, range.end)
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(range: Range) -> Self {
        range.start..range.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let loc1 = Location {
            offset: 0,
            row: 0,
            column: 0,
        };
        let loc2 = Location {
            offset: 5,
            row: 0,
            column: 5,
        };
        let loc3 = Location {
            offset: 10,
            row: 1,
            column: 0,
        };

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
    }

    #[test]
    fn test_range_basics() {
        let range = Range::new(2, 5);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(2));
        assert!(!range.contains(5));

        let anchor = Range::empty_at(4);
        assert_eq!(anchor.len(), 0);
        assert!(anchor.is_empty());
    }

    #[test]
    fn test_range_adjacency() {
        assert!(Range::new(0, 3).is_followed_by(&Range::new(3, 4)));
        assert!(!Range::new(0, 3).is_followed_by(&Range::new(4, 5)));
    }

    #[test]
    fn test_range_conversions() {
        let range: Range = (1..4).into();
        assert_eq!(range, Range::new(1, 4));
        let std_range: std::ops::Range<usize> = range.into();
        assert_eq!(std_range, 1..4);
    }

    #[test]
    fn test_serialization_range() {
        let range = Range::new(3, 8);
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":3,"end":8}"#);
        let deserialized: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(range, deserialized);
    }
}
