//! The owned source buffer every sequence view is ultimately based on

use std::fmt;
use std::sync::Arc;

use crate::sequence::{SequenceRef, SubSequence};
use crate::types::{Location, Range};

/// Owned source text with indexes for character access and location lookups
///
/// Offsets handed out by sequence views are character offsets into this
/// buffer. [`SourceBuffer::byte_range`] converts them back to the exact byte
/// range of the original text.
pub struct SourceBuffer {
    text: String,
    chars: Vec<char>,
    /// Byte offset of each char, plus one trailing entry for the text length
    byte_offsets: Vec<usize>,
    /// Char offsets of each newline character
    line_breaks: Vec<usize>,
}

impl SourceBuffer {
    /// Create a buffer by analyzing the text once
    ///
    /// # Example
    ///
    /// ```
    /// use quarto_sequence::SourceBuffer;
    ///
    /// let buffer = SourceBuffer::new("héllo\nworld");
    /// assert_eq!(buffer.len(), 11);
    /// assert_eq!(buffer.line_count(), 2);
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut chars = Vec::with_capacity(text.len());
        let mut byte_offsets = Vec::with_capacity(text.len() + 1);
        let mut line_breaks = Vec::new();

        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                line_breaks.push(chars.len());
            }
            chars.push(ch);
            byte_offsets.push(idx);
        }
        byte_offsets.push(text.len());

        SourceBuffer {
            text,
            chars,
            byte_offsets,
            line_breaks,
        }
    }

    /// The full source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at a char offset
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Convert a char range to the byte range it occupies in [`Self::text`]
    ///
    /// Returns None if the range is inverted or out of bounds.
    pub fn byte_range(&self, range: Range) -> Option<std::ops::Range<usize>> {
        if range.start > range.end {
            return None;
        }
        let start = *self.byte_offsets.get(range.start)?;
        let end = *self.byte_offsets.get(range.end)?;
        Some(start..end)
    }

    /// The source text covered by a char range
    pub fn slice(&self, range: Range) -> Option<&str> {
        self.byte_range(range).map(|bytes| &self.text[bytes])
    }

    /// Convert a char offset to a Location with row and column
    ///
    /// Uses binary search over the line breaks. A newline belongs to the line
    /// it terminates. Returns None if the offset is past the end.
    pub fn offset_to_location(&self, offset: usize) -> Option<Location> {
        if offset > self.len() {
            return None;
        }

        let row = match self.line_breaks.binary_search(&offset) {
            Ok(idx) | Err(idx) => idx,
        };
        let line_start = match row {
            0 => 0,
            _ => self.line_breaks[row - 1] + 1,
        };

        Some(Location {
            offset,
            row,
            column: offset - line_start,
        })
    }

    /// Number of lines (a trailing newline starts an empty last line)
    pub fn line_count(&self) -> usize {
        self.line_breaks.len() + 1
    }

    /// The root view covering the whole buffer
    pub fn into_sequence(self: Arc<Self>) -> SequenceRef {
        Arc::new(SubSequence::root(self))
    }
}

impl fmt::Debug for SourceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBuffer")
            .field("len", &self.len())
            .field("lines", &self.line_count())
            .finish()
    }
}
