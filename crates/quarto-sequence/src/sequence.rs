//! The based-sequence contract and the raw buffer view
//!
//! Every view implements [`BasedSequence`]: indexable characters, cheap
//! sub-views, and for each index the offset of the character in the ultimate
//! [`SourceBuffer`] it was derived from. Views are shared as [`SequenceRef`]
//! (`Arc<dyn BasedSequence>`), never copy the buffer, and are immutable, so
//! they can be read from any number of threads.

use std::fmt;
use std::sync::Arc;

use crate::buffer::SourceBuffer;
use crate::error::{Result, SequenceError, check_range};
use crate::mapped::MappedSequence;
use crate::mapper::CharMapper;
use crate::segment::SegmentBuilder;
use crate::types::Range;

/// A shared handle to any sequence view
pub type SequenceRef = Arc<dyn BasedSequence>;

/// Character source for [`BasedSequence::sequence_of`]
#[derive(Debug, Clone, Copy)]
pub enum SequenceSource<'a> {
    /// An existing view, re-sliced without copying
    Sequence(&'a SequenceRef),
    /// Plain text, which gets its own buffer
    Text(&'a str),
}

impl<'a> From<&'a SequenceRef> for SequenceSource<'a> {
    fn from(seq: &'a SequenceRef) -> Self {
        SequenceSource::Sequence(seq)
    }
}

impl<'a> From<&'a str> for SequenceSource<'a> {
    fn from(text: &'a str) -> Self {
        SequenceSource::Text(text)
    }
}

/// Contract shared by all sequence views
///
/// Indices are local to the view; offsets are absolute char offsets into
/// [`BasedSequence::base`].
pub trait BasedSequence: fmt::Debug + Send + Sync {
    /// Number of characters in the view
    fn len(&self) -> usize;

    /// Character at a local index, None when out of range
    fn get(&self, index: usize) -> Option<char>;

    /// View of the local range `[start, end)`
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::RangeOutOfBounds`] unless
    /// `start <= end <= len()`.
    fn sub_sequence(self: Arc<Self>, start: usize, end: usize) -> Result<SequenceRef>;

    /// Build a view of the same kind as `self` from another character source
    fn sequence_of(
        &self,
        candidate: SequenceSource<'_>,
        start: usize,
        end: usize,
    ) -> Result<SequenceRef>;

    /// The ultimate buffer this view is based on
    fn base(&self) -> &Arc<SourceBuffer>;

    /// A view over the whole ultimate buffer
    fn base_sequence(&self) -> SequenceRef;

    /// Absolute offset in the buffer where this view starts
    fn start_offset(&self) -> usize;

    /// Absolute offset in the buffer where this view ends
    fn end_offset(&self) -> usize;

    /// Buffer offset of the character at `index`
    ///
    /// `Ok(None)` means the character cannot be attributed to a single source
    /// position. `index == len()` is accepted and reports the end position.
    fn index_offset(&self, index: usize) -> Result<Option<usize>>;

    /// View with `mapper` applied to every character
    fn to_mapped(self: Arc<Self>, mapper: CharMapper) -> SequenceRef;

    /// Append this view's segments to `builder`
    ///
    /// Returns whether any segment was produced.
    fn add_segments(&self, builder: &mut SegmentBuilder) -> Result<bool>;

    /// Downcast to a mapped view
    fn as_mapped(&self) -> Option<&MappedSequence> {
        None
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at a local index
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfRange`] unless `index < len()`.
    fn char_at(&self, index: usize) -> Result<char> {
        self.get(index).ok_or(SequenceError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Absolute range of this view in the buffer
    fn source_range(&self) -> Range {
        Range::new(self.start_offset(), self.end_offset())
    }

    /// True when the character at `index` still maps to a source position
    fn is_base_char_at(&self, index: usize) -> bool {
        matches!(self.index_offset(index), Ok(Some(_)))
    }

    /// View over absolute buffer offsets `[start, end)`
    fn base_sub_sequence(&self, start: usize, end: usize) -> Result<SequenceRef> {
        self.base_sequence().sub_sequence(start, end)
    }

    /// Collect the (mapped) characters into a string
    fn to_text(&self) -> String {
        (0..self.len()).filter_map(|index| self.get(index)).collect()
    }

    fn to_lowercase(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::to_lowercase())
    }

    fn to_uppercase(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::to_uppercase())
    }

    /// Spaces become non-breaking spaces
    fn to_nbsp(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::to_nbsp())
    }

    /// Non-breaking spaces become spaces
    fn to_spc(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::from_nbsp())
    }

    fn to_null_encoded(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::encode_null())
    }

    fn to_null_decoded(self: Arc<Self>) -> SequenceRef {
        self.to_mapped(CharMapper::decode_null())
    }
}

impl dyn BasedSequence + '_ {
    /// Iterate the view's characters
    pub fn chars(&self) -> Chars<'_> {
        Chars {
            seq: self,
            index: 0,
        }
    }
}

impl fmt::Display for dyn BasedSequence + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.chars().try_for_each(|c| fmt::Write::write_char(f, c))
    }
}

/// Iterator over the characters of a view
pub struct Chars<'a> {
    seq: &'a dyn BasedSequence,
    index: usize,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.seq.get(self.index)?;
        self.index += 1;
        Some(c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.seq.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// A plain window `[start, end)` onto a [`SourceBuffer`]
///
/// The root view of a buffer is the window covering all of it.
#[derive(Debug, Clone)]
pub struct SubSequence {
    buffer: Arc<SourceBuffer>,
    start: usize,
    end: usize,
}

impl SubSequence {
    /// Root view over a fresh buffer holding `text`
    ///
    /// # Example
    ///
    /// ```
    /// use quarto_sequence::SubSequence;
    ///
    /// let seq = SubSequence::of("Hello");
    /// assert_eq!(seq.len(), 5);
    /// assert_eq!(seq.index_offset(1), Ok(Some(1)));
    /// ```
    pub fn of(text: impl Into<String>) -> SequenceRef {
        Arc::new(SubSequence::root(Arc::new(SourceBuffer::new(text))))
    }

    /// View covering the whole buffer
    pub fn root(buffer: Arc<SourceBuffer>) -> Self {
        let end = buffer.len();
        SubSequence {
            buffer,
            start: 0,
            end,
        }
    }

    /// View over absolute offsets `[start, end)` of `buffer`
    pub fn new(buffer: Arc<SourceBuffer>, start: usize, end: usize) -> Result<Self> {
        check_range(start, end, buffer.len())?;
        Ok(SubSequence { buffer, start, end })
    }
}

impl BasedSequence for SubSequence {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn get(&self, index: usize) -> Option<char> {
        if index < self.len() {
            self.buffer.char_at(self.start + index)
        } else {
            None
        }
    }

    fn sub_sequence(self: Arc<Self>, start: usize, end: usize) -> Result<SequenceRef> {
        check_range(start, end, self.len())?;
        if start == 0 && end == self.len() {
            return Ok(self);
        }
        Ok(Arc::new(SubSequence {
            buffer: self.buffer.clone(),
            start: self.start + start,
            end: self.start + end,
        }))
    }

    fn sequence_of(
        &self,
        candidate: SequenceSource<'_>,
        start: usize,
        end: usize,
    ) -> Result<SequenceRef> {
        match candidate {
            SequenceSource::Sequence(seq) => seq.clone().sub_sequence(start, end),
            SequenceSource::Text(text) => SubSequence::of(text).sub_sequence(start, end),
        }
    }

    fn base(&self) -> &Arc<SourceBuffer> {
        &self.buffer
    }

    fn base_sequence(&self) -> SequenceRef {
        Arc::new(SubSequence::root(self.buffer.clone()))
    }

    fn start_offset(&self) -> usize {
        self.start
    }

    fn end_offset(&self) -> usize {
        self.end
    }

    fn index_offset(&self, index: usize) -> Result<Option<usize>> {
        if index > self.len() {
            return Err(SequenceError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(Some(self.start + index))
    }

    fn to_mapped(self: Arc<Self>, mapper: CharMapper) -> SequenceRef {
        if mapper.is_identity() {
            return self;
        }
        Arc::new(MappedSequence::new(self, mapper))
    }

    fn add_segments(&self, builder: &mut SegmentBuilder) -> Result<bool> {
        builder.ensure_base(&self.buffer)?;
        if self.is_empty() {
            return Ok(false);
        }
        builder.append_range(Range::new(self.start, self.end))?;
        Ok(true)
    }
}
