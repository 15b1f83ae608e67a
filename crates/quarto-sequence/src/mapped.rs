//! Character-mapped sequence views
//!
//! A [`MappedSequence`] presents `mapper(base[i])` for every index of an
//! underlying view without copying anything. Re-mapping a mapped view
//! composes the mappers over the same underlying view, so wrapping depth
//! stays at one no matter how many transformations are chained.
//!
//! A character keeps its source offset only where the mapper left it
//! unchanged; everywhere else [`BasedSequence::index_offset`] reports `None`
//! and segment generation materializes the mapped text instead.

use std::sync::Arc;

use crate::buffer::SourceBuffer;
use crate::error::{Result, check_index, check_range};
use crate::mapper::CharMapper;
use crate::segment::{SegmentBuilder, generate_segments};
use crate::sequence::{BasedSequence, SequenceRef, SequenceSource};

/// A view applying a [`CharMapper`] over another view
#[derive(Debug, Clone)]
pub struct MappedSequence {
    base_seq: SequenceRef,
    mapper: CharMapper,
}

/// Wrap `base` so every character goes through `mapper`
///
/// # Example
///
/// ```
/// use quarto_sequence::{CharMapper, SubSequence, mapped_of};
///
/// let seq = mapped_of(SubSequence::of("aAbB"), CharMapper::to_lowercase());
/// assert_eq!(seq.to_text(), "aabb");
/// assert_eq!(seq.index_offset(0), Ok(Some(0)));
/// assert_eq!(seq.index_offset(1), Ok(None));
/// ```
pub fn mapped_of(base: SequenceRef, mapper: CharMapper) -> SequenceRef {
    Arc::new(MappedSequence::new(base, mapper))
}

impl MappedSequence {
    pub fn new(base_seq: SequenceRef, mapper: CharMapper) -> Self {
        MappedSequence { base_seq, mapper }
    }

    pub fn char_mapper(&self) -> &CharMapper {
        &self.mapper
    }

    /// The view the mapper is applied over
    pub fn base_seq(&self) -> &SequenceRef {
        &self.base_seq
    }

    /// Mapped text for the local range `[start, end)`
    fn materialize(&self, start: usize, end: usize) -> String {
        (start..end)
            .filter_map(|index| self.base_seq.get(index))
            .map(|c| self.mapper.map(c))
            .collect()
    }
}

impl BasedSequence for MappedSequence {
    fn len(&self) -> usize {
        self.base_seq.len()
    }

    fn get(&self, index: usize) -> Option<char> {
        self.base_seq.get(index).map(|c| self.mapper.map(c))
    }

    fn sub_sequence(self: Arc<Self>, start: usize, end: usize) -> Result<SequenceRef> {
        check_range(start, end, self.len())?;
        if start == 0 && end == self.len() {
            return Ok(self);
        }
        let base_seq = self.base_seq.clone().sub_sequence(start, end)?;
        Ok(Arc::new(MappedSequence::new(base_seq, self.mapper.clone())))
    }

    fn sequence_of(
        &self,
        candidate: SequenceSource<'_>,
        start: usize,
        end: usize,
    ) -> Result<SequenceRef> {
        if let SequenceSource::Sequence(seq) = candidate
            && seq.as_mapped().is_some()
        {
            if start == 0 && end == seq.len() {
                return Ok(seq.clone());
            }
            let sliced = seq.clone().sub_sequence(start, end)?;
            return Ok(sliced.to_mapped(self.mapper.clone()));
        }
        let base_seq = self.base_seq.sequence_of(candidate, start, end)?;
        Ok(Arc::new(MappedSequence::new(base_seq, self.mapper.clone())))
    }

    fn base(&self) -> &Arc<SourceBuffer> {
        self.base_seq.base()
    }

    fn base_sequence(&self) -> SequenceRef {
        self.base_seq.base_sequence()
    }

    fn start_offset(&self) -> usize {
        self.base_seq.start_offset()
    }

    fn end_offset(&self) -> usize {
        self.base_seq.end_offset()
    }

    fn index_offset(&self, index: usize) -> Result<Option<usize>> {
        if index == self.len() {
            return self.base_seq.index_offset(index);
        }
        check_index(index, self.len())?;
        let base_char = self.base_seq.char_at(index)?;
        if self.mapper.map(base_char) == base_char {
            self.base_seq.index_offset(index)
        } else {
            Ok(None)
        }
    }

    fn to_mapped(self: Arc<Self>, mapper: CharMapper) -> SequenceRef {
        if mapper.is_identity() {
            return self;
        }
        Arc::new(MappedSequence::new(
            self.base_seq.clone(),
            self.mapper.and_then(&mapper),
        ))
    }

    fn add_segments(&self, builder: &mut SegmentBuilder) -> Result<bool> {
        generate_segments(
            builder,
            self.base(),
            self.start_offset(),
            self.end_offset(),
            self.len(),
            |index| self.index_offset(index).ok().flatten(),
            |start, end| self.materialize(start, end),
        )
    }

    fn as_mapped(&self) -> Option<&MappedSequence> {
        Some(self)
    }
}
