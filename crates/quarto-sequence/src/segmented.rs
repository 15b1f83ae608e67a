//! Concatenated views built from segment lists

use std::sync::Arc;

use crate::buffer::SourceBuffer;
use crate::error::{Result, SequenceError, check_range};
use crate::mapped::MappedSequence;
use crate::mapper::CharMapper;
use crate::segment::{Segment, SegmentBuilder, SegmentList, generate_segments};
use crate::sequence::{BasedSequence, SequenceRef, SequenceSource, SubSequence};

/// A view whose characters come from a mix of source ranges and literal text
///
/// Characters and their offsets are flattened once when the view is built;
/// sub-views share the flattened arrays.
#[derive(Debug, Clone)]
pub struct SegmentedSequence {
    base: Arc<SourceBuffer>,
    chars: Arc<[char]>,
    offsets: Arc<[Option<usize>]>,
    start: usize,
    end: usize,
    /// Offset reported when the window holds no source characters
    anchor: usize,
}

impl SegmentedSequence {
    pub fn from_list(list: &SegmentList) -> Self {
        let base = list.base().clone();
        let mut chars = Vec::new();
        let mut offsets = Vec::new();
        for segment in list {
            match segment {
                Segment::Base(range) => {
                    for offset in range.start..range.end {
                        if let Some(c) = base.char_at(offset) {
                            chars.push(c);
                            offsets.push(Some(offset));
                        }
                    }
                }
                Segment::Text(text) => {
                    chars.extend(text.chars());
                    offsets.extend(text.chars().map(|_| None));
                }
            }
        }

        let anchor = list.source_range().map_or(0, |range| range.start);
        let end = chars.len();
        SegmentedSequence {
            base,
            chars: chars.into(),
            offsets: offsets.into(),
            start: 0,
            end,
            anchor,
        }
    }

    fn window(&self) -> &[Option<usize>] {
        &self.offsets[self.start..self.end]
    }
}

/// Concatenate views over `base` into one view
///
/// A single view over `base` is returned unchanged.
///
/// # Errors
///
/// Returns [`SequenceError::BaseMismatch`] if any view is based on another
/// buffer.
pub fn concat(base: &Arc<SourceBuffer>, views: &[SequenceRef]) -> Result<SequenceRef> {
    if let [view] = views
        && Arc::ptr_eq(view.base(), base)
    {
        return Ok(view.clone());
    }

    let mut builder = SegmentBuilder::new(base.clone());
    for view in views {
        view.add_segments(&mut builder)?;
    }
    let list = builder.finish();
    tracing::debug!(
        views = views.len(),
        segments = list.len(),
        "built concatenated sequence"
    );
    Ok(list.into_sequence())
}

impl BasedSequence for SegmentedSequence {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn get(&self, index: usize) -> Option<char> {
        if index < self.len() {
            self.chars.get(self.start + index).copied()
        } else {
            None
        }
    }

    fn sub_sequence(self: Arc<Self>, start: usize, end: usize) -> Result<SequenceRef> {
        check_range(start, end, self.len())?;
        if start == 0 && end == self.len() {
            return Ok(self);
        }
        let anchor = self.window()[..start]
            .iter()
            .rev()
            .find_map(|offset| offset.map(|o| o + 1))
            .unwrap_or(self.anchor);
        Ok(Arc::new(SegmentedSequence {
            base: self.base.clone(),
            chars: self.chars.clone(),
            offsets: self.offsets.clone(),
            start: self.start + start,
            end: self.start + end,
            anchor,
        }))
    }

    fn sequence_of(
        &self,
        candidate: SequenceSource<'_>,
        start: usize,
        end: usize,
    ) -> Result<SequenceRef> {
        self.base_sequence().sequence_of(candidate, start, end)
    }

    fn base(&self) -> &Arc<SourceBuffer> {
        &self.base
    }

    fn base_sequence(&self) -> SequenceRef {
        Arc::new(SubSequence::root(self.base.clone()))
    }

    fn start_offset(&self) -> usize {
        self.window().iter().find_map(|offset| *offset).unwrap_or(self.anchor)
    }

    fn end_offset(&self) -> usize {
        self.window()
            .iter()
            .rev()
            .find_map(|offset| offset.map(|o| o + 1))
            .unwrap_or_else(|| self.start_offset())
    }

    fn index_offset(&self, index: usize) -> Result<Option<usize>> {
        if index == self.len() {
            return Ok(Some(self.end_offset()));
        }
        self.window()
            .get(index)
            .copied()
            .ok_or(SequenceError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    fn to_mapped(self: Arc<Self>, mapper: CharMapper) -> SequenceRef {
        if mapper.is_identity() {
            return self;
        }
        Arc::new(MappedSequence::new(self, mapper))
    }

    fn add_segments(&self, builder: &mut SegmentBuilder) -> Result<bool> {
        let offsets = self.window();
        let chars = &self.chars[self.start..self.end];
        generate_segments(
            builder,
            &self.base,
            self.start_offset(),
            self.end_offset(),
            self.len(),
            |index| offsets[index],
            |start, end| chars[start..end].iter().collect(),
        )
    }
}
