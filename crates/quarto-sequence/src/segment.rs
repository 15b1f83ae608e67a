//! Segment generation for partially-traceable sequences
//!
//! A view is serialized as an ordered list of [`Segment`]s: runs whose
//! characters still map one-to-one onto contiguous source offsets become
//! zero-copy [`Segment::Base`] ranges, everything else is materialized as
//! [`Segment::Text`]. Concatenating the segments reproduces the view's text.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::buffer::SourceBuffer;
use crate::error::{Result, SequenceError, check_range};
use crate::segmented::SegmentedSequence;
use crate::sequence::SequenceRef;
use crate::types::Range;

/// One piece of a serialized sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    /// Verbatim source range of the builder's buffer
    Base(Range),
    /// Literal text that no longer matches the source
    Text(String),
}

impl Segment {
    /// Length in characters
    pub fn len(&self) -> usize {
        match self {
            Segment::Base(range) => range.len(),
            Segment::Text(text) => text.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Segment::Base(range) => range.is_empty(),
            Segment::Text(text) => text.is_empty(),
        }
    }

    /// An empty base range that only records a position
    pub fn is_anchor(&self) -> bool {
        matches!(self, Segment::Base(range) if range.is_empty())
    }
}

/// Options controlling how segments are accumulated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SegmentOptions {
    /// Record an empty base range where a literal run replaces source text
    pub include_anchors: bool,
    /// Merge adjacent base ranges and consecutive literal runs
    pub coalesce: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions {
            include_anchors: false,
            coalesce: true,
        }
    }
}

/// Counters describing an accumulated segment list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Number of segments, anchors included
    pub segments: usize,
    /// Characters covered by base ranges
    pub base_chars: usize,
    /// Characters in literal text
    pub text_chars: usize,
}

/// Accumulates segments for views over one source buffer
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    base: Arc<SourceBuffer>,
    options: SegmentOptions,
    segments: Vec<Segment>,
    stats: SegmentStats,
}

impl SegmentBuilder {
    pub fn new(base: Arc<SourceBuffer>) -> Self {
        Self::with_options(base, SegmentOptions::default())
    }

    pub fn with_options(base: Arc<SourceBuffer>, options: SegmentOptions) -> Self {
        SegmentBuilder {
            base,
            options,
            segments: Vec::new(),
            stats: SegmentStats::default(),
        }
    }

    pub fn base(&self) -> &Arc<SourceBuffer> {
        &self.base
    }

    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn stats(&self) -> SegmentStats {
        SegmentStats {
            segments: self.segments.len(),
            ..self.stats
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Fails with [`SequenceError::BaseMismatch`] unless `source` is this
    /// builder's buffer
    pub fn ensure_base(&self, source: &Arc<SourceBuffer>) -> Result<()> {
        if Arc::ptr_eq(&self.base, source) {
            Ok(())
        } else {
            Err(SequenceError::BaseMismatch)
        }
    }

    /// Append a source range
    ///
    /// Empty ranges are anchors and are only kept with `include_anchors`.
    pub fn append_range(&mut self, range: Range) -> Result<()> {
        check_range(range.start, range.end, self.base.len())?;
        if range.is_empty() && !self.options.include_anchors {
            return Ok(());
        }

        self.stats.base_chars += range.len();
        if self.options.coalesce
            && let Some(Segment::Base(last)) = self.segments.last_mut()
            && last.is_followed_by(&range)
        {
            last.end = range.end;
            return Ok(());
        }
        self.segments.push(Segment::Base(range));
        Ok(())
    }

    /// Record the source position of a replaced run
    pub fn append_anchor(&mut self, offset: usize) -> Result<()> {
        if !self.options.include_anchors {
            return Ok(());
        }
        self.append_range(Range::empty_at(offset))
    }

    /// Append literal text
    pub fn append_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }

        self.stats.text_chars += text.chars().count();
        if self.options.coalesce
            && let Some(Segment::Text(last)) = self.segments.last_mut()
        {
            last.push_str(&text);
            return;
        }
        self.segments.push(Segment::Text(text));
    }

    /// Append every segment of `view`
    pub fn append_sequence(&mut self, view: &SequenceRef) -> Result<bool> {
        view.add_segments(self)
    }

    pub fn finish(self) -> SegmentList {
        let stats = self.stats();
        SegmentList {
            base: self.base,
            segments: self.segments,
            stats,
        }
    }
}

/// Ordered segments over one source buffer
#[derive(Debug, Clone)]
pub struct SegmentList {
    base: Arc<SourceBuffer>,
    segments: Vec<Segment>,
    stats: SegmentStats,
}

impl SegmentList {
    pub fn base(&self) -> &Arc<SourceBuffer> {
        &self.base
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn stats(&self) -> SegmentStats {
        self.stats
    }

    /// Range from the first base segment's start to the last one's end
    pub fn source_range(&self) -> Option<Range> {
        let mut ranges = self.segments.iter().filter_map(|segment| match segment {
            Segment::Base(range) => Some(*range),
            Segment::Text(_) => None,
        });
        let first = ranges.next()?;
        let last = ranges.last().unwrap_or(first);
        Some(Range::new(first.start, last.end))
    }

    /// Reconstruct the text by dereferencing base ranges
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.stats.base_chars + self.stats.text_chars);
        for segment in &self.segments {
            match segment {
                Segment::Base(range) => text.push_str(self.base.slice(*range).unwrap_or_default()),
                Segment::Text(literal) => text.push_str(literal),
            }
        }
        text
    }

    /// A concatenated view over these segments
    pub fn into_sequence(self) -> SequenceRef {
        Arc::new(SegmentedSequence::from_list(&self))
    }
}

impl<'a> IntoIterator for &'a SegmentList {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Renders the structure: `[0, 5)` for base ranges, quoted literals
impl fmt::Display for SegmentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match segment {
                Segment::Base(range) => write!(f, "[{}, {})", range.start, range.end)?,
                Segment::Text(text) => write!(f, "{:?}", text)?,
            }
        }
        Ok(())
    }
}

enum Run {
    Base { start: usize, last: usize },
    Text { start_index: usize },
}

/// Partition a view into base and literal segments
///
/// Scans local indices `0..len`. A base run continues while `offset_of`
/// yields the previous offset plus one; indices without an offset form
/// literal runs whose text comes from `materialize(run_start, run_end)`.
/// `start_offset` positions a leading anchor.
///
/// Returns whether any segment was produced.
pub fn generate_segments(
    builder: &mut SegmentBuilder,
    source: &Arc<SourceBuffer>,
    start_offset: usize,
    end_offset: usize,
    len: usize,
    offset_of: impl Fn(usize) -> Option<usize>,
    materialize: impl Fn(usize, usize) -> String,
) -> Result<bool> {
    builder.ensure_base(source)?;
    if len == 0 {
        return Ok(false);
    }

    let mut next_offset = start_offset;
    let mut flush = |builder: &mut SegmentBuilder, run: Run, end_index: usize| -> Result<()> {
        match run {
            Run::Base { start, last } => {
                tracing::trace!(start, end = last + 1, "flush base run");
                next_offset = last + 1;
                builder.append_range(Range::new(start, last + 1))
            }
            Run::Text { start_index } => {
                tracing::trace!(start_index, end_index, "flush text run");
                builder.append_anchor(next_offset)?;
                builder.append_text(materialize(start_index, end_index));
                Ok(())
            }
        }
    };

    let mut current: Option<Run> = None;
    for index in 0..len {
        let offset = offset_of(index);
        current = Some(match (current.take(), offset) {
            (Some(Run::Base { start, last }), Some(offset)) if offset == last + 1 => Run::Base {
                start,
                last: offset,
            },
            (Some(run @ Run::Text { .. }), None) => run,
            (previous, offset) => {
                if let Some(previous) = previous {
                    flush(builder, previous, index)?;
                }
                match offset {
                    Some(offset) => Run::Base {
                        start: offset,
                        last: offset,
                    },
                    None => Run::Text { start_index: index },
                }
            }
        });
    }
    if let Some(run) = current {
        flush(builder, run, len)?;
    }

    tracing::trace!(start_offset, end_offset, len, "generated segments");
    Ok(true)
}
