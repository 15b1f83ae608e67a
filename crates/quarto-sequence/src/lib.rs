//! Provenance-preserving character sequences for Quarto
//!
//! This crate provides non-copying views over a source buffer that can be
//! sliced, concatenated and character-mapped while every character keeps
//! track of the source offset it came from. Characters a mapping actually
//! changed lose that attribution; unchanged runs stay traceable and can be
//! re-emitted as verbatim source ranges.
//!
//! # Overview
//!
//! The core types are:
//! - [`BasedSequence`]: The contract every view implements
//! - [`SubSequence`]: A plain window onto a [`SourceBuffer`]
//! - [`MappedSequence`]: A view applying a [`CharMapper`] lazily
//! - [`SegmentedSequence`]: A view concatenated from [`Segment`]s
//! - [`SegmentBuilder`]: Serializes views into base ranges and literal text
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use quarto_sequence::*;
//!
//! let buffer = Arc::new(SourceBuffer::new("aAbB"));
//! let seq = mapped_of(buffer.clone().into_sequence(), CharMapper::to_lowercase());
//! assert_eq!(seq.to_text(), "aabb");
//!
//! let mut builder = SegmentBuilder::new(buffer);
//! seq.add_segments(&mut builder).unwrap();
//! let segments = builder.finish();
//! assert_eq!(segments.to_string(), r#"[0, 1), "a", [2, 3), "b""#);
//! assert_eq!(segments.to_text(), "aabb");
//! ```

pub mod buffer;
pub mod error;
pub mod mapped;
pub mod mapper;
pub mod segment;
pub mod segmented;
pub mod sequence;
pub mod types;

// Re-export main types
pub use buffer::SourceBuffer;
pub use error::{Result, SequenceError};
pub use mapped::{MappedSequence, mapped_of};
pub use mapper::CharMapper;
pub use segment::{
    Segment, SegmentBuilder, SegmentList, SegmentOptions, SegmentStats, generate_segments,
};
pub use segmented::{SegmentedSequence, concat};
pub use sequence::{BasedSequence, Chars, SequenceRef, SequenceSource, SubSequence};
pub use types::{Location, Range};
