//! Behavioral tests for mapped views through the public API

use std::sync::Arc;

use quarto_sequence::{
    BasedSequence, CharMapper, SegmentBuilder, SequenceRef, SourceBuffer, SubSequence, mapped_of,
};

fn mappers() -> Vec<CharMapper> {
    vec![
        CharMapper::IDENTITY,
        CharMapper::to_uppercase(),
        CharMapper::to_lowercase(),
        CharMapper::to_nbsp(),
        CharMapper::to_lowercase().and_then(&CharMapper::to_nbsp()),
    ]
}

fn bases() -> Vec<SequenceRef> {
    let root = SubSequence::of("The Quick\nbrown FOX ß");
    vec![
        root.clone(),
        root.clone().sub_sequence(4, 15).unwrap(),
        root.clone().sub_sequence(3, 3).unwrap(),
        mapped_of(root, CharMapper::from_nbsp()),
    ]
}

#[test]
fn length_is_preserved() {
    for base in bases() {
        for mapper in mappers() {
            let seq = mapped_of(base.clone(), mapper);
            assert_eq!(seq.len(), base.len());
        }
    }
}

#[test]
fn characters_are_mapped_pointwise() {
    for base in bases() {
        for mapper in mappers() {
            let seq = mapped_of(base.clone(), mapper.clone());
            for i in 0..base.len() {
                assert_eq!(seq.char_at(i).unwrap(), mapper.map(base.char_at(i).unwrap()));
            }
        }
    }
}

#[test]
fn to_mapped_composes_mappers() {
    let f = CharMapper::to_uppercase();
    let g = CharMapper::from_fn("o-to-0", |c| if c == 'O' { '0' } else { c });
    for base in bases() {
        let seq = mapped_of(base.clone(), f.clone()).to_mapped(g.clone());
        for i in 0..base.len() {
            let expected = g.map(f.map(base.char_at(i).unwrap()));
            assert_eq!(seq.char_at(i).unwrap(), expected);
        }
        assert!(Arc::ptr_eq(seq.base(), base.base()));
        assert!(Arc::ptr_eq(seq.as_mapped().unwrap().base_seq(), &base));
    }
}

#[test]
fn identity_remap_and_full_range_slice_return_same_instance() {
    let seq = mapped_of(SubSequence::of("Hello"), CharMapper::to_uppercase());
    assert!(Arc::ptr_eq(&seq.clone().to_mapped(CharMapper::IDENTITY), &seq));
    assert!(Arc::ptr_eq(&seq.clone().sub_sequence(0, seq.len()).unwrap(), &seq));
}

#[test]
fn identity_mapping_keeps_every_offset() {
    for base in bases() {
        let seq = mapped_of(base.clone(), CharMapper::IDENTITY);
        for i in 0..base.len() {
            assert_eq!(seq.index_offset(i), base.index_offset(i));
        }
    }
}

#[test]
fn only_altered_index_loses_its_offset() {
    let base = SubSequence::of("markdown");
    let k = 4;
    let seq = mapped_of(
        base.clone(),
        CharMapper::from_fn("upper-d", |c| if c == 'd' { 'D' } else { c }),
    );
    for i in 0..base.len() {
        if i == k {
            assert_eq!(seq.index_offset(i), Ok(None));
        } else {
            assert_eq!(seq.index_offset(i), base.index_offset(i));
        }
    }
}

#[test]
fn hello_world_uppercase() {
    let buffer = Arc::new(SourceBuffer::new("Hello World"));
    let seq = mapped_of(buffer.clone().into_sequence(), CharMapper::to_uppercase());
    assert_eq!(seq.len(), 11);
    assert_eq!(seq.char_at(0), Ok('H'));

    let mut builder = SegmentBuilder::new(buffer);
    assert!(seq.add_segments(&mut builder).unwrap());
    let list = builder.finish();
    assert_eq!(list.to_text(), "HELLO WORLD");
    // Chars the uppercasing left alone stay verbatim source ranges
    insta::assert_snapshot!(list.to_string(), @r#"[0, 1), "ELLO", [5, 7), "ORLD""#);
}

#[test]
fn hello_identity_is_one_base_run() {
    let buffer = Arc::new(SourceBuffer::new("Hello"));
    let seq = mapped_of(buffer.clone().into_sequence(), CharMapper::IDENTITY);

    let mut builder = SegmentBuilder::new(buffer);
    assert!(seq.add_segments(&mut builder).unwrap());
    let list = builder.finish();
    insta::assert_snapshot!(list.to_string(), @"[0, 5)");
    assert_eq!(list.stats().text_chars, 0);
}

#[test]
fn mixed_case_lowercase_alternates() {
    let buffer = Arc::new(SourceBuffer::new("aAbB"));
    let seq = mapped_of(buffer.clone().into_sequence(), CharMapper::to_lowercase());
    let offsets: Vec<_> = (0..4).map(|i| seq.index_offset(i).unwrap()).collect();
    assert_eq!(offsets, vec![Some(0), None, Some(2), None]);

    let mut builder = SegmentBuilder::new(buffer);
    seq.add_segments(&mut builder).unwrap();
    insta::assert_snapshot!(builder.finish().to_string(), @r#"[0, 1), "a", [2, 3), "b""#);
}

#[test]
fn out_of_range_arguments_fail() {
    let seq = mapped_of(SubSequence::of("abc"), CharMapper::to_uppercase());
    assert!(seq.char_at(3).is_err());
    assert!(seq.clone().sub_sequence(2, 1).is_err());
    assert!(seq.clone().sub_sequence(0, 4).is_err());
    assert!(seq.index_offset(4).is_err());
}

#[test]
fn convenience_mappers_on_views() {
    let seq = SubSequence::of("a b\u{00A0}c");
    assert_eq!(seq.clone().to_nbsp().to_text(), "a\u{00A0}b\u{00A0}c");
    assert_eq!(seq.clone().to_spc().to_text(), "a b c");
    assert_eq!(seq.clone().to_uppercase().to_lowercase().to_text(), "a b\u{00A0}c");

    let nul = SubSequence::of("x\0y");
    let encoded = nul.to_null_encoded();
    assert_eq!(encoded.to_text(), "x\u{FFFD}y");
    assert_eq!(encoded.to_null_decoded().to_text(), "x\0y");
}
