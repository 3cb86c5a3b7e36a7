//! Boundary tests: EOF and chunk splitting
//!
//! Tests that the parser handles:
//! 1. EOF at every position in the input
//! 2. Input split across multiple chunks at arbitrary points
//!
//! These tests catch issues like:
//! - Premature emission (e.g. a text run committed before the next `<` arrives)
//! - Names split across chunks (`<ke` + `y>`)
//! - Delimiters split across chunks (`--` + `>`, `?` + `>`)

mod common;

use common::{events_in_chunks, Gen};
use flexml_core::{parse, scan_all};
use pretty_assertions::assert_eq;

const INPUTS: &[&str] = &[
    "<key>Hello",
    "<outer><inner>Content</outer>",
    r#"<e a b=c d="e f" g='h i'>body</e>"#,
    "Hello <name>X</name> tail",
    "<!-- a -- comment --><?pi  some data ?><x/>",
    "<!DOCTYPE html><p>x</p>",
    "<a>\n  <b k='v'/>\n</a>\n",
    "<café>é</café><日本/>",
    "<3 <a></ >< b>x</b>",
    "<a x='unterminated",
    "<!-- never closed",
    "<",
];

// =============================================================================
// EOF Boundary Tests
// =============================================================================

/// Truncating at any byte still yields a non-empty document.
#[test]
fn every_prefix_yields_structure() {
    for input in INPUTS {
        for end in 1..=input.len() {
            let prefix = &input.as_bytes()[..end];
            let (doc, _) = parse(prefix);
            assert!(
                !doc.is_empty(),
                "prefix {:?} produced an empty document",
                String::from_utf8_lossy(prefix)
            );
        }
    }
}

#[test]
fn key_prefix_keeps_element() {
    let (doc, error) = parse("<key>Hel");
    assert!(error.is_none());
    assert_eq!(doc.find_one("key").unwrap().text(), "Hel");
}

// =============================================================================
// Chunk Boundary Tests
// =============================================================================

#[test]
fn every_single_split_matches_one_shot() {
    for input in INPUTS {
        let bytes = input.as_bytes();
        let expected = scan_all(bytes);
        for cut in 0..=bytes.len() {
            let actual = events_in_chunks(bytes, &[cut]);
            assert_eq!(actual, expected, "input {input:?} split at {cut}");
        }
    }
}

#[test]
fn byte_at_a_time_matches_one_shot() {
    for input in INPUTS {
        let bytes = input.as_bytes();
        let cuts: Vec<usize> = (1..bytes.len()).collect();
        assert_eq!(events_in_chunks(bytes, &cuts), scan_all(bytes), "input {input:?}");
    }
}

#[test]
fn random_splits_match_one_shot() {
    let mut gen = Gen::from_env_or_random();
    for _ in 0..300 {
        let input = gen.fragment();
        let bytes = input.as_bytes();
        let cuts = gen.cuts(bytes.len());
        assert_eq!(
            events_in_chunks(bytes, &cuts),
            scan_all(bytes),
            "seed {} (set FLEXML_TEST_SEED={} to reproduce), cuts {cuts:?}, input {input:?}",
            gen.seed,
            gen.seed
        );
    }
}

#[test]
fn empty_chunks_are_harmless() {
    let bytes = INPUTS[2].as_bytes();
    let cuts = [0, 0, 3, 3, 3, bytes.len()];
    assert_eq!(events_in_chunks(bytes, &cuts), scan_all(bytes));
}
