//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixtures so every test talks about the same corpus.

#![doc(hidden)]

use crate::corpus::Corpus;
use crate::types::{Chunk, Match, SegmentId, Span};

/// Parallel sentences of the canonical fixture: (source, target, alignment).
pub const SAMPLE: &[(&str, &str, &str)] = &[
    (
        "the cat sat on the mat",
        "le chat était assis sur le tapis",
        "0-0 1-1 2-2 2-3 3-4 4-5 5-6",
    ),
    (
        "the dog sat on the mat",
        "le chien était assis sur le tapis",
        "0-0 1-1 2-2 2-3 3-4 4-5 5-6",
    ),
    (
        "a bird flew over the house",
        "un oiseau a survolé la maison",
        "0-0 1-1 2-2 2-3 3-3 4-4 5-5",
    ),
    (
        "the cat ate the fish",
        "le chat a mangé le poisson",
        "0-0 1-1 2-2 2-3 3-4 4-5",
    ),
];

/// Build a corpus from `(source, target, alignment)` triples.
pub fn parallel_corpus(rows: &[(&str, &str, &str)]) -> Corpus {
    let sources: Vec<&str> = rows.iter().map(|r| r.0).collect();
    let targets: Vec<&str> = rows.iter().map(|r| r.1).collect();
    let alignments: Vec<&str> = rows.iter().map(|r| r.2).collect();
    Corpus::from_parallel_text(&sources, &targets, &alignments)
        .unwrap_or_else(|e| panic!("fixture corpus failed to build: {e}"))
}

/// The canonical four-sentence English/French fixture.
pub fn sample_corpus() -> Corpus {
    parallel_corpus(SAMPLE)
}

/// Monotone one-to-one alignment line for a sentence of `len` tokens.
pub fn identity_alignment(len: usize) -> String {
    (0..len)
        .map(|i| format!("{i}-{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Corpus whose targets are the uppercased sources, aligned one-to-one.
pub fn corpus_from(sources: &[&str]) -> Corpus {
    let targets: Vec<String> = sources.iter().map(|s| s.to_uppercase()).collect();
    let alignments: Vec<String> = sources
        .iter()
        .map(|s| identity_alignment(s.split_whitespace().count()))
        .collect();
    let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
    Corpus::from_parallel_text(&sources, &targets, &alignments)
        .unwrap_or_else(|e| panic!("fixture corpus failed to build: {e}"))
}

/// Split on whitespace into owned tokens.
pub fn words(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_string).collect()
}

/// An un-anchored match in segment 0.
pub fn make_match(segment_len: usize, query: (usize, usize), corpus: (usize, usize)) -> Match {
    Match::new(
        SegmentId(0),
        segment_len,
        Span::new(query.0, query.1),
        Span::new(corpus.0, corpus.1),
    )
}

/// A chunk in segment 0 from `(start, end)` pairs.
pub fn make_chunk(query: (usize, usize), corpus: (usize, usize), target: (usize, usize)) -> Chunk {
    Chunk {
        segment: SegmentId(0),
        query: Span::new(query.0, query.1),
        corpus: Span::new(corpus.0, corpus.1),
        target: Span::new(target.0, target.1),
        fms: 1.0,
    }
}
