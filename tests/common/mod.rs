//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tmatch::{Corpus, MatchOutcome, Span, WellFormedCorpus};

// Re-export canonical fixtures from tmatch::testing
pub use tmatch::testing::{corpus_from, identity_alignment, parallel_corpus, sample_corpus, words, SAMPLE};

/// Write the three parallel files for `rows` into `dir` and return their paths
/// as (source, target, alignment).
pub fn write_parallel_files(dir: &Path, rows: &[(&str, &str, &str)]) -> (PathBuf, PathBuf, PathBuf) {
    let mut sources = String::new();
    let mut targets = String::new();
    let mut alignments = String::new();
    for (s, t, a) in rows {
        sources.push_str(s);
        sources.push('\n');
        targets.push_str(t);
        targets.push('\n');
        alignments.push_str(a);
        alignments.push('\n');
    }
    let source = dir.join("corpus.src");
    let target = dir.join("corpus.tgt");
    let alignment = dir.join("corpus.align");
    fs::write(&source, sources).expect("write source");
    fs::write(&target, targets).expect("write target");
    fs::write(&alignment, alignments).expect("write alignment");
    (source, target, alignment)
}

/// Assert the corpus passes every structural check.
pub fn assert_corpus_well_formed(corpus: &Corpus) {
    if let Err(e) = WellFormedCorpus::new(corpus) {
        panic!("corpus not well-formed: {}", e);
    }
}

/// Target words a chunk covers, joined by spaces.
pub fn chunk_target_text(corpus: &Corpus, outcome: &MatchOutcome, index: usize) -> String {
    let chunk = &outcome.chunks()[index];
    let target = corpus.target(chunk.segment).expect("chunk segment exists");
    let words: Vec<&str> = target.split_whitespace().collect();
    words[chunk.target.start..chunk.target.end].join(" ")
}

/// (query span, target span) of every chunk, in output order.
pub fn chunk_spans(outcome: &MatchOutcome) -> Vec<(Span, Span)> {
    outcome.chunks().iter().map(|c| (c.query, c.target)).collect()
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// A sentence of 1 to 9 words over `a`..`e`.
pub fn sentence_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e"]), 1..10)
        .prop_map(|w| w.join(" "))
}

/// Between 1 and 7 sentences.
pub fn corpus_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(sentence_strategy(), 1..8)
}

/// Corpus over `sources` with uppercased targets aligned one-to-one.
pub fn build_corpus(sources: &[String]) -> Corpus {
    let refs: Vec<&str> = sources.iter().map(String::as_str).collect();
    corpus_from(&refs)
}
