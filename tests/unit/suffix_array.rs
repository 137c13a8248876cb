//! Suffix array ordering and n-gram range lookup.

use super::common::{corpus_from, sample_corpus};
use tmatch::{Corpus, NgramCursor};

fn ids(corpus: &Corpus, text: &str) -> Vec<u32> {
    text.split_whitespace()
        .map(|t| corpus.vocabulary().id(t).expect("token in corpus"))
        .collect()
}

/// Every occurrence of `text`, as (segment, offset) pairs, sorted.
fn lookup(corpus: &Corpus, text: &str) -> Vec<(u32, u32)> {
    let ngram = ids(corpus, text);
    let mut cursor = NgramCursor::new(corpus);
    for n in 1..=ngram.len() {
        if !cursor.narrow(corpus, &ngram[..n]) {
            return Vec::new();
        }
    }
    let mut hits: Vec<(u32, u32)> = corpus
        .occurrences(cursor.range())
        .unwrap()
        .into_iter()
        .map(|p| (p.segment.get(), p.offset))
        .collect();
    hits.sort_unstable();
    hits
}

#[test]
fn suffix_array_is_a_permutation() {
    let corpus = sample_corpus();
    let mut sorted = corpus.suffix_array().to_vec();
    sorted.sort_unstable();
    let expected: Vec<u32> = (0..corpus.token_count() as u32).collect();
    assert_eq!(sorted, expected);
}

#[test]
fn lookup_finds_every_occurrence() {
    let corpus = sample_corpus();
    assert_eq!(lookup(&corpus, "sat on the mat"), vec![(0, 2), (1, 2)]);
    assert_eq!(lookup(&corpus, "the"), vec![(0, 0), (0, 4), (1, 0), (1, 4), (2, 4), (3, 0), (3, 3)]);
    assert_eq!(lookup(&corpus, "the cat"), vec![(0, 0), (3, 0)]);
}

#[test]
fn lookup_never_crosses_sentences() {
    // flattened: "a b c d e f" -- "c d" spans the boundary
    let corpus = corpus_from(&["a b c", "d e f"]);
    assert!(lookup(&corpus, "c d").is_empty());
    assert_eq!(lookup(&corpus, "b c"), vec![(0, 1)]);
}

#[test]
fn failed_narrow_leaves_cursor_alone() {
    let corpus = sample_corpus();
    let the_cat = ids(&corpus, "the cat");
    let mut cursor = NgramCursor::new(&corpus);
    assert!(cursor.narrow(&corpus, &the_cat));
    let range = cursor.range();

    let mut the_cat_mat = the_cat.clone();
    the_cat_mat.extend(ids(&corpus, "mat"));
    assert!(!cursor.narrow(&corpus, &the_cat_mat));
    assert_eq!(cursor.range(), range);
    assert_eq!(cursor.len(), 2);
}

#[test]
fn identical_sentences_sort_by_offset() {
    let corpus = corpus_from(&["x y z", "x y z"]);
    let hits = lookup(&corpus, "x y z");
    assert_eq!(hits, vec![(0, 0), (1, 0)]);

    let mut cursor = NgramCursor::new(&corpus);
    assert!(cursor.narrow(&corpus, &ids(&corpus, "x y z")));
    let offsets = &corpus.suffix_array()[cursor.range()];
    assert_eq!(offsets, &[0, 3]);
}
