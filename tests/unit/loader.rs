//! Building a corpus from parallel text and files.

use super::common::{assert_corpus_well_formed, parallel_corpus, sample_corpus, write_parallel_files, SAMPLE};
use tmatch::{Corpus, Error, InvariantError, SegmentId};

#[test]
fn sample_corpus_tables_line_up() {
    let corpus = sample_corpus();
    assert_corpus_well_formed(&corpus);
    assert_eq!(corpus.segment_count(), 4);
    assert_eq!(corpus.token_count(), 6 + 6 + 6 + 5);
    assert_eq!(corpus.suffix_array().len(), corpus.token_count());
    assert_eq!(corpus.positions().len(), corpus.token_count());
}

#[test]
fn vocabulary_is_sorted_and_ids_are_ranks() {
    let corpus = sample_corpus();
    let vocab: Vec<&str> = corpus.vocabulary().iter().collect();
    let mut sorted = vocab.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(vocab, sorted);
    for (rank, token) in vocab.iter().enumerate() {
        assert_eq!(corpus.vocabulary().id(token), Some(rank as u32));
    }
}

#[test]
fn sentences_and_targets_round_trip() {
    let corpus = sample_corpus();
    for (i, (source, target, _)) in SAMPLE.iter().enumerate() {
        let id = SegmentId(i as u32);
        assert_eq!(corpus.sentence(id).unwrap(), *source);
        assert_eq!(corpus.target(id).unwrap(), *target);
    }
}

#[test]
fn positions_point_back_into_their_segment() {
    let corpus = sample_corpus();
    for (offset, pos) in corpus.positions().iter().enumerate() {
        let entry = corpus.segment(pos.segment).unwrap();
        assert_eq!(entry.start + pos.offset as usize, offset);
        assert_eq!(entry.len, pos.segment_len as usize);
    }
}

#[test]
fn misaligned_line_counts_are_rejected() {
    let err = Corpus::from_parallel_text(&["a b"], &["A B", "C"], &["0-0"]).unwrap_err();
    assert!(matches!(
        err,
        Error::MisalignedCorpus {
            sources: 1,
            targets: 2,
            alignments: 1
        }
    ));
}

#[test]
fn malformed_pair_names_the_segment() {
    let err = Corpus::from_parallel_text(&["a b", "c d"], &["A B", "C D"], &["0-0", "0-0 1x1"])
        .unwrap_err();
    match err {
        Error::MalformedAlignment { segment, pair } => {
            assert_eq!(segment, 1);
            assert_eq!(pair, "1x1");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn out_of_range_pair_is_corruption() {
    let err = Corpus::from_parallel_text(&["a b"], &["A"], &["0-0 1-3"]).unwrap_err();
    assert!(matches!(
        err,
        Error::Corruption(InvariantError::AlignmentOutOfBounds { segment: 0, .. })
    ));
}

#[test]
fn empty_sentences_are_kept_as_segments() {
    let corpus = parallel_corpus(&[("a b c", "A B C", "0-0 1-1 2-2"), ("", "", "")]);
    assert_corpus_well_formed(&corpus);
    assert_eq!(corpus.segment_count(), 2);
    assert_eq!(corpus.sentence_ids(SegmentId(1)).unwrap(), &[] as &[u32]);
}

#[test]
fn unknown_segment_is_reported() {
    let corpus = sample_corpus();
    assert!(matches!(
        corpus.segment(SegmentId(99)),
        Err(InvariantError::UnknownSegment { segment: 99, .. })
    ));
}

#[test]
fn from_files_matches_in_memory_build() {
    let dir = tempfile::tempdir().unwrap();
    let (source, target, alignment) = write_parallel_files(dir.path(), SAMPLE);
    let from_files = Corpus::from_files(&source, &target, &alignment).unwrap();
    let in_memory = sample_corpus();

    assert_eq!(from_files.tokens(), in_memory.tokens());
    assert_eq!(from_files.suffix_array(), in_memory.suffix_array());
    assert_eq!(from_files.segments(), in_memory.segments());
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.src");
    let err = Corpus::from_files(&missing, &missing, &missing).unwrap_err();
    match err {
        Error::Read { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error {:?}", other),
    }
}
