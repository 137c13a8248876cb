//! Snapshot files: round trips through disk and corruption detection.

use super::common::{assert_corpus_well_formed, sample_corpus, words};
use tmatch::corpus::snapshot::{self, SnapshotFooter, SnapshotHeader};
use tmatch::{Corpus, Error, InvariantError, MatchConfig, Matcher};

/// Re-seal `bytes` with a fresh checksum after editing the body.
fn reseal(bytes: &mut [u8]) {
    let crc_at = bytes.len() - SnapshotFooter::SIZE;
    let crc = SnapshotFooter::compute_crc32(&bytes[..crc_at]);
    bytes[crc_at..crc_at + 4].copy_from_slice(&crc.to_le_bytes());
}

#[test]
fn save_and_load_preserve_query_results() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = sample_corpus();

    for compress in [true, false] {
        let path = dir.path().join(format!("sample-{}.tmix", compress));
        let written = corpus.save(&path, compress).unwrap();
        assert_eq!(written as u64, std::fs::metadata(&path).unwrap().len());

        let loaded = Corpus::load(&path).unwrap();
        assert_corpus_well_formed(&loaded);

        let before = Matcher::new(&corpus, MatchConfig::default()).unwrap();
        let after = Matcher::new(&loaded, MatchConfig::default()).unwrap();
        let query = words("the cat sat on a mat");
        let a = before.match_tokens(&query).unwrap();
        let b = after.match_tokens(&query).unwrap();
        assert_eq!(a.ranked(), b.ranked());
        assert_eq!(a.chunks(), b.chunks());
    }
}

#[test]
fn inspect_reports_header_without_decoding() {
    let corpus = sample_corpus();
    let bytes = snapshot::encode(&corpus, true).unwrap();
    let info = snapshot::inspect(&bytes).unwrap();

    assert!(info.crc_ok());
    assert!(info.header.flags.is_compressed());
    assert_eq!(info.header.segment_count as usize, corpus.segment_count());
    assert_eq!(info.header.token_count as usize, corpus.token_count());
    assert_eq!(info.file_size, bytes.len());
}

#[test]
fn compression_shrinks_repetitive_corpora() {
    let rows: Vec<String> = (0..200).map(|i| format!("the cat sat on mat number {}", i % 7)).collect();
    let targets: Vec<String> = rows.iter().map(|r| r.to_uppercase()).collect();
    let aligns: Vec<String> = rows.iter().map(|_| "0-0 1-1 2-2 3-3 4-4 5-5 6-6".to_string()).collect();
    let corpus = Corpus::from_parallel_text(&rows, &targets, &aligns).unwrap();

    let plain = snapshot::encode(&corpus, false).unwrap();
    let packed = snapshot::encode(&corpus, true).unwrap();
    assert!(packed.len() < plain.len());
}

#[test]
fn duplicated_suffix_entry_is_corruption() {
    let corpus = sample_corpus();
    let mut bytes = snapshot::encode(&corpus, false).unwrap();
    let header = SnapshotHeader::read(&bytes).unwrap();

    // Uncompressed body: every id in the sample fits in one varint byte
    let sa_start = SnapshotHeader::SIZE + header.vocab_len as usize + header.tokens_len as usize;
    let first_entry = sa_start + 1;
    bytes[first_entry + 1] = bytes[first_entry];
    reseal(&mut bytes);

    let err = snapshot::decode(&bytes).unwrap_err();
    assert!(
        matches!(err, Error::Corruption(InvariantError::SuffixNotPermutation { .. })),
        "got {:?}",
        err
    );
}

#[test]
fn edited_body_without_reseal_fails_checksum() {
    let mut bytes = snapshot::encode(&sample_corpus(), false).unwrap();
    let last_body_byte = bytes.len() - SnapshotFooter::SIZE - 1;
    bytes[last_body_byte] ^= 0x01;

    let info = snapshot::inspect(&bytes).unwrap();
    assert!(!info.crc_ok());
    assert!(matches!(snapshot::decode(&bytes), Err(Error::Snapshot(_))));
}

#[test]
fn load_missing_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.tmix");
    match Corpus::load(&path) {
        Err(Error::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("unexpected {:?}", other.map(|c| c.segment_count())),
    }
}
