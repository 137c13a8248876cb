// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query entry points.
//!
//! A `Matcher` borrows an immutable corpus and a validated config. It holds
//! no per-query state, so one matcher can serve any number of threads.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::align::extract_chunks;
use crate::config::MatchConfig;
use crate::corpus::Corpus;
use crate::error::Error;
use crate::matching::{build_candidates, find_matches, Query};
use crate::scoring::rank_candidates;
use crate::types::{Candidate, MatchOutcome, RankedSegment};
use crate::util::tokenize;

/// Everything retrieval decided for one query, before chunk extraction.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Ranked candidates, best first, at most `max_candidates`.
    pub ranked: Vec<Candidate>,
    /// Segments with at least one corpus-wide n-gram match.
    pub matched_segments: usize,
    /// Ceiling before the first segment and after each evaluated one.
    pub ceilings: Vec<usize>,
    /// Segments pruned by the length tests.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    corpus: &'a Corpus,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    /// Fails with `Error::Config` if `config` does not validate.
    pub fn new(corpus: &'a Corpus, config: MatchConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { corpus, config })
    }

    pub fn corpus(&self) -> &'a Corpus {
        self.corpus
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find, cost and rank candidate segments for a tokenized query.
    pub fn retrieve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Retrieval, Error> {
        let query = Query::encode(self.corpus, tokens);
        let initial_ceiling = self.config.initial_ceiling(query.len());

        let found = find_matches(self.corpus, &query, self.config.min_ngram)?;
        let matched_segments = found.len();

        let search = build_candidates(self.corpus, &query, found, &self.config, initial_ceiling)?;
        let ranked = rank_candidates(
            self.corpus,
            query.ids(),
            search.candidates,
            self.config.max_candidates,
        )?;

        debug!(
            query_len = query.len(),
            initial_ceiling,
            matched_segments,
            skipped = search.skipped,
            final_ceiling = search.ceiling,
            results = ranked.len(),
            "retrieval finished"
        );

        Ok(Retrieval {
            ranked,
            matched_segments,
            ceilings: search.ceilings,
            skipped: search.skipped,
        })
    }

    /// Full pipeline for a tokenized query.
    pub fn match_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Result<MatchOutcome, Error> {
        let retrieval = self.retrieve(tokens)?;

        let Some(best) = retrieval.ranked.first() else {
            return Ok(MatchOutcome::NoMatch);
        };
        if best.fms.is_some_and(|fms| fms >= 1.0) {
            let target = self.corpus.target(best.segment)?.to_string();
            debug!(segment = %best.segment, "exact match");
            return Ok(MatchOutcome::ExactMatch {
                segment: best.segment,
                target,
            });
        }

        let mut ranked = Vec::with_capacity(retrieval.ranked.len());
        let mut chunks = Vec::new();
        for candidate in &retrieval.ranked {
            chunks.extend(extract_chunks(self.corpus, candidate)?);
            ranked.push(RankedSegment {
                segment: candidate.segment,
                cost: candidate.cost.unwrap_or_default(),
                fms: candidate.fms.unwrap_or_default(),
            });
        }
        debug!(candidates = ranked.len(), chunks = chunks.len(), "chunks extracted");

        Ok(MatchOutcome::Candidates { ranked, chunks })
    }

    /// Tokenize a raw sentence and match it.
    pub fn match_sentence(&self, sentence: &str) -> Result<MatchOutcome, Error> {
        self.match_tokens(&tokenize(sentence))
    }

    /// Match many sentences. Results come back in input order.
    pub fn match_batch<S: AsRef<str> + Sync>(&self, sentences: &[S]) -> Vec<Result<MatchOutcome, Error>> {
        self.match_batch_with(sentences, || {})
    }

    /// Like `match_batch`, calling `tick` once per finished sentence (from
    /// worker threads under the `parallel` feature).
    pub fn match_batch_with<S, F>(&self, sentences: &[S], tick: F) -> Vec<Result<MatchOutcome, Error>>
    where
        S: AsRef<str> + Sync,
        F: Fn() + Sync,
    {
        let run = |s: &S| {
            let outcome = self.match_sentence(s.as_ref());
            tick();
            outcome
        };

        #[cfg(feature = "parallel")]
        {
            sentences.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            sentences.iter().map(run).collect()
        }
    }
}

/// One-shot form of `Matcher::match_tokens` with the remaining knobs at their
/// defaults.
pub fn match_and_align<S: AsRef<str>>(
    query_tokens: &[S],
    threshold: f64,
    max_candidates: usize,
    corpus: &Corpus,
) -> Result<MatchOutcome, Error> {
    Matcher::new(corpus, MatchConfig::new(threshold, max_candidates))?.match_tokens(query_tokens)
}
