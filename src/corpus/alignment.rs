// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word alignment between a source sentence and its translation.
//!
//! Input is the usual `i-j` pair list (`"0-0 1-2 2-1"`): source token `i` is
//! aligned to target token `j`. A source token can align to several targets or
//! to none. Stored as one target list per source index, in the order the
//! pairs appear on the line, so chunk extraction can ask "which targets does
//! source token `i` produce" directly and try them in that order.

use crate::error::Error;
use crate::verify::InvariantError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordAlignment {
    links: Vec<Vec<u32>>,
}

impl WordAlignment {
    /// Build from `(source, target)` pairs. Duplicates collapse onto their
    /// first occurrence.
    pub fn from_pairs<I>(
        segment: usize,
        pairs: I,
        source_len: usize,
        target_len: usize,
    ) -> Result<Self, InvariantError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut links = vec![Vec::new(); source_len];
        for (source, target) in pairs {
            if source as usize >= source_len || target as usize >= target_len {
                return Err(InvariantError::AlignmentOutOfBounds {
                    segment,
                    source_idx: source,
                    target_idx: target,
                    source_len,
                    target_len,
                });
            }
            let targets = &mut links[source as usize];
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        Ok(Self { links })
    }

    /// Parse a whitespace-separated `i-j` line.
    pub fn parse(
        segment: usize,
        line: &str,
        source_len: usize,
        target_len: usize,
    ) -> Result<Self, Error> {
        let pairs = line
            .split_whitespace()
            .map(|pair| parse_pair(pair).ok_or_else(|| Error::MalformedAlignment {
                segment,
                pair: pair.to_string(),
            }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_pairs(segment, pairs, source_len, target_len)?)
    }

    /// Targets aligned to source token `source`, in line order. Empty when the
    /// source token is unaligned or out of range.
    #[inline]
    pub fn targets_of(&self, source: usize) -> &[u32] {
        self.links.get(source).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of source tokens the alignment was built for.
    pub fn source_len(&self) -> usize {
        self.links.len()
    }

    /// All pairs, ordered by source, then by line order within a source.
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.links
            .iter()
            .enumerate()
            .flat_map(|(s, targets)| targets.iter().map(move |&t| (s as u32, t)))
    }

    pub fn pair_count(&self) -> usize {
        self.links.iter().map(Vec::len).sum()
    }
}

fn parse_pair(pair: &str) -> Option<(u32, u32)> {
    let (source, target) = pair.split_once('-')?;
    Some((source.parse().ok()?, target.parse().ok()?))
}
