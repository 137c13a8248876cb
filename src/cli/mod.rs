// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the tmatch command-line interface.
//!
//! Three subcommands: `build` to index a parallel corpus into a snapshot,
//! `query` to match sentences against a snapshot, and `inspect` to examine a
//! snapshot's header and checksum without loading it.

pub mod display;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tmatch",
    about = "Translation-memory retrieval with aligned chunk extraction",
    version
)]
pub struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a corpus snapshot from line-aligned parallel text
    Build {
        /// Source-language sentences, one per line
        #[arg(short, long)]
        source: PathBuf,

        /// Target-language sentences, one per line
        #[arg(short, long)]
        target: PathBuf,

        /// Word alignments, one line of `i-j` pairs per sentence
        #[arg(short, long)]
        alignment: PathBuf,

        /// Snapshot file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Store the body uncompressed (faster to load, larger on disk)
        #[arg(long)]
        no_compress: bool,
    },

    /// Match sentences against a corpus snapshot
    Query {
        /// Path to snapshot file
        file: PathBuf,

        /// Sentence to match (omit when using --input)
        sentence: Option<String>,

        /// Match every line of this file instead
        #[arg(short, long, conflicts_with = "sentence")]
        input: Option<PathBuf>,

        /// Allowed edit cost as a fraction of the query length, in (0, 1]
        #[arg(long)]
        threshold: Option<f64>,

        /// Maximum number of tied candidates to report
        #[arg(short = 'n', long)]
        max_candidates: Option<usize>,

        /// JSON file with match settings; flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print one JSON object per sentence
        #[arg(long)]
        json: bool,
    },

    /// Inspect a snapshot file
    Inspect {
        /// Path to snapshot file
        file: PathBuf,
    },
}
