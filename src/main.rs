// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tmatch::corpus::snapshot;
use tmatch::{Corpus, MatchConfig, MatchOutcome, Matcher};

mod cli;
use cli::{display, Cli, Commands};

/// One line of `--json` output.
#[derive(Serialize)]
struct QueryRecord<'a> {
    sentence: &'a str,
    #[serde(flatten)]
    outcome: &'a MatchOutcome,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match cli.command {
        Commands::Build {
            source,
            target,
            alignment,
            output,
            no_compress,
        } => run_build(&source, &target, &alignment, &output, !no_compress),
        Commands::Query {
            file,
            sentence,
            input,
            threshold,
            max_candidates,
            config,
            json,
        } => {
            let mut settings = match config {
                Some(path) => MatchConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => MatchConfig::default(),
            };
            if let Some(threshold) = threshold {
                settings.threshold = threshold;
            }
            if let Some(max_candidates) = max_candidates {
                settings.max_candidates = max_candidates;
            }

            let sentences = match (sentence, input) {
                (Some(sentence), None) => vec![sentence],
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?
                    .lines()
                    .map(str::to_string)
                    .collect(),
                _ => bail!("give either a SENTENCE or --input FILE"),
            };
            run_query(&file, settings, &sentences, json)
        }
        Commands::Inspect { file } => run_inspect(&file),
    }
}

/// Log to stderr so stdout stays clean for results. `RUST_LOG` wins over -v.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_build(source: &Path, target: &Path, alignment: &Path, output: &Path, compress: bool) -> Result<()> {
    let corpus = Corpus::from_files(source, target, alignment).context("building corpus index")?;
    let written = corpus
        .save(output, compress)
        .with_context(|| format!("writing snapshot {}", output.display()))?;

    println!(
        "{} {} segments, {} tokens, {} vocabulary -> {} ({})",
        display::themed(display::GREEN, &[display::BOLD], "built"),
        corpus.segment_count(),
        corpus.token_count(),
        corpus.vocabulary().len(),
        output.display(),
        display::format_size(written)
    );
    Ok(())
}

fn run_query(file: &Path, config: MatchConfig, sentences: &[String], json: bool) -> Result<()> {
    let corpus = Corpus::load(file).with_context(|| format!("loading snapshot {}", file.display()))?;
    let matcher = Matcher::new(&corpus, config)?;
    info!(sentences = sentences.len(), "running queries");

    let outcomes = if sentences.len() == 1 {
        vec![matcher.match_sentence(&sentences[0])]
    } else {
        match_with_progress(&matcher, sentences)
    };

    for (line, (sentence, outcome)) in sentences.iter().zip(outcomes).enumerate() {
        let outcome = outcome.with_context(|| format!("matching line {}", line + 1))?;
        if json {
            let record = QueryRecord {
                sentence,
                outcome: &outcome,
            };
            println!("{}", serde_json::to_string(&record)?);
        } else {
            display::print_outcome(&corpus, sentence, &outcome)?;
        }
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn match_with_progress(
    matcher: &Matcher<'_>,
    sentences: &[String],
) -> Vec<tmatch::Result<MatchOutcome>> {
    let progress = ProgressBar::new(sentences.len() as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len}")
    {
        progress.set_style(style.progress_chars("━━╸"));
    }
    progress.set_prefix("Matching");

    let outcomes = matcher.match_batch_with(sentences, || progress.inc(1));
    progress.finish_and_clear();
    outcomes
}

#[cfg(not(feature = "parallel"))]
fn match_with_progress(
    matcher: &Matcher<'_>,
    sentences: &[String],
) -> Vec<tmatch::Result<MatchOutcome>> {
    matcher.match_batch(sentences)
}

fn run_inspect(file: &Path) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let info = snapshot::inspect(&bytes)?;
    display::print_snapshot_info(&file.display().to_string(), &info);
    if !info.crc_ok() {
        bail!("checksum mismatch: snapshot is corrupted");
    }
    Ok(())
}
