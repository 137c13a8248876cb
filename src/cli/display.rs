// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the tmatch CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `TMATCH_THEME` first, then `COLORFGBG`, then defaults to dark. Respects
//! `NO_COLOR` and turns colors off when stdout is not a TTY, so piped output
//! is plain text.
//!
//! # Theme detection order
//!
//! 1. `TMATCH_THEME` env var ("dark" or "light")
//! 2. `COLORFGBG` env var (terminal background hint)
//! 3. Default to dark theme

use std::sync::OnceLock;

use tmatch::corpus::snapshot::SnapshotInfo;
use tmatch::{Chunk, Corpus, Error, MatchOutcome};

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 72;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("TMATCH_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and up (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117); // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121); // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123); // #e5c07b
    pub const BLUE: (u8, u8, u8) = (97, 175, 239); // #61afef
    pub const CYAN: (u8, u8, u8) = (86, 182, 194); // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112); // #5c6370
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73); // #e45649
    pub const GREEN: (u8, u8, u8) = (80, 161, 79); // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1); // #c18401
    pub const BLUE: (u8, u8, u8) = (64, 120, 242); // #4078f2
    pub const CYAN: (u8, u8, u8) = (1, 132, 188); // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167); // #a0a1a7
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply theme color with optional modifiers, or nothing when colors are off.
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

fn border() -> String {
    if use_colors() {
        GRAY()
    } else {
        String::new()
    }
}

fn reset() -> &'static str {
    if use_colors() {
        RESET
    } else {
        ""
    }
}

/// │ content          │
pub fn row(content: &str) {
    let b = border();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content) + 1);
    println!("{}│{} {}{}{}│{}", b, reset(), content, " ".repeat(pad), b, reset());
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let b = border();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}┌{}{}{}{}┐{}", b, reset(), label_part, b, "─".repeat(remaining), reset());
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let b = border();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}├{}{}{}{}┤{}", b, reset(), label_part, b, "─".repeat(remaining), reset());
}

/// └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", border(), "─".repeat(BOX_WIDTH), reset());
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Fuzzy match score, green when close to exact, red when far.
pub fn fms_value(fms: f64) -> String {
    let text = format!("{:.4}", fms);
    let color: fn() -> String = if fms >= 0.9 {
        BRIGHT_GREEN
    } else if fms >= 0.7 {
        GREEN
    } else if fms >= 0.5 {
        YELLOW
    } else {
        RED
    };
    themed(color, &[], &text)
}

pub fn crc_status(ok: bool) -> String {
    if ok {
        themed(GREEN, &[BOLD], "valid")
    } else {
        themed(RED, &[BOLD], "MISMATCH")
    }
}

/// Words covered by `span`, joined by spaces.
pub fn span_text(tokens: &[&str], start: usize, end: usize) -> String {
    tokens
        .get(start..end.min(tokens.len()))
        .unwrap_or(&[])
        .join(" ")
}

/// `query words  =>  target words   [q a..b  t c..d]`
pub fn chunk_line(query: &[&str], target: &[&str], chunk: &Chunk) -> String {
    let source = themed(BLUE, &[], &span_text(query, chunk.query.start, chunk.query.end));
    let translated = themed(GREEN, &[BOLD], &span_text(target, chunk.target.start, chunk.target.end));
    let spans = themed(
        GRAY,
        &[DIM],
        &format!(
            "[q {}..{}  t {}..{}]",
            chunk.query.start, chunk.query.end, chunk.target.start, chunk.target.end
        ),
    );
    format!("{}  =>  {}  {}", source, translated, spans)
}

// ═══════════════════════════════════════════════════════════════════════════
// OUTCOMES
// ═══════════════════════════════════════════════════════════════════════════

/// Print one query's outcome. A sentence with no match is echoed unchanged.
pub fn print_outcome(corpus: &Corpus, sentence: &str, outcome: &MatchOutcome) -> Result<(), Error> {
    match outcome {
        MatchOutcome::NoMatch => println!("{}", sentence),
        MatchOutcome::ExactMatch { segment, target } => {
            section_top(&format!("EXACT  segment {}", segment));
            row(&themed(BLUE, &[], sentence));
            row(&themed(GREEN, &[BOLD], target));
            section_bot();
        }
        MatchOutcome::Candidates { ranked, chunks } => {
            let query: Vec<&str> = sentence.split_whitespace().collect();
            section_top("QUERY");
            row(sentence);
            for summary in ranked {
                section_mid(&format!("segment {}", summary.segment));
                let source = corpus.sentence(summary.segment)?;
                let target_text = corpus.target(summary.segment)?;
                row(&format!(
                    "{} {}  {} {}",
                    themed(GRAY, &[], "fms"),
                    fms_value(summary.fms),
                    themed(GRAY, &[], "cost"),
                    summary.cost
                ));
                row(&themed(GRAY, &[], &source));
                row(&themed(GRAY, &[], target_text));

                let target: Vec<&str> = target_text.split_whitespace().collect();
                for chunk in chunks.iter().filter(|c| c.segment == summary.segment) {
                    row(&chunk_line(&query, &target, chunk));
                }
            }
            section_bot();
        }
    }
    Ok(())
}

/// Print a snapshot's header, section sizes and checksum status.
pub fn print_snapshot_info(path: &str, info: &SnapshotInfo) {
    let h = &info.header;
    section_top("SNAPSHOT");
    row(&format!("{}  {}", pad_right("file", 14), path));
    row(&format!("{}  {}", pad_right("size", 14), format_size(info.file_size)));
    row(&format!("{}  {}", pad_right("version", 14), h.version));
    row(&format!(
        "{}  {}",
        pad_right("compressed", 14),
        if h.flags.is_compressed() { "brotli" } else { "no" }
    ));
    row(&format!("{}  {}", pad_right("segments", 14), h.segment_count));
    row(&format!("{}  {}", pad_right("tokens", 14), h.token_count));

    section_mid("SECTIONS (uncompressed)");
    for (name, len) in [
        ("vocabulary", h.vocab_len),
        ("tokens", h.tokens_len),
        ("suffix array", h.sa_len),
        ("segments", h.segments_len),
    ] {
        row(&format!("{}  {:>10}", pad_right(name, 14), format_size(len as usize)));
    }
    row(&format!(
        "{}  {:>10}",
        pad_right("stored body", 14),
        format_size(info.payload_size)
    ));

    section_mid("INTEGRITY");
    row(&format!(
        "{}  {:08x} stored, {:08x} computed  {}",
        pad_right("crc32", 14),
        info.stored_crc,
        info.computed_crc,
        crc_status(info.crc_ok())
    ));
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
