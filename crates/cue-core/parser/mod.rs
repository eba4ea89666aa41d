//! Tolerant multi-dialect caption parser
//!
//! Accepts WebVTT, SRT, SUB, SBV, Google transcript and LRC input and emits
//! normalized [`Cue`] values. The parser is deliberately forgiving: the only
//! hard failure is empty input, and any block without a recognisable timing
//! line is dropped.

pub mod timing;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cue::{Cue, CuePayload};
use crate::tokenizer::{MarkupTokenizer, TokenizerOptions};
use crate::utils::CoreError;
use crate::Result;

use timing::{recognise_block_timing, TimingGrammar};

/// WebVTT signature block, with or without the legacy `FILE` suffix.
static WEBVTT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^WEBVTT(\s*FILE)?").unwrap());

/// WebVTT metadata block introducer (`DEFAULTS -->`, `STYLE -->`,
/// `COMMENT -->` and their plural/singular twins).
static METADATA_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(DEFAULTS?|STYLES?|COMMENTS?)\s+-->\s*(.*)$").unwrap()
});

/// Standalone cue identifier line.
static ID_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*[a-z0-9]+\s*$").unwrap());

/// Detected input dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Blank-line-delimited blocks, timing grammar sniffed per block
    #[default]
    Generic,
    /// Generic blocks preceded by a `WEBVTT` signature
    WebVtt,
    /// Line-per-cue lyric format
    Lrc,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Tokenize cue payloads into node trees (off ⇒ raw string payloads)
    pub process_markup: bool,
    /// Drop unrecognised markup tags (forwarded to the tokenizer)
    pub sanitize: bool,
    /// Keep newline runs verbatim instead of `<br />` markers
    pub preserve_whitespace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            process_markup: true,
            sanitize: true,
            preserve_whitespace: false,
        }
    }
}

/// Duration granted to the last LRC cue, which has no successor to borrow
/// an end time from.
const LRC_FINAL_CUE_SECONDS: f64 = 5.0;

/// Multi-dialect caption parser.
#[derive(Debug, Clone, Default)]
pub struct CaptionParser {
    options: ParseOptions,
    dialect: Dialect,
    default_settings: AHashMap<String, String>,
    style_text: String,
}

impl CaptionParser {
    /// Create a parser with the given options.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            dialect: Dialect::default(),
            default_settings: AHashMap::new(),
            style_text: String::new(),
        }
    }

    /// Dialect detected by the most recent [`parse`](Self::parse) call.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Accumulated `STYLE -->` block text from the most recent parse.
    #[must_use]
    pub fn style_text(&self) -> &str {
        &self.style_text
    }

    /// Parse caption text into cues sorted by `(start, end, order)`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyInput`] when `text` is empty or
    /// whitespace-only. Malformed cue blocks never error; they are dropped.
    pub fn parse(&mut self, text: &str) -> Result<Vec<Cue>> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyInput);
        }

        // Per-parse state; a parser instance can be reused across sources.
        self.dialect = Dialect::Generic;
        self.default_settings.clear();
        self.style_text.clear();

        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        let first_line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        if TimingGrammar::Lrc.recognise(first_line).is_some() {
            self.dialect = Dialect::Lrc;
            return Ok(self.parse_lrc(&text));
        }

        let mut cues = Vec::new();
        for (index, block) in split_blocks(&text).into_iter().enumerate() {
            // The signature block switches the dialect wherever it appears.
            if WEBVTT_HEADER.is_match(block.trim_start()) {
                self.dialect = Dialect::WebVtt;
                continue;
            }
            if self.consume_metadata_block(block) {
                continue;
            }
            if let Some(cue) = self.parse_block(block, index) {
                cues.push(cue);
            }
        }

        sort_cues(&mut cues);
        Ok(cues)
    }

    /// Handle a WebVTT metadata block. Returns true when the block was
    /// consumed (it never yields a cue).
    fn consume_metadata_block(&mut self, block: &str) -> bool {
        let mut lines = block.lines();
        let Some(first) = lines.next() else {
            return false;
        };
        let Some(caps) = METADATA_HEADER.captures(first) else {
            return false;
        };

        let keyword = caps.get(1).map_or("", |m| m.as_str());
        let mut body = caps.get(2).map_or("", |m| m.as_str()).to_string();
        for line in lines {
            if !body.is_empty() {
                body.push('\n');
            }
            body.push_str(line);
        }

        match keyword {
            "DEFAULT" | "DEFAULTS" => {
                // A later DEFAULTS block replaces, not merges.
                self.default_settings = parse_settings(&body);
            }
            "STYLE" | "STYLES" => {
                self.style_text.push_str(&body);
                self.style_text.push('\n');
            }
            _ => {} // COMMENT/COMMENTS: discarded
        }
        true
    }

    /// Parse one blank-line-delimited cue block, or drop it.
    fn parse_block(&self, block: &str, index: usize) -> Option<Cue> {
        let mut lines = block.lines().skip_while(|l| l.trim().is_empty()).peekable();

        let first = *lines.peek()?;
        let id = if ID_LINE.is_match(first) {
            lines.next();
            first.trim().to_string()
        } else {
            index.to_string()
        };

        let timing_line = lines.next()?;
        let timing = recognise_block_timing(timing_line)?;

        // File-level DEFAULTS form the base; cue settings win per key.
        let mut settings = self.default_settings.clone();
        for (key, value) in parse_settings(&timing.settings) {
            settings.insert(key, value);
        }

        let payload_text = lines.collect::<Vec<_>>().join("\n");
        let payload = self.build_payload(&payload_text);

        let mut cue = Cue::new(id, timing.start, timing.end, payload);
        cue.apply_settings(&settings);
        Some(cue)
    }

    /// Parse a whole LRC file: one cue per bracketed line, each cue ending
    /// where the next begins.
    fn parse_lrc(&self, text: &str) -> Vec<Cue> {
        let mut cues: Vec<Cue> = Vec::new();
        for line in text.lines() {
            let Some(timing) = TimingGrammar::Lrc.recognise(line) else {
                continue;
            };
            let payload = self.build_payload(&timing.settings);
            let id = cues.len().to_string();
            cues.push(Cue::new(id, timing.start, timing.start, payload));
        }

        sort_cues(&mut cues);
        for i in 0..cues.len() {
            let end = if i + 1 < cues.len() {
                cues[i + 1].start_time()
            } else {
                cues[i].start_time() + LRC_FINAL_CUE_SECONDS
            };
            cues[i].set_end_time(end);
        }
        cues
    }

    fn build_payload(&self, text: &str) -> CuePayload {
        if self.options.process_markup {
            let tokenizer = MarkupTokenizer::new(TokenizerOptions {
                sanitize: self.options.sanitize,
                preserve_whitespace: self.options.preserve_whitespace,
            });
            CuePayload::Tree(tokenizer.tokenize(text))
        } else {
            CuePayload::Raw(text.to_string())
        }
    }
}

/// Split normalized text on blank-line runs, skipping empty blocks.
fn split_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' && matches!(bytes.get(i + 1), Some(b'\n')) {
            if text[start..i].trim().is_empty() {
                start = i + 1;
                i += 1;
                continue;
            }
            blocks.push(&text[start..i]);
            while matches!(bytes.get(i), Some(b'\n')) {
                i += 1;
            }
            start = i;
            continue;
        }
        i += 1;
    }
    if !text[start..].trim().is_empty() {
        blocks.push(&text[start..]);
    }
    blocks
}

/// Split a settings string into `key:value` tokens.
fn parse_settings(raw: &str) -> AHashMap<String, String> {
    let mut map = AHashMap::new();
    for token in raw.split_whitespace() {
        if let Some((key, value)) = token.split_once(':') {
            if !key.is_empty() && !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Stable sort by `(start, end)`; emission order breaks ties.
fn sort_cues(cues: &mut [Cue]) {
    cues.sort_by(|a, b| {
        a.start_time()
            .partial_cmp(&b.start_time())
            .unwrap_or(core::cmp::Ordering::Equal)
            .then_with(|| {
                a.end_time()
                    .partial_cmp(&b.end_time())
                    .unwrap_or(core::cmp::Ordering::Equal)
            })
    });
}
