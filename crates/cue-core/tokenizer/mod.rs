//! Cue payload markup tokenizer
//!
//! Parses WebVTT-style cue payload text into a typed [`NodeTree`] of text
//! runs and voice/class/timestamp/formatting spans. Tokenization is
//! tolerant: unrecognized opening tags are dropped when sanitising, and
//! closing tags pop the open-tag stack to the nearest matching frame — an
//! unmatched closer is ignored outright.
//!
//! # Example
//!
//! ```rust
//! use cue_core::tokenizer::{CueNode, MarkupTokenizer, TokenizerOptions};
//!
//! let tree = MarkupTokenizer::new(TokenizerOptions::default())
//!     .tokenize("<v Roger>Hello</v>");
//! assert!(matches!(tree.children()[0], CueNode::Voice { .. }));
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::timestamp_seconds;

pub mod node;

pub use node::{CueNode, NodeTree};

/// Tag/text interleave: any `<...>` run is a candidate tag token.
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[^>]+>").expect("tag pattern"));

/// Chunk timestamp inside a tag, e.g. `<00:01:02.500>`.
static CHUNK_TIMESTAMP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})?:?(\d{2}):(\d{2})[.,](\d+)").expect("chunk pattern"));

/// Voice span opener with a captured speaker name.
static VOICE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<v\s+([^>]+)>").expect("voice pattern"));

/// Class span opener, `<c.classA.classB>`.
static CLASS_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<c[a-z0-9\-_.]+>").expect("class pattern"));

/// Recognized inline-formatting openers.
static STYLE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(b|i|u|ruby|rt)>").expect("style pattern"));

/// Tokenizer behaviour switches.
#[derive(Debug, Clone, Copy)]
pub struct TokenizerOptions {
    /// Drop unrecognized tags and entity-escape text runs (default true)
    pub sanitize: bool,
    /// Keep newlines verbatim instead of emitting `<br />` (default false)
    pub preserve_whitespace: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            sanitize: true,
            preserve_whitespace: false,
        }
    }
}

/// What an open span will become once closed (or when input ends).
#[derive(Debug)]
enum SpanKind {
    Voice(String),
    Class(Vec<String>),
    Timestamp { seconds: f64, label: String },
    Style { tag: String, raw: String },
}

#[derive(Debug)]
struct OpenSpan {
    /// Tag name used to match closing tags
    name: String,
    kind: SpanKind,
    children: Vec<CueNode>,
}

impl OpenSpan {
    fn into_node(self) -> CueNode {
        match self.kind {
            SpanKind::Voice(voice) => CueNode::Voice {
                voice,
                children: self.children,
            },
            SpanKind::Class(classes) => CueNode::Class {
                classes,
                children: self.children,
            },
            SpanKind::Timestamp { seconds, label } => CueNode::Timestamp {
                seconds,
                label,
                children: self.children,
            },
            SpanKind::Style { tag, raw } => CueNode::Style {
                tag,
                raw,
                children: self.children,
            },
        }
    }
}

/// Tolerant cue payload tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupTokenizer {
    options: TokenizerOptions,
}

impl MarkupTokenizer {
    /// Create a tokenizer with the given options.
    #[must_use]
    pub const fn new(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// Tokenize a cue payload into a typed node tree.
    ///
    /// Never fails: every input yields a tree, possibly empty.
    #[must_use]
    pub fn tokenize(&self, payload: &str) -> NodeTree {
        let mut builder = TreeBuilder {
            options: self.options,
            root: Vec::new(),
            stack: Vec::new(),
            time_dependent: false,
        };

        let mut cursor = 0;
        for tag in TAG.find_iter(payload) {
            builder.text(&payload[cursor..tag.start()]);
            builder.tag(tag.as_str());
            cursor = tag.end();
        }
        builder.text(&payload[cursor..]);

        builder.finish()
    }
}

struct TreeBuilder {
    options: TokenizerOptions,
    root: Vec<CueNode>,
    stack: Vec<OpenSpan>,
    time_dependent: bool,
}

impl TreeBuilder {
    fn current(&mut self) -> &mut Vec<CueNode> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.root,
        }
    }

    /// Append a text run, dropping whitespace-only tokens.
    fn text(&mut self, raw: &str) {
        if raw.chars().all(char::is_whitespace) {
            return;
        }

        let mut text = raw.to_string();
        if self.options.sanitize {
            text = text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;");
            if !self.options.preserve_whitespace {
                text = collapse_newlines(&text);
            }
        }

        self.current().push(CueNode::Text(text));
    }

    fn tag(&mut self, raw: &str) {
        if raw.starts_with("</") {
            self.close(tag_name(raw));
        } else {
            self.open(raw);
        }
    }

    fn open(&mut self, raw: &str) {
        let name = tag_name(raw);
        let inner = &raw[1..raw.len() - 1];

        let kind = if let Some(m) = VOICE_TAG.captures(raw) {
            Some(SpanKind::Voice(m[1].trim().to_string()))
        } else if CLASS_TAG.is_match(raw) {
            Some(SpanKind::Class(class_tokens(inner)))
        } else if let Some(m) = CHUNK_TIMESTAMP.captures(inner) {
            self.time_dependent = true;
            let seconds = timestamp_seconds(
                m.get(1).map(|g| g.as_str()),
                m.get(2).map(|g| g.as_str()),
                m.get(3).map(|g| g.as_str()),
                m.get(4).map(|g| g.as_str()),
            );
            Some(SpanKind::Timestamp {
                seconds,
                label: name.clone(),
            })
        } else if STYLE_TAG.is_match(raw) {
            Some(SpanKind::Style {
                tag: name.clone(),
                raw: raw.to_string(),
            })
        } else if self.options.sanitize {
            // Unrecognized tag with sanitisation active: drop it entirely,
            // contents and all markers included.
            None
        } else {
            Some(SpanKind::Style {
                tag: name.clone(),
                raw: raw.to_string(),
            })
        };

        if let Some(kind) = kind {
            self.stack.push(OpenSpan {
                name,
                kind,
                children: Vec::new(),
            });
        }
    }

    /// Pop the stack to the nearest frame matching `name`. Frames above the
    /// match are implicitly closed; a closer with no matching frame is
    /// ignored.
    fn close(&mut self, name: String) {
        let Some(depth) = self.stack.iter().rposition(|frame| frame.name == name) else {
            return;
        };

        while self.stack.len() > depth {
            let node = self.stack.pop().map(OpenSpan::into_node);
            if let Some(node) = node {
                self.current().push(node);
            }
        }
    }

    fn finish(mut self) -> NodeTree {
        // Unclosed spans survive as ordinary nodes.
        while let Some(frame) = self.stack.pop() {
            let node = frame.into_node();
            self.current().push(node);
        }
        NodeTree::new(self.root, self.time_dependent)
    }
}

/// Tag name: text with `<`, `>`, `/` stripped, cut at whitespace or `.`.
fn tag_name(raw: &str) -> String {
    raw.trim_matches(|c| c == '<' || c == '>' || c == '/')
        .split(|c: char| c.is_whitespace() || c == '.')
        .next()
        .unwrap_or("")
        .to_string()
}

/// Class tokens of a `<c.a.b>` tag; tokens with no alphanumeric content are
/// discarded.
fn class_tokens(inner: &str) -> Vec<String> {
    inner
        .split('.')
        .skip(1)
        .filter(|token| token.chars().any(|c| c.is_ascii_alphanumeric()))
        .map(ToString::to_string)
        .collect()
}

/// Replace every newline run with a line-break marker.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c == '\n' {
            if !in_run {
                out.push_str("<br />");
                in_run = true;
            }
        } else {
            in_run = false;
            out.push(c);
        }
    }
    out
}
