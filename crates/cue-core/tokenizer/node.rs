//! Typed cue payload tree
//!
//! A tokenized cue payload is a tree of [`CueNode`] values owned by a
//! [`NodeTree`]. The tree records whether any timestamp span was seen
//! (`is_time_dependent`) and memoizes the rendered string for trees whose
//! output cannot vary with playback time.

use std::cell::OnceCell;

/// One node of a tokenized cue payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CueNode {
    /// Plain (already escaped) text run
    Text(String),
    /// `<v name>` voice span
    Voice {
        /// Speaker name captured from the tag
        voice: String,
        /// Nested payload nodes
        children: Vec<CueNode>,
    },
    /// `<c.class1.class2>` class span
    Class {
        /// Class tokens captured from the tag
        classes: Vec<String>,
        /// Nested payload nodes
        children: Vec<CueNode>,
    },
    /// `<00:01:02.500>` timestamp (karaoke) span
    Timestamp {
        /// Resolved time offset in seconds
        seconds: f64,
        /// Token label used when rendering (`data-timestamp`)
        label: String,
        /// Nested payload nodes
        children: Vec<CueNode>,
    },
    /// Inline-formatting span (`b`, `i`, `u`, `ruby`, `rt`) or, with
    /// sanitisation disabled, any other tag passed through verbatim
    Style {
        /// Tag name
        tag: String,
        /// Original opening tag text, re-emitted when rendering
        raw: String,
        /// Nested payload nodes
        children: Vec<CueNode>,
    },
}

impl CueNode {
    /// Child nodes of a span, or `None` for text runs.
    #[must_use]
    pub fn children(&self) -> Option<&[CueNode]> {
        match self {
            Self::Text(_) => None,
            Self::Voice { children, .. }
            | Self::Class { children, .. }
            | Self::Timestamp { children, .. }
            | Self::Style { children, .. } => Some(children),
        }
    }
}

/// Root of a tokenized cue payload.
///
/// Rendering is memoized: a tree with no timestamp spans always renders to
/// the same string, so the first rendered value is cached and returned on
/// every subsequent call without re-traversal, regardless of the time
/// argument.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    children: Vec<CueNode>,
    time_dependent: bool,
    rendered: OnceCell<String>,
}

impl PartialEq for NodeTree {
    fn eq(&self, other: &Self) -> bool {
        // The render cache is derived state and excluded from equality.
        self.children == other.children && self.time_dependent == other.time_dependent
    }
}

impl NodeTree {
    /// Create a tree from tokenized children.
    #[must_use]
    pub fn new(children: Vec<CueNode>, time_dependent: bool) -> Self {
        Self {
            children,
            time_dependent,
            rendered: OnceCell::new(),
        }
    }

    /// Top-level payload nodes.
    #[must_use]
    pub fn children(&self) -> &[CueNode] {
        &self.children
    }

    /// True if any timestamp span was tokenized into this tree.
    #[must_use]
    pub const fn is_time_dependent(&self) -> bool {
        self.time_dependent
    }

    /// True once a render result has been memoized.
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.rendered.get().is_some()
    }

    /// Render the payload to markup text, evaluated at `at` seconds.
    ///
    /// A timestamp span's children are included only when `at` is `None` or
    /// `at >= seconds` (progressive/karaoke reveal). Trees without timestamp
    /// spans return the memoized first render unchanged.
    #[must_use]
    pub fn render(&self, at: Option<f64>) -> String {
        if let Some(cached) = self.rendered.get() {
            return cached.clone();
        }

        let mut out = String::new();
        render_nodes(&self.children, at, &mut out);

        if !self.time_dependent {
            let _ = self.rendered.set(out.clone());
        }
        out
    }
}

fn render_nodes(nodes: &[CueNode], at: Option<f64>, out: &mut String) {
    for node in nodes {
        match node {
            CueNode::Text(text) => out.push_str(text),
            CueNode::Voice { voice, children } => {
                if children.is_empty() {
                    continue;
                }
                let name = voice.replace('"', "");
                out.push_str("<q data-voice=\"");
                out.push_str(&name);
                out.push_str("\" class='voice speaker-");
                out.push_str(&speaker_slug(voice));
                out.push_str("' title=\"");
                out.push_str(&name);
                out.push_str("\">");
                render_nodes(children, at, out);
                out.push_str("</q>");
            }
            CueNode::Class { classes, children } => {
                if children.is_empty() {
                    continue;
                }
                out.push_str("<span class='webvtt-class-span ");
                out.push_str(&classes.join(" "));
                out.push_str("'>");
                render_nodes(children, at, out);
                out.push_str("</span>");
            }
            CueNode::Timestamp {
                seconds,
                label,
                children,
            } => {
                if children.is_empty() {
                    continue;
                }
                // Karaoke reveal: hidden until playback reaches the offset.
                if at.map_or(true, |t| t >= *seconds) {
                    out.push_str("<span class='webvtt-timestamp-span' data-timestamp='");
                    out.push_str(label);
                    out.push_str("' data-timestamp-seconds='");
                    out.push_str(&seconds.to_string());
                    out.push_str("'>");
                    render_nodes(children, at, out);
                    out.push_str("</span>");
                }
            }
            CueNode::Style { tag, raw, children } => {
                if children.is_empty() {
                    continue;
                }
                out.push_str(raw);
                render_nodes(children, at, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Lowercased voice name with non-alphanumeric runs collapsed to `-`.
fn speaker_slug(voice: &str) -> String {
    let mut slug = String::with_capacity(voice.len());
    let mut pending_dash = false;
    for c in voice.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}
