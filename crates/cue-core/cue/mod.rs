//! Normalized cue model
//!
//! A [`Cue`] is one timed caption entry: timing, placement settings, and a
//! payload (either a tokenized [`NodeTree`] or the raw source text).
//! Cues are immutable after construction; placement settings are parsed
//! tolerantly, with unusable values keeping their documented defaults.

use ahash::AHashMap;

use crate::tokenizer::NodeTree;
use crate::utils::sanitize_numeric;

/// Writing direction of a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Lines extend horizontally, stacked vertically
    #[default]
    Horizontal,
    /// Lines extend vertically, growing right-to-left (`vertical`)
    VerticalRl,
    /// Lines extend vertically, growing left-to-right (`vertical-lr`)
    VerticalLr,
}

impl Direction {
    /// Parse a `D:` setting value. Unknown values yield `None`.
    #[must_use]
    pub fn from_setting(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::VerticalRl),
            "vertical-lr" => Some(Self::VerticalLr),
            _ => None,
        }
    }

    /// True for either vertical growth direction.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::VerticalRl | Self::VerticalLr)
    }
}

/// Text alignment within a cue box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Aligned towards the start side
    Start,
    /// Centered between start and end sides
    #[default]
    Middle,
    /// Aligned towards the end side
    End,
}

impl Alignment {
    /// Parse an `A:` setting value. Unknown values yield `None`.
    #[must_use]
    pub fn from_setting(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Self::Start),
            "middle" => Some(Self::Middle),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// A line or text position: a number, or automatic placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// Position depends on the other active cues
    #[default]
    Auto,
    /// Explicit position (line index or percentage, per context)
    Value(f64),
}

impl Position {
    /// Explicit value, if any.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// Cue payload: tokenized tree, or raw text when markup processing is off.
#[derive(Debug, Clone, PartialEq)]
pub enum CuePayload {
    /// Unprocessed source text
    Raw(String),
    /// Tokenized node tree
    Tree(NodeTree),
}

impl CuePayload {
    /// Render the payload evaluated at `at` seconds.
    ///
    /// Raw payloads ignore the time argument; tree payloads apply the
    /// karaoke-reveal rule and the memoization contract of
    /// [`NodeTree::render`].
    #[must_use]
    pub fn render(&self, at: Option<f64>) -> String {
        match self {
            Self::Raw(text) => text.clone(),
            Self::Tree(tree) => tree.render(at),
        }
    }

    /// True if rendering can vary with the time argument.
    #[must_use]
    pub fn is_time_dependent(&self) -> bool {
        match self {
            Self::Raw(_) => false,
            Self::Tree(tree) => tree.is_time_dependent(),
        }
    }
}

/// One timed caption entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    id: String,
    start_time: f64,
    end_time: f64,
    direction: Direction,
    snap_to_lines: bool,
    line_position: Position,
    text_position: Position,
    size: Option<f64>,
    alignment: Alignment,
    payload: CuePayload,
    order: u32,
}

impl Cue {
    /// Create a cue with default placement settings.
    ///
    /// `end_time` is clamped up to `start_time` so the interval invariant
    /// `end >= start` always holds.
    #[must_use]
    pub fn new(id: impl Into<String>, start_time: f64, end_time: f64, payload: CuePayload) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: end_time.max(start_time),
            direction: Direction::default(),
            snap_to_lines: true,
            line_position: Position::Auto,
            text_position: Position::Auto,
            size: None,
            alignment: Alignment::default(),
            payload,
            order: 0,
        }
    }

    /// Apply merged `key:value` settings on top of the defaults.
    ///
    /// Recognized keys: `D` (direction), `L` (line position), `T` (text
    /// position), `A` (alignment), `S` (size). Unknown keys and unparsable
    /// values leave the field at its default.
    pub fn apply_settings(&mut self, settings: &AHashMap<String, String>) {
        if let Some(direction) = settings.get("D").and_then(|v| Direction::from_setting(v)) {
            self.direction = direction;
        }
        if let Some(alignment) = settings.get("A").and_then(|v| Alignment::from_setting(v)) {
            self.alignment = alignment;
        }
        if let Some(value) = settings.get("L") {
            // A percent sign switches the cue from line-snapped placement to
            // a percentage of the render area.
            if value.contains('%') {
                self.snap_to_lines = false;
            }
            if let Some(v) = sanitize_numeric(value) {
                self.line_position = Position::Value(v);
            }
        }
        if let Some(value) = settings.get("T") {
            if let Some(v) = sanitize_numeric(value) {
                self.text_position = Position::Value(v);
            }
        }
        if let Some(value) = settings.get("S") {
            if let Some(v) = sanitize_numeric(value) {
                if v > 0.0 {
                    self.size = Some(v.min(100.0));
                }
            }
        }
    }

    /// Cue identifier (file-supplied or positional).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Start of the active interval, in seconds.
    #[must_use]
    pub const fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End of the active interval, in seconds.
    #[must_use]
    pub const fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Writing direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// True when the line position snaps to line-pitch multiples.
    #[must_use]
    pub const fn snap_to_lines(&self) -> bool {
        self.snap_to_lines
    }

    /// Line position setting.
    #[must_use]
    pub const fn line_position(&self) -> Position {
        self.line_position
    }

    /// Text position setting.
    #[must_use]
    pub const fn text_position(&self) -> Position {
        self.text_position
    }

    /// Explicit size percentage, if one was set (clamped to 0–100).
    #[must_use]
    pub const fn size(&self) -> Option<f64> {
        self.size
    }

    /// Text alignment.
    #[must_use]
    pub const fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Cue payload.
    #[must_use]
    pub const fn payload(&self) -> &CuePayload {
        &self.payload
    }

    /// Creation-order tie-break, assigned by the owning store.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// True iff `start <= time <= end`.
    #[must_use]
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time <= self.end_time
    }

    /// Render the payload at `at` seconds.
    #[must_use]
    pub fn render_text(&self, at: Option<f64>) -> String {
        self.payload.render(at)
    }

    pub(crate) fn set_order(&mut self, order: u32) {
        self.order = order;
    }

    pub(crate) fn set_end_time(&mut self, end_time: f64) {
        self.end_time = end_time.max(self.start_time);
    }
}
