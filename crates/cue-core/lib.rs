//! # cue-core
//!
//! Tolerant multi-dialect timed-text parser and cue model for video caption
//! overlays. Converts raw caption documents (WebVTT, SRT, SUB, SBV,
//! Google-timestamp, LRC) into a normalized [`Cue`] model, tracks which cues
//! are active for a playback time, and holds per-track state.
//!
//! ## Design
//!
//! - **Tolerant parsing**: malformed cue blocks are dropped, never raised.
//!   The parser fails only on empty input.
//! - **Typed cue model**: cues are immutable after construction and a
//!   track's cues are always ordered by `(start_time, end_time, creation
//!   order)`.
//! - **Edge-triggered lifecycle**: [`ActiveCueTracker`] fires enter/exit
//!   exactly once per activation transition.
//!
//! ## Quick start
//!
//! ```rust
//! use cue_core::{CaptionParser, ParseOptions};
//!
//! let vtt = "WEBVTT\n\n1\n00:00:01.000 --> 00:00:04.000\nHello <v Roger>world</v>!";
//! let cues = CaptionParser::new(ParseOptions::default()).parse(vtt)?;
//! assert_eq!(cues.len(), 1);
//! assert_eq!(cues[0].start_time(), 1.0);
//! # Ok::<(), cue_core::CoreError>(())
//! ```

#![deny(clippy::all)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod cue;
pub mod parser;
pub mod store;
pub mod tokenizer;
pub mod track;
pub mod tracker;
pub mod utils;

pub use cue::{Alignment, Cue, CuePayload, Direction, Position};
pub use parser::{CaptionParser, Dialect, ParseOptions};
pub use store::CueStore;
pub use tokenizer::{CueNode, MarkupTokenizer, NodeTree, TokenizerOptions};
pub use track::{LoadToken, ReadyState, Track, TrackKind, TrackMode};
pub use tracker::{ActiveCueTracker, ActiveCues};
pub use utils::CoreError;

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for core operations, using the crate's unified [`CoreError`].
pub type Result<T> = core::result::Result<T, CoreError>;
