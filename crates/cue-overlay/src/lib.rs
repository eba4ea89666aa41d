//! # cue-overlay
//!
//! Geometric layout engine for caption overlays. Takes the cues active at a
//! playback time (from [`cue_core`]) and packs them into a video container:
//! horizontal cues stack onto line-pitch rows, vertical cues become glyph
//! columns along the side edges, and every placement shrinks the remaining
//! area so cues of one pass never overlap.
//!
//! Text measurement is host-specific and consumed through the
//! [`TextMeasurer`] trait; [`MonospaceMeasurer`] is a deterministic
//! implementation for tests and headless use.
//!
//! ## Quick start
//!
//! ```rust
//! use cue_core::{CaptionParser, ParseOptions};
//! use cue_overlay::{ContainerMetrics, LayoutConfig, LayoutEngine, MonospaceMeasurer};
//!
//! let cues = CaptionParser::new(ParseOptions::default())
//!     .parse("WEBVTT\n\n00:00.000 --> 00:05.000\nHello world")?;
//! let refs: Vec<&cue_core::Cue> = cues.iter().collect();
//!
//! let engine = LayoutEngine::new(LayoutConfig::default());
//! let placed = engine.layout(
//!     &refs,
//!     &ContainerMetrics::bare(1280.0, 720.0),
//!     1.0,
//!     &MonospaceMeasurer::default(),
//! )?;
//! assert_eq!(placed.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(clippy::all)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod area;
pub mod direction;
pub mod layout;
pub mod measure;
pub mod metrics;
pub mod utils;

pub use area::AvailableArea;
pub use direction::{detect_direction, resolve_alignment, TextAlign, TextDirection};
pub use layout::{gather_active, CueGeometry, GlyphGeometry, LayoutConfig, LayoutEngine};
pub use measure::{strip_markup, MonospaceMeasurer, TextMeasurer};
pub use metrics::{ContainerMetrics, FontMetrics};
pub use utils::LayoutError;

/// Result type for layout operations.
pub type Result<T> = core::result::Result<T, LayoutError>;
