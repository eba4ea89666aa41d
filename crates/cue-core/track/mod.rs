//! Caption track state machine
//!
//! A [`Track`] owns one caption source: its kind/label/language identity,
//! display mode, load lifecycle, and the parsed [`CueStore`]. Source loading
//! is modelled without a transport: the host obtains a [`LoadToken`] from
//! [`Track::begin_load`] and later commits or fails it. Tokens carry a
//! generation number so a slow fetch that was superseded by a newer load
//! request is discarded instead of clobbering fresher cues.

use core::fmt;

use crate::parser::{CaptionParser, ParseOptions};
use crate::store::CueStore;
use crate::utils::CoreError;
use crate::Result;

/// What a track's content is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    /// Transcriptions of dialogue in another language
    Subtitles,
    /// Same-language transcription including non-speech sound
    Captions,
    /// Textual descriptions of the video content
    Descriptions,
    /// Chapter navigation titles
    Chapters,
    /// Machine-readable content, never displayed
    Metadata,
    /// Karaoke-timed lyrics
    Karaoke,
    /// Song lyrics
    Lyrics,
    /// Scrolling ticker text
    TickerText,
    /// Audio description transcript
    AudioDescription,
    /// Commentary track
    Commentary,
    /// Alternate-content track
    Alternate,
    /// Sign-language video companion text
    SignLanguage,
}

impl TrackKind {
    /// Recognise a kind name (lowercase, as it appears in markup).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "subtitles" => Some(Self::Subtitles),
            "captions" => Some(Self::Captions),
            "descriptions" => Some(Self::Descriptions),
            "chapters" => Some(Self::Chapters),
            "metadata" => Some(Self::Metadata),
            "karaoke" => Some(Self::Karaoke),
            "lyrics" => Some(Self::Lyrics),
            "tickertext" => Some(Self::TickerText),
            "audiodescription" => Some(Self::AudioDescription),
            "commentary" => Some(Self::Commentary),
            "alternate" => Some(Self::Alternate),
            "signlanguage" => Some(Self::SignLanguage),
            _ => None,
        }
    }
}

/// Track display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
    /// Not loaded on demand, no cues surface
    #[default]
    Disabled,
    /// Cues tracked (events fire) but not laid out
    Hidden,
    /// Cues tracked and laid out
    Showing,
}

/// Source load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// No load attempted yet
    #[default]
    NotLoaded,
    /// A load is in flight
    Loading,
    /// Cues installed
    Loaded,
    /// The last load failed
    Error,
}

/// Opaque handle for one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    generation: u64,
}

/// One caption track.
pub struct Track {
    kind: TrackKind,
    label: String,
    language: String,
    mode: TrackMode,
    ready_state: ReadyState,
    cues: CueStore,
    parse_options: ParseOptions,
    generation: u64,
    on_error: Option<Box<dyn FnMut(&CoreError)>>,
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track")
            .field("kind", &self.kind)
            .field("label", &self.label)
            .field("language", &self.language)
            .field("mode", &self.mode)
            .field("ready_state", &self.ready_state)
            .field("cues", &self.cues.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Track {
    /// Create a track.
    ///
    /// Metadata tracks always parse with markup processing disabled, so
    /// their payloads stay raw for the host to interpret.
    #[must_use]
    pub fn new(kind: TrackKind, label: impl Into<String>, language: impl Into<String>) -> Self {
        let parse_options = ParseOptions {
            process_markup: kind != TrackKind::Metadata,
            ..ParseOptions::default()
        };
        Self {
            kind,
            label: label.into(),
            language: language.into(),
            mode: TrackMode::default(),
            ready_state: ReadyState::default(),
            cues: CueStore::new(),
            parse_options,
            generation: 0,
            on_error: None,
        }
    }

    /// Create a track from a kind name.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownKind`] for an unrecognised name; this is
    /// a caller error, not tolerated input.
    pub fn with_kind_name(
        kind: &str,
        label: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let kind = TrackKind::from_name(kind).ok_or_else(|| CoreError::UnknownKind(kind.into()))?;
        Ok(Self::new(kind, label, language))
    }

    /// Track kind.
    #[must_use]
    pub const fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// BCP-47 language tag text.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Current display mode.
    #[must_use]
    pub const fn mode(&self) -> TrackMode {
        self.mode
    }

    /// Current load state.
    #[must_use]
    pub const fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Parsed cues.
    #[must_use]
    pub const fn cues(&self) -> &CueStore {
        &self.cues
    }

    /// Install an error hook, fired on load failure.
    pub fn set_error_hook(&mut self, hook: impl FnMut(&CoreError) + 'static) {
        self.on_error = Some(Box::new(hook));
    }

    /// Change the display mode.
    ///
    /// Disabling clears the installed cues and resets the load state, so a
    /// re-enable fetches fresh. Enabling does not load by itself; the host
    /// checks [`needs_load`](Self::needs_load) and drives
    /// [`begin_load`](Self::begin_load).
    pub fn set_mode(&mut self, mode: TrackMode) {
        if mode == self.mode {
            return;
        }
        if mode == TrackMode::Disabled {
            self.cues.clear();
            self.ready_state = ReadyState::NotLoaded;
            // Outstanding tokens from the enabled era must not land.
            self.generation += 1;
        }
        self.mode = mode;
    }

    /// True when the track is enabled but has no source loaded yet.
    #[must_use]
    pub fn needs_load(&self) -> bool {
        self.mode != TrackMode::Disabled && self.ready_state == ReadyState::NotLoaded
    }

    /// Start a load attempt, superseding any in-flight one.
    pub fn begin_load(&mut self) -> LoadToken {
        self.generation += 1;
        self.ready_state = ReadyState::Loading;
        LoadToken {
            generation: self.generation,
        }
    }

    /// Commit fetched source text for a load attempt.
    ///
    /// A stale token (superseded by a later [`begin_load`](Self::begin_load)
    /// or a disable) is discarded silently and `Ok(false)` is returned. On a
    /// current token the text is parsed and installed, returning `Ok(true)`.
    ///
    /// # Errors
    ///
    /// A parse failure moves the track to [`ReadyState::Error`], fires the
    /// error hook, and propagates the error.
    pub fn commit_source(&mut self, token: LoadToken, text: &str) -> Result<bool> {
        if token.generation != self.generation {
            return Ok(false);
        }
        let mut parser = CaptionParser::new(self.parse_options);
        match parser.parse(text) {
            Ok(cues) => {
                self.cues.clear();
                for cue in cues {
                    self.cues.insert(cue);
                }
                self.ready_state = ReadyState::Loaded;
                Ok(true)
            }
            Err(err) => {
                self.ready_state = ReadyState::Error;
                if let Some(hook) = self.on_error.as_mut() {
                    hook(&err);
                }
                Err(err)
            }
        }
    }

    /// Record a failed load attempt. Stale tokens are ignored.
    pub fn fail_load(&mut self, token: LoadToken, error: &CoreError) {
        if token.generation != self.generation {
            return;
        }
        self.ready_state = ReadyState::Error;
        if let Some(hook) = self.on_error.as_mut() {
            hook(error);
        }
    }

    /// True when this track participates in active-cue tracking.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        matches!(self.mode, TrackMode::Hidden | TrackMode::Showing)
            && self.ready_state == ReadyState::Loaded
    }
}
