//! Timestamp line recognisers
//!
//! Each caption dialect has its own timing-line shape. The recognisers are
//! independent and tried in a fixed priority order; the first match wins and
//! any trailing unmatched text becomes the cue settings string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::timestamp_seconds;

/// SRT / WebVTT arrow form: `[hh:]mm:ss.fff --> [hh:]mm:ss.fff settings`.
static SRT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{2})?:?(\d{2}):(\d{2})[.,](\d+)\s+-->\s+(\d{2})?:?(\d{2}):(\d{2})[.,](\d+)\s*(.*)",
    )
    .unwrap()
});

/// SUB form: dot decimal, comma-separated interval.
static SUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d+),(\d{2}):(\d{2}):(\d{2})\.(\d+)\s*(.*)").unwrap()
});

/// SBV form: like SUB but with unbounded hour digits.
static SBV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d+),(\d+):(\d{2}):(\d{2})\.(\d+)\s*(.*)").unwrap()
});

/// Google transcript form: `start +duration settings`.
static GOOGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d.]+)\s+\+([\d.]+)\s*(.*)").unwrap());

/// LRC lyric form: `[mm:ss.cc]text` (optionally `[hh:mm:ss.cc]`).
static LRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\[(\d{2})?:?(\d{2}):(\d{2})\.(\d{2})\]\s*(.*?)$").unwrap()
});

/// A recognised timing line.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingMatch {
    /// Cue start, in seconds
    pub start: f64,
    /// Cue end, in seconds (LRC leaves this equal to `start`; the parser
    /// resolves it afterwards)
    pub end: f64,
    /// Trailing unmatched text (cue settings, or the lyric text for LRC)
    pub settings: String,
}

/// One timing-line dialect recogniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingGrammar {
    /// SRT / WebVTT `-->` form
    Srt,
    /// SUB comma-separated form
    Sub,
    /// SBV form with unbounded hours
    Sbv,
    /// Google `start +duration` form
    Google,
    /// LRC bracketed lyric form
    Lrc,
}

/// Priority order for block-structured dialects. LRC is excluded: it is a
/// whole-file dialect selected up front, never sniffed per block.
pub const BLOCK_GRAMMARS: [TimingGrammar; 4] = [
    TimingGrammar::Srt,
    TimingGrammar::Sub,
    TimingGrammar::Sbv,
    TimingGrammar::Google,
];

impl TimingGrammar {
    /// Try to recognise `line` as a timing line of this dialect.
    #[must_use]
    pub fn recognise(self, line: &str) -> Option<TimingMatch> {
        match self {
            Self::Srt => interval_match(&SRT, line),
            Self::Sub => interval_match(&SUB, line),
            Self::Sbv => interval_match(&SBV, line),
            Self::Google => {
                let caps = GOOGLE.captures(line)?;
                let start = caps.get(1)?.as_str().parse::<f64>().ok()?;
                let duration = caps.get(2)?.as_str().parse::<f64>().ok()?;
                Some(TimingMatch {
                    start,
                    end: start + duration,
                    settings: caps.get(3).map_or("", |m| m.as_str()).to_string(),
                })
            }
            Self::Lrc => {
                let caps = LRC.captures(line)?;
                let start = timestamp_seconds(
                    caps.get(1).map(|m| m.as_str()),
                    caps.get(2).map(|m| m.as_str()),
                    caps.get(3).map(|m| m.as_str()),
                    caps.get(4).map(|m| m.as_str()),
                );
                Some(TimingMatch {
                    start,
                    end: start,
                    settings: caps.get(5).map_or("", |m| m.as_str()).to_string(),
                })
            }
        }
    }
}

/// Try the block grammars in priority order.
#[must_use]
pub fn recognise_block_timing(line: &str) -> Option<TimingMatch> {
    BLOCK_GRAMMARS
        .iter()
        .find_map(|grammar| grammar.recognise(line))
}

/// Shared eight-group interval shape: two `h? m s frac` halves and a
/// trailing settings capture.
fn interval_match(pattern: &Regex, line: &str) -> Option<TimingMatch> {
    let caps = pattern.captures(line)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str());
    let start = timestamp_seconds(group(1), group(2), group(3), group(4));
    let end = timestamp_seconds(group(5), group(6), group(7), group(8));
    Some(TimingMatch {
        start,
        end,
        settings: group(9).unwrap_or("").to_string(),
    })
}
