//! Text direction detection and alignment mapping
//!
//! Horizontal cue text is classified RTL or LTR by its first strong
//! directional character; the cue's logical alignment (start/middle/end)
//! then maps to a physical alignment, mirrored under RTL.

use cue_core::Alignment;

/// Physical (resolved) text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextDirection {
    /// Left-to-right
    #[default]
    Ltr,
    /// Right-to-left
    Rtl,
}

/// Physical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// Flush left
    Left,
    /// Centered
    Center,
    /// Flush right
    Right,
}

/// Strong right-to-left character ranges: Hebrew, Arabic, Syriac, Arabic
/// Supplement, Thaana, NKo, Arabic Extended, and the presentation forms.
const RTL_RANGES: [(u32, u32); 9] = [
    (0x0590, 0x05FF),
    (0x0600, 0x06FF),
    (0x0700, 0x074F),
    (0x0750, 0x077F),
    (0x0780, 0x07BF),
    (0x07C0, 0x07FF),
    (0x08A0, 0x08FF),
    (0xFB1D, 0xFDFF),
    (0xFE70, 0xFEFF),
];

fn is_strong_rtl(c: char) -> bool {
    let cp = c as u32;
    RTL_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

fn is_strong_ltr(c: char) -> bool {
    c.is_alphabetic() && !is_strong_rtl(c)
}

/// Classify text by its first strong directional character. Text without
/// one (digits, punctuation) defaults to LTR.
#[must_use]
pub fn detect_direction(text: &str) -> TextDirection {
    for c in text.chars() {
        if is_strong_rtl(c) {
            return TextDirection::Rtl;
        }
        if is_strong_ltr(c) {
            return TextDirection::Ltr;
        }
    }
    TextDirection::Ltr
}

/// Map logical alignment to physical alignment for a direction. Start and
/// end swap sides under RTL; middle is direction-independent.
#[must_use]
pub fn resolve_alignment(alignment: Alignment, direction: TextDirection) -> TextAlign {
    match (alignment, direction) {
        (Alignment::Start, TextDirection::Ltr) | (Alignment::End, TextDirection::Rtl) => {
            TextAlign::Left
        }
        (Alignment::Middle, _) => TextAlign::Center,
        (Alignment::End, TextDirection::Ltr) | (Alignment::Start, TextDirection::Rtl) => {
            TextAlign::Right
        }
    }
}
