//! Text measurement seam
//!
//! Layout needs the pixel extent of rendered cue text, which depends on the
//! host's fonts. [`TextMeasurer`] is the seam for that capability;
//! [`MonospaceMeasurer`] is a deterministic implementation for tests and
//! headless use.

use crate::metrics::FontMetrics;

/// External text-measurement capability.
pub trait TextMeasurer {
    /// Unconstrained width of `text` laid out on one line per newline, px.
    fn content_width(&self, text: &str, metrics: &FontMetrics) -> f64;

    /// Height of `text` wrapped to `width`, px.
    fn content_height(&self, text: &str, width: f64, metrics: &FontMetrics) -> f64;
}

/// Fixed-advance measurer: every glyph advances by a configurable ratio of
/// the font pixel size.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasurer {
    /// Glyph advance as a fraction of `font_px`
    pub advance_ratio: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self { advance_ratio: 0.5 }
    }
}

impl MonospaceMeasurer {
    fn advance(&self, metrics: &FontMetrics) -> f64 {
        (self.advance_ratio * metrics.font_px).max(1.0)
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn content_width(&self, text: &str, metrics: &FontMetrics) -> f64 {
        let longest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        longest as f64 * self.advance(metrics)
    }

    fn content_height(&self, text: &str, width: f64, metrics: &FontMetrics) -> f64 {
        let advance = self.advance(metrics);
        let per_line = ((width / advance).floor()).max(1.0) as usize;

        let mut rows = 0usize;
        for line in text.lines() {
            let glyphs = line.chars().count();
            rows += glyphs.div_ceil(per_line).max(1);
        }
        rows.max(1) as f64 * metrics.line_px
    }
}

/// Strip markup from rendered cue text for measurement and glyph splitting:
/// `<br />` markers become newlines, remaining tags are removed, and the
/// tokenizer's entity escapes are reversed so each glyph is one char.
#[must_use]
pub fn strip_markup(rendered: &str) -> String {
    let text = rendered.replace("<br />", "\n");

    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ContainerMetrics;

    fn metrics() -> FontMetrics {
        FontMetrics::compute(&ContainerMetrics::bare(1280.0, 720.0), 4.5, 10.0, 16.0, 1.5)
    }

    #[test]
    fn width_uses_longest_line() {
        let m = metrics();
        let measurer = MonospaceMeasurer::default();
        let narrow = measurer.content_width("hi", &m);
        let wide = measurer.content_width("hi\nhello there", &m);
        assert!(wide > narrow);
    }

    #[test]
    fn height_grows_when_constrained() {
        let m = metrics();
        let measurer = MonospaceMeasurer::default();
        let text = "a somewhat long caption line";
        let unwrapped = measurer.content_height(text, 10_000.0, &m);
        let wrapped = measurer.content_height(text, 80.0, &m);
        assert!((unwrapped - m.line_px).abs() < 1e-9);
        assert!(wrapped > unwrapped);
    }

    #[test]
    fn strip_markup_removes_tags_and_unescapes() {
        let rendered = "<q data-voice=\"A\">one<br />two &amp; three</q>";
        assert_eq!(strip_markup(rendered), "one\ntwo & three");
    }
}
