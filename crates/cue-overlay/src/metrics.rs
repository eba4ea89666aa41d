//! Container and font metrics
//!
//! [`FontMetrics::compute`] derives the pass-wide font and line-pitch values
//! from the container size. Pitches are snapped so an integer number of rows
//! (and columns, for vertical text) exactly tiles the container; every box
//! the layout emits is a whole number of these cells.

/// Host-supplied container geometry, recomputed per layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMetrics {
    /// Render area width, px
    pub width: f64,
    /// Render area height, px
    pub height: f64,
    /// Render area top offset, px
    pub top: f64,
    /// Render area left offset, px
    pub left: f64,
    /// Height reserved for playback controls at the bottom, px
    pub control_height: f64,
}

impl ContainerMetrics {
    /// Container without offsets or controls.
    #[must_use]
    pub const fn bare(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            top: 0.0,
            left: 0.0,
            control_height: 0.0,
        }
    }

    /// True when the container can host any layout at all.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Derived font and pitch values for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Font size, points
    pub font_pt: f64,
    /// Font size, pixels
    pub font_px: f64,
    /// Line height, points
    pub line_pt: f64,
    /// Row pitch, pixels, snapped to tile the container height
    pub line_px: f64,
    /// Column pitch for vertical text, pixels, snapped against the width
    pub column_px: f64,
}

impl FontMetrics {
    /// Derive metrics from the container and tunables.
    ///
    /// `font_percent` is a percentage of the container height; `min_font_pt`
    /// and `min_line_pt` floor the results. The 96:72 px/pt conversions
    /// mirror CSS reference pixels.
    #[must_use]
    pub fn compute(
        metrics: &ContainerMetrics,
        font_percent: f64,
        min_font_pt: f64,
        min_line_pt: f64,
        line_height_ratio: f64,
    ) -> Self {
        let font_pt = min_font_pt.max(metrics.height * (font_percent / 100.0) / 96.0 * 72.0);
        let font_px = (font_pt / 72.0 * 96.0).floor();

        let line_pt = min_line_pt.max((font_pt * line_height_ratio).floor());
        let mut line_px = (line_pt / 72.0 * 96.0).ceil();

        // Snap the row pitch so whole rows tile the height exactly.
        let rows = (metrics.height / line_px).floor();
        if rows > 0.0 && line_px * rows < metrics.height {
            line_px = (metrics.height / rows).floor();
        }

        let mut column_px = line_px;
        let columns = (metrics.width / line_px).floor();
        if columns > 0.0 && line_px * columns < metrics.width {
            column_px = (metrics.width / columns).ceil();
        }

        Self {
            font_pt,
            font_px,
            line_pt,
            line_px,
            column_px,
        }
    }

    /// Rows of this pitch fitting in `height`.
    #[must_use]
    pub fn rows_in(&self, height: f64) -> f64 {
        if self.line_px > 0.0 {
            (height / self.line_px).floor()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(width: f64, height: f64) -> FontMetrics {
        FontMetrics::compute(&ContainerMetrics::bare(width, height), 4.5, 10.0, 16.0, 1.5)
    }

    #[test]
    fn small_container_hits_minimums() {
        let fm = compute(320.0, 180.0);
        // 180 * 0.045 / 96 * 72 = 6.075pt, floored to the 10pt minimum.
        assert!((fm.font_pt - 10.0).abs() < 1e-9);
        assert!((fm.line_pt - 16.0).abs() < 1e-9);
    }

    #[test]
    fn large_container_scales_past_minimums() {
        let fm = compute(1920.0, 1080.0);
        assert!(fm.font_pt > 10.0);
        assert!(fm.line_pt >= (fm.font_pt * 1.5).floor());
    }

    #[test]
    fn row_pitch_tiles_height() {
        let fm = compute(1280.0, 720.0);
        let rows = (720.0 / fm.line_px).floor();
        assert!(rows >= 1.0);
        assert!(fm.line_px * rows <= 720.0);
        // Snapping leaves less than one row of slack.
        assert!(720.0 - fm.line_px * rows < fm.line_px);
    }

    #[test]
    fn column_pitch_covers_width() {
        let fm = compute(1280.0, 720.0);
        let columns = (1280.0 / fm.line_px).floor();
        assert!(fm.column_px * columns >= 1280.0);
    }
}
