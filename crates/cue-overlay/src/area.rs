//! Pass-scoped available render area
//!
//! Each layout pass starts from the full container and carves a band off
//! the [`AvailableArea`] for every placed cue, so later cues can never land
//! on top of earlier ones. The area only ever shrinks within a pass; it is
//! rebuilt from the container at the start of the next pass.

use crate::metrics::ContainerMetrics;

/// Mutable rectangle the remaining cues of a pass may occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableArea {
    /// Top edge, px
    pub top: f64,
    /// Left edge, px
    pub left: f64,
    /// Right edge, px
    pub right: f64,
    /// Bottom edge, px
    pub bottom: f64,
    /// Cached `right - left`
    pub width: f64,
    /// Cached `bottom - top`
    pub height: f64,
}

impl AvailableArea {
    /// Full-container area for a fresh pass, minus the control strip
    /// reserved at the bottom.
    #[must_use]
    pub fn reset(metrics: &ContainerMetrics) -> Self {
        let height = (metrics.height - metrics.control_height).max(0.0);
        Self {
            top: metrics.top,
            left: metrics.left,
            right: metrics.left + metrics.width,
            bottom: metrics.top + height,
            width: metrics.width,
            height,
        }
    }

    /// Remove the horizontal band occupied by a placed cue.
    ///
    /// The cut keeps the larger remainder: when the band above the cue is at
    /// least as tall as the band below, the bottom edge advances up to the
    /// cue; otherwise the top edge drops below it.
    pub fn consume_rows(&mut self, y: f64, height: f64) {
        let above = y - self.top;
        let below = self.bottom - (y + height);
        if above >= below && self.bottom > y {
            self.bottom = y;
        } else {
            self.top = self.top.max(y + height);
        }
        self.height = (self.bottom - self.top).max(0.0);
    }

    /// Remove the vertical band occupied by a placed cue, keeping the larger
    /// of the left/right remainders.
    pub fn consume_columns(&mut self, x: f64, width: f64) {
        let left_band = x - self.left;
        let right_band = self.right - (x + width);
        if left_band >= right_band && self.right > x {
            self.right = x;
        } else {
            self.left = self.left.max(x + width);
        }
        self.width = (self.right - self.left).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> AvailableArea {
        AvailableArea::reset(&ContainerMetrics::bare(1000.0, 600.0))
    }

    #[test]
    fn bottom_cue_raises_bottom_edge() {
        let mut area = area();
        area.consume_rows(560.0, 40.0);
        assert!((area.bottom - 560.0).abs() < 1e-9);
        assert!((area.height - 560.0).abs() < 1e-9);
    }

    #[test]
    fn top_cue_drops_top_edge() {
        let mut area = area();
        area.consume_rows(0.0, 40.0);
        assert!((area.top - 40.0).abs() < 1e-9);
        assert!((area.height - 560.0).abs() < 1e-9);
    }

    #[test]
    fn height_shrinks_monotonically() {
        let mut area = area();
        let mut previous = area.height;
        for y in [560.0, 520.0, 0.0, 480.0] {
            area.consume_rows(y, 40.0);
            assert!(area.height < previous);
            previous = area.height;
        }
    }

    #[test]
    fn right_column_advances_right_edge() {
        let mut area = area();
        area.consume_columns(960.0, 40.0);
        assert!((area.right - 960.0).abs() < 1e-9);
        assert!((area.width - 960.0).abs() < 1e-9);
    }

    #[test]
    fn left_column_advances_left_edge() {
        let mut area = area();
        area.consume_columns(0.0, 40.0);
        assert!((area.left - 40.0).abs() < 1e-9);
        assert!((area.width - 960.0).abs() < 1e-9);
    }

    #[test]
    fn control_strip_is_excluded_from_the_start() {
        let metrics = ContainerMetrics {
            width: 1000.0,
            height: 600.0,
            top: 0.0,
            left: 0.0,
            control_height: 50.0,
        };
        let area = AvailableArea::reset(&metrics);
        assert!((area.bottom - 550.0).abs() < 1e-9);
        assert!((area.height - 550.0).abs() < 1e-9);
    }

    #[test]
    fn height_never_goes_negative() {
        let mut area = area();
        area.consume_rows(0.0, 900.0);
        assert!(area.height >= 0.0);
    }
}
