//! Cue placement
//!
//! Packs the active cues of one refresh into the container. Placement is
//! sequentially dependent: each placed cue carves its band out of the
//! pass-scoped [`AvailableArea`], so later cues see a smaller area and the
//! pass can never stack two cues on the same rows or columns.

use smallvec::SmallVec;

use cue_core::{Alignment, Cue, Direction, Track, TrackMode};

use crate::area::AvailableArea;
use crate::direction::{detect_direction, resolve_alignment, TextAlign, TextDirection};
use crate::measure::{strip_markup, TextMeasurer};
use crate::metrics::{ContainerMetrics, FontMetrics};
use crate::utils::LayoutError;

/// Content taller than this ratio of its box triggers overflow correction.
const OVERFLOW_RATIO: f64 = 1.2;

/// Layout tunables.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Font size as a percentage of container height
    pub font_percent: f64,
    /// Font size floor, points
    pub min_font_pt: f64,
    /// Line height floor, points
    pub min_line_pt: f64,
    /// Line height as a multiple of the font size
    pub line_height_ratio: f64,
    /// Auto-size unsized horizontal cues from their measured text width
    pub size_by_bounding_box: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            font_percent: 4.5,
            min_font_pt: 10.0,
            min_line_pt: 16.0,
            line_height_ratio: 1.5,
            size_by_bounding_box: false,
        }
    }
}

/// Placed position of one glyph of a vertical cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphGeometry {
    /// The glyph
    pub glyph: char,
    /// Left edge, px
    pub x: f64,
    /// Top edge, px
    pub y: f64,
}

/// Placement output for one cue. Pure value; holds no layout state.
#[derive(Debug, Clone, PartialEq)]
pub struct CueGeometry {
    /// Left edge, px
    pub x: f64,
    /// Top edge, px
    pub y: f64,
    /// Box width, px
    pub width: f64,
    /// Box height, px
    pub height: f64,
    /// Horizontal padding inside the box, px
    pub padding_lr: f64,
    /// Vertical padding inside the box, px
    pub padding_tb: f64,
    /// Resolved text alignment; `None` for vertical cues
    pub text_align: Option<TextAlign>,
    /// Detected text direction
    pub direction: TextDirection,
    /// Writing direction the cue was laid out with
    pub writing: Direction,
    /// Markup text rendered at the pass time
    pub rendered: String,
    /// Per-glyph placements; empty for horizontal cues
    pub glyphs: Vec<GlyphGeometry>,
}

/// Flatten the active cues of all showing, loaded tracks, in layout order.
///
/// Within a track, cues sort by start time descending (stable), so the most
/// recently started cue claims the preferred bottom rows first; tracks keep
/// their given order.
#[must_use]
pub fn gather_active<'a>(tracks: &[&'a Track], at: f64) -> Vec<&'a Cue> {
    let mut out = Vec::new();
    for track in tracks {
        if track.mode() != TrackMode::Showing || !track.is_tracking() {
            continue;
        }
        let store = track.cues();
        let mut active: SmallVec<[&Cue; 8]> = store
            .active_at(at)
            .into_iter()
            .filter_map(|i| store.get(i))
            .collect();
        active.sort_by(|a, b| {
            b.start_time()
                .partial_cmp(&a.start_time())
                .unwrap_or(core::cmp::Ordering::Equal)
        });
        out.extend(active);
    }
    out
}

/// Geometric cue layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given tunables.
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Place `cues` into the container at playback time `at`.
    ///
    /// Cues whose payload renders to nothing at `at` are skipped. Output
    /// order matches input order.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidDimensions`] when the container width or height
    /// is not positive.
    pub fn layout(
        &self,
        cues: &[&Cue],
        metrics: &ContainerMetrics,
        at: f64,
        measurer: &dyn TextMeasurer,
    ) -> Result<Vec<CueGeometry>, LayoutError> {
        if !metrics.is_usable() {
            return Err(LayoutError::InvalidDimensions);
        }

        let font = FontMetrics::compute(
            metrics,
            self.config.font_percent,
            self.config.min_font_pt,
            self.config.min_line_pt,
            self.config.line_height_ratio,
        );
        let mut area = AvailableArea::reset(metrics);

        let mut placed = Vec::with_capacity(cues.len());
        for cue in cues {
            let rendered = cue.render_text(Some(at));
            let text = strip_markup(&rendered);
            if text.trim().is_empty() {
                continue;
            }

            let geometry = if cue.direction().is_vertical() {
                place_vertical(cue, &rendered, &text, &mut area, metrics, &font)
            } else {
                self.place_horizontal(cue, &rendered, &text, &mut area, metrics, &font, measurer)
            };
            placed.push(geometry);
        }
        Ok(placed)
    }

    #[allow(clippy::too_many_arguments)]
    fn place_horizontal(
        &self,
        cue: &Cue,
        rendered: &str,
        text: &str,
        area: &mut AvailableArea,
        metrics: &ContainerMetrics,
        font: &FontMetrics,
        measurer: &dyn TextMeasurer,
    ) -> CueGeometry {
        let padding_lr = (metrics.width / 100.0).floor();
        let padding_tb = 0.0;
        let box_height = font.line_px;

        // Size resolution: explicit setting, else measured bounding box
        // (when enabled), else the full span.
        let mut auto_sized = false;
        let mut bbox_percent = 100.0;
        let mut size = cue.size().unwrap_or_else(|| {
            if self.config.size_by_bounding_box && area.width > 0.0 {
                let measured = measurer.content_width(text, font);
                bbox_percent = (measured / area.width * 100.0).floor().min(100.0);
                auto_sized = true;
                bbox_percent
            } else {
                100.0
            }
        });
        if auto_sized {
            if let Some(text_position) = cue.text_position().value() {
                let shrunk = size - text_position;
                size = if shrunk < bbox_percent {
                    bbox_percent
                } else {
                    shrunk
                };
            }
        }

        // Snapped cues size against what is left; percentage-positioned
        // cues size against the whole container.
        let (origin, basis) = if cue.snap_to_lines() {
            (area.left, area.width)
        } else {
            (metrics.left, metrics.width)
        };
        let width = (basis * size / 100.0).max(0.0);
        let free = (basis - width).max(0.0);

        let x = match cue.text_position().value() {
            Some(text_position) => origin + free * (text_position / 100.0),
            None => origin + free / 2.0,
        };

        let line_position = cue.line_position().value().unwrap_or(100.0);
        let mut y = if cue.snap_to_lines() {
            let rows = font.rows_in(area.height).max(1.0);
            area.top + (rows - 1.0) * font.line_px
        } else {
            metrics.top
                + (metrics.height - (metrics.control_height + box_height + 2.0 * padding_tb))
                    * (line_position / 100.0)
        };

        let inner_width = (width - 2.0 * padding_lr).max(1.0);
        let content_height = measurer.content_height(text, inner_width, font);
        let mut height = box_height;
        if content_height > box_height * OVERFLOW_RATIO {
            if cue.snap_to_lines() {
                // Grow by whole rows, shifting up one row per extra line so
                // the cue's bottom edge stays put.
                let rows_needed = (content_height / font.line_px).ceil().max(1.0);
                height = rows_needed * font.line_px;
                y = (y - (rows_needed - 1.0) * font.line_px).max(area.top);
            } else {
                height = content_height + 2.0 * padding_tb;
                y = metrics.top
                    + (metrics.height - (metrics.control_height + height + 2.0 * padding_tb))
                        * (line_position / 100.0);
            }
        }

        area.consume_rows(y, height);

        let direction = detect_direction(text);
        CueGeometry {
            x,
            y,
            width,
            height,
            padding_lr,
            padding_tb,
            text_align: Some(resolve_alignment(cue.alignment(), direction)),
            direction,
            writing: cue.direction(),
            rendered: rendered.to_string(),
            glyphs: Vec::new(),
        }
    }
}

fn place_vertical(
    cue: &Cue,
    rendered: &str,
    text: &str,
    area: &mut AvailableArea,
    metrics: &ContainerMetrics,
    font: &FontMetrics,
) -> CueGeometry {
    let padding_lr = 0.0;
    let padding_tb = (metrics.height / 100.0).floor();

    let glyphs: Vec<char> = text.chars().filter(|c| *c != '\n').collect();

    let size = cue.size().unwrap_or(100.0);
    let box_height = area.height * size / 100.0;
    let glyphs_per_column = (((box_height - 2.0 * padding_tb) / font.font_px).floor())
        .max(1.0) as usize;
    let columns = glyphs.len().div_ceil(glyphs_per_column).max(1);
    let width = columns as f64 * font.column_px;

    let x = if cue.snap_to_lines() {
        match cue.direction() {
            Direction::VerticalLr => area.left,
            _ => area.right - width,
        }
    } else {
        let line_position = cue.line_position().value().unwrap_or(100.0);
        let free = (metrics.width - width).max(0.0);
        let offset = free * (line_position / 100.0);
        match cue.direction() {
            Direction::VerticalLr => metrics.left + offset,
            _ => metrics.left + free - offset,
        }
    };

    let free_height = (area.height - box_height).max(0.0);
    let y = match cue.text_position().value() {
        Some(text_position) => area.top + free_height * (text_position / 100.0),
        None => area.top + free_height / 2.0,
    };

    let mut placed_glyphs = Vec::with_capacity(glyphs.len());
    for (i, glyph) in glyphs.iter().enumerate() {
        let column = i / glyphs_per_column;
        let row = i % glyphs_per_column;
        let column_x = match cue.direction() {
            Direction::VerticalLr => x + column as f64 * font.column_px,
            _ => x + width - (column as f64 + 1.0) * font.column_px,
        };

        // A final short column distributes its shortfall per the cue's
        // alignment; full columns have no shortfall.
        let in_column = glyphs_per_column.min(glyphs.len() - column * glyphs_per_column);
        let shortfall = (glyphs_per_column - in_column) as f64 * font.font_px;
        let align_offset = match cue.alignment() {
            Alignment::Start => 0.0,
            Alignment::Middle => shortfall / 2.0,
            Alignment::End => shortfall,
        };

        placed_glyphs.push(GlyphGeometry {
            glyph: *glyph,
            x: column_x,
            y: y + padding_tb + align_offset + row as f64 * font.font_px,
        });
    }

    area.consume_columns(x, width);

    CueGeometry {
        x,
        y,
        width,
        height: box_height,
        padding_lr,
        padding_tb,
        text_align: None,
        direction: TextDirection::Ltr,
        writing: cue.direction(),
        rendered: rendered.to_string(),
        glyphs: placed_glyphs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MonospaceMeasurer;
    use ahash::AHashMap;
    use cue_core::CuePayload;

    fn metrics() -> ContainerMetrics {
        ContainerMetrics::bare(1280.0, 720.0)
    }

    fn cue(id: &str, text: &str, settings: &[(&str, &str)]) -> Cue {
        let map: AHashMap<String, String> = settings
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut cue = Cue::new(id, 0.0, 10.0, CuePayload::Raw(text.to_string()));
        cue.apply_settings(&map);
        cue
    }

    fn layout(cues: &[&Cue]) -> Vec<CueGeometry> {
        LayoutEngine::new(LayoutConfig::default())
            .layout(cues, &metrics(), 1.0, &MonospaceMeasurer::default())
            .unwrap()
    }

    #[test]
    fn degenerate_container_fails_fast() {
        let engine = LayoutEngine::new(LayoutConfig::default());
        let result = engine.layout(
            &[],
            &ContainerMetrics::bare(0.0, 720.0),
            0.0,
            &MonospaceMeasurer::default(),
        );
        assert!(matches!(result, Err(LayoutError::InvalidDimensions)));
    }

    #[test]
    fn single_cue_lands_on_the_bottom_row() {
        let cue = cue("1", "Hello", &[]);
        let placed = layout(&[&cue]);
        assert_eq!(placed.len(), 1);
        let geometry = &placed[0];
        assert!((geometry.y + geometry.height - 720.0).abs() < geometry.height);
        assert!((geometry.width - 1280.0).abs() < 1e-9);
    }

    #[test]
    fn stacked_cues_never_overlap() {
        let cues: Vec<Cue> = (0..4)
            .map(|i| cue(&i.to_string(), "line", &[]))
            .collect();
        let refs: Vec<&Cue> = cues.iter().collect();
        let placed = layout(&refs);
        assert_eq!(placed.len(), 4);
        for (i, a) in placed.iter().enumerate() {
            for b in placed.iter().skip(i + 1) {
                let vertical_overlap = a.y < b.y + b.height && a.y + a.height > b.y;
                assert!(!vertical_overlap, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn explicit_size_narrows_the_box() {
        let cue = cue("1", "Hello", &[("S", "40")]);
        let placed = layout(&[&cue]);
        assert!((placed[0].width - 1280.0 * 0.4).abs() < 1e-9);
        // Auto text position centres the narrowed box.
        assert!((placed[0].x - (1280.0 - placed[0].width) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn percentage_line_position_places_from_formula() {
        let cue = cue("1", "Hello", &[("L", "10%")]);
        let placed = layout(&[&cue]);
        let geometry = &placed[0];
        let expected = (720.0 - geometry.height) * 0.10;
        assert!((geometry.y - expected).abs() < 1e-6);
    }

    #[test]
    fn long_content_grows_upward_in_snap_mode() {
        let long_text = "word ".repeat(120);
        let short = cue("a", "short", &[]);
        let long = cue("b", &long_text, &[]);
        let placed_short = layout(&[&short]);
        let placed_long = layout(&[&long]);
        assert!(placed_long[0].height > placed_short[0].height);
        assert!(placed_long[0].y < placed_short[0].y);
    }

    #[test]
    fn rtl_cue_mirrors_alignment() {
        let cue = cue("1", "שלום עולם", &[("A", "start")]);
        let placed = layout(&[&cue]);
        assert_eq!(placed[0].direction, TextDirection::Rtl);
        assert_eq!(placed[0].text_align, Some(TextAlign::Right));
    }

    #[test]
    fn vertical_cue_produces_glyph_columns() {
        let cue = cue("1", "vertical text here", &[("D", "vertical")]);
        let placed = layout(&[&cue]);
        let geometry = &placed[0];
        assert_eq!(geometry.writing, Direction::VerticalRl);
        assert!(geometry.text_align.is_none());
        assert_eq!(geometry.glyphs.len(), "vertical text here".chars().count());
        // Right-growing vertical text hugs the right edge.
        assert!((geometry.x + geometry.width - 1280.0).abs() < 1e-9);
        // Glyph y positions advance down each column.
        assert!(geometry.glyphs[1].y > geometry.glyphs[0].y);
    }

    #[test]
    fn vertical_lr_cue_hugs_the_left_edge() {
        let cue = cue("1", "text", &[("D", "vertical-lr")]);
        let placed = layout(&[&cue]);
        assert!((placed[0].x - 0.0).abs() < 1e-9);
    }

    #[test]
    fn empty_payloads_are_skipped() {
        let cue = cue("1", "   ", &[]);
        assert!(layout(&[&cue]).is_empty());
    }

    #[test]
    fn mixed_directions_share_one_pass() {
        let horizontal = cue("h", "bottom text", &[]);
        let vertical = cue("v", "side text", &[("D", "vertical")]);
        let placed = layout(&[&vertical, &horizontal]);
        assert_eq!(placed.len(), 2);
        // The vertical cue consumed the right edge, so the horizontal cue's
        // box fits in the remaining width.
        assert!(placed[1].width < 1280.0);
    }
}
