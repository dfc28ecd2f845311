//! Screen geometry a renderer needs to draw a layout; no drawing happens here.

use crate::engine::Layout;
use crate::fit::FitMetrics;
use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};
use crate::units::Unit;

/// Pixels kept free around the preview.
pub const PREVIEW_VIEWPORT_PADDING: f64 = 4.0;
/// Below this density the ruled grid would be unreadable and is skipped.
pub const MIN_GRID_PX_PER_INCH: f64 = 10.0;

/// Rectangles of one preview frame, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewScene {
    /// Pixels per inch.
    pub scale: f64,
    pub outer: ScreenRect,
    /// Inside edge of the frame face; the mat board shows here unless there is no mat.
    pub inner: ScreenRect,
    /// Visible art: the clip for the image.
    pub art: ScreenRect,
    /// Paper sheet centered on the art; the image fills it and is clipped to `art`.
    pub paper: ScreenRect,
    pub show_mat: bool,
}

impl PreviewScene {
    /// Fits the outer frame into `viewport` and places everything inside it.
    pub fn compute(layout: &Layout, viewport: ScreenSize) -> Option<Self> {
        let metrics = FitMetrics::compute(
            viewport,
            viewport.inset(PREVIEW_VIEWPORT_PADDING),
            layout.outer.width,
            layout.outer.height,
        )?;
        let scale = metrics.scale;
        let outer = metrics.content;
        let inner = outer.inset(layout.face_width * scale);
        let art = ScreenRect::new(
            inner.x + layout.borders.left * scale,
            inner.y + layout.borders.top * scale,
            layout.art.width * scale,
            layout.art.height * scale,
        );
        let paper = ScreenRect::centered_on(
            art.center(),
            layout.print.width * scale,
            layout.print.height * scale,
        );
        Some(Self {
            scale,
            outer,
            inner,
            art,
            paper,
            show_mat: !layout.no_mat,
        })
    }

    /// The four mitred frame sides as quads: top, bottom, left, right.
    pub fn face_polygons(&self) -> [[ScreenPoint; 4]; 4] {
        let (o, i) = (&self.outer, &self.inner);
        [
            [o.top_left(), o.top_right(), i.top_right(), i.top_left()],
            [o.bottom_left(), o.bottom_right(), i.bottom_right(), i.bottom_left()],
            [o.top_left(), o.bottom_left(), i.bottom_left(), i.top_left()],
            [o.top_right(), o.bottom_right(), i.bottom_right(), i.top_right()],
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAxis {
    /// Line of constant x, measured from the left edge.
    Vertical,
    /// Line of constant y, measured up from the bottom edge.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub axis: GridAxis,
    /// Screen coordinate of the line (x for vertical, y for horizontal).
    pub position: f64,
    pub major: bool,
    /// Distance from the origin in the grid's unit, on major lines only.
    pub label: Option<u32>,
}

/// Ruled grid over `area` at fixed physical steps for `unit`.
pub fn grid_lines(area: ScreenRect, px_per_inch: f64, unit: Unit) -> Vec<GridLine> {
    if px_per_inch.is_nan() || px_per_inch < MIN_GRID_PX_PER_INCH {
        return Vec::new();
    }
    let (step, major_every) = unit.grid_step();
    let step_px = unit.to_reference(step) * px_per_inch;

    let axis_lines = |axis: GridAxis, limit: f64| {
        (0u32..)
            .map(move |count| (count, f64::from(count) * step_px))
            .take_while(move |(_, offset)| *offset <= limit)
            .map(move |(count, offset)| {
                let major = count != 0 && count % major_every == 0;
                let position = match axis {
                    GridAxis::Vertical => area.left() + offset,
                    GridAxis::Horizontal => area.bottom() - offset,
                };
                GridLine {
                    axis,
                    position,
                    major,
                    label: major.then(|| (f64::from(count) * step).round() as u32),
                }
            })
    };

    axis_lines(GridAxis::Vertical, area.width)
        .chain(axis_lines(GridAxis::Horizontal, area.height))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compute, Borders, EngineInput, WorkflowMode};
    use crate::geometry::PhysicalSize;

    fn fixed_art_layout() -> Layout {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            art: PhysicalSize::new(10.0, 8.0),
            borders: Borders::new(2.0, 3.0, 2.0, 2.0),
            ..EngineInput::default()
        };
        compute(&input).expect("layout should compute")
    }

    #[test]
    fn preview_centers_outer_frame_in_viewport() {
        let layout = fixed_art_layout();
        let scene = PreviewScene::compute(&layout, ScreenSize::new(1000.0, 800.0))
            .expect("scene should fit");
        let center = scene.outer.center();
        assert!((center.x - 500.0).abs() < 1e-9);
        assert!((center.y - 400.0).abs() < 1e-9);
        assert!((scene.outer.width - layout.outer.width * scene.scale).abs() < 1e-9);
        assert!(scene.show_mat);
    }

    #[test]
    fn preview_art_sits_inside_inner_by_borders() {
        let layout = fixed_art_layout();
        let scene = PreviewScene::compute(&layout, ScreenSize::new(1000.0, 800.0))
            .expect("scene should fit");
        let s = scene.scale;
        assert!((scene.art.left() - scene.inner.left() - 2.0 * s).abs() < 1e-9);
        assert!((scene.art.top() - scene.inner.top() - 2.0 * s).abs() < 1e-9);
        // Inner edge is the frame's glass minus the rabbet, i.e. the aperture.
        assert!((scene.inner.width - layout.aperture.width * s).abs() < 1e-9);
        let center = scene.art.center();
        let paper_center = scene.paper.center();
        assert!((center.x - paper_center.x).abs() < 1e-9);
        assert!((center.y - paper_center.y).abs() < 1e-9);
        assert!(scene.paper.width > scene.art.width);
    }

    #[test]
    fn preview_needs_a_viewport() {
        let layout = fixed_art_layout();
        assert_eq!(PreviewScene::compute(&layout, ScreenSize::new(0.0, 0.0)), None);
    }

    #[test]
    fn face_polygons_share_corners_with_outer_rect() {
        let layout = fixed_art_layout();
        let scene = PreviewScene::compute(&layout, ScreenSize::new(600.0, 600.0))
            .expect("scene should fit");
        let polygons = scene.face_polygons();
        assert_eq!(polygons[0][0], scene.outer.top_left());
        assert_eq!(polygons[3][2], scene.inner.bottom_right());
    }

    #[test]
    fn inch_grid_marks_every_whole_inch_as_major() {
        let area = ScreenRect::new(0.0, 0.0, 40.0, 20.0);
        let lines = grid_lines(area, 20.0, Unit::Inches);
        let vertical: Vec<_> = lines
            .iter()
            .filter(|line| line.axis == GridAxis::Vertical)
            .collect();
        // 0.25 in at 20 px/in is 5 px, so 0..=40 px gives nine lines.
        assert_eq!(vertical.len(), 9);
        assert!(!vertical[0].major);
        assert!(vertical[4].major);
        assert_eq!(vertical[4].label, Some(1));
        assert_eq!(vertical[8].label, Some(2));

        let horizontal: Vec<_> = lines
            .iter()
            .filter(|line| line.axis == GridAxis::Horizontal)
            .collect();
        assert_eq!(horizontal.len(), 5);
        assert_eq!(horizontal[0].position, 20.0);
        assert_eq!(horizontal[4].position, 0.0);
    }

    #[test]
    fn millimetre_grid_labels_in_millimetres() {
        let area = ScreenRect::new(0.0, 0.0, 100.0, 10.0);
        let lines = grid_lines(area, 25.4, Unit::Millimeters);
        let majors: Vec<_> = lines
            .iter()
            .filter(|line| line.axis == GridAxis::Vertical && line.major)
            .map(|line| line.label)
            .collect();
        assert_eq!(majors.first(), Some(&Some(10)));
        assert_eq!(majors.get(1), Some(&Some(20)));
    }

    #[test]
    fn grid_is_skipped_when_too_dense() {
        let area = ScreenRect::new(0.0, 0.0, 100.0, 100.0);
        assert!(grid_lines(area, 9.9, Unit::Inches).is_empty());
    }
}
