use crate::engine::{apply_linkage, Borders, Edge, Layout, WorkflowMode};
use crate::fit::fit_scale;
use crate::geometry::{PhysicalSize, ScreenPoint, ScreenRect, ScreenSize};

use super::listeners::{Listeners, SubscriptionId};
use super::CursorHint;

/// Pixel distance from an aperture edge that still grabs it.
pub const EDGE_TOLERANCE_PX: f64 = 10.0;
/// Smallest border width a drag can produce, in inches.
pub const MIN_BORDER: f64 = 0.5;
/// Pixels kept free around the fitted frame.
pub const MAT_VIEWPORT_PADDING: f64 = 20.0;

/// The slice of a layout the editor draws and edits.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MatSnapshot {
    outer: PhysicalSize,
    art: PhysicalSize,
    borders: Borders,
    link_all: bool,
    enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MatDrag {
    Idle,
    Dragging { edge: Edge, last: ScreenPoint },
}

/// Lets the user drag the four edges of the aperture hole.
///
/// The editor only proposes border widths through its listeners; the
/// engine decides the resulting layout and hands it back via
/// [`MatBorderEditor::update_layout`].
#[derive(Debug)]
pub struct MatBorderEditor {
    snapshot: Option<MatSnapshot>,
    viewport: ScreenSize,
    hover: Option<Edge>,
    drag: MatDrag,
    listeners: Listeners<Borders>,
}

impl Default for MatBorderEditor {
    fn default() -> Self {
        Self::new()
    }
}

pub const fn edge_cursor(edge: Edge) -> CursorHint {
    match edge {
        Edge::Top | Edge::Bottom => CursorHint::NsResize,
        Edge::Left | Edge::Right => CursorHint::EwResize,
    }
}

impl MatBorderEditor {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            viewport: ScreenSize::default(),
            hover: None,
            drag: MatDrag::Idle,
            listeners: Listeners::default(),
        }
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Borders) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn update_layout(&mut self, layout: &Layout) {
        let enabled = layout.mode == WorkflowMode::FixedArt && !layout.no_mat;
        self.snapshot = Some(MatSnapshot {
            outer: layout.outer,
            art: layout.art,
            borders: layout.borders,
            link_all: layout.link_all,
            enabled,
        });
        if !enabled {
            self.hover = None;
            self.drag = MatDrag::Idle;
        }
    }

    pub fn set_viewport(&mut self, viewport: ScreenSize) {
        self.viewport = viewport;
    }

    /// Whether pointer input is accepted for the current layout.
    pub fn is_enabled(&self) -> bool {
        self.snapshot.is_some_and(|snapshot| snapshot.enabled)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, MatDrag::Dragging { .. })
    }

    pub fn hovered(&self) -> Option<Edge> {
        self.hover
    }

    pub fn borders(&self) -> Option<Borders> {
        self.snapshot.map(|snapshot| snapshot.borders)
    }

    /// Pixels per inch for the current viewport, `None` before a layout arrives.
    pub fn scale(&self) -> Option<f64> {
        let snapshot = self.snapshot?;
        let scale = fit_scale(
            self.viewport.inset(MAT_VIEWPORT_PADDING),
            snapshot.outer.width,
            snapshot.outer.height,
        );
        (scale > 0.0).then_some(scale)
    }

    /// Mat board area (art plus visible borders) centered in the viewport.
    pub fn mat_rect(&self) -> Option<ScreenRect> {
        let snapshot = self.snapshot?;
        let scale = self.scale()?;
        let borders = snapshot.borders;
        let center = ScreenPoint::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        Some(ScreenRect::centered_on(
            center,
            (snapshot.art.width + borders.horizontal_sum()) * scale,
            (snapshot.art.height + borders.vertical_sum()) * scale,
        ))
    }

    pub fn hole_rect(&self) -> Option<ScreenRect> {
        let snapshot = self.snapshot?;
        let scale = self.scale()?;
        let mat = self.mat_rect()?;
        Some(ScreenRect::new(
            mat.x + snapshot.borders.left * scale,
            mat.y + snapshot.borders.top * scale,
            snapshot.art.width * scale,
            snapshot.art.height * scale,
        ))
    }

    /// Edge of the hole under `point`; corners belong to no edge.
    pub fn edge_at(&self, point: ScreenPoint) -> Option<Edge> {
        if !self.is_enabled() {
            return None;
        }
        let hole = self.hole_rect()?;
        let within_x = hole.left() < point.x && point.x < hole.right();
        let within_y = hole.top() < point.y && point.y < hole.bottom();
        Edge::ALL.into_iter().find(|edge| match edge {
            Edge::Top => within_x && (point.y - hole.top()).abs() < EDGE_TOLERANCE_PX,
            Edge::Bottom => within_x && (point.y - hole.bottom()).abs() < EDGE_TOLERANCE_PX,
            Edge::Left => within_y && (point.x - hole.left()).abs() < EDGE_TOLERANCE_PX,
            Edge::Right => within_y && (point.x - hole.right()).abs() < EDGE_TOLERANCE_PX,
        })
    }

    pub fn cursor(&self) -> CursorHint {
        match self.drag {
            MatDrag::Dragging { edge, .. } => edge_cursor(edge),
            MatDrag::Idle => self.hover.map_or(CursorHint::Default, edge_cursor),
        }
    }

    pub fn pointer_press(&mut self, point: ScreenPoint) -> Option<Edge> {
        let edge = self.edge_at(point)?;
        self.hover = Some(edge);
        self.drag = MatDrag::Dragging { edge, last: point };
        tracing::debug!(?edge, "mat edge drag started");
        Some(edge)
    }

    /// Hover tracking while idle, border proposal while dragging.
    ///
    /// Returns the proposed borders for a drag step.
    pub fn pointer_move(&mut self, point: ScreenPoint) -> Option<Borders> {
        let MatDrag::Dragging { edge, last } = self.drag else {
            let hover = self.edge_at(point);
            if hover != self.hover {
                tracing::debug!(from = ?self.hover, to = ?hover, "mat edge hover changed");
                self.hover = hover;
            }
            return None;
        };
        let scale = self.scale()?;
        let mut snapshot = self.snapshot?;
        if !snapshot.enabled {
            return None;
        }

        let dx = (point.x - last.x) / scale;
        let dy = (point.y - last.y) / scale;
        let mut borders = snapshot.borders;
        match edge {
            Edge::Top => borders.top += dy,
            Edge::Bottom => borders.bottom -= dy,
            Edge::Left => borders.left += dx,
            Edge::Right => borders.right -= dx,
        }
        let borders = apply_linkage(borders.floor(MIN_BORDER), edge, snapshot.link_all);

        snapshot.borders = borders;
        self.snapshot = Some(snapshot);
        self.drag = MatDrag::Dragging { edge, last: point };
        self.listeners.emit(&borders);
        Some(borders)
    }

    pub fn pointer_release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = MatDrag::Idle;
        if was_dragging {
            tracing::debug!(borders = ?self.borders(), "mat edge drag finished");
        }
        was_dragging
    }
}
