use crate::fit::FitMetrics;
use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};
use crate::normalized::{NormalizedRect, MIN_EXTENT};
use crate::source::SourceImage;

use super::listeners::{Listeners, SubscriptionId};
use super::CursorHint;

/// Manhattan distance in pixels within which a corner handle is grabbed.
pub const HANDLE_TOLERANCE_PX: f64 = 15.0;
/// Margin of the crop rectangle a freshly loaded image starts with.
pub const DEFAULT_INSET: f64 = 0.05;
/// Pixels kept free around the fitted image.
pub const CROP_VIEWPORT_PADDING: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Hit-test order: earlier corners win when handles overlap.
    pub const ALL: [Corner; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    const fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    const fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    fn point_of(self, rect: &ScreenRect) -> ScreenPoint {
        match self {
            Self::TopLeft => rect.top_left(),
            Self::TopRight => rect.top_right(),
            Self::BottomLeft => rect.bottom_left(),
            Self::BottomRight => rect.bottom_right(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CropHandle {
    Corner(Corner),
    Body,
}

impl CropHandle {
    pub const fn cursor(self) -> CursorHint {
        match self {
            Self::Corner(Corner::TopLeft | Corner::BottomRight) => CursorHint::NwseResize,
            Self::Corner(Corner::TopRight | Corner::BottomLeft) => CursorHint::NeswResize,
            Self::Body => CursorHint::Move,
        }
    }
}

/// Aspect lock applied to corner drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropAspect {
    #[default]
    Free,
    /// Width to height in image pixels.
    Ratio(u32, u32),
    /// The full image's own aspect.
    Original,
}

impl CropAspect {
    pub fn label(self) -> String {
        match self {
            Self::Free => "Free".to_string(),
            Self::Ratio(w, h) => format!("{w}:{h}"),
            Self::Original => "Original".to_string(),
        }
    }

    /// Ratio expressed in normalized units of `image`, so that a normalized
    /// `width / height` equal to it has the requested pixel aspect.
    pub fn normalized_ratio(self, image: SourceImage) -> Option<f64> {
        let pixel_ratio = match self {
            Self::Free => return None,
            Self::Ratio(_, 0) | Self::Ratio(0, _) => return None,
            Self::Ratio(w, h) => f64::from(w) / f64::from(h),
            Self::Original => image.aspect(),
        };
        Some(pixel_ratio / image.aspect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CropDrag {
    Idle,
    Resizing {
        corner: Corner,
        origin: NormalizedRect,
        start: ScreenPoint,
    },
    Moving {
        origin: NormalizedRect,
        start: ScreenPoint,
    },
}

/// Crop rectangle editor over a displayed source image.
#[derive(Debug)]
pub struct CropSelector {
    image: Option<SourceImage>,
    rect: NormalizedRect,
    viewport: ScreenSize,
    metrics: Option<FitMetrics>,
    aspect: CropAspect,
    drag: CropDrag,
    listeners: Listeners<NormalizedRect>,
}

impl Default for CropSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl CropSelector {
    pub fn new() -> Self {
        Self {
            image: None,
            rect: NormalizedRect::inset(DEFAULT_INSET),
            viewport: ScreenSize::default(),
            metrics: None,
            aspect: CropAspect::Free,
            drag: CropDrag::Idle,
            listeners: Listeners::default(),
        }
    }

    pub fn rect(&self) -> NormalizedRect {
        self.rect
    }

    pub fn image(&self) -> Option<SourceImage> {
        self.image
    }

    pub fn aspect(&self) -> CropAspect {
        self.aspect
    }

    pub fn metrics(&self) -> Option<FitMetrics> {
        self.metrics
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, CropDrag::Idle)
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&NormalizedRect) + 'static,
    {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Loads a new image and resets the selection to the default inset.
    pub fn set_image(&mut self, image: SourceImage) {
        self.image = Some(image);
        self.rect = NormalizedRect::inset(DEFAULT_INSET);
        self.drag = CropDrag::Idle;
        self.refit();
        if let Some(ratio) = self.aspect.normalized_ratio(image) {
            self.rect = conform_centered(self.rect, ratio);
        }
        tracing::debug!(
            width = image.width,
            height = image.height,
            "crop selector image set"
        );
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.rect = NormalizedRect::inset(DEFAULT_INSET);
        self.drag = CropDrag::Idle;
        self.metrics = None;
    }

    pub fn set_viewport(&mut self, viewport: ScreenSize) {
        self.viewport = viewport;
        self.refit();
    }

    /// Changes the aspect lock and conforms the current selection to it.
    ///
    /// Returns the new rectangle when the selection changed.
    pub fn set_aspect(&mut self, aspect: CropAspect) -> Option<NormalizedRect> {
        self.aspect = aspect;
        let ratio = self.image.and_then(|image| aspect.normalized_ratio(image))?;
        let next = conform_centered(self.rect, ratio);
        if next == self.rect {
            return None;
        }
        self.commit(next);
        Some(next)
    }

    fn refit(&mut self) {
        self.metrics = self.image.and_then(|image| {
            FitMetrics::compute(
                self.viewport,
                self.viewport.inset(CROP_VIEWPORT_PADDING),
                f64::from(image.width),
                f64::from(image.height),
            )
        });
    }

    /// On-screen rectangle of the displayed image.
    pub fn image_rect(&self) -> Option<ScreenRect> {
        self.metrics.map(|metrics| metrics.content)
    }

    /// On-screen rectangle of a normalized selection.
    pub fn to_screen_rect(&self, rect: NormalizedRect) -> Option<ScreenRect> {
        let image = self.image_rect()?;
        Some(ScreenRect::new(
            image.x + rect.x() * image.width,
            image.y + rect.y() * image.height,
            rect.width() * image.width,
            rect.height() * image.height,
        ))
    }

    pub fn normalized_to_screen(&self, x: f64, y: f64) -> Option<ScreenPoint> {
        let image = self.image_rect()?;
        Some(ScreenPoint::new(
            image.x + x * image.width,
            image.y + y * image.height,
        ))
    }

    /// Pointer position as image fractions; values outside `[0, 1]` are kept.
    pub fn screen_to_normalized(&self, point: ScreenPoint) -> Option<(f64, f64)> {
        let image = self.image_rect()?;
        Some((
            (point.x - image.x) / image.width,
            (point.y - image.y) / image.height,
        ))
    }

    pub fn handle_at(&self, point: ScreenPoint) -> Option<CropHandle> {
        let rect = self.to_screen_rect(self.rect)?;
        Corner::ALL
            .into_iter()
            .find(|corner| corner.point_of(&rect).manhattan_distance(point) < HANDLE_TOLERANCE_PX)
            .map(CropHandle::Corner)
            .or_else(|| rect.contains(point).then_some(CropHandle::Body))
    }

    pub fn cursor_at(&self, point: ScreenPoint) -> CursorHint {
        match self.drag {
            CropDrag::Resizing { corner, .. } => CropHandle::Corner(corner).cursor(),
            CropDrag::Moving { .. } => CursorHint::Move,
            CropDrag::Idle => self
                .handle_at(point)
                .map_or(CursorHint::Default, CropHandle::cursor),
        }
    }

    /// Starts a drag when `point` hits a handle.
    pub fn pointer_press(&mut self, point: ScreenPoint) -> Option<CropHandle> {
        let handle = self.handle_at(point)?;
        self.drag = match handle {
            CropHandle::Corner(corner) => CropDrag::Resizing {
                corner,
                origin: self.rect,
                start: point,
            },
            CropHandle::Body => CropDrag::Moving {
                origin: self.rect,
                start: point,
            },
        };
        tracing::debug!(?handle, "crop drag started");
        Some(handle)
    }

    /// Applies the drag for the current pointer position and emits the result.
    ///
    /// Returns `None` when idle or when the step would break the aspect lock
    /// below the minimum size.
    pub fn pointer_move(&mut self, point: ScreenPoint) -> Option<NormalizedRect> {
        let image = self.image_rect()?;
        let (origin, start) = match self.drag {
            CropDrag::Idle => return None,
            CropDrag::Resizing { origin, start, .. } | CropDrag::Moving { origin, start } => {
                (origin, start)
            }
        };
        let dx = (point.x - start.x) / image.width;
        let dy = (point.y - start.y) / image.height;
        let next = match self.drag {
            CropDrag::Resizing { corner, .. } => {
                let ratio = self
                    .image
                    .and_then(|image| self.aspect.normalized_ratio(image));
                resized_from_corner(origin, corner, dx, dy, ratio)?
            }
            _ => origin.translated(dx, dy),
        };
        self.commit(next);
        Some(next)
    }

    /// Ends the drag; returns whether one was in progress.
    pub fn pointer_release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = CropDrag::Idle;
        if was_dragging {
            tracing::debug!(rect = ?self.rect, "crop drag finished");
        }
        was_dragging
    }

    fn commit(&mut self, rect: NormalizedRect) {
        self.rect = rect;
        self.listeners.emit(&rect);
    }
}

/// Moves the corner's two edges by `(dx, dy)` keeping the opposite corner fixed.
fn resized_from_corner(
    origin: NormalizedRect,
    corner: Corner,
    dx: f64,
    dy: f64,
    ratio: Option<f64>,
) -> Option<NormalizedRect> {
    let (left, right) = if corner.moves_left() {
        resize_axis(origin.right(), origin.x() + dx, true)
    } else {
        resize_axis(origin.x(), origin.right() + dx, false)
    };
    let (top, bottom) = if corner.moves_top() {
        resize_axis(origin.bottom(), origin.y() + dy, true)
    } else {
        resize_axis(origin.y(), origin.bottom() + dy, false)
    };

    let Some(ratio) = ratio else {
        return Some(NormalizedRect::from_edges(left, top, right, bottom));
    };
    let (width, height) = fit_ratio(right - left, bottom - top, ratio);
    if width < MIN_EXTENT || height < MIN_EXTENT {
        return None;
    }
    let x = if corner.moves_left() {
        right - width
    } else {
        left
    };
    let y = if corner.moves_top() {
        bottom - height
    } else {
        top
    };
    Some(NormalizedRect::new(x, y, width, height))
}

/// Returns `(low, high)` with the moving edge kept inside `[0, 1]` and at
/// least [`MIN_EXTENT`] away from the anchor.
fn resize_axis(anchor: f64, moving: f64, moving_is_low: bool) -> (f64, f64) {
    if moving_is_low {
        (moving.min(anchor - MIN_EXTENT).max(0.0), anchor)
    } else {
        (anchor, moving.max(anchor + MIN_EXTENT).min(1.0))
    }
}

/// Largest `width / height == ratio` box inside the given extents.
fn fit_ratio(width: f64, height: f64, ratio: f64) -> (f64, f64) {
    if width / height > ratio {
        (height * ratio, height)
    } else {
        (width, width / ratio)
    }
}

fn conform_centered(rect: NormalizedRect, ratio: f64) -> NormalizedRect {
    let (width, height) = fit_ratio(rect.width(), rect.height(), ratio);
    NormalizedRect::new(
        rect.x() + (rect.width() - width) / 2.0,
        rect.y() + (rect.height() - height) / 2.0,
        width,
        height,
    )
}
