//! Uniform scale-to-fit computation shared by the editors and the preview.

use crate::geometry::{ScreenPoint, ScreenRect, ScreenSize};

/// Fraction of the viewport the fitted content may occupy.
pub const FIT_MARGIN: f64 = 0.95;

/// Largest uniform scale that fits `content` (physical or pixel units) inside
/// `viewport` pixels, shrunk by [`FIT_MARGIN`]. Returns `0.0` when either
/// content axis is empty so callers can bail out before dividing.
pub fn fit_scale(viewport: ScreenSize, content_width: f64, content_height: f64) -> f64 {
    if content_width <= 0.0 || content_height <= 0.0 {
        return 0.0;
    }
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return 0.0;
    }
    (viewport.width / content_width).min(viewport.height / content_height) * FIT_MARGIN
}

/// Scale plus the centered placement of the scaled content inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitMetrics {
    pub scale: f64,
    pub content: ScreenRect,
}

impl FitMetrics {
    /// Fits content into `fit_area` and centers it within `viewport`.
    ///
    /// `fit_area` is usually the viewport minus some chrome padding; centering
    /// always uses the full viewport so padding stays symmetric.
    pub fn compute(
        viewport: ScreenSize,
        fit_area: ScreenSize,
        content_width: f64,
        content_height: f64,
    ) -> Option<Self> {
        let scale = fit_scale(fit_area, content_width, content_height);
        if scale <= 0.0 || !scale.is_finite() {
            return None;
        }
        let center = ScreenPoint::new(viewport.width / 2.0, viewport.height / 2.0);
        let content = ScreenRect::centered_on(
            center,
            content_width * scale,
            content_height * scale,
        );
        Some(Self { scale, content })
    }
}
