use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Natural pixel size of the source artwork.
///
/// The engine only needs the dimensions; decoding and display stay with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Error)]
pub enum ImageProbeError {
    #[error("failed to read image dimensions: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("image has an empty dimension: {path} ({width}x{height})")]
    EmptyImage {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl SourceImage {
    /// Returns `None` for a zero-sized image since it has no usable aspect.
    pub const fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Reads only the header of an image file to learn its natural size.
pub fn probe(path: &Path) -> Result<SourceImage, ImageProbeError> {
    let (width, height) = image::image_dimensions(path).map_err(|source| ImageProbeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, width, height, "probed source image");
    SourceImage::new(width, height).ok_or_else(|| ImageProbeError::EmptyImage {
        path: path.to_path_buf(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_image_rejects_zero_dimensions() {
        assert!(SourceImage::new(0, 10).is_none());
        assert!(SourceImage::new(10, 0).is_none());
    }

    #[test]
    fn source_image_aspect_is_width_over_height() {
        let image = SourceImage::new(3000, 2000).expect("non-empty image");
        assert!((image.aspect() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn probe_reports_missing_file() {
        let path = std::env::temp_dir().join("frametamer-missing-probe-target.png");
        let err = probe(&path).expect_err("missing file should fail");
        assert!(matches!(err, ImageProbeError::Read { .. }));
    }

    #[test]
    fn probe_reads_png_dimensions() {
        let path = std::env::temp_dir().join(format!(
            "frametamer-probe-{}-{}.png",
            std::process::id(),
            line!()
        ));
        image::RgbImage::new(30, 20)
            .save(&path)
            .expect("fixture image should save");
        let probed = probe(&path).expect("png should probe");
        let _ = std::fs::remove_file(&path);
        assert_eq!(probed, SourceImage { width: 30, height: 20 });
    }
}
