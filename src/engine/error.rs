use thiserror::Error;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Why a recompute produced no layout.
///
/// These are ordinary outcomes of editing, not bugs: the caller keeps showing
/// the previous layout and reports the failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid {field}: {value}")]
    InvalidInput { field: &'static str, value: f64 },
    #[error("mat too large: {available_width:.3} x {available_height:.3} left for the art")]
    MatTooLarge {
        available_width: f64,
        available_height: f64,
    },
    #[error("border too large: net art would be {net_width:.3} x {net_height:.3}")]
    BorderTooLarge { net_width: f64, net_height: f64 },
    #[error("derived {quantity} would be {value:.3}")]
    NegativeDimension { quantity: &'static str, value: f64 },
    #[error("{axis} borders do not add up to the aperture (off by {difference:e})")]
    Inconsistent { axis: &'static str, difference: f64 },
}

impl EngineError {
    /// Short message suitable for a status line.
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "Invalid input!",
            Self::MatTooLarge { .. } => "Mat too large!",
            Self::BorderTooLarge { .. } => "Border too large!",
            Self::NegativeDimension { .. } => "Frame profile too small!",
            Self::Inconsistent { .. } => "Layout inconsistent!",
        }
    }
}
