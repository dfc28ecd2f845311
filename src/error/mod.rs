use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::preset::PresetError;
use crate::source::ImageProbeError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Image(#[from] ImageProbeError),
    #[error(transparent)]
    Preset(#[from] PresetError),
    #[error("{headline} {0}", headline = .0.headline())]
    Engine(#[from] EngineError),
    #[error("failed to serialize layout")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to format report")]
    Format(#[from] std::fmt::Error),
    #[error("usage: {0}")]
    Usage(String),
}
