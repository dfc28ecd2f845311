use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::{
    Appearance, Borders, EngineInput, FrameProfile, MatConstraint, Mounting, WorkflowMode,
};
use crate::geometry::{PhysicalSize, Rgb};
use crate::normalized::NormalizedRect;
use crate::units::Unit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigPathError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Path(#[from] ConfigPathError),
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

const APP_DIR: &str = "frametamer";
const APP_CONFIG_FILE: &str = "config.json";

/// Startup defaults from `config.json`. Lengths are inches whatever `unit` says;
/// `unit` only picks the display unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub unit: Unit,
    pub mode: WorkflowMode,
    pub aperture_width: f64,
    pub aperture_height: f64,
    pub face_width: f64,
    pub rabbet_width: f64,
    pub print_border: f64,
    pub mat_rules: MatConstraint,
    pub art_width: f64,
    pub art_height: f64,
    pub borders: Borders,
    pub link_all: bool,
    pub no_mat: bool,
    pub mat_color: Rgb,
    pub frame_color: Rgb,
}

impl Default for AppConfig {
    fn default() -> Self {
        let appearance = Appearance::default();
        let profile = FrameProfile::default();
        Self {
            unit: Unit::Inches,
            mode: WorkflowMode::FixedFrame,
            aperture_width: 16.0,
            aperture_height: 20.0,
            face_width: profile.face_width,
            rabbet_width: profile.rabbet_width,
            print_border: Mounting::default().print_border,
            mat_rules: MatConstraint::default(),
            art_width: 10.0,
            art_height: 8.0,
            borders: Borders::uniform(2.0),
            link_all: true,
            no_mat: false,
            mat_color: appearance.mat_color,
            frame_color: appearance.frame_color,
        }
    }
}

impl AppConfig {
    /// Initial engine input with no image loaded.
    pub fn engine_input(&self) -> EngineInput {
        EngineInput {
            mode: self.mode,
            aperture: PhysicalSize::new(self.aperture_width, self.aperture_height),
            art: PhysicalSize::new(self.art_width, self.art_height),
            mat_rules: self.mat_rules,
            borders: self.borders,
            no_mat: self.no_mat,
            link_all: self.link_all,
            profile: FrameProfile::new(self.face_width, self.rabbet_width),
            mounting: Mounting {
                print_border: self.print_border,
            },
            unit: self.unit,
            image: None,
            crop: NormalizedRect::FULL,
            appearance: Appearance {
                mat_color: self.mat_color,
                frame_color: self.frame_color,
                frame_texture: None,
            },
        }
    }
}

pub fn load_app_config() -> AppConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_app_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_app_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> AppConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return AppConfig::default();
        }
    };
    if !path.exists() {
        return AppConfig::default();
    }
    read_app_config(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, ?path, "failed to load config.json; using defaults");
        AppConfig::default()
    })
}

/// Reads one config file, reporting read and parse failures.
pub fn read_app_config(path: &Path) -> ConfigResult<AppConfig> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
