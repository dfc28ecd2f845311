//! Named frame presets: an opening size plus the frame's rabbet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::PhysicalSize;

pub type PresetResult<T> = std::result::Result<T, PresetError>;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("preset name is empty")]
    EmptyName,
    #[error("preset {name} has a non-positive {field}: {value}")]
    InvalidDimension {
        name: String,
        field: &'static str,
        value: f64,
    },
    #[error("failed to parse presets")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize presets")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    #[serde(alias = "w")]
    pub aperture_width: f64,
    #[serde(alias = "h")]
    pub aperture_height: f64,
    #[serde(alias = "r", default = "default_rabbet")]
    pub rabbet_width: f64,
}

fn default_rabbet() -> f64 {
    0.25
}

impl Preset {
    pub const fn new(aperture: PhysicalSize, rabbet_width: f64) -> Self {
        Self {
            aperture_width: aperture.width,
            aperture_height: aperture.height,
            rabbet_width,
        }
    }

    pub const fn aperture(&self) -> PhysicalSize {
        PhysicalSize::new(self.aperture_width, self.aperture_height)
    }

    fn validate(&self, name: &str) -> PresetResult<()> {
        for (field, value) in [
            ("aperture width", self.aperture_width),
            ("aperture height", self.aperture_height),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PresetError::InvalidDimension {
                    name: name.to_string(),
                    field,
                    value,
                });
            }
        }
        if !(self.rabbet_width.is_finite() && self.rabbet_width >= 0.0) {
            return Err(PresetError::InvalidDimension {
                name: name.to_string(),
                field: "rabbet width",
                value: self.rabbet_width,
            });
        }
        Ok(())
    }
}

/// Where presets live; persistence is up to the implementation.
pub trait PresetStore {
    /// Preset names in sorted order.
    fn names(&self) -> Vec<String>;
    fn get(&self, name: &str) -> Option<Preset>;
    fn save(&mut self, name: &str, preset: Preset) -> PresetResult<()>;
    /// Returns whether a preset was removed.
    fn remove(&mut self, name: &str) -> bool;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPresetStore {
    presets: BTreeMap<String, Preset>,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a `{ "name": { "aperture_width": .., .. } }` map.
    pub fn from_json(raw: &str) -> PresetResult<Self> {
        let presets: BTreeMap<String, Preset> =
            serde_json::from_str(raw).map_err(PresetError::Parse)?;
        for (name, preset) in &presets {
            preset.validate(name)?;
        }
        Ok(Self { presets })
    }

    pub fn to_json(&self) -> PresetResult<String> {
        serde_json::to_string_pretty(&self.presets).map_err(PresetError::Serialize)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl PresetStore for MemoryPresetStore {
    fn names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<Preset> {
        self.presets.get(name).copied()
    }

    fn save(&mut self, name: &str, preset: Preset) -> PresetResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetError::EmptyName);
        }
        preset.validate(name)?;
        tracing::debug!(name, "preset saved");
        self.presets.insert(name.to_string(), preset);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> bool {
        self.presets.remove(name).is_some()
    }
}
