//! Reference/display unit conversion and dual-unit formatting.
//!
//! Every physical value inside the crate is kept in the reference unit
//! (inches). Millimetres only appear at the input and output boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MM_PER_INCH: f64 = 25.4;

/// Mat cut clearance: 3 mm expressed in the reference unit.
pub const CUT_TOLERANCE: f64 = 3.0 / MM_PER_INCH;

const INCH_GRID_STEP: f64 = 0.25;
const INCH_GRID_MAJOR_EVERY: u32 = 4;
const MM_GRID_STEP: f64 = 5.0;
const MM_GRID_MAJOR_EVERY: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Unit {
    #[serde(rename = "in")]
    #[default]
    Inches,
    #[serde(rename = "mm")]
    Millimeters,
}

impl Unit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inches => "in",
            Self::Millimeters => "mm",
        }
    }

    /// Converts a value typed in this unit into the reference unit.
    pub fn to_reference(self, value: f64) -> f64 {
        match self {
            Self::Inches => value,
            Self::Millimeters => from_mm(value),
        }
    }

    /// Converts a reference-unit value into this unit for display.
    pub fn from_reference(self, value: f64) -> f64 {
        match self {
            Self::Inches => value,
            Self::Millimeters => to_mm(value),
        }
    }

    /// Minor grid spacing in this unit, and how many minor steps make a major line.
    pub const fn grid_step(self) -> (f64, u32) {
        match self {
            Self::Inches => (INCH_GRID_STEP, INCH_GRID_MAJOR_EVERY),
            Self::Millimeters => (MM_GRID_STEP, MM_GRID_MAJOR_EVERY),
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Unit {
    type Err = UnknownUnit;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" | "\"" => Ok(Self::Inches),
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
                Ok(Self::Millimeters)
            }
            _ => Err(UnknownUnit(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit: {0}")]
pub struct UnknownUnit(pub String);

pub fn to_mm(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

pub fn from_mm(mm: f64) -> f64 {
    mm / MM_PER_INCH
}

/// Formats a reference-unit value in the active unit followed by the other
/// unit in parentheses: `16.000" (406.4mm)` or `406.4mm (16.000")`.
pub fn format_dual(reference: f64, active: Unit) -> String {
    let mm = to_mm(reference);
    match active {
        Unit::Inches => format!("{reference:.3}\" ({mm:.1}mm)"),
        Unit::Millimeters => format!("{mm:.1}mm ({reference:.3}\")"),
    }
}

/// Formats a width × height pair with [`format_dual`].
pub fn format_dual_pair(width: f64, height: f64, active: Unit) -> String {
    format!(
        "{} x {}",
        format_dual(width, active),
        format_dual(height, active)
    )
}
