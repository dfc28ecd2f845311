use serde::{Deserialize, Serialize};

use crate::geometry::{PhysicalSize, Rgb};
use crate::normalized::NormalizedRect;
use crate::source::SourceImage;
use crate::units::{Unit, CUT_TOLERANCE};

use super::borders::{Borders, Edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowMode {
    /// The visible opening is given; the art is fitted inside it.
    #[default]
    FixedFrame,
    /// The art size is given; borders are added around it.
    FixedArt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedSide {
    #[default]
    None,
    Top,
    Bottom,
    Left,
    Right,
}

impl FixedSide {
    pub const fn edge(self) -> Option<Edge> {
        match self {
            Self::None => None,
            Self::Top => Some(Edge::Top),
            Self::Bottom => Some(Edge::Bottom),
            Self::Left => Some(Edge::Left),
            Self::Right => Some(Edge::Right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Center,
    TopLeft,
    BottomRight,
}

impl Alignment {
    /// Portion of `slack` that goes to the leading (left or top) side.
    pub fn leading_share(self, slack: f64) -> f64 {
        match self {
            Self::Center => slack / 2.0,
            Self::TopLeft => 0.0,
            Self::BottomRight => slack,
        }
    }
}

/// Gutter rules for [`WorkflowMode::FixedFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatConstraint {
    pub fixed_side: FixedSide,
    pub fixed_value: f64,
    pub match_opposite: bool,
    pub min_gutter: f64,
    pub alignment: Alignment,
}

impl Default for MatConstraint {
    fn default() -> Self {
        Self {
            fixed_side: FixedSide::None,
            fixed_value: 2.0,
            match_opposite: true,
            min_gutter: 1.5,
            alignment: Alignment::Center,
        }
    }
}

impl MatConstraint {
    /// Minimum border per side before the art is placed.
    pub fn resolve_gutters(&self) -> Borders {
        let mut gutters = Borders::uniform(self.min_gutter);
        if let Some(edge) = self.fixed_side.edge() {
            gutters.set(edge, self.fixed_value);
            if self.match_opposite {
                gutters.set(edge.opposite(), self.fixed_value);
            }
        }
        gutters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameProfile {
    pub face_width: f64,
    pub rabbet_width: f64,
}

impl Default for FrameProfile {
    fn default() -> Self {
        Self {
            face_width: 0.75,
            rabbet_width: 0.25,
        }
    }
}

impl FrameProfile {
    pub const fn new(face_width: f64, rabbet_width: f64) -> Self {
        Self {
            face_width,
            rabbet_width,
        }
    }

    /// Clearance the mat is cut under the glass size.
    pub const fn tolerance(&self) -> f64 {
        CUT_TOLERANCE
    }

    /// Mat width hidden behind the rabbet lip on each side.
    pub fn hidden_reveal(&self) -> f64 {
        self.rabbet_width - self.tolerance() / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mounting {
    pub print_border: f64,
}

impl Default for Mounting {
    fn default() -> Self {
        Self { print_border: 0.25 }
    }
}

/// Rendering references echoed into the layout untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub mat_color: Rgb,
    pub frame_color: Rgb,
    pub frame_texture: Option<String>,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            mat_color: Rgb::new(0xFB, 0xFB, 0xF9),
            frame_color: Rgb::new(0x3C, 0x28, 0x1E),
            frame_texture: None,
        }
    }
}

/// Everything the engine reads for one computation. All lengths are inches.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInput {
    pub mode: WorkflowMode,
    /// Visible opening, authoritative in [`WorkflowMode::FixedFrame`].
    pub aperture: PhysicalSize,
    /// Physical art size, authoritative in [`WorkflowMode::FixedArt`].
    pub art: PhysicalSize,
    pub mat_rules: MatConstraint,
    /// Explicit borders used in [`WorkflowMode::FixedArt`].
    pub borders: Borders,
    pub no_mat: bool,
    pub link_all: bool,
    pub profile: FrameProfile,
    pub mounting: Mounting,
    pub unit: Unit,
    pub image: Option<SourceImage>,
    pub crop: NormalizedRect,
    pub appearance: Appearance,
}

impl Default for EngineInput {
    fn default() -> Self {
        Self {
            mode: WorkflowMode::FixedFrame,
            aperture: PhysicalSize::new(16.0, 20.0),
            art: PhysicalSize::new(10.0, 8.0),
            mat_rules: MatConstraint::default(),
            borders: Borders::uniform(2.0),
            no_mat: false,
            link_all: true,
            profile: FrameProfile::default(),
            mounting: Mounting::default(),
            unit: Unit::Inches,
            image: None,
            crop: NormalizedRect::FULL,
            appearance: Appearance::default(),
        }
    }
}

impl EngineInput {
    /// Pixel aspect of the cropped region, or `None` without an image.
    pub fn cropped_aspect(&self) -> Option<f64> {
        self.image.map(|image| self.crop.pixel_aspect(image))
    }

    /// The no-mat option only applies when the art size drives the layout.
    pub fn effective_no_mat(&self) -> bool {
        self.no_mat && self.mode == WorkflowMode::FixedArt
    }
}
