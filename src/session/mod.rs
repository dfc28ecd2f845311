//! Owns the engine input, both editors and the last good layout.
//!
//! Every input change goes through one [`Session::recompute`]. Gestures that
//! touch several fields run inside [`Session::batch`] so they collapse into a
//! single computation.

use serde::{Deserialize, Serialize};

use crate::editor::{CropAspect, CropHandle, CropSelector, CursorHint, MatBorderEditor};
use crate::engine::{
    apply_linkage, compute, Appearance, Borders, Edge, EngineError, EngineInput, FrameProfile,
    Layout, MatConstraint, Mounting, WorkflowMode,
};
use crate::geometry::{PhysicalSize, ScreenPoint, ScreenSize};
use crate::preset::Preset;
use crate::source::SourceImage;
use crate::units::Unit;

/// Border width restored on every side when the mat is switched back on.
pub const RESTORED_MAT_BORDER: f64 = 0.5;

/// Which art dimension the user typed; the other follows the image aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtDriver {
    #[default]
    Width,
    Height,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recompute {
    /// Inside a batch; the computation runs when the batch ends.
    Deferred,
    Updated,
    /// The previous layout, if any, is still current.
    Failed(EngineError),
}

impl Recompute {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

#[derive(Debug)]
pub struct Session {
    input: EngineInput,
    art_driver: ArtDriver,
    crop: CropSelector,
    mat: MatBorderEditor,
    layout: Option<Layout>,
    last_error: Option<EngineError>,
    suppress_depth: u32,
    pending: bool,
}

impl Session {
    pub fn new(input: EngineInput) -> Self {
        let mut crop = CropSelector::new();
        if let Some(image) = input.image {
            crop.set_image(image);
        }
        let mut session = Self {
            input,
            art_driver: ArtDriver::Width,
            crop,
            mat: MatBorderEditor::new(),
            layout: None,
            last_error: None,
            suppress_depth: 0,
            pending: false,
        };
        session.recompute();
        session
    }

    pub fn input(&self) -> &EngineInput {
        &self.input
    }

    /// Last successfully computed layout.
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// Failure of the most recent recompute, cleared by the next success.
    pub fn last_error(&self) -> Option<&EngineError> {
        self.last_error.as_ref()
    }

    pub fn art_driver(&self) -> ArtDriver {
        self.art_driver
    }

    pub fn crop_selector(&self) -> &CropSelector {
        &self.crop
    }

    pub fn crop_selector_mut(&mut self) -> &mut CropSelector {
        &mut self.crop
    }

    pub fn mat_editor(&self) -> &MatBorderEditor {
        &self.mat
    }

    pub fn mat_editor_mut(&mut self) -> &mut MatBorderEditor {
        &mut self.mat
    }

    pub fn recompute(&mut self) -> Recompute {
        if self.suppress_depth > 0 {
            self.pending = true;
            tracing::debug!(depth = self.suppress_depth, "recompute deferred");
            return Recompute::Deferred;
        }
        self.pending = false;
        self.input.crop = self.crop.rect();
        match compute(&self.input) {
            Ok(layout) => {
                self.mat.update_layout(&layout);
                self.layout = Some(layout);
                self.last_error = None;
                Recompute::Updated
            }
            Err(err) => {
                tracing::warn!(error = %err, "recompute failed; keeping previous layout");
                self.last_error = Some(err.clone());
                Recompute::Failed(err)
            }
        }
    }

    /// Runs `apply` with recomputes suppressed, then recomputes once.
    pub fn batch<F>(&mut self, apply: F) -> Recompute
    where
        F: FnOnce(&mut Self),
    {
        self.suppress_depth += 1;
        apply(self);
        self.suppress_depth -= 1;
        if self.suppress_depth > 0 {
            self.pending = true;
            return Recompute::Deferred;
        }
        self.recompute()
    }

    /// Edits the input directly and recomputes.
    pub fn update<F>(&mut self, edit: F) -> Recompute
    where
        F: FnOnce(&mut EngineInput),
    {
        edit(&mut self.input);
        self.recompute()
    }

    pub fn set_mode(&mut self, mode: WorkflowMode) -> Recompute {
        self.update(|input| input.mode = mode)
    }

    /// Switches the display unit; stored values stay in inches.
    pub fn set_unit(&mut self, unit: Unit) -> Recompute {
        self.update(|input| input.unit = unit)
    }

    pub fn set_aperture(&mut self, aperture: PhysicalSize) -> Recompute {
        self.update(|input| input.aperture = aperture)
    }

    /// Aperture typed in the active display unit.
    pub fn set_aperture_display(&mut self, width: f64, height: f64) -> Recompute {
        let unit = self.input.unit;
        self.set_aperture(PhysicalSize::new(
            unit.to_reference(width),
            unit.to_reference(height),
        ))
    }

    pub fn swap_aperture(&mut self) -> Recompute {
        self.update(|input| input.aperture = input.aperture.swapped())
    }

    pub fn set_mat_rules(&mut self, rules: MatConstraint) -> Recompute {
        self.update(|input| input.mat_rules = rules)
    }

    pub fn set_profile(&mut self, profile: FrameProfile) -> Recompute {
        self.update(|input| input.profile = profile)
    }

    pub fn set_mounting(&mut self, mounting: Mounting) -> Recompute {
        self.update(|input| input.mounting = mounting)
    }

    pub fn set_appearance(&mut self, appearance: Appearance) -> Recompute {
        self.update(|input| input.appearance = appearance)
    }

    pub fn set_art_driver(&mut self, driver: ArtDriver) -> Recompute {
        self.art_driver = driver;
        self.derive_art_from_driver();
        self.recompute()
    }

    pub fn set_art_width(&mut self, width: f64) -> Recompute {
        self.art_driver = ArtDriver::Width;
        self.input.art.width = width;
        self.derive_art_from_driver();
        self.recompute()
    }

    pub fn set_art_height(&mut self, height: f64) -> Recompute {
        self.art_driver = ArtDriver::Height;
        self.input.art.height = height;
        self.derive_art_from_driver();
        self.recompute()
    }

    /// Recomputes the non-driving art dimension from the cropped image aspect.
    fn derive_art_from_driver(&mut self) {
        let Some(aspect) = self.input.cropped_aspect() else {
            return;
        };
        let art = &mut self.input.art;
        match self.art_driver {
            ArtDriver::Width if art.width > 0.0 => art.height = art.width / aspect,
            ArtDriver::Height if art.height > 0.0 => art.width = art.height * aspect,
            _ => {}
        }
    }

    /// Sets one border, copying it to all four while "link all" is on.
    pub fn set_border(&mut self, edge: Edge, value: f64) -> Recompute {
        let borders = apply_linkage(
            self.input.borders.with(edge, value),
            edge,
            self.input.link_all,
        );
        self.update(|input| input.borders = borders)
    }

    pub fn set_borders(&mut self, borders: Borders) -> Recompute {
        self.update(|input| input.borders = borders)
    }

    /// Turning linkage on makes the top border the master.
    pub fn set_link_all(&mut self, link_all: bool) -> Recompute {
        self.update(|input| {
            input.link_all = link_all;
            input.borders = apply_linkage(input.borders, Edge::Top, link_all);
        })
    }

    pub fn set_no_mat(&mut self, no_mat: bool) -> Recompute {
        self.batch(|session| {
            session.input.no_mat = no_mat;
            let width = if no_mat { 0.0 } else { RESTORED_MAT_BORDER };
            session.set_borders(Borders::uniform(width));
        })
    }

    /// Loads or clears the source image; the crop resets to its default.
    pub fn set_image(&mut self, image: Option<SourceImage>) -> Recompute {
        match image {
            Some(image) => self.crop.set_image(image),
            None => self.crop.clear_image(),
        }
        self.input.image = image;
        self.input.crop = self.crop.rect();
        self.derive_art_from_driver();
        self.recompute()
    }

    /// Applies a preset's opening and rabbet in one recompute.
    pub fn apply_preset(&mut self, preset: &Preset) -> Recompute {
        let preset = *preset;
        self.batch(|session| {
            session.set_aperture(preset.aperture());
            let profile = FrameProfile {
                rabbet_width: preset.rabbet_width,
                ..session.input.profile
            };
            session.set_profile(profile);
        })
    }

    /// Captures the current opening and rabbet as a preset.
    pub fn current_preset(&self) -> Preset {
        Preset::new(self.input.aperture, self.input.profile.rabbet_width)
    }

    pub fn set_crop_viewport(&mut self, viewport: ScreenSize) {
        self.crop.set_viewport(viewport);
    }

    pub fn set_mat_viewport(&mut self, viewport: ScreenSize) {
        self.mat.set_viewport(viewport);
    }

    /// Returns `None` when the selection already satisfied the new aspect.
    pub fn set_crop_aspect(&mut self, aspect: CropAspect) -> Option<Recompute> {
        let rect = self.crop.set_aspect(aspect)?;
        tracing::debug!(aspect = %aspect.label(), ?rect, "crop aspect applied");
        Some(self.on_crop_changed())
    }

    pub fn crop_pointer_press(&mut self, point: ScreenPoint) -> Option<CropHandle> {
        self.crop.pointer_press(point)
    }

    /// Forwards a pointer move; a changed crop triggers a recompute.
    pub fn crop_pointer_move(&mut self, point: ScreenPoint) -> Option<Recompute> {
        self.crop.pointer_move(point)?;
        Some(self.on_crop_changed())
    }

    pub fn crop_pointer_release(&mut self) -> bool {
        self.crop.pointer_release()
    }

    pub fn crop_cursor(&self, point: ScreenPoint) -> CursorHint {
        self.crop.cursor_at(point)
    }

    pub fn mat_pointer_press(&mut self, point: ScreenPoint) -> Option<Edge> {
        self.mat.pointer_press(point)
    }

    /// Forwards a pointer move; proposed borders trigger a recompute.
    pub fn mat_pointer_move(&mut self, point: ScreenPoint) -> Option<Recompute> {
        let borders = self.mat.pointer_move(point)?;
        Some(self.on_borders_changed(borders))
    }

    pub fn mat_pointer_release(&mut self) -> bool {
        self.mat.pointer_release()
    }

    pub fn mat_cursor(&self) -> CursorHint {
        self.mat.cursor()
    }

    fn on_crop_changed(&mut self) -> Recompute {
        self.input.crop = self.crop.rect();
        self.recompute()
    }

    fn on_borders_changed(&mut self, borders: Borders) -> Recompute {
        self.set_borders(borders)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EngineInput::default())
    }
}
