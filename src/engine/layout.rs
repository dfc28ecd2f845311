use std::fmt;

use serde::Serialize;

use crate::geometry::PhysicalSize;
use crate::normalized::NormalizedRect;
use crate::source::SourceImage;
use crate::units::{format_dual, format_dual_pair, Unit};

use super::borders::{Borders, Edge};
use super::input::{Appearance, WorkflowMode};

/// Result of one successful computation. Every length is inches and non-negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub mode: WorkflowMode,
    pub unit: Unit,
    pub outer: PhysicalSize,
    pub glass: PhysicalSize,
    pub mat_cut: PhysicalSize,
    /// Visible opening, equal to art plus visible borders on both axes.
    pub aperture: PhysicalSize,
    /// Visible (printed) art size.
    pub art: PhysicalSize,
    /// Paper size: art plus the print border on every side.
    pub print: PhysicalSize,
    pub borders: Borders,
    /// Visible border plus the part hidden behind the rabbet.
    pub physical_borders: Borders,
    pub print_border: f64,
    pub face_width: f64,
    pub rabbet_width: f64,
    pub no_mat: bool,
    pub link_all: bool,
    pub crop: NormalizedRect,
    pub image: Option<SourceImage>,
    pub appearance: Appearance,
}

/// One labelled line of human-readable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub value: String,
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.value)
    }
}

impl Layout {
    /// Headline sizes in the active unit with the other unit in parentheses.
    pub fn summary(&self) -> Vec<SummaryLine> {
        let pair = |size: PhysicalSize| format_dual_pair(size.width, size.height, self.unit);
        vec![
            SummaryLine {
                label: "Outer frame size",
                value: pair(self.outer),
            },
            SummaryLine {
                label: "Mat cut size",
                value: pair(self.mat_cut),
            },
            SummaryLine {
                label: "Aperture",
                value: pair(self.art),
            },
            SummaryLine {
                label: "Print size",
                value: pair(self.print),
            },
        ]
    }

    /// Per-side border widths a framer needs at the cutting table.
    pub fn cut_sheet(&self) -> Vec<SummaryLine> {
        let mut lines = vec![
            SummaryLine {
                label: "Glass",
                value: format_dual_pair(self.glass.width, self.glass.height, self.unit),
            },
            SummaryLine {
                label: "Mat opening",
                value: format_dual_pair(self.aperture.width, self.aperture.height, self.unit),
            },
        ];
        if !self.no_mat {
            lines.extend(Edge::ALL.into_iter().map(|edge| SummaryLine {
                label: edge.label(),
                value: format!(
                    "{} visible, {} physical",
                    format_dual(self.borders.get(edge), self.unit),
                    format_dual(self.physical_borders.get(edge), self.unit),
                ),
            }));
        }
        lines.push(SummaryLine {
            label: "Print border",
            value: format_dual(self.print_border, self.unit),
        });
        lines
    }
}
