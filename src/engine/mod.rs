//! Pure dimension engine: maps the user's constraints to every cut size.

mod borders;
mod error;
mod input;
mod layout;

pub use borders::{apply_linkage, Borders, Edge};
pub use error::{EngineError, EngineResult};
pub use input::{
    Alignment, Appearance, EngineInput, FixedSide, FrameProfile, MatConstraint, Mounting,
    WorkflowMode,
};
pub use layout::{Layout, SummaryLine};

use crate::geometry::PhysicalSize;

/// Allowed drift between the aperture and art plus borders.
pub const CONSISTENCY_EPSILON: f64 = 1e-6;

/// Art placed inside the opening, before the frame stack is added.
#[derive(Debug, Clone, Copy)]
struct Placement {
    aperture: PhysicalSize,
    art: PhysicalSize,
    borders: Borders,
}

/// Computes the full layout for `input`.
///
/// Stateless: the same input always yields the same result, and a failure
/// never produces a partial layout.
pub fn compute(input: &EngineInput) -> EngineResult<Layout> {
    validate_stack(input)?;
    let no_mat = input.effective_no_mat();
    let placement = match input.mode {
        WorkflowMode::FixedFrame => place_in_aperture(input)?,
        WorkflowMode::FixedArt => place_around_art(input, no_mat)?,
    };
    check_consistency(&placement)?;

    let profile = input.profile;
    let glass = placement
        .aperture
        .uniform_grow(2.0 * profile.rabbet_width);
    let mat_cut = glass.uniform_grow(-profile.tolerance());
    let outer = glass.uniform_grow(2.0 * (profile.face_width - profile.rabbet_width));
    require_derived("mat cut width", mat_cut.width)?;
    require_derived("mat cut height", mat_cut.height)?;
    require_derived("outer width", outer.width)?;
    require_derived("outer height", outer.height)?;

    let physical_borders = placement.borders.offset(profile.hidden_reveal());
    if let Some((_, value)) = physical_borders.first_invalid() {
        return Err(EngineError::NegativeDimension {
            quantity: "physical border",
            value,
        });
    }

    let print_border = input.mounting.print_border;
    let layout = Layout {
        mode: input.mode,
        unit: input.unit,
        outer,
        glass,
        mat_cut,
        aperture: placement.aperture,
        art: placement.art,
        print: placement.art.uniform_grow(2.0 * print_border),
        borders: placement.borders,
        physical_borders,
        print_border,
        face_width: profile.face_width,
        rabbet_width: profile.rabbet_width,
        no_mat,
        link_all: input.link_all,
        crop: input.crop,
        image: input.image,
        appearance: input.appearance.clone(),
    };
    tracing::debug!(
        mode = ?layout.mode,
        outer_width = layout.outer.width,
        outer_height = layout.outer.height,
        art_width = layout.art.width,
        art_height = layout.art.height,
        "layout computed"
    );
    Ok(layout)
}

fn place_in_aperture(input: &EngineInput) -> EngineResult<Placement> {
    let aperture = input.aperture;
    require_positive("aperture width", aperture.width)?;
    require_positive("aperture height", aperture.height)?;
    let rules = input.mat_rules;
    require_non_negative("fixed mat value", rules.fixed_value)?;
    require_non_negative("minimum gutter", rules.min_gutter)?;

    let gutters = rules.resolve_gutters();
    let available = PhysicalSize::new(
        aperture.width - gutters.horizontal_sum(),
        aperture.height - gutters.vertical_sum(),
    );
    if available.width <= 0.0 || available.height <= 0.0 {
        return Err(EngineError::MatTooLarge {
            available_width: available.width,
            available_height: available.height,
        });
    }

    let art = fit_aspect(available, input.cropped_aspect());
    let left = gutters.left + rules.alignment.leading_share(available.width - art.width);
    let top = gutters.top + rules.alignment.leading_share(available.height - art.height);
    let borders = Borders::new(
        top,
        aperture.height - top - art.height,
        left,
        aperture.width - left - art.width,
    );
    Ok(Placement {
        aperture,
        art,
        borders,
    })
}

fn place_around_art(input: &EngineInput, no_mat: bool) -> EngineResult<Placement> {
    require_positive("art width", input.art.width)?;
    require_positive("art height", input.art.height)?;

    let art = if no_mat {
        input
            .art
            .uniform_grow(-2.0 * input.mounting.print_border)
    } else {
        input.art
    };
    if art.width <= 0.0 || art.height <= 0.0 {
        return Err(EngineError::BorderTooLarge {
            net_width: art.width,
            net_height: art.height,
        });
    }

    let borders = if no_mat {
        Borders::ZERO
    } else {
        if let Some((_, value)) = input.borders.first_invalid() {
            return Err(EngineError::InvalidInput {
                field: "mat border",
                value,
            });
        }
        input.borders
    };
    let aperture = art.grow(borders.horizontal_sum(), borders.vertical_sum());
    Ok(Placement {
        aperture,
        art,
        borders,
    })
}

/// Largest box of `aspect` inside `available`; the whole box without an aspect.
fn fit_aspect(available: PhysicalSize, aspect: Option<f64>) -> PhysicalSize {
    match aspect {
        Some(aspect) if aspect.is_finite() && aspect > 0.0 => {
            if available.width / available.height > aspect {
                PhysicalSize::new(available.height * aspect, available.height)
            } else {
                PhysicalSize::new(available.width, available.width / aspect)
            }
        }
        _ => available,
    }
}

fn validate_stack(input: &EngineInput) -> EngineResult<()> {
    let profile = input.profile;
    require_non_negative("face width", profile.face_width)?;
    require_non_negative("rabbet width", profile.rabbet_width)?;
    require_non_negative("print border", input.mounting.print_border)?;
    if profile.face_width < profile.rabbet_width {
        return Err(EngineError::InvalidInput {
            field: "face width",
            value: profile.face_width,
        });
    }
    Ok(())
}

fn check_consistency(placement: &Placement) -> EngineResult<()> {
    let horizontal = placement.aperture.width
        - (placement.art.width + placement.borders.horizontal_sum());
    if horizontal.abs() > CONSISTENCY_EPSILON {
        return Err(EngineError::Inconsistent {
            axis: "horizontal",
            difference: horizontal,
        });
    }
    let vertical =
        placement.aperture.height - (placement.art.height + placement.borders.vertical_sum());
    if vertical.abs() > CONSISTENCY_EPSILON {
        return Err(EngineError::Inconsistent {
            axis: "vertical",
            difference: vertical,
        });
    }
    if let Some((_, value)) = placement.borders.first_invalid() {
        return Err(EngineError::NegativeDimension {
            quantity: "mat border",
            value,
        });
    }
    Ok(())
}

fn require_positive(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput { field, value })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidInput { field, value })
    }
}

fn require_derived(quantity: &'static str, value: f64) -> EngineResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::NegativeDimension { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalized::NormalizedRect;
    use crate::source::SourceImage;
    use crate::units::CUT_TOLERANCE;

    const EPS: f64 = 1e-6;

    fn approx(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < EPS
    }

    fn landscape_frame_input() -> EngineInput {
        EngineInput {
            mode: WorkflowMode::FixedFrame,
            aperture: PhysicalSize::new(16.0, 20.0),
            mat_rules: MatConstraint {
                fixed_side: FixedSide::None,
                min_gutter: 1.5,
                alignment: Alignment::Center,
                ..MatConstraint::default()
            },
            image: SourceImage::new(3000, 2000),
            crop: NormalizedRect::FULL,
            ..EngineInput::default()
        }
    }

    fn assert_consistent(layout: &Layout) {
        assert!(approx(
            layout.aperture.width,
            layout.art.width + layout.borders.left + layout.borders.right
        ));
        assert!(approx(
            layout.aperture.height,
            layout.art.height + layout.borders.top + layout.borders.bottom
        ));
        for size in [
            layout.outer,
            layout.glass,
            layout.mat_cut,
            layout.aperture,
            layout.art,
            layout.print,
        ] {
            assert!(size.width >= 0.0 && size.height >= 0.0);
        }
        assert_eq!(layout.borders.first_invalid(), None);
        assert_eq!(layout.physical_borders.first_invalid(), None);
    }

    #[test]
    fn compute_fixed_frame_centers_tall_slack() {
        let layout = compute(&landscape_frame_input()).expect("layout should compute");

        assert!(approx(layout.art.width, 13.0));
        assert!(approx(layout.art.height, 13.0 / 1.5));
        assert!(approx(layout.borders.left, 1.5));
        assert!(approx(layout.borders.right, 1.5));
        let expected_top = 1.5 + (17.0 - 13.0 / 1.5) / 2.0;
        assert!(approx(layout.borders.top, expected_top));
        assert!(approx(layout.borders.bottom, expected_top));
        assert!((layout.borders.top - 5.6665).abs() < 1e-3);
        assert_consistent(&layout);
    }

    #[test]
    fn compute_fixed_art_adds_borders_and_frame_stack() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            art: PhysicalSize::new(10.0, 8.0),
            borders: Borders::uniform(2.0),
            profile: FrameProfile::new(0.75, 0.25),
            ..EngineInput::default()
        };
        let layout = compute(&input).expect("layout should compute");

        assert_eq!(layout.aperture, PhysicalSize::new(14.0, 12.0));
        assert_eq!(layout.glass, PhysicalSize::new(14.5, 12.5));
        assert_eq!(layout.outer, PhysicalSize::new(15.5, 13.5));
        assert!(approx(layout.mat_cut.width, 14.5 - 3.0 / 25.4));
        assert_eq!(layout.print, PhysicalSize::new(10.5, 8.5));
        assert!(approx(
            layout.physical_borders.top,
            2.0 + 0.25 - 1.5 / 25.4
        ));
        assert_consistent(&layout);
    }

    #[test]
    fn compute_reports_mat_too_large_when_gutters_consume_aperture() {
        let mut input = landscape_frame_input();
        input.mat_rules.min_gutter = 8.0;
        let err = compute(&input).expect_err("gutters leave no room");
        assert!(matches!(
            err,
            EngineError::MatTooLarge { available_width, .. } if available_width <= 0.0
        ));
    }

    #[test]
    fn compute_reports_border_too_large_for_no_mat_print_border() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            art: PhysicalSize::new(1.0, 8.0),
            no_mat: true,
            mounting: Mounting { print_border: 0.5 },
            ..EngineInput::default()
        };
        assert!(matches!(
            compute(&input),
            Err(EngineError::BorderTooLarge { net_width, .. }) if net_width <= 0.0
        ));
    }

    #[test]
    fn compute_no_mat_subtracts_print_border_and_keeps_hidden_reveal() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            art: PhysicalSize::new(10.0, 8.0),
            no_mat: true,
            mounting: Mounting { print_border: 0.25 },
            ..EngineInput::default()
        };
        let layout = compute(&input).expect("layout should compute");
        assert!(layout.no_mat);
        assert_eq!(layout.art, PhysicalSize::new(9.5, 7.5));
        assert_eq!(layout.aperture, layout.art);
        assert_eq!(layout.print, PhysicalSize::new(10.0, 8.0));
        assert_eq!(layout.borders, Borders::ZERO);
        let hidden = 0.25 - CUT_TOLERANCE / 2.0;
        for edge in Edge::ALL {
            assert!((layout.physical_borders.get(edge) - hidden).abs() < 1e-12);
        }
    }

    #[test]
    fn compute_rejects_non_positive_aperture() {
        let mut input = landscape_frame_input();
        input.aperture = PhysicalSize::new(0.0, 20.0);
        assert!(matches!(
            compute(&input),
            Err(EngineError::InvalidInput {
                field: "aperture width",
                ..
            })
        ));
        input.aperture = PhysicalSize::new(16.0, f64::NAN);
        assert!(matches!(
            compute(&input),
            Err(EngineError::InvalidInput {
                field: "aperture height",
                ..
            })
        ));
    }

    #[test]
    fn compute_rejects_face_narrower_than_rabbet() {
        let mut input = landscape_frame_input();
        input.profile = FrameProfile::new(0.2, 0.25);
        assert!(matches!(
            compute(&input),
            Err(EngineError::InvalidInput {
                field: "face width",
                ..
            })
        ));
    }

    #[test]
    fn compute_rejects_negative_fixed_art_border() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            borders: Borders::new(2.0, 2.0, -1.0, 2.0),
            ..EngineInput::default()
        };
        assert!(matches!(
            compute(&input),
            Err(EngineError::InvalidInput {
                field: "mat border",
                ..
            })
        ));
    }

    #[test]
    fn compute_reports_negative_mat_cut_for_tiny_opening() {
        let input = EngineInput {
            aperture: PhysicalSize::new(0.05, 0.05),
            mat_rules: MatConstraint {
                min_gutter: 0.0,
                fixed_value: 0.0,
                ..MatConstraint::default()
            },
            profile: FrameProfile::new(0.0, 0.0),
            ..EngineInput::default()
        };
        assert!(matches!(
            compute(&input),
            Err(EngineError::NegativeDimension {
                quantity: "mat cut width",
                ..
            })
        ));
    }

    #[test]
    fn compute_without_image_fills_available_box() {
        let mut input = landscape_frame_input();
        input.image = None;
        let layout = compute(&input).expect("layout should compute");
        assert_eq!(layout.art, PhysicalSize::new(13.0, 17.0));
        assert_eq!(layout.borders, Borders::uniform(1.5));
    }

    #[test]
    fn compute_top_left_alignment_pushes_slack_to_bottom() {
        let mut input = landscape_frame_input();
        input.mat_rules.alignment = Alignment::TopLeft;
        let layout = compute(&input).expect("layout should compute");
        assert!(approx(layout.borders.top, 1.5));
        assert!(approx(layout.borders.bottom, 1.5 + 17.0 - 13.0 / 1.5));
        assert_consistent(&layout);

        input.mat_rules.alignment = Alignment::BottomRight;
        let layout = compute(&input).expect("layout should compute");
        assert!(approx(layout.borders.bottom, 1.5));
        assert!(approx(layout.borders.top, 1.5 + 17.0 - 13.0 / 1.5));
        assert_consistent(&layout);
    }

    #[test]
    fn compute_fixed_side_feeds_gutters() {
        let mut input = landscape_frame_input();
        input.mat_rules = MatConstraint {
            fixed_side: FixedSide::Left,
            fixed_value: 3.0,
            match_opposite: false,
            min_gutter: 1.0,
            alignment: Alignment::Center,
        };
        input.image = SourceImage::new(1000, 1000);
        let layout = compute(&input).expect("layout should compute");
        assert!(approx(layout.art.width, 12.0));
        assert!(approx(layout.borders.left, 3.0));
        assert!(approx(layout.borders.right, 1.0));
        assert_consistent(&layout);
    }

    #[test]
    fn compute_uses_cropped_aspect() {
        let mut input = landscape_frame_input();
        input.crop = NormalizedRect::new(0.0, 0.0, 0.5, 1.0);
        let layout = compute(&input).expect("layout should compute");
        // 1500 x 2000 crop: aspect 0.75 is below 13/17, so width binds.
        assert!(approx(layout.art.width, 12.75));
        assert!(approx(layout.art.height, 17.0));
        assert_consistent(&layout);
    }

    #[test]
    fn compute_is_idempotent() {
        let input = landscape_frame_input();
        let first = compute(&input).expect("layout should compute");
        let second = compute(&input).expect("layout should compute");
        assert_eq!(first, second);
        assert_eq!(first.outer.width.to_bits(), second.outer.width.to_bits());
    }

    #[test]
    fn compute_stays_consistent_across_rule_combinations() {
        let sides = [
            FixedSide::None,
            FixedSide::Top,
            FixedSide::Bottom,
            FixedSide::Left,
            FixedSide::Right,
        ];
        let alignments = [Alignment::Center, Alignment::TopLeft, Alignment::BottomRight];
        for side in sides {
            for alignment in alignments {
                for (w, h) in [(3000, 2000), (2000, 3000), (1000, 1000)] {
                    let mut input = landscape_frame_input();
                    input.mat_rules = MatConstraint {
                        fixed_side: side,
                        fixed_value: 2.25,
                        match_opposite: true,
                        min_gutter: 1.25,
                        alignment,
                    };
                    input.image = SourceImage::new(w, h);
                    input.crop = NormalizedRect::inset(0.05);
                    let layout = compute(&input).expect("layout should compute");
                    assert_consistent(&layout);
                }
            }
        }
    }

    #[test]
    fn summary_lists_headline_sizes_in_active_unit() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            ..EngineInput::default()
        };
        let layout = compute(&input).expect("layout should compute");
        let summary = layout.summary();
        assert_eq!(summary.len(), 4);
        assert_eq!(summary[0].label, "Outer frame size");
        assert_eq!(
            summary[0].to_string(),
            "Outer frame size: 15.500\" (393.7mm) x 13.500\" (342.9mm)"
        );
        let sheet = layout.cut_sheet();
        assert!(sheet.iter().any(|line| line.label == "Top"));
    }

    #[test]
    fn cut_sheet_skips_borders_without_mat() {
        let input = EngineInput {
            mode: WorkflowMode::FixedArt,
            no_mat: true,
            ..EngineInput::default()
        };
        let layout = compute(&input).expect("layout should compute");
        assert!(layout.cut_sheet().iter().all(|line| line.label != "Top"));
    }
}
