use frametamer::editor::{Corner, CropHandle};
use frametamer::engine::{Borders, Edge, EngineInput, WorkflowMode};
use frametamer::geometry::{PhysicalSize, ScreenPoint, ScreenSize};
use frametamer::render::{grid_lines, PreviewScene};
use frametamer::session::{Recompute, Session};
use frametamer::source::SourceImage;
use frametamer::units::Unit;

const EPS: f64 = 1e-6;

fn assert_consistent(session: &Session) {
    let layout = session.layout().expect("layout should exist");
    let borders = layout.borders;
    assert!((layout.aperture.width - (layout.art.width + borders.left + borders.right)).abs() < EPS);
    assert!((layout.aperture.height - (layout.art.height + borders.top + borders.bottom)).abs() < EPS);
}

#[test]
fn crop_drag_feeds_back_into_fixed_frame_layout() {
    let mut session = Session::default();
    session.set_crop_viewport(ScreenSize::new(900.0, 600.0));
    assert!(session.set_image(SourceImage::new(3000, 2000)).is_updated());
    let before = session.layout().cloned().expect("layout after image");

    let selector = session.crop_selector();
    let rect = selector
        .to_screen_rect(selector.rect())
        .expect("image should be fitted");
    let corner = rect.bottom_right();
    assert_eq!(
        session.crop_pointer_press(corner),
        Some(CropHandle::Corner(Corner::BottomRight))
    );
    let outcome = session
        .crop_pointer_move(ScreenPoint::new(corner.x - rect.width / 2.0, corner.y))
        .expect("drag should recompute");
    assert!(outcome.is_updated());
    assert!(session.crop_pointer_release());

    let after = session.layout().expect("layout after drag");
    assert_ne!(after.art, before.art);
    assert_eq!(after.crop, session.crop_selector().rect());
    let aspect = session.input().cropped_aspect().expect("image loaded");
    assert!((after.art.width / after.art.height - aspect).abs() < EPS);
    assert_consistent(&session);
}

#[test]
fn linked_mat_drag_equalises_all_borders() {
    let mut session = Session::new(EngineInput {
        mode: WorkflowMode::FixedArt,
        art: PhysicalSize::new(10.0, 8.0),
        borders: Borders::uniform(2.0),
        link_all: true,
        ..EngineInput::default()
    });
    session.set_mat_viewport(ScreenSize::new(800.0, 600.0));

    let editor = session.mat_editor();
    let scale = editor.scale().expect("layout is loaded");
    let hole = editor.hole_rect().expect("layout is loaded");
    let start = ScreenPoint::new(hole.center().x, hole.top());

    assert_eq!(session.mat_pointer_press(start), Some(Edge::Top));
    let outcome = session
        .mat_pointer_move(ScreenPoint::new(start.x, start.y + scale))
        .expect("drag should recompute");
    assert_eq!(outcome, Recompute::Updated);
    session.mat_pointer_release();

    let layout = session.layout().expect("layout after drag");
    for edge in Edge::ALL {
        assert!((layout.borders.get(edge) - 3.0).abs() < EPS);
    }
    assert!((layout.aperture.width - 16.0).abs() < EPS);
    assert!((layout.outer.height - 15.5).abs() < EPS);
    assert_consistent(&session);
}

#[test]
fn mat_drag_is_ignored_without_mat() {
    let mut session = Session::new(EngineInput {
        mode: WorkflowMode::FixedArt,
        ..EngineInput::default()
    });
    session.set_no_mat(true);
    session.set_mat_viewport(ScreenSize::new(800.0, 600.0));
    let hole = session.mat_editor().hole_rect().expect("layout is loaded");

    let top = ScreenPoint::new(hole.center().x, hole.top());
    assert_eq!(session.mat_pointer_press(top), None);
    assert_eq!(session.mat_pointer_move(top), None);
}

#[test]
fn failure_keeps_preview_on_previous_layout() {
    let mut session = Session::default();
    let good = session.layout().cloned().expect("initial layout");

    let mut rules = session.input().mat_rules;
    rules.min_gutter = 10.0;
    assert!(matches!(session.set_mat_rules(rules), Recompute::Failed(_)));

    let layout = session.layout().expect("previous layout retained");
    assert_eq!(layout, &good);
    let scene = PreviewScene::compute(layout, ScreenSize::new(640.0, 480.0))
        .expect("preview should still render");
    assert!(scene.outer.width > 0.0);
}

#[test]
fn unit_toggle_changes_presentation_only() {
    let mut session = Session::default();
    let inches = session.layout().cloned().expect("layout");
    session.set_unit(Unit::Millimeters);
    let millimetres = session.layout().expect("layout");

    assert_eq!(inches.outer, millimetres.outer);
    assert!(millimetres.summary()[0].value.starts_with("444.5mm"));

    let scene = PreviewScene::compute(millimetres, ScreenSize::new(800.0, 800.0))
        .expect("preview should render");
    let lines = grid_lines(scene.outer, scene.scale, millimetres.unit);
    assert!(lines.iter().any(|line| line.major && line.label == Some(10)));
}
