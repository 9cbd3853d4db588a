use eyre::eyre;
use plot3d_scene::data_types::{ArraySeries, GridAxis, SamplingGrid, X, Y, Z};
use plot3d_scene::evaluator::{Expression, FnEvaluator};
use plot3d_scene::frame::{DrawCommand, Frame};
use plot3d_scene::scales::RangeSource;
use plot3d_scene::{MathSeries, RenderState, RenderingMode, Scene, SceneComposer};
use std::sync::{Arc, Mutex, Weak};

fn auto_scene() -> Arc<Scene> {
    let scene = Arc::new(Scene::new());
    for dim in [X, Y, Z] {
        scene.set_auto_range_enabled(dim, true).unwrap();
    }
    scene
}

fn height_field() -> ArraySeries {
    let xs: Vec<f64> = (0..5).map(f64::from).collect();
    let ys: Vec<f64> = (0..5).map(f64::from).collect();
    let zs: Vec<f64> = ys
        .iter()
        .flat_map(|y| xs.iter().map(move |x| (x - 2.0) * (y - 2.0)))
        .collect();
    ArraySeries::matrix("saddle", &xs, &ys, &zs).unwrap()
}

fn paraboloid(name: &str) -> MathSeries {
    MathSeries::new(
        name,
        Expression::new("x^2 + y^2"),
        SamplingGrid::surface(GridAxis::new("x", -2.0, 2.0, 6), GridAxis::new("y", -2.0, 2.0, 6)).unwrap(),
        Arc::new(FnEvaluator::new(|_: &Expression, p: &[f64]| Ok(p[0] * p[0] + p[1] * p[1]))),
    )
    .unwrap()
}

fn broken(name: &str) -> MathSeries {
    MathSeries::new(
        name,
        Expression::new("undefined_symbol"),
        SamplingGrid::curve(GridAxis::new("x", 0.0, 1.0, 10)).unwrap(),
        Arc::new(FnEvaluator::new(|e: &Expression, _: &[f64]| Err(eyre!("unknown symbol in '{}'", e)))),
    )
    .unwrap()
}

fn triangle_points(frame: &Frame) -> Vec<[(f64, f64, f64); 3]> {
    frame
        .primitives
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Triangle { points, .. } => Some(points.map(|p| (p.x, p.y, p.depth))),
            _ => None,
        })
        .collect()
}

#[test]
fn test_render_surface_produces_triangles() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    let composer = SceneComposer::new(scene);

    let summary = composer.render();
    assert_eq!(summary.pass, 1);
    assert_eq!(summary.series_drawn, 1);
    assert!(summary.skipped.is_empty());

    let frame = composer.frame();
    let frame = frame.read();
    // 4x4 cells, two triangles each.
    assert_eq!(triangle_points(&frame).len(), 32);
    assert!(!frame.decorations.is_empty());
    assert_eq!(frame.ranges.len(), 3);
    assert_eq!(frame.ranges[Z].source, RangeSource::Data);
    assert_eq!(composer.state(), RenderState::Idle);
}

#[test]
fn test_speed_and_quality_share_geometry_and_decorations() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    scene.data().add_math(paraboloid("bowl"));
    scene
        .data()
        .add_array(ArraySeries::from_rows("pts", &[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]]).unwrap());
    let composer = SceneComposer::new(scene.clone());

    composer.render();
    let quality = composer.frame().read().clone();

    scene.set_rendering_mode(RenderingMode::Speed).unwrap();
    composer.render();
    let speed = composer.frame().read().clone();

    assert_eq!(quality.decorations, speed.decorations);
    assert_eq!(quality.overlay, speed.overlay);
    assert_eq!(quality.legend, speed.legend);
    assert_eq!(quality.ranges, speed.ranges);
    assert_eq!(triangle_points(&quality), triangle_points(&speed));
    assert_eq!(quality.primitives.len(), speed.primitives.len());

    let antialiased = |f: &Frame| {
        f.primitives.iter().all(|c| match c {
            DrawCommand::Triangle { antialias, .. }
            | DrawCommand::Line { antialias, .. }
            | DrawCommand::Marker { antialias, .. } => *antialias,
            DrawCommand::Text { .. } => true,
        })
    };
    assert!(antialiased(&quality));
    assert!(speed.primitives.iter().all(|c| !matches!(
        c,
        DrawCommand::Triangle { antialias: true, .. }
            | DrawCommand::Line { antialias: true, .. }
            | DrawCommand::Marker { antialias: true, .. }
    )));

    // Flat shading: one color per triangle.
    for c in &speed.primitives {
        if let DrawCommand::Triangle { colors, .. } = c {
            assert_eq!(colors[0], colors[1]);
            assert_eq!(colors[1], colors[2]);
        }
    }
}

#[test]
fn test_failing_series_is_skipped() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    scene.data().add_math(broken("bad"));
    scene.data().add_math(paraboloid("bowl"));
    let composer = SceneComposer::new(scene);

    let summary = composer.render();
    assert_eq!(summary.series_drawn, 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].name, "bad");

    let frame = composer.frame();
    let frame = frame.read();
    let legend: Vec<&str> = frame.legend.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(legend, vec!["bowl", "saddle"]);
    // Z range covers the bowl, which peaks at 8.
    assert_eq!(frame.ranges[Z].max_f64(), 8.0);
}

#[test]
fn test_partially_failing_series_keeps_holes() {
    let scene = auto_scene();
    let holes = MathSeries::new(
        "log",
        Expression::new("ln(x)"),
        SamplingGrid::curve(GridAxis::new("x", -1.0, 3.0, 5)).unwrap(),
        Arc::new(FnEvaluator::new(|_: &Expression, p: &[f64]| {
            if p[0] > 0.0 {
                Ok(p[0].ln())
            } else {
                Err(eyre!("log of non-positive value"))
            }
        })),
    )
    .unwrap();
    scene.data().add_math(holes);
    let composer = SceneComposer::new(scene);

    let summary = composer.render();
    assert_eq!(summary.series_drawn, 1);
    assert!(summary.skipped.is_empty());
    // Samples at 1, 2 and 3 survive: two segments.
    let frame = composer.frame();
    let lines = frame
        .read()
        .primitives
        .iter()
        .filter(|c| matches!(c, DrawCommand::Line { .. }))
        .count();
    assert_eq!(lines, 2);
}

#[test]
fn test_zero_size_surface_renders_empty_frame() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    scene.set_screen_size(0, 0).unwrap();
    let composer = SceneComposer::new(scene.clone());

    let summary = composer.render();
    assert_eq!(summary.primitives, 0);
    {
        let frame = composer.frame();
        let frame = frame.read();
        assert_eq!(frame.command_count(), 0);
        assert_eq!((frame.width, frame.height), (0, 0));
    }

    scene.set_screen_size(0, 300).unwrap();
    composer.render();
    assert_eq!(composer.frame().read().command_count(), 0);
}

#[test]
fn test_primitives_sorted_back_to_front() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    scene.data().add_math(paraboloid("bowl"));
    let composer = SceneComposer::new(scene);
    composer.render();

    let frame = composer.frame();
    let frame = frame.read();
    assert!(frame.primitives.len() > 1);
    for pair in frame.primitives.windows(2) {
        assert!(pair[0].depth() >= pair[1].depth());
    }
}

#[test]
fn test_legend_lists_latest_series_first() {
    let scene = auto_scene();
    scene.data().add_math(paraboloid("m1"));
    scene.data().add_array(height_field());
    scene
        .data()
        .add_array(ArraySeries::from_rows("a2", &[[0.0, 0.0, 0.0]]).unwrap());
    let composer = SceneComposer::new(scene.clone());
    composer.render();

    let names: Vec<String> = composer.frame().read().legend.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec!["m1", "a2", "saddle"]);

    let mut render = scene.config().render.clone();
    render.show_legend = false;
    scene.set_render_configuration(render).unwrap();
    composer.render();
    assert!(composer.frame().read().legend.is_empty());
}

#[test]
fn test_labels_and_grid_toggle() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    let composer = SceneComposer::new(scene.clone());
    composer.render();
    let full = composer.frame().read().clone();
    let texts = |f: &Frame| f.overlay.iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count();
    assert!(texts(&full) > 0);

    let mut render = scene.config().render.clone();
    render.show_labels = false;
    render.show_grid = false;
    scene.set_render_configuration(render).unwrap();
    composer.render();
    let bare = composer.frame().read().clone();
    assert_eq!(texts(&bare), 0);
    assert!(bare.decorations.len() < full.decorations.len());
    // Data is unaffected.
    assert_eq!(triangle_points(&bare), triangle_points(&full));
}

#[test]
fn test_frame_handle_is_stable_across_passes() {
    let scene = auto_scene();
    let composer = SceneComposer::new(scene.clone());
    let handle = composer.frame();

    composer.render();
    scene.data().add_array(height_field());
    composer.render();

    assert!(Arc::ptr_eq(&handle, &composer.frame()));
    assert_eq!(handle.read().pass, 2);
    assert_eq!(composer.passes_completed(), 2);
}

#[test]
fn test_repaint_listener_may_render_again() {
    let scene = auto_scene();
    scene.data().add_array(height_field());
    let composer = Arc::new(SceneComposer::new(scene));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let weak: Weak<SceneComposer> = Arc::downgrade(&composer);
    {
        let seen = seen.clone();
        composer.set_repaint_listener(move |pass| {
            seen.lock().unwrap().push((pass, weak.upgrade().map(|c| c.state())));
            if pass == 1 {
                if let Some(composer) = weak.upgrade() {
                    composer.render();
                }
            }
        });
    }

    let summary = composer.render();
    assert_eq!(summary.pass, 1);
    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![(1, Some(RenderState::Idle)), (2, Some(RenderState::Idle))]);
    assert_eq!(composer.frame().read().pass, 2);
    assert_eq!(composer.passes_completed(), 2);
}

#[test]
fn test_auto_range_on_empty_scene_uses_fallback() {
    let scene = Arc::new(Scene::new());
    scene.set_auto_range_enabled(X, true).unwrap();
    let composer = SceneComposer::new(scene);
    composer.render();

    let frame = composer.frame();
    let frame = frame.read();
    assert_eq!(frame.ranges[X].source, RangeSource::Fallback);
    assert_eq!((frame.ranges[X].min_f64(), frame.ranges[X].max_f64()), (-1.0, 1.0));
    assert_eq!(frame.ranges[Y].source, RangeSource::Manual);
}

#[test]
fn test_empty_store_renders_decorations_only() {
    let composer = SceneComposer::new(auto_scene());
    let summary = composer.render();
    assert_eq!(summary.series_drawn, 0);
    let frame = composer.frame();
    let frame = frame.read();
    assert!(frame.primitives.is_empty());
    assert!(!frame.decorations.is_empty());
    assert_eq!(frame.ranges[X].source, RangeSource::Fallback);
}

#[test]
fn test_render_sees_series_added_between_passes() {
    let scene = auto_scene();
    let composer = SceneComposer::new(scene.clone());
    scene
        .data()
        .add_array(ArraySeries::from_rows("p", &[[0.0, 0.0, 0.0], [10.0, 20.0, 30.0]]).unwrap());
    composer.render();
    assert_eq!(composer.frame().read().ranges[Y].max_f64(), 20.0);

    scene.data().clear_data_series();
    composer.render();
    assert_eq!(composer.frame().read().ranges[Y].source, RangeSource::Fallback);
}
