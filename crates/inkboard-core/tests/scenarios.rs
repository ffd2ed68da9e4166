//! End-to-end gesture scenarios driven through the public engine API.

use inkboard_core::element::Rectangle;
use inkboard_core::geometry::topmost_hit;
use inkboard_core::{
    DrawStyle, Element, Engine, EngineConfig, History, HitTolerance, MemoryStore, PointerEvent,
    Scene, ToolKind, Viewport,
};
use kurbo::{Point, Vec2};

fn drag(engine: &mut Engine, points: &[(f64, f64)]) {
    let (first, rest) = points.split_first().expect("at least one point");
    engine.on_pointer_down(PointerEvent::at(first.0, first.1), 0);
    for &(x, y) in rest {
        engine.on_pointer_move(PointerEvent::at(x, y));
    }
    let last = points.last().expect("at least one point");
    engine.on_pointer_up(PointerEvent::at(last.0, last.1), 0);
}

fn draw(engine: &mut Engine, tool: ToolKind, from: (f64, f64), to: (f64, f64)) {
    engine.set_tool(tool);
    drag(engine, &[from, to]);
}

fn only_rect(engine: &Engine) -> Rectangle {
    match engine.scene().elements() {
        [Element::Rectangle(rect)] => rect.clone(),
        other => panic!("expected one rectangle, got {other:?}"),
    }
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);
    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}

#[test]
fn test_freehand_stroke_single_commit() {
    let mut engine = Engine::default();
    engine.set_tool(ToolKind::Freehand);
    drag(&mut engine, &[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);

    let [Element::Freehand(stroke)] = engine.scene().elements() else {
        panic!("expected one freehand stroke");
    };
    assert_eq!(
        stroke.points,
        vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0), Point::new(20.0, 20.0)]
    );
    assert_eq!(engine.state().history.len(), 2);
}

#[test]
fn test_rectangle_resize_br_handle() {
    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Rectangle, (0.0, 0.0), (50.0, 50.0));

    engine.set_tool(ToolKind::Select);
    drag(&mut engine, &[(50.0, 50.0), (65.0, 65.0), (80.0, 80.0)]);

    let rect = only_rect(&engine);
    assert_eq!(rect.p1, Point::new(0.0, 0.0));
    assert_eq!(rect.p2, Point::new(80.0, 80.0));
    assert_eq!(engine.state().history.len(), 3);
}

#[test]
fn test_inverted_drag_is_normalized() {
    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Rectangle, (60.0, 40.0), (10.0, 5.0));
    let rect = only_rect(&engine);
    assert_eq!(rect.p1, Point::new(10.0, 5.0));
    assert_eq!(rect.p2, Point::new(60.0, 40.0));
}

#[test]
fn test_erase_during_drag_single_commit() {
    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Rectangle, (0.0, 0.0), (40.0, 40.0));
    // Start each drag on empty canvas; a press on an element would move it.
    draw(&mut engine, ToolKind::Rectangle, (70.0, 40.0), (30.0, 0.0));
    draw(&mut engine, ToolKind::Rectangle, (100.0, 40.0), (60.0, 0.0));
    let before = engine.state().history.len();

    engine.set_tool(ToolKind::Eraser);
    drag(&mut engine, &[(10.0, 20.0), (50.0, 20.0), (65.0, 20.0), (90.0, 20.0)]);

    assert!(engine.scene().is_empty());
    assert_eq!(engine.state().history.len(), before + 1);

    engine.undo();
    assert_eq!(engine.scene().len(), 3);
}

#[test]
fn test_undo_redo_inverse_law() {
    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Rectangle, (0.0, 0.0), (10.0, 10.0));
    draw(&mut engine, ToolKind::Line, (200.0, 0.0), (230.0, 5.0));
    draw(&mut engine, ToolKind::Circle, (100.0, 100.0), (120.0, 100.0));
    engine.set_tool(ToolKind::Select);
    drag(&mut engine, &[(5.0, 5.0), (15.0, 25.0)]);
    let commits = engine.state().history.len() - 1;
    assert_eq!(commits, 4);
    let final_scene = engine.scene().snapshot();

    for _ in 0..commits {
        engine.undo();
    }
    assert!(engine.scene().is_empty());
    assert!(engine.undo().is_empty());

    for _ in 0..commits {
        engine.redo();
    }
    assert_eq!(engine.scene().snapshot(), final_scene);
    assert!(engine.redo().is_empty());
}

#[test]
fn test_commit_truncates_redo() {
    let mut history = History::new(Vec::<u32>::new());
    history.commit(vec![1]);
    history.commit(vec![1, 2]);
    history.undo();
    history.commit(vec![1, 3]);
    assert!(!history.redo());
    assert_eq!(history.current(), &vec![1, 3]);

    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Rectangle, (0.0, 0.0), (10.0, 10.0));
    draw(&mut engine, ToolKind::Rectangle, (20.0, 20.0), (30.0, 30.0));
    engine.undo();
    draw(&mut engine, ToolKind::Line, (50.0, 50.0), (60.0, 60.0));
    assert!(!engine.can_redo());
    assert_eq!(engine.scene().len(), 2);
}

#[test]
fn test_commit_element_idempotent() {
    let mut scene = Scene::new();
    let id = scene
        .begin_element(ToolKind::Rectangle, Point::new(50.0, 50.0), &DrawStyle::default())
        .unwrap();
    scene.extend_element(id, Point::new(-10.0, 20.0)).unwrap();
    scene.commit_element(id).unwrap();
    let once = scene.snapshot();
    scene.commit_element(id).unwrap();
    assert_eq!(scene.snapshot(), once);
}

#[test]
fn test_topmost_hit_precedence() {
    let mut scene = Scene::new();
    let style = DrawStyle::default();
    let r1 = scene.begin_element(ToolKind::Rectangle, Point::ZERO, &style).unwrap();
    scene.extend_element(r1, Point::new(50.0, 50.0)).unwrap();
    let r2 = scene
        .begin_element(ToolKind::Rectangle, Point::new(25.0, 25.0), &style)
        .unwrap();
    scene.extend_element(r2, Point::new(75.0, 75.0)).unwrap();

    let hit = topmost_hit(Point::new(40.0, 40.0), scene.elements(), &HitTolerance::default())
        .expect("point inside both rectangles");
    assert_eq!(hit.id, r2);
}

#[test]
fn test_coordinate_round_trip() {
    let mut viewport = Viewport::new();
    let samples = [
        Point::new(0.0, 0.0),
        Point::new(123.5, -40.25),
        Point::new(-800.0, 600.0),
    ];
    for (pan, factor, anchor) in [
        (Vec2::new(0.0, 0.0), 1.0, Point::ZERO),
        (Vec2::new(37.0, -12.0), 2.5, Point::new(300.0, 200.0)),
        (Vec2::new(-500.0, 80.0), 0.3, Point::new(10.0, 10.0)),
    ] {
        viewport.pan(pan);
        viewport.zoom(factor, anchor);
        for p in samples {
            let back = viewport.world_to_screen(viewport.screen_to_world(p));
            assert!((back - p).hypot() < 1e-9, "{p:?} -> {back:?}");
        }
    }
}

#[test]
fn test_zoom_anchored_pan() {
    let mut viewport = Viewport::new();
    let anchor = Point::new(100.0, 100.0);
    let world_before = viewport.screen_to_world(anchor);
    viewport.zoom(2.0, anchor);
    assert_eq!(viewport.pan, Vec2::new(-100.0, -100.0));
    assert!((viewport.scale - 2.0).abs() < f64::EPSILON);
    let screen_after = viewport.world_to_screen(world_before);
    assert!((screen_after - anchor).hypot() < 1e-9);
}

#[test]
fn test_zoom_clamped_to_config() {
    let config = EngineConfig {
        max_zoom: 2.0,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config);
    for _ in 0..10 {
        engine.zoom_in();
    }
    assert!((engine.state().viewport.scale - 2.0).abs() < 1e-9);
}

#[test]
fn test_saved_scene_round_trips_through_store() {
    let store = MemoryStore::new();
    let mut engine = Engine::default();
    draw(&mut engine, ToolKind::Freehand, (0.0, 0.0), (5.0, 5.0));
    draw(&mut engine, ToolKind::Rectangle, (10.0, 10.0), (20.0, 20.0));
    let id = block_on(engine.save(&store, Some("bob"), 0)).unwrap();

    let mut restored = Engine::default();
    block_on(restored.load(&store, Some("bob"), &id, 0)).unwrap();
    assert_eq!(restored.scene().snapshot(), engine.scene().snapshot());
    assert!(restored.undo().is_empty());
}
