use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use nalgebra::Point3;
use stview_core::{
    Camera, Error, FrameScheduler, MemberRecord, NodeRecord, PointerButton, Result, Scene,
    SceneRenderer, StructuralModel, SurfaceSize, Viewer, ViewerConfig,
};

#[derive(Debug, Default)]
struct HostLog {
    requested: u32,
    canceled: Vec<u32>,
    drawn: Vec<Point3<f32>>,
    released: u32,
    fail_next_draw: bool,
}

struct MockScheduler(Rc<RefCell<HostLog>>);

impl FrameScheduler for MockScheduler {
    type Token = u32;

    fn request_frame(&mut self) -> Result<u32> {
        let mut log = self.0.borrow_mut();
        log.requested += 1;
        Ok(log.requested)
    }

    fn cancel_frame(&mut self, token: u32) {
        self.0.borrow_mut().canceled.push(token);
    }
}

struct MockRenderer(Rc<RefCell<HostLog>>);

impl SceneRenderer for MockRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_next_draw {
            return Err(Error::Render("context lost".into()));
        }
        let first = scene.cubes().next().map(|c| scene.world_point(&c.center));
        log.drawn.push(first.unwrap_or(camera.position));
        Ok(())
    }

    fn release(&mut self) {
        self.0.borrow_mut().released += 1;
    }
}

fn model() -> StructuralModel {
    StructuralModel::new(
        vec![
            NodeRecord::new(1, 0.0, 0.0, 0.0),
            NodeRecord::new(2, 10.0, 0.0, 0.0),
        ],
        vec![MemberRecord::new(1, 2)],
    )
}

fn mount(log: &Rc<RefCell<HostLog>>) -> Viewer<MockRenderer, MockScheduler> {
    Viewer::initialize(
        &model(),
        &ViewerConfig::default(),
        SurfaceSize::new(800, 600),
        MockRenderer(log.clone()),
        MockScheduler(log.clone()),
    )
    .unwrap()
}

#[test]
fn test_first_frame_sees_centered_scene() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let mut viewer = mount(&log);

    assert_eq!(log.borrow().requested, 1);
    assert!(log.borrow().drawn.is_empty());

    assert!(viewer.on_frame().unwrap());
    assert_relative_eq!(log.borrow().drawn[0], Point3::new(-5.0, 0.0, 0.0), epsilon = 1e-5);
    assert_eq!(log.borrow().requested, 2);
}

#[test]
fn test_dispose_cancels_pending_frame_and_releases_once() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let mut viewer = mount(&log);
    viewer.on_frame().unwrap();
    viewer.on_frame().unwrap();

    viewer.dispose();
    assert!(!viewer.is_active());
    assert!(!viewer.has_pending_frame());
    assert_eq!(log.borrow().canceled, vec![3]);

    assert!(!viewer.on_frame().unwrap());
    assert_eq!(log.borrow().drawn.len(), 2);
    assert_eq!(log.borrow().requested, 3);

    viewer.dispose();
    drop(viewer);
    assert_eq!(log.borrow().released, 1);
}

#[test]
fn test_drop_disposes() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    drop(mount(&log));
    assert_eq!(log.borrow().released, 1);
    assert_eq!(log.borrow().canceled, vec![1]);
}

#[test]
fn test_render_failure_stops_loop() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let mut viewer = mount(&log);
    log.borrow_mut().fail_next_draw = true;

    assert!(viewer.on_frame().is_err());
    assert!(!viewer.is_active());
    assert_eq!(log.borrow().requested, 1);
}

#[test]
fn test_drag_moves_camera_over_frames() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let mut viewer = mount(&log);
    let start = viewer.camera().position;

    viewer.pointer_down(PointerButton::Primary, 400.0, 300.0);
    viewer.pointer_move(460.0, 300.0);
    viewer.pointer_up();
    for _ in 0..10 {
        viewer.on_frame().unwrap();
    }
    assert!((viewer.camera().position - start).norm() > 1.0);

    viewer.reset_camera();
    assert_eq!(viewer.camera().position, start);
}

#[test]
fn test_invalid_model_does_not_start_loop() {
    let log = Rc::new(RefCell::new(HostLog::default()));
    let bad = StructuralModel::new(vec![NodeRecord::new(1, "x", "0", "0")], Vec::new());
    let result = Viewer::initialize(
        &bad,
        &ViewerConfig::default(),
        SurfaceSize::new(800, 600),
        MockRenderer(log.clone()),
        MockScheduler(log.clone()),
    );

    assert!(result.is_err());
    assert_eq!(log.borrow().requested, 0);
}
