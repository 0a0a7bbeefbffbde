/// Viewer lifecycle: initialize, render frames, dispose.
///
/// A [`Viewer`] owns everything one mounted view needs: the centered scene,
/// the camera and its orbit controls, the host renderer and the frame loop.
/// Hosts call [`Viewer::on_frame`] from their frame callback and
/// [`Viewer::dispose`] on teardown.

use log::info;

use crate::builder::build_centered_scene;
use crate::config::ViewerConfig;
use crate::controls::{OrbitControls, PointerButton};
use crate::error::Result;
use crate::frame::{FrameLoop, FrameScheduler};
use crate::model::StructuralModel;
use crate::projection::{Camera, SurfaceSize};
use crate::scene::Scene;

/// Drawing backend of a host
pub trait SceneRenderer {
    /// Draw one frame of the scene from the camera
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()>;

    /// The drawing surface changed size
    fn resize(&mut self, _surface: SurfaceSize) {}

    /// Give back the drawing surface. Called exactly once, on dispose.
    fn release(&mut self);
}

pub struct Viewer<R: SceneRenderer, S: FrameScheduler> {
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    surface: SurfaceSize,
    renderer: R,
    frame_loop: FrameLoop<S>,
    released: bool,
}

impl<R: SceneRenderer, S: FrameScheduler> Viewer<R, S> {
    /// Build and center the scene, set up camera and controls, then request
    /// the first frame.
    pub fn initialize(
        model: &StructuralModel,
        config: &ViewerConfig,
        surface: SurfaceSize,
        renderer: R,
        scheduler: S,
    ) -> Result<Self> {
        let scene = build_centered_scene(model, &config.scene_style())?;
        let camera = Camera::new(config, surface);
        let controls = OrbitControls::new(config, &camera);

        let mut viewer = Self {
            scene,
            camera,
            controls,
            surface,
            renderer,
            frame_loop: FrameLoop::new(scheduler),
            released: false,
        };
        viewer.frame_loop.start()?;

        info!(
            "viewer initialized: {} primitives on a {}x{} surface",
            viewer.scene.primitives().len(),
            surface.width,
            surface.height
        );
        Ok(viewer)
    }

    /// Run one frame: advance control damping, then draw.
    ///
    /// Returns `Ok(false)` once the viewer has been disposed.
    pub fn on_frame(&mut self) -> Result<bool> {
        let Self {
            scene,
            camera,
            controls,
            renderer,
            frame_loop,
            ..
        } = self;
        frame_loop.run_frame(|| {
            controls.update(camera);
            renderer.render(scene, camera)
        })
    }

    /// Stop the frame loop and release the drawing surface. Safe to call twice.
    pub fn dispose(&mut self) {
        self.frame_loop.stop();
        if !self.released {
            self.renderer.release();
            self.released = true;
            info!(
                "viewer disposed after {} frames",
                self.frame_loop.frames_rendered()
            );
        }
    }

    pub fn is_active(&self) -> bool {
        !self.released && self.frame_loop.is_running()
    }

    pub fn resize(&mut self, surface: SurfaceSize) {
        self.surface = surface;
        self.camera.set_surface(surface);
        self.renderer.resize(surface);
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        self.controls.pointer_down(button, x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.controls.pointer_move(x, y, &self.camera, self.surface);
    }

    pub fn pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.wheel(delta_y);
    }

    pub fn rotate(&mut self, left: f32, up: f32) {
        self.controls.rotate_left(left);
        self.controls.rotate_up(up);
    }

    /// Pan by a delta in surface units
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let height = self.surface.height as f32;
        self.controls.pan(dx, dy, &self.camera, height);
    }

    pub fn reset_camera(&mut self) {
        self.controls.reset(&mut self.camera);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &S {
        self.frame_loop.scheduler()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame_loop.frames_rendered()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame_loop.has_pending()
    }
}

impl<R: SceneRenderer, S: FrameScheduler> Drop for Viewer<R, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
