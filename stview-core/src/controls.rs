/// Orbit camera controls with damping.
///
/// The camera orbits a look-at target on a sphere. Input (pointer drags,
/// wheel steps, keys) only accumulates pending rotation, pan and zoom; the
/// camera moves in [`OrbitControls::update`], which is called once per frame.
/// With damping enabled each update applies a fraction of the pending motion
/// and decays the rest, so motion eases out instead of stopping abruptly.

use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::config::ViewerConfig;
use crate::projection::{Camera, SurfaceSize};

const EPS: f32 = 1e-6;

/// Spherical coordinates around +Y: `theta` is the azimuth measured from +Z
/// towards +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(offset: &Vector3<f32>) -> Self {
        let radius = offset.norm();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    mode: DragMode,
    last: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub screen_space_panning: bool,
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    spherical_delta: Spherical,
    pan_offset: Vector3<f32>,
    scale: f32,
    drag: Option<Drag>,
    last_position: Point3<f32>,

    saved_target: Point3<f32>,
    saved_position: Point3<f32>,
}

impl OrbitControls {
    pub fn new(config: &ViewerConfig, camera: &Camera) -> Self {
        Self {
            target: camera.target,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            screen_space_panning: config.screen_space_panning,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            pan_offset: Vector3::zeros(),
            scale: 1.0,
            drag: None,
            last_position: camera.position,
            saved_target: camera.target,
            saved_position: camera.position,
        }
    }

    /// Orbit around the target, positive angles turn the camera to the left
    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    /// Orbit over the target, positive angles raise the camera
    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Pan by a screen-space delta in pixels.
    ///
    /// The distance moved is scaled so the point under the pointer at the
    /// target depth follows the pointer.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &Camera, viewport_height: f32) {
        let target_distance = camera.offset().norm() * (camera.fov / 2.0).tan();
        let (right, up) = camera.basis();

        let left = right * (-2.0 * dx * target_distance / viewport_height) * self.pan_speed;
        let vertical = if self.screen_space_panning {
            up
        } else {
            camera.up.cross(&right)
        };
        let up = vertical * (2.0 * dy * target_distance / viewport_height) * self.pan_speed;

        self.pan_offset += left + up;
    }

    /// Move the camera towards the target
    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    /// Move the camera away from the target
    pub fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        let mode = match button {
            PointerButton::Primary => DragMode::Rotate,
            PointerButton::Middle | PointerButton::Secondary => DragMode::Pan,
        };
        self.drag = Some(Drag { mode, last: (x, y) });
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &Camera, viewport: SurfaceSize) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let (dx, dy) = (x - drag.last.0, y - drag.last.1);
        drag.last = (x, y);
        let mode = drag.mode;

        let height = viewport.height as f32;
        match mode {
            DragMode::Rotate => {
                self.rotate_left(2.0 * PI * dx * self.rotate_speed / height);
                self.rotate_up(2.0 * PI * dy * self.rotate_speed / height);
            }
            DragMode::Pan => self.pan(dx, dy, camera, height),
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// One wheel step; negative `delta_y` (scrolling up) zooms in
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.dolly_in(self.zoom_scale());
        } else if delta_y > 0.0 {
            self.dolly_out(self.zoom_scale());
        }
    }

    /// Apply pending motion to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let mut spherical = Spherical::from_offset(&camera.offset());

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.spherical_delta.theta * step;
        spherical.phi += self.spherical_delta.phi * step;
        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(EPS, PI - EPS);

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * step;

        camera.target = self.target;
        camera.position = self.target + spherical.to_offset();

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vector3::zeros();
        }
        self.scale = 1.0;

        let moved = (camera.position - self.last_position).norm_squared() > EPS;
        self.last_position = camera.position;
        moved
    }

    /// Restore the target and camera position the controls started with
    pub fn reset(&mut self, camera: &mut Camera) {
        self.target = self.saved_target;
        camera.target = self.saved_target;
        camera.position = self.saved_position;
        self.spherical_delta = Spherical::default();
        self.pan_offset = Vector3::zeros();
        self.scale = 1.0;
        self.drag = None;
        self.last_position = camera.position;
    }
}
