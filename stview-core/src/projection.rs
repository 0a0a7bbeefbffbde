/// Perspective camera and surface sizing
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::ViewerConfig;

/// Pixel (or cell) size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. Not guarded: a zero height yields a non-finite ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Perspective camera looking at a target
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &ViewerConfig, surface: SurfaceSize) -> Self {
        let mut camera = Self {
            position: config.camera_position(),
            target: config.camera_target(),
            up: Vector3::y(),
            fov: config.fov_radians(),
            aspect: 1.0,
            near: config.near,
            far: config.far,
        };
        camera.set_surface(surface);
        camera
    }

    pub fn set_surface(&mut self, surface: SurfaceSize) {
        self.aspect = surface.aspect_ratio();
        if !self.aspect.is_finite() || self.aspect == 0.0 {
            warn!(
                "surface {}x{} gives a degenerate aspect ratio",
                surface.width, surface.height
            );
        }
    }

    /// Camera-to-target offset
    pub fn offset(&self) -> Vector3<f32> {
        self.position - self.target
    }

    /// Camera right and up axes in world space (columns 0 and 1 of the camera's world matrix)
    pub fn basis(&self) -> (Vector3<f32>, Vector3<f32>) {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(&self.up).normalize();
        let up = right.cross(&forward);
        (right, up)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Right-handed OpenGL-style perspective matrix.
    ///
    /// Built by hand rather than through `Perspective3`, which asserts on a
    /// zero aspect ratio; a degenerate surface just produces an unusable matrix.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let f = 1.0 / (self.fov / 2.0).tan();
        let depth = self.near - self.far;
        Matrix4::new(
            f / self.aspect, 0.0, 0.0, 0.0,
            0.0, f, 0.0, 0.0,
            0.0, 0.0, (self.far + self.near) / depth, 2.0 * self.far * self.near / depth,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `depth` in normalized device coordinates,
    /// or `None` outside the clip volume.
    pub fn project_to_screen(&self, point: &Point3<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
        let clip = self.view_projection() * point.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
        Some((screen_x, screen_y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&ViewerConfig::default(), SurfaceSize::new(800, 600))
    }
}
