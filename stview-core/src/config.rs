/// Visual constants and viewer configuration
use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A 24-bit RGB color written as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const fn hex(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    pub fn r(self) -> u8 {
        ((self.0 >> 16) & 0xff) as u8
    }

    pub fn g(self) -> u8 {
        ((self.0 >> 8) & 0xff) as u8
    }

    pub fn b(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn to_rgb_f32(self) -> [f32; 3] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
        ]
    }
}

/// Appearance of the built scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub background: Color,
    pub node_size: f32,
    pub node_color: Color,
    pub line_color: Color,
    /// Length of the axes helper lines, if shown
    pub axes_size: Option<f32>,
}

impl Default for SceneStyle {
    fn default() -> Self {
        ViewerConfig::default().scene_style()
    }
}

/// Every customizable constant of the viewer.
///
/// All fields are optional when deserializing; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub background: Color,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_position: [f32; 3],
    pub camera_target: [f32; 3],
    pub node_size: f32,
    pub node_color: Color,
    pub line_color: Color,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub screen_space_panning: bool,
    pub show_axes: bool,
    pub axes_size: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            background: Color::hex(0x808080),
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            camera_position: [0.0, 80.0, 160.0],
            camera_target: [0.0, 0.0, 0.0],
            node_size: 2.0,
            node_color: Color::hex(0xff0000),
            line_color: Color::hex(0x000099),
            enable_damping: true,
            damping_factor: 0.05,
            screen_space_panning: false,
            show_axes: true,
            axes_size: 10.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn scene_style(&self) -> SceneStyle {
        SceneStyle {
            background: self.background,
            node_size: self.node_size,
            node_color: self.node_color,
            line_color: self.line_color,
            axes_size: self.show_axes.then_some(self.axes_size),
        }
    }

    pub fn camera_position(&self) -> Point3<f32> {
        Point3::from(Vector3::from(self.camera_position))
    }

    pub fn camera_target(&self) -> Point3<f32> {
        Point3::from(Vector3::from(self.camera_target))
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.fov_degrees, 75.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 1000.0);
        assert_eq!(config.node_size, 2.0);
        assert_eq!(config.damping_factor, 0.05);
        assert_eq!(config.camera_position(), Point3::new(0.0, 80.0, 160.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ViewerConfig::from_json(r#"{"node_size": 0.5, "show_axes": false}"#).unwrap();
        assert_eq!(config.node_size, 0.5);
        assert_eq!(config.scene_style().axes_size, None);
        assert_eq!(config.line_color, Color::hex(0x000099));
    }

    #[test]
    fn test_color_channels() {
        let color = Color::hex(0x336699);
        assert_eq!((color.r(), color.g(), color.b()), (0x33, 0x66, 0x99));
        let [r, g, b] = Color::hex(0xff0000).to_rgb_f32();
        assert_eq!((r, g, b), (1.0, 0.0, 0.0));
    }
}
