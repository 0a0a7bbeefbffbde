/// stview Core Library - Structural model scene construction
///
/// This library turns node/member datasets into a centered 3D scene and
/// provides the host-independent parts of the viewer: camera, orbit
/// controls, the frame loop and the initialize/dispose lifecycle.

pub mod bounds;
pub mod builder;
pub mod config;
pub mod controls;
pub mod coordinate;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod model;
pub mod projection;
pub mod scene;
pub mod viewer;

// Re-export commonly used types
pub use bounds::Aabb;
pub use builder::{build_centered_scene, build_scene};
pub use config::{Color, SceneStyle, ViewerConfig};
pub use controls::{OrbitControls, PointerButton};
pub use error::{Error, Result};
pub use frame::{FrameLoop, FrameScheduler, LoopState};
pub use geometry::{Mesh, Triangle, Vertex};
pub use model::{MemberRecord, NodeId, NodeRecord, StructuralModel};
pub use projection::{Camera, SurfaceSize};
pub use scene::{AxisLine, CubePrimitive, LinePrimitive, Primitive, Scene};
pub use viewer::{SceneRenderer, Viewer};
