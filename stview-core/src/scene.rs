/// Scene description: the primitives built from a structural model plus the
/// single translation applied to all of them.
///
/// Primitives keep their model-space positions. Centering only changes the
/// scene offset, and every consumer reads world-space positions through
/// [`Scene::world_point`] or [`Scene::model_matrix`].

use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

use crate::bounds::Aabb;
use crate::config::{Color, SceneStyle};
use crate::model::NodeId;

/// A cube marking one node
#[derive(Debug, Clone, PartialEq)]
pub struct CubePrimitive {
    pub node: NodeId,
    pub center: Point3<f32>,
    pub edge: f32,
}

/// A line drawn for one member
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Cube(CubePrimitive),
    Line(LinePrimitive),
}

impl Primitive {
    /// Model-space bounds
    pub fn bounds(&self) -> Aabb {
        match self {
            Primitive::Cube(cube) => Aabb::around(cube.center, cube.edge),
            Primitive::Line(line) => Aabb::from_points([&line.start, &line.end]),
        }
    }
}

/// One colored line of the axes helper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLine {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    primitives: Vec<Primitive>,
    offset: Vector3<f32>,
    style: SceneStyle,
}

impl Scene {
    pub fn new(style: SceneStyle) -> Self {
        Self {
            primitives: Vec::new(),
            offset: Vector3::zeros(),
            style,
        }
    }

    pub fn add(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn cubes(&self) -> impl Iterator<Item = &CubePrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Cube(cube) => Some(cube),
            Primitive::Line(_) => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = &LinePrimitive> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line(line) => Some(line),
            Primitive::Cube(_) => None,
        })
    }

    pub fn style(&self) -> &SceneStyle {
        &self.style
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }

    pub fn translate(&mut self, delta: &Vector3<f32>) {
        self.offset += delta;
    }

    pub fn world_point(&self, point: &Point3<f32>) -> Point3<f32> {
        point + self.offset
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.offset)
    }

    /// Model-space bounds of every primitive
    pub fn local_bounds(&self) -> Aabb {
        self.primitives
            .iter()
            .fold(Aabb::empty(), |acc, p| acc.union(&p.bounds()))
    }

    /// World-space bounds of every primitive
    pub fn bounding_box(&self) -> Aabb {
        self.local_bounds().translated(&self.offset)
    }

    /// Translate the scene so the center of its bounding box sits at the
    /// origin. Returns the translation that was applied.
    pub fn center(&mut self) -> Vector3<f32> {
        let delta = -self.bounding_box().center().coords;
        self.translate(&delta);
        debug!("centered scene, offset is now {:?}", self.offset);
        delta
    }

    /// Axes helper lines in model space: X red, Y green, Z blue.
    ///
    /// They move with the scene offset but are not primitives and never
    /// count towards the bounding box.
    pub fn axes(&self) -> Option<[AxisLine; 3]> {
        let size = self.style.axes_size?;
        let origin = Point3::origin();
        let axis = |end: Point3<f32>, color: u32| AxisLine {
            start: origin,
            end,
            color: Color::hex(color),
        };
        Some([
            axis(Point3::new(size, 0.0, 0.0), 0xff0000),
            axis(Point3::new(0.0, size, 0.0), 0x00ff00),
            axis(Point3::new(0.0, 0.0, size), 0x0000ff),
        ])
    }
}
