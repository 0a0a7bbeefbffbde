/// Flat vertex arrays for the GPU, built once from a scene
use nalgebra::Point3;
use stview_core::{Color, Mesh, Scene};

fn push_point(buffer: &mut Vec<f32>, point: &Point3<f32>) {
    buffer.extend_from_slice(point.coords.as_slice());
}

/// Model-space vertex positions, three floats per vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneBuffers {
    /// Triangle list of every node cube
    pub cubes: Vec<f32>,
    /// Line list of every member
    pub lines: Vec<f32>,
    /// One two-vertex line list per helper axis
    pub axes: Vec<(Color, Vec<f32>)>,
}

impl SceneBuffers {
    pub fn from_scene(scene: &Scene) -> Self {
        let mut buffers = Self::default();

        for cube in scene.cubes() {
            let mesh = Mesh::cube(cube.center, cube.edge);
            for triangle in &mesh.triangles {
                for vertex in &triangle.vertices {
                    push_point(&mut buffers.cubes, &vertex.position);
                }
            }
        }

        for line in scene.lines() {
            push_point(&mut buffers.lines, &line.start);
            push_point(&mut buffers.lines, &line.end);
        }

        if let Some(axes) = scene.axes() {
            for axis in axes {
                let mut vertices = Vec::with_capacity(6);
                push_point(&mut vertices, &axis.start);
                push_point(&mut vertices, &axis.end);
                buffers.axes.push((axis.color, vertices));
            }
        }

        buffers
    }

    pub fn cube_vertex_count(&self) -> i32 {
        (self.cubes.len() / 3) as i32
    }

    pub fn line_vertex_count(&self) -> i32 {
        (self.lines.len() / 3) as i32
    }
}
