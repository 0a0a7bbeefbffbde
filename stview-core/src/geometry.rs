/// Triangle meshes used to draw node cubes
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding order
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let edge1 = self.vertices[1].position - v0;
        let edge2 = self.vertices[2].position - v0;
        edge1.cross(&edge2).normalize()
    }
}

/// Outward normal and the two in-plane axes of each cube face, ordered so
/// that `u x v == normal` (counter-clockwise when seen from outside).
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
];

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Axis-aligned cube of the given edge length centered on `center`
    pub fn cube(center: Point3<f32>, edge: f32) -> Self {
        let half = edge / 2.0;
        let mut mesh = Self::with_capacity(12);

        for (normal, u, v) in CUBE_FACES {
            let normal = Vector3::from(normal);
            let u = Vector3::from(u) * half;
            let v = Vector3::from(v) * half;
            let face = center + normal * half;

            let corner = |su: f32, sv: f32| Vertex::new(face + u * su + v * sv, normal);
            let (a, b, c, d) = (
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            );
            mesh.add_triangle(Triangle::new(a, b, c));
            mesh.add_triangle(Triangle::new(a, c, d));
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_has_twelve_triangles() {
        let mesh = Mesh::cube(Point3::origin(), 2.0);
        assert_eq!(mesh.triangles.len(), 12);
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let mesh = Mesh::cube(Point3::new(3.0, -1.0, 2.0), 2.0);
        for triangle in &mesh.triangles {
            assert_relative_eq!(
                triangle.calculate_normal(),
                triangle.vertices[0].normal,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_cube_extent() {
        let center = Point3::new(10.0, 0.0, 0.0);
        let mesh = Mesh::cube(center, 2.0);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                let d = vertex.position - center;
                assert_relative_eq!(d.amax(), 1.0, epsilon = 1e-6);
            }
        }
    }
}
