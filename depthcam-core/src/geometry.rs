//! Geometry primitives shared by the ray caster and the rasterizer
use nalgebra::{Point3, Unit, Vector3};

/// A triangle as an index triple into [`Mesh::points`].
///
/// The order of the indices is the winding order; the rasterizer treats
/// counter-clockwise (seen from outside) as front-facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleI {
    pub i1: usize,
    pub i2: usize,
    pub i3: usize,
}

impl TriangleI {
    pub fn new(i1: usize, i2: usize, i3: usize) -> Self {
        Self { i1, i2, i3 }
    }

    /// Same triangle with the opposite winding.
    pub fn flipped(&self) -> Self {
        Self::new(self.i1, self.i3, self.i2)
    }
}

/// An indexed triangle mesh
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub points: Vec<Point3<f32>>,
    pub triangles: Vec<TriangleI>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(points: usize, triangles: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Append a point and return its index.
    pub fn add_point(&mut self, point: Point3<f32>) -> usize {
        self.points.push(point);
        self.points.len() - 1
    }

    pub fn add_triangle(&mut self, i1: usize, i2: usize, i3: usize) {
        self.triangles.push(TriangleI::new(i1, i2, i3));
    }

    /// Corner points of a triangle.
    pub fn triangle_points(&self, triangle: &TriangleI) -> [Point3<f32>; 3] {
        [
            self.points[triangle.i1],
            self.points[triangle.i2],
            self.points[triangle.i3],
        ]
    }

    /// Largest distance of any point from the local origin.
    pub fn max_radius(&self) -> f32 {
        self.points
            .iter()
            .map(|p| p.coords.norm())
            .fold(0.0, f32::max)
    }

    /// Axis-aligned box centred on the origin, outward CCW winding.
    pub fn cuboid(half_extents: Vector3<f32>) -> Self {
        let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);
        let mut mesh = Self::with_capacity(8, 12);

        for &(x, y, z) in &[
            (-hx, -hy, -hz),
            (hx, -hy, -hz),
            (hx, hy, -hz),
            (-hx, hy, -hz),
            (-hx, -hy, hz),
            (hx, -hy, hz),
            (hx, hy, hz),
            (-hx, hy, hz),
        ] {
            mesh.add_point(Point3::new(x, y, z));
        }

        // Front (+z)
        mesh.add_triangle(4, 5, 6);
        mesh.add_triangle(4, 6, 7);

        // Back (-z)
        mesh.add_triangle(0, 3, 2);
        mesh.add_triangle(0, 2, 1);

        // Top (+y)
        mesh.add_triangle(3, 7, 6);
        mesh.add_triangle(3, 6, 2);

        // Bottom (-y)
        mesh.add_triangle(0, 1, 5);
        mesh.add_triangle(0, 5, 4);

        // Right (+x)
        mesh.add_triangle(1, 2, 6);
        mesh.add_triangle(1, 6, 5);

        // Left (-x)
        mesh.add_triangle(0, 4, 7);
        mesh.add_triangle(0, 7, 3);

        mesh
    }

    /// Create a cube mesh with the given edge length
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        Self::cuboid(Vector3::new(half, half, half))
    }
}

/// A ray with an origin and a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    /// Create a ray; `direction` is normalized.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: Unit::new_normalize(direction),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.as_ref() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal(mesh: &Mesh, triangle: &TriangleI) -> Vector3<f32> {
        let [a, b, c] = mesh.triangle_points(triangle);
        (b - a).cross(&(c - a))
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.points.len(), 8);
        assert_eq!(mesh.triangles.len(), 12);

        for triangle in &mesh.triangles {
            let [a, b, c] = mesh.triangle_points(triangle);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(
                normal(&mesh, triangle).dot(&centroid) > 0.0,
                "triangle {:?} faces inward",
                triangle
            );
        }
    }

    #[test]
    fn test_max_radius() {
        let mesh = Mesh::cube(2.0);
        assert!((mesh.max_radius() - 3.0f32.sqrt()).abs() < 1e-6);
        assert_eq!(Mesh::new().max_radius(), 0.0);
    }

    #[test]
    fn test_flipped_reverses_normal() {
        let mesh = Mesh::cube(1.0);
        let triangle = mesh.triangles[0];
        let n = normal(&mesh, &triangle);
        let n_flipped = normal(&mesh, &triangle.flipped());
        assert!((n + n_flipped).norm() < 1e-6);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3::origin(), Vector3::new(0.0, 0.0, 2.0));
        let p = ray.at(3.0);
        assert!((p.z - 3.0).abs() < 1e-6);
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
    }
}
