//! Shapes that can be both ray cast and rasterized.

use std::path::Path;

use nalgebra::Vector3;

use crate::error::Result;
use crate::geometry::{Mesh, Ray};
use crate::stl;

/// A renderable shape in its own local frame.
///
/// The rasterizer only needs [`Shape::mesh`] and [`Shape::max_radius`]; the
/// ray caster only needs [`Shape::intersect`].
pub trait Shape {
    /// Triangle mesh approximating the shape.
    fn mesh(&self) -> &Mesh;

    /// Radius of a sphere around the local origin that contains the shape.
    fn max_radius(&self) -> f32 {
        self.mesh().max_radius()
    }

    /// Distance to the nearest surface hit with `t_min <= t <= t_max`.
    fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<f32>;
}

/// An arbitrary triangle mesh, intersected triangle by triangle.
#[derive(Debug, Clone)]
pub struct MeshShape {
    mesh: Mesh,
    max_radius: f32,
}

impl MeshShape {
    pub fn new(mesh: Mesh) -> Self {
        let max_radius = mesh.max_radius();
        Self { mesh, max_radius }
    }

    /// Load a binary or ASCII STL file.
    pub fn from_stl_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(Self::new(stl::parse_stl(&data)?))
    }
}

impl Shape for MeshShape {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn max_radius(&self) -> f32 {
        self.max_radius
    }

    fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<f32> {
        self.mesh
            .triangles
            .iter()
            .filter_map(|triangle| {
                let [v0, v1, v2] = self.mesh.triangle_points(triangle);
                intersect_triangle(ray, &v0.coords, &v1.coords, &v2.coords)
            })
            .filter(|t| *t >= t_min && *t <= t_max)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Möller–Trumbore ray/triangle test, both sides counted as hits.
fn intersect_triangle(
    ray: &Ray,
    v0: &Vector3<f32>,
    v1: &Vector3<f32>,
    v2: &Vector3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin.coords - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some(f * edge2.dot(&q))
}

/// Axis-aligned box centred on its local origin.
#[derive(Debug, Clone)]
pub struct BoxShape {
    half_extents: Vector3<f32>,
    mesh: Mesh,
}

impl BoxShape {
    pub fn new(size: Vector3<f32>) -> Self {
        let half_extents = size / 2.0;
        Self {
            half_extents,
            mesh: Mesh::cuboid(half_extents),
        }
    }

    pub fn cube(size: f32) -> Self {
        Self::new(Vector3::new(size, size, size))
    }

    pub fn half_extents(&self) -> &Vector3<f32> {
        &self.half_extents
    }
}

impl Shape for BoxShape {
    fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    fn max_radius(&self) -> f32 {
        self.half_extents.norm()
    }

    /// Slab test. From inside the box the exit distance is the hit.
    fn intersect(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<f32> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let half = self.half_extents[axis];

            if direction.abs() < f32::EPSILON {
                if origin < -half || origin > half {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let t0 = (-half - origin) * inv;
            let t1 = (half - origin) * inv;
            t_enter = t_enter.max(t0.min(t1));
            t_exit = t_exit.min(t0.max(t1));

            if t_enter > t_exit {
                return None;
            }
        }

        [t_enter, t_exit]
            .into_iter()
            .find(|t| *t >= t_min && *t <= t_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_box_hit_front_face() {
        let shape = BoxShape::cube(1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let t = shape.intersect(&ray, 0.0, 10.0).unwrap();
        assert_relative_eq!(t, 4.5, epsilon = 1e-6);
    }

    #[test]
    fn test_box_miss() {
        let shape = BoxShape::cube(1.0);
        let ray = Ray::new(Point3::new(2.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(shape.intersect(&ray, 0.0, 10.0).is_none());
    }

    #[test]
    fn test_box_beyond_far_clip() {
        let shape = BoxShape::cube(1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -20.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(shape.intersect(&ray, 0.0, 10.0).is_none());
    }

    #[test]
    fn test_box_from_inside_hits_exit() {
        let shape = BoxShape::cube(2.0);
        let ray = Ray::new(Point3::origin(), Vector3::new(1.0, 0.0, 0.0));
        let t = shape.intersect(&ray, 0.0, 10.0).unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mesh_shape_matches_box() {
        let boxed = BoxShape::cube(1.0);
        let meshed = MeshShape::new(Mesh::cube(1.0));
        let ray = Ray::new(Point3::new(0.1, 0.2, 3.0), Vector3::new(0.0, 0.0, -1.0));

        let t_box = boxed.intersect(&ray, 0.0, 10.0).unwrap();
        let t_mesh = meshed.intersect(&ray, 0.0, 10.0).unwrap();
        assert_relative_eq!(t_box, t_mesh, epsilon = 1e-5);
        assert_relative_eq!(t_mesh, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_mesh_shape_respects_t_min() {
        let meshed = MeshShape::new(Mesh::cube(1.0));
        let ray = Ray::new(Point3::new(0.0, 0.0, 3.0), Vector3::new(0.0, 0.0, -1.0));
        // Skip the near face, hit the far one
        let t = meshed.intersect(&ray, 3.0, 10.0).unwrap();
        assert_relative_eq!(t, 3.5, epsilon = 1e-5);
    }

    #[test]
    fn test_max_radius() {
        let shape = BoxShape::new(Vector3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(shape.max_radius(), 3.0f32.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(
            MeshShape::new(Mesh::cube(2.0)).max_radius(),
            shape.max_radius(),
            epsilon = 1e-6
        );
    }
}
