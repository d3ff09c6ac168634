//! Near-plane clipping of camera-space triangles.
//!
//! The camera looks down -Z, so a vertex is visible when its Z is below the
//! near plane. A triangle straddling the plane is cut along it; the result
//! is zero, one or two triangles, all with the input winding.

use nalgebra::Point3;

/// Triangles left after clipping one input triangle. At most two, stored
/// inline.
#[derive(Debug, Clone, Copy)]
pub struct Clipped {
    triangles: [[Point3<f32>; 3]; 2],
    len: usize,
}

impl Clipped {
    fn none() -> Self {
        Self {
            triangles: [[Point3::origin(); 3]; 2],
            len: 0,
        }
    }

    fn one(a: [Point3<f32>; 3]) -> Self {
        Self {
            triangles: [a, a],
            len: 1,
        }
    }

    fn two(a: [Point3<f32>; 3], b: [Point3<f32>; 3]) -> Self {
        Self {
            triangles: [a, b],
            len: 2,
        }
    }

    pub fn as_slice(&self) -> &[[Point3<f32>; 3]] {
        &self.triangles[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Which corners of a triangle lie beyond the near plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility([bool; 3]);

impl Visibility {
    pub fn classify(points: &[Point3<f32>; 3], near_z: f32) -> Self {
        Self([
            points[0].z < near_z,
            points[1].z < near_z,
            points[2].z < near_z,
        ])
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|v| **v).count()
    }

    pub fn all(&self) -> bool {
        self.0.iter().all(|v| *v)
    }

    pub fn is_visible(&self, corner: usize) -> bool {
        self.0[corner]
    }

    /// The corner whose visibility differs from the other two, or `None`
    /// when all three agree.
    pub fn odd_one_out(&self) -> Option<usize> {
        match self.0 {
            [a, b, c] if a != b && b == c => Some(0),
            [a, b, c] if a != b && a == c => Some(1),
            [a, b, c] if a == b && b != c => Some(2),
            _ => None,
        }
    }
}

/// Point where segment `from → to` crosses `z = near_z`.
///
/// `from` and `to` must lie on opposite sides of the plane.
#[inline]
fn near_plane_point(from: &Point3<f32>, to: &Point3<f32>, near_z: f32) -> Point3<f32> {
    let edge = to - from;
    let t = (near_z - from.z) / edge.z;
    Point3::new(from.x + edge.x * t, from.y + edge.y * t, near_z)
}

/// Clip a camera-space triangle against the plane `z = near_z`.
pub fn clip_triangle(points: &[Point3<f32>; 3], near_z: f32) -> Clipped {
    let visibility = Visibility::classify(points, near_z);

    match visibility.odd_one_out() {
        None if visibility.all() => Clipped::one(*points),
        None => Clipped::none(),
        Some(i) if visibility.is_visible(i) => {
            // Lone visible corner, rotated to come first
            let v0 = points[i];
            let v1 = points[(i + 1) % 3];
            let v2 = points[(i + 2) % 3];

            let p01 = near_plane_point(&v0, &v1, near_z);
            let p02 = near_plane_point(&v0, &v2, near_z);
            Clipped::one([v0, p01, p02])
        }
        Some(i) => {
            // Lone hidden corner, rotated to come last
            let v_out = points[i];
            let v_in0 = points[(i + 1) % 3];
            let v_in1 = points[(i + 2) % 3];

            let p1 = near_plane_point(&v_in0, &v_out, near_z);
            let p2 = near_plane_point(&v_in1, &v_out, near_z);
            Clipped::two([v_in0, v_in1, p1], [p1, v_in1, p2])
        }
    }
}
