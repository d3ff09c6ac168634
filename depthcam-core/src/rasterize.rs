//! Mesh rasterization into a [`FrameBuffer`].

use log::{debug, trace};
use nalgebra::{Point2, Point3};

use crate::camera::DepthCamera;
use crate::clip::{clip_triangle, Visibility};
use crate::framebuffer::{FrameBuffer, OwnerId, RasterizeResult};
use crate::scanline::{fill_triangle, FillTag, ScreenVertex};
use crate::shape::Shape;
use crate::transform::{Pose3D, Transform};

impl DepthCamera {
    /// Rasterize `shape` placed at `object_pose`, seen from `camera_pose`.
    ///
    /// Both poses are expressed in the same world frame.
    pub fn rasterize<S: Shape + ?Sized>(
        &self,
        shape: &S,
        camera_pose: &Pose3D,
        object_pose: &Pose3D,
        frame: &mut FrameBuffer,
        owner: Option<OwnerId>,
    ) -> RasterizeResult {
        let pose = Transform::camera_space(camera_pose, object_pose);
        self.rasterize_in_camera(shape, &pose, frame, owner)
    }

    /// Rasterize `shape` whose pose is already expressed in the camera frame
    /// (x right, y up, looking down -Z).
    ///
    /// Every written pixel gets the triangle's index in the triangle map and,
    /// when `owner` is given, the owner tag in the owner map. The maps are
    /// resized to the image if needed but never cleared here.
    ///
    /// Returns the pixel rectangle touched by this call; it is inverted
    /// (`is_empty()`) when nothing reached the image.
    pub fn rasterize_in_camera<S: Shape + ?Sized>(
        &self,
        shape: &S,
        pose: &Pose3D,
        frame: &mut FrameBuffer,
        owner: Option<OwnerId>,
    ) -> RasterizeResult {
        frame.fit_maps();

        let (width, height) = (frame.width(), frame.height());
        let mut bounds = RasterizeResult::inverted(width, height);

        let max_radius = shape.max_radius();
        let origin_z = pose.translation.vector.z;
        if max_radius < origin_z {
            debug!(
                "shape (radius {}) entirely behind the camera at z = {}",
                max_radius, origin_z
            );
            return bounds;
        }

        let projection = self.config().projection_for(width, height);
        let near_z = self.near_clip_z();
        let mesh = shape.mesh();

        let points: Vec<Point3<f32>> = mesh.points.iter().map(|p| pose * p).collect();
        let pixels: Vec<Point2<f32>> = points.iter().map(|p| projection.project(p)).collect();

        let mut emitted = 0;
        let mut written = 0;
        for (index, triangle) in mesh.triangles.iter().enumerate() {
            let tag = FillTag {
                owner,
                triangle: index as u32,
            };
            let corners = [points[triangle.i1], points[triangle.i2], points[triangle.i3]];

            if Visibility::classify(&corners, near_z).all() {
                let vertices = [
                    ScreenVertex::new(pixels[triangle.i1], -corners[0].z),
                    ScreenVertex::new(pixels[triangle.i2], -corners[1].z),
                    ScreenVertex::new(pixels[triangle.i3], -corners[2].z),
                ];
                written += fill_triangle(frame, vertices, tag, &mut bounds);
                emitted += 1;
                continue;
            }

            for &clipped in clip_triangle(&corners, near_z).as_slice() {
                let vertices = clipped.map(|p| ScreenVertex::new(projection.project(&p), -p.z));
                written += fill_triangle(frame, vertices, tag, &mut bounds);
                emitted += 1;
            }
        }

        trace!(
            "rasterized {} triangles ({} after clipping), {} pixels written",
            mesh.triangles.len(),
            emitted,
            written
        );
        bounds
    }
}
