//! Per-pixel ray casting.

use log::trace;
use nalgebra::Point3;

use crate::camera::DepthCamera;
use crate::framebuffer::DepthImage;
use crate::geometry::Ray;
use crate::shape::Shape;
use crate::transform::Pose3D;

impl DepthCamera {
    /// Ray cast `shape` into `image`.
    ///
    /// `pose` places the shape in the camera's optical frame (x right,
    /// y down, looking down +Z). Every pixel casts one ray; a hit closer than
    /// the stored depth (or on an unwritten pixel) replaces it, a miss leaves
    /// the pixel alone. Returns the number of pixels written.
    pub fn render<S: Shape + ?Sized>(&self, shape: &S, pose: &Pose3D, image: &mut DepthImage) -> usize {
        let (width, height) = (image.width(), image.height());
        let projection = self.config().projection_for(width, height);
        let far_clip = self.far_clip();

        // Rays are built in the camera frame and tested in the shape's frame
        let to_shape = pose.inverse();
        let origin = to_shape * Point3::origin();

        let mut written = 0;
        for my in 0..height {
            for mx in 0..width {
                let direction = projection.pixel_direction(mx, my).normalize();
                let ray = Ray::new(origin, to_shape.rotation * direction);

                if let Some(distance) = shape.intersect(&ray, 0.0, far_clip) {
                    if image.write_nearest(mx, my, distance) {
                        written += 1;
                    }
                }
            }
        }

        trace!("ray cast {}x{} image, {} pixels written", width, height, written);
        written
    }
}
