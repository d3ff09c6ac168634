/// Depthcam Core Library - Depth images from meshes and analytic shapes
///
/// A [`DepthCamera`] turns a shape and its pose into a depth image, either by
/// casting one ray per pixel or by rasterizing the shape's triangles with
/// near-plane clipping and back-face culling. Rasterized frames also record
/// which owner and which triangle produced every pixel.

pub mod camera;
pub mod clip;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod projection;
pub mod rasterize;
pub mod raycast;
pub mod scanline;
pub mod shape;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use camera::DepthCamera;
pub use error::{Error, Result};
pub use framebuffer::{
    DepthImage, FrameBuffer, OwnerId, OwnerMap, PixelMap, RasterizeResult, TriangleMap,
};
pub use geometry::{Mesh, Ray, TriangleI};
pub use projection::{CameraConfig, PinholeProjection};
pub use shape::{BoxShape, MeshShape, Shape};
pub use transform::{Pose3D, RotationState, Transform};
