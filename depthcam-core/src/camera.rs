//! The depth camera: configuration shared by both rendering techniques.
//!
//! [`DepthCamera::render`] ray casts a shape, [`DepthCamera::rasterize`] and
//! [`DepthCamera::rasterize_in_camera`] scan-convert its mesh. Both write
//! into caller-owned buffers and keep the nearest depth per pixel, so shapes
//! can be composited by calling them repeatedly on the same buffer.

use crate::projection::CameraConfig;

/// Synthesizes depth images of shapes.
#[derive(Debug, Clone, Default)]
pub struct DepthCamera {
    config: CameraConfig,
}

impl DepthCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn near_clip_z(&self) -> f32 {
        self.config.near_clip_z
    }

    pub fn far_clip(&self) -> f32 {
        self.config.far_clip
    }
}
