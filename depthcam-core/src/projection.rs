//! Pinhole projection and camera configuration
use std::path::Path;

use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pinhole intrinsics in pixels.
///
/// Two camera frames meet here. [`PinholeProjection::project`] works in the
/// rendering frame (x right, y up, looking down -Z) used by the rasterizer.
/// [`PinholeProjection::pixel_direction`] returns rays in the optical frame
/// (x right, y down, looking down +Z) used by the ray caster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinholeProjection {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeProjection {
    pub fn new(fx: f32, fy: f32, cx: f32, cy: f32) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Default intrinsics for an image: focal length equal to the image size,
    /// principal point in the centre.
    pub fn for_image(width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self::new(w, h, w / 2.0, h / 2.0)
    }

    /// Project a camera-space point with `z < 0` to pixel coordinates.
    #[inline]
    pub fn project(&self, point: &Point3<f32>) -> Point2<f32> {
        let depth = -point.z;
        Point2::new(
            self.cx + self.fx * point.x / depth,
            self.cy - self.fy * point.y / depth,
        )
    }

    /// Camera-space point that projects to `pixel` at distance `depth`.
    pub fn unproject(&self, pixel: &Point2<f32>, depth: f32) -> Point3<f32> {
        Point3::new(
            (pixel.x - self.cx) / self.fx * depth,
            -(pixel.y - self.cy) / self.fy * depth,
            -depth,
        )
    }

    /// Unnormalized optical-frame ray direction through pixel corner `(mx, my)`.
    #[inline]
    pub fn pixel_direction(&self, mx: usize, my: usize) -> Vector3<f32> {
        Vector3::new(
            (mx as f32 - self.cx) / self.fx,
            (my as f32 - self.cy) / self.fy,
            1.0,
        )
    }
}

/// Configuration of a [`DepthCamera`](crate::DepthCamera).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera-space Z of the near plane; geometry must lie below it.
    pub near_clip_z: f32,
    /// Largest ray distance the ray caster accepts.
    pub far_clip: f32,
    /// Fixed intrinsics; derived from the image size when absent.
    pub intrinsics: Option<PinholeProjection>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near_clip_z: -0.1,
            far_clip: 10.0,
            intrinsics: None,
        }
    }
}

impl CameraConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.near_clip_z < 0.0) {
            return Err(Error::InvalidConfig(format!(
                "near_clip_z must be negative, got {}",
                self.near_clip_z
            )));
        }
        if !(self.far_clip > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "far_clip must be positive, got {}",
                self.far_clip
            )));
        }
        if let Some(k) = &self.intrinsics {
            if !(k.fx > 0.0 && k.fy > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "focal lengths must be positive, got fx={} fy={}",
                    k.fx, k.fy
                )));
            }
        }
        Ok(())
    }

    /// Intrinsics to use for an image of the given size.
    pub fn projection_for(&self, width: usize, height: usize) -> PinholeProjection {
        self.intrinsics
            .unwrap_or_else(|| PinholeProjection::for_image(width, height))
    }
}
