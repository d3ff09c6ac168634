//! Rigid poses and rotation state
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

/// Rigid transform between two frames.
///
/// Applying an object pose to a point in the object's local frame yields the
/// point in the parent frame. Inverse and composition come from nalgebra.
pub type Pose3D = Isometry3<f32>;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Rotation applying X, then Y, then Z.
    pub fn to_rotation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(self.x, self.y, self.z)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Helpers for building and combining poses
pub struct Transform;

impl Transform {
    /// Pose from a translation and a rotation state.
    pub fn pose(x: f32, y: f32, z: f32, rotation: &RotationState) -> Pose3D {
        Isometry3::from_parts(Translation3::new(x, y, z), rotation.to_rotation())
    }

    /// Pose that only translates.
    pub fn translation(x: f32, y: f32, z: f32) -> Pose3D {
        Isometry3::translation(x, y, z)
    }

    /// Pose of an object expressed in the camera frame.
    ///
    /// Both inputs are expressed in a common world frame.
    pub fn camera_space(camera_pose: &Pose3D, object_pose: &Pose3D) -> Pose3D {
        camera_pose.inverse() * object_pose
    }

    /// Re-express a rendering-frame pose (y up, looking down -Z) in the
    /// optical frame (y down, looking down +Z) by a half turn about X.
    pub fn to_optical(pose: &Pose3D) -> Pose3D {
        let half_turn = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), std::f32::consts::PI);
        Isometry3::from_parts(Translation3::identity(), half_turn) * pose
    }

    /// Apply the full pose to a point.
    pub fn apply(pose: &Pose3D, point: &Point3<f32>) -> Point3<f32> {
        pose * point
    }

    /// Apply only the rotation part, for directions.
    pub fn apply_rotation_only(pose: &Pose3D, vector: &Vector3<f32>) -> Vector3<f32> {
        pose.rotation * vector
    }
}
