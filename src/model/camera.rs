use glam::{Mat4, Quat, Vec3};

/// Perspective camera with a quaternion orientation.
///
/// Rotations compose in the camera's local frame, so a sequence of
/// `rotate_on_axis` calls reads like "turn, then tilt about the turned axis".
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov_y: f32,
    pub aspect: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 40.0),
            rotation: Quat::IDENTITY,
            fov_y: 75f32.to_radians(),
            aspect: width as f32 / height.max(1) as f32,
            z_near: 0.1,
            z_far: 2000.0,
        }
    }

    pub fn reset_rotation(&mut self) {
        self.rotation = Quat::IDENTITY;
    }

    /// Rotate about `axis` expressed in the camera's current local frame.
    pub fn rotate_on_axis(&mut self, axis: Vec3, angle: f32) {
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
    }

    /// Transform a camera-local vector into world space.
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// The camera looks down its local -Z axis.
    pub fn forward(&self) -> Vec3 {
        self.local_to_world(Vec3::NEG_Z)
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
