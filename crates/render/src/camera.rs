use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking from `position` at `target`.
///
/// Camera motion lives with the host; the runtime only reads a copy of it
/// once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 40.0, 80.0),
            target: Vec3::new(0.0, 5.0, 0.0),
            fov_degrees: 45.0,
            aspect: 2.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Match the aspect ratio to a resized drawing surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert!(cam.position.y > 0.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert!(cam.forward().z < 0.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut cam = Camera::default();
        cam.resize(1280, 720);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
        cam.resize(10, 0);
        assert_eq!(cam.aspect, 10.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cam: Camera = serde_json::from_str(r#"{"fov_degrees": 60.0}"#).unwrap();
        assert_eq!(cam.fov_degrees, 60.0);
        assert_eq!(cam.far, 1000.0);
    }
}
