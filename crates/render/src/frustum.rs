use glam::{Mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::services::Visibility;

/// Six clip planes extracted from a view-projection matrix (0..1 depth).
///
/// Each plane is stored as `(normal, d)` with the inside on the positive side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    pub fn from_matrix(m: Mat4) -> Self {
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        Self {
            planes: [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2],
        }
    }

    pub fn from_camera(camera: &Camera) -> Self {
        Self::from_matrix(camera.view_projection())
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(p) + plane.w >= 0.0)
    }
}

/// Visibility predicate backed by [`Frustum`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FrustumTest;

impl Visibility for FrustumTest {
    fn contains_point(&self, camera: &Camera, point: Vec3) -> bool {
        Frustum::from_camera(camera).contains_point(point)
    }
}
