use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity. Names may collide; ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.short())
    }
}

/// Handle to a node in the external scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Content-addressed handle to a loaded model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelId(pub u64);

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// A local-space axis expressed in parent space.
    pub fn local_axis(&self, axis: Vec3) -> Vec3 {
        self.rotation * axis.normalize_or_zero()
    }

    /// Rotate about the parent +Y axis.
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = (Quat::from_rotation_y(angle) * self.rotation).normalize();
    }

    /// Move along a local-space axis by `distance`.
    pub fn translate_on_axis(&mut self, axis: Vec3, distance: f32) {
        self.position += self.local_axis(axis) * distance;
    }

    /// Heading about +Y in radians.
    pub fn yaw(&self) -> f32 {
        self.rotation.to_euler(EulerRot::YXZ).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn quarter_turn_maps_x_to_negative_z() {
        let mut t = Transform::default();
        t.rotate_y(FRAC_PI_2);
        let fwd = t.local_axis(Vec3::X);
        assert!((fwd - Vec3::NEG_Z).length() < 1e-5);
        assert!((t.yaw() - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn translate_follows_rotation() {
        let mut t = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        t.rotate_y(FRAC_PI_2);
        t.translate_on_axis(Vec3::X, 2.0);
        assert!((t.position - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn translate_on_zero_axis_is_noop() {
        let mut t = Transform::default();
        t.translate_on_axis(Vec3::ZERO, 5.0);
        assert_eq!(t.position, Vec3::ZERO);
    }
}
