//! Core types used throughout the Stride rig

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a locomotion entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rotation about +Y that turns the rig by `degrees` to the right.
///
/// Headings grow clockwise when seen from above, so a positive stick
/// deflection produces a positive heading change.
pub fn heading_rotation(degrees: f32) -> Quat {
    Quat::from_rotation_y(-degrees.to_radians())
}

/// Heading of a rotation in degrees, clockwise from -Z seen from above
pub fn heading_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    -yaw.to_degrees()
}

/// Transform of a rig in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Current heading in degrees
    pub fn heading(&self) -> f32 {
        heading_degrees(self.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_rotation_turns_right() {
        let transform = Transform::from_position_rotation(Vec3::ZERO, heading_rotation(90.0));
        let forward = transform.forward();
        assert!((forward - Vec3::X).length() < 1e-5);
        assert!((transform.heading() - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_heading_round_trips_negative_angles() {
        let rotation = heading_rotation(-30.0);
        assert!((heading_degrees(rotation) + 30.0).abs() < 1e-4);
    }
}
