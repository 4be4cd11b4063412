//! Head-relative movement composition
//!
//! Turns the move stick into a world-space velocity along the horizontal
//! projection of the head's gaze, then adds the vertical velocity.

use glam::{Vec2, Vec3};

use crate::config::LocomotionConfig;

/// Squared length below which a projected direction is treated as degenerate
const DEGENERATE_LENGTH_SQ: f32 = 1e-6;

/// Horizontal, unit-length movement axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for PlanarBasis {
    fn default() -> Self {
        Self {
            forward: -Vec3::Z,
            right: Vec3::X,
        }
    }
}

impl PlanarBasis {
    /// Project world-space head directions onto the horizontal plane.
    ///
    /// When the head looks straight up or down one axis collapses and is
    /// rebuilt from the other. If both collapse, `fallback` is used. Returns
    /// the basis and whether any fallback was needed.
    pub fn from_head(forward: Vec3, right: Vec3, fallback: PlanarBasis) -> (PlanarBasis, bool) {
        match (flatten(forward), flatten(right)) {
            (Some(forward), Some(right)) => (PlanarBasis { forward, right }, false),
            (None, Some(right)) => (
                PlanarBasis {
                    forward: Vec3::Y.cross(right),
                    right,
                },
                true,
            ),
            (Some(forward), None) => (
                PlanarBasis {
                    forward,
                    right: forward.cross(Vec3::Y),
                },
                true,
            ),
            (None, None) => (fallback, true),
        }
    }
}

fn flatten(direction: Vec3) -> Option<Vec3> {
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    let length_sq = planar.length_squared();
    if length_sq.is_finite() && length_sq > DEGENERATE_LENGTH_SQ {
        Some(planar / length_sq.sqrt())
    } else {
        None
    }
}

/// Sprinting needs ground contact, the sprint button, and a strong forward push
pub fn sprint_eligible(
    grounded: bool,
    sprint_held: bool,
    move_axis: Vec2,
    config: &LocomotionConfig,
) -> bool {
    grounded && sprint_held && move_axis.y > config.sprint_input_threshold
}

/// Combine horizontal intent and vertical velocity into a velocity.
///
/// Pure: the caller scales the result by `dt` before moving the body.
pub fn compose_velocity(
    basis: PlanarBasis,
    move_axis: Vec2,
    vertical_velocity: f32,
    sprinting: bool,
    config: &LocomotionConfig,
) -> Vec3 {
    let direction = basis.forward * move_axis.y + basis.right * move_axis.x;
    Vec3::Y * vertical_velocity + direction * config.speed(sprinting)
}
