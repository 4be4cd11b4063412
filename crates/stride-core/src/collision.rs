//! Move-with-collision contract
//!
//! The locomotion controller never resolves collisions itself. Once per tick
//! the host hands the computed displacement to a [`MoveWithCollision`]
//! implementation, which moves the body and reports whether it ended up on
//! the ground. That flag is fed back into the controller on the next tick.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Ground contact reported by the collision primitive after a move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundState {
    pub is_grounded: bool,
}

impl GroundState {
    pub const GROUNDED: GroundState = GroundState { is_grounded: true };
    pub const AIRBORNE: GroundState = GroundState { is_grounded: false };
}

impl From<bool> for GroundState {
    fn from(is_grounded: bool) -> Self {
        Self { is_grounded }
    }
}

/// Result of a single collision-resolved move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Body position after the move (feet, world space)
    pub position: Vec3,
    /// Ground contact after the move
    pub ground: GroundState,
}

/// Applies a displacement to a body while resolving collisions
pub trait MoveWithCollision {
    /// Move the body by `displacement` and report where it ended up
    fn move_with_collision(&mut self, displacement: Vec3, dt: f32) -> MoveResult;

    /// Place the body at `position` without resolving collisions
    fn set_position(&mut self, position: Vec3);

    /// Shift the body's horizontal centre relative to the rig origin.
    ///
    /// Used to keep the collision body under the tracked head.
    fn set_body_offset(&mut self, _offset: Vec2) {}
}

/// Analytic mover over an infinite horizontal floor with no other obstacles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    /// Current body position
    pub position: Vec3,
    /// Height of the floor plane
    pub floor_height: f32,
    /// Last body offset requested by the rig
    pub body_offset: Vec2,
}

impl FlatGround {
    /// Create a mover standing at `position` over a floor at `floor_height`
    pub fn new(position: Vec3, floor_height: f32) -> Self {
        Self {
            position,
            floor_height,
            body_offset: Vec2::ZERO,
        }
    }
}

impl MoveWithCollision for FlatGround {
    fn move_with_collision(&mut self, displacement: Vec3, _dt: f32) -> MoveResult {
        let mut target = self.position + displacement;
        let grounded = target.y <= self.floor_height;
        if grounded {
            target.y = self.floor_height;
        }
        self.position = target;

        MoveResult {
            position: target,
            ground: GroundState::from(grounded),
        }
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_body_offset(&mut self, offset: Vec2) {
        self.body_offset = offset;
    }
}
