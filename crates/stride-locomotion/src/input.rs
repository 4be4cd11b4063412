//! Per-tick input and head tracking samples
//!
//! The controller never polls hardware. The host builds an [`InputSample`]
//! and samples a [`HeadTracker`] once per tick and passes both in.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Standing eye height used when no tracked pose is available
pub const DEFAULT_EYE_HEIGHT: f32 = 1.6;

/// Controller state for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSample {
    /// Movement stick (x = strafe right, y = forward)
    pub move_axis: Vec2,
    /// Turn stick (only x is used)
    pub turn_axis: Vec2,
    /// True only on the tick the jump button went down
    pub jump: bool,
    /// True while the sprint button is held
    pub sprint: bool,
}

impl InputSample {
    /// Create a new neutral input sample
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement stick
    pub fn with_move(mut self, x: f32, y: f32) -> Self {
        self.move_axis = Vec2::new(x, y);
        self
    }

    /// Set the horizontal turn deflection
    pub fn with_turn(mut self, x: f32) -> Self {
        self.turn_axis = Vec2::new(x, 0.0);
        self
    }

    /// Mark the jump button as pressed this tick
    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Hold the sprint button
    pub fn with_sprint(mut self) -> Self {
        self.sprint = true;
        self
    }

    /// Copy with both sticks clamped to [-1, 1] and NaN treated as neutral
    pub fn sanitized(&self) -> Self {
        Self {
            move_axis: clamp_axis(self.move_axis),
            turn_axis: clamp_axis(self.turn_axis),
            ..*self
        }
    }
}

fn clamp_axis(axis: Vec2) -> Vec2 {
    let component = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
    Vec2::new(component(axis.x), component(axis.y))
}

/// Turns a held button level into a pressed-this-tick edge
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    was_held: bool,
}

impl ButtonEdge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current level; returns true on the rising edge only
    pub fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.was_held;
        self.was_held = held;
        pressed
    }
}

/// Head pose relative to the rig origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeadPose {
    /// Head position in rig-local space
    pub position: Vec3,
    /// Gaze direction in rig-local space (unit)
    pub forward: Vec3,
    /// Head right direction in rig-local space (unit)
    pub right: Vec3,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self::level(Vec3::new(0.0, DEFAULT_EYE_HEIGHT, 0.0))
    }
}

impl HeadPose {
    /// Level gaze down the rig's -Z axis at the given position
    pub fn level(position: Vec3) -> Self {
        Self {
            position,
            forward: -Vec3::Z,
            right: Vec3::X,
        }
    }

    /// Pose from position, forward, and right vectors
    pub fn new(position: Vec3, forward: Vec3, right: Vec3) -> Self {
        Self {
            position,
            forward,
            right,
        }
    }

    /// Horizontal offset of the head from the rig origin
    pub fn planar_offset(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.z)
    }
}

/// Source of head poses, sampled once per tick
pub trait HeadTracker {
    fn sample(&mut self) -> HeadPose;
}

impl HeadTracker for HeadPose {
    fn sample(&mut self) -> HeadPose {
        *self
    }
}

/// Plays back a recorded sequence of head poses, holding the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedHead {
    poses: Vec<HeadPose>,
    cursor: usize,
}

impl ScriptedHead {
    pub fn new(poses: Vec<HeadPose>) -> Self {
        Self { poses, cursor: 0 }
    }
}

impl HeadTracker for ScriptedHead {
    fn sample(&mut self) -> HeadPose {
        let Some(last) = self.poses.len().checked_sub(1) else {
            return HeadPose::default();
        };
        let pose = self.poses[self.cursor.min(last)];
        self.cursor += 1;
        pose
    }
}
