//! Vertical velocity: gravity, ground stick, and jumping

use crate::config::{LocomotionConfig, GROUND_STICK_VELOCITY};

/// Integrates the rig's vertical velocity across ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalIntegrator {
    velocity: f32,
}

impl Default for VerticalIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl VerticalIntegrator {
    pub fn new() -> Self {
        Self { velocity: 0.0 }
    }

    /// Current vertical velocity in meters per second (positive is up)
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advance one tick and return the new vertical velocity.
    ///
    /// Grounded ticks overwrite the velocity with either the jump impulse or
    /// the stick value. Airborne ticks accumulate gravity, bounded only by
    /// `terminal_velocity` when configured.
    pub fn step(&mut self, grounded: bool, jump: bool, dt: f32, config: &LocomotionConfig) -> f32 {
        self.velocity = if grounded {
            if jump {
                config.jump_force
            } else {
                GROUND_STICK_VELOCITY
            }
        } else {
            let falling = self.velocity + config.gravity * dt;
            match config.terminal_velocity {
                Some(terminal) => falling.max(-terminal),
                None => falling,
            }
        };
        self.velocity
    }

    /// Reset to rest, e.g. after a teleport
    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }
}
