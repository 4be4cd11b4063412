//! Turning state machine
//!
//! Smooth turning is stateless. Snap turning fires once per deflection and
//! then stays engaged until the stick returns to the deadzone.

use tracing::debug;

use crate::config::{LocomotionConfig, TurnStyle, TURN_DEADZONE};

/// Snap turn latch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnState {
    /// Ready to fire a snap turn
    #[default]
    Idle,
    /// A snap fired and the stick has not yet returned to neutral
    SnapEngaged,
}

/// What the turn step did this tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnOutcome {
    /// Heading change in degrees (positive turns right)
    pub heading_delta: f32,
    /// Whether a snap turn fired
    pub snapped: bool,
}

impl TurnState {
    /// Whether a snap is currently held off until the stick re-centres
    pub fn is_engaged(&self) -> bool {
        matches!(self, TurnState::SnapEngaged)
    }

    /// Consume the horizontal turn deflection for one tick
    pub fn update(&mut self, turn: f32, dt: f32, config: &LocomotionConfig) -> TurnOutcome {
        match config.turn_style {
            TurnStyle::Smooth => {
                *self = TurnState::Idle;
                if turn.abs() > TURN_DEADZONE {
                    TurnOutcome {
                        heading_delta: turn * config.turn_speed * dt,
                        snapped: false,
                    }
                } else {
                    TurnOutcome::default()
                }
            }
            TurnStyle::Snap => self.update_snap(turn, config),
        }
    }

    fn update_snap(&mut self, turn: f32, config: &LocomotionConfig) -> TurnOutcome {
        let mut outcome = TurnOutcome::default();

        if *self == TurnState::Idle {
            let direction = if turn > config.snap_turn_threshold {
                Some(1.0)
            } else if turn < -config.snap_turn_threshold {
                Some(-1.0)
            } else {
                None
            };

            if let Some(direction) = direction {
                outcome = TurnOutcome {
                    heading_delta: direction * config.snap_turn_angle,
                    snapped: true,
                };
                *self = TurnState::SnapEngaged;
                debug!("Snap turn {:+}°", outcome.heading_delta);
            }
        }

        if turn.abs() < TURN_DEADZONE {
            *self = TurnState::Idle;
        }

        outcome
    }
}
