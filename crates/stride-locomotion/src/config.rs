//! Locomotion configuration and constants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::LocomotionError;

/// Stick deflection below which turn input counts as neutral
pub const TURN_DEADZONE: f32 = 0.1;

/// Vertical velocity applied while grounded to keep contact with the floor
pub const GROUND_STICK_VELOCITY: f32 = -1.0;

/// How the turn stick rotates the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TurnStyle {
    /// Continuous rotation proportional to deflection and time
    Smooth,
    /// Discrete rotation by a fixed angle per deflection
    #[default]
    Snap,
}

impl TurnStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStyle::Smooth => "smooth",
            TurnStyle::Snap => "snap",
        }
    }
}

impl fmt::Display for TurnStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TurnStyle {
    type Err = LocomotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smooth" => Ok(TurnStyle::Smooth),
            "snap" => Ok(TurnStyle::Snap),
            _ => Err(LocomotionError::UnknownTurnStyle(s.to_string())),
        }
    }
}

impl TryFrom<String> for TurnStyle {
    type Error = LocomotionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TurnStyle> for String {
    fn from(style: TurnStyle) -> Self {
        style.as_str().to_string()
    }
}

/// Locomotion configuration, fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Walking speed in meters per second
    pub move_speed: f32,
    /// Sprinting speed in meters per second
    pub sprint_speed: f32,
    /// Forward stick deflection (0.1 to 1) required before sprinting is allowed
    pub sprint_input_threshold: f32,
    /// Signed vertical acceleration while airborne (negative pulls down)
    pub gravity: f32,
    /// Vertical velocity applied on the tick a jump starts
    pub jump_force: f32,
    /// Zero out pitch and roll of the rig every tick
    pub force_upright: bool,
    /// Smooth or snap turning
    pub turn_style: TurnStyle,
    /// Smooth turn rate in degrees per second at full deflection
    pub turn_speed: f32,
    /// Snap turn increment in degrees
    pub snap_turn_angle: f32,
    /// Turn stick deflection (0.1 to 1) that fires a snap turn
    pub snap_turn_threshold: f32,
    /// Upper bound for the per-tick delta time, if any
    pub max_delta_time: Option<f32>,
    /// Maximum falling speed, if any
    pub terminal_velocity: Option<f32>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            sprint_speed: 6.0,
            sprint_input_threshold: 0.8,
            gravity: -9.81,
            jump_force: 5.0,
            force_upright: true,
            turn_style: TurnStyle::Snap,
            turn_speed: 90.0,
            snap_turn_angle: 45.0,
            snap_turn_threshold: 0.9,
            max_delta_time: None,
            terminal_velocity: None,
        }
    }
}

impl LocomotionConfig {
    /// Get the current speed based on sprint eligibility
    pub fn speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.sprint_speed
        } else {
            self.move_speed
        }
    }

    /// Reject values the controller cannot run with
    pub fn validate(&self) -> Result<(), LocomotionError> {
        non_negative("move_speed", self.move_speed)?;
        non_negative("sprint_speed", self.sprint_speed)?;
        non_negative("jump_force", self.jump_force)?;
        non_negative("turn_speed", self.turn_speed)?;
        non_negative("snap_turn_angle", self.snap_turn_angle)?;
        in_stick_range("sprint_input_threshold", self.sprint_input_threshold)?;
        in_stick_range("snap_turn_threshold", self.snap_turn_threshold)?;

        if !self.gravity.is_finite() || self.gravity > 0.0 {
            return Err(invalid("gravity", "must be finite and not point upwards"));
        }
        if let Some(max_dt) = self.max_delta_time {
            positive("max_delta_time", max_dt)?;
        }
        if let Some(terminal) = self.terminal_velocity {
            positive("terminal_velocity", terminal)?;
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> LocomotionError {
    LocomotionError::InvalidSetting {
        name,
        reason: reason.into(),
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), LocomotionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("expected a finite value >= 0, got {value}")))
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), LocomotionError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(name, format!("expected a finite value > 0, got {value}")))
    }
}

fn in_stick_range(name: &'static str, value: f32) -> Result<(), LocomotionError> {
    if (TURN_DEADZONE..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(name, format!("expected a value in [0.1, 1], got {value}")))
    }
}
