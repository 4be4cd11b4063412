//! Time system for the Stride host loop
//!
//! Tracks delta time and drives the fixed simulation timestep the locomotion
//! controller is ticked on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected time configuration
#[derive(Debug, Error, PartialEq)]
pub enum TimeConfigError {
    #[error("time.{name} must be a finite value > 0, got {value}")]
    NotPositive { name: &'static str, value: f32 },
}

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for the simulation (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl TimeConfig {
    /// Check that the clock always makes progress
    pub fn validate(&self) -> Result<(), TimeConfigError> {
        for (name, value) in [
            ("time_scale", self.time_scale),
            ("fixed_timestep", self.fixed_timestep),
            ("max_delta_time", self.max_delta_time),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TimeConfigError::NotPositive { name, value });
            }
        }
        Ok(())
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 72.0,
            max_delta_time: 0.25,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        let raw_delta = if raw_delta.is_finite() { raw_delta.max(0.0) } else { 0.0 };
        self.unscaled_delta_time = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        if self.config.fixed_timestep.is_nan() || self.config.fixed_timestep <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }
}
