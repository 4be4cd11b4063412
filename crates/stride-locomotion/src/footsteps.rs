//! Footstep cadence from distance walked on the ground
//!
//! Emits footstep events; choosing and playing the actual sound is left to
//! whoever consumes them.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Footstep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootstepConfig {
    /// Distance walked per footstep in meters
    pub distance_per_step: f32,
    /// Volume multiplier passed along with each event (0.1 to 1.0)
    pub volume: f32,
    /// Number of footstep clip variants to choose from
    pub variant_count: usize,
    /// Horizontal speed below which the rig counts as standing still
    pub min_speed: f32,
    /// Seed for variant selection; random when unset
    pub seed: Option<u64>,
}

impl Default for FootstepConfig {
    fn default() -> Self {
        Self {
            distance_per_step: 2.0,
            volume: 0.7,
            variant_count: 4,
            min_speed: 0.1,
            seed: None,
        }
    }
}

/// A single footstep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footstep {
    /// Which clip variant to play, if any are configured
    pub variant: Option<usize>,
    /// Volume multiplier
    pub volume: f32,
}

/// Accumulates walked distance and emits footsteps
#[derive(Debug, Clone)]
pub struct FootstepTracker {
    config: FootstepConfig,
    distance_covered: f32,
    rng: StdRng,
    warned_no_variants: bool,
}

impl FootstepTracker {
    pub fn new(config: FootstepConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            distance_covered: 0.0,
            rng,
            warned_no_variants: false,
        }
    }

    pub fn config(&self) -> &FootstepConfig {
        &self.config
    }

    /// Distance accumulated towards the next footstep
    pub fn distance_covered(&self) -> f32 {
        self.distance_covered
    }

    /// Feed one tick of measured motion
    pub fn update(&mut self, grounded: bool, velocity: Vec3, dt: f32) -> Option<Footstep> {
        if !grounded {
            // Cadence restarts from zero on landing
            self.distance_covered = 0.0;
            return None;
        }

        let speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
        if !speed.is_finite() || speed <= self.config.min_speed {
            self.distance_covered = 0.0;
            return None;
        }

        self.distance_covered += speed * dt;
        if self.distance_covered < self.config.distance_per_step {
            return None;
        }

        // Keep the overshoot so fast frames don't drift the cadence
        self.distance_covered -= self.config.distance_per_step;
        Some(Footstep {
            variant: self.pick_variant(),
            volume: self.config.volume,
        })
    }

    fn pick_variant(&mut self) -> Option<usize> {
        if self.config.variant_count == 0 {
            if !self.warned_no_variants {
                warn!("No footstep variants configured");
                self.warned_no_variants = true;
            }
            return None;
        }
        Some(self.rng.gen_range(0..self.config.variant_count))
    }
}
