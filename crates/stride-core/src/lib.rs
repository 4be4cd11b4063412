//! Stride Core - Core types and utilities for the Stride locomotion rig
//!
//! This crate provides the foundational types shared by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component with heading helpers
//! - Time system with a fixed timestep accumulator
//! - The move-with-collision contract and a flat-ground reference mover

pub mod collision;
pub mod time;
pub mod types;

pub use collision::{FlatGround, GroundState, MoveResult, MoveWithCollision};
pub use glam::{Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig, TimeConfigError};
pub use types::{heading_degrees, heading_rotation, EntityId, Transform};
