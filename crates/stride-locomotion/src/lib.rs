//! Stride Locomotion - Per-tick VR rig locomotion
//!
//! Each tick the [`LocomotionController`] turns the rig (smooth or snap),
//! levels it, integrates vertical velocity, and composes a head-relative
//! displacement for the host's move-with-collision primitive.
//! [`LocomotionRig`] wraps a controller with a transform, a head tracker and
//! a footstep tracker for hosts that want a ready-made entity.

mod composer;
mod config;
mod controller;
mod error;
mod footsteps;
mod input;
mod rig;
mod turn;
mod upright;
mod vertical;

pub use composer::{compose_velocity, sprint_eligible, PlanarBasis};
pub use config::{LocomotionConfig, TurnStyle, GROUND_STICK_VELOCITY, TURN_DEADZONE};
pub use controller::{LocomotionController, LocomotionOutput, LocomotionState};
pub use error::LocomotionError;
pub use footsteps::{Footstep, FootstepConfig, FootstepTracker};
pub use input::{ButtonEdge, HeadPose, HeadTracker, InputSample, ScriptedHead, DEFAULT_EYE_HEIGHT};
pub use rig::{LocomotionRig, LocomotionRigBuilder, RigFrame};
pub use turn::{TurnOutcome, TurnState};
pub use upright::correct_upright;
pub use vertical::VerticalIntegrator;
