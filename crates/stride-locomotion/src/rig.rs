//! A locomotion entity: transform, controller, head tracker, and footsteps

use glam::Vec3;
use stride_core::{EntityId, GroundState, MoveWithCollision, Transform};
use tracing::debug;

use crate::controller::{LocomotionController, LocomotionOutput};
use crate::footsteps::{Footstep, FootstepConfig, FootstepTracker};
use crate::input::{HeadPose, HeadTracker, InputSample};
use crate::{LocomotionConfig, LocomotionError};

/// Result of one rig update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigFrame {
    /// What the controller computed
    pub locomotion: LocomotionOutput,
    /// Head pose sampled this tick
    pub head: HeadPose,
    /// Rig position after the collision-resolved move
    pub position: Vec3,
    /// Ground contact after the move, used on the next tick
    pub ground: GroundState,
    /// Footstep emitted this tick, if any
    pub footstep: Option<Footstep>,
}

/// Builder for [`LocomotionRig`]
#[derive(Default)]
pub struct LocomotionRigBuilder {
    id: Option<EntityId>,
    transform: Transform,
    config: LocomotionConfig,
    footsteps: FootstepConfig,
    head: Option<Box<dyn HeadTracker>>,
}

impl LocomotionRigBuilder {
    pub fn id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn config(mut self, config: LocomotionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn footsteps(mut self, footsteps: FootstepConfig) -> Self {
        self.footsteps = footsteps;
        self
    }

    pub fn head(mut self, head: impl HeadTracker + 'static) -> Self {
        self.head = Some(Box::new(head));
        self
    }

    /// Validate and build the rig
    pub fn build(self) -> Result<LocomotionRig, LocomotionError> {
        let head = self.head.ok_or(LocomotionError::MissingHeadTracker)?;
        let controller = LocomotionController::new(self.config)?;
        let id = self.id.unwrap_or_default();
        debug!("Built locomotion rig {}", id);

        Ok(LocomotionRig {
            id,
            transform: self.transform,
            controller,
            footsteps: FootstepTracker::new(self.footsteps),
            head,
            ground: GroundState::AIRBORNE,
            needs_placement: true,
        })
    }
}

/// One locomotion entity driven by the host loop
pub struct LocomotionRig {
    id: EntityId,
    transform: Transform,
    controller: LocomotionController,
    footsteps: FootstepTracker,
    head: Box<dyn HeadTracker>,
    ground: GroundState,
    /// Mover still has to be put at the rig's position
    needs_placement: bool,
}

impl LocomotionRig {
    pub fn builder() -> LocomotionRigBuilder {
        LocomotionRigBuilder::default()
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    /// Ground contact reported by the last move
    pub fn ground(&self) -> GroundState {
        self.ground
    }

    /// Run one tick: turn, move with collision, and track footsteps
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputSample,
        mover: &mut impl MoveWithCollision,
    ) -> RigFrame {
        let head = self.head.sample();
        let locomotion =
            self.controller
                .tick(dt, input, &head, self.ground, self.transform.rotation);
        self.transform.rotation = locomotion.orientation;

        mover.set_body_offset(head.planar_offset());
        if self.needs_placement {
            mover.set_position(self.transform.position);
            self.needs_placement = false;
        }
        let previous = self.transform.position;
        let moved = mover.move_with_collision(locomotion.displacement, locomotion.dt);
        self.transform.position = moved.position;
        self.ground = moved.ground;

        let travelled = moved.position - previous;
        let measured_velocity = if locomotion.dt > 0.0 {
            travelled / locomotion.dt
        } else {
            Vec3::ZERO
        };
        let footstep = self
            .footsteps
            .update(moved.ground.is_grounded, measured_velocity, locomotion.dt);

        RigFrame {
            locomotion,
            head,
            position: moved.position,
            ground: moved.ground,
            footstep,
        }
    }

    /// Move the rig without simulating, dropping vertical momentum.
    ///
    /// The mover is placed at the new position on the next update.
    pub fn teleport(&mut self, transform: Transform) {
        self.transform = transform;
        self.controller.reset();
        self.ground = GroundState::AIRBORNE;
        self.needs_placement = true;
    }
}
