//! Character controller using rapier's kinematic character controller

use glam::{Vec2, Vec3};
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use stride_core::{GroundState, MoveResult, MoveWithCollision};
use tracing::debug;

use crate::PhysicsWorld;

/// Character controller configuration
#[derive(Debug, Clone)]
pub struct CharacterControllerConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.3m)
    pub radius: f32,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.3m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Whether to snap to ground when walking down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CharacterControllerConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.3,
            max_slope_angle: 45.0,
            step_height: 0.3,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// Capsule body moved with collision against the static world
pub struct CharacterController {
    /// Configuration
    pub config: CharacterControllerConfig,
    /// Current feet position of the rig origin
    pub position: Vec3,
    /// Horizontal offset of the capsule from the rig origin
    pub body_offset: Vec2,
    /// Whether the character is on the ground
    pub grounded: bool,
    /// The collider handle for this character
    pub collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterController {
    /// Create a new character controller with default config
    pub fn new() -> Self {
        Self::with_config(CharacterControllerConfig::default())
    }

    /// Create a new character controller with custom config
    pub fn with_config(config: CharacterControllerConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: false,
        });
        controller.snap_to_ground = if config.snap_to_ground {
            Some(CharacterLength::Absolute(config.ground_snap_distance))
        } else {
            None
        };
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            body_offset: Vec2::ZERO,
            grounded: false,
            collider_handle: None,
            controller,
        }
    }

    /// Spawn the character in the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;

        let half_height = (self.config.height - 2.0 * self.config.radius) / 2.0;
        let center = self.capsule_center();
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), self.config.radius)
            .translation(vector![center.x, center.y, center.z])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        debug!("Spawned character capsule at {:?}", position);
        handle
    }

    /// World-space centre of the capsule, including the head-follow offset
    pub fn capsule_center(&self) -> Vec3 {
        Vec3::new(
            self.position.x + self.body_offset.x,
            self.position.y + self.config.height / 2.0,
            self.position.z + self.body_offset.y,
        )
    }

    /// Move the character with collision detection
    pub fn move_character(
        &mut self,
        physics: &mut PhysicsWorld,
        desired_translation: Vec3,
        dt: f32,
    ) -> MoveResult {
        let unmoved = MoveResult {
            position: self.position,
            ground: GroundState::from(self.grounded),
        };

        let Some(collider_handle) = self.collider_handle else {
            return unmoved;
        };

        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return unmoved;
        };

        let shape = collider.shape();
        let center = self.capsule_center();
        let current_pos = Isometry::translation(center.x, center.y, center.z);

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            physics.query_pipeline(),
            shape,
            &current_pos,
            vector![desired_translation.x, desired_translation.y, desired_translation.z],
            QueryFilter::default().exclude_collider(collider_handle),
            |_| {},
        );

        self.grounded = movement.grounded;

        let effective_translation = movement.translation;
        self.position.x += effective_translation.x;
        self.position.y += effective_translation.y;
        self.position.z += effective_translation.z;

        self.sync_collider(physics);

        MoveResult {
            position: self.position,
            ground: GroundState::from(self.grounded),
        }
    }

    /// Set the character's position directly (teleport)
    pub fn set_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        self.sync_collider(physics);
    }

    fn sync_collider(&self, physics: &mut PhysicsWorld) {
        let Some(handle) = self.collider_handle else {
            return;
        };
        let center = self.capsule_center();
        if let Some(collider) = physics.collider_set.get_mut(handle) {
            collider.set_translation(vector![center.x, center.y, center.z]);
        }
    }
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrows a character and its world for one rig update
pub struct PhysicsMover<'a> {
    pub world: &'a mut PhysicsWorld,
    pub character: &'a mut CharacterController,
}

impl<'a> PhysicsMover<'a> {
    pub fn new(world: &'a mut PhysicsWorld, character: &'a mut CharacterController) -> Self {
        Self { world, character }
    }
}

impl MoveWithCollision for PhysicsMover<'_> {
    fn move_with_collision(&mut self, displacement: Vec3, dt: f32) -> MoveResult {
        self.character.move_character(self.world, displacement, dt)
    }

    fn set_position(&mut self, position: Vec3) {
        self.character.set_position(self.world, position);
    }

    fn set_body_offset(&mut self, offset: Vec2) {
        self.character.body_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_controller_config() {
        let config = CharacterControllerConfig::default();
        assert_eq!(config.height, 1.8);
        assert_eq!(config.radius, 0.3);
        assert_eq!(config.max_slope_angle, 45.0);
    }

    #[test]
    fn test_body_offset_moves_capsule_center() {
        let mut controller = CharacterController::new();
        controller.position = Vec3::new(1.0, 0.0, 1.0);
        controller.body_offset = Vec2::new(0.2, -0.1);
        let center = controller.capsule_center();
        assert!((center.x - 1.2).abs() < 1e-6);
        assert!((center.z - 0.9).abs() < 1e-6);
        assert!((center.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_unspawned_character_does_not_move() {
        let mut world = PhysicsWorld::new();
        let mut controller = CharacterController::new();
        let result = controller.move_character(&mut world, Vec3::new(1.0, 0.0, 0.0), 0.1);
        assert_eq!(result.position, Vec3::ZERO);
        assert!(!result.ground.is_grounded);
    }

    #[test]
    fn test_set_position_moves_collider() {
        let mut world = PhysicsWorld::new();
        let mut controller = CharacterController::new();
        let handle = controller.spawn(&mut world, Vec3::ZERO);
        controller.set_position(&mut world, Vec3::new(2.0, 1.0, -3.0));

        let translation = world.collider_set.get(handle).unwrap().translation();
        assert!((translation.x - 2.0).abs() < 1e-6);
        assert!((translation.y - 1.9).abs() < 1e-6);
        assert!((translation.z + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_mover_teleport_then_move() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let mut controller = CharacterController::new();
        controller.spawn(&mut world, Vec3::ZERO);
        world.sync_queries();

        let mut mover = PhysicsMover::new(&mut world, &mut controller);
        mover.set_position(Vec3::new(5.0, 0.0, 5.0));
        let result = mover.move_with_collision(Vec3::new(0.1, 0.0, 0.0), 1.0 / 60.0);

        assert!((result.position.x - 5.1).abs() < 0.05);
        assert!((result.position.z - 5.0).abs() < 0.05);
    }

    #[test]
    fn test_falls_onto_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let mut controller = CharacterController::new();
        controller.spawn(&mut world, Vec3::new(0.0, 0.5, 0.0));
        world.sync_queries();

        let mut mover = PhysicsMover::new(&mut world, &mut controller);
        let mut result = mover.move_with_collision(Vec3::ZERO, 1.0 / 60.0);
        for _ in 0..60 {
            result = mover.move_with_collision(Vec3::new(0.0, -0.1, 0.0), 1.0 / 60.0);
        }

        assert!(result.ground.is_grounded);
        assert!(result.position.y > -0.05 && result.position.y < 0.1);
    }
}
