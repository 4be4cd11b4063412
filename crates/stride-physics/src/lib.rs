//! Stride Physics - Collision world using rapier3d
//!
//! Provides the static collision world and a kinematic character controller
//! that implements the rig's move-with-collision contract.

mod character_controller;

pub use character_controller::{CharacterController, CharacterControllerConfig, PhysicsMover};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;

/// The collision world containing all static geometry
pub struct PhysicsWorld {
    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,

    /// Query pipeline for character shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create an empty collision world
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Refresh the query pipeline after colliders were added, moved or removed
    pub fn sync_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Query pipeline used by shape casts
    pub fn query_pipeline(&self) -> &QueryPipeline {
        &self.query_pipeline
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box collider
    pub fn create_static_box(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_creation() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        assert!(world.collider_set.get(ground).is_some());
    }

    #[test]
    fn test_static_box_placement() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_static_box(Vec3::new(1.0, 0.5, 1.0), Vec3::new(2.0, 0.5, -3.0));
        let translation = world.collider_set.get(handle).unwrap().translation();
        assert!((translation.x - 2.0).abs() < 1e-6);
        assert!((translation.z + 3.0).abs() < 1e-6);
    }
}
