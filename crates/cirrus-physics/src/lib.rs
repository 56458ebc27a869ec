//! Rigid-body simulation for the editor scene.
//!
//! Wraps Rapier behind [`PhysicsWorld`], which owns all simulation state.
//! The renderer only ever sees the read-only [`BodyProxy`] list produced by
//! [`PhysicsWorld::snapshot`].

mod proxy;
mod scene;

pub use proxy::{BodyProxy, ProxyShape};

use rapier3d::prelude::*;
use tracing::warn;

/// Fixed simulation timestep.
pub const FIXED_DT: f32 = 1.0 / 60.0;
/// Substeps allowed per frame before the accumulator is dropped.
pub const MAX_SUBSTEPS: u32 = 10;

pub struct PhysicsWorld {
    pub gravity: Vector,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: BroadPhaseBvh,
    pub narrow_phase: NarrowPhase,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    accumulator: f32,
}

impl PhysicsWorld {
    /// Empty world, gravity `(0, -9.81, 0)`, `1/60` s timestep.
    pub fn new() -> Self {
        let integration_parameters = IntegrationParameters {
            dt: FIXED_DT,
            ..Default::default()
        };

        Self {
            gravity: Vector::new(0.0, -9.81, 0.0),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            accumulator: 0.0,
        }
    }

    /// Advance by exactly one fixed timestep.
    pub fn step_fixed(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Consume `dt` seconds of frame time in fixed substeps. Returns the
    /// number of substeps taken.
    pub fn step(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= FIXED_DT {
            if steps == MAX_SUBSTEPS {
                warn!(
                    backlog = self.accumulator,
                    "Physics fell behind, dropping accumulated time"
                );
                self.accumulator = 0.0;
                break;
            }
            self.step_fixed();
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        steps
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Remove every body and collider.
    pub fn clear(&mut self) {
        *self = Self {
            gravity: self.gravity,
            ..Self::new()
        };
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
