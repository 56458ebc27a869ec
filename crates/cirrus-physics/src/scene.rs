//! The starter scene: a ground slab, a falling cube and a bouncy sphere.

use rapier3d::prelude::*;
use tracing::info;

use crate::PhysicsWorld;

impl PhysicsWorld {
    /// Empty world populated with the starter scene.
    pub fn with_demo_scene() -> Self {
        let mut world = Self::new();
        world.load_demo_scene();
        world
    }

    /// Replace all bodies with the starter scene.
    pub fn load_demo_scene(&mut self) {
        self.clear();

        let ground = self
            .rigid_body_set
            .insert(RigidBodyBuilder::fixed().translation(Vector::new(0.0, -0.5, 0.0)));
        self.collider_set.insert_with_parent(
            ColliderBuilder::cuboid(50.0, 0.5, 50.0).restitution(0.3),
            ground,
            &mut self.rigid_body_set,
        );

        let cube = self
            .rigid_body_set
            .insert(RigidBodyBuilder::dynamic().translation(Vector::new(0.0, 20.0, 0.0)));
        self.collider_set.insert_with_parent(
            ColliderBuilder::cuboid(0.5, 0.5, 0.5)
                .mass(1.0)
                .restitution(0.6),
            cube,
            &mut self.rigid_body_set,
        );

        let sphere = self
            .rigid_body_set
            .insert(RigidBodyBuilder::dynamic().translation(Vector::new(2.0, 15.0, 0.0)));
        self.collider_set.insert_with_parent(
            ColliderBuilder::ball(0.6)
                .mass(1.5)
                .restitution(0.9)
                .friction(0.1),
            sphere,
            &mut self.rigid_body_set,
        );

        info!(bodies = self.body_count(), "Demo physics scene loaded");
    }
}
