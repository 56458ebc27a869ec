//! Read-only view of the simulation for the raster pass and the UI.

use glam::{Mat4, Quat, Vec3};
use rapier3d::prelude::*;

use crate::PhysicsWorld;

/// Collision shape, resolved once per body per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProxyShape {
    Sphere { radius: f32 },
    Box { half_extents: Vec3 },
    Other,
}

impl ProxyShape {
    /// Scale applied to the unit cube that stands in for this shape.
    ///
    /// Boxes are drawn at unit size regardless of their extents.
    pub fn proxy_scale(&self) -> Vec3 {
        match *self {
            ProxyShape::Sphere { radius } => Vec3::splat(radius * 2.0),
            ProxyShape::Box { .. } | ProxyShape::Other => Vec3::ONE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProxyShape::Sphere { .. } => "Sphere",
            ProxyShape::Box { .. } => "Box",
            ProxyShape::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProxy {
    pub shape: ProxyShape,
    /// Rigid transform of the collider, without shape scale.
    pub transform: Mat4,
    pub is_static: bool,
}

impl BodyProxy {
    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }

    /// Model matrix for drawing the unit cube.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform * Mat4::from_scale(self.shape.proxy_scale())
    }

    /// One-line description for the hierarchy panel.
    pub fn label(&self, index: usize) -> String {
        let kind = if self.is_static { "Static" } else { "Dynamic" };
        format!("Object {index} ({kind}) - {}", self.shape.name())
    }
}

impl PhysicsWorld {
    /// Every collider in insertion order with its shape and pose.
    pub fn snapshot(&self) -> Vec<BodyProxy> {
        self.collider_set
            .iter()
            .map(|(_, collider)| {
                let is_static = match collider.parent() {
                    Some(handle) => self
                        .rigid_body_set
                        .get(handle)
                        .is_none_or(|body| !body.is_dynamic()),
                    None => true,
                };
                let pose = collider.position();
                let t = pose.translation;
                let r = pose.rotation;
                let transform = Mat4::from_rotation_translation(
                    Quat::from_xyzw(r.x, r.y, r.z, r.w),
                    Vec3::new(t.x, t.y, t.z),
                );
                BodyProxy {
                    shape: proxy_shape(collider.shape()),
                    transform,
                    is_static,
                }
            })
            .collect()
    }
}

fn proxy_shape(shape: &dyn Shape) -> ProxyShape {
    match shape.shape_type() {
        ShapeType::Ball => shape
            .as_ball()
            .map_or(ProxyShape::Other, |ball| ProxyShape::Sphere {
                radius: ball.radius,
            }),
        ShapeType::Cuboid => shape
            .as_cuboid()
            .map_or(ProxyShape::Other, |cuboid| {
                let he = cuboid.half_extents;
                ProxyShape::Box {
                    half_extents: Vec3::new(he.x, he.y, he.z),
                }
            }),
        _ => ProxyShape::Other,
    }
}
