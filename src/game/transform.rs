//! Local and world transforms
//!
//! Two-tier scheme: `Transform` is an entity's pose relative to its parent,
//! `WorldTransform` is the derived world-space pose, recomputed once per
//! frame by composing the chain down from the root. World transforms are
//! never authoritative — writing one directly would just be overwritten by
//! the next propagation pass.
//!
//! Poses are 2D affine with a depth coordinate: translation in `Vec3`
//! (z orders draws), per-axis scale, rotation about z. Composition happens
//! in homogeneous `Mat4` form.

use macroquad::math::{vec3, Mat4, Quat, Vec2, Vec3};

/// Pose relative to the parent entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec2,
    /// Radians about the z axis.
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_scale(position: Vec3, scale: Vec2) -> Self {
        Self {
            position,
            scale,
            rotation: 0.0,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            vec3(self.scale.x, self.scale.y, 1.0),
            Quat::from_rotation_z(self.rotation),
            self.position,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Derived world-space pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTransform {
    matrix: Mat4,
}

impl WorldTransform {
    pub const IDENTITY: WorldTransform = WorldTransform {
        matrix: Mat4::IDENTITY,
    };

    /// World pose of a root-level transform.
    pub fn from_local(local: &Transform) -> Self {
        Self {
            matrix: local.to_matrix(),
        }
    }

    /// World pose of a child: parent world × child local.
    pub fn compose(parent: &WorldTransform, local: &Transform) -> Self {
        Self {
            matrix: parent.matrix * local.to_matrix(),
        }
    }

    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    pub fn translation(&self) -> Vec3 {
        self.matrix.w_axis.truncate()
    }

    /// Per-axis scale recovered from the basis vectors.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            self.matrix.x_axis.truncate().length(),
            self.matrix.y_axis.truncate().length(),
        )
    }

    /// Rotation about z recovered from the x basis vector.
    pub fn rotation(&self) -> f32 {
        self.matrix.x_axis.y.atan2(self.matrix.x_axis.x)
    }

    /// Translation blended between two poses; the renderer uses this with
    /// the loop's interpolation fraction.
    pub fn lerp_translation(prev: &WorldTransform, curr: &WorldTransform, t: f32) -> Vec3 {
        prev.translation().lerp(curr.translation(), t)
    }
}

impl Default for WorldTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn root_world_equals_local() {
        let local = Transform::from_position(vec3(3.0, -2.0, 0.5));
        let world = WorldTransform::from_local(&local);
        assert!(close(world.translation(), vec3(3.0, -2.0, 0.5)));
    }

    #[test]
    fn child_translation_accumulates() {
        let parent = WorldTransform::from_local(&Transform::from_position(vec3(100.0, 0.0, 0.0)));
        let child = Transform::from_position(vec3(10.0, 5.0, 0.0));
        let world = WorldTransform::compose(&parent, &child);
        assert!(close(world.translation(), vec3(110.0, 5.0, 0.0)));
    }

    #[test]
    fn parent_scale_applies_to_child_offset() {
        let parent = WorldTransform::from_local(&Transform::from_position_scale(
            Vec3::ZERO,
            vec2(2.0, 2.0),
        ));
        let child = Transform::from_position(vec3(10.0, 0.0, 0.0));
        let world = WorldTransform::compose(&parent, &child);
        assert!(close(world.translation(), vec3(20.0, 0.0, 0.0)));
        assert!((world.scale().x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn lerp_translation_blends_endpoints() {
        let a = WorldTransform::from_local(&Transform::from_position(vec3(0.0, 0.0, 0.0)));
        let b = WorldTransform::from_local(&Transform::from_position(vec3(10.0, 20.0, 0.0)));
        assert!(close(
            WorldTransform::lerp_translation(&a, &b, 0.5),
            vec3(5.0, 10.0, 0.0)
        ));
        assert!(close(
            WorldTransform::lerp_translation(&a, &b, 1.0),
            vec3(10.0, 20.0, 0.0)
        ));
    }
}
