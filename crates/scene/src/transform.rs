//! Local and world transforms for scene nodes.
//!
//! A [`Transform`] holds translation, rotation, and scale relative to the
//! parent's coordinate frame. World transforms are obtained by composing
//! transforms parent-first with [`Transform::mul_transform`].
//!
//! The coordinate system is right-handed with +Y up. A positive rotation
//! about +Y carries +X towards -Z:
//!
//! ```
//! use orrery_scene::Transform;
//! use glam::{Quat, Vec3};
//!
//! let pivot = Transform::IDENTITY.with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
//! let planet = Transform::from_translation(Vec3::new(6.0, 0.0, 0.0));
//!
//! let world = pivot.mul_transform(&planet);
//! assert!((world.translation - Vec3::new(0.0, 0.0, -6.0)).length() < 1e-5);
//! ```

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// A transform representing translation, rotation, and scale.
///
/// Points are transformed by scaling first, then rotating, then translating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent frame
    pub translation: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform that only translates.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Create a transform that only rotates.
    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    /// Return this transform with the given translation.
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Return this transform with the given rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Return this transform with the given scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Build an incremental rotation from per-axis angles in radians.
    ///
    /// The angles are applied yaw (Y), then roll (Z), then pitch (X), so the
    /// resulting quaternion is `Ry(y) * Rz(z) * Rx(x)`.
    pub fn euler_delta(x_angle: f32, y_angle: f32, z_angle: f32) -> Quat {
        Quat::from_euler(EulerRot::YZX, y_angle, z_angle, x_angle)
    }

    /// Compose `delta` onto the current rotation, about this transform's own
    /// axes. Repeated calls accumulate.
    pub fn rotate_local(&mut self, delta: Quat) {
        self.rotation = (self.rotation * delta).normalize();
    }

    /// Shift the translation by `offset`, expressed in the parent frame.
    pub fn translate(&mut self, offset: Vec3) {
        self.translation += offset;
    }

    /// Compose `child` (expressed in this transform's frame) with this one.
    ///
    /// `self` plays the role of the parent. The result places the child in
    /// the frame this transform is expressed in.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// Transform a point: scale, then rotate, then translate.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }

    /// Get the transformation matrix.
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Matrix that carries surface normals into the parent frame.
    ///
    /// This is the inverse transpose of the upper 3x3 of
    /// [`compute_matrix`](Self::compute_matrix); translation never affects
    /// normals. A degenerate scale yields [`Mat3::IDENTITY`].
    pub fn normal_matrix(&self) -> Mat3 {
        const DEGENERATE: f32 = 1e-6;
        let linear = Mat3::from_quat(self.rotation) * Mat3::from_diagonal(self.scale);
        if linear.determinant().abs() < DEGENERATE {
            Mat3::IDENTITY
        } else {
            linear.inverse().transpose()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    const EPSILON: f32 = 1e-5;

    fn approx_eq_vec3(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < EPSILON
    }

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.compute_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_transform_builder() {
        let t = Transform::IDENTITY
            .with_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_scale(Vec3::splat(2.0));

        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::splat(2.0));
    }

    #[test]
    fn test_y_rotation_sign_convention() {
        let t = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_3));
        let p = t.transform_point(Vec3::new(6.0, 0.0, 0.0));

        let expected = Vec3::new(6.0 * FRAC_PI_3.cos(), 0.0, -6.0 * FRAC_PI_3.sin());
        assert!(approx_eq_vec3(p, expected), "got {:?}", p);
    }

    #[test]
    fn test_euler_delta_single_axis() {
        let yaw = Transform::euler_delta(0.0, 0.4, 0.0);
        assert!(yaw.abs_diff_eq(Quat::from_rotation_y(0.4), EPSILON));

        let pitch = Transform::euler_delta(0.4, 0.0, 0.0);
        assert!(pitch.abs_diff_eq(Quat::from_rotation_x(0.4), EPSILON));

        let roll = Transform::euler_delta(0.0, 0.0, 0.4);
        assert!(roll.abs_diff_eq(Quat::from_rotation_z(0.4), EPSILON));
    }

    #[test]
    fn test_euler_delta_order() {
        let q = Transform::euler_delta(0.1, 0.2, 0.3);
        let expected =
            Quat::from_rotation_y(0.2) * Quat::from_rotation_z(0.3) * Quat::from_rotation_x(0.1);
        assert!(q.abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_rotate_local_accumulates() {
        let mut twice = Transform::IDENTITY;
        twice.rotate_local(Transform::euler_delta(0.0, 0.3, 0.0));
        twice.rotate_local(Transform::euler_delta(0.0, 0.3, 0.0));

        let mut once = Transform::IDENTITY;
        once.rotate_local(Transform::euler_delta(0.0, 0.6, 0.0));

        assert!(twice.rotation.abs_diff_eq(once.rotation, EPSILON));
    }

    #[test]
    fn test_rotate_local_is_about_own_axes() {
        // Tilt about X first, then a yaw delta is applied about the tilted Y.
        let mut t = Transform::from_rotation(Quat::from_rotation_x(FRAC_PI_2));
        t.rotate_local(Quat::from_rotation_y(FRAC_PI_2));

        let expected = Quat::from_rotation_x(FRAC_PI_2) * Quat::from_rotation_y(FRAC_PI_2);
        assert!(t.rotation.abs_diff_eq(expected, EPSILON));
    }

    #[test]
    fn test_mul_transform_matches_matrix_product() {
        let parent = Transform::IDENTITY
            .with_translation(Vec3::new(1.0, -2.0, 0.5))
            .with_rotation(Quat::from_rotation_y(0.7))
            .with_scale(Vec3::splat(2.0));
        let child = Transform::IDENTITY
            .with_translation(Vec3::new(6.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_z(0.3));

        let composed = parent.mul_transform(&child).compute_matrix();
        let product = parent.compute_matrix() * child.compute_matrix();

        assert!(composed.abs_diff_eq(product, 1e-4));
    }

    #[test]
    fn test_mul_transform_is_order_dependent() {
        // Orbit: rotate about the parent origin, then the child offset follows.
        let pivot = Transform::from_rotation(Quat::from_rotation_y(FRAC_PI_2));
        let offset = Transform::from_translation(Vec3::new(6.0, 0.0, 0.0));

        let orbit = pivot.mul_transform(&offset);
        let spin = offset.mul_transform(&pivot);

        assert!(approx_eq_vec3(orbit.translation, Vec3::new(0.0, 0.0, -6.0)));
        assert!(approx_eq_vec3(spin.translation, Vec3::new(6.0, 0.0, 0.0)));
        assert!(orbit.rotation.abs_diff_eq(spin.rotation, EPSILON));
    }

    #[test]
    fn test_mul_transform_with_parent_scale() {
        let parent = Transform::IDENTITY
            .with_translation(Vec3::new(10.0, 0.0, 0.0))
            .with_scale(Vec3::splat(2.0));
        let child = Transform::from_translation(Vec3::new(5.0, 0.0, 0.0));

        let world = parent.mul_transform(&child);
        assert!(approx_eq_vec3(world.translation, Vec3::new(20.0, 0.0, 0.0)));
        assert!(approx_eq_vec3(world.scale, Vec3::splat(2.0)));
    }

    #[test]
    fn test_translate() {
        let mut t = Transform::from_translation(Vec3::X);
        t.translate(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_normal_matrix_degenerate_scale() {
        let t = Transform::IDENTITY.with_scale(Vec3::new(1.0, 0.0, 1.0));
        let normal = t.normal_matrix();

        assert_eq!(normal, Mat3::IDENTITY);
        assert!(!normal.is_nan());
    }

    #[test]
    fn test_normal_matrix_ignores_translation() {
        let t = Transform::from_translation(Vec3::new(6.0, -2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(FRAC_PI_3))
            .with_scale(Vec3::new(1.0, 2.0, 1.0));
        let expected = Mat3::from_mat4(t.compute_matrix()).inverse().transpose();
        let normal = t.normal_matrix();

        for axis in [Vec3::X, Vec3::Y, Vec3::Z] {
            assert!(approx_eq_vec3(normal * axis, expected * axis));
        }
    }

    #[test]
    fn test_normal_stays_perpendicular_under_stretch() {
        // A surface tangent along (1, 1, 0) with normal (1, -1, 0).
        let t = Transform::IDENTITY.with_scale(Vec3::new(1.0, 3.0, 1.0));
        let tangent = Mat3::from_mat4(t.compute_matrix()) * Vec3::new(1.0, 1.0, 0.0);
        let normal = t.normal_matrix() * Vec3::new(1.0, -1.0, 0.0);

        assert!(tangent.dot(normal).abs() < EPSILON);
    }
}
