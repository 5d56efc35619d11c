use glam::{EulerRot, Mat4, Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A principal axis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    #[default]
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Local transform of a scene node.
///
/// Rotation is Euler angles in radians applied in X, Y, Z order (the
/// rotation matrix is `Rx * Ry * Rz`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset from the parent origin.
    pub translation: Vec3,
    /// Euler XYZ rotation in radians.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation, or scaling.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Identity transform moved to `translation`.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Rotation angle about `axis`.
    #[must_use]
    pub fn rotation_about(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.rotation.x,
            Axis::Y => self.rotation.y,
            Axis::Z => self.rotation.z,
        }
    }

    /// Mutable rotation angle about `axis`.
    pub fn rotation_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.rotation.x,
            Axis::Y => &mut self.rotation.y,
            Axis::Z => &mut self.rotation.z,
        }
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(
            self.scale,
            rotation,
            self.translation,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn identity_matrix() {
        assert_eq!(Transform::IDENTITY.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_mut_targets_one_axis() {
        let mut t = Transform::IDENTITY;
        *t.rotation_mut(Axis::Y) = 1.5;
        assert_eq!(t.rotation, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(t.rotation_about(Axis::Y), 1.5);
    }

    #[test]
    fn y_rotation_turns_x_into_negative_z() {
        let mut t = Transform::IDENTITY;
        t.rotation.y = FRAC_PI_2;
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::NEG_Z).length() < 1e-6, "{p}");
    }

    #[test]
    fn translation_applies_after_rotation() {
        let mut t = Transform::from_translation(Vec3::new(1.0, 0.0, 0.0));
        t.rotation.z = FRAC_PI_2;
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6, "{p}");
    }
}
