//! Translate/rotate/scale transforms for instances and scene nodes

use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3};

/// TRS transform composed as `T * R * S`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self { position, ..Self::identity() }
    }

    pub fn from_position_scale(position: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self { position, scale, ..Self::identity() }
    }

    /// Collapsed to a point: renders nothing and cannot be picked
    pub fn hidden() -> Self {
        Self { scale: Vector3::zeros(), ..Self::identity() }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Split an affine matrix back into translation, rotation and scale.
    /// A negative determinant is folded into the X scale.
    pub fn decompose(m: &Matrix4<f32>) -> Self {
        let position = Vector3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)]);
        let basis: Matrix3<f32> = m.fixed_view::<3, 3>(0, 0).into_owned();

        let mut sx = basis.column(0).norm();
        let sy = basis.column(1).norm();
        let sz = basis.column(2).norm();
        if basis.determinant() < 0.0 {
            sx = -sx;
        }

        let rotation = if sx.abs() > 1e-12 && sy > 1e-12 && sz > 1e-12 {
            let mut r = basis;
            r.set_column(0, &(basis.column(0) / sx));
            r.set_column(1, &(basis.column(1) / sy));
            r.set_column(2, &(basis.column(2) / sz));
            UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(r))
        } else {
            UnitQuaternion::identity()
        };

        Self {
            position,
            rotation,
            scale: Vector3::new(sx, sy, sz),
        }
    }
}
