//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - World space is right-handed; `perspective` and `look_at` follow the
//!   same convention a desktop GL application would use.

use std::ops::Mul;

use super::mat3::Mat3;
use super::quat::Quat;
use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column (column-major convention).
    pub fn translation(v: Vec3) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, v.x],
            [0.0, 1.0, 0.0, v.y],
            [0.0, 0.0, 1.0, v.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(v: Vec3) -> Self {
        Mat4::new([
            [v.x, 0.0, 0.0, 0.0],
            [0.0, v.y, 0.0, 0.0],
            [0.0, 0.0, v.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation matrix from a unit quaternion (glTF XYZW layout).
    pub fn from_quat(q: Quat) -> Self {
        q.to_mat4()
    }

    /// Composes a model matrix from glTF's `T * R * S` node convention.
    pub fn from_rotation_translation_scale(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Mat4::translation(translation) * Mat4::from_quat(rotation) * Mat4::scaling(scale)
    }

    /// Builds a matrix from glTF's column-major flat `[f32; 16]` node matrix.
    pub fn from_column_major(m: [f32; 16]) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (col, chunk) in m.chunks_exact(4).enumerate() {
            for (row, &value) in chunk.iter().enumerate() {
                data[row][col] = value;
            }
        }
        Mat4::new(data)
    }

    /// Right-handed symmetric perspective projection, depth remapped to `[-1, 1]`.
    ///
    /// `fov_y` is the vertical field of view in radians.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        Mat4::new([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [
                0.0,
                0.0,
                (far + near) / (near - far),
                (2.0 * far * near) / (near - far),
            ],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` toward `center`, with `up`
    /// as the world-space up hint.
    pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        let f = (center - eye).normalize();
        let s = f.cross(up).normalize();
        let u = s.cross(f);

        Mat4::new([
            [s.x, s.y, s.z, -s.dot(eye)],
            [u.x, u.y, u.z, -u.dot(eye)],
            [-f.x, -f.y, -f.z, f.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns a new matrix with translation applied: `self * Mat4::translation(v)`.
    pub fn translate(&self, v: Vec3) -> Self {
        *self * Mat4::translation(v)
    }

    /// Returns a new matrix with transpose applied: `self.transpose()`.
    pub fn transpose(&self) -> Self {
        Mat4 {
            data: [
                [self.data[0][0], self.data[1][0], self.data[2][0], self.data[3][0]],
                [self.data[0][1], self.data[1][1], self.data[2][1], self.data[3][1]],
                [self.data[0][2], self.data[1][2], self.data[2][2], self.data[3][2]],
                [self.data[0][3], self.data[1][3], self.data[2][3], self.data[3][3]],
            ],
        }
    }

    /// Upper-left 3x3 submatrix, dropping translation and the homogeneous row/column.
    pub fn upper_left3(&self) -> Mat3 {
        let m = &self.data;
        Mat3::new([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    /// The matrix that correctly transforms normals under a (possibly
    /// non-uniform) model transform: the transpose of the inverse of the
    /// upper-left 3x3. Falls back to the upper-left 3x3 itself when singular.
    pub fn normal_matrix(&self) -> Mat3 {
        let upper = self.upper_left3();
        match upper.inverse() {
            Some(inv) => inv.transpose(),
            None => upper,
        }
    }

    /// Computes the inverse of the matrix, if it exists.
    /// Returns `None` if the matrix is singular (determinant is zero).
    pub fn inverse(&self) -> Option<Mat4> {
        let m = &self.data;

        // Calculate cofactors for the first row (needed for determinant)
        let c00 = m[1][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[1][2] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            + m[1][3] * (m[2][1] * m[3][2] - m[2][2] * m[3][1]);

        let c01 = -(m[1][0] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[1][2] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[1][3] * (m[2][0] * m[3][2] - m[2][2] * m[3][0]));

        let c02 = m[1][0] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            - m[1][1] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[1][3] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]);

        let c03 = -(m[1][0] * (m[2][1] * m[3][2] - m[2][2] * m[3][1])
            - m[1][1] * (m[2][0] * m[3][2] - m[2][2] * m[3][0])
            + m[1][2] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]));

        // Determinant using first row expansion
        let det = m[0][0] * c00 + m[0][1] * c01 + m[0][2] * c02 + m[0][3] * c03;

        if det.abs() < f32::EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;

        // Calculate remaining cofactors
        let c10 = -(m[0][1] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[0][2] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            + m[0][3] * (m[2][1] * m[3][2] - m[2][2] * m[3][1]));

        let c11 = m[0][0] * (m[2][2] * m[3][3] - m[2][3] * m[3][2])
            - m[0][2] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[0][3] * (m[2][0] * m[3][2] - m[2][2] * m[3][0]);

        let c12 = -(m[0][0] * (m[2][1] * m[3][3] - m[2][3] * m[3][1])
            - m[0][1] * (m[2][0] * m[3][3] - m[2][3] * m[3][0])
            + m[0][3] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]));

        let c13 = m[0][0] * (m[2][1] * m[3][2] - m[2][2] * m[3][1])
            - m[0][1] * (m[2][0] * m[3][2] - m[2][2] * m[3][0])
            + m[0][2] * (m[2][0] * m[3][1] - m[2][1] * m[3][0]);

        let c20 = m[0][1] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
            - m[0][2] * (m[1][1] * m[3][3] - m[1][3] * m[3][1])
            + m[0][3] * (m[1][1] * m[3][2] - m[1][2] * m[3][1]);

        let c21 = -(m[0][0] * (m[1][2] * m[3][3] - m[1][3] * m[3][2])
            - m[0][2] * (m[1][0] * m[3][3] - m[1][3] * m[3][0])
            + m[0][3] * (m[1][0] * m[3][2] - m[1][2] * m[3][0]));

        let c22 = m[0][0] * (m[1][1] * m[3][3] - m[1][3] * m[3][1])
            - m[0][1] * (m[1][0] * m[3][3] - m[1][3] * m[3][0])
            + m[0][3] * (m[1][0] * m[3][1] - m[1][1] * m[3][0]);

        let c23 = -(m[0][0] * (m[1][1] * m[3][2] - m[1][2] * m[3][1])
            - m[0][1] * (m[1][0] * m[3][2] - m[1][2] * m[3][0])
            + m[0][2] * (m[1][0] * m[3][1] - m[1][1] * m[3][0]));

        let c30 = -(m[0][1] * (m[1][2] * m[2][3] - m[1][3] * m[2][2])
            - m[0][2] * (m[1][1] * m[2][3] - m[1][3] * m[2][1])
            + m[0][3] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]));

        let c31 = m[0][0] * (m[1][2] * m[2][3] - m[1][3] * m[2][2])
            - m[0][2] * (m[1][0] * m[2][3] - m[1][3] * m[2][0])
            + m[0][3] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]);

        let c32 = -(m[0][0] * (m[1][1] * m[2][3] - m[1][3] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][3] - m[1][3] * m[2][0])
            + m[0][3] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]));

        let c33 = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

        // The inverse is the transpose of the cofactor matrix divided by determinant
        Some(Mat4::new([
            [c00 * inv_det, c10 * inv_det, c20 * inv_det, c30 * inv_det],
            [c01 * inv_det, c11 * inv_det, c21 * inv_det, c31 * inv_det],
            [c02 * inv_det, c12 * inv_det, c22 * inv_det, c32 * inv_det],
            [c03 * inv_det, c13 * inv_det, c23 * inv_det, c33 * inv_det],
        ]))
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for row in 0..4 {
            for col in 0..4 {
                result[row][col] = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        Vec4::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2] * v.z + self.data[0][3] * v.w,
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2] * v.z + self.data[1][3] * v.w,
            self.data[2][0] * v.x + self.data[2][1] * v.y + self.data[2][2] * v.z + self.data[2][3] * v.w,
            self.data[3][0] * v.x + self.data[3][1] * v.y + self.data[3][2] * v.z + self.data[3][3] * v.w,
        )
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1,
/// dropping the resulting w rather than dividing by it — callers needing a
/// perspective divide should go through `Vec4` and `to_vec3_perspective`).
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        Vec3::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y + self.data[0][2] * v.z + self.data[0][3],
            self.data[1][0] * v.x + self.data[1][1] * v.y + self.data[1][2] * v.z + self.data[1][3],
            self.data[2][0] * v.x + self.data[2][1] * v.y + self.data[2][2] * v.z + self.data[2][3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_times_identity_is_identity() {
        assert_eq!(Mat4::identity() * Mat4::identity(), Mat4::identity());
    }

    #[test]
    fn translation_moves_a_point() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        let p = m * Vec3::new(0.0, 0.0, 0.0);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn inverse_of_translation_undoes_it() {
        let m = Mat4::translation(Vec3::new(4.0, -2.0, 1.0));
        let inv = m.inverse().unwrap();
        let p = (inv * m) * Vec3::new(5.0, 5.0, 5.0);
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-4);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn look_at_places_center_on_negative_z_axis() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let center = Vec3::ZERO;
        let view = Mat4::look_at(eye, center, Vec3::UP);
        let view_space_center = view * center;
        assert_relative_eq!(view_space_center.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(view_space_center.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(view_space_center.z, -5.0, epsilon = 1e-5);
    }

    #[test]
    fn perspective_maps_near_plane_center_to_minus_one() {
        let proj = Mat4::perspective(60f32.to_radians(), 1.0, 0.1, 100.0);
        let clip = proj * Vec4::point(0.0, 0.0, -0.1);
        let ndc_z = clip.z / clip.w;
        assert_relative_eq!(ndc_z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Mat4::new([
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [1.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 0.0, 1.0],
        ]);
        assert!(m.inverse().is_none());
    }
}
