//! Unit quaternion, stored XYZW to match glTF's `rotation` accessor layout.

use super::mat3::Mat3;
use super::mat4::Mat4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation matrix equivalent to this quaternion, assumed already unit length
    /// (glTF requires node rotations to be normalized).
    pub fn to_mat3(&self) -> Mat3 {
        let (x, y, z, w) = (self.x, self.y, self.z, self.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Mat3::new([
            [1.0 - (yy + zz), xy - wz, xz + wy],
            [xy + wz, 1.0 - (xx + zz), yz - wx],
            [xz - wy, yz + wx, 1.0 - (xx + yy)],
        ])
    }

    pub fn to_mat4(&self) -> Mat4 {
        let r = self.to_mat3();
        Mat4::new([
            [r.get(0, 0), r.get(0, 1), r.get(0, 2), 0.0],
            [r.get(1, 0), r.get(1, 1), r.get(1, 2), 0.0],
            [r.get(2, 0), r.get(2, 1), r.get(2, 2), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3::Vec3;

    #[test]
    fn identity_quaternion_is_identity_matrix() {
        assert_eq!(Quat::IDENTITY.to_mat4(), Mat4::identity());
    }

    #[test]
    fn quarter_turn_about_z_rotates_x_to_y() {
        let half = std::f32::consts::FRAC_PI_4;
        let q = Quat::new(0.0, 0.0, half.sin(), half.cos());
        let m = q.to_mat3();
        let rotated = m * Vec3::new(1.0, 0.0, 0.0);
        assert!((rotated.x - 0.0).abs() < 1e-5);
        assert!((rotated.y - 1.0).abs() < 1e-5);
    }
}
