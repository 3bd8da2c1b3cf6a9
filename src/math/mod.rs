//! Linear algebra kernel: vectors, matrices, and quaternions.
//!
//! Conventions used throughout this crate:
//! - Matrices are column-major and multiply column vectors on the right
//!   (`A * B * v` applies `B` first, then `A`).
//! - World space is right-handed, Y-up. Screen space is Y-down (row 0 is
//!   the top of the framebuffer); the rasterizer is responsible for that
//!   flip, not the math kernel.

pub mod mat3;
pub mod mat4;
pub mod quat;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use quat::Quat;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
