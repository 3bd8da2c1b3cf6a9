//! Fragment shading: Lambert + ambient lighting and the sRGB gamma transfer.

use crate::math::Vec3;

/// Per-render shading parameters threaded through every draw call.
#[derive(Debug, Clone, Copy)]
pub struct ShadeParams {
    /// Normalized world-space light direction (points *from* the light).
    pub light_dir: Vec3,
    pub ambient: f32,
    pub cull: bool,
    pub gamma: bool,
}

/// `ambient + (1-ambient) * max(0, n . -light_dir)`.
#[inline]
pub fn lambert(normal: Vec3, params: &ShadeParams) -> f32 {
    let n_dot_l = normal.dot(-params.light_dir).max(0.0);
    params.ambient + (1.0 - params.ambient) * n_dot_l
}

/// Piecewise sRGB encode, applied per-channel before byte quantization.
#[inline]
pub fn srgb_encode(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Applies the gamma option: either the sRGB transfer or a pass-through.
#[inline]
pub fn encode_channel(linear: f32, gamma: bool) -> f32 {
    if gamma {
        srgb_encode(linear)
    } else {
        linear
    }
}

/// Perspective-correct interpolation of a fixed-size attribute vector:
/// `A(p) = sum(lambda_k * A_k * inv_w_k) / sum(lambda_k * inv_w_k)`.
///
/// Returns `None` when the weighted denominator is ~zero, the signal to skip
/// the fragment entirely.
#[inline]
pub fn interpolate_perspective<const N: usize>(
    lambda: [f32; 3],
    inv_w: [f32; 3],
    attrs: [[f32; N]; 3],
) -> Option<[f32; N]> {
    let weights = [lambda[0] * inv_w[0], lambda[1] * inv_w[1], lambda[2] * inv_w[2]];
    let denom = weights[0] + weights[1] + weights[2];
    if denom.abs() < f32::EPSILON {
        return None;
    }

    let mut out = [0.0f32; N];
    for (k, attr) in attrs.iter().enumerate() {
        for (c, value) in attr.iter().enumerate() {
            out[c] += weights[k] * value;
        }
    }
    for v in &mut out {
        *v /= denom;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lambert_is_full_bright_facing_the_light() {
        let params = ShadeParams {
            light_dir: Vec3::new(0.0, 0.0, -1.0),
            ambient: 0.0,
            cull: true,
            gamma: true,
        };
        let lit = lambert(Vec3::new(0.0, 0.0, 1.0), &params);
        assert!((lit - 1.0).abs() < 1e-6);
    }

    #[test]
    fn lambert_respects_ambient_floor() {
        let params = ShadeParams {
            light_dir: Vec3::new(0.0, 0.0, -1.0),
            ambient: 0.2,
            cull: true,
            gamma: true,
        };
        let lit = lambert(Vec3::new(0.0, 0.0, -1.0), &params);
        assert!((lit - 0.2).abs() < 1e-6);
    }

    #[test]
    fn srgb_encode_is_identity_at_zero_and_one() {
        assert!((srgb_encode(0.0) - 0.0).abs() < 1e-6);
        assert!((srgb_encode(1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_interpolation_recovers_uniform_attribute() {
        let lambda = [0.2, 0.3, 0.5];
        let inv_w = [1.0, 2.0, 0.5];
        let attrs = [[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let out = interpolate_perspective(lambda, inv_w, attrs).unwrap();
        assert!((out[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_interpolation_rejects_zero_denominator() {
        let out = interpolate_perspective([0.5, 0.5, 0.0], [0.0, 0.0, 0.0], [[1.0], [1.0], [1.0]]);
        assert!(out.is_none());
    }
}
