//! Nearest-neighbor sampling of base-color textures.
//!
//! No mipmapping, no bilinear filtering, no color-space conversion: textures
//! are consumed exactly as stored, and out-of-range UVs clamp to the edge
//! rather than wrap.

use crate::bitmap::Bitmap;

/// Samples `texture` at normalized UV coordinates, returning a linear-ish
/// RGBA f32 color in `[0,1]`. Row 0 of the texture is the top row; there is
/// no V-flip.
#[inline]
pub fn sample(texture: &Bitmap, u: f32, v: f32) -> [f32; 4] {
    let tx = (u * (texture.width() as f32 - 1.0)).floor().clamp(0.0, texture.width() as f32 - 1.0);
    let ty = (v * (texture.height() as f32 - 1.0)).floor().clamp(0.0, texture.height() as f32 - 1.0);

    let [r, g, b, a] = texture.get_pixel(tx as i32, ty as i32);
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_the_nearest_texel() {
        let mut tex = Bitmap::new(2, 2);
        tex.set_pixel(0, 0, [255, 0, 0, 255]);
        tex.set_pixel(1, 0, [0, 255, 0, 255]);
        tex.set_pixel(0, 1, [0, 0, 255, 255]);
        tex.set_pixel(1, 1, [255, 255, 0, 255]);

        assert_eq!(sample(&tex, 0.0, 0.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(sample(&tex, 1.0, 0.0), [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(sample(&tex, 0.0, 1.0), [0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn out_of_range_uv_clamps_to_edge() {
        let mut tex = Bitmap::new(2, 2);
        tex.set_pixel(1, 1, [9, 9, 9, 255]);
        assert_eq!(sample(&tex, 5.0, 5.0), sample(&tex, 1.0, 1.0));
        assert_eq!(sample(&tex, -5.0, -5.0), sample(&tex, 0.0, 0.0));
    }
}
