//! DDA line rasterization, used for the grid overlay and any glTF `LINES`
//! primitive.

use crate::drawcall::DrawCall;
use crate::material::AlphaMode;
use crate::math::{Mat3, Mat4};
use crate::raster::shade::{encode_channel, ShadeParams};
use crate::raster::vertex::{transform_vertices, TransformedVertex};
use crate::raster::{quantize, Framebuffer};

pub fn rasterize_lines(fb: &mut Framebuffer, dc: &DrawCall, mvp: Mat4, params: &ShadeParams) {
    let indices = dc.effective_indices();
    let normal_matrix = Mat3::identity();
    let flat_normals = vec![0.0f32; dc.vertex_count() * 3];
    let normals: &[f32] = match &dc.normals {
        Some(n) => n,
        None => &flat_normals,
    };

    let vertices = transform_vertices(dc, mvp, normal_matrix, normals, fb.width(), fb.height(), false);

    for seg in indices.chunks_exact(2) {
        let a = &vertices[seg[0] as usize];
        let b = &vertices[seg[1] as usize];
        if a.clipped || b.clipped || (a.z01 < 0.0 && b.z01 < 0.0) || (a.z01 > 1.0 && b.z01 > 1.0) {
            continue;
        }

        draw_segment(fb, a, b, dc.material.base_color_factor, dc.material.alpha_mode, params.gamma);
    }
}

fn draw_segment(
    fb: &mut Framebuffer,
    a: &TransformedVertex,
    b: &TransformedVertex,
    base_color_factor: [f32; 4],
    alpha_mode: AlphaMode,
    gamma: bool,
) {
    let dx = b.screen.x - a.screen.x;
    let dy = b.screen.y - a.screen.y;
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;

    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let x = (a.screen.x + dx * t).round() as i32;
        let y = (a.screen.y + dy * t).round() as i32;
        if x < 0 || y < 0 || x >= fb.width() as i32 || y >= fb.height() as i32 {
            continue;
        }
        let z01 = a.z01 + (b.z01 - a.z01) * t;
        if !(0.0..=1.0).contains(&z01) || z01 >= fb.depth_at_xy(x, y) {
            continue;
        }

        let mut color = [0.0f32; 4];
        for c in 0..4 {
            color[c] = base_color_factor[c] * (a.color[c] + (b.color[c] - a.color[c]) * t);
        }
        let rgba = [
            quantize(encode_channel(color[0], gamma)),
            quantize(encode_channel(color[1], gamma)),
            quantize(encode_channel(color[2], gamma)),
            quantize(color[3]),
        ];

        match alpha_mode {
            AlphaMode::Blend => {
                let src = [
                    rgba[0] as f32 / 255.0,
                    rgba[1] as f32 / 255.0,
                    rgba[2] as f32 / 255.0,
                    rgba[3] as f32 / 255.0,
                ];
                fb.write_blend(x, y, z01, src);
            }
            _ => fb.write_opaque(x, y, z01, rgba),
        }
    }
}
