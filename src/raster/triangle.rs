//! Edge-function triangle rasterization with a z-buffer and perspective-correct
//! attribute interpolation.
//!
//! The bounding-box-plus-edge-function approach below is the textbook GPU
//! rasterization algorithm (Pineda 1988): for every pixel in the triangle's
//! screen-space bounding box, three edge functions decide coverage, and their
//! values — normalized by the triangle's signed area — double as barycentric
//! interpolation weights.

use crate::drawcall::DrawCall;
use crate::geometry::compute_smooth_normals;
use crate::material::AlphaMode;
use crate::math::{Mat3, Mat4, Vec2, Vec3};
use crate::raster::shade::{encode_channel, interpolate_perspective, lambert, ShadeParams};
use crate::raster::vertex::{transform_vertices, TransformedVertex};
use crate::raster::{quantize, Framebuffer};
use crate::texture;

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (p.x - a.x) * (b.y - a.y) - (p.y - a.y) * (b.x - a.x)
}

pub fn rasterize_triangles(
    fb: &mut Framebuffer,
    dc: &DrawCall,
    mvp: Mat4,
    normal_matrix: Mat3,
    params: &ShadeParams,
) {
    let indices = dc.effective_indices();

    let owned_normals;
    let normals: &[f32] = match &dc.normals {
        Some(n) => n,
        None => {
            owned_normals = compute_smooth_normals(&dc.positions, &indices);
            &owned_normals
        }
    };

    let vertices = transform_vertices(dc, mvp, normal_matrix, normals, fb.width(), fb.height(), true);

    for tri in indices.chunks_exact(3) {
        let v = [
            &vertices[tri[0] as usize],
            &vertices[tri[1] as usize],
            &vertices[tri[2] as usize],
        ];
        if v.iter().any(|vtx| vtx.clipped) {
            continue;
        }

        rasterize_triangle(fb, v, &dc.material, params);
    }
}

fn rasterize_triangle(
    fb: &mut Framebuffer,
    v: [&TransformedVertex; 3],
    material: &crate::material::Material,
    params: &ShadeParams,
) {
    let p = [v[0].screen, v[1].screen, v[2].screen];
    let area = edge(p[0], p[1], p[2]);

    if area == 0.0 {
        return;
    }
    if params.cull && area < 0.0 {
        return;
    }

    let min_x = p[0].x.min(p[1].x).min(p[2].x).floor().max(0.0) as i32;
    let max_x = p[0].x.max(p[1].x).max(p[2].x).ceil().min(fb.width() as f32 - 1.0) as i32;
    let min_y = p[0].y.min(p[1].y).min(p[2].y).floor().max(0.0) as i32;
    let max_y = p[0].y.max(p[1].y).max(p[2].y).ceil().min(fb.height() as f32 - 1.0) as i32;

    let texture = material.base_color_texture.as_deref();

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let pixel = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(p[1], p[2], pixel);
            let w1 = edge(p[2], p[0], pixel);
            let w2 = edge(p[0], p[1], pixel);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let lambda = [w0 / area, w1 / area, w2 / area];
            let z01 = lambda[0] * v[0].z01 + lambda[1] * v[1].z01 + lambda[2] * v[2].z01;

            if z01 >= fb.depth_at_xy(x, y) {
                continue;
            }

            let Some(shaded) = shade_fragment(lambda, v, texture, material, params) else {
                continue;
            };

            match material.alpha_mode {
                AlphaMode::Opaque => fb.write_opaque(x, y, z01, shaded),
                AlphaMode::Mask => {
                    let alpha = shaded[3] as f32 / 255.0;
                    if alpha >= material.alpha_cutoff {
                        fb.write_opaque(x, y, z01, [shaded[0], shaded[1], shaded[2], 255]);
                    }
                }
                AlphaMode::Blend => {
                    let src = [
                        shaded[0] as f32 / 255.0,
                        shaded[1] as f32 / 255.0,
                        shaded[2] as f32 / 255.0,
                        shaded[3] as f32 / 255.0,
                    ];
                    fb.write_blend(x, y, z01, src);
                }
            }
        }
    }
}

fn shade_fragment(
    lambda: [f32; 3],
    v: [&TransformedVertex; 3],
    texture: Option<&crate::bitmap::Bitmap>,
    material: &crate::material::Material,
    params: &ShadeParams,
) -> Option<[u8; 4]> {
    let inv_w = [v[0].inv_w, v[1].inv_w, v[2].inv_w];

    let uv = interpolate_perspective(lambda, inv_w, [
        [v[0].uv.x, v[0].uv.y],
        [v[1].uv.x, v[1].uv.y],
        [v[2].uv.x, v[2].uv.y],
    ])?;
    let normal = interpolate_perspective(lambda, inv_w, [
        [v[0].normal.x, v[0].normal.y, v[0].normal.z],
        [v[1].normal.x, v[1].normal.y, v[1].normal.z],
        [v[2].normal.x, v[2].normal.y, v[2].normal.z],
    ])?;
    let vertex_color = interpolate_perspective(lambda, inv_w, [v[0].color, v[1].color, v[2].color])?;

    let mut base = material.base_color_factor;
    if let Some(tex) = texture {
        let sampled = texture::sample(tex, uv[0], uv[1]);
        base[0] *= sampled[0];
        base[1] *= sampled[1];
        base[2] *= sampled[2];
        base[3] *= sampled[3];
    }

    base[0] *= vertex_color[0];
    base[1] *= vertex_color[1];
    base[2] *= vertex_color[2];
    base[3] *= vertex_color[3];

    let n = Vec3::new(normal[0], normal[1], normal[2]);
    let n_hat = if n.magnitude() < f32::EPSILON { Vec3::UP } else { n.normalize() };
    let lit = lambert(n_hat, params);
    base[0] *= lit;
    base[1] *= lit;
    base[2] *= lit;

    Some([
        quantize(encode_channel(base[0], params.gamma)),
        quantize(encode_channel(base[1], params.gamma)),
        quantize(encode_channel(base[2], params.gamma)),
        quantize(base[3]),
    ])
}
