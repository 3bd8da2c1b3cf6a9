//! Per-vertex clip-space transform shared by the triangle and line paths.

use crate::drawcall::DrawCall;
use crate::math::{Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::raster::transform_normal;

/// A vertex after the model/view/projection transform, ready for either the
/// triangle or the line rasterizer.
#[derive(Debug, Clone, Copy)]
pub struct TransformedVertex {
    /// Screen-space XY. The triangle path rounds these to pixel centers; the
    /// line path keeps sub-pixel precision.
    pub screen: Vec2,
    /// `z*0.5+0.5`, the depth-buffer convention.
    pub z01: f32,
    pub inv_w: f32,
    /// `true` when `inv_w` was non-finite: the vertex is degenerate and any
    /// primitive referencing it must be skipped.
    pub clipped: bool,
    /// World-space normal, left un-normalized until per-fragment interpolation.
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: [f32; 4],
}

/// Transforms every vertex of a draw call to clip space and on to screen
/// space. `round_screen` selects the triangle path's rounding to the nearest
/// pixel center vs. the line path's sub-pixel precision.
pub fn transform_vertices(
    dc: &DrawCall,
    mvp: Mat4,
    normal_matrix: Mat3,
    normals: &[f32],
    width: u32,
    height: u32,
    round_screen: bool,
) -> Vec<TransformedVertex> {
    let n = dc.vertex_count();
    let mut out = Vec::with_capacity(n);
    let color_stride = color_stride(dc, n);

    for i in 0..n {
        let p = Vec3::new(
            dc.positions[i * 3],
            dc.positions[i * 3 + 1],
            dc.positions[i * 3 + 2],
        );
        let clip = mvp * Vec4::point(p.x, p.y, p.z);
        let inv_w = 1.0 / clip.w;
        // `w <= 0` means the vertex is at or behind the camera; any
        // primitive referencing it is skipped rather than rasterized.
        let clipped = clip.w <= 0.0 || !inv_w.is_finite();

        let ndc = Vec3::new(clip.x, clip.y, clip.z) * inv_w;
        let screen = screen_xy(ndc, width, height, round_screen);
        let z01 = ndc.z * 0.5 + 0.5;

        let local_normal = Vec3::new(normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]);
        let world_normal = transform_normal(normal_matrix, local_normal);

        let uv = match &dc.uvs {
            Some(uvs) => Vec2::new(uvs[i * 2], uvs[i * 2 + 1]),
            None => Vec2::ZERO,
        };

        let color = vertex_color(dc, i, color_stride);

        out.push(TransformedVertex {
            screen,
            z01,
            inv_w,
            clipped,
            normal: world_normal,
            uv,
            color,
        });
    }

    out
}

/// The `COLOR_0` accessor is either `VEC3` or `VEC4`; the component count is
/// fixed for the whole buffer, so it must be decided once from the total
/// length rather than re-guessed per vertex.
fn color_stride(dc: &DrawCall, vertex_count: usize) -> Option<usize> {
    match &dc.colors {
        Some(colors) if colors.len() == vertex_count * 4 => Some(4),
        Some(colors) if colors.len() == vertex_count * 3 => Some(3),
        _ => None,
    }
}

fn vertex_color(dc: &DrawCall, i: usize, stride: Option<usize>) -> [f32; 4] {
    match (stride, &dc.colors) {
        (Some(4), Some(colors)) => [
            colors[i * 4],
            colors[i * 4 + 1],
            colors[i * 4 + 2],
            colors[i * 4 + 3],
        ],
        (Some(3), Some(colors)) => {
            [colors[i * 3], colors[i * 3 + 1], colors[i * 3 + 2], 1.0]
        }
        _ => [1.0, 1.0, 1.0, 1.0],
    }
}

#[inline]
fn screen_xy(ndc: Vec3, width: u32, height: u32, round: bool) -> Vec2 {
    let x = (ndc.x * 0.5 + 0.5) * (width as f32 - 1.0);
    let y = (1.0 - (ndc.y * 0.5 + 0.5)) * (height as f32 - 1.0);
    if round {
        Vec2::new(x.round(), y.round())
    } else {
        Vec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawcall::DrawMode;
    use crate::material::Material;

    fn quad(colors: Option<Vec<f32>>) -> DrawCall {
        DrawCall {
            positions: vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            ],
            normals: Some(vec![0.0; 12]),
            uvs: None,
            colors,
            indices: Some(vec![0, 1, 2, 0, 2, 3]),
            model: Mat4::identity(),
            material: Material::default(),
            mode: DrawMode::Triangles,
        }
    }

    #[test]
    fn vec3_color_buffer_is_not_misread_as_rgba() {
        // 4 vertices, VEC3 COLOR_0: a naive `colors.len() >= (i+1)*4` check
        // would succeed for i==0..2 (12 >= 4, 8, 12) and read misaligned,
        // bogus-alpha RGBA out of a buffer that is actually tightly packed RGB.
        let dc = quad(Some(vec![
            1.0, 0.0, 0.0, // vertex 0: red
            0.0, 1.0, 0.0, // vertex 1: green
            0.0, 0.0, 1.0, // vertex 2: blue
            1.0, 1.0, 0.0, // vertex 3: yellow
        ]));
        let vertices = transform_vertices(&dc, Mat4::identity(), Mat3::identity(), &[0.0; 12], 8, 8, false);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].color, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(vertices[2].color, [0.0, 0.0, 1.0, 1.0]);
        assert_eq!(vertices[3].color, [1.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn vec4_color_buffer_keeps_its_own_alpha() {
        let dc = quad(Some(vec![
            1.0, 0.0, 0.0, 0.5, 0.0, 1.0, 0.0, 0.5, 0.0, 0.0, 1.0, 0.5, 1.0, 1.0, 0.0, 0.5,
        ]));
        let vertices = transform_vertices(&dc, Mat4::identity(), Mat3::identity(), &[0.0; 12], 8, 8, false);
        assert_eq!(vertices[0].color, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(vertices[3].color, [1.0, 1.0, 0.0, 0.5]);
    }

    #[test]
    fn missing_colors_default_to_opaque_white() {
        let dc = quad(None);
        let vertices = transform_vertices(&dc, Mat4::identity(), Mat3::identity(), &[0.0; 12], 8, 8, false);
        assert_eq!(vertices[0].color, [1.0, 1.0, 1.0, 1.0]);
    }
}
