//! Software rasterization: triangle and line fill over a color + depth buffer.

mod line;
mod shade;
mod triangle;
mod vertex;

use crate::bitmap::Bitmap;
use crate::drawcall::{DrawCall, DrawMode};
use crate::math::{Mat3, Mat4, Vec3};

pub use shade::ShadeParams;

/// Owns the color and depth buffers for one render and provides bounds-checked
/// pixel access. The depth buffer stores `z01 = ndc_z*0.5+0.5`, initialized to
/// `+inf` so every first write passes the depth test.
pub struct Framebuffer {
    color: Bitmap,
    depth: Vec<f32>,
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color: Bitmap::new(width, height),
            depth: vec![f32::INFINITY; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Clears color to `background` (alpha forced opaque) or fully transparent
    /// black when `background` is `None`, and resets depth to `+inf`.
    pub fn clear(&mut self, background: Option<[f32; 3]>) {
        let rgba = match background {
            Some([r, g, b]) => [quantize(r), quantize(g), quantize(b), 255],
            None => [0, 0, 0, 0],
        };
        self.color.clear(rgba);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    #[inline]
    fn depth_index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Depth value currently stored at `(x, y)`. Callers must ensure the
    /// coordinates are in bounds; both rasterizer paths clip their bounding
    /// boxes to the framebuffer extents before calling this.
    #[inline]
    pub(crate) fn depth_at_xy(&self, x: i32, y: i32) -> f32 {
        self.depth[self.depth_index(x, y)]
    }

    /// Depth test + opaque/mask write: writes both color and depth if `z01`
    /// is strictly less than the stored depth.
    #[inline]
    fn write_opaque(&mut self, x: i32, y: i32, z01: f32, color: [u8; 4]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.depth_index(x, y);
        if z01 < self.depth[idx] {
            self.depth[idx] = z01;
            self.color.set_pixel(x, y, color);
        }
    }

    /// Depth test (no write) + source-over blend.
    #[inline]
    fn write_blend(&mut self, x: i32, y: i32, z01: f32, src: [f32; 4]) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.depth_index(x, y);
        if z01 >= self.depth[idx] {
            return;
        }
        let dst = self.color.get_pixel(x, y);
        let a = src[3];
        let out = [
            src[0] * a + (dst[0] as f32 / 255.0) * (1.0 - a),
            src[1] * a + (dst[1] as f32 / 255.0) * (1.0 - a),
            src[2] * a + (dst[2] as f32 / 255.0) * (1.0 - a),
            a + (dst[3] as f32 / 255.0) * (1.0 - a),
        ];
        self.color.set_pixel(
            x,
            y,
            [quantize(out[0]), quantize(out[1]), quantize(out[2]), quantize(out[3])],
        );
    }

    pub fn into_bitmap(self) -> Bitmap {
        self.color
    }

    #[cfg(test)]
    pub fn depth_at(&self, x: i32, y: i32) -> f32 {
        self.depth[self.depth_index(x, y)]
    }

    #[cfg(test)]
    pub fn bitmap(&self) -> &Bitmap {
        &self.color
    }
}

#[inline]
pub(crate) fn quantize(linear: f32) -> u8 {
    (linear.clamp(0.0, 1.0) * 255.0) as u8
}

/// Rasterizes one draw call into `fb`, dispatching to the triangle or line
/// path by `draw_call.mode`.
pub fn rasterize(
    fb: &mut Framebuffer,
    draw_call: &DrawCall,
    view: Mat4,
    proj: Mat4,
    params: &ShadeParams,
) {
    let mvp = proj * view * draw_call.model;
    let normal_matrix = draw_call.model.normal_matrix();

    match draw_call.mode {
        DrawMode::Triangles => triangle::rasterize_triangles(fb, draw_call, mvp, normal_matrix, params),
        DrawMode::Lines => line::rasterize_lines(fb, draw_call, mvp, params),
    }
}

/// World-space normal transform applied when a vertex's normal is synthesized
/// or read straight from the draw call; split out so the triangle path can
/// reuse the `Mat3` built once per draw call.
#[inline]
pub(crate) fn transform_normal(normal_matrix: Mat3, n: Vec3) -> Vec3 {
    normal_matrix * n
}
