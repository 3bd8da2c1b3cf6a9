//! Render orchestrator: resolves options, builds the camera, clears the
//! framebuffer, and dispatches every draw call in alpha-mode order.

use log::{debug, info};

use crate::bitmap::Bitmap;
use crate::camera::{build_camera, Camera};
use crate::drawcall::{DrawCall, DrawMode};
use crate::error::{RenderError, Result};
use crate::geometry::{compute_world_aabb, AabbInput};
use crate::material::{AlphaMode, Material};
use crate::math::{Mat4, Vec3};
use crate::raster::{rasterize, Framebuffer, ShadeParams};

/// Fully-resolved render options; every field has a default so callers only
/// need to override what they care about.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub fov_deg: f32,
    pub cam_pos: Option<Vec3>,
    pub look_at: Option<Vec3>,
    pub light_dir: Vec3,
    pub ambient: f32,
    pub cull: bool,
    pub gamma: bool,
    pub background: Option<[f32; 3]>,
    pub grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            fov_deg: 60.0,
            cam_pos: None,
            look_at: None,
            light_dir: Vec3::new(-0.4, -0.9, -0.2),
            ambient: 0.15,
            cull: true,
            gamma: true,
            background: None,
            grid: false,
        }
    }
}

/// Renders `draw_calls` under `options`, returning the output bitmap, the
/// camera that was used, and the fully-resolved options.
pub fn render(draw_calls: &[DrawCall], options: RenderOptions) -> Result<(Bitmap, Camera, RenderOptions)> {
    if options.width == 0 || options.height == 0 {
        return Err(RenderError::DimensionError {
            width: options.width,
            height: options.height,
        });
    }
    debug!("resolved render options: {options:?}");

    let camera = build_camera(
        draw_calls,
        options.width,
        options.height,
        options.fov_deg,
        options.cam_pos,
        options.look_at,
    );

    let mut fb = Framebuffer::new(options.width, options.height);
    fb.clear(options.background);

    let mut all_calls: Vec<&DrawCall> = draw_calls.iter().collect();
    let grid_call;
    if options.grid {
        grid_call = build_grid_draw_call(draw_calls);
        all_calls.push(&grid_call);
    }

    let (opaque, mask, blend): (Vec<_>, Vec<_>, Vec<_>) = partition_by_alpha(&all_calls);
    info!(
        "rendering {} opaque, {} mask, {} blend draw call(s)",
        opaque.len(),
        mask.len(),
        blend.len()
    );

    let params = ShadeParams {
        light_dir: options.light_dir.normalize(),
        ambient: options.ambient.clamp(0.0, 1.0),
        cull: options.cull,
        gamma: options.gamma,
    };

    for dc in opaque.into_iter().chain(mask).chain(blend) {
        rasterize(&mut fb, dc, camera.view, camera.proj, &params);
    }

    Ok((fb.into_bitmap(), camera, options))
}

fn partition_by_alpha<'a>(calls: &[&'a DrawCall]) -> (Vec<&'a DrawCall>, Vec<&'a DrawCall>, Vec<&'a DrawCall>) {
    let mut opaque = Vec::new();
    let mut mask = Vec::new();
    let mut blend = Vec::new();
    for &dc in calls {
        match dc.material.alpha_mode {
            AlphaMode::Opaque => opaque.push(dc),
            AlphaMode::Mask => mask.push(dc),
            AlphaMode::Blend => blend.push(dc),
        }
    }
    (opaque, mask, blend)
}

/// Synthesizes a ground-plane grid sized and centered from the scene's AABB:
/// `axis-extent * 1.2`, rounded up to the next even integer, placed at
/// `aabb.min.y`.
fn build_grid_draw_call(draw_calls: &[DrawCall]) -> DrawCall {
    let aabb = compute_world_aabb(draw_calls.iter().map(|dc| AabbInput {
        positions: &dc.positions,
        model: dc.model,
    }));
    let center = aabb.center();
    let extent = aabb.extent();
    let span = (extent.x.max(extent.z) * 1.2).max(1.0);
    let half = ((span / 2.0).ceil() as i32).max(1);
    let y = aabb.min.y;

    let mut positions = Vec::new();
    for i in -half..=half {
        let offset = i as f32;
        positions.extend_from_slice(&[center.x - half as f32, y, center.z + offset, center.x + half as f32, y, center.z + offset]);
        positions.extend_from_slice(&[center.x + offset, y, center.z - half as f32, center.x + offset, y, center.z + half as f32]);
    }

    DrawCall {
        positions,
        normals: None,
        uvs: None,
        colors: None,
        indices: None,
        model: Mat4::identity(),
        material: Material {
            base_color_factor: [0.5, 0.5, 0.5, 1.0],
            base_color_texture: None,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
        },
        mode: DrawMode::Lines,
    }
}
