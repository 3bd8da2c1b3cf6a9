//! Material parameters consumed by the rasterizer's fragment stage.

use crate::bitmap::Bitmap;
use std::sync::Arc;

/// glTF alpha coverage mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

#[derive(Debug, Clone)]
pub struct Material {
    /// RGBA factor in linear space, multiplied into the sampled base color.
    pub base_color_factor: [f32; 4],
    /// Base-color texture, sampled in its stored color space (no decode).
    pub base_color_texture: Option<Arc<Bitmap>>,
    pub alpha_mode: AlphaMode,
    /// Cutoff used only when `alpha_mode == Mask`.
    pub alpha_cutoff: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
        }
    }
}
