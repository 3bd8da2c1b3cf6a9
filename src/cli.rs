//! Command-line flag surface, parsed with `clap`'s derive API.

use std::path::PathBuf;

use clap::Parser;

use crate::math::Vec3;
use crate::render::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "rustergl", about = "Software rasterizer for glTF 2.0 models", long_about = None)]
pub struct Cli {
    /// Path to a .gltf or .glb model.
    pub model: PathBuf,

    /// Output PNG path.
    #[arg(long, default_value = "out.png")]
    pub out: PathBuf,

    #[arg(long = "w", default_value_t = 800)]
    pub width: u32,

    #[arg(long = "h", default_value_t = 600)]
    pub height: u32,

    /// Vertical field of view, in degrees.
    #[arg(long, default_value_t = 60.0)]
    pub fov: f32,

    /// Ambient term in [0,1].
    #[arg(long, default_value_t = 0.15)]
    pub ambient: f32,

    /// World-space light direction as "x,y,z".
    #[arg(long)]
    pub light: Option<String>,

    /// Explicit camera position as "x,y,z".
    #[arg(long)]
    pub cam: Option<String>,

    /// Explicit look-at target as "x,y,z".
    #[arg(long)]
    pub look: Option<String>,

    #[arg(long = "no-cull")]
    pub no_cull: bool,

    #[arg(long = "no-gamma")]
    pub no_gamma: bool,

    /// Overlay a ground-plane grid sized from the scene's bounding box.
    #[arg(long)]
    pub grid: bool,

    /// Background color as "r,g,b" in linear [0,1]; transparent if omitted.
    #[arg(long)]
    pub background: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn parse_vec3(s: &str) -> Option<Vec3> {
    let parts: Vec<f32> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
    match parts.as_slice() {
        &[x, y, z] => Some(Vec3::new(x, y, z)),
        _ => None,
    }
}

impl Cli {
    pub fn render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            width: self.width,
            height: self.height,
            fov_deg: self.fov,
            cam_pos: self.cam.as_deref().and_then(parse_vec3),
            look_at: self.look.as_deref().and_then(parse_vec3),
            light_dir: self.light.as_deref().and_then(parse_vec3).unwrap_or(defaults.light_dir),
            ambient: self.ambient,
            cull: !self.no_cull,
            gamma: !self.no_gamma,
            background: self.background.as_deref().and_then(parse_vec3).map(|v| [v.x, v.y, v.z]),
            grid: self.grid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_render_options_defaults() {
        let cli = Cli::parse_from(["rustergl", "model.gltf"]);
        let opts = cli.render_options();
        let defaults = RenderOptions::default();
        assert_eq!(opts.width, defaults.width);
        assert_eq!(opts.height, defaults.height);
        assert_eq!(opts.fov_deg, defaults.fov_deg);
        assert!(opts.cull);
        assert!(opts.gamma);
        assert!(opts.background.is_none());
    }

    #[test]
    fn no_cull_and_no_gamma_flags_invert_defaults() {
        let cli = Cli::parse_from(["rustergl", "model.gltf", "--no-cull", "--no-gamma"]);
        let opts = cli.render_options();
        assert!(!opts.cull);
        assert!(!opts.gamma);
    }

    #[test]
    fn parses_cam_and_background_vectors() {
        let cli = Cli::parse_from(["rustergl", "model.gltf", "--cam", "8,6,8", "--background", "0,1,0"]);
        let opts = cli.render_options();
        assert_eq!(opts.cam_pos, Some(Vec3::new(8.0, 6.0, 8.0)));
        assert_eq!(opts.background, Some([0.0, 1.0, 0.0]));
    }
}
