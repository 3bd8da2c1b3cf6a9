//! Serde model of the glTF 2.0 JSON document.
//!
//! Modeled as explicit structs with typed optionals rather than an untyped
//! map: unknown fields (including every `extensions`/`extras` block) are
//! tolerated and discarded, not carried through.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GltfDocument {
    #[serde(default)]
    pub scene: usize,
    #[serde(default)]
    pub scenes: Vec<SceneDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
    #[serde(default)]
    pub meshes: Vec<MeshDef>,
    #[serde(default)]
    pub accessors: Vec<AccessorDef>,
    #[serde(default)]
    pub buffer_views: Vec<BufferViewDef>,
    #[serde(default)]
    pub buffers: Vec<BufferDef>,
    #[serde(default)]
    pub materials: Vec<MaterialDef>,
    #[serde(default)]
    pub textures: Vec<TextureDef>,
    #[serde(default)]
    pub images: Vec<ImageDef>,
}

#[derive(Debug, Deserialize)]
pub struct SceneDef {
    #[serde(default)]
    pub nodes: Vec<usize>,
}

#[derive(Debug, Deserialize)]
pub struct NodeDef {
    #[serde(default)]
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    pub matrix: Option<[f32; 16]>,
    pub translation: Option<[f32; 3]>,
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
}

#[derive(Debug, Deserialize)]
pub struct MeshDef {
    pub primitives: Vec<PrimitiveDef>,
}

fn default_primitive_mode() -> u32 {
    4
}

#[derive(Debug, Deserialize)]
pub struct PrimitiveDef {
    pub attributes: HashMap<String, usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    #[serde(default = "default_primitive_mode")]
    pub mode: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorDef {
    pub buffer_view: Option<usize>,
    #[serde(default)]
    pub byte_offset: usize,
    pub component_type: u32,
    pub count: usize,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default)]
    pub sparse: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferViewDef {
    pub buffer: usize,
    #[serde(default)]
    pub byte_offset: usize,
    pub byte_length: usize,
    pub byte_stride: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BufferDef {
    pub uri: Option<String>,
    #[serde(default, rename = "byteLength")]
    pub byte_length: usize,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDef {
    pub pbr_metallic_roughness: Option<PbrDef>,
    pub alpha_mode: Option<String>,
    pub alpha_cutoff: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbrDef {
    pub base_color_factor: Option<[f32; 4]>,
    pub base_color_texture: Option<TextureRef>,
}

#[derive(Debug, Deserialize)]
pub struct TextureRef {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct TextureDef {
    pub source: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDef {
    pub uri: Option<String>,
    pub buffer_view: Option<usize>,
    pub mime_type: Option<String>,
}
