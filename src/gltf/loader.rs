//! Top-level glTF/GLB loading: container parsing, buffer/image resolution,
//! and scene traversal into render-ready `DrawCall`s.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use base64::Engine as _;
use log::warn;

use crate::bitmap::Bitmap;
use crate::drawcall::{DrawCall, DrawMode};
use crate::error::{RenderError, Result};
use crate::material::{AlphaMode, Material};
use crate::math::{Mat4, Quat, Vec3};

use super::accessor::{read_accessor_f32, read_indices};
use super::document::{GltfDocument, NodeDef, PrimitiveDef};

/// Decoded side-car data a `GltfDocument` refers to by index.
pub struct GltfResources {
    pub buffers: Vec<Vec<u8>>,
    pub images: Vec<Bitmap>,
}

pub struct GltfAsset {
    pub document: GltfDocument,
    pub resources: GltfResources,
}

const GLB_MAGIC: u32 = 0x4654_6C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F_534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E_4942; // "BIN\0"

/// Loads a `.gltf` or `.glb` file from disk and returns the scene's draw
/// calls, traversed with an identity root transform.
pub fn load(path: &Path) -> Result<Vec<DrawCall>> {
    let bytes = fs::read(path)?;
    let (document, glb_bin) = parse_container(&bytes)?;
    let resources = load_resources(&document, path, glb_bin)?;
    let asset = GltfAsset { document, resources };
    traverse(&asset)
}

fn parse_container(bytes: &[u8]) -> Result<(GltfDocument, Option<Vec<u8>>)> {
    if bytes.len() >= 4 && u32::from_le_bytes(bytes[0..4].try_into().unwrap()) == GLB_MAGIC {
        parse_glb(bytes)
    } else {
        Ok((serde_json::from_slice(bytes)?, None))
    }
}

fn parse_glb(bytes: &[u8]) -> Result<(GltfDocument, Option<Vec<u8>>)> {
    let mut cursor = 12usize; // 4-byte magic, 4-byte version, 4-byte total length
    let mut json_chunk: Option<&[u8]> = None;
    let mut bin_chunk: Option<Vec<u8>> = None;

    while cursor + 8 <= bytes.len() {
        let chunk_len = u32::from_le_bytes(bytes[cursor..cursor + 4].try_into().unwrap()) as usize;
        let chunk_type = u32::from_le_bytes(bytes[cursor + 4..cursor + 8].try_into().unwrap());
        let data_start = cursor + 8;
        let data_end = data_start + chunk_len;
        let data = bytes
            .get(data_start..data_end)
            .ok_or_else(|| RenderError::InvalidGeometry("truncated GLB chunk".into()))?;

        match chunk_type {
            CHUNK_JSON => json_chunk = Some(data),
            CHUNK_BIN => bin_chunk = Some(data.to_vec()),
            _ => {}
        }
        cursor = data_end;
    }

    let json = json_chunk.ok_or_else(|| RenderError::InvalidGeometry("GLB missing JSON chunk".into()))?;
    Ok((serde_json::from_slice(json)?, bin_chunk))
}

fn load_resources(document: &GltfDocument, path: &Path, glb_bin: Option<Vec<u8>>) -> Result<GltfResources> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut buffers = Vec::with_capacity(document.buffers.len());
    for (i, buf) in document.buffers.iter().enumerate() {
        let data = match &buf.uri {
            Some(uri) => decode_uri(uri, dir)?,
            None if i == 0 => glb_bin
                .clone()
                .ok_or_else(|| RenderError::InvalidGeometry("buffer has no uri and no GLB binary chunk".into()))?,
            None => return Err(RenderError::InvalidGeometry("buffer has no uri".into())),
        };
        buffers.push(data);
    }

    let mut images = Vec::with_capacity(document.images.len());
    for img in &document.images {
        let bytes = if let Some(uri) = &img.uri {
            decode_uri(uri, dir)?
        } else if let Some(bv_index) = img.buffer_view {
            let bv = document
                .buffer_views
                .get(bv_index)
                .ok_or_else(|| RenderError::InvalidGeometry("image bufferView index out of range".into()))?;
            buffers[bv.buffer][bv.byte_offset..bv.byte_offset + bv.byte_length].to_vec()
        } else {
            return Err(RenderError::Unsupported("image has neither uri nor bufferView".into()));
        };
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        images.push(Bitmap::from_raw(decoded.width(), decoded.height(), decoded.into_raw()));
    }

    Ok(GltfResources { buffers, images })
}

fn decode_uri(uri: &str, dir: &Path) -> Result<Vec<u8>> {
    match uri.strip_prefix("data:").and_then(|rest| rest.split_once(";base64,")) {
        Some((_, b64)) => Ok(base64::engine::general_purpose::STANDARD.decode(b64)?),
        None => Ok(fs::read(dir.join(uri))?),
    }
}

fn traverse(asset: &GltfAsset) -> Result<Vec<DrawCall>> {
    let doc = &asset.document;
    let scene = doc
        .scenes
        .get(doc.scene)
        .ok_or_else(|| RenderError::InvalidGeometry("scene index out of range".into()))?;

    let mut draw_calls = Vec::new();
    for &root in &scene.nodes {
        visit_node(asset, root, Mat4::identity(), &mut draw_calls)?;
    }
    Ok(draw_calls)
}

fn visit_node(asset: &GltfAsset, node_index: usize, parent: Mat4, out: &mut Vec<DrawCall>) -> Result<()> {
    let doc = &asset.document;
    let node = doc
        .nodes
        .get(node_index)
        .ok_or_else(|| RenderError::InvalidGeometry("node index out of range".into()))?;

    let world = parent * node_local_matrix(node);

    if let Some(mesh_index) = node.mesh {
        let mesh = doc
            .meshes
            .get(mesh_index)
            .ok_or_else(|| RenderError::InvalidGeometry("mesh index out of range".into()))?;
        for prim in &mesh.primitives {
            match prim.mode {
                4 => out.push(build_draw_call(asset, prim, world, DrawMode::Triangles)?),
                1 => out.push(build_draw_call(asset, prim, world, DrawMode::Lines)?),
                other => warn!("skipping primitive with unsupported mode {other}"),
            }
        }
    }

    for &child in &node.children {
        visit_node(asset, child, world, out)?;
    }
    Ok(())
}

fn node_local_matrix(node: &NodeDef) -> Mat4 {
    if let Some(m) = node.matrix {
        return Mat4::from_column_major(m);
    }
    let t = node.translation.map(|[x, y, z]| Vec3::new(x, y, z)).unwrap_or(Vec3::ZERO);
    let r = node.rotation.map(|[x, y, z, w]| Quat { x, y, z, w }).unwrap_or(Quat::IDENTITY);
    let s = node.scale.map(|[x, y, z]| Vec3::new(x, y, z)).unwrap_or(Vec3::ONE);
    Mat4::from_rotation_translation_scale(t, r, s)
}

fn build_draw_call(asset: &GltfAsset, prim: &PrimitiveDef, model: Mat4, mode: DrawMode) -> Result<DrawCall> {
    let doc = &asset.document;
    let buffers = &asset.resources.buffers;

    let pos_idx = *prim
        .attributes
        .get("POSITION")
        .ok_or_else(|| RenderError::InvalidGeometry("primitive missing POSITION attribute".into()))?;
    let positions = read_accessor_f32(doc, buffers, pos_idx)?;

    let normals = prim
        .attributes
        .get("NORMAL")
        .map(|&i| read_accessor_f32(doc, buffers, i))
        .transpose()?;
    let uvs = prim
        .attributes
        .get("TEXCOORD_0")
        .map(|&i| read_accessor_f32(doc, buffers, i))
        .transpose()?;
    let colors = prim
        .attributes
        .get("COLOR_0")
        .map(|&i| read_accessor_f32(doc, buffers, i))
        .transpose()?;
    let indices = prim.indices.map(|i| read_indices(doc, buffers, i)).transpose()?;

    let material = prim
        .material
        .map(|i| build_material(asset, i))
        .transpose()?
        .unwrap_or_default();

    let dc = DrawCall {
        positions,
        normals,
        uvs,
        colors,
        indices,
        model,
        material,
        mode,
    };
    dc.validate()?;
    Ok(dc)
}

fn build_material(asset: &GltfAsset, index: usize) -> Result<Material> {
    let def = asset
        .document
        .materials
        .get(index)
        .ok_or_else(|| RenderError::InvalidGeometry("material index out of range".into()))?;

    let mut material = Material::default();
    if let Some(pbr) = &def.pbr_metallic_roughness {
        if let Some(factor) = pbr.base_color_factor {
            material.base_color_factor = factor;
        }
        if let Some(tex_ref) = &pbr.base_color_texture {
            let texture = asset
                .document
                .textures
                .get(tex_ref.index)
                .ok_or_else(|| RenderError::InvalidGeometry("texture index out of range".into()))?;
            if let Some(source) = texture.source {
                let bitmap = asset
                    .resources
                    .images
                    .get(source)
                    .ok_or_else(|| RenderError::InvalidGeometry("image index out of range".into()))?;
                material.base_color_texture = Some(Arc::new(bitmap.clone()));
            }
        }
    }

    material.alpha_mode = match def.alpha_mode.as_deref() {
        Some("MASK") => AlphaMode::Mask,
        Some("BLEND") => AlphaMode::Blend,
        Some("OPAQUE") | None => AlphaMode::Opaque,
        Some(other) => return Err(RenderError::Unsupported(format!("alpha mode {other}"))),
    };
    if let Some(cutoff) = def.alpha_cutoff {
        material.alpha_cutoff = cutoff;
    }
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_triangle_gltf() -> serde_json::Value {
        serde_json::json!({
            "scene": 0,
            "scenes": [{"nodes": [0]}],
            "nodes": [{"mesh": 0}],
            "meshes": [{"primitives": [{"attributes": {"POSITION": 0}, "mode": 4}]}],
            "accessors": [{
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3"
            }],
            "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
            "buffers": [{"byteLength": 36, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"}]
        })
    }

    #[test]
    fn parses_inline_data_uri_triangle() {
        let json = minimal_triangle_gltf().to_string();
        let (document, glb_bin) = parse_container(json.as_bytes()).unwrap();
        let resources = load_resources(&document, Path::new("model.gltf"), glb_bin).unwrap();
        let asset = GltfAsset { document, resources };
        let draw_calls = traverse(&asset).unwrap();
        assert_eq!(draw_calls.len(), 1);
        assert_eq!(draw_calls[0].vertex_count(), 3);
    }

    #[test]
    fn unsupported_primitive_mode_is_skipped_not_fatal() {
        let mut json = minimal_triangle_gltf();
        json["meshes"][0]["primitives"][0]["mode"] = serde_json::json!(5); // TRIANGLE_STRIP
        let bytes = json.to_string();
        let (document, glb_bin) = parse_container(bytes.as_bytes()).unwrap();
        let resources = load_resources(&document, Path::new("model.gltf"), glb_bin).unwrap();
        let asset = GltfAsset { document, resources };
        let draw_calls = traverse(&asset).unwrap();
        assert!(draw_calls.is_empty());
    }

    #[test]
    fn node_matrix_overrides_trs() {
        let node = NodeDef {
            children: vec![],
            mesh: None,
            matrix: Some({
                let mut m = [0.0f32; 16];
                m[0] = 1.0;
                m[5] = 1.0;
                m[10] = 1.0;
                m[12] = 5.0;
                m[15] = 1.0;
                m
            }),
            translation: Some([99.0, 99.0, 99.0]),
            rotation: None,
            scale: None,
        };
        let m = node_local_matrix(&node);
        let p = m * Vec3::ZERO;
        assert_eq!(p, Vec3::new(5.0, 0.0, 0.0));
    }
}
