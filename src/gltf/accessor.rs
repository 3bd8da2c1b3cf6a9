//! Reads accessor data out of buffer views into owned `f32`/`u32` arrays.
//!
//! A single byte-wise, little-endian reader handles every supported
//! component type and honors `byteStride` for interleaved buffer views; there
//! is no separate fast path for tightly packed data.

use crate::error::{RenderError, Result};

use super::document::GltfDocument;

fn num_components(ty: &str) -> Result<usize> {
    match ty {
        "SCALAR" => Ok(1),
        "VEC2" => Ok(2),
        "VEC3" => Ok(3),
        "VEC4" => Ok(4),
        "MAT2" => Ok(4),
        "MAT3" => Ok(9),
        "MAT4" => Ok(16),
        other => Err(RenderError::Unsupported(format!("accessor type {other}"))),
    }
}

fn component_size(component_type: u32) -> Result<usize> {
    match component_type {
        5120 | 5121 => Ok(1),
        5122 | 5123 => Ok(2),
        5125 | 5126 => Ok(4),
        other => Err(RenderError::Unsupported(format!("accessor component type {other}"))),
    }
}

fn read_raw_component(buf: &[u8], offset: usize, component_type: u32) -> Result<f32> {
    let size = component_size(component_type)?;
    let bytes = buf
        .get(offset..offset + size)
        .ok_or_else(|| RenderError::InvalidGeometry("accessor read out of buffer bounds".into()))?;
    Ok(match component_type {
        5120 => bytes[0] as i8 as f32,
        5121 => bytes[0] as f32,
        5122 => i16::from_le_bytes([bytes[0], bytes[1]]) as f32,
        5123 => u16::from_le_bytes([bytes[0], bytes[1]]) as f32,
        5125 => u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f32,
        5126 => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        other => return Err(RenderError::Unsupported(format!("accessor component type {other}"))),
    })
}

/// Scales an integer component into `[-1,1]` (signed) or `[0,1]` (unsigned),
/// per the glTF `normalized` accessor flag.
fn normalize_component(raw: f32, component_type: u32) -> f32 {
    match component_type {
        5120 => (raw / 127.0).max(-1.0),
        5121 => raw / 255.0,
        5122 => (raw / 32767.0).max(-1.0),
        5123 => raw / 65535.0,
        _ => raw,
    }
}

/// Reads accessor `accessor_index` as a flat `f32` array of `count *
/// num_components` values, applying `normalized` scaling when set.
pub fn read_accessor_f32(doc: &GltfDocument, buffers: &[Vec<u8>], accessor_index: usize) -> Result<Vec<f32>> {
    let accessor = doc
        .accessors
        .get(accessor_index)
        .ok_or_else(|| RenderError::InvalidGeometry("accessor index out of range".into()))?;

    if accessor.sparse.is_some() {
        return Err(RenderError::Unsupported("sparse accessors".into()));
    }

    let num_comp = num_components(&accessor.ty)?;
    let comp_size = component_size(accessor.component_type)?;

    let Some(bv_index) = accessor.buffer_view else {
        return Ok(vec![0.0; accessor.count * num_comp]);
    };
    let bv = doc
        .buffer_views
        .get(bv_index)
        .ok_or_else(|| RenderError::InvalidGeometry("bufferView index out of range".into()))?;
    let buffer = buffers
        .get(bv.buffer)
        .ok_or_else(|| RenderError::InvalidGeometry("buffer index out of range".into()))?;

    let stride = bv.byte_stride.unwrap_or(num_comp * comp_size);
    let base = bv.byte_offset + accessor.byte_offset;

    let mut out = Vec::with_capacity(accessor.count * num_comp);
    for i in 0..accessor.count {
        let elem_offset = base + i * stride;
        for c in 0..num_comp {
            let raw = read_raw_component(buffer, elem_offset + c * comp_size, accessor.component_type)?;
            out.push(if accessor.normalized {
                normalize_component(raw, accessor.component_type)
            } else {
                raw
            });
        }
    }
    Ok(out)
}

/// Reads an index accessor (`SCALAR`, `UBYTE`/`USHORT`/`UINT` only) as `u32`s.
pub fn read_indices(doc: &GltfDocument, buffers: &[Vec<u8>], accessor_index: usize) -> Result<Vec<u32>> {
    let accessor = doc
        .accessors
        .get(accessor_index)
        .ok_or_else(|| RenderError::InvalidGeometry("accessor index out of range".into()))?;

    if accessor.ty != "SCALAR" {
        return Err(RenderError::Unsupported(format!("index accessor type {}", accessor.ty)));
    }
    match accessor.component_type {
        5121 | 5123 | 5125 => {}
        other => return Err(RenderError::Unsupported(format!("index component type {other}"))),
    }

    let floats = read_accessor_f32(doc, buffers, accessor_index)?;
    Ok(floats.into_iter().map(|f| f.round() as u32).collect())
}
