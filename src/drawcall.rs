//! Draw call: one primitive batch submitted to the rasterizer.

use crate::error::{RenderError, Result};
use crate::material::Material;
use crate::math::Mat4;

/// Primitive topology a draw call is rasterized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    /// glTF primitive mode 4.
    Triangles,
    /// glTF primitive mode 1.
    Lines,
}

#[derive(Debug, Clone)]
pub struct DrawCall {
    /// Object-space XYZ positions, `3*N` floats.
    pub positions: Vec<f32>,
    /// World-space-after-transform normals, `3*N` floats, or absent to be synthesized.
    pub normals: Option<Vec<f32>>,
    /// Texture coordinates, `2*N` floats, or absent.
    pub uvs: Option<Vec<f32>>,
    /// Per-vertex tint, `3*N` or `4*N` floats, or absent (implies opaque white).
    pub colors: Option<Vec<f32>>,
    /// Vertex indices, or absent for the implicit `0..N` sequence.
    pub indices: Option<Vec<u32>>,
    pub model: Mat4,
    pub material: Material,
    pub mode: DrawMode,
}

impl DrawCall {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// The index list this draw call actually rasterizes with: `indices` if
    /// present, otherwise the implicit `0..N` sequence.
    pub fn effective_indices(&self) -> Vec<u32> {
        match &self.indices {
            Some(idx) => idx.clone(),
            None => (0..self.vertex_count() as u32).collect(),
        }
    }

    /// Validates the invariants from the data model: position count divides
    /// evenly into vertices, index count matches the primitive's arity, and
    /// every index is in bounds.
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(RenderError::InvalidGeometry(format!(
                "position buffer length {} is not a multiple of 3",
                self.positions.len()
            )));
        }

        let n = self.vertex_count();
        let arity = match self.mode {
            DrawMode::Triangles => 3,
            DrawMode::Lines => 2,
        };

        if let Some(indices) = &self.indices {
            if indices.len() % arity != 0 {
                return Err(RenderError::InvalidGeometry(format!(
                    "index count {} is not a multiple of {arity}",
                    indices.len()
                )));
            }
            if let Some(&bad) = indices.iter().find(|&&i| i as usize >= n) {
                return Err(RenderError::InvalidGeometry(format!(
                    "index {bad} out of range for {n} vertices"
                )));
            }
        } else if n % arity != 0 {
            return Err(RenderError::InvalidGeometry(format!(
                "implicit vertex count {n} is not a multiple of {arity}"
            )));
        }

        match self.mode {
            DrawMode::Triangles if n < 3 => Err(RenderError::InvalidGeometry(
                "triangle draw call needs at least 3 vertices".into(),
            )),
            DrawMode::Lines if n < 2 => Err(RenderError::InvalidGeometry(
                "line draw call needs at least 2 vertices".into(),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn triangle(positions: Vec<f32>, indices: Option<Vec<u32>>) -> DrawCall {
        DrawCall {
            positions,
            normals: None,
            uvs: None,
            colors: None,
            indices,
            model: Mat4::identity(),
            material: Material::default(),
            mode: DrawMode::Triangles,
        }
    }

    #[test]
    fn rejects_index_count_not_multiple_of_three() {
        let dc = triangle(vec![0.0; 9], Some(vec![0, 1, 2, 0]));
        assert!(dc.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_index() {
        let dc = triangle(vec![0.0; 9], Some(vec![0, 1, 5]));
        assert!(dc.validate().is_err());
    }

    #[test]
    fn accepts_implicit_index_sequence() {
        let dc = triangle(vec![0.0; 9], None);
        assert!(dc.validate().is_ok());
        assert_eq!(dc.effective_indices(), vec![0, 1, 2]);
    }
}
