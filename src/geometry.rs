//! Geometry preprocessing: smooth-normal synthesis and world-space AABBs.

use crate::math::{Mat4, Vec3};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }
}

/// Computes the smooth per-vertex normals for an indexed triangle mesh.
///
/// Each triangle's unnormalized face normal `cross(p1-p0, p2-p0)` is summed
/// into all three of its vertices, then every per-vertex accumulator is
/// normalized. Degenerate triangles contribute a zero vector and are
/// effectively skipped; a vertex touched by no non-degenerate triangle keeps
/// a zero accumulator, which is treated as already unit-length rather than
/// normalized (dividing by zero would produce `NaN`).
pub fn compute_smooth_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accum = vec![Vec3::ZERO; vertex_count];

    let vertex = |i: u32| -> Vec3 {
        let base = i as usize * 3;
        Vec3::new(positions[base], positions[base + 1], positions[base + 2])
    };

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        let (p0, p1, p2) = (vertex(i0), vertex(i1), vertex(i2));
        let face_normal = (p1 - p0).cross(p2 - p0);

        accum[i0 as usize] = accum[i0 as usize] + face_normal;
        accum[i1 as usize] = accum[i1 as usize] + face_normal;
        accum[i2 as usize] = accum[i2 as usize] + face_normal;
    }

    let mut out = Vec::with_capacity(vertex_count * 3);
    for n in accum {
        let unit = if n.magnitude() < f32::EPSILON { Vec3::UP } else { n.normalize() };
        out.push(unit.x);
        out.push(unit.y);
        out.push(unit.z);
    }
    out
}

/// A minimal view over a draw call's geometry, sufficient to fold it into a
/// world-space AABB without depending on the full `DrawCall` type (keeps this
/// module usable from both the rasterizer and the loader/grid helper).
pub struct AabbInput<'a> {
    pub positions: &'a [f32],
    pub model: Mat4,
}

/// Transforms every position of every input by its model matrix and reduces
/// to an axis-aligned min/max. An empty input set yields the unit cube
/// `(-1,-1,-1)..(1,1,1)` so camera auto-framing still has something to frame.
pub fn compute_world_aabb<'a>(inputs: impl IntoIterator<Item = AabbInput<'a>>) -> Aabb {
    let mut aabb: Option<Aabb> = None;

    for input in inputs {
        for chunk in input.positions.chunks_exact(3) {
            let local = Vec3::new(chunk[0], chunk[1], chunk[2]);
            let world = input.model * local;
            match &mut aabb {
                Some(existing) => existing.grow(world),
                None => aabb = Some(Aabb { min: world, max: world }),
            }
        }
    }

    aabb.unwrap_or(Aabb {
        min: Vec3::new(-1.0, -1.0, -1.0),
        max: Vec3::new(1.0, 1.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_normals_are_unit_length() {
        // A simple quad made of two triangles sharing an edge.
        let positions = [
            0.0, 0.0, 0.0, // 0
            1.0, 0.0, 0.0, // 1
            1.0, 1.0, 0.0, // 2
            0.0, 1.0, 0.0, // 3
        ];
        let indices = [0, 1, 2, 0, 2, 3];
        let normals = compute_smooth_normals(&positions, &indices);
        for chunk in normals.chunks_exact(3) {
            let n = Vec3::new(chunk[0], chunk[1], chunk[2]);
            assert!((n.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_triangle_does_not_produce_nan() {
        let positions = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let indices = [0, 1, 2];
        let normals = compute_smooth_normals(&positions, &indices);
        assert!(normals.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_draw_calls_yield_unit_cube_aabb() {
        let aabb = compute_world_aabb(std::iter::empty());
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn aabb_contains_every_transformed_position() {
        let positions = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        let model = Mat4::translation(Vec3::new(10.0, 0.0, 0.0));
        let aabb = compute_world_aabb([AabbInput { positions: &positions, model }]);
        assert_eq!(aabb.min, Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(11.0, 2.0, 3.0));
    }
}
