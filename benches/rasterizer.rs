use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use rustergl::drawcall::{DrawCall, DrawMode};
use rustergl::material::Material;
use rustergl::math::{Mat4, Vec3};
use rustergl::raster::{rasterize, Framebuffer, ShadeParams};

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

fn triangle_draw_call(half_extent: f32) -> DrawCall {
    DrawCall {
        positions: vec![
            -half_extent,
            -half_extent,
            -2.0,
            half_extent,
            -half_extent,
            -2.0,
            0.0,
            half_extent,
            -2.0,
        ],
        normals: Some(vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
        uvs: None,
        colors: None,
        indices: None,
        model: Mat4::identity(),
        material: Material::default(),
        mode: DrawMode::Triangles,
    }
}

fn grid_of_triangles(n: usize) -> Vec<DrawCall> {
    (0..n)
        .map(|i| {
            let offset = i as f32 * 0.01;
            let mut dc = triangle_draw_call(0.2);
            dc.model = Mat4::translation(Vec3::new(offset, 0.0, 0.0));
            dc
        })
        .collect()
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let view = Mat4::identity();
    let proj = Mat4::perspective(60f32.to_radians(), BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32, 0.01, 1000.0);
    let params = ShadeParams {
        light_dir: Vec3::new(-0.4, -0.9, -0.2).normalize(),
        ambient: 0.15,
        cull: true,
        gamma: true,
    };

    for (name, half_extent) in [("small", 0.05f32), ("medium", 0.3), ("large", 0.9)] {
        let dc = triangle_draw_call(half_extent);
        group.bench_with_input(BenchmarkId::new("edge_function", name), &dc, |b, dc| {
            b.iter(|| {
                let mut fb = Framebuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
                rasterize(&mut fb, black_box(dc), view, proj, &params);
            });
        });
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");
    let view = Mat4::identity();
    let proj = Mat4::perspective(60f32.to_radians(), BUFFER_WIDTH as f32 / BUFFER_HEIGHT as f32, 0.01, 1000.0);
    let params = ShadeParams {
        light_dir: Vec3::new(-0.4, -0.9, -0.2).normalize(),
        ambient: 0.15,
        cull: true,
        gamma: true,
    };
    let draw_calls = grid_of_triangles(400);

    group.bench_function("edge_function_400_triangles", |b| {
        b.iter(|| {
            let mut fb = Framebuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT);
            for dc in &draw_calls {
                rasterize(&mut fb, black_box(dc), view, proj, &params);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_many_triangles);
criterion_main!(benches);
