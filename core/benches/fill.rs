//! Fill-rate benchmarks: the tiled rasterizer against a naive
//! per-pixel sweep of the bounding box.

use divan::{black_box, Bencher};

use softpipe_core::math::vec2;
use softpipe_core::render::raster::{fill_tri, ScreenTri, ScreenVertex};

fn main() {
    divan::main();
}

fn right_tri(size: i32) -> ScreenTri {
    let sv = |x, y| ScreenVertex {
        x,
        y,
        z: 0.0,
        uv_over_w: vec2(0.0, 0.0),
        inv_w: 1.0,
    };
    ScreenTri { v0: sv(0, 0), v1: sv(0, size), v2: sv(size, 0) }
}

const SIZES: [i32; 4] = [16, 64, 256, 1024];

#[divan::bench(args = SIZES)]
fn tiled(bencher: Bencher, size: i32) {
    let tri = right_tri(size);
    bencher.bench_local(|| {
        let mut count = 0u32;
        fill_tri(black_box(&tri), (size, size), |_, _| count += 1);
        count
    });
}

#[divan::bench(args = SIZES)]
fn bounding_box_sweep(bencher: Bencher, size: i32) {
    let tri = right_tri(size);
    bencher.bench_local(|| {
        let tri = black_box(&tri);
        let (x1, y1) = (tri.v0.x << 4, tri.v0.y << 4);
        let (x2, y2) = (tri.v1.x << 4, tri.v1.y << 4);
        let (x3, y3) = (tri.v2.x << 4, tri.v2.y << 4);

        // (dx, dy, c) per edge, with E(x, y) = c + dx*y - dy*x
        let edge = |dx: i32, dy: i32, x: i32, y: i32| (dx, dy, dy * x - dx * y);
        let edges = [
            edge(x1 - x2, y1 - y2, x1, y1),
            edge(x2 - x3, y2 - y3, x2, y2),
            edge(x3 - x1, y3 - y1, x3, y3),
        ];

        let mut count = 0u32;
        for y in 0..size {
            for x in 0..size {
                let (xf, yf) = (x << 4, y << 4);
                let inside = edges
                    .iter()
                    .all(|&(dx, dy, c)| c + dx * yf - dy * xf > 0);
                if inside {
                    count += 1;
                }
            }
        }
        count
    });
}
