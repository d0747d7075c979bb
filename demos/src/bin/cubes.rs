//! Nine spinning textured cubes, rendered entirely in software.

use std::ops::ControlFlow::Continue;

use minifb::Key;

use sp::prelude::*;
use sp::render::stats::Profiler;
use sp_front::minifb::Window;

const W: i32 = 640;
const H: i32 = 480;

/// Grid positions of the cubes in view space.
const GRID: [(f32, f32); 9] = [
    (0.0, 0.0),
    (-5.0, 0.0),
    (5.0, 0.0),
    (0.0, 3.5),
    (-5.0, 3.5),
    (5.0, 3.5),
    (0.0, -3.5),
    (-5.0, -3.5),
    (5.0, -3.5),
];

fn main() {
    let mut win = Window::builder()
        .dims((W, H))
        .title("softpipe cubes")
        .build()
        .expect("could not create window");

    let mut color = RenderTarget::new(W, H, PixelFormat::ColorArgb8);
    let mut depth = RenderTarget::new(W, H, PixelFormat::Depth32F);

    let mut prof = Profiler::new();
    let mut time = 0.5_f32;
    let mut camera_x = 0.0_f32;

    win.run(|frame| {
        time += 0.005;
        if frame.win.key_pressed(Key::A) {
            camera_x -= 1.0;
        }
        if frame.win.key_pressed(Key::D) {
            camera_x += 1.0;
        }

        let mut ctx = DrawContext::new();
        ctx.set_render_target(&mut color);
        ctx.set_depth_target(&mut depth);
        ctx.set_vertex_buffer(&CUBE_VERTS);
        ctx.set_index_buffer(&CUBE_INDICES);

        ctx.clear(0x00FFFF00, 1.0).unwrap();

        {
            let _s = prof.scope("vertex");

            let proj = perspective(
                45.0_f32.to_radians(),
                W as f32 / H as f32,
                0.01,
                1000.0,
            )
            .compose(&translate(vec3(-camera_x, 0.0, 0.0)));
            ctx.set_matrix(MatrixSlot::Projection, &proj);

            let rot = rotate_z(time)
                .compose(&rotate_y(time))
                .compose(&rotate_x(time));

            for &(x, y) in &GRID {
                let mv = translate(vec3(x, y, -10.0)).compose(&rot);
                ctx.set_matrix(MatrixSlot::Modelview, &mv);
                ctx.draw_indexed(0, CUBE_INDICES.len()).unwrap();
            }
        }
        {
            let _s = prof.scope("raster");
            ctx.present().unwrap();
        }
        drop(ctx);

        let ms = frame.dt.as_secs_f32() * 1000.0;
        draw_debug_text(&mut color, &format!("{ms:5.1} ms"), 4, 4);
        frame.win.present_target(&color);
        Continue(())
    });

    println!("{prof}");
}

/// A unit cube with four vertices per face, wound counterclockwise
/// seen from outside.
#[rustfmt::skip]
const CUBE_VERTS: [Vertex; 24] = [
    // +z
    vertex(vec3(-1.0, -1.0,  1.0), vec2(0.0, 0.0), vec3(0.0, 0.0, 1.0)),
    vertex(vec3( 1.0, -1.0,  1.0), vec2(1.0, 0.0), vec3(0.0, 0.0, 1.0)),
    vertex(vec3( 1.0,  1.0,  1.0), vec2(1.0, 1.0), vec3(0.0, 0.0, 1.0)),
    vertex(vec3(-1.0,  1.0,  1.0), vec2(0.0, 1.0), vec3(0.0, 0.0, 1.0)),
    // -z
    vertex(vec3( 1.0, -1.0, -1.0), vec2(0.0, 0.0), vec3(0.0, 0.0, -1.0)),
    vertex(vec3(-1.0, -1.0, -1.0), vec2(1.0, 0.0), vec3(0.0, 0.0, -1.0)),
    vertex(vec3(-1.0,  1.0, -1.0), vec2(1.0, 1.0), vec3(0.0, 0.0, -1.0)),
    vertex(vec3( 1.0,  1.0, -1.0), vec2(0.0, 1.0), vec3(0.0, 0.0, -1.0)),
    // +x
    vertex(vec3( 1.0, -1.0,  1.0), vec2(0.0, 0.0), vec3(1.0, 0.0, 0.0)),
    vertex(vec3( 1.0, -1.0, -1.0), vec2(1.0, 0.0), vec3(1.0, 0.0, 0.0)),
    vertex(vec3( 1.0,  1.0, -1.0), vec2(1.0, 1.0), vec3(1.0, 0.0, 0.0)),
    vertex(vec3( 1.0,  1.0,  1.0), vec2(0.0, 1.0), vec3(1.0, 0.0, 0.0)),
    // -x
    vertex(vec3(-1.0, -1.0, -1.0), vec2(0.0, 0.0), vec3(-1.0, 0.0, 0.0)),
    vertex(vec3(-1.0, -1.0,  1.0), vec2(1.0, 0.0), vec3(-1.0, 0.0, 0.0)),
    vertex(vec3(-1.0,  1.0,  1.0), vec2(1.0, 1.0), vec3(-1.0, 0.0, 0.0)),
    vertex(vec3(-1.0,  1.0, -1.0), vec2(0.0, 1.0), vec3(-1.0, 0.0, 0.0)),
    // +y
    vertex(vec3(-1.0,  1.0,  1.0), vec2(0.0, 0.0), vec3(0.0, 1.0, 0.0)),
    vertex(vec3( 1.0,  1.0,  1.0), vec2(1.0, 0.0), vec3(0.0, 1.0, 0.0)),
    vertex(vec3( 1.0,  1.0, -1.0), vec2(1.0, 1.0), vec3(0.0, 1.0, 0.0)),
    vertex(vec3(-1.0,  1.0, -1.0), vec2(0.0, 1.0), vec3(0.0, 1.0, 0.0)),
    // -y
    vertex(vec3(-1.0, -1.0, -1.0), vec2(0.0, 0.0), vec3(0.0, -1.0, 0.0)),
    vertex(vec3( 1.0, -1.0, -1.0), vec2(1.0, 0.0), vec3(0.0, -1.0, 0.0)),
    vertex(vec3( 1.0, -1.0,  1.0), vec2(1.0, 1.0), vec3(0.0, -1.0, 0.0)),
    vertex(vec3(-1.0, -1.0,  1.0), vec2(0.0, 1.0), vec3(0.0, -1.0, 0.0)),
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
     0,  1,  2,  0,  2,  3,
     4,  5,  6,  4,  6,  7,
     8,  9, 10,  8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];
