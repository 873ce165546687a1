//! Renders a single triangle with smoothly interpolated vertex colors.

use std::error::Error;

use re::prelude::*;
use re::render::{Camera, Fov, ModelToProj, Target, clip::ClipVec};

use trifle_demos::{init, save};

fn main() -> Result<(), Box<dyn Error>> {
    let cfg = init()?;

    let verts = [
        vertex(pt3(-1.0, -1.0, 0.0), rgba(1.0, 0.0, 0.0, 1.0)),
        vertex(pt3(1.0, -1.0, 0.0), rgba(0.0, 0.8, 0.0, 1.0)),
        vertex(pt3(0.0, 1.0, 0.0), rgba(0.4, 0.4, 1.0, 1.0)),
    ];

    let shader = Shader::new(
        |v: Vertex3<Color4f>,
         (mvp, _): (Mat4x4<ModelToProj>, ())|
         -> Vertex<ClipVec, Color4f> {
            vertex(mvp.apply(&v.pos), v.attrib)
        },
        |frag: Frag<Color4f>| frag.var,
    );

    let cam = Camera::new((cfg.width, cfg.height))
        .perspective(Fov::FocalRatio(1.0), 0.1..100.0)
        .at(pt3(0.0, 0.0, 2.5));

    let ctx = cfg.context();
    let mut frame = cfg.frame();
    frame.clear(&ctx);

    cam.render(
        &[Tri([0, 1, 2])],
        &verts,
        &Matrix::identity(),
        &shader,
        (),
        &mut frame,
        &ctx,
    );

    save(&frame, cfg.output_or("triangle.ppm"), &ctx)
}
