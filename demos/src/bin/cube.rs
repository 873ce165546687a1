//! Renders a textured cube lit by a directional and a point light.
//!
//! Usage: `cube [TEXTURE.bmp]`. Uses a checkerboard texture if no BMP
//! file is given.

use std::{env, error::Error};

use log::info;

use re::impl_vary;
use re::math::Real;
use re::prelude::*;
use re::render::tex::Layout;
use re::render::{
    Camera, Context, Fov, Light, Model, ModelToProj, ModelToWorld,
    SamplerBilinear, Target, TexCoord, Texture, World, clip::ClipVec,
};

use re_geom::{io::load_bmp, solids::cube};
use trifle_demos::{init, save};

#[derive(Copy, Clone, Debug)]
struct Varying {
    uv: TexCoord,
    light: Color3f,
}
impl_vary!(Varying { uv, light });

fn checkerboard() -> Texture<Color4f> {
    let buf = Buf2::new_with(8, 8, |x, y| {
        if (x ^ y) & 1 == 0 {
            rgba(0.9, 0.45, 0.1, 1.0)
        } else {
            rgba(0.15, 0.15, 0.2, 1.0)
        }
    });
    Texture::new(&buf, Layout::Morton)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cfg = init()?;

    let tex = match env::args().nth(1) {
        Some(path) => load_bmp(path)?,
        None => checkerboard(),
    };
    info!("texture {}x{}", tex.width(), tex.height());

    let mesh = cube();

    let lights: [Light<World>; 2] = [
        Light::directional(vec3(-1.0, 2.0, 3.0), rgb(1.0, 0.95, 0.8)),
        Light::point(pt3(3.0, -2.0, 2.0), rgb(0.2, 0.3, 0.6)),
    ];
    let ambient: Color3f = gray(0.08);

    let to_world: Mat4x4<ModelToWorld> = rotate_y(degs(35.0))
        .then(&rotate_x(degs(25.0)))
        .to();

    let shader = Shader::new(
        |v: Vertex3<(TexCoord, Normal3)>,
         (mvp, _): (Mat4x4<ModelToProj>, ())|
         -> Vertex<ClipVec, Varying> {
            let (uv, n) = v.attrib;
            let pos = to_world.apply(&v.pos);
            let n = to_world.apply(&n.to::<Real<3, Model>>());
            let light = lights
                .iter()
                .fold(ambient, |acc, l| acc.plus(&l.diffuse(pos, n)));
            vertex(mvp.apply(&v.pos), Varying { uv, light })
        },
        |frag: Frag<Varying>| {
            let texel = SamplerBilinear.sample(&tex, frag.var.uv);
            let lit = texel.to_rgb().mul_comp(&frag.var.light);
            lit.to_rgba(texel.a())
        },
    );

    let cam = Camera::new((cfg.width, cfg.height))
        .perspective(Fov::Vertical(degs(45.0)), 0.1..100.0)
        .at(pt3(0.0, 0.0, 6.0));

    let ctx = Context {
        color_clear: Some(rgba(0.02, 0.02, 0.05, 1.0)),
        ..cfg.context()
    };
    let mut frame = cfg.frame();
    frame.clear(&ctx);

    cam.render(
        &mesh.faces,
        &mesh.verts,
        &to_world,
        &shader,
        (),
        &mut frame,
        &ctx,
    );

    save(&frame, cfg.output_or("cube.ppm"), &ctx)
}
