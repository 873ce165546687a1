//! Renders a mesh loaded from an OBJ file, optionally textured.
//!
//! Usage: `mesh MESH.obj [TEXTURE.bmp]`
//!
//! The mesh is scaled and centered to fit the view. Faces are lit by
//! their vertex normals; meshes without normals are rendered in flat
//! ambient light only.

use std::{env, error::Error};

use log::info;

use re::math::Real;
use re::prelude::*;
use re::render::{
    Camera, Context, Fov, Light, Model, ModelToProj, ModelToWorld,
    SamplerBilinear, Target, TexCoord, World, clip::ClipVec,
};

use re_geom::io::{load_bmp, load_obj};
use trifle_demos::{init, save};

/// Returns the smallest and largest coordinates of the vertices of `mesh`.
fn bounds<A>(mesh: &Mesh<A>) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    for v in &mesh.verts {
        for i in 0..3 {
            min[i] = min[i].min(v.pos.0[i]);
            max[i] = max[i].max(v.pos.0[i]);
        }
    }
    (min, max)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cfg = init()?;

    let mut args = env::args().skip(1);
    let obj = args.next().ok_or("usage: mesh MESH.obj [TEXTURE.bmp]")?;
    let mesh = load_obj(&obj)?;
    let tex = args.next().map(load_bmp).transpose()?;

    let (min, max) = bounds(&mesh);
    let center = vec3(
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    );
    let extent = (0..3).map(|i| max[i] - min[i]).fold(0.0, f32::max);
    let fit = if extent > 0.0 { 2.0 / extent } else { 1.0 };
    info!(
        "{obj}: {} faces, {} vertices, size {extent}",
        mesh.faces.len(),
        mesh.verts.len()
    );

    let to_world: Mat4x4<ModelToWorld> = translate(-center)
        .then(&scale(splat(fit)))
        .then(&rotate_y(degs(-30.0)))
        .then(&rotate_x(degs(15.0)))
        .to();

    let light = Light::<World>::directional(vec3(1.0, 1.0, 2.0), gray(0.9));
    let ambient: Color3f = gray(0.1);
    let base = rgba(0.8, 0.8, 0.8, 1.0);

    let shader = Shader::new(
        |v: Vertex3<(TexCoord, Normal3)>,
         (mvp, _): (Mat4x4<ModelToProj>, ())|
         -> Vertex<ClipVec, (TexCoord, Color3f)> {
            let (uv, n) = v.attrib;
            let pos = to_world.apply(&v.pos);
            let n = to_world.apply(&n.to::<Real<3, Model>>());
            let len = n.len();
            let diffuse = if len > 0.0 {
                light.diffuse(pos, n / len)
            } else {
                gray(0.0)
            };
            vertex(mvp.apply(&v.pos), (uv, ambient + diffuse))
        },
        |frag: Frag<(TexCoord, Color3f)>| {
            let (uv, light) = frag.var;
            let c: Color4f = match &tex {
                Some(t) => SamplerBilinear.sample(t, uv),
                None => base,
            };
            c.to_rgb().mul_comp(&light).to_rgba(c.a())
        },
    );

    let cam = Camera::new((cfg.width, cfg.height))
        .perspective(Fov::Vertical(degs(40.0)), 0.1..100.0)
        .at(pt3(0.0, 0.0, 4.0));

    // OBJ files in the wild do not always agree on winding
    let ctx = Context {
        face_cull: None,
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

    save(&frame, cfg.output_or("mesh.ppm"), &ctx)
}
