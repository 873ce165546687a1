//! Turning 3D geometry into raster images.
//!
//! This module constitutes the core 3D rendering pipeline of `trifle`.
//! It contains code for [clipping][clip], [transforming, shading][shader],
//! [texturing][tex], [rasterizing][raster], and [outputting][target] basic
//! geometric shapes such as triangles.
//!
//! A triangle passes through the following stages:
//!
//! 1. The vertex shader transforms each vertex to clip space.
//! 2. Triangles fully outside the view frustum are rejected, and those
//!    crossing its boundary are clipped into a fan of smaller triangles.
//! 3. The perspective divide maps the vertices to NDC, where triangles
//!    facing the wrong way are culled.
//! 4. The viewport transform maps the vertices to screen space.
//! 5. The rasterizer finds the covered pixels and runs the fragment
//!    shader, the depth test, and blending for each.

use alloc::vec::Vec;

use log::{debug, trace, warn};

use crate::geom::{Tri, Vertex, vertex};
use crate::math::{
    Mat4x4, RealToProjective, RealToReal, Vary, mat::to_screen,
};

use clip::{ClipVec, ClipVert, Clipper, Status};
use raster::setup;

pub use cam::{Camera, Fov, Projection};
pub use ctx::{Context, FaceCull, FragOps};
pub use light::Light;
pub use raster::{Frag, Msaa, ScreenPt, ScreenVert, Setup};
pub use shader::{FragmentShader, Shader, VertexShader};
pub use stats::{Stats, Throughput};
#[cfg(feature = "fp")]
pub use target::present;
pub use target::{Framebuf, Target, present_with};
pub use tex::{SamplerBilinear, SamplerNearest, TexCoord, Texture, uv};

pub mod cam;
pub mod clip;
pub mod ctx;
pub mod light;
pub mod raster;
pub mod shader;
pub mod stats;
pub mod target;
pub mod tex;

/// Model space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Model;

/// World space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct World;

/// View (camera) space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct View;

/// NDC space coordinate basis (normalized device coordinates).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Ndc;

/// Screen space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Screen;

/// Mapping from model space to world space.
pub type ModelToWorld = RealToReal<3, Model, World>;

/// Mapping from world space to view space.
pub type WorldToView = RealToReal<3, World, View>;

/// Mapping from model space to view space.
pub type ModelToView = RealToReal<3, Model, View>;

/// Mapping from model space to projective space.
pub type ModelToProj = RealToProjective<Model>;

/// Mapping from world space to projective space.
pub type WorldToProj = RealToProjective<World>;

/// Mapping from view space to projective space.
pub type ViewToProj = RealToProjective<View>;

/// Mapping from NDC space to screen space.
pub type NdcToScreen = RealToReal<3, Ndc, Screen>;

/// Renders the given indexed triangles into `target`.
///
/// Each vertex of `verts` is passed to the vertex shader of `shader`
/// together with `uniform`. Triangles are clipped, culled, and rasterized
/// as configured by `ctx`, and the statistics of the call are added to
/// `ctx.stats`.
///
/// Triangles referring to vertex indices out of bounds are skipped.
/// The target is not cleared; call [`Target::clear`] first if needed.
pub fn render<Vtx, Var, Uni, Shd>(
    tris: &[Tri<usize>],
    verts: &[Vtx],
    shader: &Shd,
    uniform: Uni,
    viewport: Mat4x4<NdcToScreen>,
    target: &mut impl Target,
    ctx: &Context,
) where
    Vtx: Clone,
    Var: Vary + Sync,
    Uni: Copy,
    Shd: VertexShader<Vtx, Uni, Output = Vertex<ClipVec, Var>>
        + FragmentShader<Var>
        + Sync,
{
    let mut stats = Stats::start();
    stats.calls = 1;
    stats.prims.i = tris.len();
    stats.verts.i = verts.len();

    // Vertex shader
    let shaded: Vec<ClipVert<Var>> = verts
        .iter()
        .map(|v| ClipVert::new(shader.shade_vertex(v.clone(), uniform)))
        .collect();
    stats.verts.o = shaded.len();

    let ops = ctx.frag_ops();
    let (width, height) = target.size();

    let mut clipper = Clipper::new();
    let mut clipped = Vec::new();

    for (n, Tri([i, j, k])) in tris.iter().enumerate() {
        let (Some(a), Some(b), Some(c)) =
            (shaded.get(*i), shaded.get(*j), shaded.get(*k))
        else {
            warn!("triangle {n}: vertex index out of bounds: {i}, {j}, {k}");
            continue;
        };

        clipped.clear();
        let tri = Tri([a.clone(), b.clone(), c.clone()]);
        match clipper.clip_to_view(&tri, &mut clipped) {
            Status::Visible => {}
            Status::Hidden => {
                trace!("triangle {n}: outside frustum");
                stats.rejected += 1;
                continue;
            }
            Status::Clipped => {
                trace!("triangle {n}: clipped into {}", clipped.len());
                stats.clipped += 1;
            }
        }

        for Tri([a, b, c]) in clipped.drain(..) {
            // Perspective divide
            let ndc = [&a, &b, &c].map(|v| v.pos.project_to_real::<Ndc>());

            let winding = Tri(ndc.map(|p| vertex(p.xy(), ()))).winding();
            if ctx.face_cull(winding) {
                trace!("triangle {n}: culled, {winding:?}");
                stats.culled += 1;
                continue;
            }

            // Viewport transform
            let [sa, sb, sc] = ndc.map(|p| to_screen(&viewport, p));
            let sv = [(a, sa), (b, sb), (c, sc)].map(|(v, pos)| ScreenVert {
                pos,
                recip_w: 1.0 / v.pos.w(),
                var: v.attrib,
            });

            let Some(s) = setup(sv, width, height) else {
                trace!("triangle {n}: degenerate");
                stats.degenerate += 1;
                continue;
            };
            stats.prims.o += 1;

            // Fragment shader and rasterization
            stats.frags += target.rasterize(&s, shader, ops, ctx.threads);
        }
    }

    let stats = stats.finish();
    debug!(
        "render: {} tris in, {} out, {} frags written \
         ({} rejected, {} clipped, {} culled, {} degenerate)",
        stats.prims.i,
        stats.prims.o,
        stats.frags.o,
        stats.rejected,
        stats.clipped,
        stats.culled,
        stats.degenerate,
    );
    *ctx.stats.borrow_mut() += stats;
}

/// Renders a triangle list into `target`.
///
/// Every three consecutive vertices of `verts` form a triangle; any
/// remaining one or two vertices are ignored. See [`render`].
pub fn draw<Vtx, Var, Uni, Shd>(
    verts: &[Vtx],
    shader: &Shd,
    uniform: Uni,
    viewport: Mat4x4<NdcToScreen>,
    target: &mut impl Target,
    ctx: &Context,
) where
    Vtx: Clone,
    Var: Vary + Sync,
    Uni: Copy,
    Shd: VertexShader<Vtx, Uni, Output = Vertex<ClipVec, Var>>
        + FragmentShader<Var>
        + Sync,
{
    let tris: Vec<_> = (0..verts.len() / 3)
        .map(|i| Tri([3 * i, 3 * i + 1, 3 * i + 2]))
        .collect();
    render(&tris, verts, shader, uniform, viewport, target, ctx);
}
