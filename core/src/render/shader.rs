//! The programmable stages of the pipeline.
//!
//! Rendering runs two user-supplied functions. The vertex stage maps each
//! input vertex to a [`ClipVec`] position and whatever per-vertex data the
//! fragment stage needs; typically it multiplies the position by a
//! model-to-projection matrix passed in as the *uniform*. The fragment stage
//! then sees those outputs interpolated to a single pixel and returns its
//! color, or nothing to leave the pixel untouched.
//!
//! Plain closures work for both stages:
//! ```
//! use trifle_core::geom::{Vertex, vertex};
//! use trifle_core::math::Point3;
//! use trifle_core::render::{VertexShader, clip::ClipVec};
//!
//! let vs = |v: Vertex<Point3, f32>, _: ()| -> Vertex<ClipVec, f32> {
//!     vertex(v.pos.to_homogeneous(), v.attrib)
//! };
//! let out = vs.shade_vertex(vertex(Point3::default(), 0.5), ());
//! assert_eq!(out.pos.w(), 1.0);
//! assert_eq!(out.attrib, 0.5);
//! ```

use crate::{geom::Vertex, math::Color4f};

use super::{clip::ClipVec, raster::Frag};

/// The vertex stage.
///
/// `In` is the input vertex type and `Uni` the type of data shared by every
/// vertex of a draw call, such as transforms or light parameters.
pub trait VertexShader<In, Uni> {
    type Output;

    /// Shades a single vertex.
    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Self::Output;
}

/// The fragment stage, run once per covered pixel.
pub trait FragmentShader<Var> {
    /// Returns the color of `frag`, or `None` to discard it.
    ///
    /// A discarded fragment writes neither color nor depth.
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<Color4f>;
}

impl<F, In, Out, Uni> VertexShader<In, Uni> for F
where
    F: Fn(In, Uni) -> Out,
{
    type Output = Out;

    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Out {
        self(vertex, uniform)
    }
}

/// Closures may return either a bare color or an `Option` of one.
impl<F, Var, Out> FragmentShader<Var> for F
where
    F: Fn(Frag<Var>) -> Out,
    Out: Into<Option<Color4f>>,
{
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<Color4f> {
        self(frag).into()
    }
}

/// A vertex and fragment shader pair whose varying types agree.
#[derive(Copy, Clone)]
pub struct Shader<Vs, Fs> {
    pub vertex_shader: Vs,
    pub fragment_shader: Fs,
}

impl<Vs, Fs> Shader<Vs, Fs> {
    /// Pairs `vs` with `fs`.
    ///
    /// The bounds tie the output attribute of `vs` to the input of `fs`,
    /// so closure argument types can usually be inferred from one side.
    pub const fn new<In, Uni, Var>(vs: Vs, fs: Fs) -> Self
    where
        Vs: VertexShader<In, Uni, Output = Vertex<ClipVec, Var>>,
        Fs: FragmentShader<Var>,
    {
        Self { vertex_shader: vs, fragment_shader: fs }
    }
}

impl<In, Vs, Fs, Uni> VertexShader<In, Uni> for Shader<Vs, Fs>
where
    Vs: VertexShader<In, Uni>,
{
    type Output = Vs::Output;

    fn shade_vertex(&self, vertex: In, uniform: Uni) -> Self::Output {
        self.vertex_shader.shade_vertex(vertex, uniform)
    }
}

impl<Vs, Fs, Var> FragmentShader<Var> for Shader<Vs, Fs>
where
    Fs: FragmentShader<Var>,
{
    fn shade_fragment(&self, frag: Frag<Var>) -> Option<Color4f> {
        self.fragment_shader.shade_fragment(frag)
    }
}
