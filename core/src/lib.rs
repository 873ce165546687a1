//! Core functionality of the `trifle` software rasterizer.
//!
//! Includes a math library with vectors, points, matrices, quaternions,
//! colors, and angles; basic geometry primitives; two-dimensional buffers;
//! and a software 3D renderer with customizable shaders, clipping,
//! perspective-correct interpolation, depth testing, blending, and
//! multisampling.
//!
//! # Crate features
//!
//! * `std`:
//!   Makes available items requiring I/O, timekeeping, threads, or any
//!   floating-point functions not included in `core`. In particular this
//!   means trigonometric and transcendental functions. Enabled by default.
//!
//!   If this feature is disabled, the crate only depends on `alloc`.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! # Example
//! ```
//! use trifle_core::prelude::*;
//! use trifle_core::render::{Context, Framebuf, Target, clip::ClipVec, draw};
//!
//! let verts = [
//!     vertex(pt3(-1.0, -1.0, 0.5), rgba(1.0, 0.0, 0.0, 1.0)),
//!     vertex(pt3(1.0, -1.0, 0.5), rgba(0.0, 1.0, 0.0, 1.0)),
//!     vertex(pt3(0.0, 1.0, 0.5), rgba(0.0, 0.0, 1.0, 1.0)),
//! ];
//! let shader = Shader::new(
//!     |v: Vertex3<Color4f>, _: ()| -> Vertex<ClipVec, Color4f> {
//!         vertex(v.pos.to_homogeneous(), v.attrib)
//!     },
//!     |f: Frag<Color4f>| f.var,
//! );
//! let mut fb = Framebuf {
//!     color_buf: Buf2::<Color4f>::new_default(8, 8),
//!     depth_buf: Buf2::<f32>::new_default(8, 8),
//! };
//! let ctx = Context::default();
//! fb.clear(&ctx);
//! draw(&verts, &shader, (), viewport(pt2(0, 8)..pt2(8, 0)), &mut fb, &ctx);
//!
//! assert!(ctx.stats.borrow().frags.o > 0);
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;

pub mod geom;
pub mod math;
pub mod render;
pub mod util;

/// Commonly used items, for glob importing.
pub mod prelude {
    #[cfg(feature = "fp")]
    pub use crate::math::mat::{rotate_x, rotate_y, rotate_z};
    pub use crate::math::{
        angle::{Angle, degs, rads, turns},
        color::{Color3, Color3f, Color4, Color4f, gray, rgb, rgba},
        mat::{
            Apply, Mat3x3, Mat4x4, Matrix, perspective, scale, translate,
            viewport,
        },
        point::{Point2, Point3, pt2, pt3},
        quat::Quat,
        space::{Affine, Linear},
        vary::Vary,
        vec::{Vec2, Vec3, Vector, splat, vec2, vec3},
    };

    pub use crate::geom::{
        Mesh, Normal2, Normal3, Tri, Vertex, Vertex2, Vertex3, tri, vertex,
    };

    pub use crate::render::{Frag, shader::Shader};

    pub use crate::util::buf::{
        AsMutSlice2, AsSlice2, Buf2, MutSlice2, Slice2,
    };
}
