//! Rendering context and parameters.

use core::{cell::RefCell, cmp::Ordering};

use crate::geom::Winding;
use crate::math::{Color4f, rgba};

use super::{Msaa, Stats};

/// Context and parameters used by the renderer.
#[derive(Clone, Debug)]
pub struct Context {
    /// The color with which to fill the color buffer to clear it, if any.
    ///
    /// If rendered geometry always fills the entire frame, `color_clear`
    /// can be set to `None` to avoid redundant work.
    pub color_clear: Option<Color4f>,

    /// The value with which to fill the depth buffer to clear it, if any.
    pub depth_clear: Option<f32>,

    /// Whether to cull (discard) faces pointing either away from or towards
    /// the camera.
    ///
    /// If all geometry drawn is "solid" meshes without holes, backfaces can
    /// usually be culled because they are always occluded by front faces and
    /// drawing them would be redundant.
    pub face_cull: Option<FaceCull>,

    /// The winding of front faces, as seen in NDC with y pointing up.
    pub front_face: Winding,

    /// Whether to do depth testing and which predicate to use.
    ///
    /// If set to `Some(Ordering::Less)`, a fragment passes the depth test
    /// *iff* `new_z < old_z` (the default). If set to `None`, depth test
    /// is not performed. This setting has no effect if the render target
    /// does not support z-buffering.
    pub depth_test: Option<Ordering>,

    /// Whether to write color values.
    ///
    /// If `false`, other fragment processing is done but there is no color
    /// output. This setting has no effect if the render target does not
    /// support color writes.
    pub color_write: bool,

    /// Whether to write depth values.
    ///
    /// If `false`, other fragment processing is done but there is no depth
    /// output. This setting has no effect if the render target does not
    /// support depth writes.
    pub depth_write: bool,

    /// Whether to alpha-blend fragment colors over the existing color.
    ///
    /// If `false`, fragment colors replace the existing color outright.
    pub blend: bool,

    /// The multisampling pattern used to compute pixel coverage.
    pub msaa: Msaa,

    /// The number of worker threads to rasterize with.
    ///
    /// Each triangle is split into horizontal bands of rows, rasterized in
    /// parallel. Values 0 and 1 both mean single-threaded rendering. Has no
    /// effect unless the `std` feature is enabled.
    pub threads: usize,

    /// Collecting rendering statistics.
    pub stats: RefCell<Stats>,
}

/// Whether to cull front faces or backfaces.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FaceCull {
    Front,
    Back,
}

/// The per-fragment subset of [`Context`], cheap to copy to worker threads.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FragOps {
    pub depth_test: Option<Ordering>,
    pub color_write: bool,
    pub depth_write: bool,
    pub blend: bool,
    pub msaa: Msaa,
}

impl Context {
    /// Compares the depth value `new` to `curr` and returns whether `new`
    /// passes the depth test specified by `self.depth_test`.
    /// If `self.depth_test` is `None`, always returns `true`.
    #[inline]
    pub fn depth_test(&self, new: f32, curr: f32) -> bool {
        self.frag_ops().depth_test(new, curr)
    }

    /// Returns whether a primitive with winding `w` should be culled based
    /// on the current face culling setting.
    #[inline]
    pub fn face_cull(&self, w: Winding) -> bool {
        let is_front = w == self.front_face;
        match self.face_cull {
            Some(FaceCull::Back) => !is_front,
            Some(FaceCull::Front) => is_front,
            None => false,
        }
    }

    /// Returns the per-fragment settings of `self`.
    pub fn frag_ops(&self) -> FragOps {
        FragOps {
            depth_test: self.depth_test,
            color_write: self.color_write,
            depth_write: self.depth_write,
            blend: self.blend,
            msaa: self.msaa,
        }
    }
}

impl FragOps {
    /// Returns whether the depth value `new` passes the depth test
    /// against the stored value `curr`.
    ///
    /// A NaN depth never passes an enabled test.
    #[inline]
    pub fn depth_test(&self, new: f32, curr: f32) -> bool {
        match self.depth_test {
            None => true,
            Some(ord) => new.partial_cmp(&curr) == Some(ord),
        }
    }
}

impl Default for Context {
    /// Creates a rendering context with default settings.
    ///
    /// The default values are:
    /// * Color clear:   Opaque black
    /// * Depth clear:   Positive infinity
    /// * Face culling:  Backfaces
    /// * Front face:    Counter-clockwise
    /// * Depth testing: Pass if closer
    /// * Color writes:  Enabled
    /// * Depth writes:  Enabled
    /// * Blending:      Enabled
    /// * Multisampling: Off
    /// * Threads:       1
    fn default() -> Self {
        Self {
            color_clear: Some(rgba(0.0, 0.0, 0.0, 1.0)),
            depth_clear: Some(f32::INFINITY),
            face_cull: Some(FaceCull::Back),
            front_face: Winding::Ccw,
            depth_test: Some(Ordering::Less),
            color_write: true,
            depth_write: true,
            blend: true,
            msaa: Msaa::Off,
            threads: 1,
            stats: Default::default(),
        }
    }
}
