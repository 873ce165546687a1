//! Cameras and camera transforms.

use core::ops::Range;

#[cfg(feature = "fp")]
use crate::math::{Angle, vec3};
use crate::geom::{Tri, Vertex};
use crate::math::{
    Mat4x4, Point3, Quat, Real, Vary, Vec3, orthographic, perspective, pt2,
    translate, viewport,
};

use super::clip::ClipVec;
use super::{
    Context, FragmentShader, ModelToProj, ModelToWorld, NdcToScreen, Target,
    VertexShader, View, ViewToProj, World, WorldToProj, WorldToView,
};

/// Camera field of view.
///
/// Specifies how wide or narrow the *angle of view* of the camera is.
/// The smaller the angle, the more "zoomed in" the image is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Fov {
    /// Ratio of focal length to aperture size.
    ///
    /// This value is also called the 𝑓-number. The value of 1.0 corresponds
    /// to a horizontal angle of view of 90°. Values less than 1.0 correspond
    /// to wider and values greater than 1.0 to narrower angles of view.
    FocalRatio(f32),
    /// Focal length in 35mm-equivalent millimeters.
    Equiv35mm(f32),
    /// Angle of view as measured from the left to the right edge of the image.
    #[cfg(feature = "fp")]
    Horizontal(Angle),
    /// Angle of view as measured from the top to the bottom edge of the image.
    #[cfg(feature = "fp")]
    Vertical(Angle),
}

/// The projection used by a camera.
#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection with the given focal ratio. The range
    /// endpoints are the distances of the near and far planes.
    Perspective { focal_ratio: f32, near_far: Range<f32> },
    /// Orthographic projection of the view-space box `bounds`. The z
    /// coordinates are distances in front of the camera.
    Orthographic { bounds: Range<Point3<View>> },
}

/// A camera with a position and a quaternion orientation.
///
/// In view space, the camera looks down the negative z axis with
/// positive y pointing up.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Position of the camera in **world** space.
    pub pos: Point3<World>,
    /// Rotation from view space to world space. Always a unit quaternion.
    pub orient: Quat,
    /// Projection from view space to clip space.
    pub proj: Projection,
    /// Viewport width and height in pixels.
    pub dims: (u32, u32),
}

//
// Inherent impls
//

impl Fov {
    /// Returns the focal ratio corresponding to `self`, given the aspect
    /// ratio (width / height) of the image.
    pub fn focal_ratio(self, aspect_ratio: f32) -> f32 {
        #[cfg(feature = "fp")]
        fn ratio(a: Angle) -> f32 {
            1.0 / (a / 2.0).tan()
        }
        match self {
            Fov::FocalRatio(r) => r,
            Fov::Equiv35mm(mm) => mm / (36.0 / 2.0), // half frame width

            #[cfg(feature = "fp")]
            Fov::Horizontal(a) => ratio(a),

            #[cfg(feature = "fp")]
            Fov::Vertical(a) => ratio(a) / aspect_ratio,
        }
    }
}

impl Camera {
    /// Creates a camera at the world origin looking down the negative
    /// z axis, with a 90° horizontal field of view and a near–far range
    /// of 0.1 to 1000.0.
    pub fn new(dims: (u32, u32)) -> Self {
        Self {
            pos: Point3::default(),
            orient: Quat::IDENTITY,
            proj: Projection::Perspective {
                focal_ratio: 1.0,
                near_far: 0.1..1000.0,
            },
            dims,
        }
    }

    /// Sets up perspective projection with the given field of view
    /// and near–far range.
    pub fn perspective(mut self, fov: Fov, near_far: Range<f32>) -> Self {
        let focal_ratio = fov.focal_ratio(self.aspect_ratio());
        self.proj = Projection::Perspective { focal_ratio, near_far };
        self
    }

    /// Sets up orthographic projection of the view-space box `bounds`.
    pub fn orthographic(mut self, bounds: Range<Point3<View>>) -> Self {
        self.proj = Projection::Orthographic { bounds };
        self
    }

    /// Moves the camera to the **world**-space point `pos`.
    pub fn at(mut self, pos: Point3<World>) -> Self {
        self.pos = pos;
        self
    }

    /// Returns the width of the viewport divided by its height.
    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.dims;
        w as f32 / h.max(1) as f32
    }

    /// Rotates the camera about the **world** y axis by `a`.
    ///
    /// Positive angles turn the camera to the left.
    #[cfg(feature = "fp")]
    pub fn yaw(&mut self, a: Angle) {
        let q = Quat::from_axis_angle(vec3(0.0, 1.0, 0.0), a);
        self.orient = (q * self.orient).normalize();
    }

    /// Rotates the camera about its own x axis by `a`.
    ///
    /// Positive angles tilt the camera upwards.
    #[cfg(feature = "fp")]
    pub fn pitch(&mut self, a: Angle) {
        let q = Quat::from_axis_angle(vec3(1.0, 0.0, 0.0), a);
        self.orient = (self.orient * q).normalize();
    }

    /// Translates the camera by `delta`, given in **view** space.
    pub fn translate(&mut self, delta: Vec3<View>) {
        self.pos += self.orient.rotate(delta).to::<Real<3, World>>();
    }

    /// Returns the direction the camera is looking in, in **world** space.
    pub fn forward(&self) -> Vec3<World> {
        self.orient.rotate(Vec3::new([0.0, 0.0, -1.0]))
    }

    /// Returns the world-to-view matrix of `self`.
    pub fn world_to_view(&self) -> Mat4x4<WorldToView> {
        // Inverse of the camera's own view-to-world transform
        translate((-self.pos.to_vec()).to())
            .then(&self.orient.conj().to_mat())
            .to()
    }

    /// Returns the view-to-clip (projection) matrix of `self`.
    ///
    /// # Panics
    /// If a perspective projection has a non-positive parameter
    /// or an empty near–far range.
    pub fn view_to_clip(&self) -> Mat4x4<ViewToProj> {
        match &self.proj {
            Projection::Perspective { focal_ratio, near_far } => perspective(
                *focal_ratio,
                self.aspect_ratio(),
                near_far.clone(),
            ),
            Projection::Orthographic { bounds } => {
                orthographic(bounds.start, bounds.end)
            }
        }
    }

    /// Returns the composed view and projection matrix.
    pub fn world_to_clip(&self) -> Mat4x4<WorldToProj> {
        self.world_to_view().then(&self.view_to_clip())
    }

    /// Returns the viewport matrix of `self`, mapping NDC to screen
    /// space with y pointing down.
    pub fn viewport(&self) -> Mat4x4<NdcToScreen> {
        let (w, h) = self.dims;
        viewport(pt2(0, h)..pt2(w, 0))
    }

    /// Renders the given geometry from the viewpoint of this camera.
    ///
    /// The vertex shader receives, along with `uniform`, the composed
    /// model-to-clip matrix of `to_world` and this camera.
    /// See [`render`][super::render].
    #[allow(clippy::too_many_arguments)]
    pub fn render<Vtx, Var, Uni, Shd>(
        &self,
        tris: &[Tri<usize>],
        verts: &[Vtx],
        to_world: &Mat4x4<ModelToWorld>,
        shader: &Shd,
        uniform: Uni,
        target: &mut impl Target,
        ctx: &Context,
    ) where
        Vtx: Clone,
        Var: Vary + Sync,
        Uni: Copy,
        Shd: VertexShader<
                Vtx,
                (Mat4x4<ModelToProj>, Uni),
                Output = Vertex<ClipVec, Var>,
            > + FragmentShader<Var>
            + Sync,
    {
        let tf = to_world.then(&self.world_to_clip());
        super::render(
            tris,
            verts,
            shader,
            (tf, uniform),
            self.viewport(),
            target,
            ctx,
        );
    }
}
