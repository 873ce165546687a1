//! Clipping triangles against the view volume.
//!
//! Clipping means converting a shape into another, such that only the points
//! inside a volume enclosed by one or more planes remain. Here the volume is
//! the canonical [view volume][view_frustum] in homogeneous clip space, and
//! a triangle that straddles its boundary is cut down to the convex polygon
//! that lies inside, which is then split back into a fan of triangles.
//!
//! Clipping happens before the perspective divide, so geometry behind the
//! camera (with w ≤ 0) never reaches the divide at all.

use alloc::vec::Vec;
use core::mem::swap;

use view_frustum::{PLANES, outcode, status};

use crate::geom::{Tri, Vertex};
use crate::math::{Vary, vec::ProjVec3};

/// Trait for types that can be [clipped][self] against convex volumes.
///
/// This trait is meant to be implemented on slices or other composites,
/// so that several primitives can be clipped in a single call and the
/// temporary buffers reused between them.
pub trait Clip {
    /// Type of the clipped object.
    type Item;

    /// Clips `self` against `planes`, appending the resulting zero or more
    /// primitives to the out parameter `out`.
    ///
    /// A primitive entirely within the volume is emitted as is. One entirely
    /// outside is skipped. One partially inside is clipped so that no points
    /// outside the volume remain in the result.
    fn clip(&self, planes: &[ClipPlane], out: &mut Vec<Self::Item>);
}

/// A vector in clip space.
pub type ClipVec = ProjVec3;

/// A vertex in clip space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipVert<A> {
    pub pos: ClipVec,
    pub attrib: A,
    outcode: u8,
}

/// Visibility of a shape in the view volume.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Status {
    /// Entirely inside the view volume.
    Visible,
    /// Partly inside, or outside without sharing an outside plane;
    /// needs clipping.
    Clipped,
    /// Entirely outside some plane of the view volume.
    Hidden,
}

/// A clipping plane in homogeneous clip space.
///
/// A point `p` is outside the plane if `n · p + off > 0`.
#[derive(Copy, Clone, Debug)]
pub struct ClipPlane {
    n: ClipVec,
    off: f32,
    bit: u8,
}

/// Reusable state for clipping triangles one at a time.
///
/// Holds the two vertex buffers the polygon ping-pongs between so that
/// clipping a stream of triangles does not allocate per triangle.
#[derive(Clone, Debug)]
pub struct Clipper<A> {
    verts_in: Vec<ClipVert<A>>,
    verts_out: Vec<ClipVert<A>>,
}

impl ClipPlane {
    /// Creates a clip plane given the coefficients of its equation
    /// and its outcode bit.
    pub const fn new(coeffs: [f32; 4], off: f32, bit: u8) -> Self {
        Self { n: ClipVec::new(coeffs), off, bit }
    }

    /// Returns the outcode bit of `self`.
    pub const fn bit(&self) -> u8 {
        self.bit
    }

    /// Returns the signed distance between `pt` and `self`.
    ///
    /// The return value is positive if `pt` is outside the plane,
    /// negative if inside, and zero if `pt` lies exactly on the plane:
    /// ```text
    ///            n
    ///            ^       d > 0
    ///            |         x
    ///            |         |
    ///            |_        |
    /// -----x-----+-'------------ self
    ///    d = 0         |
    ///                  x
    ///                d < 0
    /// ```
    #[inline]
    pub fn signed_dist(&self, pt: &ClipVec) -> f32 {
        self.n.dot(pt) + self.off
    }

    /// Computes this plane's outcode bit for a point.
    ///
    /// The result is `self.bit()` if `pt` is outside this plane, 0 otherwise.
    #[inline]
    pub fn outcode(&self, pt: &ClipVec) -> u8 {
        (self.signed_dist(pt) > 0.0) as u8 * self.bit
    }

    /// Returns whether `v` is inside `self` (or exactly on it).
    #[inline]
    pub fn is_inside<A>(&self, v: &ClipVert<A>) -> bool {
        self.signed_dist(&v.pos) <= 0.0
    }

    /// Returns the point where the edge `v0`–`v1` crosses `self`,
    /// or `None` if it does not cross.
    ///
    /// Both the position and the attribute are interpolated
    /// with the same parameter.
    pub fn intersect<A: Vary>(
        &self,
        [v0, v1]: [&ClipVert<A>; 2],
    ) -> Option<ClipVert<A>> {
        let d0 = self.signed_dist(&v0.pos);
        let d1 = self.signed_dist(&v1.pos);
        // Strictly opposite signs, so d0 - d1 is nonzero
        ((d0 > 0.0 && d1 < 0.0) || (d0 < 0.0 && d1 > 0.0)).then(|| {
            let t = d0 / (d0 - d1);
            ClipVert::new(Vertex {
                pos: v0.pos.lerp(&v1.pos, t),
                attrib: v0.attrib.lerp(&v1.attrib, t),
            })
        })
    }

    /// Clips a convex polygon against `self`.
    ///
    /// Appends the resulting vertices to `verts_out`.
    ///
    /// In the diagram below, clipping triangle ABC results in quad ABPQ,
    /// where P and Q are new vertices generated by interpolating between
    /// A and C, and B and C, respectively.
    ///
    /// ```text
    ///
    ///     n
    ///     ^            C
    ///     |           / \         outside
    ///     |         /    \
    /// ----+-------Q-------P--------self-----
    ///           /          \
    ///         A--___        \     inside
    ///               `---__   \
    ///                     `---B
    /// ```
    pub fn clip_simple_polygon<A: Vary>(
        &self,
        verts_in: &[ClipVert<A>],
        verts_out: &mut Vec<ClipVert<A>>,
    ) {
        let Some(first) = verts_in.first() else {
            return;
        };
        let mut v0 = first;
        for v1 in verts_in[1..].iter().chain([first]) {
            if self.is_inside(v0) {
                verts_out.push(v0.clone());
            }
            if let Some(v) = self.intersect([v0, v1]) {
                verts_out.push(v);
            }
            v0 = v1;
        }
    }
}

/// The canonical view volume in homogeneous clip space.
///
/// A point `(x, y, z, w)` is inside the volume if
/// ```text
///     -w ≤ x ≤ w
///     -w ≤ y ≤ w
///      0 ≤ z ≤ w
///      w ≥ ε
/// ```
/// where ε is [`W_MIN`]. The last condition is redundant for points that
/// satisfy the first three with w > 0, but it keeps vertices with w ≈ 0
/// away from the perspective divide.
pub mod view_frustum {
    use super::*;

    /// Smallest w coordinate a vertex can have after clipping.
    pub const W_MIN: f32 = 1e-5;

    /// The near, w, far, left, right, bottom, and top clipping planes,
    /// in that order.
    #[rustfmt::skip]
    pub const PLANES: [ClipPlane; 7] = [
        ClipPlane::new([ 0.0,  0.0, -1.0,  0.0], 0.0,   0x01), // Near
        ClipPlane::new([ 0.0,  0.0,  0.0, -1.0], W_MIN, 0x02), // W
        ClipPlane::new([ 0.0,  0.0,  1.0, -1.0], 0.0,   0x04), // Far
        ClipPlane::new([-1.0,  0.0,  0.0, -1.0], 0.0,   0x08), // Left
        ClipPlane::new([ 1.0,  0.0,  0.0, -1.0], 0.0,   0x10), // Right
        ClipPlane::new([ 0.0, -1.0,  0.0, -1.0], 0.0,   0x20), // Bottom
        ClipPlane::new([ 0.0,  1.0,  0.0, -1.0], 0.0,   0x40), // Top
    ];

    /// Clips geometry against the view volume, appending the part that
    /// is within it to `out`.
    pub fn clip<G: Clip + ?Sized>(geom: &G, out: &mut Vec<G::Item>) {
        geom.clip(&PLANES, out);
    }

    /// Returns the outcode of the given point.
    ///
    /// The outcode is a bitset where the bit of each plane is 1 if the point
    /// is outside the plane, and 0 otherwise.
    #[inline]
    pub fn outcode(pt: &ClipVec) -> u8 {
        PLANES.iter().fold(0, |code, p| code | p.outcode(pt))
    }

    /// Returns the visibility status of the convex hull of `vs`.
    pub fn status<V>(vs: &[ClipVert<V>]) -> Status {
        // Planes that every vertex is outside of
        let all_outside = vs.iter().fold(!0, |code, v| code & v.outcode);
        // Planes that at least one vertex is outside of
        let any_outside = vs.iter().fold(0, |code, v| code | v.outcode);

        if all_outside != 0 {
            // All outside the *same* plane
            Status::Hidden
        } else if any_outside == 0 {
            Status::Visible
        } else {
            Status::Clipped
        }
    }
}

/// Computes the intersection of a convex polygon and a convex volume.
///
/// On return, `verts_out` holds the part of the polygon that is inside all
/// of `planes`, if any. `verts_in` is used as scratch space and left in an
/// unspecified state.
///
/// The algorithm used is Sutherland–Hodgman [^1]: the polygon is clipped
/// against each plane in turn, the output of one pass being the input of
/// the next.
///
/// [^1]: Ivan Sutherland, Gary W. Hodgman: Reentrant Polygon Clipping.
///        Communications of the ACM, vol. 17, pp. 32–42, 1974
pub fn clip_simple_polygon<A: Vary>(
    planes: &[ClipPlane],
    verts_in: &mut Vec<ClipVert<A>>,
    verts_out: &mut Vec<ClipVert<A>>,
) {
    verts_out.clear();
    for p in planes {
        p.clip_simple_polygon(verts_in, verts_out);
        if verts_out.is_empty() {
            verts_in.clear();
            return;
        }
        swap(verts_in, verts_out);
        verts_out.clear();
    }
    swap(verts_in, verts_out);
}

impl<V> ClipVert<V> {
    /// Creates a clip vertex, computing its outcode.
    #[inline]
    pub fn new(Vertex { pos, attrib }: Vertex<ClipVec, V>) -> Self {
        let outcode = outcode(&pos);
        Self { pos, attrib, outcode }
    }

    /// Returns the view volume outcode of `self`.
    #[inline]
    pub fn outcode(&self) -> u8 {
        self.outcode
    }
}

impl<A> Clipper<A> {
    /// Creates a clipper with empty scratch buffers.
    pub fn new() -> Self {
        Self { verts_in: Vec::new(), verts_out: Vec::new() }
    }
}

impl<A: Vary> Clipper<A> {
    /// Clips a single triangle against `planes`, appending the result
    /// to `out` as a fan of triangles.
    ///
    /// Returns the visibility status of `tri`. A `Visible` triangle is
    /// appended unchanged, a `Hidden` one is dropped, and a `Clipped` one
    /// yields zero or more triangles sharing the first output vertex:
    /// ```text
    ///       v1-----v2
    ///      /  \ ___/ \
    ///     /  _/\      \
    ///   v0--´----------v3
    /// ```
    pub fn clip_tri(
        &mut self,
        tri: &Tri<ClipVert<A>>,
        planes: &[ClipPlane],
        out: &mut Vec<Tri<ClipVert<A>>>,
    ) -> Status {
        let st = status(&tri.0);
        match st {
            Status::Visible => out.push(tri.clone()),
            Status::Hidden => {}
            Status::Clipped => {
                self.verts_in.clear();
                self.verts_in.extend_from_slice(&tri.0);
                clip_simple_polygon(
                    planes,
                    &mut self.verts_in,
                    &mut self.verts_out,
                );
                if let [v0, rest @ ..] = &self.verts_out[..] {
                    out.extend(rest.windows(2).map(|vs| {
                        Tri([v0.clone(), vs[0].clone(), vs[1].clone()])
                    }));
                }
            }
        }
        st
    }

    /// Clips a triangle against the view volume.
    ///
    /// See [`Clipper::clip_tri`].
    pub fn clip_to_view(
        &mut self,
        tri: &Tri<ClipVert<A>>,
        out: &mut Vec<Tri<ClipVert<A>>>,
    ) -> Status {
        self.clip_tri(tri, &PLANES, out)
    }
}

impl<A> Default for Clipper<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Vary> Clip for [Tri<ClipVert<A>>] {
    type Item = Tri<ClipVert<A>>;

    fn clip(&self, planes: &[ClipPlane], out: &mut Vec<Self::Item>) {
        let mut clipper = Clipper::new();
        for tri in self {
            clipper.clip_tri(tri, planes, out);
        }
    }
}
