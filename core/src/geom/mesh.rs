//! Triangle meshes.

use core::fmt::{self, Debug, Display, Formatter};

use alloc::{vec, vec::Vec};

use crate::math::Point3;
use crate::render::Model;

use super::{Tri, Vertex3, vertex};

/// A triangle mesh.
///
/// An object made of flat triangular faces that typically form a contiguous
/// surface. Several faces may share a vertex, so the faces are stored as
/// triplets of indices into the vertex list.
#[derive(Clone)]
pub struct Mesh<Attrib, Basis = Model> {
    /// The faces of the mesh, with each face a triplet of indices
    /// to the `verts` vector.
    pub faces: Vec<Tri<usize>>,
    /// The vertices of the mesh.
    pub verts: Vec<Vertex3<Attrib, Basis>>,
}

/// Incrementally builds a [`Mesh`].
#[derive(Clone)]
pub struct Builder<Attrib = (), Basis = Model> {
    m: Mesh<Attrib, Basis>,
}

/// Error returned by [`Mesh::validate`] when a face refers to
/// a vertex that does not exist.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IndexOutOfBounds {
    /// The index of the offending face.
    pub face: usize,
    /// The offending vertex index.
    pub index: usize,
    /// The number of vertices in the mesh.
    pub len: usize,
}

impl<A, B> Mesh<A, B> {
    /// Creates a new triangle mesh with the given faces and vertices.
    ///
    /// Each face in `faces` is a triplet of indices, referring to
    /// the vertices in `verts` that define that face.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    ///
    /// # Examples
    /// ```
    /// use trifle_core::geom::{Tri, Mesh, vertex};
    /// use trifle_core::math::pt3;
    ///
    /// let verts = [
    ///     pt3(0.0, 0.0, 0.0),
    ///     pt3(1.0, 0.0, 0.0),
    ///     pt3(0.0, 1.0, 0.0),
    ///     pt3(0.0, 0.0, 1.0),
    /// ]
    /// .map(|v| vertex(v, ()));
    ///
    /// let faces = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]].map(Tri);
    ///
    /// let mesh: Mesh<()> = Mesh::new(faces, verts);
    /// assert_eq!(mesh.faces.len(), 4);
    /// ```
    pub fn new<F, V>(faces: F, verts: V) -> Self
    where
        F: IntoIterator<Item = Tri<usize>>,
        V: IntoIterator<Item = Vertex3<A, B>>,
    {
        let mesh = Self {
            faces: faces.into_iter().collect(),
            verts: verts.into_iter().collect(),
        };
        if let Err(e) = mesh.validate() {
            panic!("{e}");
        }
        mesh
    }

    /// Checks that every vertex index in `self.faces` refers to
    /// an existing vertex.
    ///
    /// # Errors
    /// Returns the first out-of-bounds index found.
    pub fn validate(&self) -> Result<(), IndexOutOfBounds> {
        let len = self.verts.len();
        for (face, Tri(vs)) in self.faces.iter().enumerate() {
            if let Some(&index) = vs.iter().find(|&&i| i >= len) {
                return Err(IndexOutOfBounds { face, index, len });
            }
        }
        Ok(())
    }

    /// Reverses the winding order of every face of `self`,
    /// turning the mesh inside out.
    pub fn flip_winding(&mut self) {
        for f in &mut self.faces {
            *f = f.flip();
        }
    }

    /// Returns an iterator over the faces of `self`,
    /// with the index triplets resolved to vertices.
    pub fn tris(&self) -> impl Iterator<Item = Tri<&Vertex3<A, B>>> + '_ {
        self.faces
            .iter()
            .map(|Tri(vs)| Tri(vs.map(|i| &self.verts[i])))
    }
}

impl<A> Mesh<A> {
    /// Returns a new mesh builder.
    pub fn builder() -> Builder<A> {
        Builder::default()
    }
}

impl<A, B> Builder<A, B> {
    /// Appends a face with the given vertex indices.
    pub fn push_face(&mut self, a: usize, b: usize, c: usize) {
        self.m.faces.push(Tri([a, b, c]));
    }

    /// Appends all the faces yielded by the given iterator.
    pub fn push_faces<Fs>(&mut self, faces: Fs)
    where
        Fs: IntoIterator<Item = [usize; 3]>,
    {
        self.m.faces.extend(faces.into_iter().map(Tri));
    }

    /// Appends a vertex with the given position and attribute,
    /// returning its index.
    pub fn push_vert(&mut self, pos: Point3<B>, attrib: A) -> usize {
        self.m.verts.push(vertex(pos, attrib));
        self.m.verts.len() - 1
    }

    /// Appends all the vertices yielded by the given iterator.
    pub fn push_verts<Vs>(&mut self, verts: Vs)
    where
        Vs: IntoIterator<Item = (Point3<B>, A)>,
    {
        let vs = verts.into_iter().map(|(p, a)| vertex(p, a));
        self.m.verts.extend(vs);
    }

    /// Returns the number of vertices added so far.
    pub fn num_verts(&self) -> usize {
        self.m.verts.len()
    }

    /// Returns the finished mesh containing all the added faces and vertices.
    ///
    /// # Panics
    /// If any of the vertex indices in `faces` ≥ `verts.len()`.
    pub fn build(self) -> Mesh<A, B> {
        Mesh::new(self.m.faces, self.m.verts)
    }
}

impl Display for IndexOutOfBounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self { face, index, len } = self;
        write!(
            f,
            "vertex index out of bounds at faces[{face}]: {index} >= {len}"
        )
    }
}

impl core::error::Error for IndexOutOfBounds {}

impl<A: Debug, B: Debug + Default> Debug for Mesh<A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("faces", &self.faces)
            .field("verts", &self.verts)
            .finish()
    }
}

impl<A, B> Default for Mesh<A, B> {
    fn default() -> Self {
        Self { faces: vec![], verts: vec![] }
    }
}

impl<A, B> Default for Builder<A, B> {
    fn default() -> Self {
        Self { m: Mesh::default() }
    }
}

#[cfg(test)]
mod tests {
    use crate::math::pt3;

    use super::*;

    fn verts() -> [Vertex3<()>; 3] {
        [
            vertex(pt3(0.0, 0.0, 0.0), ()),
            vertex(pt3(1.0, 1.0, 1.0), ()),
            vertex(pt3(2.0, 2.0, 2.0), ()),
        ]
    }

    #[test]
    #[should_panic]
    fn mesh_new_panics_if_vertex_index_oob() {
        _ = Mesh::new([Tri([0, 1, 2]), Tri([1, 2, 3])], verts());
    }

    #[test]
    #[should_panic]
    fn mesh_builder_panics_if_vertex_index_oob() {
        let mut b = Mesh::builder();
        b.push_faces([[0, 1, 2], [1, 2, 3]]);
        b.push_verts(verts().map(|v| (v.pos, v.attrib)));
        _ = b.build();
    }

    #[test]
    fn validate_reports_first_bad_index() {
        let mut mesh = Mesh::new([Tri([0, 1, 2])], verts());
        assert_eq!(mesh.validate(), Ok(()));

        mesh.faces.push(Tri([2, 7, 9]));
        assert_eq!(
            mesh.validate(),
            Err(IndexOutOfBounds { face: 1, index: 7, len: 3 })
        );
    }

    #[test]
    fn flip_winding_swaps_indices() {
        let mut mesh = Mesh::new([Tri([0, 1, 2])], verts());
        mesh.flip_winding();
        assert_eq!(mesh.faces, [Tri([0, 2, 1])]);
        mesh.flip_winding();
        assert_eq!(mesh.faces, [Tri([0, 1, 2])]);
    }

    #[test]
    fn tris_resolves_indices() {
        let mesh = Mesh::new([Tri([2, 0, 1])], verts());
        let t = mesh.tris().next().unwrap();
        assert_eq!(t.0[0].pos, pt3(2.0, 2.0, 2.0));
        assert_eq!(t.0[1].pos, pt3(0.0, 0.0, 0.0));
    }
}
