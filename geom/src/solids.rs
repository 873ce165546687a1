//! Meshes of simple solids.

use re::geom::{Mesh, Normal3};
use re::math::{Point3, pt3, vec3};
use re::render::{Model, TexCoord, uv};

/// An axis-aligned rectangular cuboid.
///
/// Each face has its own four vertices so that every face gets a flat
/// normal and the full 0..1 uv range. Faces wind counter-clockwise when
/// viewed from outside the cuboid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid {
    /// The corner with the smallest coordinates.
    pub min: Point3<Model>,
    /// The corner with the largest coordinates.
    pub max: Point3<Model>,
}

impl Cuboid {
    /// Corners of the unit cube, indexed by bits `0bxyz`.
    const CORNERS: [[f32; 3]; 8] = [
        [0.0, 0.0, 0.0], // 0b000
        [0.0, 0.0, 1.0], // 0b001
        [0.0, 1.0, 0.0], // 0b010
        [0.0, 1.0, 1.0], // 0b011
        [1.0, 0.0, 0.0], // 0b100
        [1.0, 0.0, 1.0], // 0b101
        [1.0, 1.0, 0.0], // 0b110
        [1.0, 1.0, 1.0], // 0b111
    ];
    const NORMALS: [Normal3; 6] = [
        vec3(-1.0, 0.0, 0.0),
        vec3(1.0, 0.0, 0.0),
        vec3(0.0, -1.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        vec3(0.0, 0.0, -1.0),
        vec3(0.0, 0.0, 1.0),
    ];
    const UVS: [TexCoord; 4] =
        [uv(0.0, 0.0), uv(1.0, 0.0), uv(0.0, 1.0), uv(1.0, 1.0)];

    /// The corners of each face, in uv order: top left, top right,
    /// bottom left, bottom right.
    #[rustfmt::skip]
    const FACE_CORNERS: [[usize; 4]; 6] = [
        [0b011, 0b010, 0b001, 0b000], // -x
        [0b110, 0b111, 0b100, 0b101], // +x
        [0b000, 0b100, 0b001, 0b101], // -y
        [0b011, 0b111, 0b010, 0b110], // +y
        [0b010, 0b110, 0b000, 0b100], // -z
        [0b111, 0b011, 0b101, 0b001], // +z
    ];

    /// Returns a cuboid with the given opposite corners.
    pub fn new(min: Point3<Model>, max: Point3<Model>) -> Self {
        Self { min, max }
    }

    /// Builds a mesh of `self` with texture coordinates and normals.
    pub fn build(self) -> Mesh<(TexCoord, Normal3)> {
        let (min, max) = (self.min.0, self.max.0);
        let mut b = Mesh::builder();
        for (face, corners) in Self::FACE_CORNERS.into_iter().enumerate() {
            let n = b.num_verts();
            b.push_faces([[n, n + 1, n + 3], [n, n + 3, n + 2]]);
            for (corner, tc) in corners.into_iter().zip(Self::UVS) {
                let [x, y, z] = Self::CORNERS[corner];
                let pos = pt3(
                    min[0] + (max[0] - min[0]) * x,
                    min[1] + (max[1] - min[1]) * y,
                    min[2] + (max[2] - min[2]) * z,
                );
                b.push_vert(pos, (tc, Self::NORMALS[face]));
            }
        }
        b.build()
    }
}

/// Returns a mesh of the cube with corners at (-1, -1, -1) and (1, 1, 1).
pub fn cube() -> Mesh<(TexCoord, Normal3)> {
    Cuboid::new(pt3(-1.0, -1.0, -1.0), pt3(1.0, 1.0, 1.0)).build()
}
