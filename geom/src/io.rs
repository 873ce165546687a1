//! Reading meshes and textures from files.
//!
//! Meshes are read from [Wavefront OBJ][obj] files. Of the OBJ format,
//! vertex positions (`v`), texture coordinates (`vt`), normals (`vn`), and
//! polygonal faces (`f`) are supported. Faces with more than three
//! vertices are split into triangle fans; other statements are skipped.
//!
//! Textures are read from BMP files via the [`image`] crate.
//!
//! [obj]: https://en.wikipedia.org/wiki/Wavefront_.obj_file

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;

use image::ImageFormat;
use log::debug;

use re::geom::{Mesh, Normal3};
use re::math::{Color4, Color4f, Point3, pt3, vec3};
use re::render::{Model, TexCoord, Texture, uv};
use re::util::buf::Buf2;

use crate::{Error, Result};

/// Indices of the position, texture coordinate, and normal of a face vertex.
type VertexKey = (usize, Option<usize>, Option<usize>);

/// Loads an OBJ mesh from the file at `path`. See [`read_obj`].
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh<(TexCoord, Normal3)>> {
    let path = path.as_ref();
    debug!("loading OBJ mesh {}", path.display());
    read_obj(BufReader::new(File::open(path)?))
}

/// Reads an OBJ mesh from `input`.
///
/// Each distinct combination of position, texture coordinate, and normal
/// referenced by the faces becomes one vertex of the mesh. Vertices
/// with no texture coordinate or normal get the zero vector instead.
///
/// Indices may be positive (1-based, counting from the start of the file)
/// or negative (counting backwards from the latest element read).
///
/// # Errors
/// Returns [`Error::Io`] if reading fails, [`Error::Parse`] on malformed
/// statements, and [`Error::Index`] if a face refers to an element that
/// has not been defined.
///
/// # Examples
/// ```
/// use trifle_geom::io::read_obj;
///
/// let src = "
///     v 0.0 0.0 0.0
///     v 1.0 0.0 0.0
///     v 1.0 1.0 0.0
///     v 0.0 1.0 0.0
///     f 1 2 3 4
/// ";
/// let mesh = read_obj(src.as_bytes()).unwrap();
/// assert_eq!(mesh.verts.len(), 4);
/// assert_eq!(mesh.faces.len(), 2);
/// ```
pub fn read_obj(input: impl BufRead) -> Result<Mesh<(TexCoord, Normal3)>> {
    let mut positions: Vec<Point3<Model>> = vec![];
    let mut tex_coords: Vec<TexCoord> = vec![];
    let mut normals: Vec<Normal3> = vec![];

    let mut b = Mesh::builder();
    let mut vert_indices = HashMap::<VertexKey, usize>::new();
    let mut polygon = vec![];

    for (i, line) in input.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let mut tokens = line.split_whitespace();

        let Some(keyword) = tokens.next() else {
            continue;
        };
        match keyword {
            "v" => {
                let [x, y, z] = parse_floats(tokens, 3, line_no)?;
                positions.push(pt3(x, y, z));
            }
            "vt" => {
                // v is optional and defaults to zero
                let [u, v] = parse_floats(tokens, 1, line_no)?;
                tex_coords.push(uv(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats(tokens, 3, line_no)?;
                normals.push(vec3(x, y, z));
            }
            "f" => {
                let lens = [positions.len(), tex_coords.len(), normals.len()];
                polygon.clear();
                for tok in tokens {
                    let key = parse_face_vertex(tok, lens, line_no)?;
                    let idx = *vert_indices.entry(key).or_insert_with(|| {
                        let (p, t, n) = key;
                        let tc = t.map(|t| tex_coords[t]).unwrap_or_default();
                        let n = n.map(|n| normals[n]).unwrap_or_default();
                        b.push_vert(positions[p], (tc, n))
                    });
                    polygon.push(idx);
                }
                if polygon.len() < 3 {
                    return Err(parse_error(
                        line_no,
                        "face must have at least three vertices",
                    ));
                }
                for k in 1..polygon.len() - 1 {
                    b.push_face(polygon[0], polygon[k], polygon[k + 1]);
                }
            }
            kw if kw.starts_with('#') => {}
            kw => debug!("line {line_no}: skipping unsupported statement {kw}"),
        }
    }

    let mesh = b.build();
    debug!(
        "read OBJ mesh: {} faces, {} vertices ({} positions, {} uvs, {} normals)",
        mesh.faces.len(),
        mesh.verts.len(),
        positions.len(),
        tex_coords.len(),
        normals.len(),
    );
    Ok(mesh)
}

/// Loads a BMP texture from the file at `path`. See [`decode_bmp`].
pub fn load_bmp(path: impl AsRef<Path>) -> Result<Texture<Color4f>> {
    let path = path.as_ref();
    debug!("loading BMP texture {}", path.display());
    decode_bmp(&fs::read(path)?)
}

/// Decodes a BMP image into a texture.
///
/// The color components are converted from sRGB to linear; alpha is kept
/// as is. Images without an alpha channel are fully opaque. The first row
/// of the texture is the top row of the image.
///
/// # Errors
/// Returns [`Error::Image`] if `bytes` is not a valid BMP image.
pub fn decode_bmp(bytes: &[u8]) -> Result<Texture<Color4f>> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Bmp)?
        .to_rgba8();
    let (w, h) = img.dimensions();

    let texels = img.pixels().map(|px| {
        let c = Color4::new(px.0).to_color4f();
        c.to_linear().with_alpha(c.a())
    });
    debug!("decoded {w}x{h} BMP image");
    Ok(Buf2::new(w as usize, h as usize, texels).into())
}

fn parse_error(line: usize, msg: impl Into<String>) -> Error {
    Error::Parse { line, msg: msg.into() }
}

/// Parses the first `N` tokens as floats, ignoring any extra tokens.
fn parse_floats<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a str>,
    required: usize,
    line: usize,
) -> Result<[f32; N]> {
    let mut res = [0.0; N];
    for (i, r) in res.iter_mut().enumerate() {
        let Some(tok) = tokens.next() else {
            if i < required {
                let msg = format!("expected at least {required} numbers");
                return Err(parse_error(line, msg));
            }
            break;
        };
        *r = tok
            .parse()
            .map_err(|_| parse_error(line, format!("invalid number: {tok}")))?;
    }
    Ok(res)
}

/// Parses a face vertex of the form `p`, `p/t`, `p//n`, or `p/t/n`.
fn parse_face_vertex(
    tok: &str,
    [n_pos, n_tex, n_norm]: [usize; 3],
    line: usize,
) -> Result<VertexKey> {
    let mut parts = tok.split('/');
    let pos = resolve_index(parts.next().unwrap_or(""), n_pos, line)?;

    let mut optional = |len| match parts.next() {
        None | Some("") => Ok(None),
        Some(s) => resolve_index(s, len, line).map(Some),
    };
    let tex = optional(n_tex)?;
    let norm = optional(n_norm)?;

    if parts.next().is_some() {
        return Err(parse_error(line, format!("invalid face vertex: {tok}")));
    }
    Ok((pos, tex, norm))
}

/// Converts an OBJ index into a zero-based index to a list of length `len`.
fn resolve_index(s: &str, len: usize, line: usize) -> Result<usize> {
    let index: isize = s
        .parse()
        .map_err(|_| parse_error(line, format!("invalid index: {s:?}")))?;
    let resolved = if index > 0 {
        index - 1
    } else if index < 0 {
        len as isize + index
    } else {
        -1
    };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < len)
        .ok_or(Error::Index { line, index })
}
