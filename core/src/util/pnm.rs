//! Writing frames as binary PPM (NetPBM `P6`) images.
//!
//! PPM is about the simplest image format there is: a short text header
//! followed by raw 8-bit RGB triplets, row by row from the top. Most
//! image viewers open it, which makes it a convenient output for
//! renderers that have no window to draw into.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use alloc::vec::Vec;

use crate::math::color::Color3;
use crate::util::buf::AsSlice2;

/// Writes `data` to a file at `path` as a binary PPM image.
///
/// An existing file at `path` is truncated.
///
/// # Errors
/// If the file cannot be created or written.
pub fn save_ppm(
    path: impl AsRef<Path>,
    data: impl AsSlice2<Color3>,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(&mut out, data)?;
    out.flush()
}

/// Writes `data` to `out` as a binary PPM image.
///
/// # Errors
/// If writing to `out` fails.
pub fn write_ppm(
    mut out: impl Write,
    data: impl AsSlice2<Color3>,
) -> io::Result<()> {
    let img = data.as_slice2();
    writeln!(out, "P6 {} {} 255", img.width(), img.height())?;
    for row in img.rows() {
        let bytes: Vec<u8> = row.iter().flat_map(|c| c.0).collect();
        out.write_all(&bytes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::math::color::rgb;
    use crate::util::buf::{Buf2, Slice2};

    use super::*;

    #[test]
    fn header_then_rows_top_down() {
        let px = [
            [rgb(0xFF, 0, 0), rgb(0, 0xFF, 0)],
            [rgb(0, 0, 0xFF), rgb(1, 2, 3)],
        ];
        let img = Buf2::new_with(2, 2, |x, y| px[y][x]);
        let mut out = Vec::new();
        write_ppm(&mut out, img).unwrap();
        assert_eq!(
            out,
            b"P6 2 2 255\n\
              \xFF\x00\x00\x00\xFF\x00\
              \x00\x00\xFF\x01\x02\x03"
        );
    }

    #[test]
    fn strided_slice_skips_padding() {
        let img = Buf2::new_with(4, 3, |x, y| rgb(x as u8, y as u8, 9));
        // Columns 1 and 2 of the top two rows
        let view = Slice2::new(2, 2, 4, &img.data()[1..]);
        let mut out = Vec::new();
        write_ppm(&mut out, view).unwrap();
        assert_eq!(
            out,
            b"P6 2 2 255\n\
              \x01\x00\x09\x02\x00\x09\
              \x01\x01\x09\x02\x01\x09"
        );
    }

    #[test]
    fn empty_image_is_just_a_header() {
        let img: Buf2<Color3> = Buf2::new_default(0, 0);
        let mut out = Vec::new();
        write_ppm(&mut out, img).unwrap();
        assert_eq!(out, b"P6 0 0 255\n");
    }
}
