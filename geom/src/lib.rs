//! Asset loading for `trifle`.
//!
//! Reads triangle meshes from Wavefront OBJ files and textures from BMP
//! images, and builds simple solids for testing and demos.

use thiserror::Error;

pub mod io;
pub mod solids;

/// Error returned by the asset loaders.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {msg}")]
    Parse { line: usize, msg: String },

    #[error("index {index} out of bounds on line {line}")]
    Index { line: usize, index: isize },

    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type of the asset loaders.
pub type Result<T> = core::result::Result<T, Error>;
