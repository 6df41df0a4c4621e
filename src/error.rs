//! Error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while generating, rendering or saving a maze
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration would produce degenerate geometry
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Output file could not be opened or written
    #[error("Could not write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to a caller-supplied stream failed
    #[error("Could not write bitmap: {0}")]
    Write(#[source] io::Error),

    /// Grid or pixel buffer could not be allocated
    #[error("Could not allocate {bytes} bytes")]
    Allocation { bytes: usize },

    /// Image does not fit into the 32-bit fields of the bitmap header
    #[error("Image of {width} x {height} pixels is too large for a bitmap")]
    ImageTooLarge { width: usize, height: usize },

    /// Bitmap header could not be parsed
    #[error("Invalid bitmap header: {0}")]
    InvalidHeader(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Allocate `len` default values, reporting exhaustion instead of aborting.
pub(crate) fn zeroed<T: Default + Clone>(len: usize) -> Result<Vec<T>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::Allocation {
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    data.resize(len, T::default());
    Ok(data)
}
