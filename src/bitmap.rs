//! Uncompressed 24-bit bitmap output
//!
//! Layout is a 14-byte file header followed by a 40-byte info header, all
//! little-endian, then the pixel rows. Rows are written in buffer order,
//! row 0 first, which the format treats as the bottom row. Every row is padded
//! with zeros to a multiple of four bytes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::render::{PixelBuffer, BYTES_PER_PIXEL};

/// File header plus info header
pub const HEADER_SIZE: usize = 54;

const MAGIC: [u8; 2] = *b"BM";
const INFO_HEADER_SIZE: u32 = 40;
const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 24;
const NO_COMPRESSION: u32 = 0;
const PIXELS_PER_METER: u32 = 6000;

/// Sizes recorded in a bitmap header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub width: u32,
    pub height: u32,
    /// Bytes of pixel data, including row padding
    pub image_size: u32,
    /// Header plus pixel data
    pub file_size: u32,
}

/// Bytes per stored row, padded to a multiple of four
pub fn row_stride(width: usize) -> Option<usize> {
    let raw = width.checked_mul(BYTES_PER_PIXEL)?;
    raw.checked_add(3).map(|n| n & !3)
}

impl BitmapHeader {
    /// Header for a `width` x `height` image.
    ///
    /// Fails if any size does not fit in its 32-bit field.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let too_large = || Error::ImageTooLarge { width, height };
        let image_size = row_stride(width)
            .and_then(|stride| stride.checked_mul(height))
            .ok_or_else(too_large)?;
        let file_size = image_size
            .checked_add(HEADER_SIZE)
            .ok_or_else(too_large)?;

        Ok(Self {
            width: u32::try_from(width).map_err(|_| too_large())?,
            height: u32::try_from(height).map_err(|_| too_large())?,
            image_size: u32::try_from(image_size).map_err(|_| too_large())?,
            file_size: u32::try_from(file_size).map_err(|_| too_large())?,
        })
    }

    /// Serialize to the on-disk byte layout.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        let mut put = |offset: usize, bytes: &[u8]| {
            out[offset..offset + bytes.len()].copy_from_slice(bytes);
        };

        // File header
        put(0, &MAGIC);
        put(2, &self.file_size.to_le_bytes());
        put(6, &0u16.to_le_bytes());
        put(8, &0u16.to_le_bytes());
        put(10, &(HEADER_SIZE as u32).to_le_bytes());

        // Info header
        put(14, &INFO_HEADER_SIZE.to_le_bytes());
        put(18, &self.width.to_le_bytes());
        put(22, &self.height.to_le_bytes());
        put(26, &PLANES.to_le_bytes());
        put(28, &BITS_PER_PIXEL.to_le_bytes());
        put(30, &NO_COMPRESSION.to_le_bytes());
        put(34, &self.image_size.to_le_bytes());
        put(38, &PIXELS_PER_METER.to_le_bytes());
        put(42, &PIXELS_PER_METER.to_le_bytes());
        put(46, &0u32.to_le_bytes());
        put(50, &0u32.to_le_bytes());

        out
    }

    /// Read a header back from the start of a bitmap file.
    ///
    /// Only the uncompressed 24-bit layout written by this crate is accepted.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::InvalidHeader(format!(
                "expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }
        if bytes[0..2] != MAGIC {
            return Err(Error::InvalidHeader("missing BM signature".to_string()));
        }

        let u16_at = |o: usize| u16::from_le_bytes([bytes[o], bytes[o + 1]]);
        let u32_at =
            |o: usize| u32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]]);

        let checks = [
            ("pixel data offset", u32_at(10), HEADER_SIZE as u32),
            ("info header size", u32_at(14), INFO_HEADER_SIZE),
            ("planes", u16_at(26).into(), PLANES.into()),
            ("bits per pixel", u16_at(28).into(), BITS_PER_PIXEL.into()),
            ("compression", u32_at(30), NO_COMPRESSION),
        ];
        for (field, found, expected) in checks {
            if found != expected {
                return Err(Error::InvalidHeader(format!(
                    "{field} is {found}, expected {expected}"
                )));
            }
        }

        Ok(Self {
            width: u32_at(18),
            height: u32_at(22),
            image_size: u32_at(34),
            file_size: u32_at(2),
        })
    }
}

fn write_rows<W: Write>(
    writer: &mut W,
    header: &BitmapHeader,
    buffer: &PixelBuffer,
) -> io::Result<()> {
    let padding = [0u8; 3];
    let pad = &padding[..(4 - buffer.width() * BYTES_PER_PIXEL % 4) % 4];

    writer.write_all(&header.to_bytes())?;
    for y in 0..buffer.height() {
        writer.write_all(buffer.row(y))?;
        writer.write_all(pad)?;
    }
    writer.flush()
}

/// Write header and padded pixel rows of `buffer` to `writer`.
pub fn write_bitmap<W: Write>(mut writer: W, buffer: &PixelBuffer) -> Result<()> {
    let header = BitmapHeader::new(buffer.width(), buffer.height())?;
    write_rows(&mut writer, &header, buffer).map_err(Error::Write)
}

/// Save `buffer` as a bitmap file at `path`.
///
/// The file is closed before returning, on success and on failure alike.
pub fn save_bitmap(path: &Path, buffer: &PixelBuffer) -> Result<()> {
    let header = BitmapHeader::new(buffer.width(), buffer.height())?;
    let io_error = |source: io::Error| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, &header, buffer).map_err(io_error)?;
    writer.into_inner().map_err(|e| io_error(e.into_error()))?;

    debug!(
        "Wrote {} bytes ({} x {}) to {}",
        header.file_size,
        header.width,
        header.height,
        path.display()
    );
    Ok(())
}
