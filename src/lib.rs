//! Generate a perfect maze and save it as a bitmap
//!
//! The maze is carved with a randomized depth-first search over a square
//! grid. Every cell is a single byte that records both its open passages and
//! the way back to its parent, so backtracking needs no separate stack.
//!
//! # Examples
//! ```
//! use dfs_maze::config::Config;
//! use dfs_maze::bitmap::BitmapHeader;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let config = Config { cells: 3, width: 12, height: 12, ..Config::default() };
//! let maze = dfs_maze::generate_image(&config, StdRng::seed_from_u64(1), |_| ()).unwrap();
//! assert_eq!(maze.grid.passage_count(), 8);
//! println!("{}", maze.grid);
//!
//! let mut bytes = Vec::new();
//! dfs_maze::bitmap::write_bitmap(&mut bytes, &maze.pixels).unwrap();
//! let header = BitmapHeader::parse(&bytes).unwrap();
//! assert_eq!((header.width, header.height), (12, 12));
//! assert_eq!(header.file_size, 486);
//! ```

pub mod bitmap;
pub mod cell;
pub mod config;
pub mod error;
pub mod maze_generator;
pub mod render;

pub use cell::{Cell, Direction, Grid, Passages, Point};
pub use config::Config;
pub use error::{Error, Result};
pub use maze_generator::{MazeGenerator, RandomSource};
pub use render::PixelBuffer;

use log::info;

/// A carved maze and its rendering
pub struct MazeImage {
    pub grid: Grid,
    pub pixels: PixelBuffer,
}

/// Validate `config`, carve a maze with `random` and render it.
///
/// `on_carve` receives the running count of carved cells.
pub fn generate_image<R, F>(config: &Config, random: R, on_carve: F) -> Result<MazeImage>
where
    R: RandomSource,
    F: FnMut(usize),
{
    config.validate()?;
    let mut pixels = PixelBuffer::new(config.width, config.height)?;

    let grid = MazeGenerator::new(config.cells, random)?.generate_with_progress(on_carve);
    info!(
        "Carved {} passages over {} cells",
        grid.passage_count(),
        grid.cells().len()
    );

    render::rasterize(&grid, &mut pixels);
    Ok(MazeImage { grid, pixels })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use crate::bitmap::{write_bitmap, BitmapHeader, HEADER_SIZE};
    use crate::{generate_image, Config, Error, RandomSource};

    struct Zero;

    impl RandomSource for Zero {
        fn below(&mut self, _bound: usize) -> usize {
            0
        }
    }

    fn small_config() -> Config {
        Config {
            cells: 3,
            width: 12,
            height: 12,
            ..Config::default()
        }
    }

    fn encode(config: &Config, seed: u64) -> Vec<u8> {
        let maze = generate_image(config, StdRng::seed_from_u64(seed), |_| ()).unwrap();
        let mut bytes = Vec::new();
        write_bitmap(&mut bytes, &maze.pixels).unwrap();
        bytes
    }

    #[test]
    fn three_by_three_scenario() {
        let maze = generate_image(&small_config(), Zero, |_| ()).unwrap();
        assert_eq!(
            maze.grid.to_bytes(),
            vec![0x02, 0x8a, 0x8c, 0x26, 0x4c, 0x15, 0x11, 0x23, 0x19]
        );
        assert_eq!(maze.pixels.as_bytes().len(), 12 * 12 * 3);

        let mut bytes = Vec::new();
        write_bitmap(&mut bytes, &maze.pixels).unwrap();
        let header = BitmapHeader::parse(&bytes).unwrap();
        assert_eq!(header.width, 12);
        assert_eq!(header.height, 12);
        assert_eq!(header.image_size, 432);
        assert_eq!(header.file_size, 486);
        assert_eq!(u16::from_le_bytes([bytes[28], bytes[29]]), 24);
        assert_eq!(&bytes[HEADER_SIZE..], maze.pixels.as_bytes());
    }

    #[test]
    fn same_seed_same_file() {
        let config = Config {
            cells: 21,
            width: 128,
            height: 128,
            ..Config::default()
        };
        assert_eq!(encode(&config, 9), encode(&config, 9));
        assert_ne!(encode(&config, 9), encode(&config, 10));
    }

    #[test]
    fn default_configuration_end_to_end() {
        let bytes = encode(&Config::default(), 2014);
        assert_eq!(bytes.len(), 54 + 512 * 512 * 3);
        let header = BitmapHeader::parse(&bytes).unwrap();
        assert_eq!((header.width, header.height), (512, 512));
        assert_eq!(header.image_size as usize, 512 * 512 * 3);
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let config = Config {
            cells: 0,
            ..Config::default()
        };
        let mut called = false;
        let res = generate_image(&config, Zero, |_| called = true);
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
        assert!(!called);
    }
}
