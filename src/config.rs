//! Generation settings

use std::path::PathBuf;

use log::warn;

use crate::bitmap::BitmapHeader;
use crate::error::{Error, Result};

/// Cells along one side of the maze
pub const DEFAULT_CELLS: usize = 63;
/// Width and height of the image in pixels
pub const DEFAULT_IMAGE_SIZE: usize = 512;
pub const DEFAULT_OUTPUT: &str = "Maze.bmp";

/// What to generate and where to save it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cells along one side of the square maze
    pub cells: usize,
    /// Image width in pixels
    pub width: usize,
    /// Image height in pixels
    pub height: usize,
    /// Output bitmap path
    pub output: PathBuf,
    /// Random seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cells: DEFAULT_CELLS,
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
        }
    }
}

impl Config {
    /// Side length of one cell in pixels
    pub fn cell_size(&self) -> usize {
        self.width.checked_div(self.cells).unwrap_or(0)
    }

    /// Reject settings that would give degenerate geometry.
    ///
    /// # Examples
    /// ```
    /// use dfs_maze::config::Config;
    ///
    /// assert!(Config::default().validate().is_ok());
    /// let tiny = Config { width: 10, ..Config::default() };
    /// assert!(tiny.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.cells == 0 {
            return Err(Error::InvalidConfig(
                "maze must have at least one cell".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "image size {} x {} is empty",
                self.width, self.height
            )));
        }
        if self.cell_size() == 0 {
            return Err(Error::InvalidConfig(format!(
                "image width {} is too small for {} cells",
                self.width, self.cells
            )));
        }
        if self.height / self.cell_size() < self.cells {
            return Err(Error::InvalidConfig(format!(
                "image height {} cannot hold {} rows of {} px cells",
                self.height,
                self.cells,
                self.cell_size()
            )));
        }
        BitmapHeader::new(self.width, self.height)?;

        let covered = self.cells * self.cell_size();
        if covered != self.width {
            warn!(
                "{} cells of {} px leave {} px of border",
                self.cells,
                self.cell_size(),
                self.width - covered
            );
        }
        Ok(())
    }
}
