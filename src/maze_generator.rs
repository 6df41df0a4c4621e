//! Maze generation
//!
//! Randomized depth-first carving. The grid itself is the backtracking stack:
//! every visited cell remembers the direction it was entered from, so an
//! exhausted cell just follows that pointer back to its parent.

use log::debug;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::cell::{Cell, Direction, Grid, Point};
use crate::error::Result;

/// Source of uniformly distributed integers
pub trait RandomSource {
    /// Uniform integer in `0..bound`; `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn below(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }
}

/// Perfect maze generator
///
/// Owns the grid being carved, the cursor and the random source.
pub struct MazeGenerator<R> {
    grid: Grid,
    cursor: Point,
    random: R,
}

/// [StdRng] seeded from `seed`, or from entropy when there is none
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    if let Some(state) = seed {
        StdRng::seed_from_u64(state)
    } else {
        StdRng::from_entropy()
    }
}

impl MazeGenerator<StdRng> {
    /// Generator backed by [StdRng], see [seeded_rng].
    pub fn seeded(size: usize, seed: Option<u64>) -> Result<Self> {
        Self::new(size, seeded_rng(seed))
    }
}

impl<R: RandomSource> MazeGenerator<R> {
    /// Allocate a `size` x `size` grid and place the cursor on a random cell.
    ///
    /// # Examples
    /// ```
    /// use dfs_maze::maze_generator::MazeGenerator;
    /// use rand::{rngs::StdRng, SeedableRng};
    ///
    /// let gen = MazeGenerator::new(8, StdRng::seed_from_u64(7)).unwrap();
    /// let grid = gen.generate();
    /// assert_eq!(grid.passage_count(), 8 * 8 - 1);
    /// ```
    pub fn new(size: usize, mut random: R) -> Result<Self> {
        let grid = Grid::new(size)?;
        let x = random.below(size);
        let y = random.below(size);
        debug!("Starting {size} x {size} maze at ({x}, {y})");
        Ok(Self {
            grid,
            cursor: Point::new(x, y),
            random,
        })
    }

    /// Current cursor position
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Carve the whole maze and hand back the grid.
    pub fn generate(self) -> Grid {
        self.generate_with_progress(|_| ())
    }

    /// Carve the whole maze, calling `on_carve` with the running count of
    /// carved cells after each one.
    pub fn generate_with_progress<F: FnMut(usize)>(mut self, mut on_carve: F) -> Grid {
        let mut carved = 0;
        while let Some((direction, next)) = self.next_step() {
            self.carve(direction, next);
            carved += 1;
            on_carve(carved);
        }
        debug!(
            "Carved {} cells, generation ended at ({}, {})",
            carved, self.cursor.x, self.cursor.y
        );
        self.grid
    }

    /// First steppable direction and the unvisited neighbor it leads to,
    /// scanning from a random starting direction
    fn scan(&mut self) -> Option<(Direction, Point)> {
        let size = self.grid.size();
        let mut direction = Direction::ALL[self.random.below(Direction::ALL.len())];
        for _ in 0..Direction::ALL.len() {
            if let Some(next) = self.cursor.step(direction, size) {
                if !self.grid.cell(next).is_visited() {
                    return Some((direction, next));
                }
            }
            direction = direction.next();
        }
        None
    }

    /// Find the next cell to carve into, backtracking through exhausted
    /// cells. `None` once the start cell is exhausted.
    fn next_step(&mut self) -> Option<(Direction, Point)> {
        loop {
            if let Some(step) = self.scan() {
                return Some(step);
            }
            let back = self.grid.cell(self.cursor).return_direction()?;
            // Return directions are only written when stepping in from a neighbor
            self.cursor = self
                .cursor
                .step(back, self.grid.size())
                .expect("return direction points back inside the grid");
        }
    }

    /// Open a passage towards `direction` and move into `next`.
    fn carve(&mut self, direction: Direction, next: Point) {
        debug_assert_eq!(self.cursor.step(direction, self.grid.size()), Some(next));
        self.grid.cell_mut(self.cursor).open(direction);
        self.cursor = next;
        *self.grid.cell_mut(next) = Cell::entered(direction);
    }
}
