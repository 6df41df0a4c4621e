//! Grid cells and their one-byte encoding
//!
//! Each cell is stored in a single byte. The low nibble is the set of open
//! passages, the high nibble is the direction back to the cell it was entered
//! from. An all-zero byte means the cell has not been visited yet.

use std::fmt;

use bitflags::bitflags;
use itertools::Itertools;

use crate::error::{self, Error, Result};

/// One of the four grid directions
///
/// The discriminants are single-bit flags, so that they can be combined into
/// [Passages]. The "no direction" sentinel of the byte encoding is
/// represented by `None` wherever an `Option<Direction>` is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0b0001,
    Right = 0b0010,
    Down = 0b0100,
    Left = 0b1000,
}

impl Direction {
    /// All directions in scan order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Flag value of the direction
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a single flag; anything else (including 0) is no direction.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b0001 => Some(Direction::Up),
            0b0010 => Some(Direction::Right),
            0b0100 => Some(Direction::Down),
            0b1000 => Some(Direction::Left),
            _ => None,
        }
    }

    /// Up <-> Down, Right <-> Left
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    /// The next direction in scan order, wrapping Left -> Up
    pub const fn next(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Coordinate offset `(dx, dy)` of one step; y grows downwards.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Passage flag corresponding to this direction
    pub const fn passage(self) -> Passages {
        Passages::from_bits_retain(self.bits())
    }
}

bitflags! {
    /// Open passages of a cell (low nibble of the cell byte)
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Passages: u8 {
        const UP = 0b0001;
        const RIGHT = 0b0010;
        const DOWN = 0b0100;
        const LEFT = 0b1000;
    }
}

/// Encoded state of a single grid cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell(u8);

impl Cell {
    /// Never visited
    pub const UNVISITED: Cell = Cell(0);

    /// Raw byte value
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Self {
        Cell(bits)
    }

    /// State of a cell that was just entered by moving in `heading`.
    ///
    /// Both nibbles hold the way back: it is the only open passage so far,
    /// and it is the permanent return direction.
    pub const fn entered(heading: Direction) -> Self {
        let back = heading.opposite().bits();
        Cell(back | back << 4)
    }

    pub const fn is_visited(self) -> bool {
        self.0 != 0
    }

    pub fn passages(self) -> Passages {
        Passages::from_bits_truncate(self.0 & 0x0f)
    }

    pub fn is_open(self, direction: Direction) -> bool {
        self.passages().contains(direction.passage())
    }

    /// Direction towards the parent cell, `None` for the start cell
    pub const fn return_direction(self) -> Option<Direction> {
        Direction::from_bits(self.0 >> 4)
    }

    /// Record an open passage, leaving the return direction untouched.
    pub fn open(&mut self, direction: Direction) {
        self.0 |= direction.bits();
    }
}

/// Location in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Point { x, y }
    }

    /// Neighbor one step towards `direction`, if it lies within a
    /// `size` x `size` grid.
    pub fn step(self, direction: Direction, size: usize) -> Option<Point> {
        let (dx, dy) = direction.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < size && y < size).then_some(Point { x, y })
    }
}

/// Square grid of encoded cells, stored row-major
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate a `size` x `size` grid of unvisited cells.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidConfig(
                "maze must have at least one cell".to_string(),
            ));
        }
        let len = size
            .checked_mul(size)
            .ok_or(Error::Allocation { bytes: usize::MAX })?;
        Ok(Grid {
            size,
            cells: error::zeroed(len)?,
        })
    }

    /// Number of cells along one side
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, point: Point) -> usize {
        point.x + self.size * point.y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.size && point.y < self.size
    }

    /// Cell at `point`
    ///
    /// Panics if `point` is outside the grid.
    pub fn cell(&self, point: Point) -> Cell {
        self.cells[self.index(point)]
    }

    pub(crate) fn cell_mut(&mut self, point: Point) -> &mut Cell {
        let idx = self.index(point);
        &mut self.cells[idx]
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Raw cell bytes in row-major order
    pub fn to_bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.bits()).collect()
    }

    /// Can the cursor at `from` carve towards `direction`?
    ///
    /// True when the neighbor exists and has never been visited.
    pub fn is_steppable(&self, from: Point, direction: Direction) -> bool {
        from.step(direction, self.size)
            .is_some_and(|next| !self.cell(next).is_visited())
    }

    /// Number of carved connections, each counted once
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|c| {
                (c.passages() & (Passages::RIGHT | Passages::DOWN))
                    .bits()
                    .count_ones() as usize
            })
            .sum()
    }

    /// Number of cells that have been visited
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_visited()).count()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("visited", &self.visited_count())
            .finish()
    }
}

/// Text drawing of the maze, `+--+` walls and `|` sides
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wall = |x: usize, y: usize, direction: Direction| {
            !self.cell(Point::new(x, y)).is_open(direction)
        };

        for y in 0..self.size {
            let top = (0..self.size)
                .map(|x| if wall(x, y, Direction::Up) { "--" } else { "  " })
                .join("+");
            writeln!(f, "+{}+", top)?;

            let sides = (0..self.size)
                .map(|x| if wall(x, y, Direction::Left) { "|  " } else { "   " })
                .join("");
            let last = if wall(self.size - 1, y, Direction::Right) {
                "|"
            } else {
                " "
            };
            writeln!(f, "{}{}", sides, last)?;
        }

        let bottom = (0..self.size)
            .map(|x| {
                if wall(x, self.size - 1, Direction::Down) {
                    "--"
                } else {
                    "  "
                }
            })
            .join("+");
        write!(f, "+{}+", bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, Direction, Grid, Passages, Point};

    #[test]
    fn opposite_directions() {
        for dir in Direction::ALL {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
            let (dx, dy) = dir.offset();
            assert_eq!(dir.opposite().offset(), (-dx, -dy));
        }
    }

    #[test]
    fn scan_order_wraps_around() {
        assert_eq!(Direction::Left.next(), Direction::Up);
        let mut dir = Direction::Right;
        let mut seen = vec![];
        for _ in 0..4 {
            seen.push(dir);
            dir = dir.next();
        }
        assert_eq!(
            seen,
            vec![Direction::Right, Direction::Down, Direction::Left, Direction::Up]
        );
    }

    #[test]
    fn direction_bits_are_single_flags() {
        assert_eq!(Direction::from_bits(0), None);
        assert_eq!(Direction::from_bits(0b0011), None);
        for dir in Direction::ALL {
            assert_eq!(dir.bits().count_ones(), 1);
            assert_eq!(Direction::from_bits(dir.bits()), Some(dir));
        }
    }

    #[test]
    fn entered_cell_points_back() {
        let cell = Cell::entered(Direction::Right);
        assert_eq!(cell.bits(), 0x88);
        assert!(cell.is_visited());
        assert_eq!(cell.passages(), Passages::LEFT);
        assert_eq!(cell.return_direction(), Some(Direction::Left));
    }

    #[test]
    fn opening_keeps_return_direction() {
        let mut cell = Cell::entered(Direction::Up);
        cell.open(Direction::Left);
        cell.open(Direction::Right);
        assert_eq!(cell.bits(), 0x4e);
        assert_eq!(cell.return_direction(), Some(Direction::Down));
        assert!(cell.is_open(Direction::Down));
        assert!(!cell.is_open(Direction::Up));
    }

    #[test]
    fn start_cell_has_no_return_direction() {
        let mut cell = Cell::UNVISITED;
        assert!(!cell.is_visited());
        cell.open(Direction::Down);
        assert!(cell.is_visited());
        assert_eq!(cell.return_direction(), None);
    }

    #[test]
    fn steps_stay_inside_grid() {
        let corner = Point::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 3), None);
        assert_eq!(corner.step(Direction::Left, 3), None);
        assert_eq!(corner.step(Direction::Right, 3), Some(Point::new(1, 0)));
        assert_eq!(corner.step(Direction::Down, 3), Some(Point::new(0, 1)));
        assert_eq!(Point::new(2, 2).step(Direction::Right, 3), None);
        assert_eq!(Point::new(2, 2).step(Direction::Down, 3), None);
    }

    #[test]
    fn steppable_only_towards_unvisited_neighbors() {
        let mut grid = Grid::new(2).unwrap();
        let origin = Point::new(0, 0);
        assert!(grid.is_steppable(origin, Direction::Right));
        assert!(!grid.is_steppable(origin, Direction::Up));

        *grid.cell_mut(Point::new(1, 0)) = Cell::entered(Direction::Right);
        assert!(!grid.is_steppable(origin, Direction::Right));
        assert!(grid.is_steppable(origin, Direction::Down));
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(Grid::new(0).is_err());
    }

    #[test]
    fn fresh_grid_is_unvisited() {
        let grid = Grid::new(4).unwrap();
        assert_eq!(grid.cells().len(), 16);
        assert_eq!(grid.visited_count(), 0);
        assert_eq!(grid.passage_count(), 0);
    }
}
