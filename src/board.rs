//! Board state: the server's per-player grids and the client's target view.

use core::fmt;

use crate::common::{BoardError, Response, ShotOutcome};
use crate::config::DIMENSION;
use crate::ship::ShipPlacement;

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Free,
    Occupied,
    Hit,
    Miss,
}

impl Cell {
    fn symbol(self) -> char {
        match self {
            Cell::Free => '.',
            Cell::Occupied => 'S',
            Cell::Hit => 'X',
            Cell::Miss => 'O',
        }
    }
}

/// A player's grid as held by the server, indexed `[x][y]`.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; DIMENSION]; DIMENSION],
}

impl Board {
    /// Create an empty board (no ship placed).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<Cell, BoardError> {
        check_bounds(x, y)?;
        Ok(self.cells[x][y])
    }

    /// Commit a ship. A placement that leaves the grid is ignored and the
    /// board stays untouched; returns whether the ship was placed.
    pub fn place(&mut self, ship: &ShipPlacement) -> bool {
        match ship.cells() {
            Some(cells) => {
                for (x, y) in cells {
                    self.cells[x][y] = Cell::Occupied;
                }
                true
            }
            None => false,
        }
    }

    /// Resolve a shot at (`x`, `y`). Only an intact ship cell scores; it then
    /// turns into `Hit` and can never score again.
    pub fn shoot(&mut self, x: usize, y: usize) -> Result<ShotOutcome, BoardError> {
        check_bounds(x, y)?;
        let cell = &mut self.cells[x][y];
        match *cell {
            Cell::Occupied => {
                *cell = Cell::Hit;
                Ok(ShotOutcome::Hit)
            }
            Cell::Free => {
                *cell = Cell::Miss;
                Ok(ShotOutcome::Miss)
            }
            Cell::Hit | Cell::Miss => Ok(ShotOutcome::Miss),
        }
    }

    /// Number of struck ship cells.
    pub fn hits(&self) -> usize {
        self.count(Cell::Hit)
    }

    /// Number of ship cells not yet struck.
    pub fn intact(&self) -> usize {
        self.count(Cell::Occupied)
    }

    /// Coordinates of every cell currently in `state`.
    pub fn cells_in(&self, state: Cell) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for x in 0..DIMENSION {
            for y in 0..DIMENSION {
                if self.cells[x][y] == state {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn count(&self, state: Cell) -> usize {
        self.cells
            .iter()
            .flat_map(|col| col.iter())
            .filter(|&&c| c == state)
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, |x, y| self.cells[x][y].symbol())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        write_grid(f, |x, y| self.cells[x][y].symbol())?;
        write!(f, "}}")
    }
}

/// The client's picture of the opponent board. Ship cells are never known,
/// so only `Free`, `Hit` and `Miss` ever appear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TargetBoard {
    cells: [[Cell; DIMENSION]; DIMENSION],
    hits: usize,
}

impl TargetBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the server's answer to our shot at (`x`, `y`).
    pub fn record(&mut self, x: usize, y: usize, response: Response) -> Result<(), BoardError> {
        check_bounds(x, y)?;
        let cell = &mut self.cells[x][y];
        match response {
            Response::Hit | Response::Won => {
                *cell = Cell::Hit;
                self.hits += 1;
            }
            Response::Miss => {
                if *cell != Cell::Hit {
                    *cell = Cell::Miss;
                }
            }
            Response::Walkover | Response::Lost => {}
        }
        Ok(())
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<Cell, BoardError> {
        check_bounds(x, y)?;
        Ok(self.cells[x][y])
    }

    /// Hits confirmed by the server so far.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

impl fmt::Display for TargetBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, |x, y| self.cells[x][y].symbol())
    }
}

fn check_bounds(x: usize, y: usize) -> Result<(), BoardError> {
    if x < DIMENSION && y < DIMENSION {
        Ok(())
    } else {
        Err(BoardError::OutOfBounds { x, y })
    }
}

// One row per `y`, columns by `x`.
fn write_grid(f: &mut fmt::Formatter<'_>, symbol: impl Fn(usize, usize) -> char) -> fmt::Result {
    for y in 0..DIMENSION {
        for x in 0..DIMENSION {
            write!(f, "{} ", symbol(x, y))?;
        }
        writeln!(f)?;
    }
    Ok(())
}
