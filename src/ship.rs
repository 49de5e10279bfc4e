//! Ship orientation and placement geometry.

use core::fmt;

use crate::config::{DIMENSION, SHIP_LENGTH};

/// Orientation of a ship around its center cell.
///
/// Rows grow downward, so `DiagonalRising` runs from bottom-left to top-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
    DiagonalRising,
    DiagonalFalling,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::DiagonalRising,
        Orientation::DiagonalFalling,
    ];

    /// Decode the numeric code typed by a player (`0`-`3`).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Orientation::Horizontal),
            1 => Some(Orientation::Vertical),
            2 => Some(Orientation::DiagonalRising),
            3 => Some(Orientation::DiagonalFalling),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
            Orientation::DiagonalRising => 2,
            Orientation::DiagonalFalling => 3,
        }
    }

    /// Offset from the center to the cell following it.
    fn step(self) -> (isize, isize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
            Orientation::DiagonalRising => (1, -1),
            Orientation::DiagonalFalling => (1, 1),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Horizontal => "HORIZONTAL",
            Orientation::Vertical => "VERTICAL",
            Orientation::DiagonalRising => "DIAGONAL RISING",
            Orientation::DiagonalFalling => "DIAGONAL FALLING",
        };
        f.write_str(name)
    }
}

/// A ship centered at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipPlacement {
    pub x: usize,
    pub y: usize,
    pub orientation: Orientation,
}

impl ShipPlacement {
    pub fn new(x: usize, y: usize, orientation: Orientation) -> Self {
        Self { x, y, orientation }
    }

    /// Build a placement from the raw registration values. Returns `None` for
    /// an unknown orientation code or a center outside the grid.
    pub fn from_raw(x: i32, y: i32, orientation: i32) -> Option<Self> {
        let orientation = Orientation::from_code(orientation)?;
        let x = usize::try_from(x).ok().filter(|&x| x < DIMENSION)?;
        let y = usize::try_from(y).ok().filter(|&y| y < DIMENSION)?;
        Some(Self::new(x, y, orientation))
    }

    /// The occupied cells as `(x, y)`, or `None` if any falls off the board.
    pub fn cells(&self) -> Option<[(usize, usize); SHIP_LENGTH]> {
        let (dx, dy) = self.orientation.step();
        let center = (self.x as isize, self.y as isize);
        let mut cells = [(0, 0); SHIP_LENGTH];
        for (i, offset) in (-1isize..=1).enumerate() {
            let x = center.0 + dx * offset;
            let y = center.1 + dy * offset;
            if !in_bounds(x) || !in_bounds(y) {
                return None;
            }
            cells[i] = (x as usize, y as usize);
        }
        Some(cells)
    }
}

fn in_bounds(v: isize) -> bool {
    v >= 0 && (v as usize) < DIMENSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_ship_spans_rows_around_center() {
        let ship = ShipPlacement::new(2, 2, Orientation::Vertical);
        assert_eq!(ship.cells(), Some([(2, 1), (2, 2), (2, 3)]));
    }

    #[test]
    fn rising_diagonal_goes_up_and_right() {
        let ship = ShipPlacement::new(1, 1, Orientation::DiagonalRising);
        assert_eq!(ship.cells(), Some([(0, 2), (1, 1), (2, 0)]));
    }

    #[test]
    fn edge_center_is_rejected() {
        assert_eq!(ShipPlacement::new(0, 1, Orientation::Horizontal).cells(), None);
        assert_eq!(ShipPlacement::new(3, 3, Orientation::DiagonalFalling).cells(), None);
    }

    #[test]
    fn raw_values_are_checked() {
        assert!(ShipPlacement::from_raw(1, 1, 4).is_none());
        assert!(ShipPlacement::from_raw(-1, 1, 0).is_none());
        assert!(ShipPlacement::from_raw(1, 4, 0).is_none());
        assert_eq!(
            ShipPlacement::from_raw(1, 2, 1),
            Some(ShipPlacement::new(1, 2, Orientation::Vertical))
        );
    }
}
