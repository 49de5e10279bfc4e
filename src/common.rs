//! Common types: shot outcomes, responses and board errors.

use serde::{Deserialize, Serialize};

/// Result of resolving a single shot against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// The shot struck an intact ship cell.
    Hit,
    /// The shot found water, an earlier miss or an already struck cell.
    Miss,
}

/// Response code the server writes into the game action record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Hit,
    Miss,
    Won,
    Walkover,
    Lost,
}

impl From<ShotOutcome> for Response {
    fn from(outcome: ShotOutcome) -> Self {
        match outcome {
            ShotOutcome::Hit => Response::Hit,
            ShotOutcome::Miss => Response::Miss,
        }
    }
}

/// Errors returned by board operations.
#[derive(Debug, PartialEq, Eq)]
pub enum BoardError {
    /// Coordinate lies outside the grid.
    OutOfBounds { x: usize, y: usize },
}

impl core::fmt::Display for BoardError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BoardError::OutOfBounds { x, y } => {
                write!(f, "Coordinate ({}, {}) is out of bounds", x, y)
            }
        }
    }
}

impl std::error::Error for BoardError {}
