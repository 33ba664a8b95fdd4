use serde::{Deserialize, Serialize};

use crate::grid::TileOffset;

/// The two coordinate axes of a grid. X runs toward the south-west tile
/// edge, Y toward the south-east one.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X = 0,
    Y = 1,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Axis {
        if v & 1 == 0 {
            Axis::X
        } else {
            Axis::Y
        }
    }
}

/// The four directions across tile edges, clockwise from north-east.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagDirection {
    NorthEast = 0,
    SouthEast = 1,
    SouthWest = 2,
    NorthWest = 3,
}

const DIAG_DIRECTIONS: [DiagDirection; 4] = [
    DiagDirection::NorthEast,
    DiagDirection::SouthEast,
    DiagDirection::SouthWest,
    DiagDirection::NorthWest,
];

impl DiagDirection {
    pub(crate) fn from_u8(v: u8) -> DiagDirection {
        DIAG_DIRECTIONS[(v & 3) as usize]
    }

    pub fn reverse(self) -> DiagDirection {
        Self::from_u8(self as u8 ^ 2)
    }

    /// Rotate clockwise by `steps` quarter turns.
    pub fn rotate(self, steps: u8) -> DiagDirection {
        Self::from_u8((self as u8).wrapping_add(steps))
    }

    pub fn axis(self) -> Axis {
        Axis::from_u8(self as u8 & 1)
    }

    /// Tile offset of the neighbour in this direction.
    pub fn offset(self) -> TileOffset {
        match self {
            DiagDirection::NorthEast => TileOffset::new(-1, 0),
            DiagDirection::SouthEast => TileOffset::new(0, 1),
            DiagDirection::SouthWest => TileOffset::new(1, 0),
            DiagDirection::NorthWest => TileOffset::new(0, -1),
        }
    }
}

/// The eight compass directions, clockwise from north.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

const DIRECTIONS: [Direction; 8] = [
    Direction::North,
    Direction::NorthEast,
    Direction::East,
    Direction::SouthEast,
    Direction::South,
    Direction::SouthWest,
    Direction::West,
    Direction::NorthWest,
];

impl Direction {
    pub(crate) fn from_u8(v: u8) -> Direction {
        DIRECTIONS[(v & 7) as usize]
    }

    pub fn reverse(self) -> Direction {
        Self::from_u8(self as u8 ^ 4)
    }

    /// Rotate clockwise by `steps` eighth turns.
    pub fn rotate(self, steps: u8) -> Direction {
        Self::from_u8((self as u8).wrapping_add(steps))
    }

    /// Whether this direction points across a tile corner rather than an
    /// edge.
    pub fn is_diagonal(self) -> bool {
        self as u8 & 1 != 0
    }

    /// Collapse to the nearest edge direction, rounding clockwise.
    pub fn to_diag(self) -> DiagDirection {
        DiagDirection::from_u8(self as u8 >> 1)
    }
}

impl From<DiagDirection> for Direction {
    fn from(d: DiagDirection) -> Direction {
        Direction::from_u8(d as u8 * 2 + 1)
    }
}
