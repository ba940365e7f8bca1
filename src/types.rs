//! various types that are useful for working with puzzle boards
use serde::{Deserialize, Serialize};
use std::fmt;

/// A piece that can occupy a cell of a board.
///
/// Every variant has exactly one numeric code, see [`PieceType::as_u8`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PieceType {
    /// Outside the playable area. Only ever returned by bounds-safe lookups,
    /// never stored in a grid.
    Void = 0,
    /// An empty, traversable cell
    None = 1,
    /// Stops movement
    Block = 2,
    /// One end of a teleporter pair
    Teleporter = 3,
    #[allow(missing_docs)]
    Corner1 = 4,
    #[allow(missing_docs)]
    Corner2 = 5,
    #[allow(missing_docs)]
    Corner3 = 6,
    #[allow(missing_docs)]
    Corner4 = 7,
    /// The winning cell
    Target = 8,
}

impl PieceType {
    /// the numeric code of this piece
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// true for the four deflector rotations
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            PieceType::Corner1 | PieceType::Corner2 | PieceType::Corner3 | PieceType::Corner4
        )
    }

    /// true for pieces a start cell may not sit on
    pub fn is_obstacle(self) -> bool {
        self == PieceType::Block || self == PieceType::Teleporter || self.is_corner()
    }

    /// the single character used when printing a board
    pub fn glyph(self) -> char {
        match self {
            PieceType::Void => ' ',
            PieceType::None => '.',
            PieceType::Block => '#',
            PieceType::Teleporter => 'T',
            PieceType::Corner1 => '1',
            PieceType::Corner2 => '2',
            PieceType::Corner3 => '3',
            PieceType::Corner4 => '4',
            PieceType::Target => 'X',
        }
    }
}

impl Default for PieceType {
    fn default() -> Self {
        PieceType::None
    }
}

impl TryFrom<u8> for PieceType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => PieceType::Void,
            1 => PieceType::None,
            2 => PieceType::Block,
            3 => PieceType::Teleporter,
            4 => PieceType::Corner1,
            5 => PieceType::Corner2,
            6 => PieceType::Corner3,
            7 => PieceType::Corner4,
            8 => PieceType::Target,
            other => return Err(other),
        })
    }
}

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    /// x offset
    pub x: i32,
    /// y offset
    pub y: i32,
}

/// A cell coordinate. The origin is the bottom left cell of the board.
///
/// Signed so that probes just off the board (and coordinates mid-shift while
/// a board is being resized) are representable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[allow(missing_docs)]
    pub fn add_vec(&self, v: Vector) -> Position {
        Position {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }

    #[allow(missing_docs)]
    pub fn sub_vec(&self, v: Vector) -> Position {
        Position {
            x: self.x - v.x,
            y: self.y - v.y,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// One of the two board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// the x axis, grown and shrunk by adding or removing columns
    Width,
    /// the y axis, grown and shrunk by adding or removing rows
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

/// A board boundary at which a row or column can be inserted or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    Top,
    #[allow(missing_docs)]
    Bottom,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Left => write!(f, "left"),
            Edge::Right => write!(f, "right"),
            Edge::Top => write!(f, "top"),
            Edge::Bottom => write!(f, "bottom"),
        }
    }
}

impl Edge {
    /// the axis that changes length when this edge moves
    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Width,
            Edge::Top | Edge::Bottom => Axis::Height,
        }
    }

    /// whether this edge touches the origin. Inserting or removing here moves
    /// every stored coordinate.
    pub fn is_near_origin(self) -> bool {
        matches!(self, Edge::Left | Edge::Bottom)
    }

    /// the unit vector pointing away from the origin along this edge's axis
    pub fn to_vector(self) -> Vector {
        match self.axis() {
            Axis::Width => Vector { x: 1, y: 0 },
            Axis::Height => Vector { x: 0, y: 1 },
        }
    }

    /// returns all four edges
    pub fn all() -> [Edge; 4] {
        [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_codes_are_unique() {
        for code in 0..=8u8 {
            let piece = PieceType::try_from(code).unwrap();
            assert_eq!(piece.as_u8(), code);
        }
        assert_eq!(PieceType::try_from(9u8), Err(9));
    }

    #[test]
    fn test_obstacles() {
        assert!(PieceType::Corner3.is_obstacle());
        assert!(PieceType::Teleporter.is_obstacle());
        assert!(!PieceType::Target.is_obstacle());
        assert!(!PieceType::None.is_obstacle());
    }

    #[test]
    fn test_edge_axes() {
        assert_eq!(Edge::Left.axis(), Axis::Width);
        assert_eq!(Edge::Top.axis(), Axis::Height);
        assert!(Edge::Bottom.is_near_origin());
        assert!(!Edge::Right.is_near_origin());
        let p = Position::new(3, 4);
        assert_eq!(p.add_vec(Edge::Bottom.to_vector()), Position::new(3, 5));
        assert_eq!(p.sub_vec(Edge::Left.to_vector()), Position::new(2, 4));
    }
}
