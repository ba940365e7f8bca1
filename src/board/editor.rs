//! Growing and shrinking a board one row or column at a time.
//!
//! Inserting at the left or bottom edge moves the origin, so every stored
//! coordinate is shifted along with the grid. Removing an edge first releases
//! each cell on it (teleporter pairs, the start and the target) and only then
//! deletes and shifts, so the release step compares against unshifted
//! coordinates.
use serde::{Deserialize, Serialize};
use std::iter;
use tracing::trace;

use super::Board;
use crate::error::EditError;
use crate::types::{Axis, Edge, PieceType, Position};

/// Boards never shrink below this many cells on either axis
pub const MIN_BOARD_LEN: u8 = 2;

/// Widths and heights are written as a single byte
pub const MAX_BOARD_LEN: u8 = u8::MAX;

/// How far a board may grow on this installation.
///
/// Players unlock larger boards as they progress, so the host usually builds
/// this with [`BoardLimits::for_level`]. Both maxima are still capped at
/// [`MAX_BOARD_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardLimits {
    #[allow(missing_docs)]
    pub max_width: u8,
    #[allow(missing_docs)]
    pub max_height: u8,
}

impl Default for BoardLimits {
    fn default() -> Self {
        Self {
            max_width: MAX_BOARD_LEN,
            max_height: MAX_BOARD_LEN,
        }
    }
}

impl BoardLimits {
    /// Limits for a player who has reached the given level
    pub fn for_level(level: u32) -> Self {
        let max = level.min(MAX_BOARD_LEN as u32) as u8;
        Self {
            max_width: max,
            max_height: max,
        }
    }

    /// Loads limits from a settings document, missing fields fall back to
    /// [`MAX_BOARD_LEN`]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// the maximum length for an axis
    pub fn max(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Width => self.max_width,
            Axis::Height => self.max_height,
        }
    }
}

impl Board {
    /// the current length of an axis
    pub fn axis_len(&self, axis: Axis) -> u8 {
        match axis {
            Axis::Width => self.width,
            Axis::Height => self.height,
        }
    }

    /// whether a row or column can be removed along this axis
    pub fn can_shrink(&self, axis: Axis) -> bool {
        self.axis_len(axis) > MIN_BOARD_LEN
    }

    /// whether a row or column can be added along this axis
    pub fn can_grow(&self, axis: Axis, limits: &BoardLimits) -> bool {
        let len = self.axis_len(axis);
        len < limits.max(axis) && len < MAX_BOARD_LEN
    }

    /// Adds an empty row at the top or bottom edge
    pub fn insert_row(&mut self, edge: Edge, limits: &BoardLimits) -> Result<(), EditError> {
        check_axis(edge, Axis::Height)?;
        self.insert_at(edge, limits)
    }

    /// Removes the row at the top or bottom edge
    pub fn remove_row(&mut self, edge: Edge) -> Result<(), EditError> {
        check_axis(edge, Axis::Height)?;
        self.remove_at(edge)
    }

    /// Adds an empty column at the left or right edge
    pub fn insert_column(&mut self, edge: Edge, limits: &BoardLimits) -> Result<(), EditError> {
        check_axis(edge, Axis::Width)?;
        self.insert_at(edge, limits)
    }

    /// Removes the column at the left or right edge
    pub fn remove_column(&mut self, edge: Edge) -> Result<(), EditError> {
        check_axis(edge, Axis::Width)?;
        self.remove_at(edge)
    }

    fn insert_at(&mut self, edge: Edge, limits: &BoardLimits) -> Result<(), EditError> {
        let axis = edge.axis();
        if !self.can_grow(axis, limits) {
            return Err(EditError::CannotGrow {
                axis,
                len: self.axis_len(axis),
                max: limits.max(axis).min(MAX_BOARD_LEN),
            });
        }

        let width = self.width as usize;
        match edge {
            Edge::Left => {
                self.grid = self
                    .grid
                    .chunks(width)
                    .flat_map(|row| iter::once(PieceType::None).chain(row.iter().copied()))
                    .collect();
                self.width += 1;
            }
            Edge::Right => {
                self.grid = self
                    .grid
                    .chunks(width)
                    .flat_map(|row| row.iter().copied().chain(iter::once(PieceType::None)))
                    .collect();
                self.width += 1;
            }
            Edge::Bottom => {
                self.grid.splice(0..0, iter::repeat(PieceType::None).take(width));
                self.height += 1;
            }
            Edge::Top => {
                self.grid.extend(iter::repeat(PieceType::None).take(width));
                self.height += 1;
            }
        }

        if edge.is_near_origin() {
            self.shift_origin(|p| p.add_vec(edge.to_vector()));
        }
        Ok(())
    }

    fn remove_at(&mut self, edge: Edge) -> Result<(), EditError> {
        let axis = edge.axis();
        if !self.can_shrink(axis) {
            return Err(EditError::CannotShrink {
                axis,
                len: self.axis_len(axis),
            });
        }

        // release everything on the edge before the grid or any coordinate moves
        for position in self.edge_positions(edge) {
            self.release_cell(position);
        }

        let width = self.width as usize;
        match edge {
            Edge::Left => {
                self.grid = self
                    .grid
                    .chunks(width)
                    .flat_map(|row| row[1..].iter().copied())
                    .collect();
                self.width -= 1;
            }
            Edge::Right => {
                self.grid = self
                    .grid
                    .chunks(width)
                    .flat_map(|row| row[..width - 1].iter().copied())
                    .collect();
                self.width -= 1;
            }
            Edge::Bottom => {
                self.grid.drain(0..width);
                self.height -= 1;
            }
            Edge::Top => {
                let len = self.grid.len();
                self.grid.truncate(len - width);
                self.height -= 1;
            }
        }

        if edge.is_near_origin() {
            self.shift_origin(|p| p.sub_vec(edge.to_vector()));
        }
        Ok(())
    }

    fn edge_positions(&self, edge: Edge) -> Vec<Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        match edge {
            Edge::Left => (0..height).map(|y| Position::new(0, y)).collect(),
            Edge::Right => (0..height).map(|y| Position::new(width - 1, y)).collect(),
            Edge::Bottom => (0..width).map(|x| Position::new(x, 0)).collect(),
            Edge::Top => (0..width).map(|x| Position::new(x, height - 1)).collect(),
        }
    }

    /// Detaches a cell that is about to be deleted from everything that
    /// refers to it.
    fn release_cell(&mut self, position: Position) {
        if self.piece(position) == PieceType::Teleporter {
            self.remove_teleporter_pair(position);
        }
        if self.start == Some(position) {
            trace!(%position, "clearing start");
            self.start = None;
        }
        if self.target == Some(position) {
            trace!(%position, "clearing target");
            self.target = None;
        }
    }

    /// Drops the pair a teleporter belongs to. The partner cell goes back to
    /// `None`; the cell at `position` itself is left for the caller.
    pub(crate) fn remove_teleporter_pair(&mut self, position: Position) {
        let pair = match self.teleporter_pair_index(position) {
            Some(pair) => pair,
            None => return,
        };
        let first = pair * 2;
        let end = (first + 2).min(self.teleporters.len());
        let removed: Vec<Position> = self.teleporters.drain(first..end).collect();
        trace!(%position, pair, ends = removed.len(), "removing teleporter pair");

        for partner in removed.into_iter().filter(|t| *t != position) {
            self.set_piece(partner, PieceType::None);
        }
    }

    fn shift_origin(&mut self, shift: impl Fn(Position) -> Position) {
        for t in self.teleporters.iter_mut() {
            *t = shift(*t);
        }
        self.start = self.start.map(&shift);
        self.target = self.target.map(&shift);
    }
}

fn check_axis(edge: Edge, axis: Axis) -> Result<(), EditError> {
    if edge.axis() == axis {
        Ok(())
    } else {
        Err(EditError::WrongAxis { edge, axis })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authored_board() -> Board {
        let mut board = Board::new(4, 3);
        board.set_start(Some(Position::new(0, 1)));
        board.set_target(Some(Position::new(3, 2)));
        board.set_piece(Position::new(1, 1), PieceType::Block);
        board.set_piece(Position::new(2, 0), PieceType::Corner2);
        board.place_teleporter(Position::new(0, 0));
        board.place_teleporter(Position::new(2, 2));
        board.place_teleporter(Position::new(1, 2));
        board.place_teleporter(Position::new(3, 0));
        assert!(board.assert_consistency());
        board
    }

    #[test]
    fn test_insert_left_shifts_everything() {
        let mut board = authored_board();
        board.insert_column(Edge::Left, &BoardLimits::default()).unwrap();

        assert_eq!(board.width(), 5);
        assert_eq!(board.start(), Some(Position::new(1, 1)));
        assert_eq!(board.target(), Some(Position::new(4, 2)));
        assert_eq!(board.piece(Position::new(2, 1)), PieceType::Block);
        assert_eq!(board.piece(Position::new(3, 0)), PieceType::Corner2);
        assert_eq!(
            board.teleporters(),
            &[
                Position::new(1, 0),
                Position::new(3, 2),
                Position::new(4, 0),
                Position::new(2, 2)
            ]
        );
        for y in 0..3 {
            assert_eq!(board.piece(Position::new(0, y)), PieceType::None);
        }
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_insert_top_and_right_keep_coordinates() {
        let original = authored_board();
        let mut board = original.clone();
        let limits = BoardLimits::default();
        board.insert_row(Edge::Top, &limits).unwrap();
        board.insert_column(Edge::Right, &limits).unwrap();

        assert_eq!((board.width(), board.height()), (5, 4));
        assert_eq!(board.start(), original.start());
        assert_eq!(board.target(), original.target());
        assert_eq!(board.teleporters(), original.teleporters());
        for p in original.positions() {
            assert_eq!(board.piece(p), original.piece(p));
        }
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_insert_then_remove_restores_board() {
        let limits = BoardLimits::default();
        for edge in Edge::all() {
            let original = authored_board();
            let mut board = original.clone();
            match edge.axis() {
                Axis::Width => {
                    board.insert_column(edge, &limits).unwrap();
                    board.remove_column(edge).unwrap();
                }
                Axis::Height => {
                    board.insert_row(edge, &limits).unwrap();
                    board.remove_row(edge).unwrap();
                }
            }
            assert_eq!(board, original, "edge {}", edge);
        }
    }

    #[test]
    fn test_remove_bottom_releases_teleporter_pairs() {
        let mut board = authored_board();
        board.remove_row(Edge::Bottom).unwrap();

        // both pairs had one end on row 0, so both partners are gone as well
        assert!(board.teleporters().is_empty());
        assert_eq!(board.height(), 2);
        assert_eq!(board.piece(Position::new(2, 1)), PieceType::None);
        assert_eq!(board.piece(Position::new(1, 1)), PieceType::None);
        assert_eq!(board.start(), Some(Position::new(0, 0)));
        assert_eq!(board.target(), Some(Position::new(3, 1)));
        assert_eq!(board.piece(Position::new(1, 0)), PieceType::Block);
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_remove_edge_with_both_ends_of_a_pair() {
        let mut board = Board::new(3, 3);
        board.place_teleporter(Position::new(2, 0));
        board.place_teleporter(Position::new(2, 2));
        board.place_teleporter(Position::new(0, 1));
        board.place_teleporter(Position::new(1, 1));
        board.remove_column(Edge::Right).unwrap();

        assert_eq!(
            board.teleporters(),
            &[Position::new(0, 1), Position::new(1, 1)]
        );
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_remove_clears_start_and_target() {
        let mut board = authored_board();
        board.remove_column(Edge::Left).unwrap();
        assert_eq!(board.start(), None);
        // teleporter pair 0 had an end at (0, 0), its partner moved from (2, 2) to (1, 2)
        assert_eq!(board.piece(Position::new(1, 2)), PieceType::None);
        assert_eq!(
            board.teleporters(),
            &[Position::new(2, 0), Position::new(0, 2)]
        );
        assert_eq!(board.target(), Some(Position::new(2, 2)));

        board.remove_row(Edge::Top).unwrap();
        assert_eq!(board.target(), None);
        assert!(board.positions().all(|p| board.piece(p) != PieceType::Target));
        assert!(board.teleporters().is_empty());
        assert_eq!(board.piece(Position::new(2, 0)), PieceType::None);
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_remove_start_on_teleporter() {
        let mut board = Board::new(3, 3);
        board.place_teleporter(Position::new(0, 1));
        board.place_teleporter(Position::new(2, 1));
        board.set_start(Some(Position::new(0, 1)));
        board.remove_column(Edge::Left).unwrap();

        assert_eq!(board.start(), None);
        assert!(board.teleporters().is_empty());
        assert_eq!(board.piece(Position::new(1, 1)), PieceType::None);
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_remove_lone_teleporter() {
        let mut board = Board::new(3, 3);
        board.place_teleporter(Position::new(0, 0));
        board.place_teleporter(Position::new(2, 2));
        board.place_teleporter(Position::new(0, 2));
        board.remove_column(Edge::Left).unwrap();

        assert!(board.teleporters().is_empty());
        assert_eq!(board.piece(Position::new(1, 2)), PieceType::None);
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_shrink_guard() {
        let mut board = Board::new(2, 3);
        board.set_target(Some(Position::new(1, 1)));
        assert!(!board.can_shrink(Axis::Width));
        assert!(board.can_shrink(Axis::Height));

        let before = board.clone();
        assert_eq!(
            board.remove_column(Edge::Right),
            Err(EditError::CannotShrink {
                axis: Axis::Width,
                len: 2
            })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_grow_guard() {
        let limits = BoardLimits::for_level(4);
        let mut board = Board::new(3, 4);
        assert!(board.can_grow(Axis::Width, &limits));
        assert!(!board.can_grow(Axis::Height, &limits));
        board.insert_column(Edge::Left, &limits).unwrap();
        assert_eq!(
            board.insert_column(Edge::Right, &limits),
            Err(EditError::CannotGrow {
                axis: Axis::Width,
                len: 4,
                max: 4
            })
        );

        let big = Board::new(MAX_BOARD_LEN, 2);
        assert!(!big.can_grow(Axis::Width, &BoardLimits::default()));
        assert!(!big.can_grow(Axis::Width, &BoardLimits::for_level(1000)));
    }

    #[test]
    fn test_grow_from_zero_width() {
        let mut board = Board::new(0, 3);
        board.insert_column(Edge::Left, &BoardLimits::default()).unwrap();
        board.insert_column(Edge::Right, &BoardLimits::default()).unwrap();
        assert_eq!((board.width(), board.height()), (3, 3));
        assert!(board.positions().all(|p| board.piece(p) == PieceType::None));
        assert!(board.assert_consistency());
    }

    #[test]
    fn test_wrong_axis() {
        let mut board = Board::new(3, 3);
        assert_eq!(
            board.insert_row(Edge::Left, &BoardLimits::default()),
            Err(EditError::WrongAxis {
                edge: Edge::Left,
                axis: Axis::Height
            })
        );
        assert!(board.remove_column(Edge::Top).is_err());
        assert_eq!(board, Board::new(3, 3));
    }

    #[test]
    fn test_limits_from_json() {
        let limits = BoardLimits::from_json(r#"{"max_width": 12}"#).unwrap();
        assert_eq!(limits.max(Axis::Width), 12);
        assert_eq!(limits.max(Axis::Height), MAX_BOARD_LEN);
    }
}
