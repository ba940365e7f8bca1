//! The board being authored, shared and played.
//!
//! A [`Board`] is a rectangular grid of [`PieceType`]s plus the coordinates that
//! refer in to it: an optional start, an optional target and the ordered list
//! of teleporter ends. Entries `2k` and `2k + 1` of that list form pair `k`, so
//! the order of the list is part of the board's meaning.
use fxhash::FxHashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::types::{PieceType, Position};

mod editor;

pub use editor::{BoardLimits, MAX_BOARD_LEN, MIN_BOARD_LEN};

/// A puzzle board. Coordinates are zero based with the origin in the bottom
/// left corner, and the grid is stored row major starting from row 0.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) width: u8,
    pub(crate) height: u8,
    pub(crate) grid: Vec<PieceType>,
    pub(crate) start: Option<Position>,
    pub(crate) target: Option<Position>,
    pub(crate) teleporters: Vec<Position>,
}

impl Board {
    /// Makes an empty board: every cell `None`, no start, no target and no
    /// teleporters. A zero width or height is raised to 1.
    pub fn new(width: u8, height: u8) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            width,
            height,
            grid: vec![PieceType::None; width as usize * height as usize],
            start: None,
            target: None,
            teleporters: vec![],
        }
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> u8 {
        self.height
    }

    #[allow(missing_docs)]
    pub fn start(&self) -> Option<Position> {
        self.start
    }

    #[allow(missing_docs)]
    pub fn target(&self) -> Option<Position> {
        self.target
    }

    /// teleporter ends in pair order
    pub fn teleporters(&self) -> &[Position] {
        &self.teleporters
    }

    /// the level number a custom board is filed under
    pub fn level(&self) -> u32 {
        (self.width as u32 + self.height as u32) / 2
    }

    /// determines if a given position is not on the board
    pub fn off_board(&self, position: Position) -> bool {
        position.x < 0
            || position.x >= self.width as i32
            || position.y < 0
            || position.y >= self.height as i32
    }

    fn index_of(&self, position: Position) -> usize {
        debug_assert!(!self.off_board(position), "{} is off the board", position);
        position.y as usize * self.width as usize + position.x as usize
    }

    pub(crate) fn position_of(&self, index: usize) -> Position {
        let width = self.width as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }

    /// Every position on the board in row major order, row 0 first.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height)
            .cartesian_product(0..width)
            .map(|(y, x)| Position::new(x, y))
    }

    /// Get the piece at a position. Panics if the position is off the board,
    /// use [`Board::piece_safely`] for positions that may be.
    pub fn piece(&self, position: Position) -> PieceType {
        self.grid[self.index_of(position)]
    }

    /// Get the piece at a position, or `Void` when it is off the board
    pub fn piece_safely(&self, position: Position) -> PieceType {
        if self.off_board(position) {
            PieceType::Void
        } else {
            self.piece(position)
        }
    }

    /// Overwrites a single cell.
    ///
    /// This does not touch the teleporter list, the start or the target; use
    /// [`Board::place_teleporter`] and [`Board::set_target`] for those.
    pub fn set_piece(&mut self, position: Position, piece: PieceType) {
        debug_assert!(piece != PieceType::Void);
        let index = self.index_of(position);
        self.grid[index] = piece;
    }

    #[allow(missing_docs)]
    pub fn set_start(&mut self, start: Option<Position>) {
        self.start = start;
    }

    /// Moves the target, writing `Target` in to the new cell and resetting the
    /// old one to `None`.
    pub fn set_target(&mut self, target: Option<Position>) {
        if let Some(old) = self.target {
            if self.piece_safely(old) == PieceType::Target {
                self.set_piece(old, PieceType::None);
            }
        }
        if let Some(new) = target {
            self.set_piece(new, PieceType::Target);
        }
        self.target = target;
    }

    /// Puts a teleporter on a cell and appends it to the pair list. Every
    /// second call completes a pair; until then the last teleporter has no
    /// partner.
    ///
    /// A completed pair is stored in row major order, which is the order a
    /// seed gives its two ends back in. A cell that is already a registered
    /// teleporter is left alone.
    pub fn place_teleporter(&mut self, position: Position) {
        if self.teleporters.contains(&position) {
            warn!(%position, "teleporter already placed");
            return;
        }
        self.set_piece(position, PieceType::Teleporter);
        self.teleporters.push(position);
        let len = self.teleporters.len();
        if len % 2 == 0
            && row_major(self.teleporters[len - 1]) < row_major(self.teleporters[len - 2])
        {
            self.teleporters.swap(len - 2, len - 1);
        }
    }

    /// The index of the pair a teleporter belongs to
    pub fn teleporter_pair_index(&self, position: Position) -> Option<usize> {
        self.teleporters
            .iter()
            .position(|t| *t == position)
            .map(|i| i / 2)
    }

    /// The other end of the pair a teleporter belongs to.
    ///
    /// Returns `None` for a teleporter whose partner has not been placed yet,
    /// and for a position that isn't a registered teleporter at all.
    pub fn teleporter_partner(&self, position: Position) -> Option<Position> {
        let i = match self.teleporters.iter().position(|t| *t == position) {
            Some(i) => i,
            None => {
                warn!(%position, "teleporter match not found");
                return None;
            }
        };
        if i % 2 == 0 {
            self.teleporters.get(i + 1).copied()
        } else {
            Some(self.teleporters[i - 1])
        }
    }

    /// Checks every invariant a fully formed board keeps. Boards mid authoring
    /// with a lone teleporter are reported as inconsistent.
    pub fn assert_consistency(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        if self.grid.len() != self.width as usize * self.height as usize {
            return false;
        }
        if self.grid.contains(&PieceType::Void) {
            return false;
        }
        if let Some(start) = self.start {
            if self.off_board(start) {
                return false;
            }
        }
        if let Some(target) = self.target {
            if self.piece_safely(target) != PieceType::Target {
                return false;
            }
        }

        if self.teleporters.len() % 2 != 0 {
            return false;
        }
        if self
            .teleporters
            .chunks(2)
            .any(|pair| row_major(pair[0]) >= row_major(pair[1]))
        {
            return false;
        }
        let mut seen = FxHashSet::default();
        for t in self.teleporters.iter() {
            if self.piece_safely(*t) != PieceType::Teleporter || !seen.insert(*t) {
                return false;
            }
        }
        let teleporter_cells = self
            .grid
            .iter()
            .filter(|p| **p == PieceType::Teleporter)
            .count();
        teleporter_cells == self.teleporters.len()
    }
}

fn row_major(position: Position) -> (i32, i32) {
    (position.y, position.x)
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for i in 0..self.height {
            let y = (self.height - i - 1) as i32;
            for x in 0..self.width as i32 {
                let position = Position::new(x, y);
                if self.start == Some(position) {
                    write!(f, "S")?;
                } else {
                    write!(f, "{}", self.piece(position).glyph())?;
                }
                write!(f, " ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
