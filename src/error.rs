//! Error types for decoding seeds, encoding boards and editing boards.
//!
//! Each comes from a different place: a [`DecodeError`] comes from untrusted
//! input, an [`EncodeError`] means the authoring flow handed over
//! a board that breaks an invariant, and an [`EditError`] is an expected guard
//! refusal that [`Board::can_grow`](crate::board::Board::can_grow) and
//! [`Board::can_shrink`](crate::board::Board::can_shrink) report in advance.

use thiserror::Error;

use crate::types::{Axis, Edge, Position};

/// Reasons a seed cannot be turned into a board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not valid base64, or fewer than the 6 header bytes
    #[error("seed header is truncated or not valid base64")]
    MalformedHeader,

    /// Header declares a board with no cells
    #[error("board has zero width or height")]
    EmptyBoard,

    /// Bits ran out before every cell was read
    #[error("bit stream ended after {decoded} of {expected} cells")]
    TruncatedStream {
        /// cells read before the bits ran out
        decoded: usize,
        /// width times height
        expected: usize,
    },

    /// A teleporter pair with only one end
    #[error("teleporter pair {pair} has only one end")]
    OddTeleporterCount {
        #[allow(missing_docs)]
        pair: u8,
    },

    /// More than two teleporters share one pair ID
    #[error("teleporter pair {pair} has more than two ends")]
    TeleporterIdReused {
        #[allow(missing_docs)]
        pair: u8,
    },

    /// Pair IDs skip a number, leaving later pairs unreachable by position
    #[error("teleporter pair {pair} is used but pair {missing} is not")]
    SparseTeleporterIds {
        /// the first used ID after the gap
        pair: u8,
        /// the lowest unused ID
        missing: u8,
    },

    /// Header carries the absent sentinel for the target
    #[error("seed has no target")]
    MissingTarget,

    #[allow(missing_docs)]
    #[error("target {0} is off the board")]
    TargetOutOfBounds(Position),

    #[allow(missing_docs)]
    #[error("start {0} is off the board")]
    StartOutOfBounds(Position),

    /// A level code without a `.` or with a non numeric level
    #[error("malformed level code {0:?}")]
    MalformedLevelCode(String),
}

/// Reasons a board cannot be turned into a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Every seed needs a target
    #[error("board has no target")]
    MissingTarget,

    #[allow(missing_docs)]
    #[error("target {0} is off the board")]
    TargetOutOfBounds(Position),

    #[allow(missing_docs)]
    #[error("start {0} is off the board")]
    StartOutOfBounds(Position),

    /// Pair IDs are 5 bits wide
    #[error("{pairs} teleporter pairs exceed the maximum of {max}")]
    TooManyTeleporters {
        #[allow(missing_docs)]
        pairs: usize,
        #[allow(missing_docs)]
        max: usize,
    },

    /// The last teleporter entry has no partner yet
    #[error("teleporter at {0} has no partner")]
    UnpairedTeleporter(Position),

    /// A teleporter cell missing from the pair list
    #[error("teleporter cell {0} is not part of any pair")]
    UnregisteredTeleporter(Position),

    /// A pair entry pointing at a cell that is not a teleporter
    #[error("pair entry {0} does not hold a teleporter")]
    DanglingTeleporter(Position),

    /// The same cell listed twice in the pair list
    #[error("teleporter at {0} is listed more than once")]
    DuplicateTeleporter(Position),

    /// Something other than `Target` was written over the target cell
    #[error("target cell {0} is covered by another piece")]
    TargetCovered(Position),
}

/// Reasons a board edit was refused. The board is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// Boards never go below 2 cells on either axis
    #[error("cannot shrink {axis} below {len}")]
    CannotShrink {
        #[allow(missing_docs)]
        axis: Axis,
        /// the current length of the axis
        len: u8,
    },

    /// The axis already reached the allowed maximum
    #[error("cannot grow {axis} past {max}")]
    CannotGrow {
        #[allow(missing_docs)]
        axis: Axis,
        /// the current length of the axis
        len: u8,
        /// the limit that was hit
        max: u8,
    },

    /// A row operation on a left/right edge or a column operation on top/bottom
    #[error("{edge} edge is not on the {axis} axis")]
    WrongAxis {
        #[allow(missing_docs)]
        edge: Edge,
        /// the axis the operation works on
        axis: Axis,
    },
}
