#![deny(missing_debug_implementations)]
#![warn(missing_copy_implementations, missing_docs)]
//! Types for working with custom levels of RNG Puzzle.
//!
//! A custom level is a [`Board`](board::Board) shared between players as a
//! short base64 seed. The [`codec`] module turns boards in to seeds and back
//! using a fixed prefix code over the piece types, and the editing methods on
//! `Board` grow and shrink a board while keeping its start, target and
//! teleporter pairs pointing at the right cells.
//!
//! ```
//! use rng_puzzle_types::board::{Board, BoardLimits};
//! use rng_puzzle_types::codec::{decode, encode};
//! use rng_puzzle_types::types::{Edge, Position};
//!
//! let mut board = Board::new(2, 2);
//! board.set_start(Some(Position::new(0, 0)));
//! board.set_target(Some(Position::new(1, 1)));
//! board.insert_column(Edge::Left, &BoardLimits::default()).unwrap();
//!
//! let seed = encode(&board).unwrap();
//! assert_eq!(decode(&seed).unwrap(), board);
//! ```

use board::Board;

pub mod board;
pub mod codec;
pub mod error;
pub mod types;

pub use error::{DecodeError, EditError, EncodeError};

/// Loads a board fixture from a json string
pub fn board_fixture(board_fixture: &str) -> Board {
    let b: Result<Board, _> = serde_json::from_str(board_fixture);
    b.expect("the json literal is valid")
}
