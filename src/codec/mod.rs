//! Turning boards in to seeds and back.
//!
//! # Wire Format
//!
//! ```text
//! +-----------+------------+-----------+-----------+-----------+-----------+
//! | width (1) | height (1) | start x   | start y   | target x  | target y  |
//! +-----------+------------+-----------+-----------+-----------+-----------+
//! | grid stream: one prefix codeword per cell, row major from row 0,        |
//! | MSB first, teleporters followed by a 5 bit pair ID, zero padded         |
//! +-------------------------------------------------------------------------+
//! ```
//!
//! An absent start or target is written as `255` on both axes. The bytes are
//! then rendered as standard base64 with `=` padding to get the seed.
//!
//! The target cell is carried by the header, so the stream writes it as an
//! empty cell and decoding stamps `Target` over whatever the stream held
//! there.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fxhash::FxHashMap;
use tracing::{debug, instrument};

use crate::board::Board;
use crate::error::{DecodeError, EncodeError};
use crate::types::{PieceType, Position};

pub mod bitio;
mod level_code;
pub mod prefix_tree;

pub use level_code::LevelCode;

use bitio::{BitReader, BitWriter};
use prefix_tree::{read_symbol, write_symbol, Symbol, MAX_TELEPORTER_PAIRS, TELEPORTER_ID_BITS};

/// Bytes before the grid stream
pub const HEADER_LEN: usize = 6;

/// Header byte for an absent start or target
pub const ABSENT: u8 = u8::MAX;

/// Encodes a board as a seed.
#[instrument(level = "trace", skip_all)]
pub fn encode(board: &Board) -> Result<String, EncodeError> {
    let bytes = encode_bytes(board)?;
    Ok(STANDARD.encode(bytes))
}

/// Encodes a board to the bytes a seed is made from.
pub fn encode_bytes(board: &Board) -> Result<Vec<u8>, EncodeError> {
    let target = board.target().ok_or(EncodeError::MissingTarget)?;
    if board.off_board(target) {
        return Err(EncodeError::TargetOutOfBounds(target));
    }
    if board.piece(target) != PieceType::Target {
        return Err(EncodeError::TargetCovered(target));
    }
    let start = board.start();
    if let Some(start) = start {
        if board.off_board(start) {
            return Err(EncodeError::StartOutOfBounds(start));
        }
    }
    let pair_ids = teleporter_pair_ids(board)?;

    let (start_x, start_y) = start.map_or((ABSENT, ABSENT), header_coordinates);
    let (target_x, target_y) = header_coordinates(target);
    let header = [
        board.width(),
        board.height(),
        start_x,
        start_y,
        target_x,
        target_y,
    ];

    let mut writer = BitWriter::with_prefix(&header);
    for position in board.positions() {
        let symbol = Symbol::from_piece(board.piece(position));
        write_symbol(&mut writer, symbol);
        if symbol == Symbol::Teleporter {
            let id = pair_ids
                .get(&position)
                .ok_or(EncodeError::UnregisteredTeleporter(position))?;
            writer.write_bits(*id as u32, TELEPORTER_ID_BITS);
        }
    }
    Ok(writer.finish())
}

/// Only called with positions already known to be on the board, so both
/// coordinates fit below [`ABSENT`].
fn header_coordinates(position: Position) -> (u8, u8) {
    (position.x as u8, position.y as u8)
}

fn teleporter_pair_ids(board: &Board) -> Result<FxHashMap<Position, u8>, EncodeError> {
    let teleporters = board.teleporters();
    let pairs = (teleporters.len() + 1) / 2;
    if pairs > MAX_TELEPORTER_PAIRS {
        return Err(EncodeError::TooManyTeleporters {
            pairs,
            max: MAX_TELEPORTER_PAIRS,
        });
    }
    if teleporters.len() % 2 != 0 {
        let lone = teleporters[teleporters.len() - 1];
        return Err(EncodeError::UnpairedTeleporter(lone));
    }

    let mut ids = FxHashMap::default();
    for (i, position) in teleporters.iter().enumerate() {
        if board.piece_safely(*position) != PieceType::Teleporter {
            return Err(EncodeError::DanglingTeleporter(*position));
        }
        if ids.insert(*position, (i / 2) as u8).is_some() {
            return Err(EncodeError::DuplicateTeleporter(*position));
        }
    }
    Ok(ids)
}

/// Decodes a seed in to a board.
///
/// Characters outside the base64 alphabet are skipped, so seeds pasted with
/// line breaks or spaces still decode.
#[instrument(level = "trace", skip_all)]
pub fn decode(seed: &str) -> Result<Board, DecodeError> {
    let cleaned: String = seed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let result = STANDARD
        .decode(cleaned)
        .map_err(|_| DecodeError::MalformedHeader)
        .and_then(|bytes| decode_bytes(&bytes));
    if let Err(e) = &result {
        debug!(error = %e, "rejected seed");
    }
    result
}

/// Decodes the bytes behind a seed in to a board.
pub fn decode_bytes(bytes: &[u8]) -> Result<Board, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::MalformedHeader);
    }
    let (header, stream) = bytes.split_at(HEADER_LEN);
    let (width, height) = (header[0], header[1]);
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyBoard);
    }

    let mut board = Board::new(width, height);
    let mut slots = TeleporterSlots::new();
    let mut reader = BitReader::new(stream);
    let expected = board.grid.len();
    for index in 0..expected {
        let truncated = DecodeError::TruncatedStream {
            decoded: index,
            expected,
        };
        let symbol = read_symbol(&mut reader).ok_or_else(|| truncated.clone())?;
        if symbol == Symbol::Teleporter {
            let id = reader.read_bits(TELEPORTER_ID_BITS).ok_or(truncated)? as u8;
            slots.record(id, board.position_of(index))?;
        }
        board.grid[index] = symbol.piece();
    }
    board.teleporters = slots.into_teleporters()?;

    let target = header_position(header[4], header[5]).ok_or(DecodeError::MissingTarget)?;
    if board.off_board(target) {
        return Err(DecodeError::TargetOutOfBounds(target));
    }
    if let Some(start) = header_position(header[2], header[3]) {
        if board.off_board(start) {
            return Err(DecodeError::StartOutOfBounds(start));
        }
        board.start = Some(start);
    }

    // the header wins over whatever the stream put on the target cell
    if board.piece(target) == PieceType::Teleporter {
        debug!(%target, "target overwrites a teleporter, dropping its pair");
        board.remove_teleporter_pair(target);
    }
    board.set_target(Some(target));

    Ok(board)
}

fn header_position(x: u8, y: u8) -> Option<Position> {
    if x == ABSENT || y == ABSENT {
        None
    } else {
        Some(Position::new(x as i32, y as i32))
    }
}

/// Teleporter ends by pair ID, filled while the grid stream is read.
struct TeleporterSlots([[Option<Position>; 2]; MAX_TELEPORTER_PAIRS]);

impl TeleporterSlots {
    fn new() -> Self {
        Self([[None; 2]; MAX_TELEPORTER_PAIRS])
    }

    fn record(&mut self, id: u8, position: Position) -> Result<(), DecodeError> {
        let pair = &mut self.0[id as usize];
        match *pair {
            [None, _] => pair[0] = Some(position),
            [Some(_), None] => pair[1] = Some(position),
            [Some(_), Some(_)] => return Err(DecodeError::TeleporterIdReused { pair: id }),
        }
        Ok(())
    }

    /// Flattens the slots in to pair order. Every used ID needs both ends,
    /// and IDs have to be used from 0 upwards without gaps.
    ///
    /// Older clients stopped at the first unused ID and let a third end
    /// overwrite the second slot. Seeds relying on either are rejected here
    /// instead; encode never produces them.
    fn into_teleporters(self) -> Result<Vec<Position>, DecodeError> {
        let mut teleporters = vec![];
        let mut first_unused = None;
        for (id, pair) in self.0.iter().enumerate() {
            let id = id as u8;
            match *pair {
                [Some(a), Some(b)] => {
                    if let Some(missing) = first_unused {
                        return Err(DecodeError::SparseTeleporterIds { pair: id, missing });
                    }
                    teleporters.push(a);
                    teleporters.push(b);
                }
                [Some(_), None] => return Err(DecodeError::OddTeleporterCount { pair: id }),
                [None, _] => {
                    first_unused.get_or_insert(id);
                }
            }
        }
        Ok(teleporters)
    }
}
