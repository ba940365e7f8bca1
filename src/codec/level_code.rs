use std::fmt;
use std::str::FromStr;

use super::{decode, encode};
use crate::board::Board;
use crate::error::{DecodeError, EncodeError};

/// The code players share for a custom level: `<level>.<seed>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LevelCode {
    level: u32,
    seed: String,
}

impl LevelCode {
    /// Encodes a board and files it under the board's level
    pub fn from_board(board: &Board) -> Result<Self, EncodeError> {
        Ok(Self {
            level: board.level(),
            seed: encode(board)?,
        })
    }

    #[allow(missing_docs)]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[allow(missing_docs)]
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// The first four characters of the seed, for showing in lists
    pub fn seed_preview(&self) -> String {
        let prefix: String = self.seed.chars().take(4).collect();
        format!("{}...", prefix)
    }

    /// Decodes the seed part of the code
    pub fn board(&self) -> Result<Board, DecodeError> {
        decode(&self.seed)
    }
}

impl fmt::Display for LevelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.level, self.seed)
    }
}

impl FromStr for LevelCode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DecodeError::MalformedLevelCode(s.to_string());
        let (level, seed) = s.trim().split_once('.').ok_or_else(malformed)?;
        let level = level.parse().map_err(|_| malformed())?;
        Ok(Self {
            level,
            seed: seed.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board_fixture;

    #[test]
    fn test_level_code_round_trip() {
        let board = board_fixture(include_str!("../../fixtures/test_level.json"));
        let code = LevelCode::from_board(&board).unwrap();
        assert_eq!(code.level(), 8);

        let printed = code.to_string();
        assert!(printed.starts_with("8."));
        let parsed: LevelCode = printed.parse().unwrap();
        assert_eq!(parsed, code);
        assert_eq!(parsed.board().unwrap(), board);
    }

    #[test]
    fn test_seed_preview() {
        let code: LevelCode = "1.AgIAAAEBAA==".parse().unwrap();
        assert_eq!(code.level(), 1);
        assert_eq!(code.seed_preview(), "AgIA...");
        assert_eq!(code.board().unwrap().width(), 2);
    }

    #[test]
    fn test_malformed_level_codes() {
        for bad in ["AgIAAAEBAA==", "x.AgIAAAEBAA==", "-1.AgIA", ""] {
            assert_eq!(
                bad.parse::<LevelCode>(),
                Err(DecodeError::MalformedLevelCode(bad.to_string()))
            );
        }
    }
}
