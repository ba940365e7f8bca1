//! The fixed prefix code used for grid cells.
//!
//! ```text
//!            Root
//!          0/    \1
//!       None      One
//!               0/    \1
//!          OneZero     OneOne
//!          0/  \1      0/    \1
//!      Block  Tele  OneOneZero  OneOneOne
//!                    0/  \1      0/  \1
//!                   C1    C2    C3    C4
//! ```
//!
//! A teleporter codeword is followed by a 5 bit pair ID.
use super::bitio::{BitReader, BitWriter};
use crate::types::PieceType;

/// Bits in the pair ID that follows a teleporter codeword
pub const TELEPORTER_ID_BITS: u8 = 5;

/// Pair IDs have to fit in [`TELEPORTER_ID_BITS`]
pub const MAX_TELEPORTER_PAIRS: usize = 1 << TELEPORTER_ID_BITS;

/// The leaves of the code tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// An empty cell. The target cell is also written as this, since the
    /// header carries the target.
    Empty,
    #[allow(missing_docs)]
    Block,
    /// Followed by the pair ID
    Teleporter,
    #[allow(missing_docs)]
    Corner1,
    #[allow(missing_docs)]
    Corner2,
    #[allow(missing_docs)]
    Corner3,
    #[allow(missing_docs)]
    Corner4,
}

/// A codeword, right aligned in `bits`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codeword {
    #[allow(missing_docs)]
    pub bits: u8,
    #[allow(missing_docs)]
    pub len: u8,
}

impl Symbol {
    #[allow(missing_docs)]
    pub fn codeword(self) -> Codeword {
        let (bits, len) = match self {
            Symbol::Empty => (0b0, 1),
            Symbol::Block => (0b100, 3),
            Symbol::Teleporter => (0b101, 3),
            Symbol::Corner1 => (0b1100, 4),
            Symbol::Corner2 => (0b1101, 4),
            Symbol::Corner3 => (0b1110, 4),
            Symbol::Corner4 => (0b1111, 4),
        };
        Codeword { bits, len }
    }

    /// The symbol a cell is written as. Anything that isn't a placeable piece
    /// is written as empty.
    pub fn from_piece(piece: PieceType) -> Symbol {
        match piece {
            PieceType::Block => Symbol::Block,
            PieceType::Teleporter => Symbol::Teleporter,
            PieceType::Corner1 => Symbol::Corner1,
            PieceType::Corner2 => Symbol::Corner2,
            PieceType::Corner3 => Symbol::Corner3,
            PieceType::Corner4 => Symbol::Corner4,
            PieceType::Void | PieceType::None | PieceType::Target => Symbol::Empty,
        }
    }

    #[allow(missing_docs)]
    pub fn piece(self) -> PieceType {
        match self {
            Symbol::Empty => PieceType::None,
            Symbol::Block => PieceType::Block,
            Symbol::Teleporter => PieceType::Teleporter,
            Symbol::Corner1 => PieceType::Corner1,
            Symbol::Corner2 => PieceType::Corner2,
            Symbol::Corner3 => PieceType::Corner3,
            Symbol::Corner4 => PieceType::Corner4,
        }
    }
}

/// Inner nodes of the tree, named by the bits read to reach them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeNode {
    Root,
    One,
    OneZero,
    OneOne,
    OneOneZero,
    OneOneOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Branch(TreeNode),
    Leaf(Symbol),
}

impl TreeNode {
    fn step(self, bit: bool) -> Step {
        match (self, bit) {
            (TreeNode::Root, false) => Step::Leaf(Symbol::Empty),
            (TreeNode::Root, true) => Step::Branch(TreeNode::One),
            (TreeNode::One, false) => Step::Branch(TreeNode::OneZero),
            (TreeNode::One, true) => Step::Branch(TreeNode::OneOne),
            (TreeNode::OneZero, false) => Step::Leaf(Symbol::Block),
            (TreeNode::OneZero, true) => Step::Leaf(Symbol::Teleporter),
            (TreeNode::OneOne, false) => Step::Branch(TreeNode::OneOneZero),
            (TreeNode::OneOne, true) => Step::Branch(TreeNode::OneOneOne),
            (TreeNode::OneOneZero, false) => Step::Leaf(Symbol::Corner1),
            (TreeNode::OneOneZero, true) => Step::Leaf(Symbol::Corner2),
            (TreeNode::OneOneOne, false) => Step::Leaf(Symbol::Corner3),
            (TreeNode::OneOneOne, true) => Step::Leaf(Symbol::Corner4),
        }
    }
}

/// Walks the tree from the root until a leaf. `None` if the bits run out
/// first.
pub fn read_symbol(reader: &mut BitReader<'_>) -> Option<Symbol> {
    let mut node = TreeNode::Root;
    loop {
        match node.step(reader.read_bit()?) {
            Step::Branch(next) => node = next,
            Step::Leaf(symbol) => return Some(symbol),
        }
    }
}

#[allow(missing_docs)]
pub fn write_symbol(writer: &mut BitWriter, symbol: Symbol) {
    let codeword = symbol.codeword();
    writer.write_bits(codeword.bits as u32, codeword.len);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Symbol; 7] = [
        Symbol::Empty,
        Symbol::Block,
        Symbol::Teleporter,
        Symbol::Corner1,
        Symbol::Corner2,
        Symbol::Corner3,
        Symbol::Corner4,
    ];

    #[test]
    fn test_codewords_match_tree() {
        let mut writer = BitWriter::new();
        for symbol in ALL.iter() {
            write_symbol(&mut writer, *symbol);
        }
        // 1 + 3 + 3 + 4 * 4
        assert_eq!(writer.bit_len(), 23);

        let bytes = writer.finish();
        let mut reader = BitReader::new(&bytes);
        for symbol in ALL.iter() {
            assert_eq!(read_symbol(&mut reader), Some(*symbol));
        }
        // the padding bit reads as one more empty cell
        assert_eq!(read_symbol(&mut reader), Some(Symbol::Empty));
        assert_eq!(read_symbol(&mut reader), None);
    }

    #[test]
    fn test_no_codeword_prefixes_another() {
        for a in ALL.iter() {
            for b in ALL.iter().filter(|b| *b != a) {
                let (a, b) = (a.codeword(), b.codeword());
                if a.len <= b.len {
                    assert_ne!(a.bits, b.bits >> (b.len - a.len), "{:?} {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_truncated_codeword() {
        // empty, corner 4, then the first three bits of another corner
        let data = [0b0111_1111];
        let mut reader = BitReader::new(&data);
        assert_eq!(read_symbol(&mut reader), Some(Symbol::Empty));
        assert_eq!(read_symbol(&mut reader), Some(Symbol::Corner4));
        assert_eq!(read_symbol(&mut reader), None);
    }

    #[test]
    fn test_target_is_written_as_empty() {
        assert_eq!(Symbol::from_piece(PieceType::Target), Symbol::Empty);
        assert_eq!(Symbol::from_piece(PieceType::Corner3).piece(), PieceType::Corner3);
    }
}
