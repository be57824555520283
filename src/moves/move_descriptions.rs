//! Packed 16-bit move encoding.
//!
//! Layout: bits 0-5 start square, bits 6-11 target square, bits 12-15 flag.
//! The flag alone determines the move shape:
//!
//! | flag | shape                     |
//! |------|---------------------------|
//! | 0    | quiet                     |
//! | 1    | double pawn push          |
//! | 2    | king-side castle          |
//! | 3    | queen-side castle         |
//! | 4    | capture                   |
//! | 5    | en passant                |
//! | 6, 7 | unused (invalid)          |
//! | 8-11 | promotion to N, B, R, Q   |
//! | 12-15| promotion capture N,B,R,Q |

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};

const FROM_SHIFT: u16 = 0;
const TO_SHIFT: u16 = 6;
const FLAG_SHIFT: u16 = 12;
const SQUARE_MASK: u16 = 0x3F;

pub const FLAG_QUIET: u8 = 0;
pub const FLAG_DOUBLE_PAWN_PUSH: u8 = 1;
pub const FLAG_KING_CASTLE: u8 = 2;
pub const FLAG_QUEEN_CASTLE: u8 = 3;
pub const FLAG_CAPTURE: u8 = 4;
pub const FLAG_EN_PASSANT: u8 = 5;
pub const FLAG_PROMOTION: u8 = 8;
pub const FLAG_PROMOTION_CAPTURE: u8 = 12;

const CAPTURE_BIT: u8 = 0b0100;
const PROMOTION_BIT: u8 = 0b1000;

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

/// A move packed into 16 bits. `Move::default()` (a1a1, quiet) is never legal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move(u16);

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, flag: u8) -> Self {
        Move(
            ((from as u16 & SQUARE_MASK) << FROM_SHIFT)
                | ((to as u16 & SQUARE_MASK) << TO_SHIFT)
                | (((flag & 0x0F) as u16) << FLAG_SHIFT),
        )
    }

    /// Promotion move; `capture` selects the 12-15 flag range.
    #[inline]
    pub fn promotion(from: Square, to: Square, piece: PieceKind, capture: bool) -> Self {
        let offset = match piece {
            PieceKind::Knight => 0,
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            _ => panic!("cannot promote to {piece:?}"),
        };
        let base = if capture {
            FLAG_PROMOTION_CAPTURE
        } else {
            FLAG_PROMOTION
        };
        Move::new(from, to, base + offset)
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Move(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn flag(self) -> u8 {
        (self.0 >> FLAG_SHIFT) as u8
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag() & CAPTURE_BIT != 0
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.flag() & PROMOTION_BIT != 0
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.flag() == FLAG_EN_PASSANT
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        self.flag() == FLAG_DOUBLE_PAWN_PUSH
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.flag(), FLAG_KING_CASTLE | FLAG_QUEEN_CASTLE)
    }

    /// Neither a capture nor a promotion. Castles and double pushes are quiet.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        self.flag() & (CAPTURE_BIT | PROMOTION_BIT) == 0
    }

    #[inline]
    pub fn promotion_piece(self) -> Option<PieceKind> {
        if self.is_promotion() {
            Some(PROMOTION_PIECES[(self.flag() & 0b11) as usize])
        } else {
            None
        }
    }

    /// Flags 6 and 7 do not name a move shape.
    #[inline]
    pub const fn has_valid_flag(self) -> bool {
        !matches!(self.flag(), 6 | 7)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}->{} flag {})", self.from(), self.to(), self.flag())
    }
}
