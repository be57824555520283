//! Core incremental board state representation.
//!
//! `GameState` stores one bitboard per (color, piece kind), the color and
//! total occupancy aggregates, a 64-entry mailbox mirroring the bitboards,
//! the irreversible flags and clocks, an incrementally maintained Zobrist key
//! and the undo stack driven by `make_move` / `unmake_move`.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::moves::attack_tables::pawn_attacks;
use crate::search::zobrist::{compute_zobrist_key, piece_square_key};
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[Bitboard; 6]; 2],
    pub occupancy_by_color: [Bitboard; 2],
    pub occupancy_all: Bitboard,
    pub board: [Option<Piece>; 64],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    /// File of the pawn that just made a double push, if any.
    pub en_passant_file: Option<u8>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            board: [None; 64],

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_file: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,

            undo_stack: Vec::with_capacity(256),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Square a capturing pawn would land on for the current en-passant file.
    pub fn en_passant_square(&self) -> Option<Square> {
        let file = self.en_passant_file?;
        Some(match self.side_to_move {
            Color::Light => 40 + file,
            Color::Dark => 16 + file,
        })
    }

    /// True when a pawn of `capturer` stands next to the pawn that just
    /// double-pushed on `file`. Only a live en-passant file contributes to the
    /// Zobrist key, so a phantom target never creates a distinct position.
    pub fn is_en_passant_capture_legal(&self, file: u8, capturer: Color) -> bool {
        let target = match capturer {
            Color::Light => 40 + file,
            Color::Dark => 16 + file,
        };
        let capturers = self.pieces_of(capturer, PieceKind::Pawn);
        pawn_attacks(capturer.opposite(), target) & capturers != 0
    }

    /// Places `piece` on an empty `square`, updating aggregates and hash.
    #[inline]
    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        let bit = square_bit(square);
        debug_assert!(self.occupancy_all & bit == 0, "square {square} is occupied");
        self.pieces[piece.color.index()][piece.kind.index()] |= bit;
        self.occupancy_by_color[piece.color.index()] |= bit;
        self.occupancy_all |= bit;
        self.board[square as usize] = Some(piece);
        self.zobrist_key ^= piece_square_key(piece.color, piece.kind, square);
    }

    /// Clears `square`, returning whatever stood there.
    #[inline]
    pub(crate) fn remove_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board[square as usize].take()?;
        let bit = square_bit(square);
        self.pieces[piece.color.index()][piece.kind.index()] &= !bit;
        self.occupancy_by_color[piece.color.index()] &= !bit;
        self.occupancy_all &= !bit;
        self.zobrist_key ^= piece_square_key(piece.color, piece.kind, square);
        Some(piece)
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let Some(piece) = self.remove_piece(from) else {
            panic!("move_piece: no piece on square {from}");
        };
        self.put_piece(to, piece);
    }

    /// Checks every redundant representation against the piece bitboards.
    pub fn is_consistent(&self) -> bool {
        for color in [Color::Light, Color::Dark] {
            let union = self.pieces[color.index()].iter().fold(0, |acc, bb| acc | bb);
            if union != self.occupancy_by_color[color.index()] {
                return false;
            }
        }
        if self.occupancy_all
            != self.occupancy_by_color[Color::Light.index()]
                | self.occupancy_by_color[Color::Dark.index()]
        {
            return false;
        }
        if self.occupancy_by_color[0] & self.occupancy_by_color[1] != 0 {
            return false;
        }

        let mut seen = 0u64;
        for color in [Color::Light, Color::Dark] {
            for kind in PieceKind::ALL {
                let bb = self.pieces_of(color, kind);
                if bb & seen != 0 {
                    return false;
                }
                seen |= bb;
            }
        }

        for square in 0..64u8 {
            let expected = self.board[square as usize];
            let from_bitboards = if self.occupancy_all & square_bit(square) == 0 {
                None
            } else {
                PieceKind::ALL.iter().find_map(|&kind| {
                    [Color::Light, Color::Dark].iter().find_map(|&color| {
                        (self.pieces_of(color, kind) & square_bit(square) != 0)
                            .then_some(Piece::new(color, kind))
                    })
                })
            };
            if expected != from_bitboards {
                return false;
            }
        }

        self.zobrist_key == compute_zobrist_key(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_is_consistent_and_counts_pieces() {
        let game = GameState::new_game();
        assert!(game.is_consistent());
        assert_eq!(game.occupancy_all.count_ones(), 32);
        assert_eq!(game.piece_at(4), Some(Piece::new(Color::Light, PieceKind::King)));
        assert_eq!(game.piece_at(59), Some(Piece::new(Color::Dark, PieceKind::Queen)));
        assert_eq!(game.piece_at(27), None);
    }

    #[test]
    fn put_and_remove_keep_hash_in_sync() {
        let mut game = GameState::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let before = game.zobrist_key;

        game.put_piece(27, Piece::new(Color::Light, PieceKind::Knight));
        assert!(game.is_consistent());
        assert_ne!(game.zobrist_key, before);

        let removed = game.remove_piece(27);
        assert_eq!(removed, Some(Piece::new(Color::Light, PieceKind::Knight)));
        assert_eq!(game.zobrist_key, before);
        assert!(game.is_consistent());
    }

    #[test]
    fn en_passant_liveness_requires_adjacent_enemy_pawn() {
        // Dark pawn just pushed d7d5, light pawn on e5 can take.
        let live = GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        assert!(live.is_en_passant_capture_legal(3, Color::Light));
        assert_eq!(live.en_passant_square(), Some(43));

        // Same push without a capturer.
        let phantom = GameState::from_fen("4k3/8/8/3p4/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        assert!(!phantom.is_en_passant_capture_legal(3, Color::Light));

        // a-file edge: only the b-pawn can capture.
        let edge = GameState::from_fen("4k3/8/8/8/Pp6/8/8/4K3 b - a3 0 1").expect("FEN should parse");
        assert!(edge.is_en_passant_capture_legal(0, Color::Dark));
    }
}
