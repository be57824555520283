//! Canonical chess-rule constants and end-of-game classification.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::search::repetition_table::RepetitionTable;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Half-move clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Checkmate { winner: Color },
    Stalemate,
    FiftyMoveRule,
    InsufficientMaterial,
    Repetition,
}

impl GameResult {
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            GameResult::Stalemate
                | GameResult::FiftyMoveRule
                | GameResult::InsufficientMaterial
                | GameResult::Repetition
        )
    }
}

/// Neither side can mate: no pawns, rooks or queens, and each side holds at
/// most one minor piece or a bishop pair.
pub fn is_insufficient_material(game_state: &GameState) -> bool {
    let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
        .iter()
        .any(|&kind| {
            game_state.pieces_of(Color::Light, kind) | game_state.pieces_of(Color::Dark, kind) != 0
        });
    if heavy_or_pawn {
        return false;
    }

    [Color::Light, Color::Dark].iter().all(|&color| {
        let knights = game_state.pieces_of(color, PieceKind::Knight).count_ones();
        let bishops = game_state.pieces_of(color, PieceKind::Bishop);
        match (knights, bishops.count_ones()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, 2) => bishops & LIGHT_SQUARES != 0 && bishops & DARK_SQUARES != 0,
            _ => false,
        }
    })
}

/// Classifies the position for game play. `history` holds the positions of
/// the game so far, including the current one.
pub fn game_result(game_state: &mut GameState, history: &RepetitionTable) -> GameResult {
    if legal_moves(game_state).is_empty() {
        let side = game_state.side_to_move;
        return if is_king_in_check(game_state, side) {
            GameResult::Checkmate {
                winner: side.opposite(),
            }
        } else {
            GameResult::Stalemate
        };
    }
    if game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        return GameResult::FiftyMoveRule;
    }
    if is_insufficient_material(game_state) {
        return GameResult::InsufficientMaterial;
    }
    if history.count(game_state.zobrist_key) >= 3 {
        return GameResult::Repetition;
    }
    GameResult::InProgress
}
