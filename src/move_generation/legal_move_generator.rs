//! Full legal move generation.
//!
//! Check and pin masks are computed once per node and every piece generator
//! intersects its destinations with them, so no pseudo-legal candidate is
//! made and tested except en passant.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::compute_check_and_pin_masks;
use crate::move_generation::legal_move_shared::MoveGenMode;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::moves::move_descriptions::Move;

/// Appends every legal move for the side to move to `out` (which is cleared
/// first). The state is only touched by balanced make/unmake pairs.
pub fn generate_legal_moves(game_state: &mut GameState, out: &mut Vec<Move>) {
    generate_moves(game_state, MoveGenMode::All, out);
}

/// Legal captures, en-passant captures and promotions only.
pub fn generate_capture_moves(game_state: &mut GameState, out: &mut Vec<Move>) {
    generate_moves(game_state, MoveGenMode::Tactical, out);
}

/// Allocating convenience wrapper around [`generate_legal_moves`].
pub fn legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_legal_moves(game_state, &mut out);
    out
}

fn generate_moves(game_state: &mut GameState, mode: MoveGenMode, out: &mut Vec<Move>) {
    out.clear();
    let masks = compute_check_and_pin_masks(game_state, game_state.side_to_move);

    generate_king_moves(game_state, &masks, mode, out);
    if masks.is_double_check() {
        return;
    }

    generate_pawn_moves(game_state, &masks, mode, out);
    generate_knight_moves(game_state, &masks, mode, out);
    generate_bishop_moves(game_state, &masks, mode, out);
    generate_rook_moves(game_state, &masks, mode, out);
    generate_queen_moves(game_state, &masks, mode, out);
}
