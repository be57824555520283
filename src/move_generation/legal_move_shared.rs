use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckPinMasks;
use crate::moves::move_descriptions::{Move, FLAG_CAPTURE, FLAG_QUIET};
use crate::moves::ray_tables::ray_attacks;

/// Which moves a generation pass emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveGenMode {
    All,
    /// Captures, en passant and promotions.
    Tactical,
}

impl MoveGenMode {
    /// Destination filter for non-pawn pieces.
    #[inline]
    pub fn target_filter(self, game_state: &GameState) -> Bitboard {
        let side = game_state.side_to_move;
        match self {
            MoveGenMode::All => !game_state.occupancy_by_color[side.index()],
            MoveGenMode::Tactical => game_state.occupancy_by_color[side.opposite().index()],
        }
    }
}

/// Emits one move per target square, flagged as a capture when the target
/// holds an enemy piece.
#[inline]
pub fn push_piece_moves(from: Square, mut targets: Bitboard, enemy: Bitboard, out: &mut Vec<Move>) {
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let flag = if enemy & square_bit(to) != 0 {
            FLAG_CAPTURE
        } else {
            FLAG_QUIET
        };
        out.push(Move::new(from, to, flag));
    }
}

/// Ray-walk generation shared by bishops, rooks and queens: for each
/// direction the first blocker bounds the ray, then check and pin masks cut
/// the reachable squares down to legal ones.
pub fn generate_slider_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    kind: PieceKind,
    directions: &[usize],
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let enemy = game_state.occupancy_by_color[side.opposite().index()];
    let filter = mode.target_filter(game_state);

    let mut sliders = game_state.pieces_of(side, kind);
    while sliders != 0 {
        let from = pop_lsb(&mut sliders);
        let mut reach = 0u64;
        for &dir in directions {
            reach |= ray_attacks(dir, from, game_state.occupancy_all);
        }
        push_piece_moves(from, reach & filter & masks.allowed_for(from), enemy, out);
    }
}
