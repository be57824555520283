use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckPinMasks;
use crate::move_generation::legal_move_shared::{generate_slider_moves, MoveGenMode};
use crate::moves::move_descriptions::Move;
use crate::moves::ray_tables::{ALL_DIRECTIONS, DIAGONAL_DIRECTIONS, ORTHOGONAL_DIRECTIONS};

pub fn generate_bishop_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    generate_slider_moves(game_state, masks, PieceKind::Bishop, &DIAGONAL_DIRECTIONS, mode, out);
}

pub fn generate_rook_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    generate_slider_moves(game_state, masks, PieceKind::Rook, &ORTHOGONAL_DIRECTIONS, mode, out);
}

pub fn generate_queen_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    generate_slider_moves(game_state, masks, PieceKind::Queen, &ALL_DIRECTIONS, mode, out);
}
