use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::CheckPinMasks;
use crate::move_generation::legal_move_shared::{push_piece_moves, MoveGenMode};
use crate::moves::attack_tables::knight_attacks;
use crate::moves::move_descriptions::Move;

pub fn generate_knight_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let enemy = game_state.occupancy_by_color[side.opposite().index()];
    let filter = mode.target_filter(game_state) & masks.check_mask;

    // A pinned knight can never stay on its pin line.
    let mut knights = game_state.pieces_of(side, PieceKind::Knight) & !masks.pinned;
    while knights != 0 {
        let from = pop_lsb(&mut knights);
        push_piece_moves(from, knight_attacks(from) & filter, enemy, out);
    }
}
