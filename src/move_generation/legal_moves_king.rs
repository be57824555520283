use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::{
    is_square_attacked, is_square_attacked_with_occupancy, CheckPinMasks,
};
use crate::move_generation::legal_move_shared::MoveGenMode;
use crate::moves::attack_tables::king_attacks;
use crate::moves::move_descriptions::{
    Move, FLAG_CAPTURE, FLAG_KING_CASTLE, FLAG_QUEEN_CASTLE, FLAG_QUIET,
};

/// One castling option: the right bit, king start and target, the rook's
/// start square, the squares that must be empty and those that must be safe.
struct CastleSpec {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    rook_from: Square,
    must_be_empty: Bitboard,
    must_be_safe: [Square; 2],
    flag: u8,
}

const CASTLES: [[CastleSpec; 2]; 2] = [
    [
        CastleSpec {
            right: CASTLE_LIGHT_KINGSIDE,
            king_from: 4,
            king_to: 6,
            rook_from: 7,
            must_be_empty: (1 << 5) | (1 << 6),
            must_be_safe: [5, 6],
            flag: FLAG_KING_CASTLE,
        },
        CastleSpec {
            right: CASTLE_LIGHT_QUEENSIDE,
            king_from: 4,
            king_to: 2,
            rook_from: 0,
            must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
            must_be_safe: [3, 2],
            flag: FLAG_QUEEN_CASTLE,
        },
    ],
    [
        CastleSpec {
            right: CASTLE_DARK_KINGSIDE,
            king_from: 60,
            king_to: 62,
            rook_from: 63,
            must_be_empty: (1 << 61) | (1 << 62),
            must_be_safe: [61, 62],
            flag: FLAG_KING_CASTLE,
        },
        CastleSpec {
            right: CASTLE_DARK_QUEENSIDE,
            king_from: 60,
            king_to: 58,
            rook_from: 56,
            must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
            must_be_safe: [59, 58],
            flag: FLAG_QUEEN_CASTLE,
        },
    ],
];

/// King steps are gated by the attack test, not the check mask. The king is
/// lifted off the board for that test so it cannot hide behind itself on a
/// checking ray.
pub fn generate_king_moves(
    game_state: &GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let enemy_color = side.opposite();
    let king_bb = game_state.pieces_of(side, PieceKind::King);
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    let enemy = game_state.occupancy_by_color[enemy_color.index()];
    let occupancy_without_king = game_state.occupancy_all & !king_bb;

    let mut targets = king_attacks(from) & mode.target_filter(game_state);
    while targets != 0 {
        let to = pop_lsb(&mut targets);
        let to_bit = square_bit(to);
        if is_square_attacked_with_occupancy(game_state, to_bit, enemy_color, occupancy_without_king) {
            continue;
        }
        let flag = if enemy & to_bit != 0 {
            FLAG_CAPTURE
        } else {
            FLAG_QUIET
        };
        out.push(Move::new(from, to, flag));
    }

    if mode == MoveGenMode::All && !masks.in_check() {
        generate_castling_moves(game_state, from, out);
    }
}

fn generate_castling_moves(game_state: &GameState, king_from: Square, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let own_rook = Some(Piece::new(side, PieceKind::Rook));

    for castle in &CASTLES[side.index()] {
        if game_state.castling_rights & castle.right == 0
            || king_from != castle.king_from
            || game_state.piece_at(castle.rook_from) != own_rook
            || game_state.occupancy_all & castle.must_be_empty != 0
        {
            continue;
        }
        let path_attacked = castle
            .must_be_safe
            .iter()
            .any(|&sq| is_square_attacked(game_state, square_bit(sq), enemy));
        if !path_attacked {
            out.push(Move::new(castle.king_from, castle.king_to, castle.flag));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_checks::compute_check_and_pin_masks;
    use crate::move_generation::legal_move_shared::MoveGenMode;
    use crate::moves::move_descriptions::Move;

    fn king_moves(fen: &str) -> Vec<Move> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let masks = compute_check_and_pin_masks(&game, game.side_to_move);
        let mut out = Vec::new();
        generate_king_moves(&game, &masks, MoveGenMode::All, &mut out);
        out
    }

    #[test]
    fn both_castles_available_on_open_back_rank() {
        let moves = king_moves("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(moves.iter().filter(|m| m.is_castle()).count(), 2);
    }

    #[test]
    fn castling_through_an_attacked_square_is_rejected() {
        // Rook f8 covers f1; queen-side stays available.
        let moves = king_moves("k4r2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let castles: Vec<_> = moves.iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].to(), 2);
    }

    #[test]
    fn no_castling_out_of_check() {
        let moves = king_moves("k3r3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(moves.iter().all(|m| !m.is_castle()));
    }

    #[test]
    fn b1_may_be_attacked_for_queen_side_castle() {
        // Only d1 and c1 must be safe; b1 merely has to be empty.
        let moves = king_moves("kr6/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert!(moves.iter().any(|m| m.is_castle() && m.to() == 2));
    }

    #[test]
    fn king_cannot_retreat_along_the_checking_ray() {
        // Rook a1 checks e1 along the rank; f1 is still on the ray.
        let moves = king_moves("k7/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(moves.iter().all(|m| m.to() != 5));
        assert!(moves.iter().all(|m| m.to() != 3));
    }
}
