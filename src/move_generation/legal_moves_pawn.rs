use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::{is_king_in_check, CheckPinMasks};
use crate::move_generation::legal_move_shared::MoveGenMode;
use crate::moves::attack_tables::pawn_attacks;
use crate::moves::move_descriptions::{
    Move, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT, FLAG_QUIET,
};

const PROMOTION_ORDER: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Bishop,
];

/// Pushes, double pushes, captures, promotions and en passant.
///
/// En passant is the one case decided by simulation: removing the captured
/// pawn can open a rank toward the king that the pin scan cannot see, so each
/// candidate is made, tested and unmade.
pub fn generate_pawn_moves(
    game_state: &mut GameState,
    masks: &CheckPinMasks,
    mode: MoveGenMode,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let enemy = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (promotion_rank, start_rank) = match side {
        Color::Light => (RANK_8, RANK_2),
        Color::Dark => (RANK_1, RANK_7),
    };

    let mut pawns = game_state.pieces_of(side, PieceKind::Pawn);
    while pawns != 0 {
        let from = pop_lsb(&mut pawns);
        let allowed = masks.allowed_for(from);

        let one_step = match side {
            Color::Light => from + 8,
            Color::Dark => from - 8,
        };
        let one_bit = square_bit(one_step);
        if one_bit & empty != 0 {
            if one_bit & allowed != 0 {
                if one_bit & promotion_rank != 0 {
                    push_promotions(from, one_step, false, out);
                } else if mode == MoveGenMode::All {
                    out.push(Move::new(from, one_step, FLAG_QUIET));
                }
            }

            if mode == MoveGenMode::All && square_bit(from) & start_rank != 0 {
                let two_step = match side {
                    Color::Light => from + 16,
                    Color::Dark => from - 16,
                };
                let two_bit = square_bit(two_step);
                if two_bit & empty & allowed != 0 {
                    out.push(Move::new(from, two_step, FLAG_DOUBLE_PAWN_PUSH));
                }
            }
        }

        let mut captures = pawn_attacks(side, from) & enemy & allowed;
        while captures != 0 {
            let to = pop_lsb(&mut captures);
            if square_bit(to) & promotion_rank != 0 {
                push_promotions(from, to, true, out);
            } else {
                out.push(Move::new(from, to, FLAG_CAPTURE));
            }
        }
    }

    generate_en_passant(game_state, out);
}

fn push_promotions(from: Square, to: Square, capture: bool, out: &mut Vec<Move>) {
    for piece in PROMOTION_ORDER {
        out.push(Move::promotion(from, to, piece, capture));
    }
}

fn generate_en_passant(game_state: &mut GameState, out: &mut Vec<Move>) {
    let Some(target) = game_state.en_passant_square() else {
        return;
    };
    let side = game_state.side_to_move;
    // Pawns that attack the target are the ones that can capture onto it.
    let mut candidates =
        pawn_attacks(side.opposite(), target) & game_state.pieces_of(side, PieceKind::Pawn);
    while candidates != 0 {
        let from = pop_lsb(&mut candidates);
        let mv = Move::new(from, target, FLAG_EN_PASSANT);
        make_move(game_state, mv);
        let exposes_king = is_king_in_check(game_state, side);
        unmake_move(game_state, mv);
        if !exposes_king {
            out.push(mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_checks::compute_check_and_pin_masks;
    use crate::move_generation::legal_move_shared::MoveGenMode;
    use crate::moves::move_descriptions::Move;

    fn pawn_moves(fen: &str, mode: MoveGenMode) -> Vec<Move> {
        let mut game = GameState::from_fen(fen).expect("FEN should parse");
        let masks = compute_check_and_pin_masks(&game, game.side_to_move);
        let mut out = Vec::new();
        generate_pawn_moves(&mut game, &masks, mode, &mut out);
        out
    }

    #[test]
    fn starting_pawns_have_sixteen_moves() {
        let moves = pawn_moves(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            MoveGenMode::All,
        );
        assert_eq!(moves.len(), 16);
        assert_eq!(moves.iter().filter(|m| m.is_double_pawn_push()).count(), 8);
    }

    #[test]
    fn promotions_come_in_fours_with_and_without_capture() {
        let moves = pawn_moves("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1", MoveGenMode::All);
        assert_eq!(moves.len(), 8);
        assert_eq!(moves.iter().filter(|m| m.is_capture()).count(), 4);
        assert!(moves.iter().all(|m| m.is_promotion()));
    }

    #[test]
    fn en_passant_is_generated_when_safe() {
        let moves = pawn_moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", MoveGenMode::All);
        assert!(moves.iter().any(|m| m.is_en_passant() && m.to() == 43));
    }

    #[test]
    fn en_passant_exposing_rank_check_is_rejected() {
        // King a5, pawns b5/c5, rook h5: taking c6 would empty the fifth rank.
        let moves = pawn_moves("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 2", MoveGenMode::All);
        assert!(moves.iter().all(|m| !m.is_en_passant()));
    }

    #[test]
    fn tactical_mode_skips_plain_pushes() {
        let moves = pawn_moves("4k3/P7/8/8/8/2p5/3P4/4K3 w - - 0 1", MoveGenMode::Tactical);
        // d2xc3 plus four a8 promotions
        assert_eq!(moves.len(), 5);
        assert!(moves.iter().all(|m| !m.is_quiet()));
    }
}
