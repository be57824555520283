//! Node-count (perft) helpers for validating move generation.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, legal_moves};
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

/// Leaf count at `depth`. Move lists are reused per level.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    let mut lists = vec![Vec::with_capacity(64); depth as usize + 1];
    perft_inner(game_state, depth, &mut lists)
}

fn perft_inner(game_state: &mut GameState, depth: u8, lists: &mut [Vec<Move>]) -> u64 {
    if depth == 0 {
        return 1;
    }

    let Some((moves, rest)) = lists.split_first_mut() else {
        return 0;
    };
    generate_legal_moves(game_state, moves);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for &mv in moves.iter() {
        make_move(game_state, mv);
        nodes += perft_inner(game_state, depth - 1, rest);
        unmake_move(game_state, mv);
    }
    nodes
}

/// Leaf count plus a classification of the moves that reach the leaves.
pub fn perft_counts(game_state: &mut GameState, depth: u8) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    counts_inner(game_state, depth, &mut counts);
    counts
}

fn counts_inner(game_state: &mut GameState, depth: u8, counts: &mut PerftCounts) {
    for mv in legal_moves(game_state) {
        make_move(game_state, mv);
        if depth == 1 {
            counts.nodes += 1;
            counts.captures += u64::from(mv.is_capture());
            counts.en_passant += u64::from(mv.is_en_passant());
            counts.castles += u64::from(mv.is_castle());
            counts.promotions += u64::from(mv.is_promotion());
            if is_king_in_check(game_state, game_state.side_to_move) {
                counts.checks += 1;
                if legal_moves(game_state).is_empty() {
                    counts.checkmates += 1;
                }
            }
        } else {
            counts_inner(game_state, depth - 1, counts);
        }
        unmake_move(game_state, mv);
    }
}

/// Per-root-move subtree sizes, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    legal_moves(game_state)
        .into_iter()
        .map(|mv| {
            make_move(game_state, mv);
            let nodes = perft(game_state, depth - 1);
            unmake_move(game_state, mv);
            (mv, nodes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_counts, perft_divide};
    use crate::game_state::game_state::GameState;

    #[test]
    fn startpos_shallow_node_counts() {
        let mut game = GameState::new_game();
        assert_eq!(perft(&mut game, 0), 1);
        assert_eq!(perft(&mut game, 1), 20);
        assert_eq!(perft(&mut game, 2), 400);
        assert_eq!(perft(&mut game, 3), 8_902);
        assert_eq!(game, GameState::new_game());
    }

    #[test]
    fn kiwipete_depth_two_breakdown() {
        let mut game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let counts = perft_counts(&mut game, 2);
        assert_eq!(counts.nodes, 2_039);
        assert_eq!(counts.captures, 351);
        assert_eq!(counts.en_passant, 1);
        assert_eq!(counts.castles, 91);
        assert_eq!(counts.promotions, 0);
        assert_eq!(counts.checks, 3);
        assert_eq!(counts.checkmates, 0);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut game = GameState::new_game();
        let divide = perft_divide(&mut game, 3);
        assert_eq!(divide.len(), 20);
        assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 8_902);
    }
}
