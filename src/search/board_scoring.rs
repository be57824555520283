//! Static evaluation interface consulted by the search at quiescence leaves.
//!
//! Search only depends on the [`BoardScorer`] trait; the material scorer here
//! is the baseline implementation used by the binary, tests and benches.

use crate::game_state::{chess_types::*, game_state::GameState};

/// Score of delivering mate at the root. Mates found `n` plies deep score
/// `MATE_SCORE - n`.
pub const MATE_SCORE: i32 = 30000;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1000;

pub const DRAW_SCORE: i32 = 0;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl MaterialScorer {
    #[inline]
    pub const fn piece_value(piece: PieceKind) -> i32 {
        match piece {
            PieceKind::Pawn => 100,
            PieceKind::Knight => 320,
            PieceKind::Bishop => 330,
            PieceKind::Rook => 500,
            PieceKind::Queen => 900,
            PieceKind::King => 0,
        }
    }

    #[inline]
    fn material_balance_white_minus_black(game_state: &GameState) -> i32 {
        PieceKind::ALL
            .iter()
            .map(|&piece| {
                let white = game_state.pieces_of(Color::Light, piece).count_ones() as i32;
                let black = game_state.pieces_of(Color::Dark, piece).count_ones() as i32;
                (white - black) * Self::piece_value(piece)
            })
            .sum()
    }
}

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let white_minus_black = Self::material_balance_white_minus_black(game_state);
        match game_state.side_to_move {
            Color::Light => white_minus_black,
            Color::Dark => -white_minus_black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let white_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let black_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").expect("FEN should parse");

        assert_eq!(MaterialScorer.score(&white_to_move), 900);
        assert_eq!(MaterialScorer.score(&black_to_move), -900);
        assert_eq!(MaterialScorer.score(&GameState::new_game()), 0);
    }
}
