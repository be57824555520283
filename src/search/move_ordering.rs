//! Move ordering heuristics: priority bands, MVV-LVA, killer, counter and
//! follow-up moves, and a gravity-bounded history table.
//!
//! Bands, high to low:
//! PV move, TT move, promotions, good captures, first killer, counter move,
//! follow-up move, second killer, quiet moves by history, bad captures.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::Move;

pub const MAX_PLY: usize = 128;

pub const HISTORY_CAP: i32 = 16384;
/// Quiet moves with history above this are not reduced by LMR.
pub const HIGH_HISTORY: i32 = HISTORY_CAP / 2;

const PV_SCORE: i32 = 1_000_000;
const TT_SCORE: i32 = 900_000;
const PROMOTION_SCORE: i32 = 800_000;
const GOOD_CAPTURE_SCORE: i32 = 700_000;
const KILLER_1_SCORE: i32 = 600_000;
const COUNTER_SCORE: i32 = 500_000;
const FOLLOW_UP_SCORE: i32 = 400_000;
const KILLER_2_SCORE: i32 = 300_000;
const QUIET_SCORE: i32 = 100_000;
const BAD_CAPTURE_SCORE: i32 = 0;

/// A (colored piece, destination) pair identifying a previous move for the
/// counter and follow-up tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceTo {
    piece: u8,
    to: Square,
}

impl PieceTo {
    #[inline]
    pub fn new(piece: Piece, to: Square) -> Self {
        Self {
            piece: (piece.color.index() * 6 + piece.kind.index()) as u8,
            to,
        }
    }

    /// Key for `mv` as it stands before being made.
    #[inline]
    pub fn of_move(game_state: &GameState, mv: Move) -> Option<Self> {
        game_state.piece_at(mv.from()).map(|piece| Self::new(piece, mv.to()))
    }
}

/// Per-node inputs for ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderingContext {
    pub ply: usize,
    pub pv_move: Option<Move>,
    pub tt_move: Option<Move>,
    /// Opponent's move one ply back.
    pub previous: Option<PieceTo>,
    /// Own move two plies back.
    pub follow_up_of: Option<PieceTo>,
}

#[derive(Debug, Clone)]
pub struct MoveOrdering {
    history: Box<[[[i32; 64]; 64]; 2]>,
    killers: [[Option<Move>; 2]; MAX_PLY],
    counter_moves: [[Option<Move>; 64]; 12],
    follow_up_moves: [[Option<Move>; 64]; 12],
}

impl Default for MoveOrdering {
    fn default() -> Self {
        Self {
            history: Box::new([[[0; 64]; 64]; 2]),
            killers: [[None; 2]; MAX_PLY],
            counter_moves: [[None; 64]; 12],
            follow_up_moves: [[None; 64]; 12],
        }
    }
}

impl MoveOrdering {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn clear_killers(&mut self) {
        self.killers.fill([None; 2]);
    }

    #[inline]
    pub fn history_score(&self, color: Color, mv: Move) -> i32 {
        self.history[color.index()][usize::from(mv.from())][usize::from(mv.to())]
    }

    #[inline]
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        ply < MAX_PLY && self.killers[ply].contains(&Some(mv))
    }

    #[inline]
    fn counter_move(&self, previous: Option<PieceTo>) -> Option<Move> {
        previous.and_then(|p| self.counter_moves[usize::from(p.piece)][usize::from(p.to)])
    }

    #[inline]
    fn follow_up_move(&self, follow_up_of: Option<PieceTo>) -> Option<Move> {
        follow_up_of.and_then(|p| self.follow_up_moves[usize::from(p.piece)][usize::from(p.to)])
    }

    /// Fills `scores` with one ordering score per move.
    pub fn score_moves(
        &self,
        game_state: &GameState,
        moves: &[Move],
        ctx: &OrderingContext,
        scores: &mut Vec<i32>,
    ) {
        scores.clear();
        let side = game_state.side_to_move;
        let killers = if ctx.ply < MAX_PLY {
            self.killers[ctx.ply]
        } else {
            [None; 2]
        };
        let counter = self.counter_move(ctx.previous);
        let follow_up = self.follow_up_move(ctx.follow_up_of);

        scores.extend(moves.iter().map(|&mv| {
            let as_option = Some(mv);
            if as_option == ctx.pv_move {
                PV_SCORE
            } else if as_option == ctx.tt_move {
                TT_SCORE
            } else if let Some(piece) = mv.promotion_piece() {
                PROMOTION_SCORE + piece.exchange_value() * 16 + captured_value(game_state, mv)
            } else if mv.is_capture() {
                capture_score(game_state, mv)
            } else if as_option == killers[0] {
                KILLER_1_SCORE
            } else if as_option == counter {
                COUNTER_SCORE
            } else if as_option == follow_up {
                FOLLOW_UP_SCORE
            } else if as_option == killers[1] {
                KILLER_2_SCORE
            } else {
                QUIET_SCORE + self.history_score(side, mv)
            }
        }));
    }

    /// Records a quiet move that caused a beta cutoff. `searched_quiets`
    /// are the quiet moves tried before it at this node.
    pub fn record_quiet_cutoff(
        &mut self,
        color: Color,
        mv: Move,
        depth: u8,
        ctx: &OrderingContext,
        searched_quiets: &[Move],
    ) {
        let bonus = history_bonus(depth);
        self.apply_history(color, mv, bonus);
        for &other in searched_quiets.iter().filter(|&&m| m != mv) {
            self.apply_history(color, other, history_malus(bonus));
        }

        if ctx.ply < MAX_PLY && self.killers[ctx.ply][0] != Some(mv) {
            self.killers[ctx.ply][1] = self.killers[ctx.ply][0];
            self.killers[ctx.ply][0] = Some(mv);
        }
        if let Some(p) = ctx.previous {
            self.counter_moves[usize::from(p.piece)][usize::from(p.to)] = Some(mv);
        }
        if let Some(p) = ctx.follow_up_of {
            self.follow_up_moves[usize::from(p.piece)][usize::from(p.to)] = Some(mv);
        }
    }

    /// Node finished without a cutoff: every searched quiet loses a little.
    pub fn penalize_quiets(&mut self, color: Color, depth: u8, searched_quiets: &[Move]) {
        let malus = history_malus(history_bonus(depth));
        for &mv in searched_quiets {
            self.apply_history(color, mv, malus);
        }
    }

    fn apply_history(&mut self, color: Color, mv: Move, bonus: i32) {
        let entry =
            &mut self.history[color.index()][usize::from(mv.from())][usize::from(mv.to())];
        *entry += bonus - *entry * bonus.abs() / HISTORY_CAP;
    }
}

#[inline]
fn history_bonus(depth: u8) -> i32 {
    (i32::from(depth) * i32::from(depth)).min(64)
}

#[inline]
fn history_malus(bonus: i32) -> i32 {
    -(bonus / 16).max(1)
}

fn captured_value(game_state: &GameState, mv: Move) -> i32 {
    if mv.is_en_passant() {
        return PieceKind::Pawn.exchange_value();
    }
    game_state
        .piece_at(mv.to())
        .map_or(0, |piece| piece.kind.exchange_value())
}

fn capture_score(game_state: &GameState, mv: Move) -> i32 {
    let victim = captured_value(game_state, mv);
    let attacker = game_state
        .piece_at(mv.from())
        .map_or(0, |piece| piece.kind.exchange_value());
    let mvv_lva = victim * 16 - attacker;
    if victim >= attacker {
        GOOD_CAPTURE_SCORE + mvv_lva
    } else {
        BAD_CAPTURE_SCORE + mvv_lva
    }
}

/// Swaps the best-scoring move among `moves[start..]` into `start` and
/// returns it. Scores travel with their moves.
pub fn pick_move(moves: &mut [Move], scores: &mut [i32], start: usize) -> Move {
    let mut best = start;
    for idx in start + 1..moves.len() {
        if scores[idx] > scores[best] {
            best = idx;
        }
    }
    moves.swap(start, best);
    scores.swap(start, best);
    moves[start]
}

#[cfg(test)]
mod tests {
    use super::{pick_move, MoveOrdering, OrderingContext, PieceTo, HISTORY_CAP};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_generator::legal_moves;
    use crate::moves::move_descriptions::Move;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn ordered(game: &mut GameState, ordering: &MoveOrdering, ctx: &OrderingContext) -> Vec<Move> {
        let mut moves = legal_moves(game);
        let mut scores = Vec::new();
        ordering.score_moves(game, &moves, ctx, &mut scores);
        (0..moves.len())
            .map(|i| pick_move(&mut moves, &mut scores, i))
            .collect()
    }

    #[test]
    fn bands_order_tt_promotion_captures_and_quiets() {
        // Pawn can promote on b8; d3 can be taken by the pawn (even trade)
        // or by the rook (losing trade).
        let mut game = GameState::from_fen("4k3/1P6/8/3q4/8/3p4/2P5/3RK3 w - - 0 1")
            .expect("FEN should parse");
        let ordering = MoveOrdering::default();
        let tt_move = long_algebraic_to_move("e1f2", &mut game).expect("legal");
        let ctx = OrderingContext {
            tt_move: Some(tt_move),
            ..OrderingContext::default()
        };

        let order = ordered(&mut game, &ordering, &ctx);
        assert_eq!(order[0], tt_move);
        assert_eq!(order[1], long_algebraic_to_move("b7b8q", &mut game).expect("legal"));
        assert!(order[1..5].iter().all(|m| m.is_promotion()));

        let cxd3 = long_algebraic_to_move("c2d3", &mut game).expect("legal");
        let rxd3 = long_algebraic_to_move("d1d3", &mut game).expect("legal");
        assert_eq!(order[5], cxd3);
        assert!(!order[6].is_capture());
        assert_eq!(order.last(), Some(&rxd3));
    }

    #[test]
    fn bad_capture_sorts_after_quiets() {
        // Queen takes a pawn defended by a pawn.
        let mut game =
            GameState::from_fen("4k3/8/2p5/3p4/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let ordering = MoveOrdering::default();
        let order = ordered(&mut game, &ordering, &OrderingContext::default());
        let qxd5 = long_algebraic_to_move("d1d5", &mut game).expect("legal");
        assert_eq!(order.last(), Some(&qxd5));
    }

    #[test]
    fn cutoff_updates_killers_counter_and_history() {
        let mut game = GameState::new_game();
        let mut ordering = MoveOrdering::default();
        let e2e4 = long_algebraic_to_move("e2e4", &mut game).expect("legal");
        let d2d4 = long_algebraic_to_move("d2d4", &mut game).expect("legal");
        let g1f3 = long_algebraic_to_move("g1f3", &mut game).expect("legal");
        let previous = PieceTo::of_move(&game, g1f3);
        let ctx = OrderingContext {
            ply: 3,
            previous,
            ..OrderingContext::default()
        };

        ordering.record_quiet_cutoff(Color::Light, e2e4, 4, &ctx, &[d2d4, e2e4]);
        assert!(ordering.is_killer(3, e2e4));
        assert!(!ordering.is_killer(2, e2e4));
        assert_eq!(ordering.history_score(Color::Light, e2e4), 16);
        assert_eq!(ordering.history_score(Color::Light, d2d4), -1);
        assert_eq!(ordering.history_score(Color::Dark, e2e4), 0);

        let order = ordered(&mut game, &ordering, &ctx);
        assert_eq!(order[0], e2e4);
        assert_eq!(order.last(), Some(&d2d4));

        ordering.record_quiet_cutoff(Color::Light, d2d4, 4, &ctx, &[d2d4]);
        let order = ordered(&mut game, &ordering, &ctx);
        assert_eq!(order[0], d2d4);
        // e2e4 slid to the second killer slot.
        assert_eq!(order[1], e2e4);

        ordering.reset();
        assert!(!ordering.is_killer(3, d2d4));
        assert_eq!(ordering.history_score(Color::Light, d2d4), 0);
    }

    #[test]
    fn history_saturates_below_cap() {
        let mut ordering = MoveOrdering::default();
        let mv = Move::new(12, 28, 0);
        for _ in 0..10_000 {
            ordering.record_quiet_cutoff(Color::Light, mv, 20, &OrderingContext::default(), &[mv]);
        }
        let score = ordering.history_score(Color::Light, mv);
        assert!(score > HISTORY_CAP / 2 && score <= HISTORY_CAP, "got {score}");

        for _ in 0..100_000 {
            ordering.penalize_quiets(Color::Light, 20, &[mv]);
        }
        let score = ordering.history_score(Color::Light, mv);
        assert!(score < 0 && score >= -HISTORY_CAP, "got {score}");
    }

    #[test]
    fn pick_move_keeps_scores_aligned() {
        let mut moves = vec![Move::new(0, 1, 0), Move::new(0, 2, 0), Move::new(0, 3, 0)];
        let mut scores = vec![5, 20, 10];
        assert_eq!(pick_move(&mut moves, &mut scores, 0), Move::new(0, 2, 0));
        assert_eq!(pick_move(&mut moves, &mut scores, 1), Move::new(0, 3, 0));
        assert_eq!(scores, vec![20, 10, 5]);
    }
}
