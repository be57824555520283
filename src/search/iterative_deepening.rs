//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Each iteration runs a fail-soft alpha-beta search from the root with a
//! transposition table, late-move reductions and a quiescence search at the
//! horizon. The reported move always comes from the last completed depth: an
//! iteration interrupted by the clock or node cap is discarded whole.
//!
//! Cancellation travels by return value. Every search function returns
//! `None` once the context is canceled, and each caller unmakes its move
//! before passing the `None` up.

use crate::game_state::chess_rules::{is_insufficient_material, FIFTY_MOVE_HALFMOVES};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move, unmake_move};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{
    generate_capture_moves, generate_legal_moves, legal_moves,
};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, DRAW_SCORE, MATE_SCORE, MATE_THRESHOLD};
use crate::search::move_ordering::{pick_move, OrderingContext, PieceTo, HIGH_HISTORY, MAX_PLY};
use crate::search::search_state::SearchState;
use crate::search::transposition_table::{Bound, TTStats, TranspositionTable};
use crate::utils::long_algebraic::move_to_long_algebraic;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const INFINITY: i32 = MATE_SCORE + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub movetime_ms: Option<u64>,
    pub max_nodes: Option<u64>,
    pub quiescence_max_ply: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            movetime_ms: None,
            max_nodes: None,
            quiescence_max_ply: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// All visited nodes, quiescence included.
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub beta_cutoffs: u64,
    pub tt: TTStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub principal_variation: Vec<Move>,
    pub stats: SearchStats,
    pub elapsed_ms: u64,
    pub nps: u64,
}

struct SearchContext<'a, S: BoardScorer> {
    scorer: &'a S,
    quiescence_max_ply: u8,
    deadline: Option<Instant>,
    max_nodes: Option<u64>,
    enforce_limits: bool,
    canceled: bool,
    pv_move: Option<Move>,
    root_best: Option<Move>,
    stats: SearchStats,
}

impl<S: BoardScorer> SearchContext<'_, S> {
    /// Polled before every node and every move. Limits only apply once the
    /// first iteration has produced a move.
    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.canceled {
            return true;
        }
        if !self.enforce_limits {
            return false;
        }
        if self.max_nodes.is_some_and(|cap| self.stats.nodes >= cap)
            || self.deadline.is_some_and(|limit| Instant::now() >= limit)
        {
            self.canceled = true;
        }
        self.canceled
    }
}

/// Searches `game_state` and returns the best move of the deepest completed
/// iteration. `state` carries the transposition table, ordering tables and
/// game history between calls.
pub fn iterative_deepening_search<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    state: &mut SearchState,
    config: &SearchConfig,
) -> SearchResult {
    let started_at = Instant::now();
    let mut root = game_state.clone();
    root.undo_stack.clear();
    state.tt.reset_stats();

    let mut ctx = SearchContext {
        scorer,
        quiescence_max_ply: config.quiescence_max_ply,
        deadline: config
            .movetime_ms
            .map(|ms| started_at + Duration::from_millis(ms.max(1))),
        max_nodes: config.max_nodes.filter(|n| *n > 0),
        enforce_limits: false,
        canceled: false,
        pv_move: None,
        root_best: None,
        stats: SearchStats::default(),
    };

    let mut result = SearchResult::default();

    if config.max_depth == 0 {
        result.best_score = scorer.score(&root);
        result.stats.nodes = 1;
        return result;
    }

    if legal_moves(&mut root).is_empty() {
        result.best_score = if is_king_in_check(&root, root.side_to_move) {
            -MATE_SCORE
        } else {
            DRAW_SCORE
        };
        result.stats.nodes = 1;
        return result;
    }

    for depth in 1..=config.max_depth.min((MAX_PLY - 1) as u8) {
        ctx.enforce_limits = depth > 1;
        if ctx.should_stop() {
            break;
        }

        state.seed_repetitions(&root);
        state.ordering.clear_killers();
        ctx.pv_move = result.best_move;
        ctx.root_best = None;

        let score = alpha_beta(&mut root, &mut ctx, state, depth, -INFINITY, INFINITY, 0);
        let (Some(score), Some(best_move)) = (score, ctx.root_best) else {
            debug!(depth, nodes = ctx.stats.nodes, "search iteration abandoned");
            break;
        };

        result.best_move = Some(best_move);
        result.best_score = score;
        result.reached_depth = depth;
        info!(
            depth,
            score,
            nodes = ctx.stats.nodes,
            best_move = %move_to_long_algebraic(best_move),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "search depth completed"
        );

        if score.abs() >= MATE_THRESHOLD && MATE_SCORE - score.abs() <= i32::from(depth) {
            break;
        }
    }

    result.principal_variation =
        principal_variation_from_tt(&root, &state.tt, result.reached_depth.into());
    result.stats = SearchStats {
        tt: state.tt.stats(),
        ..ctx.stats
    };
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result.nps = if result.elapsed_ms == 0 {
        0
    } else {
        result.stats.nodes.saturating_mul(1000) / result.elapsed_ms
    };

    result
}

#[inline]
fn is_search_draw(game_state: &GameState, state: &SearchState) -> bool {
    game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES
        || state.repetitions.is_repeated(game_state.zobrist_key)
        || is_insufficient_material(game_state)
}

#[inline]
fn negate(score: Option<i32>) -> Option<i32> {
    score.map(|s| -s)
}

fn alpha_beta<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    state: &mut SearchState,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    ply: usize,
) -> Option<i32> {
    if depth == 0 {
        return quiescence(game_state, ctx, state, alpha, beta, ply, 0);
    }
    if ctx.should_stop() {
        return None;
    }
    ctx.stats.nodes += 1;

    let is_root = ply == 0;
    if !is_root {
        if is_search_draw(game_state, state) {
            return Some(DRAW_SCORE);
        }
        if ply >= MAX_PLY - 1 {
            return Some(ctx.scorer.score(game_state));
        }
    }

    let key = game_state.zobrist_key;
    let mut tt_move = None;
    if let Some(hit) = state.tt.look_up(key, alpha, beta, depth, ply as u8) {
        tt_move = hit.best_move;
        if !is_root {
            if let Some(score) = hit.cutoff {
                return Some(score);
            }
            alpha = hit.alpha;
            beta = hit.beta;
        }
    }

    let mut buffers = state.take_buffers(ply);
    let outcome = search_moves(game_state, ctx, state, &mut buffers, depth, alpha, beta, ply, tt_move);
    state.return_buffers(ply, buffers);

    let (best_score, best_move) = outcome?;
    let bound = if best_score <= alpha {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    state.tt.store(key, best_move, best_score, depth, bound, ply as u8);
    Some(best_score)
}

/// Move loop of [`alpha_beta`]; `buffers` are this ply's pooled move,
/// score and searched-quiet lists. Returns the best score and move.
#[allow(clippy::too_many_arguments)]
fn search_moves<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    state: &mut SearchState,
    (moves, scores, quiets): &mut (Vec<Move>, Vec<i32>, Vec<Move>),
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    tt_move: Option<Move>,
) -> Option<(i32, Option<Move>)> {
    let side = game_state.side_to_move;
    let in_check = is_king_in_check(game_state, side);

    generate_legal_moves(game_state, moves);
    if moves.is_empty() {
        let score = if in_check {
            -MATE_SCORE + ply as i32
        } else {
            DRAW_SCORE
        };
        return Some((score, None));
    }

    let order_ctx = OrderingContext {
        ply,
        pv_move: if ply == 0 { ctx.pv_move } else { None },
        tt_move,
        previous: ply.checked_sub(1).and_then(|p| state.move_keys[p]),
        follow_up_of: ply.checked_sub(2).and_then(|p| state.move_keys[p]),
    };
    state.ordering.score_moves(game_state, moves, &order_ctx, scores);
    quiets.clear();

    let pv_node = beta - alpha > 1;
    let mut best_score = -INFINITY;
    let mut best_move = None;
    let mut cutoff = false;

    for index in 0..moves.len() {
        if ctx.should_stop() {
            return None;
        }
        let mv = pick_move(moves, scores, index);
        let is_quiet = !mv.is_capture() && !mv.is_promotion();

        let reducible = index > 0
            && is_quiet
            && !in_check
            && Some(mv) != tt_move
            && !state.ordering.is_killer(ply, mv)
            && !(pv_node && index <= 2)
            && state.ordering.history_score(side, mv) < HIGH_HISTORY;

        state.move_keys[ply] = PieceTo::of_move(game_state, mv);
        make_move(game_state, mv);
        state.repetitions.push(game_state.zobrist_key);

        let gives_check = is_king_in_check(game_state, game_state.side_to_move);
        let child_depth = depth - 1;
        let score = if index == 0 {
            negate(alpha_beta(game_state, ctx, state, child_depth, -beta, -alpha, ply + 1))
        } else {
            let reduction = if reducible && !gives_check {
                state.lmr.reduction(depth, index)
            } else {
                0
            };
            let probe_depth = child_depth.saturating_sub(reduction);
            match negate(alpha_beta(game_state, ctx, state, probe_depth, -alpha - 1, -alpha, ply + 1)) {
                Some(s) if s > alpha && (reduction > 0 || s < beta) => {
                    negate(alpha_beta(game_state, ctx, state, child_depth, -beta, -alpha, ply + 1))
                }
                other => other,
            }
        };

        state.repetitions.pop(game_state.zobrist_key);
        unmake_move(game_state, mv);
        let score = score?;

        if is_quiet {
            quiets.push(mv);
        }
        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            if ply == 0 {
                ctx.root_best = Some(mv);
            }
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.stats.beta_cutoffs += 1;
            if is_quiet {
                state
                    .ordering
                    .record_quiet_cutoff(side, mv, depth, &order_ctx, quiets);
            }
            cutoff = true;
            break;
        }
    }

    if !cutoff {
        state.ordering.penalize_quiets(side, depth, quiets);
    }

    Some((best_score, best_move))
}

/// Horizon search: captures and promotions with a stand-pat floor, or every
/// evasion when in check. Positions made here are not added to the
/// repetition table.
fn quiescence<S: BoardScorer>(
    game_state: &mut GameState,
    ctx: &mut SearchContext<'_, S>,
    state: &mut SearchState,
    mut alpha: i32,
    mut beta: i32,
    ply: usize,
    qply: u8,
) -> Option<i32> {
    if ctx.should_stop() {
        return None;
    }
    ctx.stats.nodes += 1;
    ctx.stats.quiescence_nodes += 1;

    if is_search_draw(game_state, state) {
        return Some(DRAW_SCORE);
    }
    if ply >= MAX_PLY - 1 {
        return Some(ctx.scorer.score(game_state));
    }

    let key = game_state.zobrist_key;
    let mut tt_move = None;
    if let Some(hit) = state.tt.look_up(key, alpha, beta, 0, ply as u8) {
        if let Some(score) = hit.cutoff {
            return Some(score);
        }
        tt_move = hit.best_move;
        alpha = hit.alpha;
        beta = hit.beta;
    }

    let alpha_orig = alpha;
    let in_check = is_king_in_check(game_state, game_state.side_to_move);
    let (mut moves, mut scores, quiets) = state.take_buffers(ply);

    let mut best_score = -INFINITY;
    if in_check {
        generate_legal_moves(game_state, &mut moves);
        if moves.is_empty() {
            state.return_buffers(ply, (moves, scores, quiets));
            return Some(-MATE_SCORE + ply as i32);
        }
    } else {
        let stand_pat = ctx.scorer.score(game_state);
        if stand_pat >= beta || qply >= ctx.quiescence_max_ply {
            state.return_buffers(ply, (moves, scores, quiets));
            return Some(stand_pat);
        }
        best_score = stand_pat;
        alpha = alpha.max(stand_pat);
        generate_capture_moves(game_state, &mut moves);
    }

    let order_ctx = OrderingContext {
        ply,
        tt_move,
        ..OrderingContext::default()
    };
    state.ordering.score_moves(game_state, &moves, &order_ctx, &mut scores);

    let mut best_move = None;
    let mut canceled = false;
    for index in 0..moves.len() {
        let mv = pick_move(&mut moves, &mut scores, index);
        make_move(game_state, mv);
        let score = negate(quiescence(game_state, ctx, state, -beta, -alpha, ply + 1, qply + 1));
        unmake_move(game_state, mv);

        let Some(score) = score else {
            canceled = true;
            break;
        };
        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            ctx.stats.beta_cutoffs += 1;
            break;
        }
    }
    state.return_buffers(ply, (moves, scores, quiets));

    if canceled {
        return None;
    }

    let bound = if best_score <= alpha_orig {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    state.tt.store(key, best_move, best_score, 0, bound, ply as u8);
    Some(best_score)
}

/// Follows stored best moves from `game_state`, stopping at the first
/// missing or illegal entry, at a repeated position or after `max_len`.
pub fn principal_variation_from_tt(
    game_state: &GameState,
    tt: &TranspositionTable,
    max_len: usize,
) -> Vec<Move> {
    let mut pv = Vec::new();
    let mut state = game_state.clone();
    let mut seen = vec![state.zobrist_key];

    while pv.len() < max_len {
        let Some(best_move) = tt.probe(state.zobrist_key).and_then(|e| e.best_move) else {
            break;
        };
        if !legal_moves(&mut state).contains(&best_move) {
            break;
        }
        make_move(&mut state, best_move);
        pv.push(best_move);
        if seen.contains(&state.zobrist_key) {
            break;
        }
        seen.push(state.zobrist_key);
    }

    pv
}
