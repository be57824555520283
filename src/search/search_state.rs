//! Caller-owned tables that persist across searches of one game.
//!
//! Lifecycle: construct once per engine, [`SearchState::new_game`] between
//! games, mutated only by the single search thread while a search runs.

use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;
use crate::search::move_ordering::{MoveOrdering, PieceTo, MAX_PLY};
use crate::search::repetition_table::RepetitionTable;
use crate::search::transposition_table::TranspositionTable;

const LMR_MAX_DEPTH: usize = 64;
const LMR_MAX_MOVES: usize = 256;

/// Late-move reduction amounts indexed by `[depth][move_index]`.
#[derive(Debug, Clone)]
pub struct LmrTable {
    reductions: Box<[[u8; LMR_MAX_MOVES]; LMR_MAX_DEPTH]>,
}

impl Default for LmrTable {
    fn default() -> Self {
        let mut reductions = Box::new([[0u8; LMR_MAX_MOVES]; LMR_MAX_DEPTH]);
        for (depth, row) in reductions.iter_mut().enumerate().skip(1) {
            for (index, cell) in row.iter_mut().enumerate().skip(1) {
                let r = 0.75 + (depth as f64).ln() * (index as f64).ln() / 2.25;
                *cell = r.floor() as u8;
            }
        }
        Self { reductions }
    }
}

impl LmrTable {
    #[inline]
    pub fn reduction(&self, depth: u8, move_index: usize) -> u8 {
        let depth = usize::from(depth).min(LMR_MAX_DEPTH - 1);
        self.reductions[depth][move_index.min(LMR_MAX_MOVES - 1)]
    }
}

#[derive(Debug, Clone)]
pub struct SearchState {
    pub tt: TranspositionTable,
    pub ordering: MoveOrdering,
    /// Positions of the game so far since the last irreversible move.
    pub game_history: RepetitionTable,
    /// Game history plus the active search line.
    pub(crate) repetitions: RepetitionTable,
    pub(crate) lmr: LmrTable,
    /// Key of the move made at each ply of the current line.
    pub(crate) move_keys: [Option<PieceTo>; MAX_PLY + 1],
    move_pool: Vec<Vec<Move>>,
    score_pool: Vec<Vec<i32>>,
    quiet_pool: Vec<Vec<Move>>,
}

impl SearchState {
    pub fn new(tt_size_mb: usize) -> Self {
        Self {
            tt: TranspositionTable::new_with_mb(tt_size_mb),
            ordering: MoveOrdering::default(),
            game_history: RepetitionTable::new(),
            repetitions: RepetitionTable::new(),
            lmr: LmrTable::default(),
            move_keys: [None; MAX_PLY + 1],
            move_pool: vec![Vec::with_capacity(64); MAX_PLY + 1],
            score_pool: vec![Vec::with_capacity(64); MAX_PLY + 1],
            quiet_pool: vec![Vec::with_capacity(64); MAX_PLY + 1],
        }
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.ordering.reset();
        self.game_history.clear();
        self.repetitions.clear();
    }

    /// Adds a position reached in the actual game. An irreversible move
    /// (half-move clock 0) makes every earlier position unreachable.
    pub fn record_position(&mut self, game_state: &GameState) {
        if game_state.halfmove_clock == 0 {
            self.game_history.clear();
        }
        self.game_history.push(game_state.zobrist_key);
    }

    /// Resets the search-line table to the game history, with the root
    /// counted once even if the caller never recorded it.
    pub(crate) fn seed_repetitions(&mut self, root: &GameState) {
        self.repetitions.clone_from(&self.game_history);
        if self.repetitions.count(root.zobrist_key) == 0 {
            self.repetitions.push(root.zobrist_key);
        }
    }

    pub(crate) fn take_buffers(&mut self, ply: usize) -> (Vec<Move>, Vec<i32>, Vec<Move>) {
        (
            std::mem::take(&mut self.move_pool[ply]),
            std::mem::take(&mut self.score_pool[ply]),
            std::mem::take(&mut self.quiet_pool[ply]),
        )
    }

    pub(crate) fn return_buffers(&mut self, ply: usize, buffers: (Vec<Move>, Vec<i32>, Vec<Move>)) {
        self.move_pool[ply] = buffers.0;
        self.score_pool[ply] = buffers.1;
        self.quiet_pool[ply] = buffers.2;
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(16)
    }
}
