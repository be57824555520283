//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! One slot per index, no chaining. A store replaces the slot unless the
//! resident entry was searched strictly deeper. Mate scores are stored
//! relative to the node and rebased to the probing ply on the way out.

use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::MATE_THRESHOLD;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub cutoffs: u64,
    pub stores: u64,
}

/// Outcome of [`TranspositionTable::look_up`] on a key match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTLookup {
    pub best_move: Option<Move>,
    /// Score usable as the node's result without searching.
    pub cutoff: Option<i32>,
    pub alpha: i32,
    pub beta: i32,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new_with_mb(size_mb: usize) -> Self {
        Self {
            entries: vec![None; Self::entry_count(size_mb)],
            stats: TTStats::default(),
        }
    }

    fn entry_count(size_mb: usize) -> usize {
        let bytes = size_mb.max(1) * 1024 * 1024;
        let entry_size = std::mem::size_of::<Option<TTEntry>>().max(1);
        (bytes / entry_size).max(1)
    }

    /// Reallocates to `size_mb`, dropping every entry.
    pub fn resize(&mut self, size_mb: usize) {
        let count = Self::entry_count(size_mb);
        trace!(size_mb, entries = count, "resizing transposition table");
        self.entries = vec![None; count];
        self.stats = TTStats::default();
    }

    pub fn clear(&mut self) {
        trace!(entries = self.entries.len(), "clearing transposition table");
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = TTStats::default();
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        ((key ^ (key >> 32)) as usize) % self.entries.len()
    }

    /// Raw entry for `key`, if resident. Does not touch the statistics.
    pub fn probe(&self, key: u64) -> Option<TTEntry> {
        self.entries[self.idx(key)].filter(|e| e.key == key)
    }

    pub fn store(&mut self, key: u64, best_move: Option<Move>, score: i32, depth: u8, bound: Bound, ply: u8) {
        let idx = self.idx(key);
        if let Some(existing) = self.entries[idx] {
            if existing.depth > depth {
                return;
            }
        }
        self.stats.stores += 1;
        self.entries[idx] = Some(TTEntry {
            key,
            best_move,
            score: score_to_tt(score, ply),
            depth,
            bound,
        });
    }

    /// Probes for `key` with the caller's window.
    ///
    /// Entries shallower than `depth` only contribute their best move. Deep
    /// enough entries either produce a cutoff score or tighten one side of
    /// the window.
    pub fn look_up(&mut self, key: u64, alpha: i32, beta: i32, depth: u8, ply: u8) -> Option<TTLookup> {
        self.stats.probes += 1;
        let entry = self.probe(key)?;
        self.stats.hits += 1;

        let mut lookup = TTLookup {
            best_move: entry.best_move,
            cutoff: None,
            alpha,
            beta,
        };
        if entry.depth < depth {
            return Some(lookup);
        }

        let score = score_from_tt(entry.score, ply);
        match entry.bound {
            Bound::Exact => lookup.cutoff = Some(score),
            Bound::Lower if score >= beta => lookup.cutoff = Some(score),
            Bound::Upper if score <= alpha => lookup.cutoff = Some(score),
            Bound::Lower => lookup.alpha = alpha.max(score),
            Bound::Upper => lookup.beta = beta.min(score),
        }
        if lookup.cutoff.is_some() {
            self.stats.cutoffs += 1;
        }
        Some(lookup)
    }
}

/// Converts a root-relative mate score into a node-relative one.
#[inline]
pub fn score_to_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score + i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score - i32::from(ply)
    } else {
        score
    }
}

#[inline]
pub fn score_from_tt(score: i32, ply: u8) -> i32 {
    if score >= MATE_THRESHOLD {
        score - i32::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score + i32::from(ply)
    } else {
        score
    }
}
