//! Fixed-capacity repetition counter keyed by Zobrist hash.
//!
//! Entries are pushed when a position is entered and popped when it is left,
//! so the table always mirrors the current line (game history plus the
//! active search path).

pub const REPETITION_TABLE_CAPACITY: usize = 512;

#[derive(Debug, Clone)]
pub struct RepetitionTable {
    keys: [u64; REPETITION_TABLE_CAPACITY],
    counts: [u8; REPETITION_TABLE_CAPACITY],
    len: usize,
}

impl Default for RepetitionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RepetitionTable {
    pub const fn new() -> Self {
        Self {
            keys: [0; REPETITION_TABLE_CAPACITY],
            counts: [0; REPETITION_TABLE_CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn position(&self, key: u64) -> Option<usize> {
        self.keys[..self.len].iter().position(|&k| k == key)
    }

    /// Records one more occurrence of `key`.
    ///
    /// # Panics
    ///
    /// Panics when a new distinct key does not fit.
    pub fn push(&mut self, key: u64) {
        if let Some(idx) = self.position(key) {
            self.counts[idx] = self.counts[idx].saturating_add(1);
            return;
        }
        assert!(
            self.len < REPETITION_TABLE_CAPACITY,
            "repetition table full ({REPETITION_TABLE_CAPACITY} distinct positions)"
        );
        self.keys[self.len] = key;
        self.counts[self.len] = 1;
        self.len += 1;
    }

    /// Removes one occurrence of `key`; unknown keys are ignored.
    pub fn pop(&mut self, key: u64) {
        let Some(idx) = self.position(key) else {
            return;
        };
        self.counts[idx] -= 1;
        if self.counts[idx] == 0 {
            self.len -= 1;
            self.keys[idx] = self.keys[self.len];
            self.counts[idx] = self.counts[self.len];
        }
    }

    pub fn count(&self, key: u64) -> u8 {
        self.position(key).map_or(0, |idx| self.counts[idx])
    }

    /// True once the position has been seen twice on the current line.
    #[inline]
    pub fn is_repeated(&self, key: u64) -> bool {
        self.count(key) >= 2
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u8)> + '_ {
        self.keys[..self.len]
            .iter()
            .copied()
            .zip(self.counts[..self.len].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::{RepetitionTable, REPETITION_TABLE_CAPACITY};

    #[test]
    fn push_pop_tracks_counts() {
        let mut table = RepetitionTable::new();
        table.push(7);
        table.push(9);
        table.push(7);

        assert_eq!(table.count(7), 2);
        assert!(table.is_repeated(7));
        assert!(!table.is_repeated(9));
        assert_eq!(table.len(), 2);

        table.pop(7);
        assert_eq!(table.count(7), 1);
        table.pop(7);
        assert_eq!(table.count(7), 0);
        assert_eq!(table.count(9), 1);
        assert_eq!(table.len(), 1);

        table.pop(12345);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn clear_empties_table() {
        let mut table = RepetitionTable::new();
        table.push(1);
        table.push(2);
        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.count(1), 0);
    }

    #[test]
    #[should_panic(expected = "repetition table full")]
    fn overflowing_distinct_keys_panics() {
        let mut table = RepetitionTable::new();
        for key in 0..=REPETITION_TABLE_CAPACITY as u64 {
            table.push(key);
        }
    }
}
