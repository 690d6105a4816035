//! Adjacent pair statistics over a symbol sequence.
//!
//! Counts are rebuilt from scratch for every training iteration. Overlapping
//! occurrences are all counted, so `[a, a, a]` yields `(a, a) -> 2` even though
//! a merge pass can only consume one of them.

use std::collections::{HashMap, hash_map};

use crate::types::{PairFreq, Symbol, SymbolPair, TextIdx};

/// Count and first position of a pair in the scanned sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PairStat {
    count: PairFreq,
    /// Index of the leftmost occurrence; used to break count ties.
    first_pos: TextIdx,
}

/// Frequencies of adjacent symbol pairs.
///
/// Lookups of pairs that never occurred return zero.
#[derive(Debug, Default, Clone)]
pub struct PairFrequency {
    stats: HashMap<SymbolPair, PairStat>,
}

impl PairFrequency {
    /// Number of occurrences of `pair`, zero if absent.
    pub fn get(&self, pair: SymbolPair) -> PairFreq {
        self.stats.get(&pair).map_or(0, |s| s.count)
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Iterate `(pair, count)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (SymbolPair, PairFreq)> + '_ {
        self.stats.iter().map(|(&pair, stat)| (pair, stat.count))
    }

    /// The pair with the highest count.
    ///
    /// Ties go to the pair whose first occurrence is leftmost in the sequence.
    /// First positions are unique per pair, so the choice is total and
    /// independent of hash iteration order.
    pub fn most_frequent(&self) -> Option<(SymbolPair, PairFreq)> {
        self.stats
            .iter()
            .max_by(|(_, a), (_, b)| {
                a.count
                    .cmp(&b.count)
                    .then_with(|| b.first_pos.cmp(&a.first_pos))
            })
            .map(|(&pair, stat)| (pair, stat.count))
    }

    fn record(&mut self, pair: SymbolPair, pos: TextIdx) {
        match self.stats.entry(pair) {
            hash_map::Entry::Occupied(mut e) => e.get_mut().count += 1,
            hash_map::Entry::Vacant(e) => {
                e.insert(PairStat {
                    count: 1,
                    first_pos: pos,
                });
            }
        }
    }
}

/// Count every adjacent pair `(seq[i], seq[i + 1])`.
///
/// Returns an empty mapping for sequences shorter than two symbols.
///
/// # Time Complexity
/// O(N) over the sequence length.
pub fn count_pairs(seq: &[Symbol]) -> PairFrequency {
    let mut freqs = PairFrequency::default();
    for (i, w) in seq.windows(2).enumerate() {
        freqs.record(SymbolPair(w[0], w[1]), i);
    }
    freqs
}
