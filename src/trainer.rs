//! Greedy BPE training loop.
//!
//! Each iteration recounts every adjacent pair, merges the most frequent one
//! into a fresh symbol and rewrites the whole sequence. No incremental
//! bookkeeping: the sequence is rebuilt on every merge, so an iteration costs
//! O(N) and a full run O(N * M) for M merges.

use std::fmt;

use log::{debug, info, warn};

use crate::{
    config::TrainerConfig,
    counter::count_pairs,
    error::TrainError,
    progress,
    rules::{MergeRule, MergeRules},
    types::{BASE_VOCAB_SIZE, PairFreq, Symbol, SymbolPair},
    vocab::Vocabulary,
};

/// Result of a training run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainOutput {
    /// The training text as merged symbols.
    pub ids: Vec<Symbol>,
    /// Learned merges in creation order.
    pub rules: MergeRules,
    /// Byte expansion of every symbol.
    pub vocabulary: Vocabulary,
    /// Byte length of the training text.
    pub input_len: usize,
}

impl TrainOutput {
    /// Output symbols per input byte; 1.0 means no compression.
    ///
    /// Returns 0.0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        self.summary().ratio()
    }

    pub fn summary(&self) -> TrainSummary {
        TrainSummary {
            base_size: BASE_VOCAB_SIZE,
            num_merges: self.rules.len(),
            vocab_size: self.vocabulary.len(),
            input_bytes: self.input_len,
            output_ids: self.ids.len(),
        }
    }
}

/// Headline numbers of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainSummary {
    pub base_size: usize,
    pub num_merges: usize,
    pub vocab_size: usize,
    pub input_bytes: usize,
    pub output_ids: usize,
}

impl TrainSummary {
    /// Output ids per input byte, 0.0 for empty input.
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        self.output_ids as f64 / self.input_bytes as f64
    }
}

impl fmt::Display for TrainSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "base symbols: {}", self.base_size)?;
        writeln!(f, "merges: {}", self.num_merges)?;
        writeln!(f, "final vocab size: {}", self.vocab_size)?;
        write!(
            f,
            "input bytes: {}, output ids: {} (ratio {:.2})",
            self.input_bytes,
            self.output_ids,
            self.ratio()
        )
    }
}

/// Stateful merge loop over one byte sequence.
///
/// Holds the current symbol sequence together with the rules and vocabulary
/// learned so far. Each [`merge_step`](Self::merge_step) replaces the
/// sequence wholesale.
#[derive(Debug, Clone)]
pub struct MergeEngine {
    ids: Vec<Symbol>,
    rules: MergeRules,
    vocab: Vocabulary,
    input_len: usize,
}

impl MergeEngine {
    /// Starts from the UTF-8 bytes of `text`.
    pub fn new(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            ids: bytes.iter().map(|&b| b as Symbol).collect(),
            rules: MergeRules::new(),
            vocab: Vocabulary::identity(),
            input_len: bytes.len(),
        }
    }

    /// Perform one merge operation.
    ///
    /// Returns true if a merge was performed, false if no pairs remain.
    pub fn merge_step(&mut self) -> bool {
        let freqs = count_pairs(&self.ids);
        let Some((pair, freq)) = freqs.most_frequent() else {
            return false;
        };

        self.apply(pair, freq);
        true
    }

    /// Train with up to `num_merges` merges, stopping early once the
    /// sequence has no pairs left.
    ///
    /// Returns the number of merges performed.
    pub fn train(&mut self, num_merges: usize) -> usize {
        self.train_with(num_merges, |_| {})
    }

    /// Like [`train`](Self::train), calling `on_merge` with each rule as it
    /// is learned.
    pub fn train_with(
        &mut self,
        num_merges: usize,
        mut on_merge: impl FnMut(&MergeRule),
    ) -> usize {
        for i in 0..num_merges {
            if !self.merge_step() {
                debug!("no more pairs to merge after {i} merges");
                return i;
            }
            if let Some(rule) = self.rules.last() {
                on_merge(rule);
            }
        }
        num_merges
    }

    /// Current symbol sequence.
    pub fn encodings(&self) -> &[Symbol] {
        &self.ids
    }

    pub fn rules(&self) -> &MergeRules {
        &self.rules
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn into_output(self) -> TrainOutput {
        TrainOutput {
            ids: self.ids,
            rules: self.rules,
            vocabulary: self.vocab,
            input_len: self.input_len,
        }
    }

    fn apply(&mut self, pair: SymbolPair, freq: PairFreq) {
        let new_id = self.rules.push(pair);
        let vocab_id = self.vocab.push_merge(pair);
        debug_assert_eq!(new_id, vocab_id);

        debug!(
            "merging pair ({}, {}) -> symbol {new_id} (count {freq})",
            pair.0, pair.1
        );

        self.ids = merge_pair(&self.ids, pair, new_id);
    }
}

/// Replace every non-overlapping occurrence of `pair`, scanning left to right.
///
/// Builds a new sequence; a run of k copies of `(x, x)` becomes k / 2 merged
/// symbols plus a leftover `x` when k is odd.
pub fn merge_pair(ids: &[Symbol], pair: SymbolPair, new_id: Symbol) -> Vec<Symbol> {
    let mut merged = Vec::with_capacity(ids.len());
    let mut i = 0;

    while i < ids.len() {
        if i + 1 < ids.len() && ids[i] == pair.0 && ids[i + 1] == pair.1 {
            merged.push(new_id);
            i += 2;
        } else {
            merged.push(ids[i]);
            i += 1;
        }
    }

    merged
}

/// Train a vocabulary of `target_vocab_size` symbols on `text`.
///
/// A target of 256 or less learns nothing and returns the raw bytes with the
/// identity vocabulary. Training stops early once the text collapses to a
/// single symbol.
///
/// # Example
///
/// ```
/// let out = bytepair::train("aaabdaaabac", 259);
/// assert_eq!(out.ids, vec![258, 100, 258, 97, 99]);
/// ```
pub fn train(text: &str, target_vocab_size: usize) -> TrainOutput {
    run(text, target_vocab_size, |_| {})
}

/// Train according to `config`, optionally drawing a progress bar.
///
/// # Errors
///
/// Returns [`TrainError::ProgressBarSetup`] if the progress bar template
/// fails to compile.
pub fn train_with_config(text: &str, config: &TrainerConfig) -> Result<TrainOutput, TrainError> {
    let num_merges = config.num_merges();
    let pb = progress::bar_for(config.show_progress, num_merges as u64, "Training merges")?;

    let out = run(text, config.vocab_size, |_| pb.inc(1));
    pb.finish_and_clear();

    Ok(out)
}

fn run(text: &str, target_vocab_size: usize, on_merge: impl FnMut(&MergeRule)) -> TrainOutput {
    let mut engine = MergeEngine::new(text);
    let num_merges = target_vocab_size.saturating_sub(BASE_VOCAB_SIZE);

    if num_merges == 0 {
        warn!("vocab size {target_vocab_size} <= {BASE_VOCAB_SIZE}; returning raw byte ids");
        return engine.into_output();
    }

    let performed = engine.train_with(num_merges, on_merge);
    info!(
        "learned {performed} merges over {} bytes -> {} symbols",
        text.len(),
        engine.encodings().len()
    );

    engine.into_output()
}
