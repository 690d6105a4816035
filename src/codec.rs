//! BPE Codec - applies learned merge rules forward (encode) and in reverse (decode).
//!
//! Encoding replays a fixed rule table over raw bytes, earliest rule first,
//! using a priority queue of merge candidates. For the text a rule table was
//! trained on, this reproduces the training output exactly.
//!
//! Decoding expands merged symbols back into their constituent bytes.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use crate::{
    error::{DecodeError, ErrorMode, RuleError},
    rules::MergeRules,
    trainer::TrainOutput,
    types::{ByteSeq, MergeOrder, Symbol, SymbolPair, bytes_to_symbols, is_base_symbol},
    vocab::Vocabulary,
};

/// Item in the priority queue for merge ordering.
///
/// Candidates are ordered by merge_order (earliest first) with position
/// as a tiebreaker. This ensures we apply merges in the correct training order.
#[derive(Debug, PartialEq, Eq)]
struct MergeCandidate {
    /// Merge order from training (0 = first merge, 1 = second merge, etc.).
    ///
    /// Lower values have higher priority and will be applied first.
    merge_order: MergeOrder,

    /// The symbol pair to be merged.
    pair: SymbolPair,

    /// Position in the symbol sequence where this pair starts.
    ///
    /// Leftmost occurrences of the same rule merge first, which makes runs
    /// like `x x x` merge greedily from the left.
    position: usize,
}

impl PartialOrd for MergeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MergeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed (other vs self) for min-heap behavior from Rust's max-heap BinaryHeap.
        other
            .merge_order
            .cmp(&self.merge_order)
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// Encoder/decoder over a fixed rule table and its vocabulary.
///
/// # Example
///
/// ```
/// use bytepair::{BpeCodec, MergeRules};
///
/// let rules = MergeRules::from_history(vec![((97, 98), 256), ((256, 99), 257)]).unwrap();
/// let codec = BpeCodec::new(rules);
/// assert_eq!(codec.encode_text("abcab"), vec![257, 256]);
/// assert_eq!(codec.decode(&[257, 256], Default::default()).unwrap(), "abcab");
/// ```
#[derive(Debug, Clone)]
pub struct BpeCodec {
    rules: MergeRules,
    vocab: Vocabulary,
}

impl From<TrainOutput> for BpeCodec {
    fn from(out: TrainOutput) -> Self {
        Self {
            rules: out.rules,
            vocab: out.vocabulary,
        }
    }
}

impl BpeCodec {
    /// Creates a codec from a rule table, deriving the vocabulary.
    pub fn new(rules: MergeRules) -> Self {
        let vocab = rules.to_vocabulary();
        Self { rules, vocab }
    }

    /// Creates a codec from persisted merge history.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the history is not a valid rule table.
    pub fn from_history(
        merge_history: impl IntoIterator<Item = ((Symbol, Symbol), Symbol)>,
    ) -> Result<Self, RuleError> {
        Ok(Self::new(MergeRules::from_history(merge_history)?))
    }

    /// Encodes the UTF-8 bytes of `text`.
    pub fn encode_text(&self, text: &str) -> Vec<Symbol> {
        self.encode(bytes_to_symbols(text))
    }

    /// Encodes a symbol sequence by applying learned merge rules.
    ///
    /// Merges are applied in the order they were learned during training,
    /// each rule to all of its non-overlapping occurrences from left to right
    /// before any later rule.
    ///
    /// # Time Complexity
    ///
    /// O(N log N) where N is the input sequence length.
    pub fn encode(&self, symbols: Vec<Symbol>) -> Vec<Symbol> {
        if symbols.len() <= 1 || self.rules.is_empty() {
            return symbols;
        }

        let mut heap = BinaryHeap::new();
        for (position, w) in symbols.windows(2).enumerate() {
            self.push_candidate(&mut heap, SymbolPair(w[0], w[1]), position);
        }

        // A merge writes the new symbol into the left slot and empties the
        // right one, so positions stay stable for queued candidates.
        let mut slots: Vec<Option<Symbol>> = symbols.into_iter().map(Some).collect();

        while let Some(MergeCandidate { pair, position, .. }) = heap.pop() {
            let Some(left) = slots.get(position).copied().flatten() else {
                continue;
            };
            let Some((right_idx, right)) = live_right(&slots, position) else {
                continue;
            };
            if SymbolPair(left, right) != pair {
                continue;
            }
            let Some((merged, _)) = self.rules.get(pair) else {
                continue;
            };

            slots[position] = Some(merged);
            slots[right_idx] = None;

            if let Some((idx, sym)) = live_left(&slots, position) {
                self.push_candidate(&mut heap, SymbolPair(sym, merged), idx);
            }
            if let Some((_, sym)) = live_right(&slots, position) {
                self.push_candidate(&mut heap, SymbolPair(merged, sym), position);
            }
        }

        slots.into_iter().flatten().collect()
    }

    /// Queues `pair` at `position` if some rule merges it.
    fn push_candidate(
        &self,
        heap: &mut BinaryHeap<MergeCandidate>,
        pair: SymbolPair,
        position: usize,
    ) {
        if let Some((_, merge_order)) = self.rules.get(pair) {
            heap.push(MergeCandidate {
                merge_order,
                pair,
                position,
            });
        }
    }

    /// Decodes a symbol sequence to bytes through the vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::CorruptTokenStream`] for a symbol outside the
    /// vocabulary.
    pub fn decode_bytes(&self, symbols: &[Symbol]) -> Result<ByteSeq, DecodeError> {
        let mut result = Vec::with_capacity(symbols.len());
        for &sym in symbols {
            let bytes = self
                .vocab
                .get(sym)
                .ok_or(DecodeError::CorruptTokenStream(sym))?;
            result.extend_from_slice(bytes);
        }
        Ok(result)
    }

    /// Decodes a symbol sequence into text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::CorruptTokenStream`] for a symbol outside the
    /// vocabulary, or [`DecodeError::InvalidUtf8`] if the bytes are not valid
    /// UTF-8 (only in `Strict` mode).
    pub fn decode(&self, symbols: &[Symbol], errors: ErrorMode) -> Result<String, DecodeError> {
        let bytes = self.decode_bytes(symbols)?;
        bytes_to_text(bytes, errors)
    }

    /// Checks if a symbol pair can be merged according to learned rules.
    pub fn can_merge(&self, left: Symbol, right: Symbol) -> bool {
        self.rules.contains(SymbolPair(left, right))
    }

    pub fn num_merges(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &MergeRules {
        &self.rules
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }
}

/// Nearest occupied slot after `pos`, with its symbol.
fn live_right(slots: &[Option<Symbol>], pos: usize) -> Option<(usize, Symbol)> {
    slots
        .get(pos + 1..)?
        .iter()
        .enumerate()
        .find_map(|(offset, slot)| slot.map(|sym| (pos + 1 + offset, sym)))
}

/// Nearest occupied slot before `pos`, with its symbol.
fn live_left(slots: &[Option<Symbol>], pos: usize) -> Option<(usize, Symbol)> {
    slots
        .get(..pos)?
        .iter()
        .enumerate()
        .rev()
        .find_map(|(idx, slot)| slot.map(|sym| (idx, sym)))
}

/// Decodes `ids` using only the rule table.
///
/// Every merged symbol is expanded through the reverse rule map until only
/// bytes remain; bytes are then read as UTF-8 with U+FFFD substituted for
/// malformed sequences.
///
/// # Errors
///
/// Returns [`DecodeError::CorruptTokenStream`] for a symbol >= 256 that no
/// rule produced.
pub fn decode(ids: &[Symbol], rules: &MergeRules) -> Result<String, DecodeError> {
    let bytes = expand(ids, &rules.reverse_map())?;
    bytes_to_text(bytes, ErrorMode::Replace)
}

/// Fully expands `ids` to base bytes.
///
/// Uses a work stack: a merged symbol is replaced by its right then left
/// constituent, so the left one is examined next.
pub fn expand(
    ids: &[Symbol],
    reverse: &HashMap<Symbol, SymbolPair>,
) -> Result<ByteSeq, DecodeError> {
    let mut bytes = Vec::with_capacity(ids.len());
    let mut stack: Vec<Symbol> = Vec::new();

    for &id in ids {
        stack.push(id);
        while let Some(sym) = stack.pop() {
            if let Some(pair) = reverse.get(&sym) {
                stack.push(pair.1);
                stack.push(pair.0);
            } else if is_base_symbol(sym) {
                bytes.push(sym as u8);
            } else {
                return Err(DecodeError::CorruptTokenStream(sym));
            }
        }
    }

    Ok(bytes)
}

fn bytes_to_text(bytes: ByteSeq, errors: ErrorMode) -> Result<String, DecodeError> {
    match errors {
        ErrorMode::Strict => String::from_utf8(bytes).map_err(DecodeError::InvalidUtf8),
        ErrorMode::Replace => Ok(String::from_utf8_lossy(&bytes).into_owned()),
    }
}
