//! Type aliases and shared types for BPE training and encoding.
//!
//! These type aliases provide semantic clarity throughout the codebase.

/// Represents a symbol identifier in the vocabulary.
///
/// IDs 0-255 are raw byte values. IDs from 256 upwards are merged
/// symbols, assigned sequentially in the order training created them.
pub type Symbol = usize;

/// Position of a symbol in a symbol sequence.
pub type TextIdx = usize;

/// Frequency count for symbol pairs during training.
pub type PairFreq = usize;

/// Merge order indicates when a merge rule was learned during training.
///
/// Lower values represent earlier merges (e.g., 0 = first merge, 1 = second merge).
pub type MergeOrder = usize;

/// A sequence of raw bytes.
pub type ByteSeq = Vec<u8>;

/// Number of base symbols: one per byte value.
pub const BASE_VOCAB_SIZE: usize = 256;

/// A pair of adjacent symbols.
///
/// Used as a key for looking up merge rules during encoding and for
/// tracking pair frequencies during training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolPair(pub Symbol, pub Symbol);

impl SymbolPair {
    /// Left symbol of the pair.
    pub fn first(&self) -> Symbol {
        self.0
    }

    /// Right symbol of the pair.
    pub fn second(&self) -> Symbol {
        self.1
    }
}

impl From<(Symbol, Symbol)> for SymbolPair {
    fn from((a, b): (Symbol, Symbol)) -> Self {
        SymbolPair(a, b)
    }
}

/// Returns true if `sym` denotes a raw byte rather than a merged symbol.
#[inline]
pub fn is_base_symbol(sym: Symbol) -> bool {
    sym < BASE_VOCAB_SIZE
}

/// Lifts UTF-8 text into its base symbol sequence (one symbol per byte).
pub fn bytes_to_symbols(text: &str) -> Vec<Symbol> {
    text.bytes().map(|b| b as Symbol).collect()
}
