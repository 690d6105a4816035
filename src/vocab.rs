//! Symbol to byte-sequence table.

use crate::types::{BASE_VOCAB_SIZE, ByteSeq, Symbol, SymbolPair};

/// Maps every symbol to the exact bytes it expands to.
///
/// - vocab[0..256]: Base vocabulary (single bytes)
/// - vocab[256..]: Merged symbols (concatenated byte sequences)
///
/// Entries are only ever appended, so a byte sequence never changes once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<ByteSeq>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::identity()
    }
}

impl Vocabulary {
    /// The 256-entry byte identity map: `b -> [b]`.
    pub fn identity() -> Self {
        let entries = (0..BASE_VOCAB_SIZE).map(|b| vec![b as u8]).collect();
        Self { entries }
    }

    /// Appends the symbol for `pair` and returns its ID.
    ///
    /// The new entry is the concatenation of both operands' bytes. Callers
    /// guarantee both operands already exist.
    pub(crate) fn push_merge(&mut self, pair: SymbolPair) -> Symbol {
        // Temporary buffer: cannot extend a new entry while borrowing two others.
        let mut merged = Vec::new();
        if let Some(left) = self.entries.get(pair.0) {
            merged.extend_from_slice(left);
        }
        if let Some(right) = self.entries.get(pair.1) {
            merged.extend_from_slice(right);
        }
        self.entries.push(merged);
        self.entries.len() - 1
    }

    /// Bytes for `sym`, if it exists.
    pub fn get(&self, sym: Symbol) -> Option<&[u8]> {
        self.entries.get(sym).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the base bytes are present from construction.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lossy UTF-8 rendering of a symbol's bytes, for reports.
    pub fn display(&self, sym: Symbol) -> Option<String> {
        self.get(sym)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn as_slice(&self) -> &[ByteSeq] {
        &self.entries
    }

    /// `(symbol, bytes)` in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &[u8])> + '_ {
        self.entries.iter().enumerate().map(|(i, b)| (i, b.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let vocab = Vocabulary::identity();
        assert_eq!(vocab.len(), 256);
        assert_eq!(vocab.get(0), Some(&[0u8][..]));
        assert_eq!(vocab.get(255), Some(&[255u8][..]));
        assert_eq!(vocab.get(256), None);
    }

    #[test]
    fn test_push_merge_concatenates() {
        let mut vocab = Vocabulary::identity();
        let ab = vocab.push_merge(SymbolPair(97, 98));
        let abc = vocab.push_merge(SymbolPair(ab, 99));
        assert_eq!(ab, 256);
        assert_eq!(abc, 257);
        assert_eq!(vocab.get(abc), Some(&b"abc"[..]));
        assert_eq!(vocab.display(ab).as_deref(), Some("ab"));
    }

    #[test]
    fn test_display_lossy() {
        let vocab = Vocabulary::identity();
        assert_eq!(vocab.display(0xC3).as_deref(), Some("\u{FFFD}"));
    }
}
