//! Text-level tokenizer on top of [`BpeCodec`].
//!
//! Each text is treated as one continuous byte stream. Batch methods encode
//! or decode many independent texts in parallel via Rayon; the codec is
//! read-only and shared across workers.

use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::{
    codec::BpeCodec,
    config::TrainerConfig,
    error::{DecodeError, EncodeError, ErrorMode, TrainError},
    progress,
    rules::MergeRules,
    trainer::{TrainOutput, train_with_config},
    types::Symbol,
};

/// BPE tokenizer: UTF-8 text in, symbols out, and back.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    codec: BpeCodec,
}

impl From<TrainOutput> for Tokenizer {
    fn from(out: TrainOutput) -> Self {
        Self { codec: out.into() }
    }
}

impl Tokenizer {
    /// Creates a tokenizer from a learned rule table.
    pub fn new(rules: MergeRules) -> Self {
        Self {
            codec: BpeCodec::new(rules),
        }
    }

    /// Trains on `text` and returns the tokenizer along with the encoded
    /// training text.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::ProgressBarSetup`] if the progress bar template
    /// fails to compile.
    pub fn train(text: &str, config: &TrainerConfig) -> Result<(Self, Vec<Symbol>), TrainError> {
        let mut out = train_with_config(text, config)?;
        let ids = std::mem::take(&mut out.ids);
        Ok((Self::from(out), ids))
    }

    /// Encode text as bytes -> BPE.
    pub fn encode(&self, text: &str) -> Vec<Symbol> {
        self.codec.encode_text(text)
    }

    /// Encode many texts in parallel.
    ///
    /// # Returns
    ///
    /// Symbol sequences in the same order as input texts.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::ProgressBarSetup`] if the progress bar template
    /// fails to compile.
    pub fn encode_batch(
        &self,
        texts: &[&str],
        show_progress: bool,
    ) -> Result<Vec<Vec<Symbol>>, EncodeError> {
        let pb = progress::bar_for(show_progress, texts.len() as u64, "Encoding texts")
            .map_err(EncodeError::ProgressBarSetup)?;

        Ok(texts
            .par_iter()
            .progress_with(pb)
            .map(|text| self.encode(text))
            .collect())
    }

    /// Decodes a symbol sequence back into a string.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::CorruptTokenStream`] if a symbol is not in the
    /// vocabulary, or [`DecodeError::InvalidUtf8`] if the decoded bytes are
    /// not valid UTF-8 (only in `Strict` mode).
    pub fn decode(&self, symbols: &[Symbol], errors: ErrorMode) -> Result<String, DecodeError> {
        self.codec.decode(symbols, errors)
    }

    /// Decodes multiple symbol sequences in parallel.
    ///
    /// # Errors
    ///
    /// Fails on the first sequence that fails to decode, or with
    /// [`DecodeError::ProgressBarSetup`] if the progress bar template fails to
    /// compile.
    pub fn decode_batch(
        &self,
        seqs: &[&[Symbol]],
        errors: ErrorMode,
        show_progress: bool,
    ) -> Result<Vec<String>, DecodeError> {
        let pb = progress::bar_for(show_progress, seqs.len() as u64, "Decoding symbols")
            .map_err(DecodeError::ProgressBarSetup)?;

        seqs.par_iter()
            .progress_with(pb)
            .map(|symbols| self.decode(symbols, errors))
            .collect()
    }

    /// Total number of symbols, base bytes included.
    pub fn vocab_size(&self) -> usize {
        self.codec.vocab().len()
    }

    pub fn codec(&self) -> &BpeCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tokenizer(history: Vec<((Symbol, Symbol), Symbol)>) -> Tokenizer {
        let rules = MergeRules::from_history(history).expect("valid history");
        Tokenizer::new(rules)
    }

    #[test]
    fn test_encode_no_merges() {
        let tok = make_tokenizer(vec![]);
        assert_eq!(tok.encode("ab cd"), vec![97, 98, 32, 99, 100]);
    }

    #[test]
    fn test_encode_with_merges() {
        let tok = make_tokenizer(vec![((97, 98), 256)]);
        assert_eq!(tok.encode("ab cd"), vec![256, 32, 99, 100]);
    }

    #[test]
    fn test_unicode_bytes() {
        // 'é' is U+00E9, encoded as [0xC3, 0xA9] in UTF-8
        let tok = make_tokenizer(vec![((0xC3, 0xA9), 256)]);
        assert_eq!(tok.encode("é"), vec![256]);
        assert_eq!(tok.decode(&[256], ErrorMode::Strict).expect("decodable"), "é");
    }

    #[test]
    fn test_encode_batch_parallel() {
        let tok = make_tokenizer(vec![((97, 98), 256)]);
        let results = tok
            .encode_batch(&["ab", "cd", "ab"], false)
            .expect("texts should be batch-encodable");
        assert_eq!(results, vec![vec![256], vec![99, 100], vec![256]]);
    }

    #[test]
    fn test_decode_batch() {
        let tok = make_tokenizer(vec![((97, 98), 256)]);
        let seq1 = vec![256];
        let seq2 = vec![99, 100];
        let seqs: Vec<&[Symbol]> = vec![&seq1, &seq2];
        let decoded = tok
            .decode_batch(&seqs, ErrorMode::Strict, false)
            .expect("sequences should be batch-decodable");
        assert_eq!(decoded, vec!["ab", "cd"]);
    }

    #[test]
    fn test_decode_batch_reports_corrupt_sequence() {
        let tok = make_tokenizer(vec![((97, 98), 256)]);
        let good = vec![256];
        let bad = vec![300];
        let seqs: Vec<&[Symbol]> = vec![&good, &bad];
        let result = tok.decode_batch(&seqs, ErrorMode::Replace, false);
        assert!(matches!(result, Err(DecodeError::CorruptTokenStream(300))));
    }

    #[test]
    fn test_train_round_trip() {
        let text = "low lower lowest newer wider";
        let (tok, ids) = Tokenizer::train(text, &TrainerConfig::new(280)).expect("training failed");

        assert_eq!(tok.encode(text), ids);
        assert_eq!(tok.decode(&ids, ErrorMode::Strict).expect("decodable"), text);
        assert!(tok.vocab_size() > 256);
    }

    #[test]
    fn test_encode_unseen_text() {
        let (tok, _) = Tokenizer::train("banana bandana", &TrainerConfig::new(262))
            .expect("training failed");
        let ids = tok.encode("cabana");
        let replayed = tok.codec().rules().iter().fold(
            crate::types::bytes_to_symbols("cabana"),
            |ids, r| crate::trainer::merge_pair(&ids, r.pair, r.new_id),
        );
        assert_eq!(ids, replayed);
        assert!(ids.len() < "cabana".len());
        assert_eq!(tok.decode(&ids, ErrorMode::Strict).expect("decodable"), "cabana");
    }
}
