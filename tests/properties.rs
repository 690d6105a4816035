//! Property tests over training, encoding and decoding.

use bytepair::types::bytes_to_symbols;
use bytepair::{BpeCodec, MergeEngine, codec::expand, decode, merge_pair, train};
use proptest::prelude::*;

fn small_alphabet_text() -> impl Strategy<Value = String> {
    // Few distinct characters so that pairs repeat and merges happen.
    "[abc é]{0,48}"
}

proptest! {
    #[test]
    fn prop_round_trip(text in any::<String>(), vocab_size in 200usize..330) {
        let out = train(&text, vocab_size);
        let decoded = decode(&out.ids, &out.rules).expect("trained ids decode");
        prop_assert_eq!(decoded, text);
    }

    #[test]
    fn prop_round_trip_repetitive(text in small_alphabet_text(), vocab_size in 256usize..300) {
        let out = train(&text, vocab_size);
        let decoded = decode(&out.ids, &out.rules).expect("trained ids decode");
        prop_assert_eq!(decoded, text);
    }

    #[test]
    fn prop_vocab_grows_with_rules(text in small_alphabet_text(), vocab_size in 0usize..300) {
        let out = train(&text, vocab_size);
        prop_assert_eq!(out.vocabulary.len(), 256 + out.rules.len());
        prop_assert!(out.rules.len() <= vocab_size.saturating_sub(256));
    }

    #[test]
    fn prop_ids_contiguous(text in small_alphabet_text(), vocab_size in 256usize..300) {
        let out = train(&text, vocab_size);
        let ids: Vec<usize> = out.rules.iter().map(|r| r.new_id).collect();
        let expected: Vec<usize> = (256..256 + out.rules.len()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_vocab_entry_is_full_expansion(
        text in small_alphabet_text(),
        vocab_size in 256usize..300,
    ) {
        let out = train(&text, vocab_size);
        let reverse = out.rules.reverse_map();
        for (id, bytes) in out.vocabulary.iter() {
            let expanded = expand(&[id], &reverse).expect("every vocab id expands");
            prop_assert_eq!(expanded.as_slice(), bytes);
        }
    }

    #[test]
    fn prop_encode_reproduces_training(text in small_alphabet_text(), vocab_size in 256usize..300) {
        let out = train(&text, vocab_size);
        let ids = out.ids.clone();
        let codec = BpeCodec::from(out);
        prop_assert_eq!(codec.encode_text(&text), ids);
    }

    #[test]
    fn prop_encode_unseen_matches_rule_replay(
        train_text in small_alphabet_text(),
        other in small_alphabet_text(),
        vocab_size in 256usize..300,
    ) {
        let out = train(&train_text, vocab_size);
        let expected = out
            .rules
            .iter()
            .fold(bytes_to_symbols(&other), |ids, r| merge_pair(&ids, r.pair, r.new_id));
        let codec = BpeCodec::from(out);
        prop_assert_eq!(codec.encode_text(&other), expected);
    }

    #[test]
    fn prop_arbitrary_bytes_expand_back(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut engine = MergeEngine::from_bytes(&bytes);
        engine.train(20);
        let expanded = expand(engine.encodings(), &engine.rules().reverse_map())
            .expect("trained ids expand");
        prop_assert_eq!(expanded, bytes);
    }
}
