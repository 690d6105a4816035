//! Greedy byte-pair-encoding (BPE) tokenizer.
//!
//! Training repeatedly merges the most frequent adjacent symbol pair of a
//! byte sequence into a new symbol. The ordered rule table it produces drives
//! encoding of new text, and its reverse drives decoding.
//!
//! ```
//! let out = bytepair::train("aaabdaaabac", 259);
//! let text = bytepair::decode(&out.ids, &out.rules).unwrap();
//! assert_eq!(text, "aaabdaaabac");
//! ```
//!
//! With the `python` feature this crate also builds a PyO3 extension module.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]

mod progress;

pub mod codec;
pub mod config;
pub mod counter;
pub mod error;
pub mod rules;
pub mod tokenizer;
pub mod trainer;
pub mod types;
pub mod vocab;

#[cfg(feature = "python")]
mod bindings;

pub use codec::{BpeCodec, decode};
pub use config::TrainerConfig;
pub use counter::{PairFrequency, count_pairs};
pub use error::{ConfigError, DecodeError, EncodeError, ErrorMode, RuleError, TrainError};
pub use rules::{MergeRule, MergeRules, RuleRecord};
pub use tokenizer::Tokenizer;
pub use trainer::{MergeEngine, TrainOutput, TrainSummary, merge_pair, train, train_with_config};
pub use types::{BASE_VOCAB_SIZE, Symbol, SymbolPair};
pub use vocab::Vocabulary;
