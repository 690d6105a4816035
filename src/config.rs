//! Training configuration.

use crate::types::BASE_VOCAB_SIZE;

/// Default target vocabulary size: 256 bytes plus 44 merges.
pub const DEFAULT_VOCAB_SIZE: usize = 300;

/// Settings for a training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerConfig {
    /// Target vocabulary size, base bytes included.
    ///
    /// Values of 256 or less mean no merges are learned.
    pub vocab_size: usize,

    /// Whether to draw a progress bar over the merge loop.
    pub show_progress: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            vocab_size: DEFAULT_VOCAB_SIZE,
            show_progress: false,
        }
    }
}

impl TrainerConfig {
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Upper bound on merges this configuration asks for.
    pub fn num_merges(&self) -> usize {
        self.vocab_size.saturating_sub(BASE_VOCAB_SIZE)
    }
}
