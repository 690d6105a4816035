//! Python bindings, built with the `python` feature.

use pyo3::{exceptions::PyValueError, prelude::*};

use crate::{
    config::TrainerConfig,
    error::ErrorMode,
    rules::MergeRules,
    tokenizer::Tokenizer,
    types::Symbol,
};

/// Python wrapper around training plus the resulting tokenizer.
#[pyclass]
pub struct RustBpeTrainer {
    config: TrainerConfig,
    tokenizer: Tokenizer,
}

#[pymethods]
impl RustBpeTrainer {
    #[new]
    #[pyo3(signature = (vocab_size, show_progress = false))]
    fn new(vocab_size: usize, show_progress: bool) -> Self {
        RustBpeTrainer {
            config: TrainerConfig::new(vocab_size).with_progress(show_progress),
            tokenizer: Tokenizer::new(MergeRules::new()),
        }
    }

    /// Learns merges on `text`, replacing any earlier ones, and returns the
    /// encoded text.
    fn train(&mut self, text: &str) -> PyResult<Vec<Symbol>> {
        let (tokenizer, ids) = Tokenizer::train(text, &self.config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        self.tokenizer = tokenizer;
        Ok(ids)
    }

    fn encode(&self, text: &str) -> Vec<Symbol> {
        self.tokenizer.encode(text)
    }

    #[pyo3(signature = (ids, errors = "replace"))]
    fn decode(&self, ids: Vec<Symbol>, errors: &str) -> PyResult<String> {
        let mode: ErrorMode = errors
            .parse()
            .map_err(|e: crate::error::ConfigError| PyValueError::new_err(e.to_string()))?;
        self.tokenizer
            .decode(&ids, mode)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn merge_history(&self) -> Vec<((Symbol, Symbol), Symbol)> {
        self.tokenizer.codec().rules().history()
    }

    fn vocab_size(&self) -> usize {
        self.tokenizer.vocab_size()
    }
}

#[pymodule]
fn _bytepair(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<RustBpeTrainer>()?;
    Ok(())
}
