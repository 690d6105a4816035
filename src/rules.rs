//! Ordered merge rule table.
//!
//! The order rules were learned in is load-bearing: encoding applies them
//! earliest first, and new IDs run 256, 257, ... in that same order. Rules
//! are therefore kept in a `Vec` with a hash index on the side, never in a
//! bare map.

use std::{collections::HashMap, fmt};

use crate::{
    error::RuleError,
    types::{BASE_VOCAB_SIZE, MergeOrder, Symbol, SymbolPair},
    vocab::Vocabulary,
};

/// A learned merge: `pair` is replaced by `new_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRule {
    pub pair: SymbolPair,
    pub new_id: Symbol,
}

/// Merge rules in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules {
    rules: Vec<MergeRule>,

    /// pair -> (new_id, merge_order).
    index: HashMap<SymbolPair, (Symbol, MergeOrder)>,
}

impl MergeRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a rule table from persisted merge history.
    ///
    /// # Arguments
    ///
    /// * `merge_history` - Merge rules as `((left, right), merged)` in the order
    ///   they were learned.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if the IDs are not contiguous from 256, a pair
    /// repeats, or a pair refers to a symbol that does not exist yet.
    ///
    /// # Example
    ///
    /// ```
    /// use bytepair::MergeRules;
    ///
    /// let rules = MergeRules::from_history(vec![((97, 98), 256), ((256, 99), 257)]).unwrap();
    /// assert_eq!(rules.len(), 2);
    /// ```
    pub fn from_history(
        merge_history: impl IntoIterator<Item = ((Symbol, Symbol), Symbol)>,
    ) -> Result<Self, RuleError> {
        let mut rules = Self::new();

        for ((a, b), new_id) in merge_history {
            let pair = SymbolPair(a, b);
            let expected = rules.next_id();

            if new_id != expected {
                return Err(RuleError::NonContiguousId {
                    expected,
                    found: new_id,
                });
            }
            if a >= new_id || b >= new_id {
                return Err(RuleError::ForwardReference { pair, new_id });
            }
            if rules.contains(pair) {
                return Err(RuleError::DuplicatePair(pair));
            }

            rules.push(pair);
        }

        Ok(rules)
    }

    /// Records a merge for `pair` and returns the ID it was assigned.
    pub(crate) fn push(&mut self, pair: SymbolPair) -> Symbol {
        let new_id = self.next_id();
        let order = self.rules.len();
        self.rules.push(MergeRule { pair, new_id });
        self.index.insert(pair, (new_id, order));
        new_id
    }

    /// ID the next merge would receive.
    pub fn next_id(&self) -> Symbol {
        BASE_VOCAB_SIZE + self.rules.len()
    }

    /// `(new_id, merge_order)` for `pair`, if it has a rule.
    pub fn get(&self, pair: SymbolPair) -> Option<(Symbol, MergeOrder)> {
        self.index.get(&pair).copied()
    }

    pub fn contains(&self, pair: SymbolPair) -> bool {
        self.index.contains_key(&pair)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Most recently learned rule.
    pub fn last(&self) -> Option<&MergeRule> {
        self.rules.last()
    }

    /// Rules in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &MergeRule> + '_ {
        self.rules.iter()
    }

    /// Merge history as `((left, right), merged)` tuples, in creation order.
    pub fn history(&self) -> Vec<((Symbol, Symbol), Symbol)> {
        self.rules
            .iter()
            .map(|r| ((r.pair.0, r.pair.1), r.new_id))
            .collect()
    }

    /// new_id -> pair it was merged from.
    pub fn reverse_map(&self) -> HashMap<Symbol, SymbolPair> {
        self.rules.iter().map(|r| (r.new_id, r.pair)).collect()
    }

    /// Builds the vocabulary these rules imply on top of the byte identity map.
    pub fn to_vocabulary(&self) -> Vocabulary {
        let mut vocab = Vocabulary::identity();
        for rule in &self.rules {
            vocab.push_merge(rule.pair);
        }
        vocab
    }

    /// One report record per rule, in creation order.
    ///
    /// The display text comes from the vocabulary these rules imply, so it
    /// always matches the table.
    pub fn records(&self) -> Vec<RuleRecord> {
        let vocab = self.to_vocabulary();
        self.rules
            .iter()
            .enumerate()
            .map(|(order, r)| RuleRecord {
                order,
                first: r.pair.0,
                second: r.pair.1,
                new_id: r.new_id,
                display: vocab.display(r.new_id).unwrap_or_default(),
            })
            .collect()
    }
}

/// Printable form of one merge rule.
///
/// `display` is the lossy UTF-8 rendering of the merged symbol's bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub order: MergeOrder,
    pub first: Symbol,
    pub second: Symbol,
    pub new_id: Symbol,
    pub display: String,
}

impl fmt::Display for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:3}. ({:3}, {:3}) -> ID {:3} ('{}')",
            self.order + 1,
            self.first,
            self.second,
            self.new_id,
            self.display
        )
    }
}
