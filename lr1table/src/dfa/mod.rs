//! The deterministic automaton produced by subset-constructing an [crate::nfa::Nfa]. Its states
//! are the canonical LR(1) states; see [build] for the construction algorithm.

pub mod build;

use crate::grammar::ProductionId;
use crate::symbol::SymbolId;
use std::collections::{BTreeMap, BTreeSet};

/// Stable handle to a [DfaState] inside the [Dfa] that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DfaStateId(usize);

impl DfaStateId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// A single DFA node, derived from the set of [crate::nfa::NfaState]s it was subset-constructed
/// from: `accepts` iff any source state accepted, `reductions` collects every production reduced
/// to by a source state.
#[derive(Debug, Clone)]
pub struct DfaState {
    accepts: bool,
    reductions: BTreeSet<ProductionId>,
    transitions: BTreeMap<SymbolId, DfaStateId>,
}

impl DfaState {
    fn new(accepts: bool, reductions: BTreeSet<ProductionId>) -> Self {
        Self {
            accepts,
            reductions,
            transitions: BTreeMap::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn test_new(
        accepts: bool,
        reductions: BTreeSet<ProductionId>,
        transitions: BTreeMap<SymbolId, DfaStateId>,
    ) -> Self {
        Self {
            accepts,
            reductions,
            transitions,
        }
    }

    pub fn accepts(&self) -> bool {
        self.accepts
    }

    pub fn reductions(&self) -> &BTreeSet<ProductionId> {
        &self.reductions
    }

    pub fn transitions(&self) -> &BTreeMap<SymbolId, DfaStateId> {
        &self.transitions
    }

    /// A state "rejects" iff it neither accepts nor reduces — i.e. it only shifts/gotos further.
    pub fn rejects(&self) -> bool {
        !self.accepts && self.reductions.is_empty()
    }
}

/// Owns every [DfaState] discovered by subset construction, plus the designated start state.
#[derive(Debug, Clone)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: DfaStateId,
}

impl Dfa {
    #[cfg(test)]
    pub(crate) fn test_new(states: Vec<DfaState>, start: DfaStateId) -> Self {
        Self { states, start }
    }

    #[cfg(test)]
    pub(crate) fn test_state_id(index: usize) -> DfaStateId {
        DfaStateId(index)
    }

    pub fn start(&self) -> DfaStateId {
        self.start
    }

    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.states[id.index()]
    }

    pub fn states(&self) -> impl Iterator<Item = (DfaStateId, &DfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (DfaStateId(i), s))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Starting from the start state, follows `input` one symbol at a time. Returns `None` as
    /// soon as a symbol has no transition from the current state.
    pub fn run(&self, input: &[SymbolId]) -> Option<DfaStateId> {
        let mut current = self.start;
        for &symbol in input {
            current = *self.states[current.index()].transitions.get(&symbol)?;
        }
        Some(current)
    }
}
