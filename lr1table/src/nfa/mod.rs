//! The nondeterministic automaton whose states are LR(1) items, implicitly encoded as
//! `(nonterminal, lookahead)` pairs connected by epsilon transitions for prediction.
//!
//! See [build] for the construction algorithm; this module owns the [Nfa] container and the
//! closure/transit engine used both by construction and by [crate::dfa]'s subset construction.

pub mod build;

use crate::grammar::ProductionId;
use crate::symbol::SymbolId;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Stable handle to an [NfaState] inside the [Nfa] that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NfaStateId(usize);

impl NfaStateId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Terminal disposition of an [NfaState]. `Reject` means "continue shifting".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    Reject,
    Accept,
    Reduce(ProductionId),
}

/// Transition map key: either the epsilon move or a move on a concrete symbol. A dedicated sum
/// type rather than `Option<SymbolId>` keeps "no transition on this symbol" and "epsilon" visibly
/// distinct at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransitionKey {
    Epsilon,
    OnSymbol(SymbolId),
}

/// A single NFA node: its acceptance disposition and its outgoing transitions.
#[derive(Debug, Clone)]
pub struct NfaState {
    acceptance: Acceptance,
    transitions: BTreeMap<TransitionKey, BTreeSet<NfaStateId>>,
}

impl NfaState {
    fn new(acceptance: Acceptance) -> Self {
        Self {
            acceptance,
            transitions: BTreeMap::new(),
        }
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    pub fn transitions(&self) -> &BTreeMap<TransitionKey, BTreeSet<NfaStateId>> {
        &self.transitions
    }

    fn add_transition(&mut self, key: TransitionKey, to: NfaStateId) {
        self.transitions.entry(key).or_default().insert(to);
    }
}

/// Owns every [NfaState] reachable from construction, plus the designated start state.
#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<NfaState>,
    start: NfaStateId,
}

impl Nfa {
    fn empty(start_acceptance: Acceptance) -> Self {
        Self {
            states: vec![NfaState::new(start_acceptance)],
            start: NfaStateId(0),
        }
    }

    fn create_state(&mut self, acceptance: Acceptance) -> NfaStateId {
        let id = NfaStateId(self.states.len());
        self.states.push(NfaState::new(acceptance));
        id
    }

    fn add_transition(&mut self, from: NfaStateId, key: TransitionKey, to: NfaStateId) {
        self.states[from.index()].add_transition(key, to);
    }

    pub fn start(&self) -> NfaStateId {
        self.start
    }

    pub fn state(&self, id: NfaStateId) -> &NfaState {
        &self.states[id.index()]
    }

    pub fn states(&self) -> impl Iterator<Item = (NfaStateId, &NfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (NfaStateId(i), s))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Classical worklist epsilon closure, mutating `set` in place. Idempotent.
    pub fn epsilon_close(&self, set: &mut BTreeSet<NfaStateId>) {
        let mut queue: VecDeque<NfaStateId> = set.iter().copied().collect();
        while let Some(state) = queue.pop_front() {
            let Some(targets) = self.states[state.index()].transitions.get(&TransitionKey::Epsilon) else {
                continue;
            };
            for &target in targets {
                if set.insert(target) {
                    queue.push_back(target);
                }
            }
        }
    }

    /// Union of `δ(s, x)` over `s` in `set`, epsilon-closed. `x` must not be the epsilon key.
    pub fn transit(&self, set: &BTreeSet<NfaStateId>, x: SymbolId) -> BTreeSet<NfaStateId> {
        let key = TransitionKey::OnSymbol(x);
        let mut to_states = BTreeSet::new();
        for &state in set {
            if let Some(targets) = self.states[state.index()].transitions.get(&key) {
                to_states.extend(targets.iter().copied());
            }
        }
        self.epsilon_close(&mut to_states);
        to_states
    }

    /// Starts from `{start}` epsilon-closed and folds [Nfa::transit] over `input`.
    pub fn run(&self, input: &[SymbolId]) -> BTreeSet<NfaStateId> {
        let mut set = BTreeSet::from([self.start]);
        self.epsilon_close(&mut set);
        for &symbol in input {
            set = self.transit(&set, symbol);
        }
        set
    }

    /// The set of symbols some state in `set` has a non-epsilon transition on.
    pub(crate) fn alphabet_of(&self, set: &BTreeSet<NfaStateId>) -> BTreeSet<SymbolId> {
        let mut alphabet = BTreeSet::new();
        for &state in set {
            for key in self.states[state.index()].transitions.keys() {
                if let TransitionKey::OnSymbol(symbol) = key {
                    alphabet.insert(*symbol);
                }
            }
        }
        alphabet
    }
}
