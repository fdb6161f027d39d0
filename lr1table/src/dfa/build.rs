//! Subset construction from an [Nfa] to a [Dfa].

use super::{Dfa, DfaState, DfaStateId};
use crate::nfa::{Acceptance, Nfa, NfaStateId};
use std::collections::{BTreeSet, HashMap};

/// Builds the canonical LR(1) DFA from `nfa` by subset construction. Termination follows from the
/// finite powerset of NFA states; the memo on the originating NFA set also gives determinism.
pub fn build(nfa: &Nfa) -> Dfa {
    let mut states = Vec::new();
    let mut memo: HashMap<BTreeSet<NfaStateId>, DfaStateId> = HashMap::new();

    let mut start_set = BTreeSet::from([nfa.start()]);
    nfa.epsilon_close(&mut start_set);
    let start = get_or_build(start_set, nfa, &mut states, &mut memo);

    Dfa { states, start }
}

fn get_or_build(
    set: BTreeSet<NfaStateId>,
    nfa: &Nfa,
    states: &mut Vec<DfaState>,
    memo: &mut HashMap<BTreeSet<NfaStateId>, DfaStateId>,
) -> DfaStateId {
    if let Some(&existing) = memo.get(&set) {
        return existing;
    }

    let accepts = set
        .iter()
        .any(|&s| nfa.state(s).acceptance() == Acceptance::Accept);
    let reductions = set
        .iter()
        .filter_map(|&s| match nfa.state(s).acceptance() {
            Acceptance::Reduce(p) => Some(p),
            _ => None,
        })
        .collect();

    let id = DfaStateId(states.len());
    states.push(DfaState::new(accepts, reductions));
    memo.insert(set.clone(), id);

    let alphabet = nfa.alphabet_of(&set);
    for symbol in alphabet {
        let target_set = nfa.transit(&set, symbol);
        let target = get_or_build(target_set, nfa, states, memo);
        states[id.index()].transitions.insert(symbol, target);
    }

    id
}
