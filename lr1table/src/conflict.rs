//! BFS conflict detection over a built [Dfa], producing witness paths.

use crate::dfa::{Dfa, DfaStateId};
use crate::symbol::SymbolId;
use std::collections::{BTreeSet, VecDeque};

/// A witness that a DFA state admits more than one parser action on some lookahead.
///
/// Reduce/reduce conflicts set `second_state == first_state` and `first_to_second` empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub first_state: DfaStateId,
    pub second_state: DfaStateId,
    pub start_to_first: Vec<SymbolId>,
    pub first_to_second: Vec<SymbolId>,
}

/// Finds every shift/reduce and reduce/reduce conflict in `dfa`. Always returns the full list —
/// conflicts are diagnostic, never fatal to the detector itself.
pub fn detect_conflicts(dfa: &Dfa) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut visited = BTreeSet::from([dfa.start()]);
    let mut queue = VecDeque::from([(dfa.start(), Vec::<SymbolId>::new())]);

    while let Some((first, start_to_first)) = queue.pop_front() {
        let state = dfa.state(first);
        let has_reduce_reduce = (state.accepts() && !state.reductions().is_empty())
            || state.reductions().len() >= 2;
        if has_reduce_reduce {
            conflicts.push(Conflict {
                first_state: first,
                second_state: first,
                start_to_first: start_to_first.clone(),
                first_to_second: Vec::new(),
            });
        }

        let has_action = state.accepts() || !state.reductions().is_empty();
        if has_action && !state.transitions().is_empty() {
            conflicts.extend(shift_reduce_conflicts(dfa, first, &start_to_first));
        }

        for (&symbol, &next) in state.transitions() {
            if visited.insert(next) {
                let mut path = start_to_first.clone();
                path.push(symbol);
                queue.push_back((next, path));
            }
        }
    }

    conflicts
}

/// BFS forward from `first`, recording every reachable non-rejecting state other than `first`
/// itself as a shift/reduce conflict.
fn shift_reduce_conflicts(
    dfa: &Dfa,
    first: DfaStateId,
    start_to_first: &[SymbolId],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    let mut visited = BTreeSet::from([first]);
    let mut queue = VecDeque::from([(first, Vec::<SymbolId>::new())]);

    while let Some((current, first_to_current)) = queue.pop_front() {
        for (&symbol, &next) in dfa.state(current).transitions() {
            if !visited.insert(next) {
                continue;
            }
            let mut path = first_to_current.clone();
            path.push(symbol);

            let next_state = dfa.state(next);
            if next != first && !next_state.rejects() {
                conflicts.push(Conflict {
                    first_state: first,
                    second_state: next,
                    start_to_first: start_to_first.to_vec(),
                    first_to_second: path.clone(),
                });
            }
            queue.push_back((next, path));
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfa::build as dfa_build;
    use crate::dfa::{Dfa, DfaState};
    use crate::grammar::{Grammar, ProductionId};
    use crate::nfa::build as nfa_build;
    use crate::symbol::SymbolId;
    use crate::symbol::SymbolKind::{Intermediate, Terminal};
    use std::collections::BTreeMap;

    #[test]
    fn scenario_c_reduce_reduce_witness() {
        // d1 (start, rejects) --x--> d2, where d2's originating NFA set carried both an accept
        // and a reduction by production 1.
        let x = SymbolId::dummy_for_test(0);
        let p1 = ProductionId::dummy_for_test(0);

        let d2 = Dfa::test_state_id(1);
        let d1_transitions = BTreeMap::from([(x, d2)]);

        let states = vec![
            DfaState::test_new(false, Default::default(), d1_transitions),
            DfaState::test_new(true, BTreeSet::from([p1]), BTreeMap::new()),
        ];
        let dfa = Dfa::test_new(states, Dfa::test_state_id(0));

        let conflicts = detect_conflicts(&dfa);
        let rr: Vec<_> = conflicts
            .iter()
            .filter(|c| c.first_state == c.second_state)
            .collect();
        assert_eq!(rr.len(), 1);
        assert_eq!(rr[0].start_to_first, vec![x]);
        assert!(rr[0].first_to_second.is_empty());
    }

    #[test]
    fn scenario_d_shift_reduce_witness() {
        // d1 (start, accepts) --x--> d2 --y--> d3 (reduces). d1 admitting both accept and a
        // further shift is the shift/reduce trigger; d3 is the reachable reducing witness.
        let x = SymbolId::dummy_for_test(0);
        let y = SymbolId::dummy_for_test(1);
        let p1 = ProductionId::dummy_for_test(0);

        let d2 = Dfa::test_state_id(1);
        let d3 = Dfa::test_state_id(2);

        let states = vec![
            DfaState::test_new(true, Default::default(), BTreeMap::from([(x, d2)])),
            DfaState::test_new(false, Default::default(), BTreeMap::from([(y, d3)])),
            DfaState::test_new(false, BTreeSet::from([p1]), BTreeMap::new()),
        ];
        let dfa = Dfa::test_new(states, Dfa::test_state_id(0));

        let conflicts = detect_conflicts(&dfa);
        let sr: Vec<_> = conflicts
            .iter()
            .filter(|c| c.first_state != c.second_state)
            .collect();
        assert_eq!(sr.len(), 1);
        assert!(sr[0].start_to_first.is_empty());
        assert_eq!(sr[0].first_to_second, vec![x, y]);
    }

    #[test]
    fn conflict_free_grammar_has_no_conflicts() {
        let mut g = Grammar::new();
        let s = g.create_symbol("S", Intermediate).unwrap();
        let x = g.create_symbol("x", Terminal).unwrap();
        let end = g.create_symbol("end", Terminal).unwrap();
        g.set_start(s);
        g.set_end(end);
        g.add_production("p", s, vec![x]).unwrap();
        g.calculate();
        g.ensure_sanity().unwrap();

        let nfa = nfa_build::build(&g);
        let dfa = dfa_build::build(&nfa);
        assert!(detect_conflicts(&dfa).is_empty());
    }
}
