//! Converts a [Grammar] into the canonical-LR(1)-equivalent [Nfa].
//!
//! NFA fragments are keyed on `(intermediate, lookahead)` pairs rather than on closed item sets:
//! for each pair encountered, a single named start state is memoized, so shared sub-automata are
//! built once and every inbound epsilon targets the same state.

use super::{Acceptance, Nfa, NfaStateId, TransitionKey};
use crate::grammar::{Grammar, ProductionId};
use crate::symbol::SymbolId;
use std::collections::HashMap;

type NamedStateCatalog = HashMap<(SymbolId, SymbolId), NfaStateId>;

/// Builds the full NFA for `grammar`. `grammar` must already be sane (see
/// [Grammar::ensure_sanity]) — this function does not re-validate it.
pub fn build(grammar: &Grammar) -> Nfa {
    let mut nfa = Nfa::empty(Acceptance::Reject);
    let mut named_states = NamedStateCatalog::new();

    let start_symbol = grammar.start().expect("grammar must be sealed before NFA construction");
    let end_symbol = grammar.end().expect("grammar must be sealed before NFA construction");

    let s1 = nfa.start();
    let s2 = nfa.create_state(Acceptance::Reject);
    let s3 = nfa.create_state(Acceptance::Accept);
    let s4 = get_named_state(start_symbol, end_symbol, &mut nfa, grammar, &mut named_states);

    nfa.add_transition(s1, TransitionKey::OnSymbol(start_symbol), s2);
    nfa.add_transition(s2, TransitionKey::OnSymbol(end_symbol), s3);
    nfa.add_transition(s1, TransitionKey::Epsilon, s4);

    nfa
}

fn get_named_state(
    lhs: SymbolId,
    follow: SymbolId,
    nfa: &mut Nfa,
    grammar: &Grammar,
    named_states: &mut NamedStateCatalog,
) -> NfaStateId {
    if let Some(&existing) = named_states.get(&(lhs, follow)) {
        return existing;
    }

    let state = nfa.create_state(Acceptance::Reject);
    named_states.insert((lhs, follow), state);

    for (production_id, production) in grammar.productions_with_lhs(lhs) {
        grow_by_production(state, production_id, follow, nfa, grammar, named_states);
    }

    state
}

fn grow_by_production(
    start: NfaStateId,
    production_id: ProductionId,
    follow: SymbolId,
    nfa: &mut Nfa,
    grammar: &Grammar,
    named_states: &mut NamedStateCatalog,
) {
    let production = grammar.production(production_id);
    let rhs = production.rhs().to_vec();

    let mut prev = start;
    for (i, &x) in rhs.iter().enumerate() {
        let curr = nfa.create_state(Acceptance::Reject);
        nfa.add_transition(prev, TransitionKey::OnSymbol(x), curr);

        if grammar.symbol(x).kind().is_intermediate() {
            let rest = &rhs[i + 1..];
            for t in grammar.first_sequence(rest, Some(follow)) {
                let target = get_named_state(x, t, nfa, grammar, named_states);
                nfa.add_transition(prev, TransitionKey::Epsilon, target);
            }
        }

        prev = curr;
    }

    let final_state = nfa.create_state(Acceptance::Reduce(production_id));
    nfa.add_transition(prev, TransitionKey::OnSymbol(follow), final_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolKind::{Intermediate, Terminal};

    // S -> x [p1] | x x [p2]; start=S, end=end. Used by the reduce/reduce conflict scenario.
    fn reduce_reduce_grammar() -> Grammar {
        let mut g = Grammar::new();
        let s = g.create_symbol("S", Intermediate).unwrap();
        let x = g.create_symbol("x", Terminal).unwrap();
        let end = g.create_symbol("end", Terminal).unwrap();
        g.set_start(s);
        g.set_end(end);
        g.add_production("p1", s, vec![x]).unwrap();
        g.add_production("p2", s, vec![x, x]).unwrap();
        g.calculate();
        g.ensure_sanity().unwrap();
        g
    }

    #[test]
    fn named_state_is_shared_across_productions() {
        let g = reduce_reduce_grammar();
        let nfa = build(&g);
        // Every production growing from the same (S, end) pair starts at the same named state,
        // so the NFA must have strictly fewer states than 2 independent linear chains would need
        // (skeleton 3 + named state 1 + chain states), not a duplicated named state per production.
        assert!(nfa.len() < 3 + 2 * (1 + 2 + 1));
    }

    #[test]
    fn accepts_the_full_sentence() {
        let g = reduce_reduce_grammar();
        let nfa = build(&g);
        let s = g.catalog().lookup("S").unwrap();
        let end = g.catalog().lookup("end").unwrap();
        let reached = nfa.run(&[s, end]);
        assert!(reached
            .iter()
            .any(|id| nfa.state(*id).acceptance() == Acceptance::Accept));
    }

    #[test]
    fn reduces_by_shortest_production_on_single_x() {
        let g = reduce_reduce_grammar();
        let nfa = build(&g);
        let x = g.catalog().lookup("x").unwrap();
        let end = g.catalog().lookup("end").unwrap();
        let reached = nfa.run(&[x, end]);
        let p1 = g
            .productions()
            .find(|(_, p)| p.name() == "p1")
            .map(|(id, _)| id)
            .unwrap();
        assert!(reached
            .iter()
            .any(|id| nfa.state(*id).acceptance() == Acceptance::Reduce(p1)));
    }
}
