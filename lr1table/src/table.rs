//! Assigns state numbers to rejecting DFA states and emits the CSV action/goto table.

use crate::dfa::{Dfa, DfaStateId};
use crate::grammar::Grammar;
use crate::symbol::SymbolId;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt::Write as _;

/// Numbers every rejecting state of `dfa` in BFS discovery order, 1-based. Accepting/reducing
/// states never receive a number and never appear in the returned map.
fn number_rejecting_states(dfa: &Dfa) -> HashMap<DfaStateId, usize> {
    let mut numbers = HashMap::new();
    let mut visited = BTreeSet::from([dfa.start()]);
    let mut queue = VecDeque::from([dfa.start()]);
    let mut next_number = 1usize;

    while let Some(state_id) = queue.pop_front() {
        if dfa.state(state_id).rejects() {
            numbers.insert(state_id, next_number);
            next_number += 1;
        }
        for (_, &next) in dfa.state(state_id).transitions() {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    numbers
}

/// Renders a cell for the transition from a rejecting state on column `column`, given the
/// precomputed rejecting-state numbering. `column_is_terminal` picks `S`/`G` for shifts to
/// another rejecting state.
fn cell(
    dfa: &Dfa,
    grammar: &Grammar,
    numbers: &HashMap<DfaStateId, usize>,
    from: DfaStateId,
    column: SymbolId,
    column_is_terminal: bool,
) -> String {
    let Some(&target) = dfa.state(from).transitions().get(&column) else {
        return String::new();
    };

    let target_state = dfa.state(target);
    if target_state.accepts() {
        return "A".to_string();
    }
    if !target_state.reductions().is_empty() {
        let name = target_state
            .reductions()
            .iter()
            .map(|&p| grammar.production(p).name())
            .min()
            .expect("reductions is non-empty");
        return format!("R{name}");
    }

    let n = numbers[&target];
    if column_is_terminal {
        format!("S{n}")
    } else {
        format!("G{n}")
    }
}

/// Emits the CSV action/goto table for `dfa` using `columns` as the column order (conventionally
/// all terminals in insertion order, then all intermediates). CRLF line terminators throughout.
pub fn emit_csv(dfa: &Dfa, grammar: &Grammar, columns: &[SymbolId]) -> String {
    let numbers = number_rejecting_states(dfa);
    let mut out = String::new();

    for &column in columns {
        write!(out, ",{}", grammar.symbol(column).name()).unwrap();
    }
    out.push_str("\r\n");

    let mut rows: Vec<(DfaStateId, usize)> = numbers.iter().map(|(&id, &n)| (id, n)).collect();
    rows.sort_by_key(|&(_, n)| n);

    for (state_id, n) in rows {
        write!(out, "{n}").unwrap();
        for &column in columns {
            let is_terminal = grammar.symbol(column).kind().is_terminal();
            write!(
                out,
                ",{}",
                cell(dfa, grammar, &numbers, state_id, column, is_terminal)
            )
            .unwrap();
        }
        out.push_str("\r\n");
    }

    out
}
