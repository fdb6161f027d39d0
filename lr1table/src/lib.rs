//! # lr1table
//!
//! `lr1table` builds canonical LR(1) parser tables from a context-free grammar, strongly based
//! on a text-based file format for grammars.
//!
//! ## Usage
//!
//! ```rust
//! use lr1table::grammar::Grammar;
//!
//! fn main() {
//!     let raw_grammar = "
//!         %start S
//!         %end end
//!         %terminal x
//!         %intermediate S
//!         %grammar
//!         S : x [s_x] ;
//!     ";
//!     // First pass parses without checking validity of the grammar
//!     let parsed_grammar = lr1table::format::parse(raw_grammar).unwrap();
//!     // Second step checks symbol declarations, production shapes and the sealed invariants
//!     let grammar: Grammar = parsed_grammar.try_into().unwrap();
//!
//!     let nfa = lr1table::nfa::build::build(&grammar);
//!     let dfa = lr1table::dfa::build::build(&nfa);
//!     let conflicts = lr1table::conflict::detect_conflicts(&dfa);
//!     assert!(conflicts.is_empty());
//! }
//! ```
//!
//! ## File format
//!
//! The file format used is a direct transcription of the grammar: a start symbol, an
//! end-of-input symbol, declared terminals and intermediates, and a `%grammar` section listing
//! productions as `LHS : rhs-symbols... [name] | rhs-symbols... [name] ... ;`. See
//! [format] for the full grammar.
//!
//! ## Work-in-progress notes
//!
//! This crate builds one canonical LR(1) table per grammar; it does not attempt any grammar
//! transformation (left-factoring, precedence declarations) to resolve conflicts it reports.
//!
//! ## Operations
//!
//! This library currently supports:
//!
//! * [Parsing](format::parse) and [validating](format) grammars
//! * Computing [nullable and FIRST sets](grammar::Grammar::calculate)
//! * Building the [characteristic NFA](nfa::build::build) and [subset-constructing its DFA](dfa::build::build)
//! * [Detecting shift/reduce and reduce/reduce conflicts](conflict::detect_conflicts) with witness paths
//! * [Emitting the action/goto table as CSV](table::emit_csv)

pub mod conflict;
pub mod dfa;
pub mod format;
pub mod grammar;
pub mod nfa;
pub mod symbol;
pub mod table;
