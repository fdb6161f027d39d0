//! Textual grammar format: lexing/parsing is kept separate from validation, the same two-phase
//! shape used throughout this crate (parse to a `Parsed*` struct, then lower with `TryFrom`).
//!
//! ```text
//! %start S
//! %end end
//! %terminal a b
//! %intermediate S T
//! %grammar
//! S : a T [s_a] | b [s_b] ;
//! T : a T [t_rec] | [t_eps] ;
//! ```
//!
//! `#` begins a line comment; whitespace (including newlines) is insignificant outside
//! identifiers. Identifiers match `[A-Za-z0-9_.-]+`. Sections are resolved in the order they
//! appear in the source text: `%start`/`%end` always declare a fresh symbol (an already-declared
//! name is a duplicate-symbol error, whichever section declared it first), and a production's
//! symbols must already have been declared by an earlier section.

mod grammar;

use crate::grammar::{Grammar, GrammarError};
use crate::symbol::SymbolKind::{Intermediate, Terminal};
use grammar::Section;
use nom::Finish;
use thiserror::Error;

/// Syntactic (pre-validation) form of a single production alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProduction<'a> {
    pub lhs: &'a str,
    pub rhs: Vec<&'a str>,
    pub name: &'a str,
}

/// Syntactic (pre-validation) result of parsing a grammar file: its sections, in the order they
/// were written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedGrammar<'a> {
    sections: Vec<Section<'a>>,
}

/// Parses `input` into its syntactic form. Lexical/syntactic failures are reported as `nom`
/// errors; use [error_line] to translate one into a 1-based source line number.
pub fn parse(input: &str) -> Result<ParsedGrammar, nom::error::Error<&str>> {
    nom::combinator::all_consuming(grammar::grammar_file)(input)
        .finish()
        .map(|(_, parsed)| parsed)
}

/// Translates a `nom` error's remaining-input pointer into a 1-based line number within
/// `original`.
pub fn error_line(original: &str, err: &nom::error::Error<&str>) -> usize {
    let offset = original.len() - err.input.len();
    1 + original[..offset].matches('\n').count()
}

/// Semantic errors raised while lowering a [ParsedGrammar] into a sealed [Grammar], beyond what
/// [Grammar::ensure_sanity] itself checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("start symbol declared more than once")]
    DuplicateStart,
    #[error("end symbol declared more than once")]
    DuplicateEnd,
    #[error("production '{production}' references undeclared symbol '{symbol}'")]
    UndeclaredSymbol { production: String, symbol: String },
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl<'a> TryFrom<ParsedGrammar<'a>> for Grammar {
    type Error = LoadError;

    /// Walks sections in the order they appeared in the source text, so a production (or a later
    /// `%start`/`%end`) can only refer to a symbol an earlier section already declared.
    fn try_from(parsed: ParsedGrammar<'a>) -> Result<Self, Self::Error> {
        let mut grammar = Grammar::new();
        let mut start_declared = false;
        let mut end_declared = false;

        for section in parsed.sections {
            match section {
                Section::Start(name) => {
                    if start_declared {
                        return Err(LoadError::DuplicateStart);
                    }
                    let id = grammar.create_symbol(name, Intermediate).map_err(GrammarError::from)?;
                    grammar.set_start(id);
                    start_declared = true;
                }
                Section::End(name) => {
                    if end_declared {
                        return Err(LoadError::DuplicateEnd);
                    }
                    let id = grammar.create_symbol(name, Terminal).map_err(GrammarError::from)?;
                    grammar.set_end(id);
                    end_declared = true;
                }
                Section::Terminal(names) => {
                    for name in names {
                        grammar.create_symbol(name, Terminal).map_err(GrammarError::from)?;
                    }
                }
                Section::Intermediate(names) => {
                    for name in names {
                        grammar.create_symbol(name, Intermediate).map_err(GrammarError::from)?;
                    }
                }
                Section::Grammar(productions) => {
                    for production in productions {
                        let lhs = grammar.catalog().lookup(production.lhs).ok_or_else(|| {
                            LoadError::UndeclaredSymbol {
                                production: production.name.to_string(),
                                symbol: production.lhs.to_string(),
                            }
                        })?;

                        let rhs = production
                            .rhs
                            .iter()
                            .map(|name| {
                                grammar.catalog().lookup(name).ok_or_else(|| LoadError::UndeclaredSymbol {
                                    production: production.name.to_string(),
                                    symbol: name.to_string(),
                                })
                            })
                            .collect::<Result<Vec<_>, _>>()?;

                        grammar.add_production(production.name, lhs, rhs)?;
                    }
                }
            }
        }

        grammar.calculate();
        grammar.ensure_sanity()?;

        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "
        %start S
        %end end
        %terminal a
        %intermediate S
        %grammar
        S : a [p1] ;
    ";

    #[test]
    fn round_trip_matches_direct_construction() {
        let parsed = parse(MINIMAL).unwrap();
        let via_format: Grammar = parsed.try_into().unwrap();

        let mut direct = Grammar::new();
        let s = direct.create_symbol("S", Intermediate).unwrap();
        let a = direct.create_symbol("a", Terminal).unwrap();
        let end = direct.create_symbol("end", Terminal).unwrap();
        direct.set_start(s);
        direct.set_end(end);
        direct.add_production("p1", s, vec![a]).unwrap();
        direct.calculate();
        direct.ensure_sanity().unwrap();

        assert_eq!(via_format.catalog().len(), direct.catalog().len());
        assert_eq!(
            via_format.productions().count(),
            direct.productions().count()
        );
    }

    #[test]
    fn start_always_creates_a_fresh_symbol() {
        let input = "%start S\n%end end\n%grammar\nS : [p] ;\n";
        let parsed = parse(input).unwrap();
        let grammar: Grammar = parsed.try_into().unwrap();
        let s = grammar.catalog().lookup("S").unwrap();
        assert!(grammar.symbol(s).kind().is_intermediate());
    }

    #[test]
    fn start_reusing_an_already_declared_name_is_rejected() {
        let input = "%intermediate S\n%start S\n%end end\n%grammar\nS : [p] ;\n";
        let parsed = parse(input).unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert!(matches!(result, Err(LoadError::Grammar(_))));
    }

    #[test]
    fn end_reusing_an_already_declared_name_is_rejected() {
        let input = "%terminal end\n%start S\n%end end\n%grammar\nS : [p] ;\n";
        let parsed = parse(input).unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert!(matches!(result, Err(LoadError::Grammar(_))));
    }

    #[test]
    fn production_cannot_forward_reference_a_later_declaration() {
        let input = "%start S\n%end end\n%grammar\nS : a [p] ;\n%terminal a\n";
        let parsed = parse(input).unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(
            result,
            Err(LoadError::UndeclaredSymbol {
                production: "p".to_string(),
                symbol: "a".to_string(),
            })
        );
    }

    #[test]
    fn undeclared_symbol_in_production_is_rejected() {
        let input = "%start S\n%end end\n%grammar\nS : missing [p] ;\n";
        let parsed = parse(input).unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(
            result,
            Err(LoadError::UndeclaredSymbol {
                production: "p".to_string(),
                symbol: "missing".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_start_is_rejected() {
        let input = "%start S\n%start T\n%end end\n";
        let parsed = parse(input).unwrap();
        let result: Result<Grammar, _> = parsed.try_into();
        assert_eq!(result, Err(LoadError::DuplicateStart));
    }

    #[test]
    fn syntax_error_reports_line_number() {
        let input = "%start S\n%end end\n%grammar\nS :: a [p] ;\n";
        let err = parse(input).unwrap_err();
        assert_eq!(error_line(input, &err), 4);
    }
}
