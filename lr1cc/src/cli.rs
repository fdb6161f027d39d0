//! Argument parsing, file I/O and diagnostic formatting built on top of `lr1table`.

use clap::Parser;
use lr1table::conflict::{self, Conflict};
use lr1table::dfa::build as dfa_build;
use lr1table::format::{self, LoadError};
use lr1table::grammar::Grammar;
use lr1table::nfa::build as nfa_build;
use lr1table::symbol::SymbolId;
use lr1table::table;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Builds a canonical LR(1) action/goto table from a grammar file.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Grammar file to read.
    pub infile: PathBuf,

    /// Output path for the CSV table (default: `infile` with `.csv` appended).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Suppress the success summary on stdout. Conflicts are still reported regardless.
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Error)]
pub enum CliError<'a> {
    #[error("error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("syntax error on line {line}: {cause}")]
    Syntax {
        line: usize,
        cause: nom::error::Error<&'a str>,
    },
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Runs the build-table pipeline against already-read grammar `contents`. Returns `Ok(true)` on a
/// conflict-free table, `Ok(false)` when the table was written but conflicts were reported.
pub fn run<'a>(args: &Args, contents: &'a str) -> Result<bool, CliError<'a>> {
    let parsed = format::parse(contents).map_err(|source| {
        let line = format::error_line(contents, &source);
        CliError::Syntax { line, cause: source }
    })?;
    let grammar: Grammar = parsed.try_into()?;

    let nfa = nfa_build::build(&grammar);
    let dfa = dfa_build::build(&nfa);
    let conflicts = conflict::detect_conflicts(&dfa);

    let columns = table_columns(&grammar);
    let csv = table::emit_csv(&dfa, &grammar, &columns);

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.csv", args.infile.display())));
    fs::write(&output_path, &csv).map_err(|source| CliError::Io {
        path: output_path.clone(),
        source,
    })?;

    if !conflicts.is_empty() {
        for conflict in &conflicts {
            report_conflict(&grammar, conflict);
        }
        return Ok(false);
    }

    if !args.quiet {
        let rejecting = dfa.states().filter(|(_, s)| s.rejects()).count();
        println!("wrote {}: {} states, {rejecting} rejecting", output_path.display(), dfa.len());
    }

    Ok(true)
}

/// Column order for the emitted table: every terminal in declaration order, then every
/// intermediate, matching the convention [table::emit_csv] documents.
fn table_columns(grammar: &Grammar) -> Vec<SymbolId> {
    let mut terminals = Vec::new();
    let mut intermediates = Vec::new();
    for (id, symbol) in grammar.catalog().iter() {
        if symbol.kind().is_terminal() {
            terminals.push(id);
        } else {
            intermediates.push(id);
        }
    }
    terminals.extend(intermediates);
    terminals
}

fn format_path(grammar: &Grammar, path: &[SymbolId]) -> String {
    path.iter()
        .map(|&s| grammar.symbol(s).name())
        .collect::<Vec<_>>()
        .join(" ")
}

fn report_conflict(grammar: &Grammar, conflict: &Conflict) {
    if conflict.first_state == conflict.second_state {
        eprintln!(
            "reduce/reduce conflict after \"{}\"",
            format_path(grammar, &conflict.start_to_first)
        );
    } else {
        eprintln!(
            "shift/reduce conflict: \"{}\" then \"{}\"",
            format_path(grammar, &conflict.start_to_first),
            format_path(grammar, &conflict.first_to_second)
        );
    }
}
