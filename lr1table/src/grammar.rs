//! Grammar container and the nullable/FIRST fixed-point analyzer.

use crate::symbol::{DuplicateSymbolError, Symbol, SymbolCatalog, SymbolId, SymbolKind};
use std::collections::BTreeSet;
use std::rc::Rc;
use thiserror::Error;

/// Stable handle to a [Production] inside the [Grammar] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductionId(usize);

impl ProductionId {
    pub(crate) fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) fn dummy_for_test(index: usize) -> Self {
        ProductionId(index)
    }
}

/// A rewrite rule `lhs -> rhs`, referenced by identity ([ProductionId]) throughout the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    name: Rc<str>,
    lhs: SymbolId,
    rhs: Vec<SymbolId>,
}

impl Production {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lhs(&self) -> SymbolId {
        self.lhs
    }

    pub fn rhs(&self) -> &[SymbolId] {
        &self.rhs
    }
}

/// Semantic errors raised while assembling or validating a [Grammar].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(#[from] DuplicateSymbolError),
    #[error("duplicate production name '{0}'")]
    DuplicateProduction(Rc<str>),
    #[error("start symbol not set")]
    MissingStart,
    #[error("end symbol not set")]
    MissingEnd,
    #[error("production '{production}' has a terminal left-hand side '{lhs}'")]
    LhsNotIntermediate { production: Rc<str>, lhs: Rc<str> },
    #[error("production '{production}' contains the end symbol in its right-hand side")]
    EndInRhs { production: Rc<str> },
}

/// A sealed context-free grammar: a start symbol, an end-of-input symbol, and an ordered list of
/// productions, together with the [SymbolCatalog] that owns every symbol they mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grammar {
    catalog: SymbolCatalog,
    start: Option<SymbolId>,
    end: Option<SymbolId>,
    productions: Vec<Production>,
    production_names: BTreeSet<Rc<str>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    pub fn create_symbol(
        &mut self,
        name: &str,
        kind: SymbolKind,
    ) -> Result<SymbolId, DuplicateSymbolError> {
        self.catalog.create(name, kind)
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        self.catalog.get(id)
    }

    pub fn start(&self) -> Option<SymbolId> {
        self.start
    }

    pub fn end(&self) -> Option<SymbolId> {
        self.end
    }

    pub fn set_start(&mut self, start: SymbolId) {
        self.start = Some(start);
    }

    pub fn set_end(&mut self, end: SymbolId) {
        self.end = Some(end);
    }

    /// Appends a production. Names must be unique across the whole grammar; this is checked here
    /// rather than deferred to [Grammar::ensure_sanity] because a duplicate name would otherwise
    /// silently shadow an earlier production in diagnostics.
    pub fn add_production(
        &mut self,
        name: &str,
        lhs: SymbolId,
        rhs: Vec<SymbolId>,
    ) -> Result<ProductionId, GrammarError> {
        let name: Rc<str> = Rc::from(name);
        if !self.production_names.insert(name.clone()) {
            return Err(GrammarError::DuplicateProduction(name));
        }
        let id = ProductionId(self.productions.len());
        self.productions.push(Production { name, lhs, rhs });
        Ok(id)
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.index()]
    }

    /// Productions in insertion order, paired with their id.
    pub fn productions(&self) -> impl Iterator<Item = (ProductionId, &Production)> {
        self.productions
            .iter()
            .enumerate()
            .map(|(i, p)| (ProductionId(i), p))
    }

    pub fn productions_with_lhs(&self, lhs: SymbolId) -> impl Iterator<Item = (ProductionId, &Production)> {
        self.productions().filter(move |(_, p)| p.lhs == lhs)
    }

    /// Runs the nullable and FIRST least-fixed-point computations to stability, using the
    /// straightforward `changed` boolean loop rather than a worklist.
    pub fn calculate(&mut self) {
        self.calculate_nullable();
        self.calculate_first();
    }

    fn calculate_nullable(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                if self.catalog.get(production.lhs).nullable() {
                    continue;
                }
                let all_nullable = production
                    .rhs
                    .iter()
                    .all(|s| self.catalog.get(*s).nullable());
                if all_nullable {
                    self.catalog.get_mut(production.lhs).nullable = true;
                    changed = true;
                }
            }
        }
    }

    fn calculate_first(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for production in &self.productions {
                let seq_first = first_of_sequence(&self.catalog, &production.rhs, None);
                let lhs_first = &mut self.catalog.get_mut(production.lhs).first;
                let before = lhs_first.len();
                lhs_first.extend(seq_first);
                if lhs_first.len() != before {
                    changed = true;
                }
            }
        }
    }

    /// FOLLOW-like helper: walks `seq` accumulating FIRST until a non-nullable symbol is found (or
    /// the sequence is exhausted, in which case `sentinel` is added if present).
    pub fn first_sequence(&self, seq: &[SymbolId], sentinel: Option<SymbolId>) -> BTreeSet<SymbolId> {
        first_of_sequence(&self.catalog, seq, sentinel)
    }

    /// Validates the invariants §4.2 requires of a sealed grammar. Call after [Grammar::calculate].
    pub fn ensure_sanity(&self) -> Result<(), GrammarError> {
        let end = self.end.ok_or(GrammarError::MissingEnd)?;
        self.start.ok_or(GrammarError::MissingStart)?;

        for (_, production) in self.productions() {
            if !self.catalog.get(production.lhs).kind().is_intermediate() {
                return Err(GrammarError::LhsNotIntermediate {
                    production: production.name.clone(),
                    lhs: self.catalog.get(production.lhs).name().into(),
                });
            }
            if production.rhs.contains(&end) {
                return Err(GrammarError::EndInRhs {
                    production: production.name.clone(),
                });
            }
        }

        Ok(())
    }
}

fn first_of_sequence(
    catalog: &SymbolCatalog,
    seq: &[SymbolId],
    sentinel: Option<SymbolId>,
) -> BTreeSet<SymbolId> {
    let mut result = BTreeSet::new();
    for &symbol in seq {
        let data = catalog.get(symbol);
        result.extend(data.first().iter().copied());
        if !data.nullable() {
            return result;
        }
    }
    if let Some(sentinel) = sentinel {
        result.insert(sentinel);
    }
    result
}
