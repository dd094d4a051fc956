//! The solver context: variable registry, name table, clause log, and the
//! engine seam.
//!
//! All state lives in one owned [`Solver`]; there is no ambient/global
//! registry, so independent contexts coexist freely. Operations take `&self`
//! and serialize through interior mutability; the context is single-writer
//! by contract.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;

use log::debug;

use crate::dpll::DpllEngine;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::lit::{Lit, Var};

/// Bidirectional name table.
///
/// `by_var` holds one entry per allocated variable (empty string for
/// anonymous variables); `by_name` maps every non-empty name to its literal.
/// `"True"` and `"False"` are bound to the constant literals at construction
/// and can never be rebound.
struct NameTable {
    by_var: Vec<String>,
    by_name: HashMap<String, Lit>,
}

/// A context for incremental constraint solving.
///
/// Construction allocates the reserved variable 0, binds it to the names
/// `"True"`/`"False"`, and asserts it true in the engine, so [`Lit::TRUE`]
/// and [`Lit::FALSE`] behave as constants from the start.
pub struct Solver {
    engine: RefCell<Box<dyn Engine>>,
    names: RefCell<NameTable>,
    /// Every clause submitted through this context, for persistence.
    /// The constructor's constant-true unit clause is implicit and not kept.
    clauses: RefCell<Vec<Vec<Lit>>>,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_engine(Box::new(DpllEngine::new()))
    }

    /// Builds a context around a custom engine.
    ///
    /// The engine must be fresh: the context immediately allocates the
    /// reserved constant variable in it.
    pub fn with_engine(mut engine: Box<dyn Engine>) -> Self {
        let constant = engine.new_var();
        assert_eq!(constant, Var::CONST, "Engine variable space must be fresh");
        engine
            .add_clause(&[Lit::TRUE])
            .expect("constant variable is allocated");
        let mut by_name = HashMap::new();
        by_name.insert("True".to_string(), Lit::TRUE);
        by_name.insert("False".to_string(), Lit::FALSE);
        Self {
            engine: RefCell::new(engine),
            names: RefCell::new(NameTable {
                by_var: vec!["True".to_string()],
                by_name,
            }),
            clauses: RefCell::new(Vec::new()),
        }
    }

    /// Number of allocated variables, the reserved constant included.
    pub fn n_vars(&self) -> usize {
        self.names.borrow().by_var.len()
    }

    /// Number of clauses submitted through this context.
    pub fn n_clauses(&self) -> usize {
        self.clauses.borrow().len()
    }

    /// Allocates a fresh anonymous variable and returns its positive literal.
    pub fn new_lit(&self) -> Lit {
        self.alloc(String::new())
    }

    /// Allocates a fresh variable bound to `name`.
    ///
    /// An empty name behaves like [`new_lit`][Solver::new_lit]. Otherwise the
    /// name must obey the grammar (printable, no whitespace) and be unused,
    /// including the reserved `"True"`/`"False"`. On failure nothing is
    /// allocated: `n_vars()` is unchanged.
    pub fn new_named_lit(&self, name: &str) -> Result<Lit> {
        if name.is_empty() {
            return Ok(self.new_lit());
        }
        if !valid_name(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        if self.names.borrow().by_name.contains_key(name) {
            return Err(Error::DuplicateName(name.to_string()));
        }
        Ok(self.alloc(name.to_string()))
    }

    fn alloc(&self, name: String) -> Lit {
        let var = self.engine.borrow_mut().new_var();
        let mut names = self.names.borrow_mut();
        assert_eq!(var.index(), names.by_var.len(), "Registry out of sync");
        let lit = var.pos();
        if !name.is_empty() {
            names.by_name.insert(name.clone(), lit);
        }
        names.by_var.push(name);
        debug!("allocated {} (n_vars = {})", lit, names.by_var.len());
        lit
    }

    /// Looks up the literal bound to `name`.
    pub fn literal(&self, name: &str) -> Result<Lit> {
        if name.is_empty() {
            return Err(Error::UnknownName(name.to_string()));
        }
        self.names
            .borrow()
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// The name of the literal's variable, or an empty string if anonymous.
    pub fn name(&self, lit: Lit) -> String {
        self.names
            .borrow()
            .by_var
            .get(lit.var().index())
            .cloned()
            .unwrap_or_default()
    }

    /// Adds a clause; out-of-range literal references fail with a range
    /// error and leave the context unchanged.
    pub fn add_clause(&self, clause: &[Lit]) -> Result<()> {
        let n = self.n_vars();
        for &lit in clause {
            if lit.var().index() >= n {
                return Err(Error::Range {
                    index: lit.var().index(),
                    bound: n,
                });
            }
        }
        self.emit_clause(clause.to_vec());
        Ok(())
    }

    /// Internal clause submission for registry-allocated literals.
    pub(crate) fn emit_clause(&self, clause: Vec<Lit>) {
        self.engine
            .borrow_mut()
            .add_clause(&clause)
            .expect("literals come from this registry");
        self.clauses.borrow_mut().push(clause);
    }

    pub(crate) fn clause_log(&self) -> Vec<Vec<Lit>> {
        self.clauses.borrow().clone()
    }

    /// Per-variable names in creation order (empty string for anonymous).
    pub(crate) fn var_names(&self) -> Vec<String> {
        self.names.borrow().by_var.clone()
    }

    /// Searches for a model of the accumulated clauses.
    pub fn solve(&self) -> bool {
        self.solve_under(&[])
    }

    /// Searches under temporary assumptions; they hold for this call only.
    ///
    /// Returns `false` for UNSAT. Either way, model values from previous
    /// calls are invalidated.
    pub fn solve_under(&self, assumptions: &[Lit]) -> bool {
        let n = self.n_vars();
        for &lit in assumptions {
            assert!(lit.var().index() < n, "Assumption {} is not allocated", lit);
        }
        let result = self.engine.borrow_mut().solve(assumptions);
        debug!("solve_under({:?}) -> {:?}", assumptions, result);
        result.is_sat()
    }

    /// Truth value of `lit` in the most recent satisfying model.
    pub fn value(&self, lit: Lit) -> Result<bool> {
        self.engine.borrow().value(lit).ok_or(Error::NoModel)
    }

    /// Like [`value`][Solver::value], but yields `default` without a model.
    pub fn value_or(&self, lit: Lit, default: bool) -> bool {
        self.engine.borrow().value(lit).unwrap_or(default)
    }

    /// Truth value of `lit` if a satisfying model is current.
    pub fn possible_value(&self, lit: Lit) -> Option<bool> {
        self.engine.borrow().value(lit)
    }

    /// Whether the clause set forces a value for `lit`.
    ///
    /// Derived from the engine's root-level propagation; monotonic, a
    /// constant never reverts.
    pub fn is_const(&self, lit: Lit) -> bool {
        self.engine.borrow().fixed(lit).is_some()
    }

    pub fn is_const_true(&self, lit: Lit) -> bool {
        self.engine.borrow().fixed(lit) == Some(true)
    }

    pub fn is_const_false(&self, lit: Lit) -> bool {
        self.engine.borrow().fixed(lit) == Some(false)
    }

    /// Cursor over every variable's positive literal, in creation order,
    /// starting with `True`.
    pub fn literals(&self) -> Literals<'_> {
        Literals {
            solver: self,
            pos: 0,
            end: self.n_vars(),
            named_only: false,
        }
    }

    /// Cursor over the named literals, in creation order, starting with
    /// `True` (which is permanently named).
    pub fn named_literals(&self) -> Literals<'_> {
        Literals {
            solver: self,
            pos: 0,
            end: self.n_vars(),
            named_only: true,
        }
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("n_vars", &self.n_vars())
            .field("n_clauses", &self.n_clauses())
            .finish()
    }
}

/// Names must be non-empty and consist of printable characters only; space,
/// tab, newline (all whitespace and control characters) are rejected.
pub(crate) fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| !c.is_whitespace() && !c.is_control())
}

/// A forward cursor over literals in creation order.
///
/// The cursor snapshots the registry size at creation and cannot be
/// restarted once fully consumed. Beyond the idiomatic [`Iterator`]
/// interface, [`try_next`][Literals::try_next] makes over-consumption an
/// observable failure, repeatably.
pub struct Literals<'a> {
    solver: &'a Solver,
    pos: usize,
    end: usize,
    named_only: bool,
}

impl Literals<'_> {
    /// Advances the cursor, failing once the sequence is exhausted.
    pub fn try_next(&mut self) -> Result<Lit> {
        self.next().ok_or(Error::IteratorExhausted)
    }
}

impl Iterator for Literals<'_> {
    type Item = Lit;

    fn next(&mut self) -> Option<Lit> {
        let names = self.solver.names.borrow();
        while self.pos < self.end {
            let var = Var::new(self.pos as u32);
            self.pos += 1;
            if !self.named_only || !names.by_var[var.index()].is_empty() {
                return Some(var.pos());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_fresh_context() {
        let s = Solver::new();
        assert_eq!(s.n_vars(), 1);
        assert!(s.solve());
        assert!(s.solve_under(&[Lit::TRUE]));
        assert!(!s.solve_under(&[Lit::FALSE]));
        assert!(!s.solve_under(&[Lit::TRUE, Lit::FALSE]));
        assert!(s.solve());
    }

    #[test]
    fn test_reserved_names() {
        let s = Solver::new();
        assert_eq!(s.literal("True").unwrap(), Lit::TRUE);
        assert_eq!(s.literal("False").unwrap(), Lit::FALSE);
        assert!(matches!(
            s.new_named_lit("True"),
            Err(Error::DuplicateName(_))
        ));
        assert!(matches!(
            s.new_named_lit("False"),
            Err(Error::DuplicateName(_))
        ));
        assert_eq!(s.n_vars(), 1);
    }

    #[test]
    fn test_name_round_trip() {
        let s = Solver::new();
        let a = s.new_named_lit("a").unwrap();
        assert_eq!(s.literal("a").unwrap(), a);
        assert_eq!(s.name(a), "a");
        let b = s.new_lit();
        assert_eq!(s.name(b), "");
    }

    #[test]
    fn test_name_grammar() {
        let s = Solver::new();
        for bad in ["with space", "with\ttab", "with\nnewline", " ", "\u{7f}"] {
            assert!(matches!(
                s.new_named_lit(bad),
                Err(Error::InvalidName(_))
            ));
        }
        assert_eq!(s.n_vars(), 1);
        // Printable punctuation is fine.
        for good in ["~", "a/b", "\"quoted\"", "[x]", "x<1>", "p!?@#$%^&*()"] {
            let lit = s.new_named_lit(good).unwrap();
            assert_eq!(s.literal(good).unwrap(), lit);
        }
    }

    #[test]
    fn test_counter_on_failure() {
        let s = Solver::new();
        s.new_named_lit("x").unwrap();
        assert_eq!(s.n_vars(), 2);
        assert!(s.new_named_lit("x").is_err());
        assert!(s.new_named_lit("bad name").is_err());
        assert_eq!(s.n_vars(), 2);
        s.new_lit();
        assert_eq!(s.n_vars(), 3);
    }

    #[test]
    fn test_lookup_empty_name() {
        let s = Solver::new();
        assert!(matches!(s.literal(""), Err(Error::UnknownName(_))));
        assert!(matches!(s.literal("nope"), Err(Error::UnknownName(_))));
    }

    #[test]
    fn test_const_folding() {
        let s = Solver::new();
        let a = s.new_lit();
        let b = s.new_lit();
        assert!(s.is_const(Lit::TRUE));
        assert!(s.is_const_true(Lit::TRUE));
        assert!(s.is_const_false(Lit::FALSE));
        assert!(!s.is_const(a));
        s.add_clause(&[a]).unwrap();
        assert!(s.is_const_true(a));
        assert!(!s.is_const_false(a));
        s.add_clause(&[-b]).unwrap();
        assert!(s.is_const_false(b));
        assert!(!s.is_const_true(b));
    }

    #[test]
    fn test_model_lifecycle() {
        let s = Solver::new();
        let a = s.new_lit();
        assert!(s.possible_value(a).is_none());
        assert!(matches!(s.value(a), Err(Error::NoModel)));
        assert!(!s.value_or(a, false));
        assert!(s.value_or(a, true));
        assert!(s.solve_under(&[a]));
        assert!(s.value(a).unwrap());
        assert!(s.value_or(a, false));
        // An UNSAT call invalidates the model.
        assert!(!s.solve_under(&[Lit::FALSE]));
        assert!(matches!(s.value(a), Err(Error::NoModel)));
    }

    #[test]
    fn test_literal_cursor() {
        let s = Solver::new();
        let a = s.new_lit();
        let b = s.new_named_lit("b").unwrap();
        let c = s.new_lit();
        let mut it = s.literals();
        assert_eq!(it.try_next().unwrap(), Lit::TRUE);
        assert_eq!(it.try_next().unwrap(), a);
        assert_eq!(it.try_next().unwrap(), b);
        assert_eq!(it.try_next().unwrap(), c);
        assert!(matches!(it.try_next(), Err(Error::IteratorExhausted)));
        // Exhaustion is repeatable.
        assert!(matches!(it.try_next(), Err(Error::IteratorExhausted)));

        let mut named = s.named_literals();
        assert_eq!(named.try_next().unwrap(), Lit::TRUE);
        assert_eq!(named.try_next().unwrap(), b);
        assert!(matches!(named.try_next(), Err(Error::IteratorExhausted)));
    }

    #[test]
    fn test_cursor_snapshot() {
        let s = Solver::new();
        let a = s.new_lit();
        let mut it = s.literals();
        assert_eq!(it.next(), Some(Lit::TRUE));
        // Growth after creation is not visible to the cursor.
        s.new_lit();
        assert_eq!(it.next(), Some(a));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_add_clause_out_of_range() {
        let s = Solver::new();
        let bogus = Var::new(10).pos();
        assert!(matches!(
            s.add_clause(&[bogus]),
            Err(Error::Range { index: 10, bound: 1 })
        ));
        assert_eq!(s.n_clauses(), 0);
    }

    #[test]
    fn test_exactly_one_polarity_holds() {
        let s = Solver::new();
        let a = s.new_lit();
        assert!(s.solve());
        let value = s.value(a).unwrap();
        assert_eq!(s.value(-a).unwrap(), !value);
    }
}
