//! The boolean engine seam.
//!
//! The [`Solver`][crate::solver::Solver] context does not prescribe a search
//! procedure: clause storage and satisfiability search live behind the
//! [`Engine`] trait, and any conforming implementation can be injected. The
//! crate ships [`DpllEngine`][crate::dpll::DpllEngine] as the default.

use crate::error::Result;
use crate::lit::{Lit, Var};

/// Outcome of a search. UNSAT is a first-class result, not a failure.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolveResult {
    Sat,
    Unsat,
}

impl SolveResult {
    pub const fn is_sat(self) -> bool {
        matches!(self, SolveResult::Sat)
    }
}

/// Clause storage and satisfiability search, consumed as a black box.
///
/// The engine's variable space must stay in lockstep with the registry:
/// the context calls [`new_var`][Engine::new_var] exactly once per allocated
/// identity, in order, starting with the reserved constant variable.
pub trait Engine {
    /// Extends the variable space by one and returns the new variable.
    fn new_var(&mut self) -> Var;

    /// Adds a clause over already-allocated variables.
    ///
    /// Fails only on a literal referencing an unallocated variable. The
    /// empty clause is accepted and makes the engine permanently UNSAT.
    fn add_clause(&mut self, clause: &[Lit]) -> Result<()>;

    /// Searches for a model under the given temporary assumptions.
    ///
    /// Invalidates the model of any previous call, whatever the outcome.
    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult;

    /// Truth value of `lit` in the most recent model, or `None` when the
    /// last call to [`solve`][Engine::solve] did not produce one.
    fn value(&self, lit: Lit) -> Option<bool>;

    /// Value forced for `lit` by the clause set alone (root-level
    /// propagation), independent of any model. Monotonic: once fixed, a
    /// literal never reverts.
    fn fixed(&self, lit: Lit) -> Option<bool>;
}
