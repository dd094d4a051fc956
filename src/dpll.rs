//! Built-in baseline engine: DPLL with unit propagation.
//!
//! This is the default [`Engine`] behind a [`Solver`][crate::solver::Solver].
//! It favors simplicity and completeness over speed: a plain clause vector,
//! root-level unit propagation maintained incrementally as clauses arrive,
//! and a recursive search with unit propagation under assumptions. No clause
//! learning, no restarts.

use log::debug;

use crate::engine::{Engine, SolveResult};
use crate::error::{Error, Result};
use crate::lit::{Lit, Var};

#[derive(Debug, Default)]
pub struct DpllEngine {
    num_vars: usize,
    clauses: Vec<Vec<Lit>>,
    /// Root-level forced values, saturated after every added clause.
    fixed: Vec<Option<bool>>,
    /// Latched once the clause set is contradictory at root level.
    root_conflict: bool,
    model: Option<Vec<bool>>,
}

impl DpllEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Saturates root-level unit propagation over the whole clause set.
    fn propagate_root(&mut self) {
        if self.root_conflict {
            return;
        }
        loop {
            let mut changed = false;
            for clause in &self.clauses {
                match clause_status(clause, &self.fixed) {
                    Status::Satisfied | Status::Open => {}
                    Status::Unit(lit) => {
                        self.fixed[lit.var().index()] = Some(lit.is_pos());
                        changed = true;
                    }
                    Status::Conflict => {
                        debug!("root-level conflict");
                        self.root_conflict = true;
                        return;
                    }
                }
            }
            if !changed {
                return;
            }
        }
    }

    fn search(&self, assign: &mut [Option<bool>]) -> bool {
        let mut trail = Vec::new();
        if !propagate(&self.clauses, assign, &mut trail) {
            undo(assign, &trail);
            return false;
        }
        let unassigned = (0..self.num_vars).find(|&v| assign[v].is_none());
        let Some(var) = unassigned else {
            return true;
        };
        for value in [true, false] {
            assign[var] = Some(value);
            if self.search(assign) {
                return true;
            }
            assign[var] = None;
        }
        undo(assign, &trail);
        false
    }
}

enum Status {
    Satisfied,
    Conflict,
    Unit(Lit),
    Open,
}

fn clause_status(clause: &[Lit], assign: &[Option<bool>]) -> Status {
    let mut unassigned = None;
    let mut open = 0;
    for &lit in clause {
        match assign[lit.var().index()] {
            Some(value) => {
                if lit.eval_with(value) {
                    return Status::Satisfied;
                }
            }
            None => {
                unassigned = Some(lit);
                open += 1;
            }
        }
    }
    match (open, unassigned) {
        (0, _) => Status::Conflict,
        (1, Some(lit)) => Status::Unit(lit),
        _ => Status::Open,
    }
}

/// Unit propagation to fixpoint. Records assignments in `trail`; returns
/// `false` on conflict (caller undoes the trail).
fn propagate(clauses: &[Vec<Lit>], assign: &mut [Option<bool>], trail: &mut Vec<Var>) -> bool {
    loop {
        let mut changed = false;
        for clause in clauses {
            match clause_status(clause, assign) {
                Status::Satisfied | Status::Open => {}
                Status::Unit(lit) => {
                    assign[lit.var().index()] = Some(lit.is_pos());
                    trail.push(lit.var());
                    changed = true;
                }
                Status::Conflict => return false,
            }
        }
        if !changed {
            return true;
        }
    }
}

fn undo(assign: &mut [Option<bool>], trail: &[Var]) {
    for &var in trail {
        assign[var.index()] = None;
    }
}

impl Engine for DpllEngine {
    fn new_var(&mut self) -> Var {
        let var = Var::new(self.num_vars as u32);
        self.num_vars += 1;
        self.fixed.push(None);
        var
    }

    fn add_clause(&mut self, clause: &[Lit]) -> Result<()> {
        for &lit in clause {
            if lit.var().index() >= self.num_vars {
                return Err(Error::Range {
                    index: lit.var().index(),
                    bound: self.num_vars,
                });
            }
        }
        self.clauses.push(clause.to_vec());
        self.propagate_root();
        Ok(())
    }

    fn solve(&mut self, assumptions: &[Lit]) -> SolveResult {
        debug!("solve(assumptions = {:?})", assumptions);
        self.model = None;
        if self.root_conflict {
            return SolveResult::Unsat;
        }
        let mut assign = self.fixed.clone();
        for &lit in assumptions {
            let slot = &mut assign[lit.var().index()];
            match *slot {
                Some(value) if !lit.eval_with(value) => return SolveResult::Unsat,
                _ => *slot = Some(lit.is_pos()),
            }
        }
        if self.search(&mut assign) {
            // Variables untouched by search or propagation default to false.
            self.model = Some(
                assign
                    .into_iter()
                    .map(|value| value.unwrap_or(false))
                    .collect(),
            );
            SolveResult::Sat
        } else {
            SolveResult::Unsat
        }
    }

    fn value(&self, lit: Lit) -> Option<bool> {
        let model = self.model.as_ref()?;
        let value = *model.get(lit.var().index())?;
        Some(lit.eval_with(value))
    }

    fn fixed(&self, lit: Lit) -> Option<bool> {
        let value = (*self.fixed.get(lit.var().index())?)?;
        Some(lit.eval_with(value))
    }
}
