//! Constraint persistence: saving and reloading variables, names, and
//! clauses.
//!
//! # File Format (.gnf)
//!
//! ```text
//! c <comment>
//! gnf <declared-vars> <clauses>
//! v [<name>]             # declares the next variable, in creation order
//! <lit> <lit> ... 0      # clause over signed 1-based literals
//! ```
//!
//! File-local variable identities follow declaration order, starting at 2:
//! identity 1 is the reserved constant-true variable, which is implicit and
//! never declared. Clause literals are DIMACS-style signed integers
//! (magnitude = identity, sign = polarity) and may reference the constant or
//! any previously declared variable.
//!
//! Loading replays a file against a possibly non-empty context. Declarations
//! whose name is already bound in the target denote that same logical
//! variable; unnamed and newly-named declarations allocate fresh identities
//! immediately after the target's current highest identity, so loading one
//! file into two fresh contexts yields identical absolute identities, while
//! loading into a populated context shifts them uniformly. Loading is
//! atomic: a malformed file leaves the target untouched.

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::lit::{Lit, Var};
use crate::solver::{valid_name, Solver};

/// A staged, fully validated file image. Built before any mutation of the
/// target, discarded after commit.
struct Staged {
    /// Declared names in file order, empty string for anonymous.
    decls: Vec<String>,
    /// Clauses in file-local signed numbering.
    clauses: Vec<Vec<i32>>,
}

impl Solver {
    /// Saves all variables, names, and clauses to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_gnf_string())?;
        Ok(())
    }

    /// Serializes the context in the GNF format.
    pub fn to_gnf_string(&self) -> String {
        let names = self.var_names();
        let clauses = self.clause_log();
        let mut output = String::new();
        writeln!(output, "c variable identities start at 1").unwrap();
        writeln!(output, "c identity 1 is the implicit constant-true variable").unwrap();
        writeln!(output, "c v [<name>] declares the next variable").unwrap();
        writeln!(output, "c clauses are signed 1-based literals, 0-terminated").unwrap();
        writeln!(output, "gnf {} {}", names.len() - 1, clauses.len()).unwrap();
        for name in names.iter().skip(1) {
            if name.is_empty() {
                writeln!(output, "v").unwrap();
            } else {
                writeln!(output, "v {}", name).unwrap();
            }
        }
        for clause in &clauses {
            for lit in clause {
                write!(output, "{} ", lit.to_dimacs()).unwrap();
            }
            writeln!(output, "0").unwrap();
        }
        output
    }

    /// Loads a saved constraint store into this context.
    ///
    /// See the module documentation for the replay semantics. On any
    /// [`Error::Malformed`] the context is left fully unmodified.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.load_gnf_string(&content)
    }

    /// Loads a serialized constraint store from a string.
    pub fn load_gnf_string(&self, content: &str) -> Result<()> {
        let staged = self.stage(content)?;
        self.commit(staged);
        Ok(())
    }

    /// Phase 1: parse and validate everything without touching the context.
    fn stage(&self, content: &str) -> Result<Staged> {
        let mut header: Option<(usize, usize)> = None;
        let mut decls: Vec<String> = Vec::new();
        let mut clauses: Vec<Vec<i32>> = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('c') {
                continue;
            }
            if header.is_none() {
                let mut parts = line.split_whitespace();
                if parts.next() != Some("gnf") {
                    return Err(Error::Malformed(format!("invalid header: {:?}", line)));
                }
                let counts: Vec<usize> = parts
                    .map(|t| t.parse())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| Error::Malformed(format!("invalid header: {:?}", line)))?;
                if counts.len() != 2 {
                    return Err(Error::Malformed(format!("invalid header: {:?}", line)));
                }
                header = Some((counts[0], counts[1]));
                continue;
            }

            if line == "v" || line.starts_with("v ") {
                let name = line[1..].trim();
                if !name.is_empty() {
                    if !valid_name(name) {
                        return Err(Error::Malformed(format!("invalid name {:?}", name)));
                    }
                    if name == "True" || name == "False" {
                        return Err(Error::Malformed(format!(
                            "reserved name {:?} cannot be declared",
                            name
                        )));
                    }
                    if decls.iter().any(|d| d == name) {
                        return Err(Error::Malformed(format!("duplicate name {:?}", name)));
                    }
                }
                decls.push(name.to_string());
            } else {
                let codes: Vec<i32> = line
                    .split_whitespace()
                    .map(|t| t.parse())
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|_| Error::Malformed(format!("invalid clause line: {:?}", line)))?;
                match codes.split_last() {
                    Some((&0, lits)) => {
                        for &code in lits {
                            let id = code.unsigned_abs() as usize;
                            // Only the constant (1) and previously declared
                            // variables may be referenced.
                            if id == 0 || id > decls.len() + 1 {
                                return Err(Error::Malformed(format!(
                                    "literal {} references an undeclared variable",
                                    code
                                )));
                            }
                        }
                        clauses.push(lits.to_vec());
                    }
                    _ => {
                        return Err(Error::Malformed(format!(
                            "clause line must end with 0: {:?}",
                            line
                        )));
                    }
                }
            }
        }

        let Some((n_decls, n_clauses)) = header else {
            return Err(Error::Malformed("missing header".to_string()));
        };
        if decls.len() != n_decls || clauses.len() != n_clauses {
            return Err(Error::Malformed(format!(
                "header declares {} variables and {} clauses, found {} and {}",
                n_decls,
                n_clauses,
                decls.len(),
                clauses.len()
            )));
        }
        Ok(Staged { decls, clauses })
    }

    /// Phase 2: allocate variables and replay clauses. Cannot fail after a
    /// successful stage.
    fn commit(&self, staged: Staged) {
        debug!(
            "committing {} declarations and {} clauses onto {} existing variables",
            staged.decls.len(),
            staged.clauses.len(),
            self.n_vars()
        );
        // File-local identity k maps to map[k - 1].
        let mut map: Vec<Var> = Vec::with_capacity(staged.decls.len() + 1);
        map.push(Var::CONST);
        for name in &staged.decls {
            let lit = if !name.is_empty() {
                match self.literal(name) {
                    // The name denotes an already-known logical variable.
                    Ok(existing) => existing,
                    Err(_) => self
                        .new_named_lit(name)
                        .expect("staged names are valid and unbound"),
                }
            } else {
                self.new_lit()
            };
            map.push(lit.var());
        }
        for clause in &staged.clauses {
            let lits: Vec<Lit> = clause
                .iter()
                .map(|&code| {
                    let var = map[code.unsigned_abs() as usize - 1];
                    Lit::new(var, code > 0)
                })
                .collect();
            self.emit_clause(lits);
        }
    }
}
