//! # bitsat: incremental boolean constraint solving with bitvectors
//!
//! **`bitsat`** is a constraint-solving context built around three pieces:
//! a registry of boolean literals with optional unique names, a fixed-width
//! unsigned bitvector theory bit-blasted on top of it, and a persistence
//! format that keeps variable identities stable across save and reload.
//!
//! ## Key Features
//!
//! - **Context-Centric Architecture**: All state lives in one owned
//!   [`Solver`][crate::solver::Solver]; there is no global registry, and
//!   independent contexts coexist freely.
//! - **Named Literals**: Variables can carry unique printable names and be
//!   recovered by name after a reload, even into a non-empty context.
//! - **Bitvector Theory**: Comparisons, bitwise operators, slicing,
//!   concatenation, and unsigned addition/subtraction, all encoded as
//!   clauses over ordinary literals.
//! - **Incremental Solving**: Repeated [`solve`][crate::solver::Solver::solve]
//!   calls under temporary assumptions; UNSAT is a result, not an error.
//! - **Pluggable Engine**: The search procedure sits behind the
//!   [`Engine`][crate::engine::Engine] trait; a baseline DPLL engine ships
//!   in the box.
//!
//! ## Basic Usage
//!
//! ```rust
//! use bitsat::solver::Solver;
//!
//! let s = Solver::new();
//!
//! // Two width-4 unsigned bitvectors and their sum.
//! let a = s.new_bv(4);
//! let b = s.new_bv(4);
//! let sum = s.bv_add(&a, &b).unwrap();
//!
//! // Ask for a model where a + b == 9 and a < b.
//! let total = s.bv_eq_const(&sum, 9).unwrap();
//! let ordered = s.bv_lt(&a, &b).unwrap();
//! assert!(s.solve_under(&[total, ordered]));
//!
//! let x = s.bv_value(&a).unwrap();
//! let y = s.bv_value(&b).unwrap();
//! assert_eq!(x + y, 9);
//! assert!(x < y);
//! ```
//!
//! ## Core Components
//!
//! - **[`solver`]**: The [`Solver`][crate::solver::Solver] context: variable
//!   registry, name table, clause log, solving, and model queries.
//! - **[`bitvec`]**: The bitvector theory.
//! - **[`gnf`]**: Saving and reloading constraint stores.
//! - **[`engine`]** / **[`dpll`]**: The engine seam and the built-in search.

pub mod bitvec;
pub mod dpll;
pub mod engine;
pub mod error;
pub mod gnf;
pub mod lit;
pub mod solver;
