use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// A variable identity (0-indexed).
///
/// Variable 0 is reserved: every [`Solver`][crate::solver::Solver] binds it
/// to the constant-true literal at construction, and it is never handed out
/// by allocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    pub const fn new(id: u32) -> Self {
        Var(id)
    }

    /// The reserved constant-true variable.
    pub const CONST: Var = Var(0);

    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The positive literal of this variable.
    pub const fn pos(self) -> Lit {
        Lit(self.0 as i32 + 1)
    }

    /// The negative literal of this variable.
    pub const fn neg(self) -> Lit {
        Lit(-(self.0 as i32 + 1))
    }
}

impl Display for Var {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A literal: a variable paired with a polarity.
///
/// Internally a non-zero `i32` whose magnitude is `var + 1` and whose sign is
/// the polarity, so negation is a sign flip and the reserved variable 0 keeps
/// two distinct literals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit(i32);

impl Lit {
    /// The constant-true literal (variable 0, positive).
    pub const TRUE: Lit = Lit(1);
    /// The constant-false literal, `TRUE.negate()`.
    pub const FALSE: Lit = Lit(-1);

    pub const fn new(var: Var, positive: bool) -> Self {
        let code = var.0 as i32 + 1;
        Lit(if positive { code } else { -code })
    }

    pub const fn var(self) -> Var {
        Var(self.0.unsigned_abs() - 1)
    }

    pub const fn is_pos(self) -> bool {
        self.0 > 0
    }

    pub const fn is_neg(self) -> bool {
        self.0 < 0
    }

    /// Involution: `l.negate().negate() == l`.
    pub const fn negate(self) -> Self {
        Lit(-self.0)
    }

    /// Signed 1-based representation used by the persistence format.
    pub const fn to_dimacs(self) -> i32 {
        self.0
    }

    /// Builds a literal from its signed 1-based representation.
    ///
    /// # Panics
    ///
    /// Panics if `value == 0` (unused in DIMACS numbering).
    pub fn from_dimacs(value: i32) -> Self {
        assert_ne!(value, 0, "Literal code must be non-zero");
        Lit(value)
    }

    /// Truth value of this literal given a value for its variable.
    pub const fn eval_with(self, value: bool) -> bool {
        if self.is_neg() {
            !value
        } else {
            value
        }
    }
}

impl Neg for Lit {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Display for Lit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", if self.is_neg() { "~" } else { "" }, self.var())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negation_involution() {
        let a = Var::new(3).pos();
        assert_eq!(a.negate().negate(), a);
        assert_eq!(-(-a), a);
        assert_ne!(a, -a);
        assert_eq!(a.var(), (-a).var());
    }

    #[test]
    fn test_constants() {
        assert_eq!(Lit::FALSE, Lit::TRUE.negate());
        assert_eq!(Lit::TRUE.var(), Var::CONST);
        assert!(Lit::TRUE.is_pos());
        assert!(Lit::FALSE.is_neg());
    }

    #[test]
    fn test_dimacs_round_trip() {
        for code in [1, -1, 5, -42] {
            let lit = Lit::from_dimacs(code);
            assert_eq!(lit.to_dimacs(), code);
        }
        assert_eq!(Lit::from_dimacs(2), Var::new(1).pos());
        assert_eq!(Lit::from_dimacs(-2), Var::new(1).neg());
    }

    #[test]
    fn test_eval_with() {
        let a = Var::new(1).pos();
        assert!(a.eval_with(true));
        assert!(!a.eval_with(false));
        assert!(!(-a).eval_with(true));
        assert!((-a).eval_with(false));
    }

    #[test]
    fn test_display() {
        assert_eq!(Var::new(2).pos().to_string(), "x2");
        assert_eq!(Var::new(2).neg().to_string(), "~x2");
    }
}
