//! Fixed-width unsigned bitvectors over the literal registry.
//!
//! A [`BitVector`] is an ordered sequence of literals, LSB at index 0,
//! interpreted as an unsigned integer where bit `i` weighs `2^i`. Operations
//! bit-blast into clauses through the context: bitwise gates are Tseitin
//! encodings, orderings use an LSB-to-MSB ladder, and arithmetic is a
//! ripple-carry adder. Gate helpers fold the structural constants
//! [`Lit::TRUE`]/[`Lit::FALSE`], so comparisons against integer constants
//! stay small.

use log::debug;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::lit::Lit;
use crate::solver::Solver;

/// An ordered sequence of literals denoting an unsigned integer.
///
/// Handles are plain data: all constraint emission goes through the
/// [`Solver`] that created the bits.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BitVector {
    bits: Vec<Lit>,
}

impl BitVector {
    pub(crate) fn from_bits(bits: Vec<Lit>) -> Self {
        assert!(!bits.is_empty(), "Bitvector width must be at least 1");
        BitVector { bits }
    }

    /// The bit count.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Alias for [`width`][BitVector::width].
    pub fn size(&self) -> usize {
        self.bits.len()
    }

    /// The literal for bit `i` (0 = least significant).
    pub fn get(&self, i: usize) -> Result<Lit> {
        self.bits.get(i).copied().ok_or(Error::Range {
            index: i,
            bound: self.bits.len(),
        })
    }

    pub fn bits(&self) -> &[Lit] {
        &self.bits
    }
}

// Literal-level logic gates. Each returns a literal constrained to the
// gate's truth table, allocating a fresh anonymous variable unless the
// inputs fold structurally.
impl Solver {
    pub fn and_lit(&self, a: Lit, b: Lit) -> Lit {
        if a == Lit::FALSE || b == Lit::FALSE || a == -b {
            return Lit::FALSE;
        }
        if a == Lit::TRUE || a == b {
            return b;
        }
        if b == Lit::TRUE {
            return a;
        }
        let r = self.new_lit();
        self.emit_clause(vec![-r, a]);
        self.emit_clause(vec![-r, b]);
        self.emit_clause(vec![r, -a, -b]);
        r
    }

    pub fn or_lit(&self, a: Lit, b: Lit) -> Lit {
        -self.and_lit(-a, -b)
    }

    pub fn xor_lit(&self, a: Lit, b: Lit) -> Lit {
        if a == Lit::FALSE {
            return b;
        }
        if b == Lit::FALSE {
            return a;
        }
        if a == Lit::TRUE {
            return -b;
        }
        if b == Lit::TRUE {
            return -a;
        }
        if a == b {
            return Lit::FALSE;
        }
        if a == -b {
            return Lit::TRUE;
        }
        let r = self.new_lit();
        self.emit_clause(vec![-r, a, b]);
        self.emit_clause(vec![-r, -a, -b]);
        self.emit_clause(vec![r, -a, b]);
        self.emit_clause(vec![r, a, -b]);
        r
    }

    pub fn xnor_lit(&self, a: Lit, b: Lit) -> Lit {
        -self.xor_lit(a, b)
    }

    pub fn implies_lit(&self, a: Lit, b: Lit) -> Lit {
        self.or_lit(-a, b)
    }

    /// If-then-else: `cond ? then_ : else_`.
    pub fn ite_lit(&self, cond: Lit, then_: Lit, else_: Lit) -> Lit {
        if cond == Lit::TRUE {
            return then_;
        }
        if cond == Lit::FALSE {
            return else_;
        }
        if then_ == else_ {
            return then_;
        }
        let r = self.new_lit();
        self.emit_clause(vec![-cond, -then_, r]);
        self.emit_clause(vec![-cond, then_, -r]);
        self.emit_clause(vec![cond, -else_, r]);
        self.emit_clause(vec![cond, else_, -r]);
        r
    }

    /// Conjunction of arbitrarily many literals.
    pub fn and_many(&self, lits: &[Lit]) -> Lit {
        let mut inputs = Vec::with_capacity(lits.len());
        for &lit in lits {
            if lit == Lit::FALSE {
                return Lit::FALSE;
            }
            if lit == Lit::TRUE || inputs.contains(&lit) {
                continue;
            }
            if inputs.contains(&-lit) {
                return Lit::FALSE;
            }
            inputs.push(lit);
        }
        match inputs.len() {
            0 => Lit::TRUE,
            1 => inputs[0],
            _ => {
                let r = self.new_lit();
                let mut long = vec![r];
                for &lit in &inputs {
                    self.emit_clause(vec![-r, lit]);
                    long.push(-lit);
                }
                self.emit_clause(long);
                r
            }
        }
    }

    /// Majority of three, the carry function of a full adder.
    fn maj_lit(&self, a: Lit, b: Lit, c: Lit) -> Lit {
        if a == Lit::FALSE {
            return self.and_lit(b, c);
        }
        if b == Lit::FALSE {
            return self.and_lit(a, c);
        }
        if c == Lit::FALSE {
            return self.and_lit(a, b);
        }
        if a == Lit::TRUE {
            return self.or_lit(b, c);
        }
        if b == Lit::TRUE {
            return self.or_lit(a, c);
        }
        if c == Lit::TRUE {
            return self.or_lit(a, b);
        }
        let r = self.new_lit();
        self.emit_clause(vec![-a, -b, r]);
        self.emit_clause(vec![-a, -c, r]);
        self.emit_clause(vec![-b, -c, r]);
        self.emit_clause(vec![a, b, -r]);
        self.emit_clause(vec![a, c, -r]);
        self.emit_clause(vec![b, c, -r]);
        r
    }

    /// Asserts `a <-> b` with a biconditional clause pair.
    fn assert_iff(&self, a: Lit, b: Lit) {
        self.emit_clause(vec![-a, b]);
        self.emit_clause(vec![a, -b]);
    }
}

// Bitvector construction, structure, comparison, and arithmetic.
impl Solver {
    /// Creates a bitvector of `width` fresh anonymous variables.
    ///
    /// # Panics
    ///
    /// Panics if `width == 0`.
    pub fn new_bv(&self, width: usize) -> BitVector {
        assert!(width >= 1, "Bitvector width must be at least 1");
        debug!("new_bv(width = {})", width);
        BitVector::from_bits((0..width).map(|_| self.new_lit()).collect())
    }

    /// Creates a constant bitvector whose bits are the constant literals.
    ///
    /// Fails with a width mismatch when `value` needs more than `width` bits.
    pub fn bv_const(&self, width: usize, value: u64) -> Result<BitVector> {
        assert!(width >= 1, "Bitvector width must be at least 1");
        if width < 64 && value >> width != 0 {
            return Err(Error::WidthMismatch {
                left: width,
                right: (64 - value.leading_zeros()) as usize,
            });
        }
        let bits = (0..width)
            .map(|i| {
                if i < 64 && value >> i & 1 == 1 {
                    Lit::TRUE
                } else {
                    Lit::FALSE
                }
            })
            .collect();
        Ok(BitVector::from_bits(bits))
    }

    fn check_widths(&self, a: &BitVector, b: &BitVector) -> Result<()> {
        if a.width() != b.width() {
            return Err(Error::WidthMismatch {
                left: a.width(),
                right: b.width(),
            });
        }
        Ok(())
    }

    /// Bitwise complement. The result references the operand's bits with
    /// flipped polarity; no new variables or clauses.
    pub fn bv_not(&self, a: &BitVector) -> BitVector {
        BitVector::from_bits(a.bits.iter().map(|&bit| -bit).collect())
    }

    pub fn bv_and(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| self.and_lit(x, y))
    }

    pub fn bv_nand(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| -self.and_lit(x, y))
    }

    pub fn bv_or(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| self.or_lit(x, y))
    }

    pub fn bv_nor(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| -self.or_lit(x, y))
    }

    pub fn bv_xor(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| self.xor_lit(x, y))
    }

    pub fn bv_xnor(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.bv_bitwise(a, b, |x, y| -self.xor_lit(x, y))
    }

    fn bv_bitwise(
        &self,
        a: &BitVector,
        b: &BitVector,
        gate: impl Fn(Lit, Lit) -> Lit,
    ) -> Result<BitVector> {
        self.check_widths(a, b)?;
        let bits = a
            .bits
            .iter()
            .zip(&b.bits)
            .map(|(&x, &y)| gate(x, y))
            .collect();
        Ok(BitVector::from_bits(bits))
    }

    /// Extracts bits `lo..hi` into a new bitvector of width `hi - lo`.
    ///
    /// Each result bit is tied to its source bit by a biconditional clause
    /// pair over fresh variables.
    pub fn bv_slice(&self, a: &BitVector, lo: usize, hi: usize) -> Result<BitVector> {
        if lo >= hi {
            return Err(Error::Range { index: lo, bound: hi });
        }
        if hi > a.width() {
            return Err(Error::Range {
                index: hi,
                bound: a.width(),
            });
        }
        let out = self.new_bv(hi - lo);
        for (k, &bit) in out.bits.iter().enumerate() {
            self.assert_iff(bit, a.bits[lo + k]);
        }
        Ok(out)
    }

    /// Concatenates `a` (low-order) with `b` (high-order).
    ///
    /// The result references the operands' bits directly; no new constraints.
    pub fn bv_append(&self, a: &BitVector, b: &BitVector) -> BitVector {
        let mut bits = a.bits.clone();
        bits.extend_from_slice(&b.bits);
        BitVector::from_bits(bits)
    }

    /// A literal true iff the two vectors denote the same integer.
    pub fn bv_eq(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        self.check_widths(a, b)?;
        let same: Vec<Lit> = a
            .bits
            .iter()
            .zip(&b.bits)
            .map(|(&x, &y)| self.xnor_lit(x, y))
            .collect();
        Ok(self.and_many(&same))
    }

    pub fn bv_neq(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        Ok(-self.bv_eq(a, b)?)
    }

    /// A literal true iff `a < b` (unsigned).
    pub fn bv_lt(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        self.compare_ladder(a, b, Lit::FALSE)
    }

    /// A literal true iff `a <= b` (unsigned).
    pub fn bv_leq(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        self.compare_ladder(a, b, Lit::TRUE)
    }

    pub fn bv_gt(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        self.bv_lt(b, a)
    }

    pub fn bv_geq(&self, a: &BitVector, b: &BitVector) -> Result<Lit> {
        self.bv_leq(b, a)
    }

    /// Ladder from LSB to MSB: at each position, a differing bit decides,
    /// otherwise the verdict of the lower bits carries through. `base` is
    /// the verdict for equal vectors (false for `<`, true for `<=`).
    fn compare_ladder(&self, a: &BitVector, b: &BitVector, base: Lit) -> Result<Lit> {
        self.check_widths(a, b)?;
        let mut acc = base;
        for (&x, &y) in a.bits.iter().zip(&b.bits) {
            let differ = self.xor_lit(x, y);
            acc = self.ite_lit(differ, y, acc);
        }
        Ok(acc)
    }

    pub fn bv_eq_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        let c = self.bv_const(a.width(), value)?;
        self.bv_eq(a, &c)
    }

    pub fn bv_neq_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        Ok(-self.bv_eq_const(a, value)?)
    }

    pub fn bv_lt_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        let c = self.bv_const(a.width(), value)?;
        self.bv_lt(a, &c)
    }

    pub fn bv_leq_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        let c = self.bv_const(a.width(), value)?;
        self.bv_leq(a, &c)
    }

    pub fn bv_gt_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        let c = self.bv_const(a.width(), value)?;
        self.bv_gt(a, &c)
    }

    pub fn bv_geq_const(&self, a: &BitVector, value: u64) -> Result<Lit> {
        let c = self.bv_const(a.width(), value)?;
        self.bv_geq(a, &c)
    }

    /// Unsigned addition. The result is one bit wider than the operands,
    /// with the final carry as its MSB, so the full reachable range fits.
    pub fn bv_add(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.check_widths(a, b)?;
        let mut bits = Vec::with_capacity(a.width() + 1);
        let mut carry = Lit::FALSE;
        for (&x, &y) in a.bits.iter().zip(&b.bits) {
            let partial = self.xor_lit(x, y);
            bits.push(self.xor_lit(partial, carry));
            carry = self.maj_lit(x, y, carry);
        }
        bits.push(carry);
        Ok(BitVector::from_bits(bits))
    }

    /// Unsigned subtraction `a - b`, same width as the operands.
    ///
    /// Encoded as `a = b + d` with the adder's final carry forced false:
    /// forcing the minuend below the subtrahend is unsatisfiable rather
    /// than wrapping.
    pub fn bv_sub(&self, a: &BitVector, b: &BitVector) -> Result<BitVector> {
        self.check_widths(a, b)?;
        let d = self.new_bv(a.width());
        let sum = self.bv_add(b, &d)?;
        for (&got, &want) in sum.bits.iter().zip(&a.bits) {
            self.assert_iff(got, want);
        }
        self.emit_clause(vec![-sum.bits[a.width()]]);
        Ok(d)
    }

    /// Decodes the vector against the current model, `width <= 64`.
    pub fn bv_value(&self, a: &BitVector) -> Result<u64> {
        if a.width() > 64 {
            return Err(Error::WidthMismatch {
                left: a.width(),
                right: 64,
            });
        }
        let mut value = 0u64;
        for (i, &bit) in a.bits.iter().enumerate() {
            if self.value(bit)? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Decodes a vector of any width against the current model.
    pub fn bv_value_big(&self, a: &BitVector) -> Result<BigUint> {
        let mut value = BigUint::ZERO;
        for (i, &bit) in a.bits.iter().enumerate() {
            value.set_bit(i as u64, self.value(bit)?);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_gate_folding() {
        let s = Solver::new();
        let a = s.new_lit();
        assert_eq!(s.and_lit(a, Lit::TRUE), a);
        assert_eq!(s.and_lit(Lit::FALSE, a), Lit::FALSE);
        assert_eq!(s.and_lit(a, a), a);
        assert_eq!(s.and_lit(a, -a), Lit::FALSE);
        assert_eq!(s.or_lit(a, Lit::TRUE), Lit::TRUE);
        assert_eq!(s.or_lit(a, Lit::FALSE), a);
        assert_eq!(s.xor_lit(a, Lit::FALSE), a);
        assert_eq!(s.xor_lit(a, Lit::TRUE), -a);
        assert_eq!(s.xor_lit(a, a), Lit::FALSE);
        assert_eq!(s.xor_lit(a, -a), Lit::TRUE);
        assert_eq!(s.ite_lit(Lit::TRUE, a, -a), a);
        assert_eq!(s.ite_lit(Lit::FALSE, a, -a), -a);
        // Nothing above allocated a variable or a clause.
        assert_eq!(s.n_vars(), 2);
        assert_eq!(s.n_clauses(), 0);
    }

    #[test]
    fn test_and_many_folding() {
        let s = Solver::new();
        let a = s.new_lit();
        let b = s.new_lit();
        assert_eq!(s.and_many(&[]), Lit::TRUE);
        assert_eq!(s.and_many(&[Lit::TRUE, a, a]), a);
        assert_eq!(s.and_many(&[a, -a, b]), Lit::FALSE);
        assert_eq!(s.and_many(&[a, Lit::FALSE]), Lit::FALSE);
    }

    #[test]
    fn test_implies() {
        let s = Solver::new();
        let a = s.new_lit();
        let b = s.new_lit();
        let imp = s.implies_lit(a, b);
        assert!(!s.solve_under(&[imp, a, -b]));
        assert!(s.solve_under(&[imp, a, b]));
        assert!(s.solve_under(&[imp, -a, -b]));
    }

    #[test]
    fn test_width_accessors() {
        let s = Solver::new();
        let bv = s.new_bv(4);
        assert_eq!(bv.width(), 4);
        assert_eq!(bv.size(), 4);
        assert!(bv.get(3).is_ok());
        assert!(matches!(bv.get(4), Err(Error::Range { index: 4, bound: 4 })));
    }

    #[test]
    fn test_bv_const_bounds() {
        let s = Solver::new();
        assert!(s.bv_const(4, 15).is_ok());
        assert!(matches!(
            s.bv_const(4, 16),
            Err(Error::WidthMismatch { left: 4, right: 5 })
        ));
        let c = s.bv_const(4, 0b1010).unwrap();
        assert_eq!(c.bits(), &[Lit::FALSE, Lit::TRUE, Lit::FALSE, Lit::TRUE]);
    }

    #[test]
    fn test_width_mismatch() {
        let s = Solver::new();
        let a = s.new_bv(4);
        let b = s.new_bv(3);
        assert!(matches!(
            s.bv_and(&a, &b),
            Err(Error::WidthMismatch { left: 4, right: 3 })
        ));
        assert!(s.bv_eq(&a, &b).is_err());
        assert!(s.bv_lt(&a, &b).is_err());
        assert!(s.bv_add(&a, &b).is_err());
        assert!(s.bv_sub(&a, &b).is_err());
    }

    #[test]
    fn test_const_comparison_folds_fully() {
        let s = Solver::new();
        let a = s.bv_const(4, 5).unwrap();
        assert_eq!(s.bv_eq_const(&a, 5).unwrap(), Lit::TRUE);
        assert_eq!(s.bv_eq_const(&a, 6).unwrap(), Lit::FALSE);
        assert_eq!(s.bv_lt_const(&a, 6).unwrap(), Lit::TRUE);
        assert_eq!(s.bv_lt_const(&a, 5).unwrap(), Lit::FALSE);
        assert_eq!(s.bv_leq_const(&a, 5).unwrap(), Lit::TRUE);
        assert_eq!(s.bv_geq_const(&a, 5).unwrap(), Lit::TRUE);
        assert_eq!(s.bv_gt_const(&a, 5).unwrap(), Lit::FALSE);
    }

    #[test]
    fn test_const_arithmetic() {
        let s = Solver::new();
        let a = s.bv_const(4, 9).unwrap();
        let b = s.bv_const(4, 8).unwrap();
        let sum = s.bv_add(&a, &b).unwrap();
        assert_eq!(sum.width(), 5);
        assert!(s.solve());
        assert_eq!(s.bv_value(&sum).unwrap(), 17);
    }

    #[test]
    fn test_value_big() {
        let s = Solver::new();
        let a = s.bv_const(80, u64::MAX).unwrap();
        assert!(matches!(s.bv_value(&a), Err(Error::WidthMismatch { .. })));
        assert!(s.solve());
        assert_eq!(s.bv_value_big(&a).unwrap(), BigUint::from(u64::MAX));
    }

    #[test]
    fn test_slice_bounds() {
        let s = Solver::new();
        let a = s.new_bv(4);
        assert!(matches!(s.bv_slice(&a, 2, 2), Err(Error::Range { .. })));
        assert!(matches!(s.bv_slice(&a, 3, 1), Err(Error::Range { .. })));
        assert!(matches!(s.bv_slice(&a, 1, 5), Err(Error::Range { .. })));
        assert_eq!(s.bv_slice(&a, 1, 3).unwrap().width(), 2);
    }

    #[test]
    fn test_no_model_value() {
        let s = Solver::new();
        let a = s.new_bv(2);
        assert!(matches!(s.bv_value(&a), Err(Error::NoModel)));
        assert!(matches!(s.bv_value_big(&a), Err(Error::NoModel)));
    }
}
