// Copyright 2024-2025 Irreducible Inc.

use zkc_field::Field;
use zkc_utils::bail;

use super::{
	error::{Error, FatalError},
	Solver,
};
use crate::{
	coeff::COEFF_ID_ZERO,
	constraint::{CommitmentConstraint, SparseR1C},
	term::{Term, WireId},
};

/// An operand of the gate as a polynomial `p1⋅u + p0` in the unsolved wire `u`.
#[derive(Debug, Clone, Copy)]
struct Operand<F> {
	p1: F,
	p0: F,
}

impl<F: Field> Solver<'_, F> {
	/// Solves the unsolved wire of a gate, if any, and checks the gate otherwise.
	///
	/// Gates bound to a commitment only enforce the committed value and are not checked here;
	/// `Committed` gates are skipped altogether.
	pub(super) fn solve_sparse_r1c(&self, constraint: u32, c: &SparseR1C) -> Result<(), Error> {
		if c.commitment == CommitmentConstraint::Committed {
			return Ok(());
		}

		let mut unknowns = Vec::with_capacity(1);
		for wire in c.wires() {
			if !self.solution.is_solved(wire)? {
				unknowns.push(wire);
			}
		}
		let u = match unknowns.as_slice() {
			[] => None,
			[wire] => Some(*wire),
			_ => {
				bail!(FatalError::MultipleUnsolvedTerms { constraint });
			}
		};

		let Some(u) = u else {
			if c.commitment == CommitmentConstraint::Not {
				self.check_sparse_r1c(constraint, c)?;
			}
			return Ok(());
		};

		let a = self.operand(c.xa, c.uses_xa(), u)?;
		let b = self.operand(c.xb, c.uses_xb(), u)?;
		let o = self.operand(c.xc, c.uses_xc(), u)?;
		let coeff = |id| self.solution.coeff(id);
		let (ql, qr, qo, qm, qc) = (coeff(c.ql)?, coeff(c.qr)?, coeff(c.qo)?, coeff(c.qm)?, coeff(c.qc)?);

		// gate = alpha⋅u² + beta⋅u + gamma
		let alpha = qm * a.p1 * b.p1;
		let beta = ql * a.p1 + qr * b.p1 + qo * o.p1 + qm * (a.p1 * b.p0 + a.p0 * b.p1);
		let gamma = ql * a.p0 + qr * b.p0 + qo * o.p0 + qm * a.p0 * b.p0 + qc;

		if !alpha.is_zero() {
			bail!(FatalError::MultipleUnsolvedTerms { constraint });
		}
		match beta.inverse() {
			Some(beta_inv) => self.solution.set(u, -gamma * beta_inv),
			None => {
				// The gate does not depend on `u`.
				self.solution.set(u, F::zero())?;
				if c.commitment == CommitmentConstraint::Not {
					self.check_sparse_r1c(constraint, c)?;
				}
				Ok(())
			}
		}
	}

	fn operand(&self, wire: WireId, used: bool, unknown: WireId) -> Result<Operand<F>, Error> {
		let operand = if !used {
			Operand {
				p1: F::zero(),
				p0: F::zero(),
			}
		} else if wire == unknown {
			Operand {
				p1: F::one(),
				p0: F::zero(),
			}
		} else {
			Operand {
				p1: F::zero(),
				p0: self.solution.value(wire)?,
			}
		};
		Ok(operand)
	}

	/// `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅(xa×xb) + qC == 0` over solved wires.
	fn check_sparse_r1c(&self, constraint: u32, c: &SparseR1C) -> Result<(), Error> {
		let term = |coeff, wire| self.solution.compute_term(&Term::new(coeff, wire));
		let l = term(c.ql, c.xa)?;
		let r = term(c.qr, c.xb)?;
		let o = term(c.qo, c.xc)?;
		let m0 = term(c.qm, c.xa)?;
		let m1 = if c.qm == COEFF_ID_ZERO {
			F::zero()
		} else {
			self.solution.value(c.xb)?
		};
		let qc = self.solution.coeff(c.qc)?;

		if (m0 * m1 + l + r + o + qc).is_zero() {
			return Ok(());
		}
		Err(self.unsatisfied(
			constraint,
			format!(
				"{} + {} + {} + ({} × {}) + {} != 0",
				l.to_decimal_string(),
				r.to_decimal_string(),
				o.to_decimal_string(),
				m0.to_decimal_string(),
				m1.to_decimal_string(),
				qc.to_decimal_string()
			),
		))
	}
}
