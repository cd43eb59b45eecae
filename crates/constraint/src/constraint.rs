// Copyright 2024-2025 Irreducible Inc.

//! Materialized constraint shapes, as produced by blueprint decompression.

use crate::{
	coeff::{CoeffId, COEFF_ID_ZERO},
	debug::{Resolver, StringBuilder},
	term::{LinearExpression, Term, WireId},
};

/// Rank-one constraint `L ⋅ R == O`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct R1C {
	pub l: LinearExpression,
	pub r: LinearExpression,
	pub o: LinearExpression,
}

impl R1C {
	pub fn new(l: LinearExpression, r: LinearExpression, o: LinearExpression) -> Self {
		Self { l, r, o }
	}

	/// Empties the three expressions, keeping their allocations.
	pub fn clear(&mut self) {
		self.l.clear();
		self.r.clear();
		self.o.clear();
	}

	/// Every term of the constraint, in `L`, `R`, `O` order.
	pub fn terms(&self) -> impl Iterator<Item = &Term> {
		self.l.iter().chain(&self.r).chain(&self.o)
	}

	/// Formats the constraint as `L ⋅ R == O`.
	pub fn display(&self, resolver: &impl Resolver) -> String {
		let mut sbb = StringBuilder::new(resolver);
		sbb.write_linear_expression(&self.l);
		sbb.write_str(" ⋅ ");
		sbb.write_linear_expression(&self.r);
		sbb.write_str(" == ");
		sbb.write_linear_expression(&self.o);
		sbb.finish()
	}
}

/// Role of a sparse constraint with respect to a commitment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CommitmentConstraint {
	#[default]
	Not = 0,
	/// Asserts a committed value; skipped by the solver.
	Committed = 1,
	/// Binds the commitment value; solved but not checked.
	Commitment = 2,
}

impl TryFrom<u32> for CommitmentConstraint {
	type Error = u32;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		match value {
			0 => Ok(Self::Not),
			1 => Ok(Self::Committed),
			2 => Ok(Self::Commitment),
			other => Err(other),
		}
	}
}

/// PlonK-ish gate `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅(xa⋅xb) + qC == 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SparseR1C {
	pub xa: WireId,
	pub xb: WireId,
	pub xc: WireId,
	pub ql: CoeffId,
	pub qr: CoeffId,
	pub qo: CoeffId,
	pub qm: CoeffId,
	pub qc: CoeffId,
	pub commitment: CommitmentConstraint,
}

impl SparseR1C {
	pub fn clear(&mut self) {
		*self = Self::default();
	}

	/// Whether `xa` takes part in the gate equation.
	pub fn uses_xa(&self) -> bool {
		self.ql != COEFF_ID_ZERO || self.qm != COEFF_ID_ZERO
	}

	pub fn uses_xb(&self) -> bool {
		self.qr != COEFF_ID_ZERO || self.qm != COEFF_ID_ZERO
	}

	pub fn uses_xc(&self) -> bool {
		self.qo != COEFF_ID_ZERO
	}

	/// The wires with a non-zero contribution to the gate, without duplicates.
	pub fn wires(&self) -> impl Iterator<Item = WireId> {
		let xa = self.uses_xa().then_some(self.xa);
		let xb = (self.uses_xb() && xa != Some(self.xb)).then_some(self.xb);
		let xc = (self.uses_xc() && xa != Some(self.xc) && xb != Some(self.xc)).then_some(self.xc);
		xa.into_iter().chain(xb).chain(xc)
	}

	/// Formats the constraint as `qL⋅xa + qR⋅xb + qO⋅xc + qM⋅(xa×xb) + qC == 0`.
	pub fn display(&self, resolver: &impl Resolver) -> String {
		let mut sbb = StringBuilder::new(resolver);
		sbb.write_term(Term::new(self.ql, self.xa));
		sbb.write_str(" + ");
		sbb.write_term(Term::new(self.qr, self.xb));
		sbb.write_str(" + ");
		sbb.write_term(Term::new(self.qo, self.xc));
		if self.qm != COEFF_ID_ZERO {
			let qm = resolver.coeff_to_string(self.qm);
			let xa = resolver.variable_to_string(self.xa);
			let xb = resolver.variable_to_string(self.xb);
			sbb.write_str(&format!(" + {qm}⋅({xa}×{xb})"));
		}
		sbb.write_str(" + ");
		sbb.write_str(&resolver.coeff_to_string(self.qc));
		sbb.write_str(" == 0");
		sbb.finish()
	}
}
