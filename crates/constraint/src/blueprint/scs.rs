// Copyright 2024-2025 Irreducible Inc.

use zkc_field::Field;

use super::{Blueprint, Error, WireSolver};
use crate::{
	coeff::{COEFF_ID_MINUS_ONE, COEFF_ID_ZERO},
	constraint::{CommitmentConstraint, SparseR1C},
};

pub(super) const GENERIC_LEN: usize = 9;
pub(super) const MUL_LEN: usize = 4;
pub(super) const ADD_LEN: usize = 6;
pub(super) const BOOL_LEN: usize = 3;

fn malformed(blueprint: Blueprint) -> Error {
	Error::MalformedCallData {
		blueprint,
		reason: "unexpected number of words",
	}
}

fn shape_mismatch(blueprint: Blueprint, reason: &'static str) -> Error {
	Error::ShapeMismatch { blueprint, reason }
}

pub(super) fn compress_generic(c: &SparseR1C, out: &mut Vec<u32>) {
	out.extend_from_slice(&[
		c.xa,
		c.xb,
		c.xc,
		c.ql,
		c.qr,
		c.qo,
		c.qm,
		c.qc,
		c.commitment as u32,
	]);
}

pub(super) fn decompress_generic(call_data: &[u32], c: &mut SparseR1C) -> Result<(), Error> {
	c.clear();
	let &[xa, xb, xc, ql, qr, qo, qm, qc, commitment] = call_data else {
		return Err(malformed(Blueprint::GenericSparseR1C));
	};
	let commitment =
		CommitmentConstraint::try_from(commitment).map_err(|_| Error::MalformedCallData {
			blueprint: Blueprint::GenericSparseR1C,
			reason: "unknown commitment tag",
		})?;
	*c = SparseR1C {
		xa,
		xb,
		xc,
		ql,
		qr,
		qo,
		qm,
		qc,
		commitment,
	};
	Ok(())
}

/// The output coefficient is implied to be `-1` and is not stored.
pub(super) fn compress_mul(c: &SparseR1C, out: &mut Vec<u32>) -> Result<(), Error> {
	let blueprint = Blueprint::SparseR1CMul;
	if c.ql != COEFF_ID_ZERO || c.qr != COEFF_ID_ZERO || c.qc != COEFF_ID_ZERO {
		return Err(shape_mismatch(blueprint, "only the multiplicative term may be set"));
	}
	if c.qo != COEFF_ID_MINUS_ONE && c.qo != COEFF_ID_ZERO {
		return Err(shape_mismatch(blueprint, "output coefficient must be -1"));
	}
	if c.commitment != CommitmentConstraint::Not {
		return Err(shape_mismatch(blueprint, "commitment gates need the generic encoding"));
	}
	out.extend_from_slice(&[c.qm, c.xa, c.xb, c.xc]);
	Ok(())
}

pub(super) fn decompress_mul(call_data: &[u32], c: &mut SparseR1C) -> Result<(), Error> {
	c.clear();
	let &[qm, xa, xb, xc] = call_data else {
		return Err(malformed(Blueprint::SparseR1CMul));
	};
	c.qm = qm;
	c.xa = xa;
	c.xb = xb;
	c.xc = xc;
	c.qo = COEFF_ID_MINUS_ONE;
	Ok(())
}

pub(super) fn compress_add(c: &SparseR1C, out: &mut Vec<u32>) -> Result<(), Error> {
	let blueprint = Blueprint::SparseR1CAdd;
	if c.qm != COEFF_ID_ZERO {
		return Err(shape_mismatch(blueprint, "multiplicative term must be zero"));
	}
	if c.qo != COEFF_ID_MINUS_ONE {
		return Err(shape_mismatch(blueprint, "output coefficient must be -1"));
	}
	if c.commitment != CommitmentConstraint::Not {
		return Err(shape_mismatch(blueprint, "commitment gates need the generic encoding"));
	}
	out.extend_from_slice(&[c.xa, c.xb, c.xc, c.ql, c.qr, c.qc]);
	Ok(())
}

pub(super) fn decompress_add(call_data: &[u32], c: &mut SparseR1C) -> Result<(), Error> {
	c.clear();
	let &[xa, xb, xc, ql, qr, qc] = call_data else {
		return Err(malformed(Blueprint::SparseR1CAdd));
	};
	*c = SparseR1C {
		xa,
		xb,
		xc,
		ql,
		qr,
		qo: COEFF_ID_MINUS_ONE,
		qc,
		..Default::default()
	};
	Ok(())
}

pub(super) fn compress_bool(c: &SparseR1C, out: &mut Vec<u32>) -> Result<(), Error> {
	let blueprint = Blueprint::SparseR1CBool;
	if c.qr != COEFF_ID_ZERO || c.qo != COEFF_ID_ZERO || c.qc != COEFF_ID_ZERO {
		return Err(shape_mismatch(blueprint, "only qL and qM may be set"));
	}
	if c.qm != COEFF_ID_ZERO && c.xb != c.xa {
		return Err(shape_mismatch(blueprint, "multiplicative term must square xa"));
	}
	if c.commitment != CommitmentConstraint::Not {
		return Err(shape_mismatch(blueprint, "commitment gates need the generic encoding"));
	}
	out.extend_from_slice(&[c.xa, c.ql, c.qm]);
	Ok(())
}

pub(super) fn decompress_bool(call_data: &[u32], c: &mut SparseR1C) -> Result<(), Error> {
	c.clear();
	let &[xa, ql, qm] = call_data else {
		return Err(malformed(Blueprint::SparseR1CBool));
	};
	*c = SparseR1C {
		xa,
		xb: xa,
		xc: xa,
		ql,
		qm,
		..Default::default()
	};
	Ok(())
}

/// `xc = qM⋅xa⋅xb`, or a check of that relation when `xc` is already known.
pub(super) fn solve_mul<F: Field, S: WireSolver<F>>(solver: &S, call_data: &[u32]) -> Result<(), S::Error> {
	let &[qm, xa, xb, xc] = call_data else {
		return Err(malformed(Blueprint::SparseR1CMul).into());
	};
	let product = solver.coeff(qm)? * solver.value(xa)? * solver.value(xb)?;
	assign_or_check(solver, xc, product)
}

/// `xc = qL⋅xa + qR⋅xb + qC`, or a check of that relation when `xc` is already known.
pub(super) fn solve_add<F: Field, S: WireSolver<F>>(solver: &S, call_data: &[u32]) -> Result<(), S::Error> {
	let &[xa, xb, xc, ql, qr, qc] = call_data else {
		return Err(malformed(Blueprint::SparseR1CAdd).into());
	};
	let sum = solver.coeff(ql)? * solver.value(xa)?
		+ solver.coeff(qr)? * solver.value(xb)?
		+ solver.coeff(qc)?;
	assign_or_check(solver, xc, sum)
}

pub(super) fn solve_bool<F: Field, S: WireSolver<F>>(solver: &S, call_data: &[u32]) -> Result<(), S::Error> {
	let &[xa, ql, qm] = call_data else {
		return Err(malformed(Blueprint::SparseR1CBool).into());
	};
	let x = solver.value(xa)?;
	let lhs = solver.coeff(ql)? * x + solver.coeff(qm)? * x * x;
	solver.check_equal(lhs, F::zero())
}

fn assign_or_check<F: Field, S: WireSolver<F>>(solver: &S, wire: u32, value: F) -> Result<(), S::Error> {
	if solver.is_solved(wire)? {
		solver.check_equal(value, solver.value(wire)?)
	} else {
		solver.set_value(wire, value)
	}
}
