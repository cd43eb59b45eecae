// Copyright 2024-2025 Irreducible Inc.

//! Solve-time wire values.

use std::sync::{
	atomic::{AtomicUsize, Ordering},
	OnceLock,
};

use zkc_field::Field;
use zkc_utils::bail;

use super::error::{Error, FatalError};
use crate::{
	coeff::{CoeffId, COEFF_ID_MINUS_ONE, COEFF_ID_ONE, COEFF_ID_TWO, COEFF_ID_ZERO},
	system::{is_constant_term, SystemKind},
	term::{Term, WireId},
};

/// Placeholder rendered for expressions that read unsolved wires.
pub const UNSOLVED_VARIABLE: &str = "<unsolved>";

/// Write-once wire values shared by all workers of one solve.
///
/// Leveling guarantees no two instructions of a level write the same wire and none reads a wire
/// written in its own level; the write-once slots turn a violation of that guarantee into
/// [`FatalError::WireSolvedTwice`] instead of a data race.
#[derive(Debug)]
pub(crate) struct Solution<'a, F: Field> {
	values: Vec<OnceLock<F>>,
	nb_solved: AtomicUsize,
	coefficients: &'a [F],
	kind: SystemKind,
}

impl<'a, F: Field> Solution<'a, F> {
	pub fn new(nb_wires: usize, coefficients: &'a [F], kind: SystemKind) -> Self {
		Self {
			values: (0..nb_wires).map(|_| OnceLock::new()).collect(),
			nb_solved: AtomicUsize::new(0),
			coefficients,
			kind,
		}
	}

	pub fn nb_wires(&self) -> usize {
		self.values.len()
	}

	pub fn nb_solved(&self) -> usize {
		self.nb_solved.load(Ordering::Acquire)
	}

	fn slot(&self, wire: WireId) -> Result<&OnceLock<F>, Error> {
		match self.values.get(wire as usize) {
			Some(slot) => Ok(slot),
			None => Err(FatalError::WireOutOfRange {
				wire,
				nb_wires: self.values.len(),
			}
			.into()),
		}
	}

	pub fn set(&self, wire: WireId, value: F) -> Result<(), Error> {
		if self.slot(wire)?.set(value).is_err() {
			bail!(FatalError::WireSolvedTwice { wire });
		}
		self.nb_solved.fetch_add(1, Ordering::AcqRel);
		Ok(())
	}

	pub fn is_solved(&self, wire: WireId) -> Result<bool, Error> {
		Ok(self.slot(wire)?.get().is_some())
	}

	pub fn get(&self, wire: WireId) -> Option<F> {
		self.values.get(wire as usize).and_then(|slot| slot.get().copied())
	}

	/// The value of a solved wire.
	pub fn value(&self, wire: WireId) -> Result<F, Error> {
		match self.slot(wire)?.get() {
			Some(value) => Ok(*value),
			None => Err(FatalError::UnsolvedWire { wire }.into()),
		}
	}

	pub fn coeff(&self, id: CoeffId) -> Result<F, Error> {
		match self.coefficients.get(id as usize) {
			Some(coeff) => Ok(*coeff),
			None => Err(FatalError::CoeffOutOfRange { coeff: id }.into()),
		}
	}

	/// `coeff * value` of a term over a solved wire.
	pub fn compute_term(&self, term: &Term) -> Result<F, Error> {
		if term.coeff == COEFF_ID_ZERO {
			return Ok(F::zero());
		}
		let value = self.value(term.wire)?;
		Ok(match term.coeff {
			COEFF_ID_ONE => value,
			COEFF_ID_TWO => value.double(),
			COEFF_ID_MINUS_ONE => -value,
			coeff => self.coeff(coeff)? * value,
		})
	}

	pub fn accumulate_into(&self, term: &Term, acc: &mut F) -> Result<(), Error> {
		*acc += self.compute_term(term)?;
		Ok(())
	}

	/// Evaluates `expr`, or returns `None` if it reads an unsolved wire. Constant terms are
	/// read from the coefficient table directly.
	pub fn try_eval(&self, expr: &[Term]) -> Result<Option<F>, Error> {
		let mut acc = F::zero();
		for term in expr {
			if is_constant_term(self.kind, term) {
				acc += self.coeff(term.coeff)?;
				continue;
			}
			if term.coeff != COEFF_ID_ZERO && self.get(term.wire).is_none() {
				return Ok(None);
			}
			self.accumulate_into(term, &mut acc)?;
		}
		Ok(Some(acc))
	}

	/// Decimal rendering of `expr` for diagnostics, never failing.
	pub fn log_value(&self, expr: &[Term]) -> String {
		match self.try_eval(expr) {
			Ok(Some(value)) => value.to_decimal_string(),
			Ok(None) | Err(_) => UNSOLVED_VARIABLE.to_string(),
		}
	}

	/// Consumes the solution, checking every wire was solved.
	pub fn into_values(self) -> Result<Vec<F>, Error> {
		let nb_wires = self.values.len();
		let nb_solved = self.nb_solved.into_inner();
		let values = self
			.values
			.into_iter()
			.map(OnceLock::into_inner)
			.collect::<Option<Vec<_>>>();
		match values {
			Some(values) if nb_solved == nb_wires => Ok(values),
			_ => Err(FatalError::IncompleteSolution {
				nb_solved,
				nb_wires,
			}
			.into()),
		}
	}
}

/// Divides a solved term value by the term's coefficient, yielding the wire value.
pub(crate) fn div_by_coeff<F: Field>(value: F, coeff_id: CoeffId, coeff: F) -> Result<F, Error> {
	match coeff_id {
		COEFF_ID_ONE => Ok(value),
		COEFF_ID_MINUS_ONE => Ok(-value),
		COEFF_ID_ZERO => Err(FatalError::DivisionByZeroCoefficient.into()),
		_ => match coeff.inverse() {
			Some(inverse) => Ok(value * inverse),
			None => Err(FatalError::DivisionByZeroCoefficient.into()),
		},
	}
}
