// Copyright 2024-2025 Irreducible Inc.

//! De-duplicated table of the field constants referenced by constraints.

use std::collections::HashMap;

use zkc_field::Field;

use crate::term::{Term, WireId};

/// Index into a [`CoeffTable`].
pub type CoeffId = u32;

pub const COEFF_ID_ZERO: CoeffId = 0;
pub const COEFF_ID_ONE: CoeffId = 1;
pub const COEFF_ID_TWO: CoeffId = 2;
pub const COEFF_ID_MINUS_ONE: CoeffId = 3;
pub const COEFF_ID_MINUS_TWO: CoeffId = 4;

/// Number of constants every table starts with.
pub const NB_RESERVED_COEFFS: usize = 5;

/// The reserved constants `[0, 1, 2, -1, -2]`, in id order.
pub fn reserved_coeffs<F: Field>() -> [F; NB_RESERVED_COEFFS] {
	let two = F::from_u64(2);
	[F::zero(), F::one(), two, -F::one(), -two]
}

/// Append-only table of unique coefficients.
///
/// Ids `0..5` always hold `0, 1, 2, -1, -2`. Ids are stable for the lifetime of the table.
#[derive(Debug, Clone)]
pub struct CoeffTable<F: Field> {
	coefficients: Vec<F>,
	ids: HashMap<F, CoeffId>,
	reserved: [F; NB_RESERVED_COEFFS],
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
	#[error("coefficient table must start with [0, 1, 2, -1, -2], mismatch at id {id}")]
	ReservedMismatch { id: CoeffId },
	#[error("coefficient {value} is registered twice (ids {first} and {second})")]
	Duplicate {
		value: String,
		first: CoeffId,
		second: CoeffId,
	},
}

impl<F: Field> Default for CoeffTable<F> {
	fn default() -> Self {
		Self::new(0)
	}
}

impl<F: Field> CoeffTable<F> {
	/// Creates a table with room for `capacity` non-reserved coefficients.
	pub fn new(capacity: usize) -> Self {
		let reserved = reserved_coeffs::<F>();
		let mut coefficients = Vec::with_capacity(NB_RESERVED_COEFFS + capacity);
		coefficients.extend_from_slice(&reserved);
		Self {
			coefficients,
			ids: HashMap::with_capacity(capacity),
			reserved,
		}
	}

	/// Rebuilds a table from its persisted coefficient sequence.
	pub fn from_coefficients(coefficients: Vec<F>) -> Result<Self, Error> {
		let reserved = reserved_coeffs::<F>();
		for (id, expected) in reserved.iter().enumerate() {
			if coefficients.get(id) != Some(expected) {
				return Err(Error::ReservedMismatch { id: id as CoeffId });
			}
		}

		let mut ids = HashMap::with_capacity(coefficients.len() - NB_RESERVED_COEFFS);
		for (id, value) in coefficients.iter().enumerate().skip(NB_RESERVED_COEFFS) {
			let id = id as CoeffId;
			let first = reserved
				.iter()
				.position(|r| r == value)
				.map(|pos| pos as CoeffId)
				.or_else(|| ids.insert(*value, id));
			if let Some(first) = first {
				return Err(Error::Duplicate {
					value: value.to_decimal_string(),
					first,
					second: id,
				});
			}
		}

		Ok(Self {
			coefficients,
			ids,
			reserved,
		})
	}

	/// Returns the id of `coeff`, registering it first if it is new.
	pub fn add_coeff(&mut self, coeff: F) -> CoeffId {
		if coeff.is_zero() {
			return COEFF_ID_ZERO;
		}
		if coeff.is_one() {
			return COEFF_ID_ONE;
		}
		if coeff == self.reserved[COEFF_ID_TWO as usize] {
			return COEFF_ID_TWO;
		}
		if coeff == self.reserved[COEFF_ID_MINUS_ONE as usize] {
			return COEFF_ID_MINUS_ONE;
		}
		if coeff == self.reserved[COEFF_ID_MINUS_TWO as usize] {
			return COEFF_ID_MINUS_TWO;
		}

		let next_id = self.coefficients.len() as CoeffId;
		let coefficients = &mut self.coefficients;
		*self.ids.entry(coeff).or_insert_with(|| {
			coefficients.push(coeff);
			next_id
		})
	}

	pub fn make_term(&mut self, coeff: F, wire: WireId) -> Term {
		Term::new(self.add_coeff(coeff), wire)
	}

	pub fn get(&self, id: CoeffId) -> Option<&F> {
		self.coefficients.get(id as usize)
	}

	pub fn coeff_to_string(&self, id: CoeffId) -> String {
		match self.get(id) {
			Some(value) => value.to_decimal_string(),
			None => format!("<coeff #{id}>"),
		}
	}

	pub fn coefficients(&self) -> &[F] {
		&self.coefficients
	}

	pub fn len(&self) -> usize {
		self.coefficients.len()
	}

	/// Always `false`: the reserved constants are present from construction.
	pub fn is_empty(&self) -> bool {
		self.coefficients.is_empty()
	}
}
