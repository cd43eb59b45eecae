// Copyright 2024-2025 Irreducible Inc.

//! Vectors produced by a successful solve.

use bytes::{Buf, BufMut};
use zkc_field::{
	serialization::{deserialize_elements, serialize_elements},
	Field,
};
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use crate::{constraint::SparseR1C, system::SystemKind};

/// A full assignment `w` of an R1CS system, with the per-constraint evaluations `a = L⋅w`,
/// `b = R⋅w` and `c = O⋅w`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct R1csSolution<F: Field> {
	pub w: Vec<F>,
	pub a: Vec<F>,
	pub b: Vec<F>,
	pub c: Vec<F>,
}

/// A full assignment `w` of a sparse R1CS system, with the wire values of the gate operands.
///
/// Row `i < nb_public` holds `(w[i], w[0], w[0])`; the following rows hold `(w[xa], w[xb], w[xc])`
/// of each gate. The columns are padded to the next power of two with `w[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseR1csSolution<F: Field> {
	pub w: Vec<F>,
	pub l: Vec<F>,
	pub r: Vec<F>,
	pub o: Vec<F>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverOutput<F: Field> {
	R1cs(R1csSolution<F>),
	SparseR1cs(SparseR1csSolution<F>),
}

impl<F: Field> SolverOutput<F> {
	pub fn kind(&self) -> SystemKind {
		match self {
			Self::R1cs(_) => SystemKind::R1cs,
			Self::SparseR1cs(_) => SystemKind::SparseR1cs,
		}
	}

	/// Values of every wire, laid out as `[public | secret | internal]`.
	pub fn witness(&self) -> &[F] {
		match self {
			Self::R1cs(solution) => &solution.w,
			Self::SparseR1cs(solution) => &solution.w,
		}
	}

	pub fn into_witness(self) -> Vec<F> {
		match self {
			Self::R1cs(solution) => solution.w,
			Self::SparseR1cs(solution) => solution.w,
		}
	}
}

impl<F: Field> SparseR1csSolution<F> {
	pub(super) fn new(w: Vec<F>, nb_public: usize, constraints: &[SparseR1C]) -> Self {
		let nb_rows = (nb_public + constraints.len()).next_power_of_two();
		let pad = w.first().copied().unwrap_or_else(F::zero);
		let value = |wire: u32| w.get(wire as usize).copied().unwrap_or(pad);

		let mut l = Vec::with_capacity(nb_rows);
		let mut r = Vec::with_capacity(nb_rows);
		let mut o = Vec::with_capacity(nb_rows);
		for &public in &w[..nb_public.min(w.len())] {
			l.push(public);
			r.push(pad);
			o.push(pad);
		}
		for c in constraints {
			l.push(value(c.xa));
			r.push(value(c.xb));
			o.push(value(c.xc));
		}
		l.resize(nb_rows, pad);
		r.resize(nb_rows, pad);
		o.resize(nb_rows, pad);

		Self { w, l, r, o }
	}
}

impl<F: Field> SerializeBytes for R1csSolution<F> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		serialize_elements(&self.w, &mut write_buf)?;
		serialize_elements(&self.a, &mut write_buf)?;
		serialize_elements(&self.b, &mut write_buf)?;
		serialize_elements(&self.c, write_buf)
	}
}

impl<F: Field> DeserializeBytes for R1csSolution<F> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			w: deserialize_elements(&mut read_buf)?,
			a: deserialize_elements(&mut read_buf)?,
			b: deserialize_elements(&mut read_buf)?,
			c: deserialize_elements(read_buf)?,
		})
	}
}

impl<F: Field> SerializeBytes for SparseR1csSolution<F> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		serialize_elements(&self.w, &mut write_buf)?;
		serialize_elements(&self.l, &mut write_buf)?;
		serialize_elements(&self.r, &mut write_buf)?;
		serialize_elements(&self.o, write_buf)
	}
}

impl<F: Field> DeserializeBytes for SparseR1csSolution<F> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			w: deserialize_elements(&mut read_buf)?,
			l: deserialize_elements(&mut read_buf)?,
			r: deserialize_elements(&mut read_buf)?,
			o: deserialize_elements(read_buf)?,
		})
	}
}
