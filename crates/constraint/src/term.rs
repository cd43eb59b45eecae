// Copyright 2024-2025 Irreducible Inc.

//! Terms and linear expressions over wires.

use bytes::{Buf, BufMut};
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use crate::coeff::{CoeffId, COEFF_ID_ONE, COEFF_ID_ZERO};

/// Index of a variable slot in the witness vector.
pub type WireId = u32;

/// The wire fixed to the value one in R1CS systems.
///
/// A term on this wire evaluates to its coefficient. Sparse R1CS systems have no such wire and
/// wire 0 is simply their first public input.
pub const ONE_WIRE: WireId = 0;

/// A scaled wire: `coefficients[coeff] * values[wire]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Term {
	pub coeff: CoeffId,
	pub wire: WireId,
}

impl Term {
	pub const fn new(coeff: CoeffId, wire: WireId) -> Self {
		Self { coeff, wire }
	}

	/// A term with coefficient one.
	pub const fn wire(wire: WireId) -> Self {
		Self::new(COEFF_ID_ONE, wire)
	}

	/// Whether the term addresses [`ONE_WIRE`], i.e. is a literal coefficient in R1CS systems.
	pub const fn is_constant(&self) -> bool {
		self.wire == ONE_WIRE
	}

	pub const fn is_zero(&self) -> bool {
		self.coeff == COEFF_ID_ZERO
	}
}

/// A sum of terms. The order does not affect the value but is preserved by the encoding.
pub type LinearExpression = Vec<Term>;

impl SerializeBytes for Term {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.coeff.serialize(&mut write_buf)?;
		self.wire.serialize(write_buf)
	}
}

impl DeserializeBytes for Term {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let coeff = CoeffId::deserialize(&mut read_buf)?;
		let wire = WireId::deserialize(read_buf)?;
		Ok(Self { coeff, wire })
	}
}
