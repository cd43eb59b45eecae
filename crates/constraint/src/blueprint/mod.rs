// Copyright 2024-2025 Irreducible Inc.

//! Compressed encodings of constraints and hints.
//!
//! Every instruction of a [`System`](crate::system::System) stores its operands as a contiguous
//! range of `u32` words in a shared call data buffer. A [`Blueprint`] names the layout of that
//! range and knows how to pack a constraint into it and unpack it again. Some blueprints also
//! know a closed form for the value they define and can be solved without going through the
//! generic constraint solving path.

mod error;
mod hint;
mod r1c;
mod scs;
#[cfg(test)]
mod tests;

use bytes::{Buf, BufMut};
pub use error::{Capability, Error};
use zkc_field::Field;
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use crate::{
	coeff::CoeffId,
	constraint::{SparseR1C, R1C},
	hint::HintMapping,
	term::WireId,
};

/// Index of a blueprint in the registry of a constraint system.
pub type BlueprintId = u32;

/// Which decoded shape an instruction produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlueprintKind {
	R1C,
	SparseR1C,
	Hint,
}

/// The closed set of instruction encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blueprint {
	/// `[total, len(L), len(R), (coeff, wire)×len(L), (coeff, wire)×len(R), (coeff, wire)×len(O)]`
	GenericR1C,
	/// `[XA, XB, XC, QL, QR, QO, QM, QC, commitment]`
	GenericSparseR1C,
	/// `[QM, XA, XB, XC]` encoding `qM⋅xa⋅xb - xc == 0`.
	SparseR1CMul,
	/// `[XA, XB, XC, QL, QR, QC]` encoding `qL⋅xa + qR⋅xb + qC - xc == 0`.
	SparseR1CAdd,
	/// `[XA, QL, QM]` encoding `qL⋅xa + qM⋅xa⋅xa == 0`.
	SparseR1CBool,
	/// `[total, hint id, nb inputs, (len, (coeff, wire)×len)×nb inputs, output wire×nb outputs]`
	GenericHint,
}

/// Access to the solution for blueprints that solve their own instructions.
pub trait WireSolver<F: Field> {
	type Error: From<Error>;

	fn coeff(&self, id: CoeffId) -> Result<F, Self::Error>;

	fn is_solved(&self, wire: WireId) -> Result<bool, Self::Error>;

	/// The value of a wire that must already be solved.
	fn value(&self, wire: WireId) -> Result<F, Self::Error>;

	fn set_value(&self, wire: WireId, value: F) -> Result<(), Self::Error>;

	/// Fails the current constraint unless `lhs == rhs`.
	fn check_equal(&self, lhs: F, rhs: F) -> Result<(), Self::Error>;
}

impl Blueprint {
	pub const ALL: [Self; 6] = [
		Self::GenericR1C,
		Self::GenericSparseR1C,
		Self::SparseR1CMul,
		Self::SparseR1CAdd,
		Self::SparseR1CBool,
		Self::GenericHint,
	];

	pub const fn kind(self) -> BlueprintKind {
		match self {
			Self::GenericR1C => BlueprintKind::R1C,
			Self::GenericSparseR1C
			| Self::SparseR1CMul
			| Self::SparseR1CAdd
			| Self::SparseR1CBool => BlueprintKind::SparseR1C,
			Self::GenericHint => BlueprintKind::Hint,
		}
	}

	/// Fixed number of call data words per instruction, or `None` when the first word of the
	/// range holds the total length.
	pub const fn nb_inputs(self) -> Option<usize> {
		match self {
			Self::GenericR1C | Self::GenericHint => None,
			Self::GenericSparseR1C => Some(scs::GENERIC_LEN),
			Self::SparseR1CMul => Some(scs::MUL_LEN),
			Self::SparseR1CAdd => Some(scs::ADD_LEN),
			Self::SparseR1CBool => Some(scs::BOOL_LEN),
		}
	}

	/// Number of constraints one instruction stands for.
	pub const fn nb_constraints(self) -> usize {
		match self.kind() {
			BlueprintKind::Hint => 0,
			BlueprintKind::R1C | BlueprintKind::SparseR1C => 1,
		}
	}

	/// Whether [`Blueprint::solve`] is available.
	pub const fn is_solvable(self) -> bool {
		matches!(self, Self::SparseR1CMul | Self::SparseR1CAdd | Self::SparseR1CBool)
	}

	/// Length of the call data range of an instruction starting at `call_data[0]`.
	pub fn call_data_len(self, call_data: &[u32]) -> Result<usize, Error> {
		let len = match self.nb_inputs() {
			Some(len) => len,
			None => match call_data.first() {
				Some(&total) => total as usize,
				None => return Err(self.malformed("missing length prefix")),
			},
		};
		if len == 0 || len > call_data.len() {
			return Err(self.malformed("range exceeds the call data buffer"));
		}
		Ok(len)
	}

	/// Appends the encoding of `c` to `out`.
	pub fn compress_r1c(self, c: &R1C, out: &mut Vec<u32>) -> Result<(), Error> {
		match self {
			Self::GenericR1C => r1c::compress(c, out),
			_ => Err(self.unsupported(Capability::R1C)),
		}
	}

	/// Decodes the range `call_data` of one instruction into `c`, overwriting it.
	pub fn decompress_r1c(self, call_data: &[u32], c: &mut R1C) -> Result<(), Error> {
		match self {
			Self::GenericR1C => r1c::decompress(call_data, c),
			_ => Err(self.unsupported(Capability::R1C)),
		}
	}

	pub fn compress_sparse_r1c(self, c: &SparseR1C, out: &mut Vec<u32>) -> Result<(), Error> {
		match self {
			Self::GenericSparseR1C => {
				scs::compress_generic(c, out);
				Ok(())
			}
			Self::SparseR1CMul => scs::compress_mul(c, out),
			Self::SparseR1CAdd => scs::compress_add(c, out),
			Self::SparseR1CBool => scs::compress_bool(c, out),
			_ => Err(self.unsupported(Capability::SparseR1C)),
		}
	}

	pub fn decompress_sparse_r1c(self, call_data: &[u32], c: &mut SparseR1C) -> Result<(), Error> {
		match self {
			Self::GenericSparseR1C => scs::decompress_generic(call_data, c),
			Self::SparseR1CMul => scs::decompress_mul(call_data, c),
			Self::SparseR1CAdd => scs::decompress_add(call_data, c),
			Self::SparseR1CBool => scs::decompress_bool(call_data, c),
			_ => Err(self.unsupported(Capability::SparseR1C)),
		}
	}

	pub fn compress_hint(self, h: &HintMapping, out: &mut Vec<u32>) -> Result<(), Error> {
		match self {
			Self::GenericHint => hint::compress(h, out),
			_ => Err(self.unsupported(Capability::Hint)),
		}
	}

	pub fn decompress_hint(self, call_data: &[u32], h: &mut HintMapping) -> Result<(), Error> {
		match self {
			Self::GenericHint => hint::decompress(call_data, h),
			_ => Err(self.unsupported(Capability::Hint)),
		}
	}

	/// Solves (or checks) one instruction directly from its call data.
	pub fn solve<F: Field, S: WireSolver<F>>(self, solver: &S, call_data: &[u32]) -> Result<(), S::Error> {
		match self {
			Self::SparseR1CMul => scs::solve_mul(solver, call_data),
			Self::SparseR1CAdd => scs::solve_add(solver, call_data),
			Self::SparseR1CBool => scs::solve_bool(solver, call_data),
			_ => Err(self.unsupported(Capability::Solve).into()),
		}
	}

	fn unsupported(self, capability: Capability) -> Error {
		Error::Unsupported {
			blueprint: self,
			capability,
		}
	}

	fn malformed(self, reason: &'static str) -> Error {
		Error::MalformedCallData {
			blueprint: self,
			reason,
		}
	}

	fn tag(self) -> u8 {
		match self {
			Self::GenericR1C => 0,
			Self::GenericSparseR1C => 1,
			Self::SparseR1CMul => 2,
			Self::SparseR1CAdd => 3,
			Self::SparseR1CBool => 4,
			Self::GenericHint => 5,
		}
	}
}

/// Converts a length to a call data word.
fn word(blueprint: Blueprint, value: usize) -> Result<u32, Error> {
	u32::try_from(value).map_err(|_| Error::WordOverflow { blueprint, value })
}

impl SerializeBytes for Blueprint {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.tag().serialize(write_buf)
	}
}

impl DeserializeBytes for Blueprint {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		let index = u8::deserialize(read_buf)?;
		Self::ALL
			.into_iter()
			.find(|blueprint| blueprint.tag() == index)
			.ok_or(SerializationError::UnknownEnumVariant {
				name: "Blueprint",
				index,
			})
	}
}
