// Copyright 2024-2025 Irreducible Inc.

use std::fmt::Debug;

use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;

/// Prime field element as seen by the constraint system.
///
/// The arithmetic itself (`+`, `-`, `*`, `neg`, `inverse`, `double`, `is_zero`, `is_one`, equality)
/// comes from [`ark_ff::PrimeField`]; this trait adds the conversions the constraint system needs
/// around it: big-integer round trips for hint functions, small signed constants for the
/// coefficient table and a canonical decimal rendering for diagnostics.
pub trait Field: PrimeField + Debug {
	/// Number of bytes of the canonical little-endian encoding.
	fn byte_len() -> usize {
		(Self::MODULUS_BIT_SIZE as usize).div_ceil(8)
	}

	/// The field modulus as a big integer.
	fn modulus() -> BigUint {
		BigUint::from_bytes_le(&Self::MODULUS.to_bytes_le())
	}

	/// Reduces `value` modulo the field characteristic.
	fn from_biguint(value: &BigUint) -> Self {
		Self::from_le_bytes_mod_order(&value.to_bytes_le())
	}

	/// Canonical (fully reduced) integer representative.
	fn to_biguint(&self) -> BigUint {
		BigUint::from_bytes_le(&self.into_bigint().to_bytes_le())
	}

	fn from_u64(value: u64) -> Self {
		Self::from(value)
	}

	fn from_i64(value: i64) -> Self {
		let magnitude = Self::from(value.unsigned_abs());
		if value < 0 {
			-magnitude
		} else {
			magnitude
		}
	}

	/// Base-10 rendering of the canonical representative; zero renders as `"0"`.
	fn to_decimal_string(&self) -> String {
		self.to_biguint().to_str_radix(10)
	}
}

impl<F: PrimeField + Debug> Field for F {}
