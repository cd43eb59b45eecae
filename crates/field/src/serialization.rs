// Copyright 2024-2025 Irreducible Inc.

//! Fixed-width canonical encoding of field elements.

use bytes::{Buf, BufMut};
use num_bigint::BigUint;
use zkc_utils::serialization::{
	assert_enough_data_for, assert_enough_space_for, SerializationError, SerializeBytes,
	DeserializeBytes,
};

use crate::Field;

/// Writes `value` as exactly [`Field::byte_len`] little-endian bytes.
pub fn serialize_element<F: Field>(
	value: &F,
	mut write_buf: impl BufMut,
) -> Result<(), SerializationError> {
	let len = F::byte_len();
	assert_enough_space_for(&write_buf, len)?;

	let mut bytes = value.to_biguint().to_bytes_le();
	bytes.resize(len, 0);
	write_buf.put_slice(&bytes);
	Ok(())
}

/// Reads one element written by [`serialize_element`], rejecting non-canonical encodings.
pub fn deserialize_element<F: Field>(mut read_buf: impl Buf) -> Result<F, SerializationError> {
	let len = F::byte_len();
	assert_enough_data_for(&read_buf, len)?;

	let mut bytes = vec![0u8; len];
	read_buf.copy_to_slice(&mut bytes);
	let value = BigUint::from_bytes_le(&bytes);
	if value >= F::modulus() {
		return Err(SerializationError::InvalidConstruction {
			name: "Field::canonical",
		});
	}
	Ok(F::from_biguint(&value))
}

pub fn serialize_elements<F: Field>(
	values: &[F],
	mut write_buf: impl BufMut,
) -> Result<(), SerializationError> {
	values.len().serialize(&mut write_buf)?;
	values
		.iter()
		.try_for_each(|value| serialize_element(value, &mut write_buf))
}

pub fn deserialize_elements<F: Field>(mut read_buf: impl Buf) -> Result<Vec<F>, SerializationError> {
	let len = usize::deserialize(&mut read_buf)?;
	let max_len = read_buf.remaining() / F::byte_len();
	if len > max_len {
		return Err(SerializationError::NotEnoughBytes);
	}
	(0..len)
		.map(|_| deserialize_element(&mut read_buf))
		.collect()
}

/// Writes the modulus of `F`, used as a header guarding against decoding into the wrong field.
pub fn serialize_modulus<F: Field>(write_buf: impl BufMut) -> Result<(), SerializationError> {
	F::modulus().to_bytes_le().serialize(write_buf)
}

/// Reads a modulus written by [`serialize_modulus`] and checks it matches `F`.
pub fn check_modulus<F: Field>(read_buf: impl Buf) -> Result<(), SerializationError> {
	let bytes = Vec::<u8>::deserialize(read_buf)?;
	if BigUint::from_bytes_le(&bytes) != F::modulus() {
		return Err(SerializationError::InvalidConstruction {
			name: "Field::modulus",
		});
	}
	Ok(())
}
