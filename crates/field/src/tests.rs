// Copyright 2024-2025 Irreducible Inc.

use ark_ff::Field as _;
use num_bigint::BigUint;
use proptest::prelude::*;

use crate::{
	serialization::{
		check_modulus, deserialize_element, deserialize_elements, serialize_element,
		serialize_elements, serialize_modulus,
	},
	Bn254Fr, Field, One, TinyField, Zero,
};

#[test]
fn test_tiny_field_constants() {
	assert_eq!(TinyField::modulus(), BigUint::from(47u32));
	assert_eq!(TinyField::byte_len(), 1);
	assert_eq!(TinyField::from_i64(-1), TinyField::from_u64(46));
	assert_eq!(TinyField::from_i64(-2).to_decimal_string(), "45");
	assert_eq!(TinyField::zero().to_decimal_string(), "0");
	assert!(TinyField::from_u64(48).is_one());
}

#[test]
fn test_bn254_decimal_rendering() {
	assert_eq!(Bn254Fr::byte_len(), 32);
	assert_eq!(Bn254Fr::from_u64(10).to_decimal_string(), "10");
	let minus_one = Bn254Fr::from_i64(-1);
	assert_eq!(minus_one.to_biguint() + 1u32, Bn254Fr::modulus());
}

#[test]
fn test_from_biguint_reduces() {
	let value = Bn254Fr::modulus() + BigUint::from(5u32);
	assert_eq!(Bn254Fr::from_biguint(&value), Bn254Fr::from_u64(5));
}

#[test]
fn test_non_canonical_encoding_rejected() {
	let buf = [47u8];
	assert!(deserialize_element::<TinyField>(&mut buf.as_slice()).is_err());
	let buf = [46u8];
	assert_eq!(deserialize_element::<TinyField>(&mut buf.as_slice()).unwrap(), TinyField::from_i64(-1));
}

#[test]
fn test_modulus_header() {
	let mut buf = Vec::new();
	serialize_modulus::<Bn254Fr>(&mut buf).unwrap();
	check_modulus::<Bn254Fr>(&mut buf.as_slice()).unwrap();
	assert!(check_modulus::<TinyField>(&mut buf.as_slice()).is_err());
}

proptest! {
	#[test]
	fn test_element_encoding(values in prop::collection::vec(any::<u64>(), 0..16)) {
		let values = values.into_iter().map(Bn254Fr::from_u64).collect::<Vec<_>>();
		let mut buf = Vec::new();
		serialize_elements(&values, &mut buf).unwrap();
		prop_assert_eq!(buf.len(), 4 + 32 * values.len());
		let decoded = deserialize_elements::<Bn254Fr>(&mut buf.as_slice()).unwrap();
		prop_assert_eq!(decoded, values);
	}

	#[test]
	fn test_inverse_matches_biguint(x in 1u64..47) {
		let elem = TinyField::from_u64(x);
		let inv = elem.inverse().unwrap();
		prop_assert!((elem * inv).is_one());
		let mut buf = Vec::new();
		serialize_element(&inv, &mut buf).unwrap();
		prop_assert_eq!(deserialize_element::<TinyField>(&mut buf.as_slice()).unwrap(), inv);
	}
}
