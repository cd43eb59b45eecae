// Copyright 2023-2024 Irreducible Inc.

//! Prime field abstraction used by the constraint system.
//!
//! The constraint system never assumes a particular modulus; it is generic over [`Field`], which is
//! implemented for every [`ark_ff::PrimeField`]. Two concrete fields are provided: the BN254
//! scalar field for real circuits and [`TinyField`] for exhaustive tests.

pub mod field;
pub mod serialization;
#[cfg(test)]
mod tests;
mod tiny;

pub use ark_bn254::Fr as Bn254Fr;
pub use ark_ff::{self, One, Zero};
pub use field::Field;
pub use tiny::{TinyField, TinyFieldConfig};
