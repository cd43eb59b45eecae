// Copyright 2024-2025 Irreducible Inc.

//! A 6-bit prime field, small enough to enumerate exhaustively in tests.

use ark_ff::fields::{Fp64, MontBackend, MontConfig};

#[derive(MontConfig)]
#[modulus = "47"]
#[generator = "5"]
pub struct TinyFieldConfig;

/// The prime field of order 47.
pub type TinyField = Fp64<MontBackend<TinyFieldConfig, 1>>;
