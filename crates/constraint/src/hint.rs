// Copyright 2025 Irreducible Inc.

//! Hint system.
//!
//! Hints compute wire values outside of the constraint system, over big integers. They are used
//! for operations that are expensive to express as constraints but cheap to check, such as field
//! inversion or bit decomposition. The constraints consuming a hint's outputs are what make the
//! result sound; the hint itself is trusted to be deterministic only.

use std::{collections::HashMap, fmt, sync::Arc};

use anyhow::ensure;
use bytes::{Buf, BufMut};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use tiny_keccak::{Hasher, Keccak};
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use crate::term::{LinearExpression, WireId};

pub type HintId = u32;

/// Derives the id of a hint from its name: the first four bytes of `keccak256(name)`.
///
/// Ids are therefore stable across processes and survive serialization of the constraint system.
pub fn hint_id(name: &str) -> HintId {
	let mut hasher = Keccak::v256();
	hasher.update(name.as_bytes());
	let mut digest = [0u8; 32];
	hasher.finalize(&mut digest);
	u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// A hint function.
///
/// Receives the field modulus and the evaluated inputs, and must fill every output in place.
pub trait Hint: Send + Sync {
	fn call(&self, modulus: &BigUint, inputs: &[BigUint], outputs: &mut [BigUint]) -> anyhow::Result<()>;
}

impl<H> Hint for H
where
	H: Fn(&BigUint, &[BigUint], &mut [BigUint]) -> anyhow::Result<()> + Send + Sync,
{
	fn call(&self, modulus: &BigUint, inputs: &[BigUint], outputs: &mut [BigUint]) -> anyhow::Result<()> {
		self(modulus, inputs, outputs)
	}
}

/// Wiring of one hint invocation in the constraint system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintMapping {
	pub hint_id: HintId,
	pub inputs: Vec<LinearExpression>,
	pub outputs: Vec<WireId>,
}

impl HintMapping {
	pub fn new(hint_id: HintId, inputs: Vec<LinearExpression>, outputs: Vec<WireId>) -> Self {
		Self {
			hint_id,
			inputs,
			outputs,
		}
	}

	pub fn clear(&mut self) {
		self.hint_id = 0;
		self.inputs.clear();
		self.outputs.clear();
	}
}

struct Entry {
	name: String,
	handler: Arc<dyn Hint>,
}

/// Hint functions available to the solver, keyed by [`HintId`].
#[derive(Clone, Default)]
pub struct HintRegistry {
	handlers: HashMap<HintId, Arc<Entry>>,
}

impl HintRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding the built-in hints ([`INV_ZERO`] and [`BITS`]).
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register(INV_ZERO, InvZeroHint);
		registry.register(BITS, BitsHint);
		registry
	}

	/// Registers `handler` under `name`, replacing any previous hint with the same id.
	pub fn register(&mut self, name: impl Into<String>, handler: impl Hint + 'static) -> HintId {
		self.register_arc(name, Arc::new(handler))
	}

	pub fn register_arc(&mut self, name: impl Into<String>, handler: Arc<dyn Hint>) -> HintId {
		let name = name.into();
		let id = hint_id(&name);
		self.handlers.insert(id, Arc::new(Entry { name, handler }));
		id
	}

	pub fn extend(&mut self, other: &HintRegistry) {
		self.handlers
			.extend(other.handlers.iter().map(|(id, entry)| (*id, entry.clone())));
	}

	pub fn get(&self, id: HintId) -> Option<&dyn Hint> {
		self.handlers.get(&id).map(|entry| entry.handler.as_ref())
	}

	pub fn name(&self, id: HintId) -> Option<&str> {
		self.handlers.get(&id).map(|entry| entry.name.as_str())
	}

	pub fn contains(&self, id: HintId) -> bool {
		self.handlers.contains_key(&id)
	}

	pub fn len(&self) -> usize {
		self.handlers.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handlers.is_empty()
	}
}

impl fmt::Debug for HintRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names = self
			.handlers
			.values()
			.map(|entry| entry.name.as_str())
			.collect::<Vec<_>>();
		names.sort_unstable();
		f.debug_struct("HintRegistry").field("hints", &names).finish()
	}
}

pub const INV_ZERO: &str = "inv_zero";
pub const BITS: &str = "bits";

/// `1/x` for a non-zero input and `0` otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvZeroHint;

impl Hint for InvZeroHint {
	fn call(&self, modulus: &BigUint, inputs: &[BigUint], outputs: &mut [BigUint]) -> anyhow::Result<()> {
		ensure!(inputs.len() == 1 && outputs.len() == 1, "inv_zero expects one input and one output");
		ensure!(modulus > &BigUint::one(), "inv_zero requires a prime modulus");

		// Fermat inversion; maps zero to zero.
		let exponent = modulus - 2u32;
		outputs[0] = inputs[0].modpow(&exponent, modulus);
		Ok(())
	}
}

/// Little-endian bit decomposition of the single input, one bit per output.
///
/// Bits above the number of outputs are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitsHint;

impl Hint for BitsHint {
	fn call(&self, _modulus: &BigUint, inputs: &[BigUint], outputs: &mut [BigUint]) -> anyhow::Result<()> {
		ensure!(inputs.len() == 1, "bits expects one input, got {}", inputs.len());

		let value = &inputs[0];
		for (i, out) in outputs.iter_mut().enumerate() {
			*out = if value.bit(i as u64) {
				BigUint::one()
			} else {
				BigUint::zero()
			};
		}
		Ok(())
	}
}

impl SerializeBytes for HintMapping {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.hint_id.serialize(&mut write_buf)?;
		self.inputs.serialize(&mut write_buf)?;
		self.outputs.serialize(write_buf)
	}
}

impl DeserializeBytes for HintMapping {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			hint_id: HintId::deserialize(&mut read_buf)?,
			inputs: Vec::deserialize(&mut read_buf)?,
			outputs: Vec::deserialize(read_buf)?,
		})
	}
}
