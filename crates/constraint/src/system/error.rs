// Copyright 2024-2025 Irreducible Inc.

use zkc_utils::serialization::SerializationError;

use super::SystemKind;
use crate::{
	blueprint::{self, BlueprintId, BlueprintKind},
	coeff::{self, CoeffId},
	hint::HintId,
	term::WireId,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown blueprint id {id}")]
	UnknownBlueprint { id: BlueprintId },

	#[error("blueprint {id} encodes {got:?} instructions, expected {expected:?}")]
	BlueprintKindMismatch {
		id: BlueprintId,
		expected: BlueprintKind,
		got: BlueprintKind,
	},

	#[error("{kind:?} systems cannot hold {got:?} constraints")]
	SystemKindMismatch { kind: SystemKind, got: BlueprintKind },

	#[error("wire {wire} is out of range, the system has {nb_wires} wires")]
	WireOutOfRange { wire: WireId, nb_wires: usize },

	#[error("coefficient id {coeff} is out of range, the table has {nb_coeffs} entries")]
	CoeffOutOfRange { coeff: CoeffId, nb_coeffs: usize },

	#[error("variables must be declared public, then secret, then internal: {reason}")]
	VariableOrder { reason: &'static str },

	#[error("wire {wire} is already defined by another instruction")]
	WireAlreadyDefined { wire: WireId },

	#[error("hint {name:?} has id {expected:#010x} but the mapping uses {got:#010x}")]
	HintIdMismatch {
		name: String,
		expected: HintId,
		got: HintId,
	},

	#[error("hint id {id:#010x} is claimed by both {existing:?} and {name:?}")]
	HintIdCollision {
		id: HintId,
		existing: String,
		name: String,
	},

	#[error("constraint {constraint} is out of range, the system has {nb_constraints} constraints")]
	ConstraintOutOfRange { constraint: u32, nb_constraints: usize },

	#[error("invalid levels: {reason}")]
	InvalidLevels { reason: String },

	#[error("unconstrained wires: inputs {inputs:?}, {nb_hint_outputs} hint outputs")]
	UnconstrainedWires {
		inputs: Vec<String>,
		nb_hint_outputs: usize,
	},

	#[error("blueprint error: {0}")]
	Blueprint(#[from] blueprint::Error),

	#[error("coefficient table error: {0}")]
	Coeff(#[from] coeff::Error),
}

/// Failure to decode a persisted [`System`](super::System).
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("failed to read constraint system at byte {offset}: {source}")]
pub struct ReadError {
	/// Number of bytes consumed before the failure.
	pub offset: usize,
	#[source]
	pub source: SerializationError,
}
