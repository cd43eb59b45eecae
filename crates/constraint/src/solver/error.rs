// Copyright 2024-2025 Irreducible Inc.

use crate::{
	blueprint::{self, Blueprint, BlueprintId, Capability},
	coeff::CoeffId,
	hint::HintId,
	system,
	term::WireId,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid witness size, got {got}, expected {expected}")]
	WitnessSizeMismatch { expected: usize, got: usize },

	#[error("missing hint functions: {}", .names.join(", "))]
	MissingHints { names: Vec<String> },

	#[error("hint {name} ({id:#010x}) failed: {source}")]
	Hint {
		id: HintId,
		name: String,
		#[source]
		source: anyhow::Error,
	},

	#[error(transparent)]
	Unsatisfied(#[from] UnsatisfiedConstraintError),

	#[error("failed to build the solver thread pool: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),

	#[error("fatal solver error: {0}")]
	Fatal(#[from] FatalError),
}

impl Error {
	/// Whether the error reveals a broken invariant of the constraint system or the solver, as
	/// opposed to a problem with the inputs of this particular solve.
	pub fn is_fatal(&self) -> bool {
		matches!(self, Self::Fatal(_))
	}
}

/// Invariant violations. These indicate a bug in whatever produced the constraint system.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FatalError {
	#[error("wire {wire} solved twice")]
	WireSolvedTwice { wire: WireId },

	#[error("constraint #{constraint} has more than one unsolved wire")]
	MultipleUnsolvedTerms { constraint: u32 },

	#[error("division by the zero coefficient")]
	DivisionByZeroCoefficient,

	#[error("blueprint {blueprint:?} does not support {capability}")]
	UnsupportedBlueprint {
		blueprint: Blueprint,
		capability: Capability,
	},

	#[error("unknown blueprint id {id}")]
	UnknownBlueprint { id: BlueprintId },

	#[error("hint {hint:#010x} reads wire {wire}, which is not solved yet")]
	UnsolvedHintInput { wire: WireId, hint: HintId },

	#[error("wire {wire} is read before it is solved")]
	UnsolvedWire { wire: WireId },

	#[error("solved {nb_solved} of {nb_wires} wires")]
	IncompleteSolution { nb_solved: usize, nb_wires: usize },

	#[error("wire {wire} is out of range, the system has {nb_wires} wires")]
	WireOutOfRange { wire: WireId, nb_wires: usize },

	#[error("coefficient id {coeff} is out of range")]
	CoeffOutOfRange { coeff: CoeffId },

	#[error("instruction {instruction} is malformed: {reason}")]
	MalformedInstruction { instruction: u32, reason: String },

	#[error("blueprint error: {0}")]
	Blueprint(blueprint::Error),
}

impl From<blueprint::Error> for FatalError {
	fn from(err: blueprint::Error) -> Self {
		match err {
			blueprint::Error::Unsupported {
				blueprint,
				capability,
			} => Self::UnsupportedBlueprint {
				blueprint,
				capability,
			},
			err => Self::Blueprint(err),
		}
	}
}

impl From<blueprint::Error> for Error {
	fn from(err: blueprint::Error) -> Self {
		Self::Fatal(err.into())
	}
}

impl FatalError {
	pub(super) fn from_system(instruction: u32, err: system::Error) -> Self {
		match err {
			system::Error::Blueprint(err) => err.into(),
			system::Error::UnknownBlueprint { id } => Self::UnknownBlueprint { id },
			err => Self::MalformedInstruction {
				instruction,
				reason: err.to_string(),
			},
		}
	}
}

/// A constraint that does not hold for the solved values.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("constraint #{constraint} is not satisfied: {}", self.detail())]
pub struct UnsatisfiedConstraintError {
	pub constraint: u32,
	/// The failed relation, evaluated.
	pub reason: String,
	/// The symbolic description attached to the constraint at compile time, if any.
	pub debug_info: Option<String>,
}

impl UnsatisfiedConstraintError {
	/// The debug description when one was recorded, otherwise the evaluated relation.
	pub fn detail(&self) -> &str {
		self.debug_info.as_deref().unwrap_or(&self.reason)
	}
}
