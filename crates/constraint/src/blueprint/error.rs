// Copyright 2024-2025 Irreducible Inc.

use std::fmt;

use super::Blueprint;

/// Shape of data a blueprint may be asked to encode, decode or solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
	R1C,
	SparseR1C,
	Hint,
	Solve,
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::R1C => "R1C encoding",
			Self::SparseR1C => "sparse R1C encoding",
			Self::Hint => "hint encoding",
			Self::Solve => "direct solving",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum Error {
	#[error("blueprint {blueprint:?} does not support {capability}")]
	Unsupported {
		blueprint: Blueprint,
		capability: Capability,
	},

	#[error("malformed call data for blueprint {blueprint:?}: {reason}")]
	MalformedCallData {
		blueprint: Blueprint,
		reason: &'static str,
	},

	#[error("constraint does not have the shape encoded by blueprint {blueprint:?}: {reason}")]
	ShapeMismatch {
		blueprint: Blueprint,
		reason: &'static str,
	},

	#[error("blueprint {blueprint:?} cannot encode a value of {value} in a call data word")]
	WordOverflow { blueprint: Blueprint, value: usize },
}
