// Copyright 2024-2025 Irreducible Inc.

use tracing::warn;
use zkc_field::Field;
use zkc_utils::bail;

use super::{Error, System, SystemKind};
use crate::{
	blueprint::BlueprintKind,
	constraint::{SparseR1C, R1C},
	hint::HintMapping,
	term::ONE_WIRE,
};

/// How [`System::check_unconstrained_wires`] reacts to wires no constraint refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnconstrainedWirePolicy {
	/// Report only.
	Allow,
	/// Report and emit a warning event.
	#[default]
	Warn,
	/// Fail with [`Error::UnconstrainedWires`].
	Deny,
}

/// Wires that no constraint refers to with a non-zero coefficient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnconstrainedWires {
	/// Names of public and secret inputs.
	pub inputs: Vec<String>,
	/// Number of wires computed by hints.
	pub nb_hint_outputs: usize,
}

impl UnconstrainedWires {
	pub fn is_empty(&self) -> bool {
		self.inputs.is_empty() && self.nb_hint_outputs == 0
	}
}

impl<F: Field> System<F> {
	/// Checks that every input wire and every hint output appears in at least one constraint.
	///
	/// Hint inputs do not count as constraining a wire. The constant wire of R1CS systems is
	/// exempt.
	pub fn check_unconstrained_wires(
		&self,
		policy: UnconstrainedWirePolicy,
	) -> Result<UnconstrainedWires, Error> {
		let mut constrained = vec![false; self.nb_wires()];
		let mut hint_outputs = Vec::new();

		let mut r1c = R1C::default();
		let mut sparse = SparseR1C::default();
		let mut hint = HintMapping::default();
		for instruction in &self.instructions {
			let blueprint = self.blueprint(instruction.blueprint_id)?;
			let call_data = self.get_call_data(instruction)?;
			match blueprint.kind() {
				BlueprintKind::R1C => {
					blueprint.decompress_r1c(call_data, &mut r1c)?;
					for term in r1c.terms().filter(|term| !term.is_zero()) {
						mark(&mut constrained, term.wire);
					}
				}
				BlueprintKind::SparseR1C => {
					blueprint.decompress_sparse_r1c(call_data, &mut sparse)?;
					for wire in sparse.wires() {
						mark(&mut constrained, wire);
					}
				}
				BlueprintKind::Hint => {
					blueprint.decompress_hint(call_data, &mut hint)?;
					hint_outputs.extend_from_slice(&hint.outputs);
				}
			}
		}

		let skip = match self.kind {
			SystemKind::R1cs => ONE_WIRE as usize + 1,
			SystemKind::SparseR1cs => 0,
		};
		let inputs = self
			.public
			.iter()
			.chain(&self.secret)
			.enumerate()
			.skip(skip)
			.filter(|&(wire, _)| !constrained[wire])
			.map(|(_, name)| name.clone())
			.collect::<Vec<_>>();
		hint_outputs.sort_unstable();
		hint_outputs.dedup();
		let nb_hint_outputs = hint_outputs
			.iter()
			.filter(|&&wire| !constrained.get(wire as usize).copied().unwrap_or(false))
			.count();

		let report = UnconstrainedWires {
			inputs,
			nb_hint_outputs,
		};
		if report.is_empty() {
			return Ok(report);
		}
		match policy {
			UnconstrainedWirePolicy::Allow => {}
			UnconstrainedWirePolicy::Warn => warn!(
				inputs = ?report.inputs,
				nb_hint_outputs = report.nb_hint_outputs,
				"constraint system has unconstrained wires"
			),
			UnconstrainedWirePolicy::Deny => {
				bail!(Error::UnconstrainedWires {
					inputs: report.inputs,
					nb_hint_outputs: report.nb_hint_outputs,
				});
			}
		}
		Ok(report)
	}
}

fn mark(constrained: &mut [bool], wire: u32) {
	if let Some(slot) = constrained.get_mut(wire as usize) {
		*slot = true;
	}
}
