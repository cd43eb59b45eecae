// Copyright 2024-2025 Irreducible Inc.

//! The constraint system container.
//!
//! A [`System`] owns the compressed instruction stream together with everything needed to
//! interpret it: the coefficient table, the blueprint registry, the variable layout, the
//! dependency levels used by the solver and the debug metadata used to explain failures.
//!
//! Wires are laid out as `[public | secret | internal]`. R1CS systems reserve public wire 0 for
//! the constant one.

mod error;
mod level;
mod serialization;
#[cfg(test)]
mod tests;
mod unconstrained;

use std::collections::BTreeMap;

pub use error::{Error, ReadError};
pub(crate) use level::Levels;
pub use unconstrained::{UnconstrainedWirePolicy, UnconstrainedWires};
use zkc_field::Field;
use zkc_utils::{bail, ensure};

use crate::{
	blueprint::{Blueprint, BlueprintId, BlueprintKind},
	coeff::{CoeffId, CoeffTable},
	constraint::{SparseR1C, R1C},
	debug::{LogEntry, Resolver, SymbolTable},
	hint::{hint_id, HintId, HintMapping},
	term::{Term, WireId, ONE_WIRE},
};

/// Which constraint shape a system is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemKind {
	/// Rank-one constraints `L ⋅ R == O`, with a constant one wire.
	R1cs,
	/// PlonK-ish gates, without a constant wire.
	SparseR1cs,
}

/// Name of the constant wire of R1CS systems.
pub const ONE_WIRE_NAME: &str = "1";

/// A pointer into the call data buffer, interpreted by a blueprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Instruction {
	pub blueprint_id: BlueprintId,
	/// Index of the first constraint this instruction stands for.
	pub constraint_offset: u32,
	pub start_call_data: u64,
}

#[derive(Debug, Clone)]
pub struct System<F: Field> {
	pub(crate) kind: SystemKind,
	pub(crate) coefficients: CoeffTable<F>,
	pub(crate) blueprints: Vec<Blueprint>,
	pub(crate) instructions: Vec<Instruction>,
	pub(crate) call_data: Vec<u32>,
	pub(crate) public: Vec<String>,
	pub(crate) secret: Vec<String>,
	pub(crate) nb_internal: usize,
	pub(crate) nb_constraints: usize,
	pub(crate) levels: Levels,
	/// Symbolic descriptions of constraints, indexed through `debug_map`.
	pub(crate) debug_info: Vec<LogEntry>,
	pub(crate) debug_map: BTreeMap<u32, u32>,
	pub(crate) logs: Vec<LogEntry>,
	pub(crate) symbols: SymbolTable,
	pub(crate) hint_dependencies: BTreeMap<HintId, String>,
}

impl<F: Field> System<F> {
	pub fn new(kind: SystemKind) -> Self {
		let public = match kind {
			SystemKind::R1cs => vec![ONE_WIRE_NAME.to_string()],
			SystemKind::SparseR1cs => Vec::new(),
		};
		Self {
			kind,
			coefficients: CoeffTable::default(),
			blueprints: Vec::new(),
			instructions: Vec::new(),
			call_data: Vec::new(),
			public,
			secret: Vec::new(),
			nb_internal: 0,
			nb_constraints: 0,
			levels: Levels::default(),
			debug_info: Vec::new(),
			debug_map: BTreeMap::new(),
			logs: Vec::new(),
			symbols: SymbolTable::default(),
			hint_dependencies: BTreeMap::new(),
		}
	}

	pub fn kind(&self) -> SystemKind {
		self.kind
	}

	pub fn coefficients(&self) -> &CoeffTable<F> {
		&self.coefficients
	}

	pub fn coefficients_mut(&mut self) -> &mut CoeffTable<F> {
		&mut self.coefficients
	}

	pub fn add_coeff(&mut self, coeff: F) -> CoeffId {
		self.coefficients.add_coeff(coeff)
	}

	pub fn make_term(&mut self, coeff: F, wire: WireId) -> Term {
		self.coefficients.make_term(coeff, wire)
	}

	/// Registers a blueprint, returning the id of an identical one if already present.
	pub fn add_blueprint(&mut self, blueprint: Blueprint) -> BlueprintId {
		match self.blueprints.iter().position(|b| *b == blueprint) {
			Some(id) => id as BlueprintId,
			None => {
				self.blueprints.push(blueprint);
				(self.blueprints.len() - 1) as BlueprintId
			}
		}
	}

	pub fn blueprint(&self, id: BlueprintId) -> Result<Blueprint, Error> {
		self.blueprints
			.get(id as usize)
			.copied()
			.ok_or(Error::UnknownBlueprint { id })
	}

	pub fn blueprints(&self) -> &[Blueprint] {
		&self.blueprints
	}

	pub fn add_public_variable(&mut self, name: impl Into<String>) -> Result<WireId, Error> {
		ensure!(
			self.secret.is_empty() && self.nb_internal == 0,
			Error::VariableOrder {
				reason: "public variable declared after secret or internal ones"
			}
		);
		self.public.push(name.into());
		Ok((self.public.len() - 1) as WireId)
	}

	pub fn add_secret_variable(&mut self, name: impl Into<String>) -> Result<WireId, Error> {
		ensure!(
			self.nb_internal == 0,
			Error::VariableOrder {
				reason: "secret variable declared after internal ones"
			}
		);
		self.secret.push(name.into());
		Ok((self.nb_inputs() - 1) as WireId)
	}

	pub fn add_internal_variable(&mut self) -> WireId {
		self.nb_internal += 1;
		(self.nb_wires() - 1) as WireId
	}

	/// Public variable names, including the constant wire of R1CS systems.
	pub fn public_variables(&self) -> &[String] {
		&self.public
	}

	pub fn secret_variables(&self) -> &[String] {
		&self.secret
	}

	pub fn nb_public_variables(&self) -> usize {
		self.public.len()
	}

	pub fn nb_secret_variables(&self) -> usize {
		self.secret.len()
	}

	pub fn nb_internal_variables(&self) -> usize {
		self.nb_internal
	}

	/// Number of wires supplied by the witness or fixed before solving.
	pub fn nb_inputs(&self) -> usize {
		self.public.len() + self.secret.len()
	}

	pub fn nb_wires(&self) -> usize {
		self.nb_inputs() + self.nb_internal
	}

	/// Length of the witness expected by the solver: every input except the constant wire.
	pub fn witness_len(&self) -> usize {
		match self.kind {
			SystemKind::R1cs => self.nb_inputs() - 1,
			SystemKind::SparseR1cs => self.nb_inputs(),
		}
	}

	pub fn nb_constraints(&self) -> usize {
		self.nb_constraints
	}

	pub fn nb_instructions(&self) -> usize {
		self.instructions.len()
	}

	pub fn instructions(&self) -> &[Instruction] {
		&self.instructions
	}

	pub fn call_data(&self) -> &[u32] {
		&self.call_data
	}

	/// Instruction indices per dependency level.
	pub fn levels(&self) -> &[Vec<u32>] {
		&self.levels.levels
	}

	pub fn nb_levels(&self) -> usize {
		self.levels.levels.len()
	}

	/// Replaces the levels computed while appending instructions with externally computed ones.
	///
	/// Every instruction must appear in exactly one level. The caller is responsible for the
	/// levels respecting the dependencies between instructions.
	pub fn set_levels(&mut self, levels: Vec<Vec<u32>>) -> Result<(), Error> {
		self.levels = self.replay_levels(Levels::from_levels(levels))?;
		Ok(())
	}

	/// Adds `constraint`, encoded with the R1C blueprint `blueprint_id`, and returns its index.
	pub fn add_r1c(&mut self, constraint: &R1C, blueprint_id: BlueprintId) -> Result<u32, Error> {
		let blueprint = self.check_blueprint(blueprint_id, BlueprintKind::R1C)?;
		for term in constraint.terms() {
			self.check_term(term)?;
		}

		let start = self.call_data.len();
		if let Err(err) = blueprint.compress_r1c(constraint, &mut self.call_data) {
			self.call_data.truncate(start);
			bail!(err);
		}

		let instruction = self.push_instruction(blueprint_id, blueprint, start);
		let nb_inputs = self.nb_inputs();
		self.levels.add_constraint(
			nb_inputs,
			instruction,
			constraint.terms().map(|term| term.wire),
		);
		Ok(self.nb_constraints as u32 - 1)
	}

	/// Adds `constraint`, encoded with the sparse blueprint `blueprint_id`, and returns its index.
	pub fn add_sparse_r1c(
		&mut self,
		constraint: &SparseR1C,
		blueprint_id: BlueprintId,
	) -> Result<u32, Error> {
		let blueprint = self.check_blueprint(blueprint_id, BlueprintKind::SparseR1C)?;
		for wire in [constraint.xa, constraint.xb, constraint.xc] {
			self.check_wire(wire)?;
		}
		for coeff in [
			constraint.ql,
			constraint.qr,
			constraint.qo,
			constraint.qm,
			constraint.qc,
		] {
			self.check_coeff(coeff)?;
		}

		let start = self.call_data.len();
		if let Err(err) = blueprint.compress_sparse_r1c(constraint, &mut self.call_data) {
			self.call_data.truncate(start);
			bail!(err);
		}

		// Level the gate as the solver will see it; specialized encodings may imply coefficients.
		let mut encoded = SparseR1C::default();
		if let Err(err) = blueprint.decompress_sparse_r1c(&self.call_data[start..], &mut encoded) {
			self.call_data.truncate(start);
			bail!(err);
		}

		let instruction = self.push_instruction(blueprint_id, blueprint, start);
		let nb_inputs = self.nb_inputs();
		self.levels.add_constraint(nb_inputs, instruction, encoded.wires());
		Ok(self.nb_constraints as u32 - 1)
	}

	/// Adds a hint instruction and records `name` as a dependency of the system.
	///
	/// The mapping's id must be [`hint_id(name)`](hint_id). Outputs must be internal wires not
	/// defined by any earlier instruction.
	pub fn add_hint(
		&mut self,
		mapping: &HintMapping,
		name: &str,
		blueprint_id: BlueprintId,
	) -> Result<(), Error> {
		let blueprint = self.check_blueprint(blueprint_id, BlueprintKind::Hint)?;
		let expected = hint_id(name);
		ensure!(
			mapping.hint_id == expected,
			Error::HintIdMismatch {
				name: name.to_string(),
				expected,
				got: mapping.hint_id,
			}
		);
		if let Some(existing) = self.hint_dependencies.get(&expected) {
			ensure!(
				existing == name,
				Error::HintIdCollision {
					id: expected,
					existing: existing.clone(),
					name: name.to_string(),
				}
			);
		}

		for term in mapping.inputs.iter().flatten() {
			self.check_term(term)?;
		}
		for (i, &wire) in mapping.outputs.iter().enumerate() {
			self.check_wire(wire)?;
			ensure!(!mapping.outputs[..i].contains(&wire), Error::WireAlreadyDefined { wire });
			ensure!(
				(wire as usize) >= self.nb_inputs() && !self.levels.is_defined(wire),
				Error::WireAlreadyDefined { wire }
			);
		}

		let start = self.call_data.len();
		if let Err(err) = blueprint.compress_hint(mapping, &mut self.call_data) {
			self.call_data.truncate(start);
			bail!(err);
		}

		self.hint_dependencies.insert(expected, name.to_string());
		let instruction = self.push_instruction(blueprint_id, blueprint, start);
		let nb_inputs = self.nb_inputs();
		self.levels.add_hint(
			nb_inputs,
			instruction,
			mapping.inputs.iter().flatten().map(|term| term.wire),
			&mapping.outputs,
		);
		Ok(())
	}

	/// Hint ids the system needs at solve time, with their names.
	pub fn hint_dependencies(&self) -> &BTreeMap<HintId, String> {
		&self.hint_dependencies
	}

	/// Attaches a symbolic description to a constraint, shown when it is not satisfied.
	pub fn add_debug_info(&mut self, constraint: u32, entry: LogEntry) -> Result<(), Error> {
		ensure!(
			(constraint as usize) < self.nb_constraints,
			Error::ConstraintOutOfRange {
				constraint,
				nb_constraints: self.nb_constraints,
			}
		);
		self.debug_info.push(entry);
		self.debug_map.insert(constraint, (self.debug_info.len() - 1) as u32);
		Ok(())
	}

	pub fn debug_info(&self, constraint: u32) -> Option<&LogEntry> {
		self.debug_map
			.get(&constraint)
			.and_then(|&id| self.debug_info.get(id as usize))
	}

	/// Adds a statement rendered after every solve.
	pub fn add_log(&mut self, entry: LogEntry) -> Result<(), Error> {
		for term in entry.to_resolve.iter().flatten() {
			self.check_term(term)?;
		}
		self.logs.push(entry);
		Ok(())
	}

	pub fn logs(&self) -> &[LogEntry] {
		&self.logs
	}

	pub fn symbols(&self) -> &SymbolTable {
		&self.symbols
	}

	pub fn symbols_mut(&mut self) -> &mut SymbolTable {
		&mut self.symbols
	}

	/// The call data range of `instruction`.
	pub fn get_call_data(&self, instruction: &Instruction) -> Result<&[u32], Error> {
		let blueprint = self.blueprint(instruction.blueprint_id)?;
		let start = usize::try_from(instruction.start_call_data)
			.ok()
			.filter(|&start| start <= self.call_data.len())
			.ok_or(crate::blueprint::Error::MalformedCallData {
				blueprint,
				reason: "instruction starts past the call data buffer",
			})?;
		let rest = &self.call_data[start..];
		let len = blueprint.call_data_len(rest)?;
		Ok(&rest[..len])
	}

	/// Decodes every R1C of the system, in instruction order. Hint instructions are skipped.
	pub fn get_constraints(&self) -> Result<Vec<R1C>, Error> {
		let mut constraints = Vec::with_capacity(self.nb_constraints);
		for instruction in &self.instructions {
			let blueprint = self.blueprint(instruction.blueprint_id)?;
			if blueprint.kind() == BlueprintKind::Hint {
				continue;
			}
			let mut constraint = R1C::default();
			blueprint.decompress_r1c(self.get_call_data(instruction)?, &mut constraint)?;
			constraints.push(constraint);
		}
		Ok(constraints)
	}

	/// Decodes every sparse constraint of the system, in instruction order. Hint instructions are
	/// skipped.
	pub fn get_sparse_constraints(&self) -> Result<Vec<SparseR1C>, Error> {
		let mut constraints = Vec::with_capacity(self.nb_constraints);
		for instruction in &self.instructions {
			let blueprint = self.blueprint(instruction.blueprint_id)?;
			if blueprint.kind() == BlueprintKind::Hint {
				continue;
			}
			let mut constraint = SparseR1C::default();
			blueprint.decompress_sparse_r1c(self.get_call_data(instruction)?, &mut constraint)?;
			constraints.push(constraint);
		}
		Ok(constraints)
	}

	/// Every wire an instruction touches, with the wires a hint defines listed separately.
	pub(crate) fn instruction_wires(
		&self,
		instruction: &Instruction,
	) -> Result<(Vec<WireId>, Vec<WireId>), Error> {
		let blueprint = self.blueprint(instruction.blueprint_id)?;
		let call_data = self.get_call_data(instruction)?;
		let wires = match blueprint.kind() {
			BlueprintKind::R1C => {
				let mut c = R1C::default();
				blueprint.decompress_r1c(call_data, &mut c)?;
				(c.terms().map(|t| t.wire).collect(), Vec::new())
			}
			BlueprintKind::SparseR1C => {
				let mut c = SparseR1C::default();
				blueprint.decompress_sparse_r1c(call_data, &mut c)?;
				(c.wires().collect(), Vec::new())
			}
			BlueprintKind::Hint => {
				let mut h = HintMapping::default();
				blueprint.decompress_hint(call_data, &mut h)?;
				(h.inputs.iter().flatten().map(|t| t.wire).collect(), h.outputs)
			}
		};
		Ok(wires)
	}

	/// Checks that every wire and coefficient id `instruction` refers to is in range.
	pub(crate) fn check_instruction_operands(&self, instruction: &Instruction) -> Result<(), Error> {
		let blueprint = self.blueprint(instruction.blueprint_id)?;
		let call_data = self.get_call_data(instruction)?;
		match blueprint.kind() {
			BlueprintKind::R1C => {
				let mut c = R1C::default();
				blueprint.decompress_r1c(call_data, &mut c)?;
				let result = c.terms().try_for_each(|term| self.check_term(term));
				result
			}
			BlueprintKind::SparseR1C => {
				let mut c = SparseR1C::default();
				blueprint.decompress_sparse_r1c(call_data, &mut c)?;
				c.wires().try_for_each(|wire| self.check_wire(wire))?;
				[c.ql, c.qr, c.qo, c.qm, c.qc]
					.into_iter()
					.try_for_each(|coeff| self.check_coeff(coeff))
			}
			BlueprintKind::Hint => {
				let mut h = HintMapping::default();
				blueprint.decompress_hint(call_data, &mut h)?;
				h.inputs
					.iter()
					.flatten()
					.try_for_each(|term| self.check_term(term))?;
				h.outputs.iter().try_for_each(|&wire| self.check_wire(wire))
			}
		}
	}

	/// Recomputes which wire each level defines, using the given instruction placement.
	fn replay_levels(&self, mut levels: Levels) -> Result<Levels, Error> {
		let instruction_levels = levels
			.instruction_levels(self.instructions.len())
			.map_err(|reason| Error::InvalidLevels { reason })?;
		let nb_inputs = self.nb_inputs();
		for (instruction, &level) in self.instructions.iter().zip(&instruction_levels) {
			let (reads, outputs) = self.instruction_wires(instruction)?;
			let defines = match self.blueprint(instruction.blueprint_id)?.kind() {
				BlueprintKind::Hint => outputs,
				BlueprintKind::R1C | BlueprintKind::SparseR1C => reads,
			};
			levels.replay(nb_inputs, level, defines);
		}
		Ok(levels)
	}

	fn check_blueprint(&self, id: BlueprintId, expected: BlueprintKind) -> Result<Blueprint, Error> {
		let blueprint = self.blueprint(id)?;
		let got = blueprint.kind();
		ensure!(got == expected, Error::BlueprintKindMismatch { id, expected, got });

		let allowed = match self.kind {
			SystemKind::R1cs => got != BlueprintKind::SparseR1C,
			SystemKind::SparseR1cs => got != BlueprintKind::R1C,
		};
		ensure!(allowed, Error::SystemKindMismatch { kind: self.kind, got });
		Ok(blueprint)
	}

	fn check_wire(&self, wire: WireId) -> Result<(), Error> {
		let nb_wires = self.nb_wires();
		ensure!((wire as usize) < nb_wires, Error::WireOutOfRange { wire, nb_wires });
		Ok(())
	}

	fn check_coeff(&self, coeff: CoeffId) -> Result<(), Error> {
		let nb_coeffs = self.coefficients.len();
		ensure!((coeff as usize) < nb_coeffs, Error::CoeffOutOfRange { coeff, nb_coeffs });
		Ok(())
	}

	fn check_term(&self, term: &Term) -> Result<(), Error> {
		self.check_coeff(term.coeff)?;
		self.check_wire(term.wire)
	}

	fn push_instruction(&mut self, blueprint_id: BlueprintId, blueprint: Blueprint, start: usize) -> u32 {
		self.instructions.push(Instruction {
			blueprint_id,
			constraint_offset: self.nb_constraints as u32,
			start_call_data: start as u64,
		});
		self.nb_constraints += blueprint.nb_constraints();
		(self.instructions.len() - 1) as u32
	}
}

impl<F: Field> Resolver for System<F> {
	fn coeff_to_string(&self, id: CoeffId) -> String {
		self.coefficients.coeff_to_string(id)
	}

	fn variable_to_string(&self, wire: WireId) -> String {
		let index = wire as usize;
		if let Some(name) = self.public.get(index) {
			return name.clone();
		}
		let index = index - self.public.len();
		if let Some(name) = self.secret.get(index) {
			return name.clone();
		}
		let index = index - self.secret.len();
		if index < self.nb_internal {
			format!("v{index}")
		} else {
			format!("<wire #{wire}>")
		}
	}
}

impl<F: Field> Default for System<F> {
	fn default() -> Self {
		Self::new(SystemKind::R1cs)
	}
}

/// Whether `term` is a literal in systems of kind `kind`.
pub(crate) fn is_constant_term(kind: SystemKind, term: &Term) -> bool {
	kind == SystemKind::R1cs && term.wire == ONE_WIRE
}
