// Copyright 2024-2025 Irreducible Inc.

//! Dependency levels of the instruction stream.
//!
//! An instruction's level is one more than the highest level among the wires it reads, so no
//! instruction depends on another one in the same level. Input wires are known before solving
//! starts and do not contribute.

use itertools::Itertools;

use crate::term::WireId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Levels {
	/// Instruction indices per level.
	pub levels: Vec<Vec<u32>>,
	/// Level of the instruction defining each wire, indexed by wire id.
	wire_levels: Vec<Option<u32>>,
}

impl Levels {
	pub fn from_levels(levels: Vec<Vec<u32>>) -> Self {
		Self {
			levels,
			wire_levels: Vec::new(),
		}
	}

	pub fn wire_level(&self, wire: WireId) -> Option<u32> {
		self.wire_levels.get(wire as usize).copied().flatten()
	}

	pub fn is_defined(&self, wire: WireId) -> bool {
		self.wire_level(wire).is_some()
	}

	fn set_wire_level(&mut self, wire: WireId, level: u32) {
		let index = wire as usize;
		if self.wire_levels.len() <= index {
			self.wire_levels.resize(index + 1, None);
		}
		self.wire_levels[index] = Some(level);
	}

	fn push(&mut self, instruction: u32, level: u32) {
		let level = level as usize;
		if self.levels.len() <= level {
			self.levels.resize_with(level + 1, Vec::new);
		}
		self.levels[level].push(instruction);
	}

	/// Levels a constraint: every wire it touches is either read (input or already defined) or
	/// becomes one of its outputs.
	///
	/// Returns the level the instruction was placed in.
	pub fn add_constraint(
		&mut self,
		nb_inputs: usize,
		instruction: u32,
		wires: impl IntoIterator<Item = WireId>,
	) -> u32 {
		let mut level = 0;
		let mut outputs = Vec::new();
		for wire in wires {
			if (wire as usize) < nb_inputs {
				continue;
			}
			match self.wire_level(wire) {
				Some(l) => level = level.max(l + 1),
				None => outputs.push(wire),
			}
		}
		self.commit(instruction, level, outputs.into_iter().unique())
	}

	/// Levels a hint whose outputs are given explicitly.
	///
	/// Inputs that are neither input wires nor defined yet are left to the solver to report.
	pub fn add_hint(
		&mut self,
		nb_inputs: usize,
		instruction: u32,
		inputs: impl IntoIterator<Item = WireId>,
		outputs: &[WireId],
	) -> u32 {
		let level = inputs
			.into_iter()
			.filter(|&wire| wire as usize >= nb_inputs)
			.filter_map(|wire| self.wire_level(wire))
			.map(|l| l + 1)
			.max()
			.unwrap_or(0);
		self.commit(instruction, level, outputs.iter().copied())
	}

	/// Places `instruction` at a level chosen by the caller, defining its still undefined
	/// non-input wires.
	pub fn replay(
		&mut self,
		nb_inputs: usize,
		level: u32,
		wires: impl IntoIterator<Item = WireId>,
	) {
		for wire in wires {
			if wire as usize >= nb_inputs && !self.is_defined(wire) {
				self.set_wire_level(wire, level);
			}
		}
	}

	fn commit(&mut self, instruction: u32, level: u32, outputs: impl Iterator<Item = WireId>) -> u32 {
		for wire in outputs {
			self.set_wire_level(wire, level);
		}
		self.push(instruction, level);
		level
	}

	/// Level index of every instruction, checking each of the `nb_instructions` appears exactly
	/// once.
	pub fn instruction_levels(&self, nb_instructions: usize) -> Result<Vec<u32>, String> {
		let mut instruction_levels = vec![None; nb_instructions];
		for (level, instructions) in self.levels.iter().enumerate() {
			for &instruction in instructions {
				let Some(slot) = instruction_levels.get_mut(instruction as usize) else {
					return Err(format!("instruction {instruction} does not exist"));
				};
				if slot.replace(level as u32).is_some() {
					return Err(format!("instruction {instruction} appears twice"));
				}
			}
		}
		instruction_levels
			.into_iter()
			.enumerate()
			.map(|(i, level)| level.ok_or_else(|| format!("instruction {i} is not leveled")))
			.collect()
	}
}
