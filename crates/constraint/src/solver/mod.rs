// Copyright 2024-2025 Irreducible Inc.

//! Witness generation.
//!
//! [`System::solve`] walks the dependency levels of a constraint system in order. Every
//! instruction of a level only reads wires solved by earlier levels, so a level may be split
//! into contiguous chunks that run on a dedicated rayon pool. The end of a level is a barrier.

mod config;
mod error;
mod output;
mod r1cs;
mod solution;
mod sparse;

use std::{ops::Range, sync::OnceLock};

pub use config::{SolverConfig, DEFAULT_MIN_WORK_PER_WORKER, NO_LOGS_ENV_VAR, WORKERS_ENV_VAR};
pub use error::{Error, FatalError, UnsatisfiedConstraintError};
use num_bigint::BigUint;
pub use output::{R1csSolution, SolverOutput, SparseR1csSolution};
use rayon::prelude::*;
use solution::Solution;
pub use solution::UNSOLVED_VARIABLE;
use tracing::{debug, instrument, trace, Level};
use zkc_field::Field;
use zkc_utils::{bail, rayon::build_thread_pool};

use crate::{
	blueprint::{BlueprintKind, WireSolver},
	coeff::{CoeffId, COEFF_ID_ZERO},
	constraint::{SparseR1C, R1C},
	debug::LogEntry,
	hint::HintMapping,
	system::{is_constant_term, System, SystemKind},
	term::{WireId, ONE_WIRE},
};

impl<F: Field> System<F> {
	/// Computes every wire of the system from the public and secret inputs in `witness`.
	///
	/// `witness` lists the public inputs followed by the secret ones. For R1CS systems the
	/// constant wire is not part of it.
	#[instrument(
		skip_all,
		level = "debug",
		fields(
			nb_constraints = self.nb_constraints(),
			nb_wires = self.nb_wires(),
			nb_levels = self.nb_levels(),
		)
	)]
	pub fn solve(&self, witness: &[F], config: &SolverConfig) -> Result<SolverOutput<F>, Error> {
		let solver = Solver::new(self, config, witness)?;
		let result = solver.run();
		if config.logs() && tracing::enabled!(Level::DEBUG) {
			solver.print_logs(&self.logs);
		}
		if let Err(err) = result {
			debug!(%err, "solve failed");
			return Err(err);
		}
		solver.into_output()
	}
}

/// State of one solve.
pub(crate) struct Solver<'a, F: Field> {
	system: &'a System<F>,
	config: &'a SolverConfig,
	solution: Solution<'a, F>,
	/// Evaluated `(a, b, c)` per constraint; empty for sparse systems.
	abc: Vec<OnceLock<[F; 3]>>,
	modulus: BigUint,
}

/// Decoding buffers reused across the instructions of one chunk.
#[derive(Default)]
struct Scratch {
	r1c: R1C,
	sparse: SparseR1C,
	hint: HintMapping,
}

impl<'a, F: Field> Solver<'a, F> {
	fn new(system: &'a System<F>, config: &'a SolverConfig, witness: &[F]) -> Result<Self, Error> {
		let missing = system
			.hint_dependencies()
			.iter()
			.filter(|(&id, _)| !config.hints().contains(id))
			.map(|(_, name)| name.clone())
			.collect::<Vec<_>>();
		if !missing.is_empty() {
			return Err(Error::MissingHints { names: missing });
		}

		let expected = system.witness_len();
		if witness.len() != expected {
			return Err(Error::WitnessSizeMismatch {
				expected,
				got: witness.len(),
			});
		}

		let solution =
			Solution::new(system.nb_wires(), system.coefficients().coefficients(), system.kind());
		let offset = match system.kind() {
			SystemKind::R1cs => {
				solution.set(ONE_WIRE, F::one())?;
				1
			}
			SystemKind::SparseR1cs => 0,
		};
		for (i, &value) in witness.iter().enumerate() {
			solution.set((offset + i) as WireId, value)?;
		}

		let abc = match system.kind() {
			SystemKind::R1cs => (0..system.nb_constraints()).map(|_| OnceLock::new()).collect(),
			SystemKind::SparseR1cs => Vec::new(),
		};

		Ok(Self {
			system,
			config,
			solution,
			abc,
			modulus: F::modulus(),
		})
	}

	fn run(&self) -> Result<(), Error> {
		let nb_workers = self.config.nb_workers();
		let min_work = self.config.min_work_per_worker();
		let parallel = nb_workers > 1 && self.system.levels().iter().any(|level| level.len() > min_work);
		let pool = if parallel {
			Some(build_thread_pool(nb_workers)?)
		} else {
			None
		};

		for (index, level) in self.system.levels().iter().enumerate() {
			match &pool {
				Some(pool) if level.len() > min_work => {
					let chunks = partition(level.len(), nb_workers, min_work);
					trace!(
						level = index,
						nb_instructions = level.len(),
						nb_tasks = chunks.len(),
						"solving level in parallel"
					);
					let results = pool.install(|| {
						chunks
							.par_iter()
							.map(|range| self.solve_instructions(&level[range.clone()]))
							.collect::<Vec<_>>()
					});
					// The first error in instruction order, so the reported failure does not depend
					// on scheduling.
					results.into_iter().collect::<Result<(), _>>()?;
				}
				_ => self.solve_instructions(level)?,
			}
		}
		Ok(())
	}

	fn solve_instructions(&self, instructions: &[u32]) -> Result<(), Error> {
		let mut scratch = Scratch::default();
		for &instruction in instructions {
			self.solve_instruction(instruction, &mut scratch)?;
		}
		Ok(())
	}

	fn solve_instruction(&self, index: u32, scratch: &mut Scratch) -> Result<(), Error> {
		let system = self.system;
		let Some(instruction) = system.instructions().get(index as usize) else {
			bail!(FatalError::MalformedInstruction {
				instruction: index,
				reason: "instruction index out of range".to_string(),
			});
		};
		let blueprint = system
			.blueprint(instruction.blueprint_id)
			.map_err(|err| FatalError::from_system(index, err))?;
		let call_data = system
			.get_call_data(instruction)
			.map_err(|err| FatalError::from_system(index, err))?;
		let constraint = instruction.constraint_offset;

		match blueprint.kind() {
			BlueprintKind::Hint => {
				blueprint.decompress_hint(call_data, &mut scratch.hint)?;
				self.solve_with_hint(&scratch.hint)
			}
			BlueprintKind::R1C => {
				blueprint.decompress_r1c(call_data, &mut scratch.r1c)?;
				self.solve_r1c(constraint, &scratch.r1c)
			}
			BlueprintKind::SparseR1C => {
				let c = &mut scratch.sparse;
				blueprint.decompress_sparse_r1c(call_data, c)?;
				let operands_solved =
					self.solution.is_solved(c.xa)? && self.solution.is_solved(c.xb)?;
				if blueprint.is_solvable() && operands_solved {
					let context = InstructionContext {
						solver: self,
						constraint,
					};
					blueprint.solve(&context, call_data)
				} else {
					self.solve_sparse_r1c(constraint, c)
				}
			}
		}
	}

	fn solve_with_hint(&self, mapping: &HintMapping) -> Result<(), Error> {
		let hints = self.config.hints();
		let (Some(hint), Some(name)) = (hints.get(mapping.hint_id), hints.name(mapping.hint_id)) else {
			let name = self
				.system
				.hint_dependencies()
				.get(&mapping.hint_id)
				.cloned()
				.unwrap_or_else(|| format!("{:#010x}", mapping.hint_id));
			return Err(Error::MissingHints { names: vec![name] });
		};

		let mut inputs = Vec::with_capacity(mapping.inputs.len());
		for expr in &mapping.inputs {
			let mut acc = F::zero();
			for term in expr {
				if term.coeff == COEFF_ID_ZERO {
					continue;
				}
				if is_constant_term(self.system.kind(), term) {
					acc += self.solution.coeff(term.coeff)?;
					continue;
				}
				if !self.solution.is_solved(term.wire)? {
					bail!(FatalError::UnsolvedHintInput {
						wire: term.wire,
						hint: mapping.hint_id,
					});
				}
				self.solution.accumulate_into(term, &mut acc)?;
			}
			inputs.push(acc.to_biguint());
		}

		let mut outputs = vec![BigUint::default(); mapping.outputs.len()];
		hint.call(&self.modulus, &inputs, &mut outputs)
			.map_err(|source| Error::Hint {
				id: mapping.hint_id,
				name: name.to_string(),
				source,
			})?;

		for (&wire, value) in mapping.outputs.iter().zip(&outputs) {
			self.solution.set(wire, F::from_biguint(value))?;
		}
		Ok(())
	}

	fn record_abc(&self, constraint: u32, abc: [F; 3]) -> Result<(), Error> {
		let Some(slot) = self.abc.get(constraint as usize) else {
			bail!(FatalError::MalformedInstruction {
				instruction: constraint,
				reason: "constraint index out of range".to_string(),
			});
		};
		if slot.set(abc).is_err() {
			bail!(FatalError::MalformedInstruction {
				instruction: constraint,
				reason: "constraint solved twice".to_string(),
			});
		}
		Ok(())
	}

	/// Builds the error for a failed constraint, rendering its debug info if any was recorded.
	fn unsatisfied(&self, constraint: u32, reason: String) -> Error {
		let debug_info = self.system.debug_info(constraint).map(|entry| {
			let mut rendered = entry.render(|expr| self.solution.log_value(expr));
			rendered.push_str(&self.system.symbols().format_stack(&entry.stack));
			rendered
		});
		debug!(constraint, %reason, "constraint is not satisfied");
		UnsatisfiedConstraintError {
			constraint,
			reason,
			debug_info,
		}
		.into()
	}

	fn print_logs(&self, logs: &[LogEntry]) {
		for entry in logs {
			let line = entry.render(|expr| self.solution.log_value(expr));
			let stack = self.system.symbols().format_stack(&entry.stack);
			debug!(caller = %entry.caller, "{line}{stack}");
		}
	}

	fn into_output(self) -> Result<SolverOutput<F>, Error> {
		let system = self.system;
		let w = self.solution.into_values()?;
		match system.kind() {
			SystemKind::R1cs => {
				let nb_constraints = self.abc.len();
				let mut a = Vec::with_capacity(nb_constraints);
				let mut b = Vec::with_capacity(nb_constraints);
				let mut c = Vec::with_capacity(nb_constraints);
				for (constraint, slot) in self.abc.into_iter().enumerate() {
					let Some([va, vb, vc]) = slot.into_inner() else {
						bail!(FatalError::MalformedInstruction {
							instruction: constraint as u32,
							reason: "constraint was never solved".to_string(),
						});
					};
					a.push(va);
					b.push(vb);
					c.push(vc);
				}
				Ok(SolverOutput::R1cs(R1csSolution { w, a, b, c }))
			}
			SystemKind::SparseR1cs => {
				let constraints = system
					.get_sparse_constraints()
					.map_err(|err| FatalError::from_system(0, err))?;
				Ok(SolverOutput::SparseR1cs(SparseR1csSolution::new(
					w,
					system.nb_public_variables(),
					&constraints,
				)))
			}
		}
	}
}

/// Splits `len` instructions into contiguous chunks for at most `nb_workers` tasks, each with at
/// least `min_work` instructions when possible. The remainder is spread over the first chunks.
fn partition(len: usize, nb_workers: usize, min_work: usize) -> Vec<Range<usize>> {
	let nb_tasks = nb_workers.min(len.div_ceil(min_work.max(1))).max(1);
	let base = len / nb_tasks;
	let remainder = len % nb_tasks;

	let mut chunks = Vec::with_capacity(nb_tasks);
	let mut start = 0;
	for i in 0..nb_tasks {
		let end = start + base + usize::from(i < remainder);
		chunks.push(start..end);
		start = end;
	}
	chunks
}

/// [`WireSolver`] handed to blueprints that solve their own instructions.
struct InstructionContext<'s, 'a, F: Field> {
	solver: &'s Solver<'a, F>,
	constraint: u32,
}

impl<F: Field> WireSolver<F> for InstructionContext<'_, '_, F> {
	type Error = Error;

	fn coeff(&self, id: CoeffId) -> Result<F, Error> {
		self.solver.solution.coeff(id)
	}

	fn is_solved(&self, wire: WireId) -> Result<bool, Error> {
		self.solver.solution.is_solved(wire)
	}

	fn value(&self, wire: WireId) -> Result<F, Error> {
		self.solver.solution.value(wire)
	}

	fn set_value(&self, wire: WireId, value: F) -> Result<(), Error> {
		self.solver.solution.set(wire, value)
	}

	fn check_equal(&self, lhs: F, rhs: F) -> Result<(), Error> {
		if lhs == rhs {
			return Ok(());
		}
		Err(self.solver.unsatisfied(
			self.constraint,
			format!("{} != {}", lhs.to_decimal_string(), rhs.to_decimal_string()),
		))
	}
}
