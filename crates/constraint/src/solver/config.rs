// Copyright 2024-2025 Irreducible Inc.

use std::sync::Arc;

use zkc_utils::{
	env::{boolean_env_flag_set, usize_env_var},
	rayon::default_num_workers,
};

use crate::hint::{Hint, HintRegistry};

/// Levels with at most this many instructions per worker are solved on the calling thread.
pub const DEFAULT_MIN_WORK_PER_WORKER: usize = 50;

/// Overrides the number of solver workers.
pub const WORKERS_ENV_VAR: &str = "ZKC_SOLVER_WORKERS";
/// Disables rendering of circuit log statements when set.
pub const NO_LOGS_ENV_VAR: &str = "ZKC_SOLVER_NO_LOGS";

/// Options of [`System::solve`](crate::system::System::solve).
#[derive(Debug, Clone)]
pub struct SolverConfig {
	hints: HintRegistry,
	nb_workers: usize,
	min_work_per_worker: usize,
	logs: bool,
}

impl Default for SolverConfig {
	fn default() -> Self {
		Self {
			hints: HintRegistry::with_builtins(),
			nb_workers: default_num_workers(),
			min_work_per_worker: DEFAULT_MIN_WORK_PER_WORKER,
			logs: true,
		}
	}
}

impl SolverConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// The default configuration, adjusted by [`WORKERS_ENV_VAR`] and [`NO_LOGS_ENV_VAR`].
	pub fn from_env() -> Self {
		let mut config = Self::default();
		if let Some(nb_workers) = usize_env_var(WORKERS_ENV_VAR) {
			config.nb_workers = nb_workers;
		}
		if boolean_env_flag_set(NO_LOGS_ENV_VAR) {
			config.logs = false;
		}
		config
	}

	pub fn with_hint(mut self, name: impl Into<String>, hint: impl Hint + 'static) -> Self {
		self.hints.register(name, hint);
		self
	}

	pub fn with_hint_arc(mut self, name: impl Into<String>, hint: Arc<dyn Hint>) -> Self {
		self.hints.register_arc(name, hint);
		self
	}

	pub fn with_hints(mut self, hints: &HintRegistry) -> Self {
		self.hints.extend(hints);
		self
	}

	/// Number of threads a level may be split across. `1` disables parallel solving.
	pub fn with_workers(mut self, nb_workers: usize) -> Self {
		self.nb_workers = nb_workers.max(1);
		self
	}

	pub fn with_min_work_per_worker(mut self, min_work_per_worker: usize) -> Self {
		self.min_work_per_worker = min_work_per_worker.max(1);
		self
	}

	/// Whether circuit log statements are rendered after solving.
	pub fn with_logs(mut self, logs: bool) -> Self {
		self.logs = logs;
		self
	}

	pub fn hints(&self) -> &HintRegistry {
		&self.hints
	}

	pub fn nb_workers(&self) -> usize {
		self.nb_workers
	}

	pub fn min_work_per_worker(&self) -> usize {
		self.min_work_per_worker
	}

	pub fn logs(&self) -> bool {
		self.logs
	}
}
