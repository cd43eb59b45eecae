// Copyright 2024 Irreducible Inc.

/// Number of worker threads a parallel task should be split across by default.
pub fn default_num_workers() -> usize {
	rayon::current_num_threads().max(1)
}

/// Builds a dedicated pool of `num_threads` workers.
pub fn build_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
	rayon::ThreadPoolBuilder::new()
		.num_threads(num_threads.max(1))
		.thread_name(|i| format!("zkc-worker-{i}"))
		.build()
}
