// Copyright 2024 Irreducible Inc.

/// Read boolean flag from the environment variable.
pub fn boolean_env_flag_set(flag: &str) -> bool {
	match std::env::var(flag) {
		Ok(val) => ["1", "on", "ON", "true", "TRUE", "yes", "YES"].contains(&val.as_str()),
		Err(_) => false,
	}
}

/// Read a positive integer from the environment variable.
///
/// Returns `None` when the variable is unset, empty, zero or not a valid integer.
pub fn usize_env_var(var: &str) -> Option<usize> {
	std::env::var(var)
		.ok()
		.and_then(|val| val.trim().parse::<usize>().ok())
		.filter(|&val| val > 0)
}
