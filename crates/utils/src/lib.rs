// Copyright 2024-2025 Irreducible Inc.

pub mod env;
pub mod error_utils;
pub mod rayon;
pub mod serialization;
pub mod tracing;

pub use serialization::{DeserializeBytes, SerializationError, SerializeBytes};
