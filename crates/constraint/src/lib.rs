// Copyright 2024-2025 Irreducible Inc.

//! Compressed constraint systems over prime fields and their parallel witness solver.
//!
//! A [`System`] stores R1CS or PlonK-ish sparse constraints as instructions over a flat call
//! data buffer, together with the dependency levels [`System::solve`] uses to compute the full
//! witness from the public and secret inputs.

pub mod blueprint;
pub mod coeff;
pub mod constraint;
pub mod debug;
pub mod hint;
pub mod solver;
pub mod system;
pub mod term;

pub use blueprint::{Blueprint, BlueprintId};
pub use coeff::{CoeffId, CoeffTable};
pub use constraint::{CommitmentConstraint, SparseR1C, R1C};
pub use hint::{hint_id, Hint, HintId, HintMapping, HintRegistry};
pub use solver::{SolverConfig, SolverOutput};
pub use system::{System, SystemKind};
pub use term::{LinearExpression, Term, WireId, ONE_WIRE};
pub use zkc_field::{Bn254Fr, Field, TinyField};
