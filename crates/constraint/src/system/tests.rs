// Copyright 2024-2025 Irreducible Inc.

use assert_matches::assert_matches;
use zkc_field::{Bn254Fr, Field, TinyField};
use zkc_utils::serialization::SerializationError;

use super::*;
use crate::{
	coeff::{COEFF_ID_MINUS_ONE, COEFF_ID_ONE},
	hint::INV_ZERO,
};

struct Sample {
	system: System<TinyField>,
	x: WireId,
	y: WireId,
	v0: WireId,
	v1: WireId,
}

/// `v0 = x ⋅ y`, `v1 = inv_zero(v0)`, `v0 ⋅ v1 == 1`.
fn sample() -> Sample {
	let mut system = System::new(SystemKind::R1cs);
	let x = system.add_public_variable("x").unwrap();
	let y = system.add_secret_variable("y").unwrap();
	let v0 = system.add_internal_variable();
	let v1 = system.add_internal_variable();
	let r1c = system.add_blueprint(Blueprint::GenericR1C);
	let hint = system.add_blueprint(Blueprint::GenericHint);

	system
		.add_r1c(&R1C::new(vec![Term::wire(x)], vec![Term::wire(y)], vec![Term::wire(v0)]), r1c)
		.unwrap();
	system
		.add_hint(&HintMapping::new(hint_id(INV_ZERO), vec![vec![Term::wire(v0)]], vec![v1]), INV_ZERO, hint)
		.unwrap();
	system
		.add_r1c(
			&R1C::new(vec![Term::wire(v0)], vec![Term::wire(v1)], vec![Term::wire(ONE_WIRE)]),
			r1c,
		)
		.unwrap();

	Sample {
		system,
		x,
		y,
		v0,
		v1,
	}
}

#[test]
fn test_variable_layout() {
	let Sample { system, x, y, v0, v1 } = sample();
	assert_eq!((x, y, v0, v1), (1, 2, 3, 4));
	assert_eq!(system.public_variables(), &["1".to_string(), "x".to_string()]);
	assert_eq!(system.nb_inputs(), 3);
	assert_eq!(system.nb_wires(), 5);
	assert_eq!(system.witness_len(), 2);

	let sparse = System::<TinyField>::new(SystemKind::SparseR1cs);
	assert_eq!(sparse.nb_public_variables(), 0);
	assert_eq!(sparse.witness_len(), 0);
}

#[test]
fn test_variable_order_is_enforced() {
	let mut system = System::<TinyField>::new(SystemKind::SparseR1cs);
	system.add_secret_variable("s").unwrap();
	assert_matches!(system.add_public_variable("p"), Err(Error::VariableOrder { .. }));
	system.add_internal_variable();
	assert_matches!(system.add_secret_variable("t"), Err(Error::VariableOrder { .. }));
}

#[test]
fn test_instructions_and_levels() {
	let Sample { system, v0, v1, .. } = sample();
	assert_eq!(system.nb_instructions(), 3);
	assert_eq!(system.nb_constraints(), 2);
	assert_eq!(
		system
			.instructions()
			.iter()
			.map(|i| i.constraint_offset)
			.collect::<Vec<_>>(),
		vec![0, 1, 1]
	);
	assert_eq!(system.levels(), &[vec![0], vec![1], vec![2]]);
	assert_eq!(system.levels.wire_level(v0), Some(0));
	assert_eq!(system.levels.wire_level(v1), Some(1));
	assert_eq!(system.hint_dependencies().get(&hint_id(INV_ZERO)).map(String::as_str), Some(INV_ZERO));
}

#[test]
fn test_get_constraints_skips_hints() {
	let Sample { system, x, y, v0, v1 } = sample();
	let constraints = system.get_constraints().unwrap();
	assert_eq!(
		constraints,
		vec![
			R1C::new(vec![Term::wire(x)], vec![Term::wire(y)], vec![Term::wire(v0)]),
			R1C::new(vec![Term::wire(v0)], vec![Term::wire(v1)], vec![Term::wire(ONE_WIRE)]),
		]
	);
	assert_eq!(constraints[0].display(&system), "x ⋅ y == v0");
	assert_matches!(system.get_sparse_constraints(), Err(Error::Blueprint(_)));
}

#[test]
fn test_sparse_constraints() {
	let mut system = System::<TinyField>::new(SystemKind::SparseR1cs);
	let a = system.add_public_variable("a").unwrap();
	let b = system.add_internal_variable();
	let generic = system.add_blueprint(Blueprint::GenericSparseR1C);
	let add = system.add_blueprint(Blueprint::SparseR1CAdd);
	let three = system.add_coeff(TinyField::from_u64(3));

	// b = 3⋅a + 1
	let gate = SparseR1C {
		xa: a,
		xc: b,
		ql: three,
		qo: COEFF_ID_MINUS_ONE,
		qc: COEFF_ID_ONE,
		..Default::default()
	};
	assert_eq!(system.add_sparse_r1c(&gate, add).unwrap(), 0);
	assert_eq!(system.add_sparse_r1c(&gate, generic).unwrap(), 1);
	assert_eq!(system.get_sparse_constraints().unwrap(), vec![gate, gate]);
	assert_eq!(system.levels(), &[vec![0], vec![1]]);
	assert_eq!(gate.display(&system), "3⋅a + 0⋅a + -v0 + 1 == 0");
}

#[test]
fn test_blueprint_kind_checks() {
	let Sample { mut system, x, .. } = sample();
	let sparse = system.add_blueprint(Blueprint::GenericSparseR1C);
	let hint = system.add_blueprint(Blueprint::GenericHint);
	assert_eq!(system.add_blueprint(Blueprint::GenericHint), hint);

	assert_matches!(
		system.add_sparse_r1c(&SparseR1C::default(), sparse),
		Err(Error::SystemKindMismatch {
			kind: SystemKind::R1cs,
			got: BlueprintKind::SparseR1C
		})
	);
	assert_matches!(
		system.add_r1c(&R1C::default(), hint),
		Err(Error::BlueprintKindMismatch {
			expected: BlueprintKind::R1C,
			got: BlueprintKind::Hint,
			..
		})
	);
	assert_matches!(system.add_r1c(&R1C::default(), 17), Err(Error::UnknownBlueprint { id: 17 }));

	let r1c = system.add_blueprint(Blueprint::GenericR1C);
	let out_of_range = R1C::new(vec![Term::wire(x)], vec![Term::wire(99)], vec![]);
	assert_matches!(
		system.add_r1c(&out_of_range, r1c),
		Err(Error::WireOutOfRange { wire: 99, nb_wires: 5 })
	);
	let bad_coeff = R1C::new(vec![Term::new(1000, x)], vec![], vec![]);
	assert_matches!(system.add_r1c(&bad_coeff, r1c), Err(Error::CoeffOutOfRange { coeff: 1000, .. }));
	assert_eq!(system.nb_instructions(), 3);
}

#[test]
fn test_hint_outputs_must_be_fresh() {
	let Sample {
		mut system,
		x,
		v0,
		..
	} = sample();
	let hint = system.add_blueprint(Blueprint::GenericHint);
	let v2 = system.add_internal_variable();
	let inputs = vec![vec![Term::wire(x)]];
	let call_data_len = system.call_data().len();

	let mismatched = HintMapping::new(7, inputs.clone(), vec![v2]);
	assert_matches!(
		system.add_hint(&mismatched, INV_ZERO, hint),
		Err(Error::HintIdMismatch { got: 7, .. })
	);

	let id = hint_id(INV_ZERO);
	for outputs in [vec![x], vec![v0], vec![v2, v2]] {
		let mapping = HintMapping::new(id, inputs.clone(), outputs);
		assert_matches!(system.add_hint(&mapping, INV_ZERO, hint), Err(Error::WireAlreadyDefined { .. }));
	}
	assert_eq!(system.call_data().len(), call_data_len);

	system
		.add_hint(&HintMapping::new(id, inputs, vec![v2]), INV_ZERO, hint)
		.unwrap();
	assert_eq!(system.levels.wire_level(v2), Some(0));
}

#[test]
fn test_resolver() {
	let Sample { system, .. } = sample();
	let names = (0..6)
		.map(|wire| system.variable_to_string(wire))
		.collect::<Vec<_>>();
	assert_eq!(names, vec!["1", "x", "y", "v0", "v1", "<wire #5>"]);
	assert_eq!(system.coeff_to_string(COEFF_ID_MINUS_ONE), "46");
}

#[test]
fn test_debug_info() {
	let Sample {
		mut system, v0, v1, ..
	} = sample();
	let entry = LogEntry::new("{} ⋅ {} == 1", vec![vec![Term::wire(v0)], vec![Term::wire(v1)]]);
	system.add_debug_info(1, entry.clone()).unwrap();
	assert_eq!(system.debug_info(1), Some(&entry));
	assert_eq!(system.debug_info(0), None);
	assert_matches!(
		system.add_debug_info(2, entry),
		Err(Error::ConstraintOutOfRange {
			constraint: 2,
			nb_constraints: 2
		})
	);

	assert_matches!(
		system.add_log(LogEntry::new("{}", vec![vec![Term::wire(42)]])),
		Err(Error::WireOutOfRange { wire: 42, .. })
	);
}

#[test]
fn test_set_levels() {
	let Sample { mut system, .. } = sample();
	assert_matches!(system.set_levels(vec![vec![0, 1]]), Err(Error::InvalidLevels { .. }));
	assert_eq!(system.nb_levels(), 3);

	system.set_levels(vec![vec![0], vec![1, 2]]).unwrap();
	assert_eq!(system.levels(), &[vec![0], vec![1, 2]]);
}

#[test]
fn test_unconstrained_wires() {
	let mut system = System::<TinyField>::new(SystemKind::R1cs);
	let x = system.add_public_variable("x").unwrap();
	system.add_secret_variable("unused").unwrap();
	let v0 = system.add_internal_variable();
	let v1 = system.add_internal_variable();
	let r1c = system.add_blueprint(Blueprint::GenericR1C);
	let hint = system.add_blueprint(Blueprint::GenericHint);
	system
		.add_r1c(&R1C::new(vec![Term::wire(x)], vec![Term::wire(x)], vec![Term::wire(v0)]), r1c)
		.unwrap();
	system
		.add_hint(&HintMapping::new(hint_id(INV_ZERO), vec![vec![Term::wire(v0)]], vec![v1]), INV_ZERO, hint)
		.unwrap();

	let expected = UnconstrainedWires {
		inputs: vec!["unused".to_string()],
		nb_hint_outputs: 1,
	};
	assert_eq!(system.check_unconstrained_wires(UnconstrainedWirePolicy::Allow).unwrap(), expected);
	assert_eq!(system.check_unconstrained_wires(UnconstrainedWirePolicy::Warn).unwrap(), expected);
	assert_matches!(
		system.check_unconstrained_wires(UnconstrainedWirePolicy::Deny),
		Err(Error::UnconstrainedWires { nb_hint_outputs: 1, .. })
	);

	let Sample { system, .. } = sample();
	assert!(system
		.check_unconstrained_wires(UnconstrainedWirePolicy::Deny)
		.unwrap()
		.is_empty());
}

#[test]
fn test_serialization_round_trip() {
	let Sample {
		mut system, v0, v1, ..
	} = sample();
	let location = system.symbols_mut().add_location("main", "main.rs", 12);
	system
		.add_debug_info(
			1,
			LogEntry::new("{} ⋅ {} == 1", vec![vec![Term::wire(v0)], vec![Term::wire(v1)]])
				.with_stack(vec![location]),
		)
		.unwrap();
	system
		.add_log(LogEntry::new("v0 = {}", vec![vec![Term::wire(v0)]]).with_caller("main.rs:13"))
		.unwrap();
	system.add_coeff(TinyField::from_u64(9));

	let bytes = system.to_bytes().unwrap();
	let decoded = System::<TinyField>::read_from(&bytes).unwrap();

	assert_eq!(decoded.kind(), system.kind());
	assert_eq!(decoded.nb_constraints(), system.nb_constraints());
	assert_eq!(decoded.call_data(), system.call_data());
	assert_eq!(decoded.instructions(), system.instructions());
	assert_eq!(decoded.blueprints(), system.blueprints());
	assert_eq!(decoded.levels(), system.levels());
	assert_eq!(decoded.levels, system.levels);
	assert_eq!(decoded.coefficients().coefficients(), system.coefficients().coefficients());
	assert_eq!(decoded.public_variables(), system.public_variables());
	assert_eq!(decoded.secret_variables(), system.secret_variables());
	assert_eq!(decoded.nb_internal_variables(), system.nb_internal_variables());
	assert_eq!(decoded.debug_info(1), system.debug_info(1));
	assert_eq!(decoded.logs(), system.logs());
	assert_eq!(decoded.symbols(), system.symbols());
	assert_eq!(decoded.hint_dependencies(), system.hint_dependencies());
	assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn test_read_errors_report_offset() {
	let Sample { system, .. } = sample();
	let bytes = system.to_bytes().unwrap();

	let mut bad_magic = bytes.clone();
	bad_magic[0] = b'X';
	assert_matches!(
		System::<TinyField>::read_from(&bad_magic),
		Err(ReadError {
			offset: 4,
			source: SerializationError::InvalidConstruction {
				name: "System::magic"
			}
		})
	);

	let mut bad_version = bytes.clone();
	bad_version[4] = 0xff;
	assert_matches!(
		System::<TinyField>::read_from(&bad_version),
		Err(ReadError {
			offset: 8,
			source: SerializationError::InvalidConstruction {
				name: "System::version"
			}
		})
	);

	let mut trailing = bytes.clone();
	trailing.push(0);
	assert_matches!(
		System::<TinyField>::read_from(&trailing),
		Err(ReadError { offset, .. }) if offset == bytes.len()
	);

	let truncated = &bytes[..bytes.len() - 1];
	assert!(System::<TinyField>::read_from(truncated).is_err());

	assert!(System::<Bn254Fr>::read_from(&bytes).is_err());
}

#[test]
fn test_read_rejects_out_of_range_operands() {
	let Sample { system, .. } = sample();
	// Words 7 and 8 are the coefficient and wire of the first constraint's output term.
	assert_eq!(system.call_data[8], system.nb_public_variables() as u32 + 1);

	let mut bad_wire = system.clone();
	bad_wire.call_data[8] = u32::MAX - 1;
	let bytes = bad_wire.to_bytes().unwrap();
	assert_matches!(
		System::<TinyField>::read_from(&bytes),
		Err(ReadError {
			source: SerializationError::InvalidConstruction {
				name: "System::wire"
			},
			..
		})
	);

	let mut bad_coeff = system.clone();
	bad_coeff.call_data[7] = 200;
	let bytes = bad_coeff.to_bytes().unwrap();
	assert_matches!(
		System::<TinyField>::read_from(&bytes),
		Err(ReadError {
			source: SerializationError::InvalidConstruction {
				name: "System::coefficient"
			},
			..
		})
	);
}

#[test]
fn test_read_rejects_oversized_hint_input_count() {
	let Sample { mut system, .. } = sample();
	// The hint starts right after the first constraint; word 11 is its input count.
	assert_eq!(system.call_data[9..12], [7, hint_id(INV_ZERO), 1]);
	system.call_data[11] = u32::MAX;

	let bytes = system.to_bytes().unwrap();
	assert_matches!(
		System::<TinyField>::read_from(&bytes),
		Err(ReadError {
			source: SerializationError::InvalidConstruction {
				name: "System::call_data"
			},
			..
		})
	);
}
