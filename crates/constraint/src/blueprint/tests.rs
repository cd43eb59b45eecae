// Copyright 2024-2025 Irreducible Inc.

use std::cell::RefCell;

use assert_matches::assert_matches;
use proptest::prelude::*;
use zkc_field::{Field, TinyField};

use super::*;
use crate::{
	coeff::{COEFF_ID_MINUS_ONE, COEFF_ID_ONE, COEFF_ID_TWO},
	constraint::CommitmentConstraint,
	term::Term,
};

fn arb_term() -> impl Strategy<Value = Term> {
	(any::<u32>(), any::<u32>()).prop_map(|(coeff, wire)| Term::new(coeff, wire))
}

fn arb_expression() -> impl Strategy<Value = Vec<Term>> {
	prop::collection::vec(arb_term(), 0..6)
}

fn arb_commitment() -> impl Strategy<Value = CommitmentConstraint> {
	prop_oneof![
		Just(CommitmentConstraint::Not),
		Just(CommitmentConstraint::Committed),
		Just(CommitmentConstraint::Commitment),
	]
}

proptest! {
	#[test]
	fn test_generic_r1c_round_trip(l in arb_expression(), r in arb_expression(), o in arb_expression()) {
		let c = R1C::new(l, r, o);
		let mut call_data = vec![42];
		Blueprint::GenericR1C.compress_r1c(&c, &mut call_data).unwrap();

		let range = &call_data[1..];
		prop_assert_eq!(Blueprint::GenericR1C.call_data_len(range).unwrap(), range.len());

		let mut decoded = R1C::new(vec![Term::wire(9)], vec![], vec![]);
		Blueprint::GenericR1C.decompress_r1c(range, &mut decoded).unwrap();
		prop_assert_eq!(decoded, c);
	}

	#[test]
	fn test_generic_sparse_round_trip(
		wires in prop::array::uniform3(any::<u32>()),
		coeffs in prop::array::uniform5(any::<u32>()),
		commitment in arb_commitment(),
	) {
		let c = SparseR1C {
			xa: wires[0],
			xb: wires[1],
			xc: wires[2],
			ql: coeffs[0],
			qr: coeffs[1],
			qo: coeffs[2],
			qm: coeffs[3],
			qc: coeffs[4],
			commitment,
		};
		let mut call_data = Vec::new();
		Blueprint::GenericSparseR1C.compress_sparse_r1c(&c, &mut call_data).unwrap();
		prop_assert_eq!(call_data.len(), Blueprint::GenericSparseR1C.nb_inputs().unwrap());

		let mut decoded = SparseR1C::default();
		Blueprint::GenericSparseR1C.decompress_sparse_r1c(&call_data, &mut decoded).unwrap();
		prop_assert_eq!(decoded, c);
	}

	#[test]
	fn test_hint_round_trip(
		hint_id in any::<u32>(),
		inputs in prop::collection::vec(arb_expression(), 0..4),
		outputs in prop::collection::vec(any::<u32>(), 0..4),
	) {
		let h = HintMapping::new(hint_id, inputs, outputs);
		let mut call_data = Vec::new();
		Blueprint::GenericHint.compress_hint(&h, &mut call_data).unwrap();
		prop_assert_eq!(Blueprint::GenericHint.call_data_len(&call_data).unwrap(), call_data.len());

		let mut decoded = HintMapping::default();
		Blueprint::GenericHint.decompress_hint(&call_data, &mut decoded).unwrap();
		prop_assert_eq!(decoded, h);
	}
}

#[test]
fn test_specialized_sparse_round_trip() {
	let mul = SparseR1C {
		xa: 1,
		xb: 2,
		xc: 3,
		qm: 7,
		qo: COEFF_ID_MINUS_ONE,
		..Default::default()
	};
	let add = SparseR1C {
		xa: 1,
		xb: 2,
		xc: 3,
		ql: COEFF_ID_TWO,
		qr: 8,
		qo: COEFF_ID_MINUS_ONE,
		qc: 9,
		..Default::default()
	};
	let boolean = SparseR1C {
		xa: 4,
		xb: 4,
		xc: 4,
		ql: COEFF_ID_MINUS_ONE,
		qm: COEFF_ID_ONE,
		..Default::default()
	};

	for (blueprint, c) in [
		(Blueprint::SparseR1CMul, mul),
		(Blueprint::SparseR1CAdd, add),
		(Blueprint::SparseR1CBool, boolean),
	] {
		let mut call_data = Vec::new();
		blueprint.compress_sparse_r1c(&c, &mut call_data).unwrap();
		assert_eq!(Some(call_data.len()), blueprint.nb_inputs());

		let mut decoded = SparseR1C::default();
		blueprint
			.decompress_sparse_r1c(&call_data, &mut decoded)
			.unwrap();
		assert_eq!(decoded, c, "{blueprint:?}");
	}
}

#[test]
fn test_mul_accepts_unset_output_coefficient() {
	let c = SparseR1C {
		xa: 1,
		xb: 2,
		xc: 3,
		qm: COEFF_ID_ONE,
		..Default::default()
	};
	let mut call_data = Vec::new();
	Blueprint::SparseR1CMul
		.compress_sparse_r1c(&c, &mut call_data)
		.unwrap();
	assert_eq!(call_data, vec![COEFF_ID_ONE, 1, 2, 3]);
}

#[test]
fn test_shape_mismatch() {
	let c = SparseR1C {
		ql: COEFF_ID_ONE,
		qm: COEFF_ID_ONE,
		qo: COEFF_ID_MINUS_ONE,
		..Default::default()
	};
	assert_matches!(
		Blueprint::SparseR1CMul.compress_sparse_r1c(&c, &mut Vec::new()),
		Err(Error::ShapeMismatch {
			blueprint: Blueprint::SparseR1CMul,
			..
		})
	);
	assert_matches!(
		Blueprint::SparseR1CAdd.compress_sparse_r1c(&c, &mut Vec::new()),
		Err(Error::ShapeMismatch { .. })
	);
}

#[test]
fn test_unsupported_capabilities() {
	let mut r1c = R1C::default();
	assert_matches!(
		Blueprint::GenericSparseR1C.decompress_r1c(&[0; 9], &mut r1c),
		Err(Error::Unsupported {
			capability: Capability::R1C,
			..
		})
	);
	let mut hint = HintMapping::default();
	assert_matches!(
		Blueprint::GenericR1C.decompress_hint(&[3, 0, 0], &mut hint),
		Err(Error::Unsupported {
			capability: Capability::Hint,
			..
		})
	);
	assert!(!Blueprint::GenericR1C.is_solvable());
	assert_eq!(Blueprint::GenericHint.nb_constraints(), 0);
}

#[test]
fn test_call_data_len_bounds() {
	assert_matches!(Blueprint::GenericR1C.call_data_len(&[]), Err(Error::MalformedCallData { .. }));
	assert_matches!(Blueprint::GenericR1C.call_data_len(&[5, 0, 0]), Err(Error::MalformedCallData { .. }));
	assert_matches!(Blueprint::SparseR1CMul.call_data_len(&[1, 2, 3]), Err(Error::MalformedCallData { .. }));
	assert_eq!(Blueprint::SparseR1CMul.call_data_len(&[1, 2, 3, 4, 5]), Ok(4));
}

#[test]
fn test_blueprint_tag_serialization() {
	for blueprint in Blueprint::ALL {
		let mut buf = Vec::new();
		blueprint.serialize(&mut buf).unwrap();
		assert_eq!(Blueprint::deserialize(buf.as_slice()).unwrap(), blueprint);
	}
	assert_matches!(
		Blueprint::deserialize([17u8].as_slice()),
		Err(SerializationError::UnknownEnumVariant { index: 17, .. })
	);
}

/// In-memory solver over a small wire vector.
struct MockSolver {
	coeffs: Vec<TinyField>,
	values: RefCell<Vec<Option<TinyField>>>,
}

#[derive(Debug, PartialEq)]
enum MockError {
	Blueprint(Error),
	Unsolved(WireId),
	Unsatisfied,
}

impl From<Error> for MockError {
	fn from(err: Error) -> Self {
		Self::Blueprint(err)
	}
}

impl MockSolver {
	fn new(values: Vec<Option<u64>>) -> Self {
		let mut coeffs = crate::coeff::reserved_coeffs::<TinyField>().to_vec();
		coeffs.push(TinyField::from_u64(5));
		Self {
			coeffs,
			values: RefCell::new(
				values
					.into_iter()
					.map(|v| v.map(TinyField::from_u64))
					.collect(),
			),
		}
	}

	fn get(&self, wire: WireId) -> Option<TinyField> {
		self.values.borrow()[wire as usize]
	}
}

impl WireSolver<TinyField> for MockSolver {
	type Error = MockError;

	fn coeff(&self, id: CoeffId) -> Result<TinyField, MockError> {
		Ok(self.coeffs[id as usize])
	}

	fn is_solved(&self, wire: WireId) -> Result<bool, MockError> {
		Ok(self.get(wire).is_some())
	}

	fn value(&self, wire: WireId) -> Result<TinyField, MockError> {
		self.get(wire).ok_or(MockError::Unsolved(wire))
	}

	fn set_value(&self, wire: WireId, value: TinyField) -> Result<(), MockError> {
		self.values.borrow_mut()[wire as usize] = Some(value);
		Ok(())
	}

	fn check_equal(&self, lhs: TinyField, rhs: TinyField) -> Result<(), MockError> {
		if lhs == rhs {
			Ok(())
		} else {
			Err(MockError::Unsatisfied)
		}
	}
}

#[test]
fn test_direct_solve_mul() {
	let solver = MockSolver::new(vec![Some(2), Some(3), None]);
	Blueprint::SparseR1CMul
		.solve(&solver, &[COEFF_ID_ONE, 0, 1, 2])
		.unwrap();
	assert_eq!(solver.get(2), Some(TinyField::from_u64(6)));

	// qM = 5: 5 * 2 * 3 = 30, which disagrees with the value now held by wire 2.
	assert_eq!(
		Blueprint::SparseR1CMul.solve(&solver, &[5, 0, 1, 2]),
		Err(MockError::Unsatisfied)
	);
}

#[test]
fn test_direct_solve_add() {
	let solver = MockSolver::new(vec![Some(2), Some(3), None]);
	// 2 * 2 + 5 * 3 + 1 = 20
	Blueprint::SparseR1CAdd
		.solve(&solver, &[0, 1, 2, COEFF_ID_TWO, 5, COEFF_ID_ONE])
		.unwrap();
	assert_eq!(solver.get(2), Some(TinyField::from_u64(20)));
}

#[test]
fn test_direct_solve_bool() {
	// -x + x^2 == 0 holds for 0 and 1 only.
	for (x, ok) in [(0, true), (1, true), (2, false)] {
		let solver = MockSolver::new(vec![Some(x)]);
		let result = Blueprint::SparseR1CBool.solve(&solver, &[0, COEFF_ID_MINUS_ONE, COEFF_ID_ONE]);
		assert_eq!(result.is_ok(), ok, "x = {x}");
	}

	let solver = MockSolver::new(vec![None]);
	assert_eq!(
		Blueprint::SparseR1CBool.solve(&solver, &[0, COEFF_ID_MINUS_ONE, COEFF_ID_ONE]),
		Err(MockError::Unsolved(0))
	);
}

#[test]
fn test_generic_blueprints_have_no_direct_solver() {
	let solver = MockSolver::new(vec![Some(1)]);
	assert_matches!(
		Blueprint::GenericSparseR1C.solve(&solver, &[0; 9]),
		Err(MockError::Blueprint(Error::Unsupported {
			capability: Capability::Solve,
			..
		}))
	);
}
