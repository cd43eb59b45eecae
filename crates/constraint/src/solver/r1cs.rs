// Copyright 2024-2025 Irreducible Inc.

use zkc_field::Field;
use zkc_utils::bail;

use super::{
	error::{Error, FatalError},
	solution::div_by_coeff,
	Solver,
};
use crate::{constraint::R1C, term::Term};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
	L,
	R,
	O,
}

impl<F: Field> Solver<'_, F> {
	/// Solves the single unsolved term of `r1c`, if any, then checks `a ⋅ b == c`.
	///
	/// Records the evaluated `(a, b, c)` of the constraint for the R1CS solution vectors.
	pub(super) fn solve_r1c(&self, constraint: u32, r1c: &R1C) -> Result<(), Error> {
		let mut acc = [F::zero(); 3];
		let mut unknown: Option<(Side, Term)> = None;

		for (side, expr) in [(Side::L, &r1c.l), (Side::R, &r1c.r), (Side::O, &r1c.o)] {
			let sum = &mut acc[side as usize];
			for term in expr {
				if self.solution.is_solved(term.wire)? {
					self.solution.accumulate_into(term, sum)?;
					continue;
				}
				if unknown.is_some() {
					bail!(FatalError::MultipleUnsolvedTerms { constraint });
				}
				unknown = Some((side, *term));
			}
		}

		let [mut a, mut b, mut c] = acc;
		if let Some((side, term)) = unknown {
			// Value of `coeff * wire` making the constraint hold.
			let value = match side {
				Side::L if !b.is_zero() => {
					let value = c * b.inverse().unwrap_or_default() - a;
					a += value;
					value
				}
				Side::R if !a.is_zero() => {
					let value = c * a.inverse().unwrap_or_default() - b;
					b += value;
					value
				}
				Side::L | Side::R => {
					// The unknown does not affect the product; any value works if the rest holds.
					if !c.is_zero() {
						return Err(self.unsatisfied(
							constraint,
							format!(
								"{} ⋅ {} != {}",
								a.to_decimal_string(),
								b.to_decimal_string(),
								c.to_decimal_string()
							),
						));
					}
					F::zero()
				}
				Side::O => {
					let value = a * b - c;
					c += value;
					value
				}
			};
			let coeff = self.solution.coeff(term.coeff)?;
			let wire_value = div_by_coeff(value, term.coeff, coeff)?;
			self.solution.set(term.wire, wire_value)?;
		} else if a * b != c {
			return Err(self.unsatisfied(
				constraint,
				format!(
					"{} ⋅ {} != {}",
					a.to_decimal_string(),
					b.to_decimal_string(),
					c.to_decimal_string()
				),
			));
		}

		self.record_abc(constraint, [a, b, c])
	}
}

#[cfg(test)]
mod tests {
	use assert_matches::assert_matches;
	use zkc_field::{Field, TinyField};

	use crate::{
		blueprint::Blueprint,
		constraint::R1C,
		solver::{Error, FatalError, SolverConfig, SolverOutput},
		system::{System, SystemKind},
		term::{Term, ONE_WIRE},
	};

	fn f(value: i64) -> TinyField {
		TinyField::from_i64(value)
	}

	fn solve(system: &System<TinyField>, witness: &[i64]) -> Result<SolverOutput<TinyField>, Error> {
		let witness = witness.iter().map(|&v| f(v)).collect::<Vec<_>>();
		system.solve(&witness, &SolverConfig::new().with_workers(1))
	}

	/// `x + 5 == y`, i.e. `(x + 5) ⋅ 1 == y` with `y` internal.
	#[test]
	fn test_solves_output_side() {
		let mut system = System::<TinyField>::new(SystemKind::R1cs);
		let x = system.add_secret_variable("x").unwrap();
		let y = system.add_internal_variable();
		let five = system.make_term(f(5), ONE_WIRE);
		let blueprint = system.add_blueprint(Blueprint::GenericR1C);
		system
			.add_r1c(&R1C::new(vec![Term::wire(x), five], vec![Term::wire(ONE_WIRE)], vec![Term::wire(y)]), blueprint)
			.unwrap();

		let output = solve(&system, &[3]).unwrap();
		assert_eq!(output.witness(), &[f(1), f(3), f(8)]);
		let SolverOutput::R1cs(solution) = output else {
			panic!("expected an R1CS solution");
		};
		assert_eq!((solution.a[0], solution.b[0], solution.c[0]), (f(8), f(1), f(8)));
	}

	/// `x ⋅ (-2⋅z) == 12` solves `z` through its coefficient.
	#[test]
	fn test_solves_left_side_with_coefficient() {
		let mut system = System::<TinyField>::new(SystemKind::R1cs);
		let x = system.add_secret_variable("x").unwrap();
		let z = system.add_internal_variable();
		let minus_two_z = system.make_term(f(-2), z);
		let twelve = system.make_term(f(12), ONE_WIRE);
		let blueprint = system.add_blueprint(Blueprint::GenericR1C);
		system
			.add_r1c(&R1C::new(vec![Term::wire(x)], vec![minus_two_z], vec![twelve]), blueprint)
			.unwrap();

		let output = solve(&system, &[3]).unwrap();
		// 3 ⋅ (-2 ⋅ z) = 12 => z = -2
		assert_eq!(output.witness()[z as usize], f(-2));
	}

	#[test]
	fn test_zero_factor() {
		let mut system = System::<TinyField>::new(SystemKind::R1cs);
		let x = system.add_secret_variable("x").unwrap();
		let z = system.add_internal_variable();
		let blueprint = system.add_blueprint(Blueprint::GenericR1C);
		system
			.add_r1c(&R1C::new(vec![Term::wire(z)], vec![Term::wire(x)], vec![]), blueprint)
			.unwrap();

		// z ⋅ 0 == 0 holds for any z; the solver picks zero.
		let output = solve(&system, &[0]).unwrap();
		assert_eq!(output.witness()[z as usize], f(0));
	}

	#[test]
	fn test_two_unknowns_is_fatal() {
		let mut system = System::<TinyField>::new(SystemKind::R1cs);
		let x = system.add_secret_variable("x").unwrap();
		let u = system.add_internal_variable();
		let v = system.add_internal_variable();
		let blueprint = system.add_blueprint(Blueprint::GenericR1C);
		system
			.add_r1c(&R1C::new(vec![Term::wire(u)], vec![Term::wire(x)], vec![Term::wire(v)]), blueprint)
			.unwrap();

		let err = solve(&system, &[2]).unwrap_err();
		assert!(err.is_fatal());
		assert_matches!(err, Error::Fatal(FatalError::MultipleUnsolvedTerms { constraint: 0 }));
	}
}
