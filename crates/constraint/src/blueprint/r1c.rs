// Copyright 2024-2025 Irreducible Inc.

use super::{word, Blueprint, Error};
use crate::{
	constraint::R1C,
	term::{LinearExpression, Term},
};

const HEADER_LEN: usize = 3;

pub(super) fn compress(c: &R1C, out: &mut Vec<u32>) -> Result<(), Error> {
	let nb_terms = c.l.len() + c.r.len() + c.o.len();
	let total = HEADER_LEN + 2 * nb_terms;

	let blueprint = Blueprint::GenericR1C;
	out.reserve(total);
	out.push(word(blueprint, total)?);
	out.push(word(blueprint, c.l.len())?);
	out.push(word(blueprint, c.r.len())?);
	for term in c.terms() {
		out.push(term.coeff);
		out.push(term.wire);
	}
	Ok(())
}

pub(super) fn decompress(call_data: &[u32], c: &mut R1C) -> Result<(), Error> {
	c.clear();

	let malformed = |reason: &'static str| Error::MalformedCallData {
		blueprint: Blueprint::GenericR1C,
		reason,
	};

	let [total, len_l, len_r, body @ ..] = call_data else {
		return Err(malformed("missing header"));
	};
	if *total as usize != call_data.len() {
		return Err(malformed("length prefix does not match the range"));
	}
	if body.len() % 2 != 0 {
		return Err(malformed("odd number of term words"));
	}

	let nb_terms = body.len() / 2;
	let (len_l, len_r) = (*len_l as usize, *len_r as usize);
	if len_l.checked_add(len_r).map_or(true, |n| n > nb_terms) {
		return Err(malformed("expression lengths exceed the range"));
	}

	let mut terms = body
		.chunks_exact(2)
		.map(|pair| Term::new(pair[0], pair[1]));
	read_expression(&mut terms, len_l, &mut c.l);
	read_expression(&mut terms, len_r, &mut c.r);
	c.o.extend(terms);
	Ok(())
}

fn read_expression(terms: &mut impl Iterator<Item = Term>, len: usize, expr: &mut LinearExpression) {
	expr.extend(terms.take(len));
}
