// Copyright 2024-2025 Irreducible Inc.

use super::{word, Blueprint, Error};
use crate::{hint::HintMapping, term::Term};

pub(super) fn compress(h: &HintMapping, out: &mut Vec<u32>) -> Result<(), Error> {
	let blueprint = Blueprint::GenericHint;

	// total, hint id, number of inputs
	let mut total = 3;
	for input in &h.inputs {
		total += 1 + 2 * input.len();
	}
	total += h.outputs.len();

	out.reserve(total);
	out.push(word(blueprint, total)?);
	out.push(h.hint_id);
	out.push(word(blueprint, h.inputs.len())?);
	for input in &h.inputs {
		out.push(word(blueprint, input.len())?);
		for term in input {
			out.push(term.coeff);
			out.push(term.wire);
		}
	}
	out.extend_from_slice(&h.outputs);
	Ok(())
}

pub(super) fn decompress(call_data: &[u32], h: &mut HintMapping) -> Result<(), Error> {
	h.clear();

	let malformed = |reason: &'static str| Error::MalformedCallData {
		blueprint: Blueprint::GenericHint,
		reason,
	};

	let &[total, hint_id, nb_inputs, ..] = call_data else {
		return Err(malformed("missing header"));
	};
	if total as usize != call_data.len() {
		return Err(malformed("length prefix does not match the range"));
	}
	h.hint_id = hint_id;

	let mut rest = &call_data[3..];
	// Every input takes at least its length word.
	h.inputs.reserve((nb_inputs as usize).min(rest.len()));
	for _ in 0..nb_inputs {
		let Some((&len, tail)) = rest.split_first() else {
			return Err(malformed("truncated input"));
		};
		let nb_words = 2 * len as usize;
		if tail.len() < nb_words {
			return Err(malformed("truncated input"));
		}
		let (terms, tail) = tail.split_at(nb_words);
		h.inputs.push(
			terms
				.chunks_exact(2)
				.map(|pair| Term::new(pair[0], pair[1]))
				.collect(),
		);
		rest = tail;
	}
	h.outputs.extend_from_slice(rest);
	Ok(())
}
