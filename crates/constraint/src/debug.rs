// Copyright 2024-2025 Irreducible Inc.

//! Symbolic descriptions of constraints and circuit log statements.

use bytes::{Buf, BufMut};
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use crate::{
	coeff::{CoeffId, COEFF_ID_MINUS_ONE, COEFF_ID_ONE},
	term::{LinearExpression, Term, WireId},
};

/// Renders coefficient ids and wire ids as human readable strings.
pub trait Resolver {
	fn coeff_to_string(&self, id: CoeffId) -> String;
	fn variable_to_string(&self, wire: WireId) -> String;
}

/// Accumulates a textual rendering of terms.
pub(crate) struct StringBuilder<'a, R: ?Sized> {
	resolver: &'a R,
	buf: String,
}

impl<'a, R: Resolver + ?Sized> StringBuilder<'a, R> {
	pub fn new(resolver: &'a R) -> Self {
		Self {
			resolver,
			buf: String::new(),
		}
	}

	pub fn write_str(&mut self, s: &str) {
		self.buf.push_str(s);
	}

	pub fn write_term(&mut self, term: Term) {
		let variable = self.resolver.variable_to_string(term.wire);
		match term.coeff {
			COEFF_ID_ONE => self.buf.push_str(&variable),
			COEFF_ID_MINUS_ONE => {
				self.buf.push('-');
				self.buf.push_str(&variable);
			}
			coeff => {
				self.buf.push_str(&self.resolver.coeff_to_string(coeff));
				self.buf.push('⋅');
				self.buf.push_str(&variable);
			}
		}
	}

	pub fn write_linear_expression(&mut self, expr: &[Term]) {
		if expr.is_empty() {
			self.buf.push('0');
			return;
		}
		for (i, term) in expr.iter().enumerate() {
			if i > 0 {
				self.buf.push_str(" + ");
			}
			self.write_term(*term);
		}
	}

	pub fn finish(self) -> String {
		self.buf
	}
}

/// A formatted statement whose `{}` placeholders are filled with the values of linear
/// expressions, evaluated against the solution at render time.
///
/// Used both for circuit log statements and for the symbolic description of constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEntry {
	pub caller: String,
	pub format: String,
	pub to_resolve: Vec<LinearExpression>,
	/// Indices into [`SymbolTable::locations`], innermost first.
	pub stack: Vec<u32>,
}

impl LogEntry {
	pub fn new(format: impl Into<String>, to_resolve: Vec<LinearExpression>) -> Self {
		Self {
			format: format.into(),
			to_resolve,
			..Default::default()
		}
	}

	pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
		self.caller = caller.into();
		self
	}

	pub fn with_stack(mut self, stack: Vec<u32>) -> Self {
		self.stack = stack;
		self
	}

	/// Substitutes the placeholders, in order, with `resolve` applied to each expression.
	///
	/// Surplus placeholders are kept verbatim; surplus expressions are ignored.
	pub fn render(&self, mut resolve: impl FnMut(&[Term]) -> String) -> String {
		let mut out = String::with_capacity(self.format.len());
		let mut exprs = self.to_resolve.iter();
		let mut rest = self.format.as_str();
		while let Some(pos) = rest.find("{}") {
			out.push_str(&rest[..pos]);
			match exprs.next() {
				Some(expr) => out.push_str(&resolve(expr)),
				None => out.push_str("{}"),
			}
			rest = &rest[pos + 2..];
		}
		out.push_str(rest);
		out
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Function {
	pub name: String,
	pub filename: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
	pub function_id: u32,
	pub line: u32,
}

/// Interned source locations referenced by [`LogEntry::stack`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
	pub functions: Vec<Function>,
	pub locations: Vec<Location>,
}

impl SymbolTable {
	/// Interns a source location, returning its index.
	pub fn add_location(&mut self, function: &str, filename: &str, line: u32) -> u32 {
		let function_id = match self
			.functions
			.iter()
			.position(|f| f.name == function && f.filename == filename)
		{
			Some(id) => id as u32,
			None => {
				self.functions.push(Function {
					name: function.to_string(),
					filename: filename.to_string(),
				});
				(self.functions.len() - 1) as u32
			}
		};

		let location = Location { function_id, line };
		match self.locations.iter().position(|l| *l == location) {
			Some(id) => id as u32,
			None => {
				self.locations.push(location);
				(self.locations.len() - 1) as u32
			}
		}
	}

	/// Renders a call stack, one `function\n\tfile:line` frame per location.
	pub fn format_stack(&self, stack: &[u32]) -> String {
		let mut out = String::new();
		for &id in stack {
			let Some(location) = self.locations.get(id as usize) else {
				continue;
			};
			let Some(function) = self.functions.get(location.function_id as usize) else {
				continue;
			};
			out.push('\n');
			out.push_str(&function.name);
			out.push_str("\n\t");
			out.push_str(&function.filename);
			out.push(':');
			out.push_str(&location.line.to_string());
		}
		out
	}
}

impl SerializeBytes for LogEntry {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.caller.serialize(&mut write_buf)?;
		self.format.serialize(&mut write_buf)?;
		self.to_resolve.serialize(&mut write_buf)?;
		self.stack.serialize(write_buf)
	}
}

impl DeserializeBytes for LogEntry {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			caller: String::deserialize(&mut read_buf)?,
			format: String::deserialize(&mut read_buf)?,
			to_resolve: Vec::deserialize(&mut read_buf)?,
			stack: Vec::deserialize(read_buf)?,
		})
	}
}

impl SerializeBytes for Function {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.name.serialize(&mut write_buf)?;
		self.filename.serialize(write_buf)
	}
}

impl DeserializeBytes for Function {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			name: String::deserialize(&mut read_buf)?,
			filename: String::deserialize(read_buf)?,
		})
	}
}

impl SerializeBytes for Location {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.function_id.serialize(&mut write_buf)?;
		self.line.serialize(write_buf)
	}
}

impl DeserializeBytes for Location {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			function_id: u32::deserialize(&mut read_buf)?,
			line: u32::deserialize(read_buf)?,
		})
	}
}

impl SerializeBytes for SymbolTable {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.functions.serialize(&mut write_buf)?;
		self.locations.serialize(write_buf)
	}
}

impl DeserializeBytes for SymbolTable {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let functions = Vec::<Function>::deserialize(&mut read_buf)?;
		let locations = Vec::<Location>::deserialize(read_buf)?;
		if locations
			.iter()
			.any(|l| l.function_id as usize >= functions.len())
		{
			return Err(SerializationError::InvalidConstruction {
				name: "SymbolTable::locations",
			});
		}
		Ok(Self {
			functions,
			locations,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Names;

	impl Resolver for Names {
		fn coeff_to_string(&self, id: CoeffId) -> String {
			format!("c{id}")
		}

		fn variable_to_string(&self, wire: WireId) -> String {
			format!("v{wire}")
		}
	}

	#[test]
	fn test_render_fills_placeholders_in_order() {
		let entry = LogEntry::new("a = {}, b = {}, c = {}", vec![vec![Term::wire(1)], vec![Term::wire(2)]]);
		let rendered = entry.render(|expr| Names.variable_to_string(expr[0].wire));
		assert_eq!(rendered, "a = v1, b = v2, c = {}");
	}

	#[test]
	fn test_string_builder() {
		let mut sbb = StringBuilder::new(&Names);
		sbb.write_linear_expression(&[Term::wire(1), Term::new(COEFF_ID_MINUS_ONE, 2), Term::new(7, 3)]);
		sbb.write_str(" == ");
		sbb.write_linear_expression(&[]);
		assert_eq!(sbb.finish(), "v1 + -v2 + c7⋅v3 == 0");
	}

	#[test]
	fn test_symbol_table_interns_locations() {
		let mut table = SymbolTable::default();
		let a = table.add_location("main", "circuit.rs", 10);
		let b = table.add_location("main", "circuit.rs", 12);
		let c = table.add_location("main", "circuit.rs", 10);
		let d = table.add_location("gadget", "gadget.rs", 3);
		assert_eq!((a, b, c, d), (0, 1, 0, 2));
		assert_eq!(table.functions.len(), 2);
		assert_eq!(table.format_stack(&[d, a]), "\ngadget\n\tgadget.rs:3\nmain\n\tcircuit.rs:10");

		let mut buf = Vec::new();
		table.serialize(&mut buf).unwrap();
		assert_eq!(SymbolTable::deserialize(buf.as_slice()).unwrap(), table);
	}
}
