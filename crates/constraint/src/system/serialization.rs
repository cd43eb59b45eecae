// Copyright 2024-2025 Irreducible Inc.

use std::collections::BTreeMap;

use bytes::{Buf, BufMut};
use zkc_field::{
	serialization::{check_modulus, deserialize_elements, serialize_elements, serialize_modulus},
	Field,
};
use zkc_utils::serialization::{DeserializeBytes, SerializationError, SerializeBytes};

use super::{Error, Instruction, Levels, ReadError, System, SystemKind, ONE_WIRE_NAME};
use crate::{
	blueprint::{Blueprint, BlueprintKind},
	coeff::CoeffTable,
	debug::{LogEntry, SymbolTable},
	hint::HintId,
};

const MAGIC: [u8; 4] = *b"ZKCS";

impl<F: Field> System<F> {
	pub const SERIALIZATION_VERSION: u32 = 1;

	/// Decodes a system written by [`SerializeBytes::serialize`], requiring the whole input to be
	/// consumed.
	pub fn read_from(bytes: &[u8]) -> Result<Self, ReadError> {
		let mut read_buf = bytes;
		let result = Self::deserialize(&mut read_buf).and_then(|system| {
			if read_buf.has_remaining() {
				return Err(SerializationError::InvalidConstruction {
					name: "System::trailing_bytes",
				});
			}
			Ok(system)
		});
		result.map_err(|source| ReadError {
			offset: bytes.len() - read_buf.len(),
			source,
		})
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
		let mut buf = Vec::new();
		self.serialize(&mut buf)?;
		Ok(buf)
	}

	/// Structural checks on a freshly decoded system.
	fn validate(&self) -> Result<(), SerializationError> {
		let invalid = |name: &'static str| -> Result<(), SerializationError> {
			Err(SerializationError::InvalidConstruction { name })
		};

		if self.kind == SystemKind::R1cs && self.public.first().map(String::as_str) != Some(ONE_WIRE_NAME)
		{
			return invalid("System::one_wire");
		}

		let mut nb_constraints = 0;
		for instruction in &self.instructions {
			let Ok(blueprint) = self.blueprint(instruction.blueprint_id) else {
				return invalid("System::blueprint_id");
			};
			let allowed = match self.kind {
				SystemKind::R1cs => blueprint.kind() != BlueprintKind::SparseR1C,
				SystemKind::SparseR1cs => blueprint.kind() != BlueprintKind::R1C,
			};
			if !allowed {
				return invalid("System::blueprint_kind");
			}
			if instruction.constraint_offset as usize != nb_constraints {
				return invalid("System::constraint_offset");
			}
			match self.check_instruction_operands(instruction) {
				Ok(()) => {}
				Err(Error::WireOutOfRange { .. }) => return invalid("System::wire"),
				Err(Error::CoeffOutOfRange { .. }) => return invalid("System::coefficient"),
				Err(_) => return invalid("System::call_data"),
			}
			nb_constraints += blueprint.nb_constraints();
		}
		if nb_constraints != self.nb_constraints {
			return invalid("System::nb_constraints");
		}

		if self
			.debug_map
			.iter()
			.any(|(&c, &id)| c as usize >= nb_constraints || id as usize >= self.debug_info.len())
		{
			return invalid("System::debug_map");
		}
		Ok(())
	}
}

impl SerializeBytes for SystemKind {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		let index: u8 = match self {
			Self::R1cs => 0,
			Self::SparseR1cs => 1,
		};
		index.serialize(write_buf)
	}
}

impl DeserializeBytes for SystemKind {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		match u8::deserialize(read_buf)? {
			0 => Ok(Self::R1cs),
			1 => Ok(Self::SparseR1cs),
			index => Err(SerializationError::UnknownEnumVariant {
				name: "SystemKind",
				index,
			}),
		}
	}
}

impl SerializeBytes for Instruction {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.blueprint_id.serialize(&mut write_buf)?;
		self.constraint_offset.serialize(&mut write_buf)?;
		self.start_call_data.serialize(write_buf)
	}
}

impl DeserializeBytes for Instruction {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		Ok(Self {
			blueprint_id: u32::deserialize(&mut read_buf)?,
			constraint_offset: u32::deserialize(&mut read_buf)?,
			start_call_data: u64::deserialize(read_buf)?,
		})
	}
}

impl<F: Field> SerializeBytes for System<F> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		zkc_utils::serialization::assert_enough_space_for(&write_buf, MAGIC.len())?;
		write_buf.put_slice(&MAGIC);
		Self::SERIALIZATION_VERSION.serialize(&mut write_buf)?;
		self.kind.serialize(&mut write_buf)?;
		serialize_modulus::<F>(&mut write_buf)?;

		serialize_elements(self.coefficients.coefficients(), &mut write_buf)?;
		self.blueprints.serialize(&mut write_buf)?;
		self.instructions.serialize(&mut write_buf)?;
		self.call_data.serialize(&mut write_buf)?;
		self.public.serialize(&mut write_buf)?;
		self.secret.serialize(&mut write_buf)?;
		self.nb_internal.serialize(&mut write_buf)?;
		self.nb_constraints.serialize(&mut write_buf)?;
		self.levels.levels.serialize(&mut write_buf)?;
		self.debug_info.serialize(&mut write_buf)?;
		self.debug_map.serialize(&mut write_buf)?;
		self.logs.serialize(&mut write_buf)?;
		self.symbols.serialize(&mut write_buf)?;
		self.hint_dependencies.serialize(write_buf)
	}
}

impl<F: Field> DeserializeBytes for System<F> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		zkc_utils::serialization::assert_enough_data_for(&read_buf, MAGIC.len())?;
		let mut magic = [0u8; 4];
		read_buf.copy_to_slice(&mut magic);
		if magic != MAGIC {
			return Err(SerializationError::InvalidConstruction {
				name: "System::magic",
			});
		}
		let version = u32::deserialize(&mut read_buf)?;
		if version != Self::SERIALIZATION_VERSION {
			return Err(SerializationError::InvalidConstruction {
				name: "System::version",
			});
		}
		let kind = SystemKind::deserialize(&mut read_buf)?;
		check_modulus::<F>(&mut read_buf)?;

		let coefficients = CoeffTable::from_coefficients(deserialize_elements(&mut read_buf)?)
			.map_err(|_| SerializationError::InvalidConstruction {
				name: "System::coefficients",
			})?;
		let blueprints = Vec::<Blueprint>::deserialize(&mut read_buf)?;
		let instructions = Vec::<Instruction>::deserialize(&mut read_buf)?;
		let call_data = Vec::<u32>::deserialize(&mut read_buf)?;
		let public = Vec::<String>::deserialize(&mut read_buf)?;
		let secret = Vec::<String>::deserialize(&mut read_buf)?;
		let nb_internal = usize::deserialize(&mut read_buf)?;
		let nb_constraints = usize::deserialize(&mut read_buf)?;
		let levels = Vec::<Vec<u32>>::deserialize(&mut read_buf)?;
		let debug_info = Vec::<LogEntry>::deserialize(&mut read_buf)?;
		let debug_map = BTreeMap::<u32, u32>::deserialize(&mut read_buf)?;
		let logs = Vec::<LogEntry>::deserialize(&mut read_buf)?;
		let symbols = SymbolTable::deserialize(&mut read_buf)?;
		let hint_dependencies = BTreeMap::<HintId, String>::deserialize(read_buf)?;

		let mut system = Self {
			kind,
			coefficients,
			blueprints,
			instructions,
			call_data,
			public,
			secret,
			nb_internal,
			nb_constraints,
			levels: Levels::default(),
			debug_info,
			debug_map,
			logs,
			symbols,
			hint_dependencies,
		};
		system.validate()?;
		system.levels = system
			.replay_levels(Levels::from_levels(levels))
			.map_err(|_| SerializationError::InvalidConstruction {
				name: "System::levels",
			})?;
		Ok(system)
	}
}
