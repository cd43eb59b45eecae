// Copyright 2024-2025 Irreducible Inc.

//! Little-endian byte serialization for the persisted constraint system.
//!
//! Lengths and `usize` values are encoded as `u32`; sequences are length-prefixed.

use std::collections::BTreeMap;

use bytes::{Buf, BufMut};

/// Represents type that can be serialized to a byte buffer.
pub trait SerializeBytes {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError>;
}

/// Represents type that can be deserialized from a byte buffer.
pub trait DeserializeBytes {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError>
	where
		Self: Sized;
}

#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum SerializationError {
	#[error("Write buffer is full")]
	WriteBufferFull,
	#[error("Not enough data in read buffer to deserialize")]
	NotEnoughBytes,
	#[error("Unknown enum variant index {name}::{index}")]
	UnknownEnumVariant { name: &'static str, index: u8 },
	#[error("FromUtf8Error: {0}")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("Invalid construction of {name}")]
	InvalidConstruction { name: &'static str },
	#[error("usize {size} is too large to serialize (max is {max})", max = u32::MAX)]
	UsizeTooLarge { size: usize },
}

pub fn assert_enough_space_for(write_buf: &impl BufMut, size: usize) -> Result<(), SerializationError> {
	if write_buf.remaining_mut() < size {
		return Err(SerializationError::WriteBufferFull);
	}
	Ok(())
}

pub fn assert_enough_data_for(read_buf: &impl Buf, size: usize) -> Result<(), SerializationError> {
	if read_buf.remaining() < size {
		return Err(SerializationError::NotEnoughBytes);
	}
	Ok(())
}

impl<T: SerializeBytes + ?Sized> SerializeBytes for &T {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		(**self).serialize(write_buf)
	}
}

macro_rules! impl_serialize_uint {
	($ty:ty, $put:ident, $get:ident) => {
		impl SerializeBytes for $ty {
			fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
				assert_enough_space_for(&write_buf, std::mem::size_of::<Self>())?;
				write_buf.$put(*self);
				Ok(())
			}
		}

		impl DeserializeBytes for $ty {
			fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
				assert_enough_data_for(&read_buf, std::mem::size_of::<Self>())?;
				Ok(read_buf.$get())
			}
		}
	};
}

impl_serialize_uint!(u64, put_u64_le, get_u64_le);
impl_serialize_uint!(u32, put_u32_le, get_u32_le);
impl_serialize_uint!(u16, put_u16_le, get_u16_le);
impl_serialize_uint!(u8, put_u8, get_u8);

impl SerializeBytes for usize {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		let value: u32 = (*self)
			.try_into()
			.map_err(|_| SerializationError::UsizeTooLarge { size: *self })?;
		SerializeBytes::serialize(&value, &mut write_buf)
	}
}

impl DeserializeBytes for usize {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let value: u32 = DeserializeBytes::deserialize(&mut read_buf)?;
		Ok(value as Self)
	}
}

impl SerializeBytes for bool {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		u8::serialize(&(*self as u8), write_buf)
	}
}

impl DeserializeBytes for bool {
	fn deserialize(read_buf: impl Buf) -> Result<Self, SerializationError> {
		match u8::deserialize(read_buf)? {
			0 => Ok(false),
			1 => Ok(true),
			index => Err(SerializationError::UnknownEnumVariant {
				name: "bool",
				index,
			}),
		}
	}
}

impl SerializeBytes for str {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		let bytes = self.as_bytes();
		SerializeBytes::serialize(&bytes.len(), &mut write_buf)?;
		assert_enough_space_for(&write_buf, bytes.len())?;
		write_buf.put_slice(bytes);
		Ok(())
	}
}

impl SerializeBytes for String {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.as_str().serialize(write_buf)
	}
}

impl DeserializeBytes for String {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let len = usize::deserialize(&mut read_buf)?;
		assert_enough_data_for(&read_buf, len)?;
		let mut bytes = vec![0u8; len];
		read_buf.copy_to_slice(&mut bytes);
		Ok(String::from_utf8(bytes)?)
	}
}

impl<T: SerializeBytes> SerializeBytes for [T] {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		SerializeBytes::serialize(&self.len(), &mut write_buf)?;
		self.iter()
			.try_for_each(|item| item.serialize(&mut write_buf))
	}
}

impl<T: SerializeBytes> SerializeBytes for Vec<T> {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.as_slice().serialize(write_buf)
	}
}

impl<T: DeserializeBytes> DeserializeBytes for Vec<T> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let len = usize::deserialize(&mut read_buf)?;
		// Every item occupies at least one byte, so a length larger than the
		// remaining data is malformed and must not drive the allocation.
		let mut items = Vec::with_capacity(len.min(read_buf.remaining()));
		for _ in 0..len {
			items.push(T::deserialize(&mut read_buf)?);
		}
		Ok(items)
	}
}

impl<A: SerializeBytes, B: SerializeBytes> SerializeBytes for (A, B) {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		self.0.serialize(&mut write_buf)?;
		self.1.serialize(write_buf)
	}
}

impl<A: DeserializeBytes, B: DeserializeBytes> DeserializeBytes for (A, B) {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let a = A::deserialize(&mut read_buf)?;
		let b = B::deserialize(read_buf)?;
		Ok((a, b))
	}
}

impl<K: SerializeBytes, V: SerializeBytes> SerializeBytes for BTreeMap<K, V> {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), SerializationError> {
		SerializeBytes::serialize(&self.len(), &mut write_buf)?;
		self.iter().try_for_each(|(key, value)| {
			key.serialize(&mut write_buf)?;
			value.serialize(&mut write_buf)
		})
	}
}

impl<K: DeserializeBytes + Ord, V: DeserializeBytes> DeserializeBytes for BTreeMap<K, V> {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, SerializationError> {
		let len = usize::deserialize(&mut read_buf)?;
		let mut map = BTreeMap::new();
		for _ in 0..len {
			let key = K::deserialize(&mut read_buf)?;
			let value = V::deserialize(&mut read_buf)?;
			if map.insert(key, value).is_some() {
				return Err(SerializationError::InvalidConstruction {
					name: "BTreeMap::duplicate_key",
				});
			}
		}
		Ok(map)
	}
}
