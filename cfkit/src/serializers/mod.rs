//! Per-type serializers converting values to and from their column byte encoding.
//!
//! Each serializer is a stateless singleton reachable through `get()`.
//! [`HasSerializer`] maps a Rust type to its default serializer so callers can
//! write `updater.set(name, value)` without naming the encoding.

mod boolean;
mod bytes;
mod date;
mod num;
mod string;
mod uuids;

use std::sync::Arc;

use crate::errors::CfError;
use crate::types::ComparatorType;

pub use boolean::BooleanSerializer;
pub use bytes::BytesArraySerializer;
pub use date::DateSerializer;
pub use num::{IntegerSerializer, LongSerializer};
pub use string::StringSerializer;
pub use uuids::UuidSerializer;

pub trait Serializer<T>: Send + Sync {
    fn to_bytes(&self, value: &T) -> Result<Vec<u8>, CfError>;

    fn from_bytes(&self, bytes: &[u8]) -> Result<T, CfError>;

    fn comparator_type(&self) -> ComparatorType;
}

pub type SharedSerializer<T> = Arc<dyn Serializer<T>>;

/// Types with a default column encoding
pub trait HasSerializer: Sized {
    fn serializer() -> SharedSerializer<Self>;
}

impl HasSerializer for String {
    fn serializer() -> SharedSerializer<Self> {
        StringSerializer::get()
    }
}

impl HasSerializer for ::uuid::Uuid {
    fn serializer() -> SharedSerializer<Self> {
        UuidSerializer::get()
    }
}

impl HasSerializer for i64 {
    fn serializer() -> SharedSerializer<Self> {
        LongSerializer::get()
    }
}

impl HasSerializer for i32 {
    fn serializer() -> SharedSerializer<Self> {
        IntegerSerializer::get()
    }
}

impl HasSerializer for bool {
    fn serializer() -> SharedSerializer<Self> {
        BooleanSerializer::get()
    }
}

impl HasSerializer for Vec<u8> {
    fn serializer() -> SharedSerializer<Self> {
        BytesArraySerializer::get()
    }
}

impl HasSerializer for chrono::DateTime<chrono::Utc> {
    fn serializer() -> SharedSerializer<Self> {
        DateSerializer::get()
    }
}

pub(crate) fn fixed_width<const W: usize>(type_name: &str, bytes: &[u8]) -> Result<[u8; W], CfError> {
    bytes
        .try_into()
        .map_err(|_| CfError::wrong_length(type_name, W, bytes.len()))
}
