use lazy_static::lazy_static;

use super::{fixed_width, Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref LONG: SharedSerializer<i64> = std::sync::Arc::new(LongSerializer);
    static ref INTEGER: SharedSerializer<i32> = std::sync::Arc::new(IntegerSerializer);
}

/// 64-bit signed integer, 8 bytes big-endian
#[derive(Debug, Clone, Copy, Default)]
pub struct LongSerializer;

impl LongSerializer {
    pub fn get() -> SharedSerializer<i64> {
        LONG.clone()
    }
}

impl Serializer<i64> for LongSerializer {
    fn to_bytes(&self, value: &i64) -> Result<Vec<u8>, CfError> {
        Ok(value.to_be_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<i64, CfError> {
        Ok(i64::from_be_bytes(fixed_width::<8>("Long", bytes)?))
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::LongType
    }
}

/// 32-bit signed integer, 4 bytes big-endian
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerSerializer;

impl IntegerSerializer {
    pub fn get() -> SharedSerializer<i32> {
        INTEGER.clone()
    }
}

impl Serializer<i32> for IntegerSerializer {
    fn to_bytes(&self, value: &i32) -> Result<Vec<u8>, CfError> {
        Ok(value.to_be_bytes().to_vec())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<i32, CfError> {
        Ok(i32::from_be_bytes(fixed_width::<4>("Integer", bytes)?))
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::Int32Type
    }
}
