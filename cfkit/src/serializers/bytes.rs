use lazy_static::lazy_static;

use super::{Serializer, SharedSerializer};
use crate::errors::CfError;
use crate::types::ComparatorType;

lazy_static! {
    static ref INSTANCE: SharedSerializer<Vec<u8>> = std::sync::Arc::new(BytesArraySerializer);
}

/// Raw bytes, passed through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesArraySerializer;

impl BytesArraySerializer {
    pub fn get() -> SharedSerializer<Vec<u8>> {
        INSTANCE.clone()
    }
}

impl Serializer<Vec<u8>> for BytesArraySerializer {
    fn to_bytes(&self, value: &Vec<u8>) -> Result<Vec<u8>, CfError> {
        Ok(value.clone())
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Vec<u8>, CfError> {
        Ok(bytes.to_vec())
    }

    fn comparator_type(&self) -> ComparatorType {
        ComparatorType::BytesType
    }
}
